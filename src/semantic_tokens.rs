//! Semantic token collection, which editors use for syntax highlighting.
//!
//! The engine emits tokens against a fixed legend of TDL-specific type names
//! (`type-tdl`, `variable-tdl`, `property-tdl`). Hosts declare the legend at
//! initialization from [`SEMANTIC_TOKEN_KINDS`] and send each token as an
//! index into it; editor plugins then map the names onto theme scopes, so the
//! engine never needs to know about concrete themes.
//!
//! Classification is intentionally lexical rather than grammatical: every
//! identifier run that is not quoted, commented out, or glued to a sigil is
//! looked up against the definition index, and known type names are reported.
//! Only `type-tdl` is emitted today; the other legend entries are reserved
//! for hosts that already declare them.

use crate::text;
use crate::tokenizer::IDENT_PATTERN;
use crate::workspace::Workspace;
use regex::Regex;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TdlSemanticTokenKind {
    Type,
    Variable,
    Property,
}

impl TdlSemanticTokenKind {
    /// Returns the legend name for LSP.
    ///
    /// The `-tdl` suffix keeps the names out of the standard token namespace
    /// so editor configurations can theme them without colliding with
    /// built-in scopes.
    pub fn as_str(self) -> &'static str {
        match self {
            TdlSemanticTokenKind::Type => "type-tdl",
            TdlSemanticTokenKind::Variable => "variable-tdl",
            TdlSemanticTokenKind::Property => "property-tdl",
        }
    }
}

pub const SEMANTIC_TOKEN_KINDS: &[TdlSemanticTokenKind] = &[
    TdlSemanticTokenKind::Type,
    TdlSemanticTokenKind::Variable,
    TdlSemanticTokenKind::Property,
];

/// One highlighted span, addressed by line and byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TdlSemanticToken {
    pub kind: TdlSemanticTokenKind,
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

static DOC_DELIMITER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\"\"\"").expect("doc delimiter regex compiles"));

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(IDENT_PATTERN).expect("word regex compiles"));

/// Scans `text` and reports every identifier that names a known definition.
pub fn collect_semantic_tokens(workspace: &Workspace, text: &str) -> Vec<TdlSemanticToken> {
    let mut collector = TokenCollector::new(workspace);
    for (line_number, line) in text.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        collector.scan_line(line_number, line);
    }
    collector.finish()
}

struct TokenCollector<'ws> {
    workspace: &'ws Workspace,
    tokens: Vec<TdlSemanticToken>,
    inside_doc: bool,
}

impl<'ws> TokenCollector<'ws> {
    fn new(workspace: &'ws Workspace) -> Self {
        Self {
            workspace,
            tokens: Vec::new(),
            inside_doc: false,
        }
    }

    fn finish(self) -> Vec<TdlSemanticToken> {
        self.tokens
    }

    fn scan_line(&mut self, line_number: usize, line: &str) {
        // Comment lines are skipped wholesale; their `"""` delimiters do not
        // toggle the doc-block flag.
        if line.trim_start().starts_with(';') {
            return;
        }

        // Quoted byte spans on this line, derived from the carried flag. A
        // span opened here provisionally runs to the penultimate byte and is
        // patched when its closing delimiter sits on the same line.
        let mut quoted: Vec<(usize, usize)> = Vec::new();
        let mut opened_here = false;
        for delimiter in DOC_DELIMITER_RE.find_iter(line) {
            let idx = delimiter.start();
            if !self.inside_doc {
                quoted.push((idx, line.len() - 1));
                opened_here = true;
            } else if opened_here {
                if let Some(last) = quoted.last_mut() {
                    last.1 = idx + 3;
                }
            } else {
                quoted.push((0, idx + 3));
            }
            self.inside_doc = !self.inside_doc;
        }

        let comment = text::comment_start(line);

        for word in WORD_RE.find_iter(line) {
            let (start, end) = (word.start(), word.end());
            if quoted.iter().any(|&(s, e)| start >= s && end <= e) {
                continue;
            }
            if self.inside_doc && quoted.is_empty() {
                continue;
            }
            if start > 0 && matches!(line.as_bytes()[start - 1], b'#' | b':' | b'"') {
                continue;
            }
            if comment.is_some_and(|i| i < start) {
                continue;
            }
            if self.workspace.definition(word.as_str()).is_some() {
                self.tokens.push(TdlSemanticToken {
                    kind: TdlSemanticTokenKind::Type,
                    line: line_number,
                    column: start,
                    length: word.len(),
                });
            }
        }
    }
}
