//! Completion analysis for TDL documents.
//!
//! Resolves the cursor's structural context from a bounded window of text
//! before it and answers from exactly one strategy, checked in priority
//! order:
//!
//! - **Tag context**: after `#`, offers every tag seen across the workspace,
//!   ranked by first appearance.
//! - **Dotted paths**: after `OBJ.` or `OBJ.PART`, offers the object's
//!   attributes, filtered by the typed partial segment when present.
//! - **Bracket open**: right after `OBJ [`, offers the object's attributes.
//! - **Comma continuation**: after a top-level comma inside a feature
//!   structure, offers a newline snippet plus the enclosing object's
//!   attributes.
//! - **Prefix fallback**: a bare identifier prefix matches object names from
//!   the global symbol table.
//!
//! A strategy whose context matches terminates resolution even when it has
//! nothing to offer. The resolver is workspace-scoped: attribute sets and
//! tags come from the [`Workspace`] index, never from reparsing the document.

use crate::text::{self, floor_char_boundary};
use crate::tokenizer::{self, IDENT_PATTERN, Token, TokenKind};
use crate::workspace::Workspace;
use lsp_types::{CompletionItemKind, InsertTextFormat};
use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

/// A completion suggestion with display metadata.
///
/// Maps to LSP `CompletionItem` but remains protocol-agnostic. The LSP layer
/// converts these to the wire format. Uses [`lsp_types::CompletionItemKind`]
/// directly for semantic classification (field, variable, snippet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCandidate {
    /// The text shown in the completion menu and inserted by default.
    pub label: String,
    /// Optional description shown alongside the label (e.g., "attribute").
    pub detail: Option<String>,
    /// Semantic category for icon display.
    pub kind: CompletionItemKind,
    /// Alternative text to insert if different from label (e.g.,
    /// space-prefixed attributes directly after `[`).
    pub insert_text: Option<String>,
    /// Set when `insert_text` uses snippet placeholder syntax.
    pub insert_text_format: Option<InsertTextFormat>,
    /// Zero-padded rank controlling menu order.
    pub sort_text: String,
}

impl CompletionCandidate {
    fn new(label: impl Into<String>, kind: CompletionItemKind, rank: usize) -> Self {
        Self {
            label: label.into(),
            detail: None,
            kind,
            insert_text: None,
            insert_text_format: None,
            sort_text: format!("{rank:04}"),
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    fn with_insert_text(mut self, text: impl Into<String>) -> Self {
        self.insert_text = Some(text.into());
        self
    }

    fn with_snippet_text(mut self, text: impl Into<String>) -> Self {
        self.insert_text = Some(text.into());
        self.insert_text_format = Some(InsertTextFormat::SNIPPET);
        self
    }
}

static TAG_CONTEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([A-Za-z0-9_+\-]*)$").expect("tag context regex compiles"));

static TRAILING_DOT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"({IDENT_PATTERN})\.$")).expect("trailing dot regex compiles")
});

static PARTIAL_SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"({IDENT_PATTERN})\.({IDENT_PATTERN})$"))
        .expect("partial segment regex compiles")
});

static BRACKET_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"({IDENT_PATTERN})(?:\s+{IDENT_PATTERN}\s*&)?\s*\[\s*$"
    ))
    .expect("bracket open regex compiles")
});

static TRAILING_IDENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"({IDENT_PATTERN})$")).expect("trailing ident regex compiles")
});

/// Returns completion candidates for the byte offset in `text`.
///
/// The offset is clamped to the text and snapped to a character boundary, so
/// callers may pass positions straight from an editor without validation.
/// Returns an empty vector when no strategy applies.
pub fn completion_items(
    workspace: &Workspace,
    text: &str,
    offset: usize,
) -> Vec<CompletionCandidate> {
    let limits = workspace.limits();
    let offset = floor_char_boundary(text, offset);
    let window_start = floor_char_boundary(text, offset.saturating_sub(limits.completion_window));
    let context = &text[window_start..offset];

    if let Some(caps) = TAG_CONTEXT_RE.captures(context) {
        let prefix = caps.get(1).map_or("", |m| m.as_str());
        return tag_candidates(workspace, prefix);
    }

    if let Some(object) = TRAILING_DOT_RE
        .captures(context)
        .and_then(|caps| caps.get(1))
    {
        return attribute_candidates(workspace, object.as_str(), None, false);
    }

    if let Some(caps) = PARTIAL_SEGMENT_RE.captures(context) {
        let (Some(object), Some(prefix)) = (caps.get(1), caps.get(2)) else {
            return Vec::new();
        };
        return attribute_candidates(workspace, object.as_str(), Some(prefix.as_str()), false);
    }

    if let Some(object) = BRACKET_OPEN_RE
        .captures(context)
        .and_then(|caps| caps.get(1))
    {
        return attribute_candidates(workspace, object.as_str(), None, context.ends_with('['));
    }

    if let Some(candidates) = comma_continuation(workspace, context) {
        return candidates;
    }

    fallback_prefix(workspace, context, limits.word_window)
}

/// Visible workspace tags starting with `prefix`, ranked by first appearance.
fn tag_candidates(workspace: &Workspace, prefix: &str) -> Vec<CompletionCandidate> {
    workspace
        .tags()
        .filter(|tag| tag.starts_with(prefix))
        .enumerate()
        .map(|(rank, tag)| {
            CompletionCandidate::new(format!("#{tag}"), CompletionItemKind::VARIABLE, rank)
                .with_detail("tag")
        })
        .collect()
}

/// The object's known attributes, optionally filtered by a typed prefix.
fn attribute_candidates(
    workspace: &Workspace,
    object: &str,
    prefix: Option<&str>,
    prepend_space: bool,
) -> Vec<CompletionCandidate> {
    let Some(attributes) = workspace.attributes_for(object) else {
        return Vec::new();
    };
    let names = attributes
        .iter()
        .map(String::as_str)
        .filter(|name| prefix.map_or(true, |p| name.starts_with(p)))
        .collect();
    ranked_candidates(names, "attribute", prepend_space)
}

/// Detects a top-level comma inside an open feature structure.
///
/// The object stack records the raw token before each open bracket, matching
/// how attribute extraction keys its owners; the backward scan then decides
/// whether the cursor sits right after a top-level comma. A just-typed
/// identifier fragment is excluded from the scan since it is not part of the
/// structure yet.
fn comma_continuation(workspace: &Workspace, context: &str) -> Option<Vec<CompletionCandidate>> {
    let filtered = text::filter_comments(context);
    let tokens = tokenizer::tokenize(&filtered);

    let mut owners: Vec<Option<&Token<'_>>> = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::BracketOpen => {
                owners.push(i.checked_sub(1).map(|j| &tokens[j]));
            }
            TokenKind::BracketClose => {
                owners.pop();
            }
            _ => {}
        }
    }
    let owner = owners.last().copied().flatten();

    let mut scan: &[Token<'_>] = &tokens;
    if let Some(prefix) = TRAILING_IDENT_RE
        .captures(context)
        .and_then(|caps| caps.get(1))
    {
        if let Some((last, rest)) = scan.split_last() {
            if last.kind == TokenKind::Ident && last.text == prefix.as_str() {
                scan = rest;
            }
        }
    }

    let mut depth = 0usize;
    for token in scan.iter().rev() {
        match token.kind {
            TokenKind::BracketClose => depth += 1,
            TokenKind::BracketOpen => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            TokenKind::Comma if depth == 0 => {
                let object = owner?;
                let mut items = vec![newline_snippet()];
                items.extend(attribute_candidates(workspace, object.text, None, false));
                return Some(items);
            }
            _ => break,
        }
    }
    None
}

/// The synthetic "continue on the next line" entry offered after a comma.
fn newline_snippet() -> CompletionCandidate {
    CompletionCandidate::new("⏎", CompletionItemKind::SNIPPET, 0).with_snippet_text("\n$0")
}

/// Matches global object names against the trailing identifier run of the
/// word window.
fn fallback_prefix(
    workspace: &Workspace,
    context: &str,
    word_window: usize,
) -> Vec<CompletionCandidate> {
    let window_start = floor_char_boundary(context, context.len().saturating_sub(word_window));
    let window = &context[window_start..];

    let mut start = window.len();
    for (i, ch) in window.char_indices().rev() {
        if !text::is_ident_char(ch) {
            break;
        }
        start = i;
    }
    let prefix = &window[start..];
    if prefix.is_empty() {
        return Vec::new();
    }

    let names = workspace
        .object_names()
        .filter(|name| name.starts_with(prefix))
        .collect();
    ranked_candidates(names, "type", false)
}

/// Sorts names and assigns one-based sort keys; the zero key belongs to the
/// newline snippet.
fn ranked_candidates(
    mut names: Vec<&str>,
    detail: &str,
    prepend_space: bool,
) -> Vec<CompletionCandidate> {
    names.sort_by(|a, b| compare_names(a, b));
    names
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            let candidate = CompletionCandidate::new(name, CompletionItemKind::FIELD, index + 1)
                .with_detail(detail);
            if prepend_space {
                candidate.with_insert_text(format!(" {name}"))
            } else {
                candidate
            }
        })
        .collect()
}

/// Upper-case attribute names sort before everything else; ties break
/// case-insensitively, then byte-wise.
fn compare_names(a: &str, b: &str) -> Ordering {
    match (is_upper_name(a), is_upper_name(b)) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
    }
}

fn is_upper_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| matches!(b, b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'+' | b'-'))
}
