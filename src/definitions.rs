//! Definition and documentation extraction.
//!
//! Definitions are `IDENT :=` occurrences anywhere in the raw text. A
//! definition may carry a documentation block: a `"""..."""` span on a
//! following line, optionally annotated (`[incr]` or a bare identifier),
//! terminated by a stand-alone period. The block is attached only when no
//! stand-alone period appears between the `:=` and the block, so docs written
//! after a later definition are not pulled backwards.

use crate::text::{Range, SourceLocation};
use crate::tokenizer::IDENT_PATTERN;
use regex::Regex;
use std::sync::LazyLock;

static DEFINITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"({IDENT_PATTERN})\s*:=")).expect("definition pattern compiles")
});

static DOC_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)[ \t]*\r?\n\s*"""\s*(.*?)\s*"""[ \t\n]*(\[[^:;|]*\]|[A-Za-z0-9_+*\-]*)[ \t\n]*\."#)
        .expect("doc block pattern compiles")
});

/// A `.` that does not begin a dotted reference ends a statement.
static STANDALONE_PERIOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.[^A-Za-z0-9_+*\-]").expect("period pattern compiles"));

/// One `Name := ...` occurrence with its name range and optional doc text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionRecord {
    pub name: String,
    pub range: Range,
    pub doc: Option<String>,
}

/// Extracts every definition in the text, in source order. Later occurrences
/// of the same name are separate records; index maintenance decides which
/// one wins.
pub fn extract_definitions(text: &str) -> Vec<DefinitionRecord> {
    let locator = SourceLocation::new(text);
    let mut records = Vec::new();

    for caps in DEFINITION_RE.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let range = Range::new(
            locator.position_at(name.start()),
            locator.position_at(name.end()),
        );
        records.push(DefinitionRecord {
            name: name.as_str().to_string(),
            range,
            doc: doc_block_after(&text[whole.end()..]),
        });
    }
    records
}

fn doc_block_after(rest: &str) -> Option<String> {
    let caps = DOC_BLOCK_RE.captures(rest)?;
    let block = caps.get(0)?;
    if STANDALONE_PERIOD_RE.is_match(&rest[..block.start()]) {
        return None;
    }
    Some(caps.get(1)?.as_str().trim().to_string())
}
