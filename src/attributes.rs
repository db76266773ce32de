//! Attribute extraction: which attribute names are used with which objects.
//!
//! Two passes feed one per-file map. The dotted pass picks up implicit usage
//! anywhere in the raw text (`SYNSEM.LOCAL` registers `LOCAL` under
//! `SYNSEM`); the bracket pass enumerates feature structure literals in the
//! comment-filtered token stream (`verb [ HEAD x, VAL y ]` registers `HEAD`
//! and `VAL` under `verb`). An object accumulates the union of both.

use crate::text::filter_comments;
use crate::tokenizer::{DOTTED_IDENT_PATTERN, IDENT_PATTERN, Token, TokenKind, tokenize};
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

/// Per-file mapping from object name to the attribute names seen with it.
pub type AttributeMap = HashMap<String, BTreeSet<String>>;

static DOTTED_REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"({IDENT_PATTERN})\.({DOTTED_IDENT_PATTERN})"))
        .expect("dotted reference pattern compiles")
});

/// Builds a file's AttributeMap from its full text.
pub fn extract_attributes(text: &str) -> AttributeMap {
    let mut map = AttributeMap::new();
    collect_dotted_references(text, &mut map);
    collect_bracket_literals(text, &mut map);
    map
}

fn collect_dotted_references(text: &str, map: &mut AttributeMap) {
    for caps in DOTTED_REFERENCE_RE.captures_iter(text) {
        let object = &caps[1];
        let reference = &caps[2];
        let attribute = reference.split('.').next().unwrap_or(reference);
        insert_attribute(map, object, attribute);
    }
}

fn collect_bracket_literals(text: &str, map: &mut AttributeMap) {
    let filtered = filter_comments(text);
    let tokens = tokenize(&filtered);

    // Whatever token sits directly before a `[` owns that literal, keyed by
    // its raw text. This covers nested pairs and the definition form
    // `X := Y & [ ... ]`, whose attributes pool under `&`.
    for (i, token) in tokens.iter().enumerate() {
        if tokens.get(i + 1).map(|next| next.kind) != Some(TokenKind::BracketOpen) {
            continue;
        }
        collect_literal_segments(token.text, &tokens[i + 2..], map);
    }
}

/// Scans one bracket literal's interior. Depth starts at 1; the first
/// identifier or `&` of each depth-1 comma segment is registered (base
/// name) as an attribute. Angle tokens leave the slot open.
fn collect_literal_segments(object: &str, tokens: &[Token<'_>], map: &mut AttributeMap) {
    let mut depth = 1usize;
    let mut expecting_attribute = true;

    for token in tokens {
        match token.kind {
            TokenKind::BracketOpen => {
                depth += 1;
                expecting_attribute = true;
            }
            TokenKind::BracketClose => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            TokenKind::Comma if depth == 1 => expecting_attribute = true,
            TokenKind::Ident | TokenKind::Conjunction if depth == 1 && expecting_attribute => {
                insert_attribute(map, object, token.base_name());
                expecting_attribute = false;
            }
            _ => {}
        }
    }
}

fn insert_attribute(map: &mut AttributeMap, object: &str, attribute: &str) {
    map.entry(object.to_string())
        .or_default()
        .insert(attribute.to_string());
}
