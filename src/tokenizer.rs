//! Lexical scanning for TDL source text.
//!
//! The token stream is flat: identifier runs (optionally `#`-prefixed and
//! dot-segmented) interleaved with the six structural characters that matter
//! to feature structures. No nesting is built here; extraction passes walk
//! the stream with their own depth tracking.

use regex::Regex;
use std::sync::LazyLock;

/// One undotted identifier run.
pub(crate) const IDENT_PATTERN: &str = r"[A-Za-z0-9_+*\-]+";
/// An identifier run with optional dotted suffixes, e.g. `HCONS.LIST`.
pub(crate) const DOTTED_IDENT_PATTERN: &str = r"[A-Za-z0-9_+*\-]+(?:\.[A-Za-z0-9_+*\-]+)*";

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"#?{DOTTED_IDENT_PATTERN}|\[|\]|<|>|,|&")).expect("token pattern compiles")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Identifier run, optionally `#`-prefixed and dot-segmented.
    Ident,
    /// `[`
    BracketOpen,
    /// `]`
    BracketClose,
    /// `<`
    AngleOpen,
    /// `>`
    AngleClose,
    /// `,`
    Comma,
    /// `&`
    Conjunction,
}

/// A token with its source text and byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
}

impl<'a> Token<'a> {
    /// The token text stripped of a leading `#` and truncated at the first
    /// `.`. This is the form under which names enter the attribute tables.
    pub fn base_name(&self) -> &'a str {
        let name = self.text.strip_prefix('#').unwrap_or(self.text);
        match name.find('.') {
            Some(dot) => &name[..dot],
            None => name,
        }
    }
}

/// Scans text into an ordered token stream. Unrecognized characters are
/// skipped; order and adjacency are the only structure preserved.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| Token {
            kind: classify(m.as_str()),
            text: m.as_str(),
            offset: m.start(),
        })
        .collect()
}

fn classify(text: &str) -> TokenKind {
    match text {
        "[" => TokenKind::BracketOpen,
        "]" => TokenKind::BracketClose,
        "<" => TokenKind::AngleOpen,
        ">" => TokenKind::AngleClose,
        "," => TokenKind::Comma,
        "&" => TokenKind::Conjunction,
        _ => TokenKind::Ident,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn tokenizes_feature_structure_syntax() {
        let tokens = tokenize("verb := head & [ SYNSEM.LOCAL local, ARGS < #subj > ]");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(
            texts,
            vec![
                "verb",
                "head",
                "&",
                "[",
                "SYNSEM.LOCAL",
                "local",
                ",",
                "ARGS",
                "<",
                "#subj",
                ">",
                "]",
            ]
        );
    }

    #[test]
    fn classifies_structural_tokens() {
        assert_eq!(
            kinds("[ ] < > , &"),
            vec![
                TokenKind::BracketOpen,
                TokenKind::BracketClose,
                TokenKind::AngleOpen,
                TokenKind::AngleClose,
                TokenKind::Comma,
                TokenKind::Conjunction,
            ]
        );
    }

    #[test]
    fn dotted_and_tagged_identifiers_stay_single_tokens() {
        let tokens = tokenize("#coord.LIST.FIRST");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].text, "#coord.LIST.FIRST");
        assert_eq!(tokens[0].base_name(), "coord");
    }

    #[test]
    fn base_name_handles_plain_identifiers() {
        let tokens = tokenize("*top* plain");
        assert_eq!(tokens[0].base_name(), "*top*");
        assert_eq!(tokens[1].base_name(), "plain");
    }

    #[test]
    fn offsets_index_into_the_source() {
        let text = "a [b]";
        for token in tokenize(text) {
            assert_eq!(&text[token.offset..token.offset + token.text.len()], token.text);
        }
    }

    #[test]
    fn trailing_dot_is_not_part_of_an_identifier() {
        let tokens = tokenize("SYNSEM.");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "SYNSEM");
    }
}
