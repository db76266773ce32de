use crate::text::Position;
use crate::workspace::Workspace;
use std::sync::OnceLock;
use url::Url;

/// A small grammar exercising every indexed construct: feature structures,
/// dotted paths, doc blocks, tags, and comments.
pub const SAMPLE_GRAMMAR: &str = "\
; core types for the sample grammar
sign := *top* &
\"\"\" The basic <sign> unit. \"\"\" .
agr [ PER per, NUM num, GEND gend ]
verb-lex := sign.
phrase [ HEAD #head, DTRS < #left #right >, AGR agr ]
synsem.LOCAL.CAT
; marker registry: #head is shared above
";

static SAMPLE_WORKSPACE: OnceLock<Workspace> = OnceLock::new();

/// A workspace with [`SAMPLE_GRAMMAR`] indexed under [`sample_uri`].
pub fn sample_workspace() -> &'static Workspace {
    SAMPLE_WORKSPACE.get_or_init(|| {
        let mut ws = Workspace::new();
        let uri = sample_uri();
        ws.update_file(uri.clone(), SAMPLE_GRAMMAR);
        ws.index_tags(&uri, SAMPLE_GRAMMAR);
        ws
    })
}

pub fn sample_uri() -> Url {
    Url::parse("file:///grammar/sample.tdl").expect("sample URL parses")
}

/// Line/column of the first occurrence of `needle` in `source`.
pub fn position_of(source: &str, needle: &str) -> Position {
    let offset = source
        .find(needle)
        .unwrap_or_else(|| panic!("needle not found: {needle}"));
    let mut line = 0;
    let mut column = 0;
    for ch in source[..offset].chars() {
        if ch == '\n' {
            line += 1;
            column = 0;
        } else {
            column += ch.len_utf8();
        }
    }
    Position::new(line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_grammar_indexes_every_construct() {
        let ws = sample_workspace();

        let agr: Vec<&str> = ws
            .attributes_for("agr")
            .expect("agr indexed")
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(agr, vec!["GEND", "NUM", "PER"]);

        let phrase: Vec<&str> = ws
            .attributes_for("phrase")
            .expect("phrase indexed")
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(phrase, vec!["AGR", "DTRS", "HEAD"]);

        let synsem: Vec<&str> = ws
            .attributes_for("synsem")
            .expect("synsem indexed")
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(synsem, vec!["LOCAL"]);

        let mut defined: Vec<&str> = ws.definition_names().collect();
        defined.sort_unstable();
        assert_eq!(defined, vec!["sign", "verb-lex"]);
        assert_eq!(ws.documentation("sign"), Some("The basic <sign> unit."));
        assert_eq!(
            ws.tags().collect::<Vec<_>>(),
            vec!["head", "left", "right"]
        );
    }

    #[test]
    fn position_of_counts_lines_and_byte_columns() {
        assert_eq!(position_of("ab\ncdé f", "f"), Position::new(1, 5));
    }
}
