use crate::text::{Position, Range, SourceLocation, word_at};
use crate::workspace::Workspace;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverResult {
    pub range: Range,
    pub contents: String,
}

/// Returns the doc block registered for the identifier under `position`.
///
/// The file must have been indexed; hover reads the stored text rather than
/// trusting the host to resend it. Contents are markdown with angle brackets
/// escaped so list notation inside doc blocks renders literally.
pub fn hover(workspace: &Workspace, uri: &Url, position: Position) -> Option<HoverResult> {
    let text = workspace.file_text(uri)?;
    let locator = SourceLocation::new(text);
    let offset = locator.offset_at(position);
    let span = word_at(text, offset, workspace.limits().word_window)?;
    let contents = workspace.documentation(&text[span.clone()])?;

    Some(HoverResult {
        range: Range::new(
            locator.position_at(span.start),
            locator.position_at(span.end),
        ),
        contents: escape_markdown(contents),
    })
}

fn escape_markdown(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::position_of;

    const SOURCE: &str =
        "sign := *top* &\n\"\"\" The basic <sign> unit. \"\"\" .\nsign [ HEAD noun ]\n";

    fn fixture() -> (Workspace, Url) {
        let mut ws = Workspace::new();
        let uri = Url::parse("file:///grammar/core.tdl").unwrap();
        ws.update_file(uri.clone(), SOURCE);
        (ws, uri)
    }

    #[test]
    fn hover_shows_escaped_documentation() {
        let (ws, uri) = fixture();
        let result = hover(&ws, &uri, position_of(SOURCE, "sign [")).expect("hover expected");
        assert_eq!(result.contents, "The basic &lt;sign&gt; unit.");
        assert_eq!(
            result.range,
            Range::new(Position::new(2, 0), Position::new(2, 4))
        );
    }

    #[test]
    fn hover_resolves_from_inside_the_word() {
        let (ws, uri) = fixture();
        let mut position = position_of(SOURCE, "sign [");
        position.column += 2;
        let result = hover(&ws, &uri, position).expect("hover expected");
        assert_eq!(result.range.start, Position::new(2, 0));
    }

    #[test]
    fn hover_returns_none_for_undocumented_names() {
        let (ws, uri) = fixture();
        assert!(hover(&ws, &uri, position_of(SOURCE, "noun")).is_none());
    }

    #[test]
    fn hover_returns_none_for_unindexed_files() {
        let (ws, _) = fixture();
        let other = Url::parse("file:///grammar/other.tdl").unwrap();
        assert!(hover(&ws, &other, Position::new(0, 0)).is_none());
    }

    #[test]
    fn hover_returns_none_for_invalid_position() {
        let (ws, uri) = fixture();
        assert!(hover(&ws, &uri, Position::new(999, 0)).is_none());
    }
}
