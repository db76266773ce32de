use std::ops;

/// Returns true for characters that can appear in a TDL identifier.
///
/// Identifiers cover type names, attribute names, and tag bodies alike:
/// letters, digits, `_`, `+`, `-`, and `*` (the wildcard type).
pub fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '+' | '-' | '*')
}

/// Returns the byte offset of the first unescaped `;` on a line, if any.
///
/// A `;` opens a line comment unless it is immediately preceded by a
/// backslash. Only single lines are considered; callers split beforehand.
pub fn comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    bytes
        .iter()
        .enumerate()
        .find(|&(i, &b)| b == b';' && (i == 0 || bytes[i - 1] != b'\\'))
        .map(|(i, _)| i)
}

/// Truncates a line at its first unescaped `;`.
pub fn strip_line_comment(line: &str) -> &str {
    match comment_start(line) {
        Some(i) => &line[..i],
        None => line,
    }
}

/// Rewrites text with every line truncated at its first unescaped `;`.
///
/// Line structure is preserved so token order matches the source; byte
/// offsets into the result are not comparable with the original text.
pub fn filter_comments(text: &str) -> String {
    let mut filtered = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            filtered.push('\n');
        }
        filtered.push_str(strip_line_comment(line));
    }
    filtered
}

/// Clamps an offset to the text and snaps it down to a character boundary.
pub fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// A zero-based line/column pair. Columns count bytes within the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A half-open span between two positions in one document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Precomputed line table for byte offset ↔ position conversion.
#[derive(Debug, Clone)]
pub struct SourceLocation {
    line_starts: Vec<usize>,
    len: usize,
}

impl SourceLocation {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Converts a byte offset into a position, clamping past-the-end offsets.
    pub fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        Position::new(line, offset - self.line_starts[line])
    }

    /// Converts a position into a byte offset, clamping out-of-range lines
    /// and columns rather than failing.
    pub fn offset_at(&self, position: Position) -> usize {
        let Some(&start) = self.line_starts.get(position.line) else {
            return self.len;
        };
        let end = self
            .line_starts
            .get(position.line + 1)
            .map(|&next| next - 1)
            .unwrap_or(self.len);
        (start + position.column).min(end)
    }
}

/// Locates the identifier run around a byte offset, bounded by `window`
/// characters of lookbehind and lookahead.
///
/// Returns the byte span of the word. Runs longer than the window on a side
/// are truncated, so oversized identifiers fail downstream lookups; this is
/// the intended cost bound for hover and definition queries. A word directly
/// preceded by `#` is a tag reference, which never resolves here.
pub fn word_at(text: &str, offset: usize, window: usize) -> Option<ops::Range<usize>> {
    let offset = floor_char_boundary(text, offset);

    let mut start = offset;
    for ch in text[..offset].chars().rev().take(window) {
        if !is_ident_char(ch) {
            break;
        }
        start -= ch.len_utf8();
    }

    let mut end = offset;
    for ch in text[offset..].chars().take(window) {
        if !is_ident_char(ch) {
            break;
        }
        end += ch.len_utf8();
    }

    if start == end {
        return None;
    }
    if text[..start].ends_with('#') {
        return None;
    }
    Some(start..end)
}
