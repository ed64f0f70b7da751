use crate::common::*;

/// Collapse every whitespace run into a single space and trim both ends.
pub fn normalize_line(line: &str) -> String {
    line.split_whitespace().join(" ")
}

/// Split text into lines.
///
/// Besides `\n` and `\r\n`, a bare `\r` and the other Unicode line
/// separators also end a line. A trailing line break does not produce an
/// empty last line.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> + '_ {
    let text = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix(is_line_break))
        .unwrap_or(text);
    text.lines().flat_map(|line| line.split(is_line_break))
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Read a text file, reporting a missing file as [`Error::NotFound`].
pub fn read_text_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::NotFound {
            path: path.to_owned(),
        });
    }
    fs::read_to_string(path).map_err(|err| Error::from_io(path, err))
}
