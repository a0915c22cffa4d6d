//! LSP request handlers.

pub mod completion;
pub mod definition;

use lsp_types::Position;

/// Map an LSP language id onto the filetype names the engine's argument
/// resolver understands.
pub(crate) fn filetype_for(language_id: &str) -> &'static str {
    match language_id {
        "cpp" | "c++" => "cpp",
        "objective-c" | "objc" => "objc",
        "objective-cpp" | "objcpp" => "objcpp",
        _ => "c",
    }
}

/// The `line`-th (0-based) line of `source`, without its terminator.
pub(crate) fn get_line(source: &str, line: usize) -> &str {
    source.lines().nth(line).unwrap_or("")
}

/// Convert an LSP UTF-16 code-unit column into a byte offset within
/// `line`. Offsets past the end of the line clamp to its length.
pub(crate) fn byte_offset(line: &str, character: u32) -> usize {
    let mut units: u32 = 0;
    for (i, c) in line.char_indices() {
        if units >= character {
            return i;
        }
        units += if c.len_utf16() == 2 { 2 } else { 1 };
    }
    line.len()
}

/// The identifier prefix immediately before the cursor, plus the engine's
/// 1-based (line, byte column) pointing at where that prefix starts.
///
/// The front-end wants the query position at the start of the partial
/// identifier; the prefix itself is filtered engine-side.
pub(crate) fn query_position<'a>(
    source: &'a str,
    position: Position,
) -> (&'a str, u32, u32) {
    let line = get_line(source, position.line as usize);
    let col = byte_offset(line, position.character);
    let before_cursor = &line[..col];

    let prefix_start = before_cursor
        .char_indices()
        .rev()
        .find(|(_, c)| !c.is_alphanumeric() && *c != '_')
        .map_or(0, |(i, c)| i + c.len_utf8());
    let prefix = &before_cursor[prefix_start..];

    (
        prefix,
        position.line + 1,
        u32::try_from(prefix_start).unwrap_or(0) + 1,
    )
}
