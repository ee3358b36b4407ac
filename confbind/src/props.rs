//! Line-oriented `key=value` property serialization.
//!
//! This is the one textual format the crate writes: an optional leading `#`
//! comment line followed by one `key=value` line per entry. Escaping follows
//! the classic properties conventions (backslash escapes for separators and
//! whitespace, `\uXXXX` for non-ASCII), so everything [`write_props`] emits
//! is recovered exactly by [`parse_props`].

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::iter::Peekable;
use std::path::Path;

use crate::error::{BindError, BindResult, unreachable_invariant};

/// Ordered key/value configuration data with unique keys.
pub type PropertyMap = BTreeMap<String, String>;

/// Comment line written at the top of every file this crate persists.
pub(crate) const FILE_COMMENT: &str = "written by confbind";

/// Serialize `data` into `out` in the textual property format.
///
/// The mapping is only borrowed; callers keep ownership of their data.
///
/// # Errors
///
/// Returns the underlying [`io::Error`] when writing to `out` fails.
pub fn write_props<W: Write>(mut out: W, data: &PropertyMap, comment: Option<&str>) -> io::Result<()> {
    out.write_all(&to_bytes(data, comment))
}

/// Serialize `data` into an in-memory buffer in the textual property format.
#[must_use]
pub fn to_bytes(data: &PropertyMap, comment: Option<&str>) -> Vec<u8> {
    let mut text = String::new();
    if let Some(comment) = comment {
        text.push('#');
        text.push_str(comment);
        text.push('\n');
    }
    for (key, value) in data {
        escape_into(&mut text, key, true);
        text.push('=');
        escape_into(&mut text, value, false);
        text.push('\n');
    }
    text.into_bytes()
}

/// Read a property file from disk.
///
/// # Errors
///
/// Returns [`BindError::Io`] when the file cannot be read and
/// [`BindError::Parse`] when its content is malformed.
pub fn load_props(path: &Path) -> BindResult<PropertyMap> {
    let text = fs::read_to_string(path).map_err(|e| BindError::io(path, e))?;
    parse_props(&text)
}

/// Parse textual property data back into a mapping.
///
/// Blank lines and lines starting with `#` or `!` are skipped. A trailing
/// unescaped backslash continues the entry on the next line, with that
/// line's leading whitespace ignored. Keys end at the first unescaped `=`,
/// `:`, or whitespace run; a line without any separator becomes a key with
/// an empty value.
///
/// # Errors
///
/// Returns [`BindError::Parse`] when a `\u` escape is malformed or encodes
/// an unpaired surrogate.
pub fn parse_props(text: &str) -> BindResult<PropertyMap> {
    let mut props = PropertyMap::new();
    let mut logical = String::new();
    let mut entry_line = 0;
    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim_start_matches([' ', '\t', '\x0c']);
        if logical.is_empty() {
            if line.is_empty() || line.starts_with(['#', '!']) {
                continue;
            }
            entry_line = line_no;
        }
        if has_continuation(line) {
            if let Some(head) = line.strip_suffix('\\') {
                logical.push_str(head);
            }
            continue;
        }
        logical.push_str(line);
        let (key, value) = split_entry(&logical, entry_line)?;
        props.insert(key, value);
        logical.clear();
    }
    if !logical.is_empty() {
        // Continuation marker on the final line: the entry ends at EOF.
        let (key, value) = split_entry(&logical, entry_line)?;
        props.insert(key, value);
    }
    Ok(props)
}

/// Append `text` to `out` with property-format escaping.
///
/// Keys escape every space; values only a leading one, matching the format's
/// reader which trims whitespace around the separator but nowhere else.
fn escape_into(out: &mut String, text: &str, escape_spaces: bool) {
    let mut leading = true;
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(ch);
            }
            ' ' if escape_spaces || leading => out.push_str("\\ "),
            ch if ch.is_ascii_graphic() || ch == ' ' => out.push(ch),
            ch => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{unit:04x}"));
                }
            }
        }
        leading = false;
    }
}

/// Whether `line` ends in an unescaped backslash (an odd-length run).
fn has_continuation(line: &str) -> bool {
    let trailing = line.chars().rev().take_while(|&ch| ch == '\\').count();
    trailing & 1 == 1
}

/// Split one logical line into a decoded key and value.
fn split_entry(line: &str, line_no: usize) -> BindResult<(String, String)> {
    let mut key = String::new();
    let mut value = String::new();
    let mut in_value = false;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_value {
            match ch {
                '\\' => value.push(decode_escape(&mut chars, line_no)?),
                other => value.push(other),
            }
            continue;
        }
        match ch {
            '\\' => key.push(decode_escape(&mut chars, line_no)?),
            '=' | ':' => {
                skip_inline_whitespace(&mut chars);
                in_value = true;
            }
            ' ' | '\t' | '\x0c' => {
                skip_inline_whitespace(&mut chars);
                if chars.next_if(|next| matches!(*next, '=' | ':')).is_some() {
                    skip_inline_whitespace(&mut chars);
                }
                in_value = true;
            }
            other => key.push(other),
        }
    }
    Ok((key, value))
}

fn skip_inline_whitespace<I: Iterator<Item = char>>(chars: &mut Peekable<I>) {
    while chars
        .next_if(|next| matches!(*next, ' ' | '\t' | '\x0c'))
        .is_some()
    {}
}

/// Decode the character following a backslash.
///
/// Unknown escapes collapse to the escaped character itself; a backslash at
/// the very end of input stands for itself.
fn decode_escape<I: Iterator<Item = char>>(chars: &mut I, line_no: usize) -> BindResult<char> {
    let Some(ch) = chars.next() else {
        return Ok('\\');
    };
    match ch {
        't' => Ok('\t'),
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        'f' => Ok('\x0c'),
        'u' => decode_unicode(chars, line_no),
        other => Ok(other),
    }
}

/// Decode a `\uXXXX` escape, consuming a second escape for surrogate pairs.
fn decode_unicode<I: Iterator<Item = char>>(chars: &mut I, line_no: usize) -> BindResult<char> {
    let unit = read_code_unit(chars, line_no)?;
    let mut units = vec![unit];
    if (0xD800..=0xDBFF).contains(&unit) {
        if chars.next() != Some('\\') || chars.next() != Some('u') {
            return Err(BindError::parse(line_no, "unpaired surrogate in \\u escape"));
        }
        units.push(read_code_unit(chars, line_no)?);
    }
    char::decode_utf16(units)
        .next()
        .and_then(Result::ok)
        .ok_or_else(|| BindError::parse(line_no, "invalid \\u escape"))
}

fn read_code_unit<I: Iterator<Item = char>>(chars: &mut I, line_no: usize) -> BindResult<u16> {
    let mut unit: u16 = 0;
    for _ in 0..4 {
        let digit = chars
            .next()
            .and_then(|ch| ch.to_digit(16))
            .ok_or_else(|| BindError::parse(line_no, "\\u escape needs four hex digits"))?;
        // to_digit(16) yields at most 15.
        let Ok(nibble) = u16::try_from(digit) else {
            unreachable_invariant()
        };
        unit = (unit << 4) | nibble;
    }
    Ok(unit)
}
