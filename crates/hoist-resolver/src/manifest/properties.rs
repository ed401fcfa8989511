//! Minimal reader and writer for the `key=value` properties dialect the
//! packaging step emits.

use std::collections::BTreeMap;

use crate::error::ManifestError;

/// Parses properties text into a key/value map.
///
/// Supports `=` and `:` separators, `#`/`!` comment lines, blank lines, and
/// a trailing backslash joining the next physical line. Later duplicates of
/// a key replace earlier ones.
pub(crate) fn parse(text: &str) -> Result<BTreeMap<String, String>, ManifestError> {
    let mut entries = BTreeMap::new();
    let mut pending = String::new();
    let mut pending_start = 0usize;

    for (index, raw) in text.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = raw.trim_start();
        if pending.is_empty() {
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }
            pending_start = line_number;
        }

        if let Some(joined) = strip_continuation(trimmed) {
            pending.push_str(joined);
            continue;
        }
        pending.push_str(trimmed);

        let logical = std::mem::take(&mut pending);
        let (key, value) = split_entry(&logical, pending_start)?;
        entries.insert(key, value);
    }

    if !pending.is_empty() {
        let (key, value) = split_entry(&pending, pending_start)?;
        entries.insert(key, value);
    }

    Ok(entries)
}

/// Renders entries in the order given, one `key=value` per line.
pub(crate) fn render<'a>(entries: impl IntoIterator<Item = (&'a str, String)>) -> String {
    let mut text = String::new();
    for (key, value) in entries {
        text.push_str(key);
        text.push('=');
        text.push_str(&value);
        text.push('\n');
    }
    text
}

/// Returns the line without its continuation marker when it ends in an odd
/// number of backslashes.
fn strip_continuation(line: &str) -> Option<&str> {
    let trailing = line.chars().rev().take_while(|ch| *ch == '\\').count();
    if trailing.is_multiple_of(2) {
        None
    } else {
        line.strip_suffix('\\')
    }
}

fn split_entry(logical: &str, line_number: usize) -> Result<(String, String), ManifestError> {
    let Some(position) = logical.find(['=', ':']) else {
        return Err(ManifestError::malformed(format!(
            "line {line_number}: expected 'key=value', found '{logical}'"
        )));
    };
    let (key, rest) = logical.split_at(position);
    let key = key.trim();
    if key.is_empty() {
        return Err(ManifestError::malformed(format!(
            "line {line_number}: entry has an empty key"
        )));
    }
    let value = rest.get(1..).unwrap_or_default().trim();
    Ok((key.to_owned(), value.to_owned()))
}
