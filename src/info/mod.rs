//! INFO reply parser
//!
//! Turns the text block returned by `INFO` into ordered `(key, value)` pairs.
//! Section headers (`# Server`), blank lines and anything that is not
//! `key:value` are skipped. Values are returned untouched; deciding whether a
//! value is a record (`keys=1,expires=0`) is up to the catalog.

/// One `key:value` line of an INFO reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoField<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

/// Parse an INFO reply, preserving source order
pub fn parse_info(text: &str) -> Vec<InfoField<'_>> {
    text.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<InfoField<'_>> {
    let line = line.trim_end_matches('\r');
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    // Split on the first colon only: values such as `executable:/usr/bin/redis`
    // or `slave0:ip=...,port=6380` may contain more.
    let (key, value) = line.split_once(':')?;
    if key.is_empty() || key.contains(char::is_whitespace) {
        tracing::debug!(line, "skipping malformed INFO line");
        return None;
    }

    Some(InfoField {
        key,
        value: value.trim(),
    })
}
