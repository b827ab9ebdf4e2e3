//! Parser for the INI-like repository configuration format.
//!
//! ```text
//! # comment
//! [core]
//!     compression = false
//!     locking = true   ; trailing comment
//! ```

use super::Config;
use crate::error::{Error, Result};

/// Parses configuration text into a `Config`.
///
/// Keys outside any section, lines without `=` and unterminated section
/// headers are reported as `Error::InvalidConfig` with their line number.
pub fn parse(content: &str) -> Result<Config> {
    let mut config = Config::new();
    let mut section: Option<String> = None;

    for (number, raw_line) in content.lines().enumerate() {
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let name = rest
                .strip_suffix(']')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| invalid(number, "malformed section header"))?;
            section = Some(name.to_string());
            continue;
        }

        let section = section
            .as_deref()
            .ok_or_else(|| invalid(number, "key outside of a section"))?;
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| invalid(number, "expected `key = value`"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(invalid(number, "empty key"));
        }

        config.set(section, key, &unquote(value.trim()));
    }

    Ok(config)
}

fn invalid(line_index: usize, reason: &str) -> Error {
    Error::InvalidConfig(format!("line {}: {}", line_index + 1, reason))
}

/// Cuts a `#` or `;` comment that is not inside double quotes.
fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => in_quotes = !in_quotes,
            '#' | ';' if !in_quotes => return &line[..i],
            _ => {}
        }
    }

    line
}

/// Removes surrounding quotes and resolves `\"`, `\\`, `\n` and `\t`.
fn unquote(value: &str) -> String {
    let inner = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);

    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }
    result
}
