//! `.properties` file parsing.
//!
//! Supports `#` and `!` comments, `=`, `:` or whitespace separators,
//! trailing-backslash line continuation and backslash escapes (`\t`, `\n`,
//! `\r`, `\f`, `\uXXXX`; any other escaped character stands for itself).
//! Later keys replace earlier ones.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::Chars;

/// Property loading errors
#[derive(Debug, thiserror::Error)]
pub enum PropertiesError {
    #[error("IO error reading {path}: {message}")]
    Io { path: String, message: String },

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Parse properties text into a sorted map.
pub fn parse_properties(contents: &str) -> Result<BTreeMap<String, String>, PropertiesError> {
    let mut properties = BTreeMap::new();
    let mut lines = contents.lines().enumerate();

    while let Some((index, line)) = lines.next() {
        let start_line = index + 1;
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut logical = trimmed.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (key, value) = split_entry(&logical);
        if key.is_empty() {
            return Err(PropertiesError::Parse {
                line: start_line,
                message: format!("missing key in '{}'", logical.trim()),
            });
        }
        let parse_error = |message| PropertiesError::Parse {
            line: start_line,
            message,
        };
        let key = unescape(key).map_err(parse_error)?;
        let value = unescape(value).map_err(parse_error)?;
        properties.insert(key, value);
    }

    Ok(properties)
}

/// Read and parse a properties file, returning the raw bytes alongside.
pub fn load_properties(
    path: &Path,
) -> Result<(BTreeMap<String, String>, Vec<u8>), PropertiesError> {
    let bytes = fs::read(path).map_err(|e| PropertiesError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let contents = String::from_utf8(bytes.clone()).map_err(|e| PropertiesError::Parse {
        line: 0,
        message: format!("Invalid UTF-8: {}", e),
    })?;
    Ok((parse_properties(&contents)?, bytes))
}

/// An odd number of trailing backslashes continues the line.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Split a logical line into raw (still escaped) key and value.
fn split_entry(line: &str) -> (&str, &str) {
    let mut separator = None;
    let mut chars = line.char_indices();
    while let Some((at, c)) = chars.next() {
        if c == '\\' {
            chars.next();
            continue;
        }
        if c == '=' || c == ':' || c.is_whitespace() {
            separator = Some((at, c));
            break;
        }
    }

    match separator {
        None => (line, ""),
        Some((at, c)) => {
            let key = &line[..at];
            let mut rest = line[at + c.len_utf8()..].trim_start();
            // "key = value": whitespace then an explicit separator
            if c.is_whitespace() {
                if let Some(stripped) = rest.strip_prefix(['=', ':']) {
                    rest = stripped.trim_start();
                }
            }
            (key, rest)
        }
    }
}

/// Resolve backslash escapes.
fn unescape(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => out.push(unicode_escape(&mut chars)?),
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

/// Decode the code unit after `\u`, pairing a high surrogate with the
/// `\uXXXX` that must follow it.
fn unicode_escape(chars: &mut Chars<'_>) -> Result<char, String> {
    let unit = code_unit(chars)?;
    let decoded = if (0xD800..0xDC00).contains(&unit) {
        let low = match (chars.next(), chars.next()) {
            (Some('\\'), Some('u')) => code_unit(chars)?,
            _ => return Err(format!("unpaired surrogate \\u{:04X}", unit)),
        };
        char::decode_utf16([unit, low]).next().and_then(|r| r.ok())
    } else {
        char::from_u32(u32::from(unit))
    };
    decoded.ok_or_else(|| format!("invalid \\u{:04X} escape", unit))
}

fn code_unit(chars: &mut Chars<'_>) -> Result<u16, String> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("malformed \\uXXXX escape '\\u{}'", hex));
    }
    u16::from_str_radix(&hex, 16).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_separators() {
        let props = parse_properties("a=1\nb: 2\nc 3\nd = 4\n").unwrap();
        assert_eq!(props["a"], "1");
        assert_eq!(props["b"], "2");
        assert_eq!(props["c"], "3");
        assert_eq!(props["d"], "4");
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let props = parse_properties("# comment\n! also\n\n  org.gradle.caching=true\n").unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props["org.gradle.caching"], "true");
    }

    #[test]
    fn test_continuation() {
        let props = parse_properties("tasks=a,\\\n    b,\\\n    c\n").unwrap();
        assert_eq!(props["tasks"], "a,b,c");
    }

    #[test]
    fn test_escaped_backslash_is_not_continuation() {
        let props = parse_properties("dir=C:\\\\\nnext=1\n").unwrap();
        assert_eq!(props["dir"], "C:\\");
        assert_eq!(props["next"], "1");
    }

    #[test]
    fn test_escaped_backslashes_in_path() {
        let props = parse_properties("org.gradle.java.home=C:\\\\Java\\\\jdk\n").unwrap();
        assert_eq!(props["org.gradle.java.home"], "C:\\Java\\jdk");
    }

    #[test]
    fn test_unicode_escape() {
        let props = parse_properties("name=caf\\u00e9\nemoji=\\uD83D\\uDE00\n").unwrap();
        assert_eq!(props["name"], "caf\u{e9}");
        assert_eq!(props["emoji"], "\u{1F600}");
    }

    #[test]
    fn test_malformed_unicode_escape() {
        let err = parse_properties("ok=1\nbad=\\u12G4\n").unwrap_err();
        match err {
            PropertiesError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("\\u12G4"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err = parse_properties("bad=\\uD83D\n").unwrap_err();
        assert!(matches!(err, PropertiesError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_escaped_separators_stay_in_key() {
        let props = parse_properties("key\\=x=1\nmy\\ key = v\nhost\\:port:8080\n").unwrap();
        assert_eq!(props["key=x"], "1");
        assert_eq!(props["my key"], "v");
        assert_eq!(props["host:port"], "8080");
        assert_eq!(props.len(), 3);
    }

    #[test]
    fn test_control_and_separator_escapes_in_value() {
        let props = parse_properties("a=x\\ty\\nz\nurl=http\\://host\\=1\ntrail=v\\ \n").unwrap();
        assert_eq!(props["a"], "x\ty\nz");
        assert_eq!(props["url"], "http://host=1");
        assert_eq!(props["trail"], "v ");
    }

    #[test]
    fn test_key_without_value() {
        let props = parse_properties("org.gradle.parallel\n").unwrap();
        assert_eq!(props["org.gradle.parallel"], "");
    }

    #[test]
    fn test_later_key_wins() {
        let props = parse_properties("a=1\na=2\n").unwrap();
        assert_eq!(props["a"], "2");
    }

    #[test]
    fn test_missing_key() {
        let err = parse_properties("ok=1\n=oops\n").unwrap_err();
        match err {
            PropertiesError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_load_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "org.gradle.caching=true").unwrap();

        let (props, bytes) = load_properties(temp.path()).unwrap();
        assert_eq!(props["org.gradle.caching"], "true");
        assert_eq!(bytes, b"org.gradle.caching=true\n");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_properties(Path::new("/nonexistent/gradle.properties")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/gradle.properties"));
    }
}
