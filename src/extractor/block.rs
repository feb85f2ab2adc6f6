//! Block isolation and cursor-based matching.
//!
//! `find_block` bounds a `name { ... }` section with a bracket-depth counter,
//! so nested closures inside `plugins {}` or `dependencies {}` do not cut the
//! block short. Braces inside string literals and comments are ignored.

use regex::{Captures, Regex};

/// Locate the body of the first block whose opener matches `opener`.
///
/// `opener` must match up to and including the opening `{`. Returns the text
/// between the braces, or `None` when there is no opener or the block is never
/// closed.
pub fn find_block<'a>(text: &'a str, opener: &Regex) -> Option<&'a str> {
    let open = opener.find(text)?.end().checked_sub(1)?;
    if text.as_bytes().get(open) != Some(&b'{') {
        return None;
    }
    let close = matching_brace(text.as_bytes(), open)?;
    Some(&text[open + 1..close])
}

/// Index of the `}` closing the `{` at `open`.
fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            // An escaped quote outside a literal is a stray artifact, not a string start
            b'"' | b'\'' if i > 0 && bytes[i - 1] == b'\\' => {}
            quote @ (b'"' | b'\'') => {
                i = skip_string(bytes, i, quote);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = skip_line(bytes, i);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = skip_block_comment(bytes, i);
                continue;
            }
            _ => {}
        }
        i += 1;
    }

    None
}

/// Index just past the string literal starting at `start`.
///
/// Single-line literals end at the closing quote or, if unterminated, at the
/// end of the line. Triple-quoted literals may span lines.
fn skip_string(bytes: &[u8], start: usize, quote: u8) -> usize {
    let triple = [quote; 3];
    if bytes[start..].starts_with(&triple) {
        let body = start + 3;
        return find_subslice(&bytes[body..], &triple)
            .map(|offset| body + offset + 3)
            .unwrap_or(bytes.len());
    }

    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn skip_line(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|offset| start + offset)
        .unwrap_or(bytes.len())
}

fn skip_block_comment(bytes: &[u8], start: usize) -> usize {
    find_subslice(&bytes[start + 2..], b"*/")
        .map(|offset| start + 2 + offset + 2)
        .unwrap_or(bytes.len())
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Lazy, finite sequence of regex matches over one haystack.
///
/// The search position is explicit state: cloning a cursor yields an
/// independent sequence, and a fresh cursor over the same input always
/// replays the same matches.
#[derive(Debug, Clone)]
pub struct CaptureCursor<'r, 'h> {
    regex: &'r Regex,
    haystack: &'h str,
    pos: usize,
}

impl<'r, 'h> CaptureCursor<'r, 'h> {
    pub fn new(regex: &'r Regex, haystack: &'h str) -> Self {
        Self {
            regex,
            haystack,
            pos: 0,
        }
    }
}

impl<'h> Iterator for CaptureCursor<'_, 'h> {
    type Item = Captures<'h>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos > self.haystack.len() {
            return None;
        }
        let caps = self.regex.captures_at(self.haystack, self.pos)?;
        let whole = caps.get(0)?;
        self.pos = if whole.end() > whole.start() {
            whole.end()
        } else {
            // Step over the current char so an empty match cannot repeat forever
            self.haystack[whole.end()..]
                .chars()
                .next()
                .map(|c| whole.end() + c.len_utf8())
                .unwrap_or(self.haystack.len() + 1)
        };
        Some(caps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn opener(name: &str) -> Regex {
        Regex::new(&format!(r"\b{}\s*\{{", name)).unwrap()
    }

    #[test]
    fn test_find_simple_block() {
        let text = "plugins { id 'java' }\nrepositories { mavenCentral() }";
        assert_eq!(find_block(text, &opener("plugins")), Some(" id 'java' "));
    }

    #[test]
    fn test_missing_block() {
        assert_eq!(find_block("repositories {}", &opener("plugins")), None);
    }

    #[test]
    fn test_unterminated_block() {
        assert_eq!(find_block("plugins { id 'java'", &opener("plugins")), None);
    }

    #[test]
    fn test_nested_braces_do_not_truncate() {
        let text = r#"dependencies {
    implementation("a:b:1") { exclude(group = "x") }
    implementation("c:d:2")
}
tasks {}"#;
        let body = find_block(text, &opener("dependencies")).unwrap();
        assert!(body.contains("c:d:2"));
        assert!(!body.contains("tasks"));
    }

    #[test]
    fn test_braces_in_strings_and_comments_ignored() {
        let text = r#"dependencies {
    // closing } in a comment
    /* and { here */
    implementation "a:b:${v}"
    implementation '}'
    implementation("c:d:2")
}"#;
        let body = find_block(text, &opener("dependencies")).unwrap();
        assert!(body.trim_end().ends_with(r#"implementation("c:d:2")"#));
    }

    #[test]
    fn test_escaped_quotes_outside_literal() {
        let text = r#"plugins { id(\"foo\") version \"1.0\" }"#;
        assert_eq!(
            find_block(text, &opener("plugins")),
            Some(r#" id(\"foo\") version \"1.0\" "#)
        );
    }

    #[test]
    fn test_triple_quoted_string() {
        let text = "plugins {\n val s = \"\"\"\n } \n\"\"\"\n id 'x'\n}";
        let body = find_block(text, &opener("plugins")).unwrap();
        assert!(body.contains("id 'x'"));
    }

    #[test]
    fn test_first_block_wins() {
        let text = "plugins { id 'a' }\nplugins { id 'b' }";
        assert_eq!(find_block(text, &opener("plugins")), Some(" id 'a' "));
    }

    #[test]
    fn test_capture_cursor_is_restartable() {
        let regex = Regex::new(r"(\d+)").unwrap();
        let cursor = CaptureCursor::new(&regex, "a1 b22 c333");
        let first: Vec<String> = cursor.clone().map(|c| c[1].to_string()).collect();
        let second: Vec<String> = cursor.map(|c| c[1].to_string()).collect();
        assert_eq!(first, vec!["1", "22", "333"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_capture_cursor_empty_matches_terminate() {
        let regex = Regex::new(r"x*").unwrap();
        let count = CaptureCursor::new(&regex, "ab").count();
        assert_eq!(count, 3);
    }

    /// Text dense in quotes, comment markers and escapes, after a block opener
    fn arb_scanner_text() -> impl Strategy<Value = String> {
        (
            prop_oneof![Just(""), Just("plugins {"), Just("plugins { id '")],
            r#"[{}'"/*\\\n a-z()$:]{0,200}"#,
        )
            .prop_map(|(prefix, body)| format!("{}{}", prefix, body))
    }

    proptest! {
        #[test]
        fn prop_block_body_is_inside_text(text in arb_scanner_text()) {
            if let Some(body) = find_block(&text, &opener("plugins")) {
                prop_assert!(text.contains(body));
            }
        }
    }
}
