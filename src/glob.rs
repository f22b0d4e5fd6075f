//! EditorConfig glob patterns
//!
//! Patterns are translated into a `regex::Regex`, which matches in linear
//! time, so pathological inputs such as long runs of `*` cannot blow up.
//!
//! Supported syntax:
//! - `*` any run of characters except `/`
//! - `**` any run of characters including `/` (`**/` may also match no directory)
//! - `?` a single character except `/`
//! - `[seq]`, `[!seq]`, `[^seq]` character classes with `a-z` ranges
//! - `{a,b,c}` alternatives, which may nest and contain any other construct
//! - `{n1..n2}` an optionally signed integer between `n1` and `n2`
//! - `\x` the literal character `x`

use regex::Regex;
use thiserror::Error;
use tracing::trace;

/// Error compiling a glob pattern
#[derive(Debug, Error)]
pub enum GlobError {
    #[error("invalid glob pattern '{pattern}': {source}")]
    Regex {
        pattern: String,
        source: regex::Error,
    },
}

/// A compiled glob pattern.
#[derive(Debug, Clone)]
pub struct Glob {
    pattern: String,
    regex: Regex,
}

impl Glob {
    /// Compile a pattern matched against a whole relative path.
    ///
    /// `*.py` matches `foo.py` but not `sub/foo.py`; `**/*.py` matches both.
    pub fn new(pattern: &str) -> Result<Self, GlobError> {
        Self::compile(pattern, pattern)
    }

    /// Compile a section header pattern using EditorConfig anchoring rules.
    ///
    /// A pattern without `/` matches the final path segment at any depth.
    /// A pattern containing `/` is anchored at the config file's directory,
    /// and a leading `/` is dropped.
    pub fn section(pattern: &str) -> Result<Self, GlobError> {
        if pattern.contains('/') {
            let anchored = pattern.strip_prefix('/').unwrap_or(pattern);
            Self::compile(pattern, anchored)
        } else {
            Self::compile(pattern, &format!("**/{pattern}"))
        }
    }

    fn compile(original: &str, effective: &str) -> Result<Self, GlobError> {
        let chars: Vec<char> = effective.chars().collect();
        let body = translate(&chars, true);
        let source = format!("^(?s:{body})$");
        trace!(pattern = original, regex = %source, "compiled glob");

        let regex = Regex::new(&source).map_err(|e| GlobError::Regex {
            pattern: original.to_string(),
            source: e,
        })?;

        Ok(Self {
            pattern: original.to_string(),
            regex,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Test a forward-slash separated relative path.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Translate glob characters into a regex fragment.
///
/// `segment_start` tells whether the first character begins a path segment.
fn translate(chars: &[char], segment_start: bool) -> String {
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        let at_segment_start = if i == 0 {
            segment_start
        } else {
            chars[i - 1] == '/'
        };

        match chars[i] {
            '\\' => {
                match chars.get(i + 1) {
                    Some(&next) => {
                        push_literal(&mut out, next);
                        i += 2;
                    }
                    None => {
                        out.push_str("\\\\");
                        i += 1;
                    }
                }
                continue;
            }
            '*' => {
                let mut end = i;
                while end < chars.len() && chars[end] == '*' {
                    end += 1;
                }
                if end - i == 1 {
                    out.push_str("[^/]*");
                } else if at_segment_start && chars.get(end) == Some(&'/') {
                    // `**/` also matches zero directories
                    out.push_str("(?:.*/)?");
                    end += 1;
                } else {
                    out.push_str(".*");
                }
                i = end;
                continue;
            }
            '?' => out.push_str("[^/]"),
            '[' => {
                if let Some((class, end)) = bracket_class(chars, i) {
                    out.push_str(&class);
                    i = end + 1;
                    continue;
                }
                out.push_str("\\[");
            }
            '{' => {
                if let Some(end) = matching_brace(chars, i) {
                    out.push_str(&brace(&chars[i + 1..end], at_segment_start));
                    i = end + 1;
                    continue;
                }
                out.push_str("\\{");
            }
            c => push_literal(&mut out, c),
        }
        i += 1;
    }

    out
}

/// Translate the content of a `{...}` group.
fn brace(content: &[char], segment_start: bool) -> String {
    let text: String = content.iter().collect();

    if let Some((lo, hi)) = numeric_range(&text) {
        return integer_between(lo.min(hi), lo.max(hi));
    }

    let alternatives = split_alternatives(content);
    if alternatives.len() < 2 {
        // `{single}` is taken literally
        return regex::escape(&format!("{{{text}}}"));
    }

    let translated: Vec<String> = alternatives
        .iter()
        .map(|alt| translate(alt, segment_start))
        .collect();
    format!("(?:{})", translated.join("|"))
}

/// Regex for an optionally signed integer, leading zeros allowed, whose
/// value lies in `lo..=hi`.
fn integer_between(lo: i64, hi: i64) -> String {
    let mut branches = Vec::new();
    if hi >= 0 {
        let from = lo.max(0).unsigned_abs();
        branches.push(format!("\\+?0*(?:{})", digits_between(from, hi.unsigned_abs())));
    }
    if lo <= 0 {
        let from = if hi < 0 { hi.unsigned_abs() } else { 0 };
        branches.push(format!("-0*(?:{})", digits_between(from, lo.unsigned_abs())));
    }
    format!("(?:{})", branches.join("|"))
}

/// Alternation matching the decimal form (no leading zeros) of `lo..=hi`.
fn digits_between(lo: u64, hi: u64) -> String {
    let mut parts = Vec::new();
    let mut lo = lo;
    // split into runs of equal digit count
    while lo <= hi {
        let width = lo.to_string().len();
        let run_end = 10u64
            .checked_pow(width as u32)
            .map_or(u64::MAX, |p| p - 1)
            .min(hi);
        parts.extend(same_width(
            lo.to_string().as_bytes(),
            run_end.to_string().as_bytes(),
        ));
        match run_end.checked_add(1) {
            Some(next) => lo = next,
            None => break,
        }
    }
    parts.join("|")
}

/// Patterns for the digit strings between `lo` and `hi` of equal length.
fn same_width(lo: &[u8], hi: &[u8]) -> Vec<String> {
    let (first_lo, first_hi) = (lo[0] as char, hi[0] as char);
    if lo.len() == 1 {
        return vec![format!("[{first_lo}-{first_hi}]")];
    }

    let (rest_lo, rest_hi) = (&lo[1..], &hi[1..]);
    if first_lo == first_hi {
        let inner = same_width(rest_lo, rest_hi);
        return vec![format!("{first_lo}(?:{})", inner.join("|"))];
    }

    let rest = rest_lo.len();
    let zeros = vec![b'0'; rest];
    let nines = vec![b'9'; rest];
    let mut parts = Vec::new();

    let mut full_from = lo[0];
    if rest_lo != zeros.as_slice() {
        let inner = same_width(rest_lo, &nines);
        parts.push(format!("{first_lo}(?:{})", inner.join("|")));
        full_from += 1;
    }

    let mut full_to = hi[0];
    let hi_tail = rest_hi != nines.as_slice();
    if hi_tail {
        full_to -= 1;
    }

    if full_from <= full_to {
        parts.push(format!(
            "[{}-{}][0-9]{{{rest}}}",
            full_from as char, full_to as char
        ));
    }

    if hi_tail {
        let inner = same_width(&zeros, rest_hi);
        parts.push(format!("{first_hi}(?:{})", inner.join("|")));
    }

    parts
}

fn push_literal(out: &mut String, c: char) {
    let mut buf = [0u8; 4];
    out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

/// Build a regex character class for the `[` at `start`.
///
/// Returns `None` when the bracket must be taken literally: no closing `]`,
/// an empty class, or a `/` inside the brackets.
fn bracket_class(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut i = start + 1;
    let negated = matches!(chars.get(i), Some('!') | Some('^'));
    if negated {
        i += 1;
    }
    let content_start = i;

    let mut end = None;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '/' => return None,
            ']' => {
                end = Some(i);
                break;
            }
            _ => i += 1,
        }
    }
    let end = end?;
    let content = &chars[content_start..end];
    if content.is_empty() {
        return None;
    }

    let mut class = String::from(if negated { "[^/" } else { "[" });
    let mut j = 0;
    while j < content.len() {
        let c = content[j];
        if c == '\\' {
            if let Some(&next) = content.get(j + 1) {
                push_literal(&mut class, next);
            }
            j += 2;
            continue;
        }
        let inner_dash = c == '-' && j > 0 && j + 1 < content.len();
        if inner_dash {
            class.push('-');
        } else {
            push_literal(&mut class, c);
        }
        j += 1;
    }
    class.push(']');

    Some((class, end))
}

/// Index of the `}` closing the `{` at `start`, honoring nesting and escapes.
fn matching_brace(chars: &[char], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = start;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Split brace content at top-level commas.
fn split_alternatives(content: &[char]) -> Vec<&[char]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut begin = 0;
    let mut i = 0;
    while i < content.len() {
        match content[i] {
            '\\' => i += 1,
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&content[begin..i]);
                begin = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&content[begin..]);
    parts
}

/// Parse `n1..n2` where both ends are optionally signed integers.
fn numeric_range(text: &str) -> Option<(i64, i64)> {
    let (lo, hi) = text.split_once("..")?;
    let is_int = |s: &str| {
        let digits = s.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(s);
        !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
    };
    if !is_int(lo) || !is_int(hi) {
        return None;
    }
    Some((lo.parse().ok()?, hi.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, path: &str) -> bool {
        Glob::new(pattern).unwrap().is_match(path)
    }

    fn section_matches(pattern: &str, path: &str) -> bool {
        Glob::section(pattern).unwrap().is_match(path)
    }

    #[test]
    fn test_star_stops_at_separator() {
        assert!(matches("*.py", "foo.py"));
        assert!(!matches("*.py", "sub/foo.py"));
        assert!(!matches("*.py", "foo.pyc"));
    }

    #[test]
    fn test_double_star_crosses_separators() {
        assert!(matches("**/*.py", "foo.py"));
        assert!(matches("**/*.py", "sub/foo.py"));
        assert!(matches("**/*.py", "a/b/c/foo.py"));
        assert!(matches("src/**", "src/a/b.rs"));
        assert!(matches("a/**/b", "a/b"));
        assert!(matches("a/**/b", "a/x/y/b"));
        assert!(matches("a**b", "a/x/b"));
    }

    #[test]
    fn test_question_mark() {
        assert!(matches("?.c", "a.c"));
        assert!(!matches("?.c", "ab.c"));
        assert!(!matches("a?b", "a/b"));
    }

    #[test]
    fn test_bracket_class() {
        assert!(matches("[abc].txt", "b.txt"));
        assert!(!matches("[abc].txt", "d.txt"));
        assert!(matches("[a-c]x", "bx"));
        assert!(matches("[!abc].txt", "d.txt"));
        assert!(!matches("[!abc].txt", "a.txt"));
        assert!(matches("[^abc].txt", "z.txt"));
        assert!(!matches("[!a]", "/"));
    }

    #[test]
    fn test_bracket_literal_when_unclosed_or_slash() {
        assert!(matches("[abc", "[abc"));
        assert!(matches("a[b/c]d", "a[b/c]d"));
        assert!(!matches("a[b/c]d", "abd"));
    }

    #[test]
    fn test_brace_alternatives() {
        assert!(matches("{js,ts}", "js"));
        assert!(matches("{js,ts}", "ts"));
        assert!(!matches("{js,ts}", "jsx"));
        assert!(!matches("{js,ts}", "j"));
        assert!(matches("*.{js,ts}", "app.ts"));
        assert!(matches("{a,b/*}.c", "b/x.c"));
    }

    #[test]
    fn test_brace_nested_and_empty_alternative() {
        assert!(matches("{a,{b,c}}", "c"));
        assert!(matches("x{,y}", "x"));
        assert!(matches("x{,y}", "xy"));
    }

    #[test]
    fn test_brace_single_is_literal() {
        assert!(matches("{single}", "{single}"));
        assert!(!matches("{single}", "single"));
        assert!(matches("a{b", "a{b"));
    }

    #[test]
    fn test_numeric_range() {
        assert!(matches("file{1..3}", "file1"));
        assert!(matches("file{1..3}", "file3"));
        assert!(!matches("file{1..3}", "file4"));
        assert!(!matches("file{1..3}", "file10"));
        assert!(matches("n{3..-2}", "n-1"));
        assert!(!matches("n{1..3}", "nx"));
    }

    #[test]
    fn test_numeric_range_inside_alternatives() {
        assert!(matches("{a{1..3},b}", "a2"));
        assert!(matches("{a{1..3},b}", "b"));
        assert!(!matches("{a{1..3},b}", "a4"));
        assert!(matches("{a{1..3},a*}", "a5"));
        assert!(matches("{x,y{5..7}}.log", "x.log"));
    }

    #[test]
    fn test_numeric_range_signs_and_leading_zeros() {
        assert!(matches("v{1..3}", "v+2"));
        assert!(matches("v{1..3}", "v002"));
        assert!(!matches("v{1..3}", "v-2"));
        assert!(matches("v{-3..3}", "v-0"));
        assert!(matches("v{-12..-10}", "v-11"));
        assert!(!matches("v{-12..-10}", "v-9"));
        assert!(!matches("v{-12..-10}", "v11"));
    }

    #[test]
    fn test_numeric_range_across_digit_counts() {
        assert!(!matches("f{10..250}", "f9"));
        assert!(matches("f{10..250}", "f10"));
        assert!(matches("f{10..250}", "f99"));
        assert!(matches("f{10..250}", "f199"));
        assert!(matches("f{10..250}", "f250"));
        assert!(!matches("f{10..250}", "f251"));
        assert!(!matches("f{10..250}", "f300"));
        assert!(matches("f{7..1234}", "f1009"));
        assert!(!matches("f{7..1234}", "f1235"));
    }

    #[test]
    fn test_escapes() {
        assert!(matches("\\*.txt", "*.txt"));
        assert!(!matches("\\*.txt", "a.txt"));
        assert!(matches("a\\[b]", "a[b]"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        assert!(matches("a+b(c).d$", "a+b(c).d$"));
        assert!(!matches("a.b", "axb"));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(!matches("*.PY", "foo.py"));
    }

    #[test]
    fn test_many_stars_terminate() {
        let pattern = "*".repeat(64) + "x";
        let path = "a".repeat(200);
        assert!(!matches(&pattern, &path));
    }

    #[test]
    fn test_section_basename_rule() {
        assert!(section_matches("*.py", "foo.py"));
        assert!(section_matches("*.py", "sub/deep/foo.py"));
        assert!(section_matches("Makefile", "build/Makefile"));
        assert!(!section_matches("Makefile", "Makefile.in"));
    }

    #[test]
    fn test_section_anchored_rule() {
        assert!(section_matches("lib/*.js", "lib/a.js"));
        assert!(!section_matches("lib/*.js", "src/lib/a.js"));
        assert!(section_matches("/top.txt", "top.txt"));
        assert!(!section_matches("/top.txt", "sub/top.txt"));
    }

    #[test]
    fn test_invalid_range_in_class_is_error() {
        assert!(Glob::new("[z-a]").is_err());
    }
}
