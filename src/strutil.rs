//! String helpers used to carve an input line into commands, operators and words.
//!
//! Two splitting behaviours live here and they are not interchangeable:
//!
//! - [`split_exact`] cuts at every non-overlapping occurrence of a multi-character
//!   delimiter and keeps empty fields, so joining the pieces back with the same
//!   delimiter reproduces the input.
//! - [`split_any`] cuts at runs of characters drawn from a set and never yields an
//!   empty field.
//!
//! [`split`] picks between them by delimiter length.

/// Characters treated as whitespace: `\t`, `\n`, `\v`, `\f`, `\r` and space.
pub const WHITESPACE: &str = "\t\n\x0b\x0c\r ";

/// Returns true for the ASCII whitespace characters listed in [`WHITESPACE`].
pub fn is_space(c: char) -> bool {
    matches!(c, '\t'..='\r' | ' ')
}

/// Strip leading and trailing whitespace.
pub fn trim(s: &str) -> &str {
    s.trim_matches(is_space)
}

/// Substring `[start, end)` of `s`, or `None` when the range is out of bounds,
/// reversed, or does not fall on character boundaries.
pub fn splice(s: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }
    s.get(start..end)
}

/// Split at every occurrence of `delim`, keeping empty fields.
///
/// An empty input yields no fields; an empty delimiter leaves the input whole.
pub fn split_exact(s: &str, delim: &str) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }
    if delim.is_empty() {
        return vec![s.to_string()];
    }

    let mut fields = Vec::new();
    let mut start = 0;
    while let Some(offset) = s[start..].find(delim) {
        let end = start + offset;
        if let Some(field) = splice(s, start, end) {
            fields.push(field.to_string());
        }
        start = end + delim.len();
    }
    if let Some(rest) = splice(s, start, s.len()) {
        fields.push(rest.to_string());
    }
    fields
}

/// Split at runs of any character found in `set`, dropping empty fields.
pub fn split_any(s: &str, set: &str) -> Vec<String> {
    s.split(|c: char| set.contains(c))
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split `s` by `delim`: one-character delimiters behave like [`split_any`],
/// longer ones like [`split_exact`].
pub fn split(s: &str, delim: &str) -> Vec<String> {
    if delim.chars().count() == 1 {
        split_any(s, delim)
    } else {
        split_exact(s, delim)
    }
}

/// Whitespace-separated words of `s`, with runs of whitespace collapsed.
pub fn words(s: &str) -> Vec<String> {
    split_any(trim(s), WHITESPACE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_is_idempotent() {
        for s in ["  ls -l \n", "\t\t", "", "pwd", " a b "] {
            assert_eq!(trim(trim(s)), trim(s));
        }
        assert_eq!(trim(" \t\r\n "), "");
        assert_eq!(trim("  echo hi  "), "echo hi");
    }

    #[test]
    fn test_trim_keeps_single_character() {
        assert_eq!(trim("x"), "x");
        assert_eq!(trim(" x"), "x");
    }

    #[test]
    fn test_splice_bounds() {
        assert_eq!(splice("vshell", 1, 4), Some("she"));
        assert_eq!(splice("vshell", 0, 6), Some("vshell"));
        assert_eq!(splice("vshell", 3, 3), Some(""));
        assert_eq!(splice("vshell", 4, 2), None);
        assert_eq!(splice("vshell", 0, 7), None);
    }

    #[test]
    fn test_split_exact_preserves_empty_fields() {
        assert_eq!(split_exact("a>>>b", ">>"), vec!["a", ">b"]);
        assert_eq!(split_exact("a>>>>b", ">>"), vec!["a", "", "b"]);
        assert_eq!(split_exact("ls >+", ">+"), vec!["ls ", ""]);
        assert_eq!(split_exact("ls", ">+"), vec!["ls"]);
        assert!(split_exact("", ">>").is_empty());
    }

    #[test]
    fn test_split_exact_rejoins_to_original() {
        for s in ["cat a >> b", ">>x>>", "plain", "a>>>b>>"] {
            assert_eq!(split_exact(s, ">>").join(">>"), s);
        }
    }

    #[test]
    fn test_split_any_collapses_runs() {
        assert_eq!(split_any("a   b", " "), vec!["a", "b"]);
        assert_eq!(split_any("  a  b  ", " "), vec!["a", "b"]);
        assert_eq!(split_any("ls;;pwd; ", ";"), vec!["ls", "pwd", " "]);
        assert!(split_any("   ", " ").is_empty());
        assert!(split_any("a  b ; c", " ;").iter().all(|f| !f.is_empty()));
    }

    #[test]
    fn test_split_dispatches_on_delimiter_length() {
        assert_eq!(split("a>>b", ">"), vec!["a", "b"]);
        assert_eq!(split("a>>b", ">>"), vec!["a", "b"]);
        assert_eq!(split("a>>>b", ">>"), vec!["a", ">b"]);
    }

    #[test]
    fn test_words_splits_on_any_whitespace() {
        assert_eq!(words(" ls\t-l   /tmp \n"), vec!["ls", "-l", "/tmp"]);
        assert!(words(" \t ").is_empty());
    }
}
