//! String clamping helpers shared by the classifier, builder and renderer.
//!
//! All lengths are counted in `char`s.

const ELLIPSIS: char = '…';

/// Trim and collapse every whitespace run to a single space.
pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse whitespace and cut to `max_len` chars, ending with `…` when cut.
pub(crate) fn clamp(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    let collapsed = collapse_whitespace(s);
    if collapsed.chars().count() <= max_len {
        return collapsed;
    }
    let mut out: String = collapsed.chars().take(max_len - 1).collect();
    out.push(ELLIPSIS);
    out
}

/// First `max` chars of `s`, without ellipsis.
pub(crate) fn take_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Cut `s` to `limit` chars and report whether anything was dropped.
pub(crate) fn limit_chars(s: &str, limit: usize) -> (String, bool) {
    if char_len(s) > limit {
        (take_chars(s, limit), true)
    } else {
        (s.to_string(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  c "), "a b c");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_clamp_short_is_untouched() {
        assert_eq!(clamp("Sign in", 20), "Sign in");
    }

    #[test]
    fn test_clamp_adds_ellipsis() {
        let out = clamp("abcdefghij", 5);
        assert_eq!(out, "abcd…");
        assert_eq!(char_len(&out), 5);
    }

    #[test]
    fn test_clamp_zero() {
        assert_eq!(clamp("abc", 0), "");
    }

    #[test]
    fn test_clamp_counts_chars_not_bytes() {
        let out = clamp("ééééé", 3);
        assert_eq!(out, "éé…");
    }

    #[test]
    fn test_limit_chars() {
        assert_eq!(limit_chars("hello", 10), ("hello".to_string(), false));
        assert_eq!(limit_chars("hello", 3), ("hel".to_string(), true));
    }
}
