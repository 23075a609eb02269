//! Whitespace cleanup around converted tags

use regex::Regex;
use std::sync::OnceLock;

struct Patterns {
    surrounded: Regex,
    trailing: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        surrounded: Regex::new(r"\s*\n\s*(<tag:[^>]+>)\s*\n\s*").expect("valid pattern"),
        trailing: Regex::new(r"(<tag:[^>]+>)\s*\n\s*").expect("valid pattern"),
    })
}

/// Collapse line breaks and indentation around canonical tags into single
/// spaces. Tag text is never changed.
pub fn normalize_whitespace(text: &str) -> String {
    let patterns = patterns();
    let pass = patterns.surrounded.replace_all(text, " ${1} ");
    patterns.trailing.replace_all(&pass, "${1} ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_on_its_own_line() {
        let text = "color:\n    <tag:theme_prop:a default=\"1\" />\n    ;";
        assert_eq!(normalize_whitespace(text), "color: <tag:theme_prop:a default=\"1\" /> ;");
    }

    #[test]
    fn test_trailing_newline() {
        let text = "color: <tag:theme_prop:a default=\"1\" />\n  ;";
        assert_eq!(normalize_whitespace(text), "color: <tag:theme_prop:a default=\"1\" /> ;");
    }

    #[test]
    fn test_text_without_tags_unchanged() {
        let text = "body {\n  color: red;\n}\n";
        assert_eq!(normalize_whitespace(text), text);
    }

    #[test]
    fn test_tag_content_untouched() {
        let text = "<tag:theme_prop:font default=\"Arial,  sans-serif\" />";
        assert_eq!(normalize_whitespace(text), text);
    }
}
