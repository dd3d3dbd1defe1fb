//! Template variable discovery for prompt files.
//!
//! A variable is written as `{{name}}`. The closing delimiter is the first
//! `}}` after the opener, so names can never contain `}` and there is no
//! escape syntax or nesting.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([^}]+)\}\}").expect("placeholder pattern is valid")
});

/// Result of scanning a text for placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderScan {
    /// Distinct trimmed names in order of first appearance.
    pub variables: Vec<String>,
    /// `{{` openers that are not part of any well-formed placeholder.
    pub unclosed: usize,
}

/// Returns the distinct `{{name}}` variables of `text` in first-seen order.
pub fn extract_variables(text: &str) -> Vec<String> {
    scan_placeholders(text).variables
}

pub fn scan_placeholders(text: &str) -> PlaceholderScan {
    let mut seen = HashSet::new();
    let mut variables = Vec::new();
    let mut unclosed = 0;
    let mut cursor = 0;

    for captures in PLACEHOLDER.captures_iter(text) {
        let (Some(whole), Some(inner)) = (captures.get(0), captures.get(1)) else {
            continue;
        };

        unclosed += text[cursor..whole.start()].matches("{{").count();
        cursor = whole.end();

        let name = inner.as_str().trim();
        if name.is_empty() {
            continue;
        }
        if seen.insert(name) {
            variables.push(name.to_string());
        }
    }
    unclosed += text[cursor..].matches("{{").count();

    PlaceholderScan { variables, unclosed }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_duplicates_and_trims() {
        let text = "Hello {{name}}, your {{ role }} awaits {{name}}";
        assert_eq!(extract_variables(text), vec!["name", "role"]);
    }

    #[test]
    fn plain_text_has_no_variables() {
        assert!(extract_variables("no placeholders here { } }} {").is_empty());
        assert!(extract_variables("").is_empty());
    }

    #[test]
    fn extraction_is_idempotent() {
        let text = "{{b}} then {{a}} then {{ b }} and {{c}}";
        let first = extract_variables(text);
        let second = extract_variables(text);
        assert_eq!(first, second);
        assert_eq!(first, vec!["b", "a", "c"]);
    }

    #[test]
    fn first_closing_delimiter_wins() {
        assert_eq!(extract_variables("{{a}} }}"), vec!["a"]);
        assert_eq!(extract_variables("{{outer {{inner}} }}"), vec!["outer {{inner"]);
    }

    #[test]
    fn blank_placeholders_are_ignored() {
        assert!(extract_variables("{{}} {{   }}").is_empty());
    }

    #[test]
    fn counts_unclosed_openers() {
        let scan = scan_placeholders("{{ok}} and {{broken and {{also");
        assert_eq!(scan.variables, vec!["ok"]);
        assert_eq!(scan.unclosed, 2);
    }

    #[test]
    fn brace_inside_name_breaks_the_placeholder() {
        let scan = scan_placeholders("{{a}b}}");
        assert!(scan.variables.is_empty());
        assert_eq!(scan.unclosed, 1);
    }
}
