//! Tag key classification and filtering.

/// Raw key of tags carrying a street name.
pub const ADDR_STREET: &str = "addr:street";

/// Kind forced onto address-street tags of ways.
pub const ADDR_KIND: &str = "addr";

/// Kind used for keys without a namespace.
pub const DEFAULT_KIND: &str = "regular";

const NAMESPACE_SEPARATOR: char = ':';

/// A tag key split into its classification kind and local key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagClass {
    pub kind: String,
    pub key: String,
}

/// Splits `namespace:local` on the first separator. Keys without one get
/// `default_kind` and are returned unchanged.
pub fn classify(raw_key: &str, default_kind: &str) -> TagClass {
    match raw_key.split_once(NAMESPACE_SEPARATOR) {
        Some((namespace, local)) => TagClass {
            kind: namespace.to_string(),
            key: local.to_string(),
        },
        None => TagClass {
            kind: default_kind.to_string(),
            key: raw_key.to_string(),
        },
    }
}

pub fn is_street_name(raw_key: &str) -> bool {
    raw_key == ADDR_STREET
}

/// True if the key contains a character that is unsafe as a column key.
pub fn has_problem_chars(raw_key: &str) -> bool {
    raw_key.chars().any(|c| {
        matches!(
            c,
            '=' | '+'
                | '/'
                | '&'
                | '<'
                | '>'
                | ';'
                | '\''
                | '"'
                | '?'
                | '%'
                | '#'
                | '$'
                | '@'
                | ','
                | '.'
                | ' '
                | '\t'
                | '\r'
                | '\n'
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_splits_namespace() {
        assert_eq!(
            classify("addr:housenumber", DEFAULT_KIND),
            TagClass {
                kind: "addr".to_string(),
                key: "housenumber".to_string()
            }
        );
    }

    #[test]
    fn classify_splits_on_first_separator_only() {
        let class = classify("gnis:feature:id", DEFAULT_KIND);
        assert_eq!(class.kind, "gnis");
        assert_eq!(class.key, "feature:id");
    }

    #[test]
    fn classify_plain_key_uses_default_kind() {
        assert_eq!(
            classify("name", DEFAULT_KIND),
            TagClass {
                kind: "regular".to_string(),
                key: "name".to_string()
            }
        );
        assert_eq!(classify("name", "other").kind, "other");
    }

    #[test]
    fn problem_chars() {
        assert!(!has_problem_chars("addr:street"));
        assert!(!has_problem_chars("name_1"));
        assert!(has_problem_chars("a,b"));
        assert!(has_problem_chars("a b"));
        assert!(has_problem_chars("fixme?"));
        assert!(has_problem_chars("name.en"));
        assert!(has_problem_chars("line\nbreak"));
    }

    #[test]
    fn street_name_key_is_exact() {
        assert!(is_street_name("addr:street"));
        assert!(!is_street_name("addr:street_name"));
        assert!(!is_street_name("street"));
    }
}
