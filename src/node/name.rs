use crate::error::{XmlErrorKind, XmlResult, bail};

/// Punctuation allowed anywhere after the first character of a name.
const NAME_PUNCTUATION: [char; 3] = ['_', '-', '.'];

/// Names may not start with this prefix, in any letter case.
const RESERVED_PREFIX: &str = "xml";

/// Checks a tag or attribute name against the XML naming rules:
/// - it is not empty
/// - it starts with a letter or an underscore
/// - it does not start with `xml` (or `XML`, `Xml`, ...)
/// - it only contains letters, ASCII digits, hyphens, underscores and periods
///
/// # Example
/// ```rust
/// use xmldoc::is_valid_name;
///
/// assert!(is_valid_name("_ok-1.2"));
/// assert!(!is_valid_name("xmlFoo"));
/// assert!(!is_valid_name("1abc"));
/// ```
#[must_use]
pub fn is_valid_name(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    if !(first.is_alphabetic() || first == '_') {
        return false;
    }

    if has_reserved_prefix(candidate) {
        return false;
    }

    chars.all(|c| c.is_alphabetic() || c.is_ascii_digit() || NAME_PUNCTUATION.contains(&c))
}

/// Same as [`is_valid_name`], but raises [`XmlErrorKind::InvalidName`].
///
/// # Errors
/// Returns an error if the name is not a valid XML name.
pub fn validate_name(candidate: &str) -> XmlResult<()> {
    if !is_valid_name(candidate) {
        bail!(XmlErrorKind::InvalidName(candidate.to_string()));
    }
    Ok(())
}

fn has_reserved_prefix(candidate: &str) -> bool {
    candidate
        .get(..RESERVED_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(RESERVED_PREFIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["plano", "_ok-1.2", "componente", "teste123", "a", "Avaliação", "x"] {
            assert!(is_valid_name(name), "{name} should be valid");
        }
    }

    #[test]
    fn test_leading_character() {
        assert!(!is_valid_name("1abc"));
        assert!(!is_valid_name("-abc"));
        assert!(!is_valid_name(".abc"));
        assert!(!is_valid_name(""));
    }

    #[test]
    fn test_reserved_prefix_any_case() {
        assert!(!is_valid_name("xmlFoo"));
        assert!(!is_valid_name("XMLteste"));
        assert!(!is_valid_name("Xml"));
        assert!(is_valid_name("xm"));
        assert!(is_valid_name("xylophone"));
    }

    #[test]
    fn test_disallowed_characters() {
        assert!(!is_valid_name("with space"));
        assert!(!is_valid_name("tab\there"));
        assert!(!is_valid_name("a:b"));
        assert!(!is_valid_name("a/b"));
        assert!(!is_valid_name("per%cent"));
    }

    #[test]
    fn test_numeric_symbols_are_not_digits() {
        assert!(!is_valid_name("a½"));
        assert!(!is_valid_name("a²"));
        assert!(!is_valid_name("peso³"));
        assert!(!is_valid_name("n٣"));
        assert!(is_valid_name("peso3"));
    }

    #[test]
    fn test_validate_name_error() {
        let err = validate_name("1abc").unwrap_err();
        assert!(matches!(err.kind, XmlErrorKind::InvalidName(ref n) if n == "1abc"));
        assert!(validate_name("ok").is_ok());
    }
}
