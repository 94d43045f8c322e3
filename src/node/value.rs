use chrono::{DateTime, SecondsFormat, Utc};

/// A scalar held by an attribute, or by a tag without children.
///
/// The variant decides how the value is rendered:
///
/// | variant     | tag text | [`Value::as_text`] | [`Value::display_value`] |
/// |-------------|----------|--------------------|--------------------------|
/// | `String`    | `abc`    | `abc`              | `"abc"`                  |
/// | `Integer`   | `33`     | `33`               | `33`                     |
/// | `Float`     | `6.0`    | `6.0`              | `6.0`                    |
/// | `Boolean`   | `true`   | `TRUE`             | `TRUE`                   |
/// | `Timestamp` | RFC 3339 | RFC 3339           | `"RFC 3339"`             |
/// | `Other`     | `abc`    | `abc`              | `"abc"`                  |
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text
    String(String),

    /// Whole number
    Integer(i64),

    /// Floating-point number
    Float(f64),

    /// Rendered in upper case in attributes
    Boolean(bool),

    /// A point in time, rendered as RFC 3339 with a `Z` suffix
    Timestamp(DateTime<Utc>),

    /// Anything else, kept in its string form
    Other(String),
}
impl Value {
    /// Wraps any displayable value as [`Value::Other`].
    pub fn other(value: impl std::fmt::Display) -> Self {
        Self::Other(value.to_string())
    }

    /// The value as returned by attribute lookups.
    /// Same as the tag text, except booleans are upper case.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Boolean(b) => b.to_string().to_uppercase(),
            _ => self.to_string(),
        }
    }

    /// The value as written in an attribute, with delimiters where needed:
    /// strings and unknown types are quoted, numbers and booleans are not.
    #[must_use]
    pub fn display_value(&self) -> String {
        match self {
            Self::Integer(_) | Self::Float(_) | Self::Boolean(_) => self.as_text(),
            Self::String(_) | Self::Timestamp(_) | Self::Other(_) => format!("\"{self}\""),
        }
    }
}
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) | Self::Other(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),

            // Debug keeps the fractional part of whole numbers: 6.0, not 6
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Timestamp(t) => f.write_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}
impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}
impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}
impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}
impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}
impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_tag_text() {
        assert_eq!(Value::from("Dissertação").to_string(), "Dissertação");
        assert_eq!(Value::from(42.0).to_string(), "42.0");
        assert_eq!(Value::from(23.5).to_string(), "23.5");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(1001).to_string(), "1001");
    }

    #[test]
    fn test_as_text() {
        assert_eq!(Value::from(false).as_text(), "FALSE");
        assert_eq!(Value::from("yellow").as_text(), "yellow");
        assert_eq!(Value::from(5).as_text(), "5");
    }

    #[test]
    fn test_display_value() {
        assert_eq!(Value::from("80%").display_value(), "\"80%\"");
        assert_eq!(Value::from(33).display_value(), "33");
        assert_eq!(Value::from(6.0).display_value(), "6.0");
        assert_eq!(Value::from(true).display_value(), "TRUE");
        assert_eq!(Value::other('c').display_value(), "\"c\"");
    }

    #[test]
    fn test_timestamp() {
        let when = Utc.with_ymd_and_hms(2024, 5, 5, 10, 30, 0).unwrap();
        let value = Value::from(when);
        assert_eq!(value.to_string(), "2024-05-05T10:30:00Z");
        assert_eq!(value.display_value(), "\"2024-05-05T10:30:00Z\"");
    }
}
