//! Tag parameter values
//!
//! A resolved property is either a number or a piece of text. Parenthesized
//! parameters (`\pos(1,2)`, `\clip(m 0 0 l 5 5)`) are kept as raw text and
//! decomposed on demand into positional values.

use crate::utils::{format_number, parse_number};
use core::fmt;

/// Single value of an override-tag parameter or line property
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TagValue {
    /// Numeric parameter (`\fs20`, `\bord2.5`)
    Number(f64),
    /// Textual parameter (`\fnArial`, `\c&H00FF00&`, `(1,2)`)
    Text(String),
}

impl TagValue {
    /// Build a value from raw parameter text, coercing numeric-looking text
    #[must_use]
    pub fn from_param(raw: &str) -> Self {
        parse_number(raw).map_or_else(|| Self::Text(raw.to_string()), Self::Number)
    }

    /// Numeric view of the value; non-numeric text counts as zero
    #[must_use]
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(text) => parse_number(text).unwrap_or(0.0),
        }
    }

    /// Get the text if this is a textual value
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(text) => Some(text),
        }
    }

    /// Check whether the value is a parenthesized tuple such as `(1,2)`
    #[must_use]
    pub fn is_parenthesized(&self) -> bool {
        self.as_text()
            .is_some_and(|text| text.starts_with('(') && text.ends_with(')') && text.len() >= 2)
    }

    /// Decompose the value into positional parameters
    ///
    /// Parenthesized text is split on commas with each piece coerced to a
    /// number when numeric; any other value is returned as a single element.
    ///
    /// ```rust
    /// # use ass_sections_core::TagValue;
    /// let pos = TagValue::Text("(100,200.5)".into());
    /// assert_eq!(pos.decompose(), vec![TagValue::Number(100.0), TagValue::Number(200.5)]);
    /// ```
    #[must_use]
    pub fn decompose(&self) -> Vec<Self> {
        match self {
            Self::Text(text) if self.is_parenthesized() => text[1..text.len() - 1]
                .split(',')
                .map(Self::from_param)
                .collect(),
            other => vec![other.clone()],
        }
    }

    /// Render a parameter list back into tag text
    ///
    /// Numbers use [`format_number`]. Several values, or `parenthesized`,
    /// produce the `(a,b,...)` form.
    #[must_use]
    pub fn join_params(values: &[Self], parenthesized: bool) -> String {
        let body = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        if parenthesized || values.len() > 1 {
            format!("({body})")
        } else {
            body
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for TagValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for TagValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
