//! Dialogue line record and its scriptable properties
//!
//! `Line` is the host document's view of one event row. Scripts reach its
//! fields through [`LineProperty`] names with `modify_line`; the text field
//! is not among them because the pass rebuilds it from the sections.

use crate::core::errors::{EditorError, Result};
use ass_sections_core::utils::parse_number;
use ass_sections_core::{Combinator, TagValue};
use core::fmt;
use core::str::FromStr;

/// One dialogue or comment line
///
/// Times are in centiseconds, the resolution of the subtitle format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    pub comment: bool,
    pub layer: i32,
    pub start_time: i64,
    pub end_time: i64,
    pub style: String,
    pub actor: String,
    pub margin_l: i32,
    pub margin_r: i32,
    pub margin_v: i32,
    pub effect: String,
    pub text: String,
}

impl Line {
    /// Dialogue line in the `Default` style
    pub fn dialogue(text: impl Into<String>) -> Self {
        Self {
            style: "Default".to_string(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the style name
    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Set start and end times in centiseconds
    #[must_use]
    pub const fn with_times(mut self, start: i64, end: i64) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }

    /// Current value of a property
    pub fn get(&self, property: LineProperty) -> TagValue {
        match property {
            LineProperty::Layer => TagValue::from(self.layer),
            LineProperty::StartTime => TagValue::Number(self.start_time as f64),
            LineProperty::EndTime => TagValue::Number(self.end_time as f64),
            LineProperty::Style => TagValue::from(self.style.as_str()),
            LineProperty::Actor => TagValue::from(self.actor.as_str()),
            LineProperty::MarginL => TagValue::from(self.margin_l),
            LineProperty::MarginR => TagValue::from(self.margin_r),
            LineProperty::MarginV => TagValue::from(self.margin_v),
            LineProperty::Effect => TagValue::from(self.effect.as_str()),
            LineProperty::Comment => TagValue::from(i32::from(self.comment)),
        }
    }

    /// Store a value in a property
    ///
    /// Numeric properties round to the nearest integer and accept numeric
    /// text; text properties take the value's textual form.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidPropertyValue`] for non-numeric text in
    /// a numeric property.
    pub fn set(&mut self, property: LineProperty, value: &TagValue) -> Result<()> {
        match property {
            LineProperty::Layer => self.layer = int32(property, value)?,
            LineProperty::StartTime => self.start_time = integer(property, value)?,
            LineProperty::EndTime => self.end_time = integer(property, value)?,
            LineProperty::Style => self.style = value.to_string(),
            LineProperty::Actor => self.actor = value.to_string(),
            LineProperty::MarginL => self.margin_l = int32(property, value)?,
            LineProperty::MarginR => self.margin_r = int32(property, value)?,
            LineProperty::MarginV => self.margin_v = int32(property, value)?,
            LineProperty::Effect => self.effect = value.to_string(),
            LineProperty::Comment => {
                self.comment = match value.as_text().map(str::trim) {
                    Some("true") => true,
                    Some("false") => false,
                    _ => integer(property, value)? != 0,
                };
            }
        }
        Ok(())
    }

    /// Apply a combinator to a property's current value
    ///
    /// # Errors
    ///
    /// Propagates combinator arity errors and rejects results that are not
    /// exactly one storable value.
    pub fn apply(&mut self, property: LineProperty, combinator: &Combinator) -> Result<()> {
        let values = combinator.apply(&[self.get(property)])?;
        match values.as_slice() {
            [value] => self.set(property, value),
            _ => Err(EditorError::invalid_value(
                property,
                TagValue::join_params(&values, false),
            )),
        }
    }
}

fn integer(property: LineProperty, value: &TagValue) -> Result<i64> {
    let number = match value {
        TagValue::Number(n) => Some(*n),
        TagValue::Text(text) => parse_number(text),
    };
    number
        .filter(|n| n.is_finite())
        .map(|n| n.round() as i64)
        .ok_or_else(|| EditorError::invalid_value(property, value))
}

/// Layer and margins are 32-bit; larger results are rejected, not wrapped
fn int32(property: LineProperty, value: &TagValue) -> Result<i32> {
    i32::try_from(integer(property, value)?)
        .map_err(|_| EditorError::invalid_value(property, value))
}

/// Line fields scripts can change with `modify_line`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineProperty {
    Layer,
    StartTime,
    EndTime,
    Style,
    Actor,
    MarginL,
    MarginR,
    MarginV,
    Effect,
    Comment,
}

impl LineProperty {
    /// Every property, in field order
    pub const ALL: [Self; 10] = [
        Self::Layer,
        Self::StartTime,
        Self::EndTime,
        Self::Style,
        Self::Actor,
        Self::MarginL,
        Self::MarginR,
        Self::MarginV,
        Self::Effect,
        Self::Comment,
    ];

    /// Canonical script name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Layer => "layer",
            Self::StartTime => "start_time",
            Self::EndTime => "end_time",
            Self::Style => "style",
            Self::Actor => "actor",
            Self::MarginL => "margin_l",
            Self::MarginR => "margin_r",
            Self::MarginV => "margin_v",
            Self::Effect => "effect",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for LineProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LineProperty {
    type Err = EditorError;

    fn from_str(name: &str) -> Result<Self> {
        let property = match name {
            "layer" => Self::Layer,
            "start" | "start_time" => Self::StartTime,
            "end" | "end_time" => Self::EndTime,
            "style" => Self::Style,
            "actor" | "name" => Self::Actor,
            "margin_l" => Self::MarginL,
            "margin_r" => Self::MarginR,
            "margin_v" | "margin_t" | "margin_b" => Self::MarginV,
            "effect" => Self::Effect,
            "comment" => Self::Comment,
            _ => {
                return Err(EditorError::UnknownLineProperty {
                    name: name.to_string(),
                })
            }
        };
        Ok(property)
    }
}
