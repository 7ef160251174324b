//! Parameter-transform combinators
//!
//! A combinator is a reusable transform applied to the current value(s) of
//! a tag or line property. Operands are captured at construction time and the
//! current values are supplied at application time.
//!
//! # Arity
//!
//! `Add` and `Multiply` match operands to parameters positionally and require
//! both lists to have the same length; `Append` works on exactly one value.
//! A mismatch is a usage error reported as [`CoreError::ArityMismatch`].

use crate::utils::{CoreError, Result};
use crate::values::TagValue;

/// Parameter transform with captured operands
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Combinator {
    /// Elementwise numeric sum
    Add(Vec<TagValue>),
    /// Elementwise numeric product
    Multiply(Vec<TagValue>),
    /// Ignore the current value and produce these values
    Replace(Vec<TagValue>),
    /// Concatenate a suffix to a single textual value
    Append(String),
}

/// Build an elementwise addition combinator
pub fn add<I, V>(values: I) -> Combinator
where
    I: IntoIterator<Item = V>,
    V: Into<TagValue>,
{
    Combinator::Add(values.into_iter().map(Into::into).collect())
}

/// Build an elementwise multiplication combinator
pub fn multiply<I, V>(values: I) -> Combinator
where
    I: IntoIterator<Item = V>,
    V: Into<TagValue>,
{
    Combinator::Multiply(values.into_iter().map(Into::into).collect())
}

/// Build a combinator that always yields `value`
pub fn replace<V: Into<TagValue>>(value: V) -> Combinator {
    Combinator::Replace(vec![value.into()])
}

/// Build a combinator that always yields `values` (multi-parameter tags)
pub fn replace_all<I, V>(values: I) -> Combinator
where
    I: IntoIterator<Item = V>,
    V: Into<TagValue>,
{
    Combinator::Replace(values.into_iter().map(Into::into).collect())
}

/// Build a combinator appending `suffix` to a textual value
pub fn append<S: Into<String>>(suffix: S) -> Combinator {
    Combinator::Append(suffix.into())
}

impl Combinator {
    /// Short name used in diagnostics
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Multiply(_) => "multiply",
            Self::Replace(_) => "replace",
            Self::Append(_) => "append",
        }
    }

    /// Number of parameters the combinator expects, if it constrains it
    #[must_use]
    pub fn arity(&self) -> Option<usize> {
        match self {
            Self::Add(values) | Self::Multiply(values) => Some(values.len()),
            Self::Append(_) => Some(1),
            Self::Replace(_) => None,
        }
    }

    /// Apply the transform to the current parameter values
    ///
    /// ```rust
    /// # use ass_sections_core::combinator::{add, append};
    /// # use ass_sections_core::TagValue;
    /// let moved = add([1.0, 2.0]).apply(&[3.0.into(), 4.0.into()]).unwrap();
    /// assert_eq!(moved, vec![TagValue::Number(4.0), TagValue::Number(6.0)]);
    ///
    /// let shouted = append("!").apply(&["hi".into()]).unwrap();
    /// assert_eq!(shouted, vec![TagValue::from("hi!")]);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ArityMismatch`] when the number of current values
    /// differs from what the combinator expects.
    pub fn apply(&self, current: &[TagValue]) -> Result<Vec<TagValue>> {
        if let Some(expected) = self.arity() {
            if expected != current.len() {
                return Err(CoreError::arity(self.name(), expected, current.len()));
            }
        }

        let result = match self {
            Self::Add(operands) => elementwise(current, operands, |a, b| a + b),
            Self::Multiply(operands) => elementwise(current, operands, |a, b| a * b),
            Self::Replace(values) => values.clone(),
            Self::Append(suffix) => current
                .iter()
                .map(|value| TagValue::Text(format!("{value}{suffix}")))
                .collect(),
        };
        Ok(result)
    }
}

fn elementwise(current: &[TagValue], operands: &[TagValue], op: fn(f64, f64) -> f64) -> Vec<TagValue> {
    current
        .iter()
        .zip(operands)
        .map(|(value, operand)| TagValue::Number(op(value.to_number(), operand.to_number())))
        .collect()
}
