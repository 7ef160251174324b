//! Property state resolution
//!
//! The state visible while a section runs is the line's default state with
//! the override tags of every section up to and including it applied in
//! order. Resolution is a left fold: each section starts from the state of
//! the previous one and applies its own top-level tags, later tags winning.
//!
//! Tags inside `\t(...)` animate towards a target and are not part of the
//! static state; the transition itself is recorded raw under `t`.

pub mod position;

pub use position::{anchor_point, legacy_to_numpad, resolve_origin, resolve_position, PositionContext};

use crate::style::{Frame, Style};
use crate::tags::{canonical_tag, scan_tags, ScanMode, Section};
use crate::utils::{alpha_from_style, color_from_style, format_number, Result};
use crate::values::TagValue;
use ahash::AHashMap;

/// Resolved property values keyed by canonical tag name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyState {
    values: AHashMap<String, TagValue>,
}

impl PropertyState {
    /// Create an empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a property, looked up by canonical name
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.values.get(canonical_tag(key))
    }

    /// Set a property, without fan-out
    pub fn set(&mut self, key: &str, value: impl Into<TagValue>) {
        self.values.insert(canonical_tag(key).to_string(), value.into());
    }

    /// Check whether a property is present
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(canonical_tag(key))
    }

    /// Iterate over all properties in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Set a property and every property it implies
    fn assign(&mut self, key: &str, value: &TagValue) {
        for target in fan_out(key) {
            self.values.insert((*target).to_string(), value.clone());
        }
        self.values.insert(key.to_string(), value.clone());
    }

    /// Copy a property and its implied properties from a baseline
    fn restore(&mut self, key: &str, baseline: &Self) {
        let implied: &[&str] = fan_out(key);
        for target in implied.iter().copied().chain(std::iter::once(key)) {
            match baseline.values.get(target) {
                Some(value) => self.values.insert(target.to_string(), value.clone()),
                None => self.values.remove(target),
            };
        }
    }
}

/// Properties set alongside a shorthand tag
fn fan_out(key: &str) -> &'static [&'static str] {
    match key {
        "alpha" => &["1a", "2a", "3a", "4a"],
        "bord" => &["xbord", "ybord"],
        "shad" => &["xshad", "yshad"],
        _ => &[],
    }
}

/// Line geometry that seeds the positional properties
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub frame: Frame,
    pub pos: (f64, f64),
    pub org: (f64, f64),
}

fn point(x: f64, y: f64) -> TagValue {
    TagValue::Text(format!("({},{})", format_number(x), format_number(y)))
}

fn flag(value: bool) -> TagValue {
    TagValue::Number(if value { 1.0 } else { 0.0 })
}

/// Build the state a line starts from
///
/// Every recognised property gets a value, derived from the style where the
/// style defines it and a neutral constant otherwise.
///
/// # Errors
///
/// Returns [`CoreError::InvalidColor`](crate::CoreError::InvalidColor) when a
/// style colour is malformed.
pub fn default_state(style: &Style, geometry: &Geometry) -> Result<PropertyState> {
    let mut state = PropertyState::new();

    state.set("fn", style.font_name.as_str());
    state.set("fs", style.font_size);

    let colours = [
        ("c", "1a", &style.primary_colour),
        ("2c", "2a", &style.secondary_colour),
        ("3c", "3a", &style.outline_colour),
        ("4c", "4a", &style.back_colour),
    ];
    for (colour_key, alpha_key, colour) in colours {
        state.set(colour_key, color_from_style(colour)?);
        state.set(alpha_key, alpha_from_style(colour)?);
    }
    state.set("alpha", alpha_from_style(&style.primary_colour)?);

    state.set("b", flag(style.bold));
    state.set("i", flag(style.italic));
    state.set("u", flag(style.underline));
    state.set("s", flag(style.strikeout));

    state.set("fscx", style.scale_x);
    state.set("fscy", style.scale_y);
    state.set("fsp", style.spacing);
    state.set("frz", style.angle);
    for key in ["frx", "fry", "fax", "fay", "blur", "be", "q", "p"] {
        state.set(key, 0.0);
    }

    for key in ["bord", "xbord", "ybord"] {
        state.set(key, style.outline);
    }
    for key in ["shad", "xshad", "yshad"] {
        state.set(key, style.shadow);
    }

    state.set("an", f64::from(style.alignment));

    let (width, height) = (geometry.frame.width, geometry.frame.height);
    state.set("pos", point(geometry.pos.0, geometry.pos.1));
    state.set("org", point(geometry.org.0, geometry.org.1));
    let full_frame = format!("(0,0,{},{})", format_number(width), format_number(height));
    state.set("clip", full_frame.as_str());
    state.set("iclip", full_frame);

    Ok(state)
}

/// One assignment parsed from a markup block
#[derive(Debug, Clone, PartialEq)]
pub enum Override {
    /// Set a property (with fan-out)
    Set(String, TagValue),
    /// Parameterless tag: return the property to its default
    Restore(String),
    /// `\r` reset to the named style, empty for the line's own style
    Reset(String),
}

/// Parse the top-level override tags of a markup fragment (without braces)
///
/// ```rust
/// # use ass_sections_core::state::{parse_overrides, Override};
/// # use ass_sections_core::TagValue;
/// let overrides = parse_overrides("\\fs40\\fn Comic Sans\\rAlt");
/// assert_eq!(overrides[0], Override::Set("fs".into(), TagValue::Number(40.0)));
/// assert_eq!(overrides[1], Override::Set("fn".into(), TagValue::from("Comic Sans")));
/// assert_eq!(overrides[2], Override::Reset("Alt".into()));
/// ```
#[must_use]
pub fn parse_overrides(fragment: &str) -> Vec<Override> {
    scan_tags(fragment, ScanMode::Nested)
        .into_iter()
        .filter_map(|tag| {
            let key = tag.key();
            if key.is_empty() {
                return None;
            }
            let param = tag.param.trim();
            let parsed = match key {
                "r" => Override::Reset(param.to_string()),
                _ if param.is_empty() => Override::Restore(key.to_string()),
                "fn" | "t" => Override::Set(key.to_string(), TagValue::Text(param.to_string())),
                _ => Override::Set(key.to_string(), TagValue::from_param(param)),
            };
            Some(parsed)
        })
        .collect()
}

/// Folds section overrides onto inherited states
///
/// Holds the line's default state and the default states of every style a
/// `\r<name>` in the line may reset to.
#[derive(Debug, Clone)]
pub struct StateResolver {
    defaults: PropertyState,
    reset_styles: AHashMap<String, PropertyState>,
}

impl StateResolver {
    #[must_use]
    pub fn new(defaults: PropertyState) -> Self {
        Self {
            defaults,
            reset_styles: AHashMap::new(),
        }
    }

    /// Register the default state `\r<name>` restores
    pub fn add_reset_style(&mut self, name: impl Into<String>, state: PropertyState) {
        self.reset_styles.insert(name.into(), state);
    }

    /// The line's default state
    #[must_use]
    pub const fn defaults(&self) -> &PropertyState {
        &self.defaults
    }

    /// State a reset to `name` restores; unknown or empty names use the
    /// line's defaults
    #[must_use]
    pub fn reset_state(&self, name: &str) -> &PropertyState {
        self.reset_styles.get(name).unwrap_or(&self.defaults)
    }

    /// Apply parsed overrides to a state in order
    pub fn apply(&self, state: &mut PropertyState, overrides: &[Override]) {
        for item in overrides {
            match item {
                Override::Set(key, value) => state.assign(key, value),
                Override::Restore(key) => state.restore(key, &self.defaults),
                Override::Reset(name) => {
                    if !name.is_empty() && !self.reset_styles.contains_key(name) {
                        log::debug!("reset to unregistered style {name:?}, using line defaults");
                    }
                    *state = self.reset_state(name).clone();
                }
            }
        }
    }

    /// State of `section` given the state inherited from the previous one
    #[must_use]
    pub fn resolve(&self, inherited: &PropertyState, section: &Section) -> PropertyState {
        let mut state = inherited.clone();
        self.apply(&mut state, &parse_overrides(section.inner()));
        state
    }

    /// States of every section of a line, left to right
    #[must_use]
    pub fn resolve_all<'a, I>(&self, sections: I) -> Vec<PropertyState>
    where
        I: IntoIterator<Item = &'a Section>,
    {
        let mut states: Vec<PropertyState> = Vec::new();
        for section in sections {
            let inherited = states.last().unwrap_or(&self.defaults);
            let next = self.resolve(inherited, section);
            states.push(next);
        }
        states
    }
}
