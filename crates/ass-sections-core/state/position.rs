//! Effective position and rotation origin of a line
//!
//! Explicit positioning wins over alignment: `\pos`, then the start point of
//! `\move`, then the first `\an`, then the first legacy `\a`, then the
//! style alignment. Only top-level tags count; a `\pos` inside a transition
//! body is ignored.

use crate::style::{Frame, Margins};
use crate::tags::{scan_tags, ScanMode, SegmentedLine};
use crate::values::TagValue;

/// Frame, margins and style alignment of a line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionContext {
    pub frame: Frame,
    pub margins: Margins,
    /// Numpad alignment of the line's style
    pub alignment: u8,
}

/// Map a legacy `\a` code to numpad alignment
///
/// `1..=3` are bottom, `5..=7` top and `9..=11` middle rows. Other codes are
/// not valid alignments.
///
/// ```rust
/// # use ass_sections_core::state::legacy_to_numpad;
/// assert_eq!(legacy_to_numpad(2), Some(2));
/// assert_eq!(legacy_to_numpad(6), Some(8));
/// assert_eq!(legacy_to_numpad(10), Some(5));
/// assert_eq!(legacy_to_numpad(4), None);
/// ```
#[must_use]
pub const fn legacy_to_numpad(code: i64) -> Option<u8> {
    match code {
        1..=3 => Some(code as u8),
        5..=7 => Some(code as u8 + 2),
        9..=11 => Some(code as u8 - 5),
        _ => None,
    }
}

/// Anchor point of a numpad alignment inside the frame
///
/// ```rust
/// # use ass_sections_core::state::anchor_point;
/// # use ass_sections_core::{Frame, Margins};
/// let frame = Frame::new(1920.0, 1080.0);
/// assert_eq!(anchor_point(5, frame, Margins::default()), (960.0, 540.0));
/// ```
#[must_use]
pub fn anchor_point(alignment: u8, frame: Frame, margins: Margins) -> (f64, f64) {
    let left = f64::from(margins.left);
    let right = frame.width - f64::from(margins.right);
    let top = f64::from(margins.top);
    let bottom = frame.height - f64::from(margins.bottom);

    let x = match alignment % 3 {
        1 => left,
        2 => (left + right) / 2.0,
        _ => right,
    };
    let y = if alignment >= 7 {
        top
    } else if alignment >= 4 {
        (top + bottom) / 2.0
    } else {
        bottom
    };
    (x, y)
}

/// First point of a parenthesized parameter such as `(10,20)` or
/// `(10,20,30,40,0,500)`
fn leading_point(param: &str) -> Option<(f64, f64)> {
    let values = TagValue::Text(param.trim().to_string()).decompose();
    match values.as_slice() {
        [TagValue::Number(x), TagValue::Number(y), ..] => Some((*x, *y)),
        _ => None,
    }
}

/// First top-level explicit point of each kind in a line
#[derive(Default)]
struct Placement {
    pos: Option<(f64, f64)>,
    move_start: Option<(f64, f64)>,
    numpad: Option<u8>,
    legacy: Option<u8>,
    org: Option<(f64, f64)>,
}

impl Placement {
    fn scan(line: &SegmentedLine) -> Self {
        let mut found = Self::default();
        for section in line.iter() {
            for tag in scan_tags(section.inner(), ScanMode::Nested) {
                match tag.key() {
                    "pos" if found.pos.is_none() => found.pos = leading_point(tag.param),
                    "move" if found.move_start.is_none() => {
                        found.move_start = leading_point(tag.param);
                    }
                    "org" if found.org.is_none() => found.org = leading_point(tag.param),
                    "an" if found.numpad.is_none() => {
                        found.numpad = tag
                            .param
                            .trim()
                            .parse::<u8>()
                            .ok()
                            .filter(|an| (1..=9).contains(an));
                    }
                    "a" if found.legacy.is_none() => {
                        found.legacy = tag.param.trim().parse::<i64>().ok().and_then(legacy_to_numpad);
                    }
                    _ => {}
                }
            }
        }
        found
    }

    fn position(&self, ctx: &PositionContext) -> (f64, f64) {
        self.pos.or(self.move_start).unwrap_or_else(|| {
            let alignment = self.numpad.or(self.legacy).unwrap_or(ctx.alignment);
            anchor_point(alignment, ctx.frame, ctx.margins)
        })
    }
}

/// Effective position of a line
///
/// ```rust
/// # use ass_sections_core::state::{resolve_position, PositionContext};
/// # use ass_sections_core::{Frame, Margins, SegmentedLine};
/// let ctx = PositionContext {
///     frame: Frame::new(1920.0, 1080.0),
///     margins: Margins::default(),
///     alignment: 2,
/// };
/// let line = SegmentedLine::parse("{\\an5}centered");
/// assert_eq!(resolve_position(&line, &ctx), (960.0, 540.0));
/// ```
#[must_use]
pub fn resolve_position(line: &SegmentedLine, ctx: &PositionContext) -> (f64, f64) {
    Placement::scan(line).position(ctx)
}

/// Effective rotation origin of a line; defaults to its position
#[must_use]
pub fn resolve_origin(line: &SegmentedLine, ctx: &PositionContext) -> (f64, f64) {
    let placement = Placement::scan(line);
    placement.org.unwrap_or_else(|| placement.position(ctx))
}
