//! Resolved style and render geometry
//!
//! Owned, typed counterparts of a `[V4+ Styles]` entry and of the frame a
//! line is rendered into. The host document resolves styles by name; the
//! engine only needs their values to build default property states and to
//! place lines without explicit positioning.

/// Style definition with parsed values
///
/// Colours stay in style notation (`&HAABBGGRR`) and are converted when a
/// default state is built.
///
/// # Examples
///
/// ```rust
/// use ass_sections_core::Style;
///
/// let sign = Style {
///     name: "Sign".into(),
///     font_size: 48.0,
///     alignment: 8,
///     ..Style::default()
/// };
/// assert_eq!(sign.font_name, "Arial");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    /// Style name referenced by lines and `\r` resets
    pub name: String,
    /// Font family name
    pub font_name: String,
    /// Font size in points
    pub font_size: f64,
    /// Primary fill colour
    pub primary_colour: String,
    /// Secondary (karaoke) colour
    pub secondary_colour: String,
    /// Outline colour
    pub outline_colour: String,
    /// Shadow colour
    pub back_colour: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikeout: bool,
    /// Horizontal scale percentage
    pub scale_x: f64,
    /// Vertical scale percentage
    pub scale_y: f64,
    /// Letter spacing in pixels
    pub spacing: f64,
    /// Z rotation in degrees
    pub angle: f64,
    /// Border style (1 = outline and shadow, 3 = opaque box)
    pub border_style: u8,
    /// Outline width in pixels
    pub outline: f64,
    /// Shadow depth in pixels
    pub shadow: f64,
    /// Numpad alignment (1-9)
    pub alignment: u8,
    pub margin_l: i32,
    pub margin_r: i32,
    pub margin_v: i32,
}

impl Style {
    /// Default style values under another name
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Style margins as top/bottom/left/right
    #[must_use]
    pub const fn margins(&self) -> Margins {
        Margins {
            left: self.margin_l,
            right: self.margin_r,
            top: self.margin_v,
            bottom: self.margin_v,
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            font_name: "Arial".to_string(),
            font_size: 20.0,
            primary_colour: "&H00FFFFFF".to_string(),
            secondary_colour: "&H000000FF".to_string(),
            outline_colour: "&H00000000".to_string(),
            back_colour: "&H00000000".to_string(),
            bold: false,
            italic: false,
            underline: false,
            strikeout: false,
            scale_x: 100.0,
            scale_y: 100.0,
            spacing: 0.0,
            angle: 0.0,
            border_style: 1,
            outline: 2.0,
            shadow: 2.0,
            alignment: 2,
            margin_l: 10,
            margin_r: 10,
            margin_v: 10,
        }
    }
}

/// Margins in effect for a line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Margins {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Margins {
    /// Combine line margins with style margins
    ///
    /// A non-zero line margin overrides the style's; the vertical line
    /// margin applies to both top and bottom.
    ///
    /// ```rust
    /// # use ass_sections_core::{Margins, Style};
    /// let margins = Margins::effective(0, 30, 0, &Style::default());
    /// assert_eq!((margins.left, margins.right, margins.top), (10, 30, 10));
    /// ```
    #[must_use]
    pub const fn effective(line_l: i32, line_r: i32, line_v: i32, style: &Style) -> Self {
        const fn pick(line: i32, style: i32) -> i32 {
            if line == 0 {
                style
            } else {
                line
            }
        }
        let vertical = pick(line_v, style.margin_v);
        Self {
            left: pick(line_l, style.margin_l),
            right: pick(line_r, style.margin_r),
            top: vertical,
            bottom: vertical,
        }
    }
}

/// Render frame (script resolution) in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub width: f64,
    pub height: f64,
}

impl Frame {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(640.0, 480.0)
    }
}
