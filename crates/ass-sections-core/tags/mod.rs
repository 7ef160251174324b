//! Override-tag vocabulary and scanning
//!
//! Provides tag name recognition, canonical naming for aliased tags and a
//! scanner splitting a markup fragment (the text between `{` and `}`) into
//! individual tags with byte offsets, so callers can rewrite exactly one
//! occurrence and copy everything else verbatim.
//!
//! # Scan modes
//!
//! - [`ScanMode::Nested`]: a tag whose parameter opens with `(` owns the whole
//!   balanced group, so `\t(0,100,\fs20)` is a single tag. Used for state
//!   resolution and targeted rewrites.
//! - [`ScanMode::Flat`]: every `\` starts a new tag, reaching into transition
//!   bodies. Used by the exclusion engine.

pub mod exclusion;
pub mod segment;

pub use exclusion::exclude_tags;
pub use segment::{Section, SegmentedLine};

/// Override tag names recognised by the scanner
///
/// Names are matched as the longest known prefix of the text following the
/// backslash, which keeps `\fnArial` as `fn`, `\frz10` as `frz` and
/// `\rDefault` as `r`.
pub const KNOWN_TAGS: &[&str] = &[
    "1a", "1c", "2a", "2c", "3a", "3c", "4a", "4c", "a", "alpha", "an", "b", "be", "blur", "bord",
    "c", "clip", "fad", "fade", "fax", "fay", "fe", "fn", "fr", "frx", "fry", "frz", "fs", "fscx",
    "fscy", "fsp", "i", "iclip", "K", "k", "kf", "ko", "kt", "move", "org", "p", "pbo", "pos",
    "q", "r", "s", "shad", "t", "u", "xbord", "xshad", "ybord", "yshad",
];

/// Tags whose parameters are always written in parenthesized form
pub const PARENTHESIZED_TAGS: &[&str] = &["pos", "move", "org", "clip", "iclip", "fad", "fade", "t"];

/// Recognise the tag name at the start of `body` (text after the backslash)
///
/// Falls back to an optional target digit followed by ASCII letters for
/// tags outside [`KNOWN_TAGS`].
///
/// ```rust
/// # use ass_sections_core::tags::tag_name_at;
/// assert_eq!(tag_name_at("fnArial"), "fn");
/// assert_eq!(tag_name_at("frz45"), "frz");
/// assert_eq!(tag_name_at("3c&H0000FF&"), "3c");
/// assert_eq!(tag_name_at("xyz12"), "xyz");
/// ```
#[must_use]
pub fn tag_name_at(body: &str) -> &str {
    if let Some(known) = KNOWN_TAGS
        .iter()
        .filter(|name| body.starts_with(**name))
        .max_by_key(|name| name.len())
    {
        return &body[..known.len()];
    }

    let digits = usize::from(body.bytes().next().is_some_and(|b| b.is_ascii_digit()));
    let letters = body[digits..]
        .bytes()
        .take_while(u8::is_ascii_alphabetic)
        .count();
    &body[..digits + letters]
}

/// Canonical property key for a tag name
///
/// Folds aliases that address the same property: the legacy primary colour
/// `1c` is `c` and the short rotation `fr` is `frz`. A leading backslash is
/// accepted so script-supplied names like `"\\fs"` work.
#[must_use]
pub fn canonical_tag(name: &str) -> &str {
    match name.strip_prefix('\\').unwrap_or(name) {
        "1c" => "c",
        "fr" => "frz",
        other => other,
    }
}

/// How transition bodies are treated while scanning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Every backslash starts a new tag
    Flat,
    /// A parenthesized parameter owns its whole balanced group
    Nested,
}

/// One override tag inside a markup fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTag<'a> {
    /// Byte offset of the backslash
    pub start: usize,
    /// Byte offset one past the last parameter byte
    pub end: usize,
    /// Tag name as written (`1c`, `fr`, `pos`)
    pub name: &'a str,
    /// Parameter text as written, up to the next tag
    pub param: &'a str,
}

impl RawTag<'_> {
    /// Canonical property key of this tag
    #[must_use]
    pub fn key(&self) -> &str {
        canonical_tag(self.name)
    }
}

/// Find the byte offset just past the `)` matching the `(` at `open`
///
/// Returns `None` when `open` is not a `(` or the group never closes.
#[must_use]
pub fn balanced_group_end(text: &str, open: usize) -> Option<usize> {
    if text.as_bytes().get(open) != Some(&b'(') {
        return None;
    }
    let mut depth = 0usize;
    for (offset, byte) in text.as_bytes()[open..].iter().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn next_backslash(text: &str, from: usize) -> usize {
    text[from..].find('\\').map_or(text.len(), |offset| from + offset)
}

/// Split a markup fragment into tags
///
/// Text before the first backslash (comments inside braces) is not part of
/// any tag; callers preserve the gaps between tag offsets verbatim.
///
/// ```rust
/// # use ass_sections_core::tags::{scan_tags, ScanMode};
/// let tags = scan_tags("\\fs20\\t(0,100,\\bord2)", ScanMode::Nested);
/// assert_eq!(tags.len(), 2);
/// assert_eq!(tags[1].param, "(0,100,\\bord2)");
///
/// let flat = scan_tags("\\fs20\\t(0,100,\\bord2)", ScanMode::Flat);
/// assert_eq!(flat.len(), 3);
/// assert_eq!(flat[2].param, "2)");
/// ```
#[must_use]
pub fn scan_tags(fragment: &str, mode: ScanMode) -> Vec<RawTag<'_>> {
    let mut tags = Vec::new();
    let mut pos = 0;

    while let Some(offset) = fragment[pos..].find('\\') {
        let start = pos + offset;
        let name = tag_name_at(&fragment[start + 1..]);
        let param_start = start + 1 + name.len();

        let end = if mode == ScanMode::Nested && fragment[param_start..].starts_with('(') {
            balanced_group_end(fragment, param_start)
                .map_or(fragment.len(), |group_end| next_backslash(fragment, group_end))
        } else {
            next_backslash(fragment, param_start)
        };

        tags.push(RawTag {
            start,
            end,
            name,
            param: &fragment[param_start..end],
        });
        pos = end;
    }

    tags
}
