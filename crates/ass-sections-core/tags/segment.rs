//! Line segmentation into (markup, text) sections
//!
//! A dialogue line such as `Hello {\b1}bold{\b0} world` becomes an ordered
//! list of sections, each pairing one override block with the plain text
//! following it. A line that does not begin with an override block gets an
//! empty synthesized one so every section has markup to edit.
//!
//! Reassembly is plain concatenation except that empty `{}` blocks are
//! dropped when they were synthesized or became empty through editing;
//! literal `{}` blocks from the source are kept, so an unedited line
//! reassembles to its original text.

use super::{scan_tags, ScanMode};

/// One override block and the text it applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Override block including braces, e.g. `{\fs20}`
    markup: String,
    /// Plain text up to the next override block
    text: String,
    /// Markup as segmented, before any editing
    original_markup: String,
    /// Whether the markup was synthesized for a line without leading tags
    synthetic: bool,
}

impl Section {
    /// Create a section from a brace-delimited markup block and its text
    ///
    /// Markup without braces is wrapped.
    pub fn new(markup: &str, text: impl Into<String>) -> Self {
        let markup = wrap_block(markup);
        Self {
            original_markup: markup.clone(),
            markup,
            text: text.into(),
            synthetic: false,
        }
    }

    fn placeholder(text: &str) -> Self {
        Self {
            markup: String::from("{}"),
            text: text.to_string(),
            original_markup: String::from("{}"),
            synthetic: true,
        }
    }

    /// Override block including braces
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Override block content without braces
    #[must_use]
    pub fn inner(&self) -> &str {
        &self.markup[1..self.markup.len() - 1]
    }

    /// Replace the override block; markup without braces is wrapped
    pub fn set_markup(&mut self, markup: &str) {
        self.markup = wrap_block(markup);
    }

    /// Replace the override block content (without braces)
    pub fn set_inner(&mut self, inner: &str) {
        self.markup = format!("{{{inner}}}");
    }

    /// Plain text of the section
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the plain text of the section
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Whether the markup was synthesized during segmentation
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Whether the markup changed since segmentation
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.markup != self.original_markup
    }

    fn is_droppable_placeholder(&self) -> bool {
        self.markup == "{}" && (self.synthetic || self.original_markup != "{}")
    }
}

fn wrap_block(markup: &str) -> String {
    if markup.starts_with('{') && markup.ends_with('}') && markup.len() >= 2 {
        markup.to_string()
    } else {
        format!("{{{markup}}}")
    }
}

/// Normalize the legacy primary colour spelling `\1c` to `\c`
fn normalize_markup(markup: &str) -> String {
    markup.replace("\\1c", "\\c")
}

/// Split off a leading `{...}` block, up to the first closing brace
fn take_block(text: &str) -> Option<(&str, &str)> {
    if !text.starts_with('{') {
        return None;
    }
    let close = text.find('}')?;
    Some(text.split_at(close + 1))
}

/// Byte offset where the next closed override block starts
fn next_block_start(text: &str) -> usize {
    match text.find('{') {
        Some(open) if text[open..].contains('}') => open,
        _ => text.len(),
    }
}

/// A dialogue line split into sections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedLine {
    sections: Vec<Section>,
}

impl SegmentedLine {
    /// Segment a line's raw text
    ///
    /// ```rust
    /// # use ass_sections_core::SegmentedLine;
    /// let line = SegmentedLine::parse("Hi {\\b1}there");
    /// assert_eq!(line.len(), 2);
    /// assert_eq!(line.sections()[0].markup(), "{}");
    /// assert_eq!(line.sections()[1].text(), "there");
    /// assert_eq!(line.reassemble(), "Hi {\\b1}there");
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut sections = Vec::new();

        let (mut current, mut rest) = match take_block(text) {
            Some((block, rest)) => (Section::new(&normalize_markup(block), ""), rest),
            None => (Section::placeholder(""), text),
        };

        loop {
            let text_end = next_block_start(rest);
            current.set_text(&rest[..text_end]);
            sections.push(current);
            rest = &rest[text_end..];

            match take_block(rest) {
                Some((block, remaining)) => {
                    current = Section::new(&normalize_markup(block), "");
                    rest = remaining;
                }
                None => break,
            }
        }

        Self { sections }
    }

    /// Sections in left-to-right order
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Mutable access to the sections
    pub fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    /// Number of sections
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the line has no sections (never true for parsed lines)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Iterate over the sections
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Rebuild the line text, dropping empty placeholder blocks
    #[must_use]
    pub fn reassemble(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            if !section.is_droppable_placeholder() {
                out.push_str(&section.markup);
            }
            out.push_str(&section.text);
        }
        out
    }

    /// Distinct style names targeted by `\r<name>` resets, in order of use
    #[must_use]
    pub fn reset_targets(&self) -> Vec<String> {
        let mut targets: Vec<String> = Vec::new();
        for section in &self.sections {
            for tag in scan_tags(section.inner(), ScanMode::Nested) {
                let name = tag.param.trim();
                if tag.key() == "r" && !name.is_empty() && !targets.iter().any(|t| t == name) {
                    targets.push(name.to_string());
                }
            }
        }
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesizes_leading_markup() {
        let line = SegmentedLine::parse("plain text");
        assert_eq!(line.len(), 1);
        assert_eq!(line.sections()[0].markup(), "{}");
        assert!(line.sections()[0].is_synthetic());
        assert_eq!(line.reassemble(), "plain text");
    }

    #[test]
    fn splits_multiple_blocks() {
        let line = SegmentedLine::parse("{\\fs20\\b1}one{\\i1}two");
        let texts: Vec<_> = line.iter().map(Section::text).collect();
        assert_eq!(texts, ["one", "two"]);
        assert_eq!(line.sections()[0].inner(), "\\fs20\\b1");
    }

    #[test]
    fn consecutive_blocks_give_empty_text() {
        let line = SegmentedLine::parse("{\\b1}{\\i1}x");
        assert_eq!(line.len(), 2);
        assert_eq!(line.sections()[0].text(), "");
        assert_eq!(line.reassemble(), "{\\b1}{\\i1}x");
    }

    #[test]
    fn unclosed_brace_is_text() {
        let line = SegmentedLine::parse("{\\b1}a { b");
        assert_eq!(line.len(), 1);
        assert_eq!(line.sections()[0].text(), "a { b");
        assert_eq!(line.reassemble(), "{\\b1}a { b");
    }

    #[test]
    fn normalizes_primary_colour_alias() {
        let line = SegmentedLine::parse("{\\1c&H0000FF&}red");
        assert_eq!(line.sections()[0].markup(), "{\\c&H0000FF&}");
        assert!(!line.sections()[0].is_modified());
    }

    #[test]
    fn literal_empty_blocks_survive() {
        let text = "a{}b";
        assert_eq!(SegmentedLine::parse(text).reassemble(), text);
        assert_eq!(SegmentedLine::parse("{}").reassemble(), "{}");
        assert_eq!(SegmentedLine::parse("").reassemble(), "");
    }

    #[test]
    fn emptied_blocks_are_dropped() {
        let mut line = SegmentedLine::parse("{\\b1}bold{\\i1}it");
        line.sections_mut()[1].set_inner("");
        assert_eq!(line.reassemble(), "{\\b1}boldit");
    }

    #[test]
    fn reset_targets_are_unique() {
        let line = SegmentedLine::parse("{\\rAlt}a{\\r}b{\\rAlt\\fs2}c{\\rSign}d");
        assert_eq!(line.reset_targets(), ["Alt", "Sign"]);
    }

    #[test]
    fn set_markup_wraps_bare_tags() {
        let mut section = Section::new("\\b1", "x");
        assert_eq!(section.markup(), "{\\b1}");
        section.set_markup("\\i1");
        assert_eq!(section.markup(), "{\\i1}");
        assert!(section.is_modified());
    }
}
