//! Section-scoped mutation API
//!
//! A [`SectionEditor`] wraps one section of a segmented line together with
//! the state inherited from the section before it. Reads go through the
//! resolved state, so inherited values are visible; writes rewrite the
//! section's own markup and re-fold its state immediately.
//!
//! # Example
//!
//! ```rust
//! use ass_sections_core::combinator::multiply;
//! use ass_sections_core::state::{default_state, Geometry, StateResolver};
//! use ass_sections_core::{Frame, SectionEditor, SegmentedLine, Style};
//!
//! let geometry = Geometry { frame: Frame::default(), pos: (320.0, 470.0), org: (320.0, 470.0) };
//! let resolver = StateResolver::new(default_state(&Style::default(), &geometry)?);
//! let mut line = SegmentedLine::parse("{\\bord1}Hello");
//! let inherited = resolver.defaults().clone();
//!
//! let mut editor = SectionEditor::new(&mut line.sections_mut()[0], &inherited, &resolver);
//! editor.modify("fs", &multiply([2.0]))?;
//! assert_eq!(editor.markup(), "{\\bord1\\fs40}");
//! # Ok::<(), ass_sections_core::CoreError>(())
//! ```

use crate::combinator::Combinator;
use crate::state::{PropertyState, StateResolver};
use crate::tags::{canonical_tag, exclude_tags, scan_tags, ScanMode, Section, PARENTHESIZED_TAGS};
use crate::utils::Result;
use crate::values::TagValue;

/// Mutable view of one section with its resolved state
#[derive(Debug)]
pub struct SectionEditor<'a> {
    section: &'a mut Section,
    inherited: &'a PropertyState,
    resolver: &'a StateResolver,
    state: PropertyState,
}

impl<'a> SectionEditor<'a> {
    /// Wrap a section, resolving its state from the inherited one
    pub fn new(section: &'a mut Section, inherited: &'a PropertyState, resolver: &'a StateResolver) -> Self {
        let state = resolver.resolve(inherited, section);
        Self {
            section,
            inherited,
            resolver,
            state,
        }
    }

    /// Resolved state of the section
    #[must_use]
    pub const fn state(&self) -> &PropertyState {
        &self.state
    }

    /// Current values of a tag, decomposed into positional parameters
    ///
    /// A property that is not part of the state yields no values.
    #[must_use]
    pub fn get(&self, tag: &str) -> Vec<TagValue> {
        self.state
            .get(tag)
            .map(TagValue::decompose)
            .unwrap_or_default()
    }

    /// Transform a tag's current value and write the result into the markup
    ///
    /// The last top-level occurrence of the tag in this section is rewritten
    /// in place. When the section has none, or a `\r` follows it, the tag is
    /// appended instead so the new value takes effect.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ArityMismatch`](crate::CoreError::ArityMismatch)
    /// when the combinator does not fit the tag's parameter count.
    pub fn modify(&mut self, tag: &str, combinator: &Combinator) -> Result<()> {
        let key = canonical_tag(tag);
        let current = self.get(key);
        let values = combinator.apply(&current)?;

        let parenthesized = PARENTHESIZED_TAGS.contains(&key)
            || self.state.get(key).is_some_and(TagValue::is_parenthesized);
        let param = TagValue::join_params(&values, parenthesized);

        let inner = self.section.inner();
        let tags = scan_tags(inner, ScanMode::Nested);
        let last = tags.iter().rposition(|candidate| candidate.key() == key);
        let reset_after = last.is_some_and(|index| tags[index + 1..].iter().any(|later| later.key() == "r"));

        let rewritten = match last {
            Some(index) if !reset_after => {
                let target = &tags[index];
                format!(
                    "{}\\{}{}{}",
                    &inner[..target.start],
                    target.name,
                    param,
                    &inner[target.end..]
                )
            }
            _ => format!("{inner}\\{key}{param}"),
        };

        self.section.set_inner(&rewritten);
        self.refold();
        Ok(())
    }

    /// Remove every occurrence of the named tags from the section markup
    pub fn remove<S: AsRef<str>>(&mut self, tags: &[S]) {
        let stripped = exclude_tags(self.section.inner(), tags);
        self.section.set_inner(&stripped);
        self.refold();
    }

    /// Append literal tag text before the closing brace
    pub fn insert(&mut self, literal: &str) {
        let appended = format!("{}{literal}", self.section.inner());
        self.section.set_inner(&appended);
        self.refold();
    }

    /// Plain text of the section
    #[must_use]
    pub fn text(&self) -> &str {
        self.section.text()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.section.set_text(text);
    }

    /// Markup block of the section, braces included
    #[must_use]
    pub fn markup(&self) -> &str {
        self.section.markup()
    }

    /// Replace the whole markup block
    pub fn set_markup(&mut self, markup: &str) {
        self.section.set_markup(markup);
        self.refold();
    }

    /// Consume the editor, yielding the state the next section inherits
    #[must_use]
    pub fn into_state(self) -> PropertyState {
        self.state
    }

    fn refold(&mut self) {
        self.state = self.resolver.resolve(self.inherited, self.section);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::{add, append, multiply, replace};
    use crate::state::{default_state, Geometry};
    use crate::style::{Frame, Style};
    use crate::tags::SegmentedLine;
    use crate::CoreError;

    fn resolver() -> StateResolver {
        let geometry = Geometry {
            frame: Frame::new(1280.0, 720.0),
            pos: (640.0, 710.0),
            org: (640.0, 710.0),
        };
        StateResolver::new(default_state(&Style::default(), &geometry).unwrap())
    }

    fn edit_first<F>(text: &str, edit: F) -> (String, PropertyState)
    where
        F: FnOnce(&mut SectionEditor<'_>),
    {
        let resolver = resolver();
        let inherited = resolver.defaults().clone();
        let mut line = SegmentedLine::parse(text);
        let state = {
            let mut editor = SectionEditor::new(&mut line.sections_mut()[0], &inherited, &resolver);
            edit(&mut editor);
            editor.into_state()
        };
        (line.reassemble(), state)
    }

    #[test]
    fn modify_rewrites_local_tag() {
        let (text, state) = edit_first("{\\fs20\\b1}x", |e| e.modify("fs", &multiply([2.0])).unwrap());
        assert_eq!(text, "{\\fs40\\b1}x");
        assert_eq!(state.get("fs"), Some(&TagValue::Number(40.0)));
    }

    #[test]
    fn modify_appends_when_inherited() {
        let (text, _) = edit_first("plain", |e| e.modify("fs", &multiply([2.0])).unwrap());
        assert_eq!(text, "{\\fs40}plain");
    }

    #[test]
    fn modify_targets_last_occurrence() {
        let (text, _) = edit_first("{\\fs10\\b1\\fs30}x", |e| e.modify("fs", &add([5.0])).unwrap());
        assert_eq!(text, "{\\fs10\\b1\\fs35}x");
    }

    #[test]
    fn modify_appends_after_reset() {
        let (text, state) = edit_first("{\\fs30\\r}x", |e| e.modify("fs", &add([1.0])).unwrap());
        assert_eq!(text, "{\\fs30\\r\\fs21}x");
        assert_eq!(state.get("fs"), Some(&TagValue::Number(21.0)));
    }

    #[test]
    fn modify_rewrites_colour_and_tuple() {
        let (text, _) = edit_first("{\\1c&H0000FF&\\pos(10,20)}x", |e| {
            e.modify("c", &replace("&H00FF00&")).unwrap();
            e.modify("pos", &add([5.0, -5.0])).unwrap();
        });
        assert_eq!(text, "{\\c&H00FF00&\\pos(15,15)}x");
    }

    #[test]
    fn modify_inherited_tuple_appends_parenthesized() {
        let (text, _) = edit_first("x", |e| e.modify("pos", &add([10.0, 0.0])).unwrap());
        assert_eq!(text, "{\\pos(650,710)}x");
    }

    #[test]
    fn modify_leaves_transition_bodies_alone() {
        let (text, _) = edit_first("{\\t(0,100,\\fs60)}x", |e| e.modify("fs", &replace(25)).unwrap());
        assert_eq!(text, "{\\t(0,100,\\fs60)\\fs25}x");
    }

    #[test]
    fn modify_reports_arity_mismatch() {
        let (text, _) = edit_first("{\\fs20}x", |e| {
            let err = e.modify("fs", &add([1.0, 2.0])).unwrap_err();
            assert_eq!(err, CoreError::arity("add", 2, 1));
        });
        assert_eq!(text, "{\\fs20}x");
    }

    #[test]
    fn append_to_font_name() {
        let (text, _) = edit_first("{\\fnArial}x", |e| e.modify("fn", &append(" Black")).unwrap());
        assert_eq!(text, "{\\fnArial Black}x");
    }

    #[test]
    fn get_decomposes_and_handles_missing() {
        edit_first("{\\clip(1,2,3,4)}x", |e| {
            let clip: Vec<TagValue> = [1.0, 2.0, 3.0, 4.0].into_iter().map(TagValue::Number).collect();
            assert_eq!(e.get("clip"), clip);
            assert_eq!(e.get("fs"), vec![TagValue::Number(20.0)]);
            assert!(e.get("nonexistent").is_empty());
        });
    }

    #[test]
    fn remove_and_insert_refold() {
        let (text, state) = edit_first("{\\bord4\\fs30}x", |e| {
            e.remove(&["bord"]);
            assert_eq!(e.get("bord"), vec![TagValue::Number(2.0)]);
            e.insert("\\i1");
        });
        assert_eq!(text, "{\\fs30\\i1}x");
        assert_eq!(state.get("i"), Some(&TagValue::Number(1.0)));
    }

    #[test]
    fn removing_everything_drops_the_block() {
        let (text, _) = edit_first("a{\\b1}b", |e| e.remove(&["b"]));
        assert_eq!(text, "a{\\b1}b");

        let resolver = resolver();
        let inherited = resolver.defaults().clone();
        let mut line = SegmentedLine::parse("a{\\b1}b");
        SectionEditor::new(&mut line.sections_mut()[1], &inherited, &resolver).remove(&["b"]);
        assert_eq!(line.reassemble(), "ab");
    }

    #[test]
    fn text_accessors() {
        let (text, _) = edit_first("{\\b1}hello", |e| {
            assert_eq!(e.text(), "hello");
            e.set_text(e.text().to_uppercase());
            e.set_markup("\\i1");
            assert_eq!(e.get("b"), vec![TagValue::Number(0.0)]);
        });
        assert_eq!(text, "{\\i1}HELLO");
    }
}
