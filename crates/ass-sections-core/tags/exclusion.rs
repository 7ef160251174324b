//! Removal of named override tags from a markup fragment
//!
//! Works in two passes over the fragment (the text between the braces):
//!
//! 1. A flat walk removes every requested tag except `\t`, reaching into
//!    transition bodies. A removed tag drops its own parameter; a `)` that
//!    closes an enclosing `\t(` is left behind as a bare `)`.
//! 2. Transition cleanup. When `t` was requested every `\t(...)` block is
//!    deleted with its balanced body. Otherwise a transition is deleted when
//!    its body held a tag before the walk and holds none after it. Bodies
//!    that were already empty are left alone.
//!
//! Names compare in canonical form (see [`canonical_tag`]), so removing
//! `1c` and `c` is the same request while `3c` stays a different tag.

use super::{canonical_tag, scan_tags, ScanMode};

/// Remove every occurrence of the named tags from a markup fragment
///
/// ```rust
/// # use ass_sections_core::tags::exclude_tags;
/// assert_eq!(exclude_tags("\\fn Arial\\fs20", &["fn"]), "\\fs20");
/// assert_eq!(exclude_tags("\\r\\fs20", &["r"]), "\\fs20");
/// assert_eq!(exclude_tags("\\t(0,100,\\fs20\\bord2)", &["bord"]), "\\t(0,100,\\fs20)");
/// ```
#[must_use]
pub fn exclude_tags<S: AsRef<str>>(fragment: &str, names: &[S]) -> String {
    let targets: Vec<&str> = names
        .iter()
        .map(|name| canonical_tag(name.as_ref()))
        .filter(|name| !name.is_empty())
        .collect();
    let drop_transitions = targets.contains(&"t");

    let (stripped, removed_any) = strip_tags(fragment, &targets);
    if drop_transitions || removed_any {
        let held_tags = transition_bodies(fragment);
        strip_transitions(&stripped, drop_transitions, &held_tags)
    } else {
        stripped
    }
}

fn strip_tags(fragment: &str, targets: &[&str]) -> (String, bool) {
    let mut out = String::with_capacity(fragment.len());
    let mut cursor = 0;
    let mut removed_any = false;

    for tag in scan_tags(fragment, ScanMode::Flat) {
        let key = tag.key();
        if key == "t" || !targets.contains(&key) {
            continue;
        }
        out.push_str(&fragment[cursor..tag.start]);
        out.push_str(enclosing_closers(tag.param));
        cursor = tag.end;
        removed_any = true;
    }

    out.push_str(&fragment[cursor..]);
    (out, removed_any)
}

/// Tail of a removed parameter that belongs to an enclosing group
///
/// Everything from the first `)` at depth zero onwards, so `2)` yields `)`
/// and `(1,2,3,4))` yields `)` while `(1,2)` yields nothing.
fn enclosing_closers(param: &str) -> &str {
    let mut depth = 0usize;
    for (offset, byte) in param.bytes().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' if depth == 0 => return &param[offset..],
            b')' => depth -= 1,
            _ => {}
        }
    }
    ""
}

/// Whether each `\t` block, in order, carries at least one tag in its body
///
/// The flat walk never removes `\t` itself, so the order of transitions is
/// the same before and after it.
fn transition_bodies(fragment: &str) -> Vec<bool> {
    scan_tags(fragment, ScanMode::Nested)
        .into_iter()
        .filter(|tag| tag.key() == "t")
        .map(|tag| tag.param.contains('\\'))
        .collect()
}

fn strip_transitions(fragment: &str, drop_all: bool, held_tags: &[bool]) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut cursor = 0;
    let transitions = scan_tags(fragment, ScanMode::Nested)
        .into_iter()
        .filter(|tag| tag.key() == "t");

    for (ordinal, tag) in transitions.enumerate() {
        let emptied =
            !tag.param.contains('\\') && held_tags.get(ordinal).copied().unwrap_or(false);
        if drop_all || emptied {
            out.push_str(&fragment[cursor..tag.start]);
            cursor = tag.end;
        }
    }

    out.push_str(&fragment[cursor..]);
    out
}
