//! Apply-to-sections pass tests
//!
//! Runs native scripts through `ApplySectionsCommand` against an in-memory
//! document and checks line texts, the returned selection and host reports.

use ass_sections_core::combinator::{add, multiply, replace};
use ass_sections_core::{Frame, Style, TagValue};
use ass_sections_editor::*;
use pretty_assertions::assert_eq;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn document(texts: &[&str]) -> MemoryDocument {
    MemoryDocument::from_lines(texts.iter().map(|text| Line::dialogue(*text)))
        .with_frame(Frame::new(1920.0, 1080.0))
}

fn numbered(count: usize) -> MemoryDocument {
    let texts: Vec<String> = (1..=count).map(|n| format!("{{\\fs20}}line {n}")).collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    document(&refs)
}

// ===== Deferred Line Tasks =====

#[test]
fn test_duplicate_on_odd_entries() {
    init();
    let mut doc = numbered(6);
    let mut script = script_fn(|b: &mut ScriptBindings<'_>| {
        if b.i() % 2 == 1 {
            b.duplicate();
        }
        b.modify("fs", &multiply([2.0]))
    });

    let selection = ApplySectionsCommand::new().run(&mut doc, &[5], &mut script).unwrap();
    assert_eq!(selection, vec![5]);
    assert_eq!(doc.line_count(), 7);
    assert_eq!(doc.texts()[4], "{\\fs40}line 5");
    // the copy is taken before the edit, then visited as entry 2
    assert_eq!(doc.texts()[5], "{\\fs40}line 5");
    assert_eq!(doc.texts()[6], "{\\fs20}line 6");
}

#[test]
fn test_duplicate_copies_original_line() {
    init();
    let mut doc = numbered(3);
    let mut script = script_fn(|b: &mut ScriptBindings<'_>| {
        if b.li() == 2 {
            b.duplicate();
            b.set_text("edited");
        }
        Ok(())
    });

    ApplySectionsCommand::with_config(ApplyConfig::default())
        .run(&mut doc, &[2], &mut script)
        .unwrap();
    assert_eq!(
        doc.texts(),
        ["{\\fs20}line 1", "{\\fs20}edited", "{\\fs20}line 2", "{\\fs20}line 3"]
    );
}

#[test]
fn test_select_with_duplicates_shifts_indices() {
    init();
    let mut doc = numbered(6);
    let mut script = script_fn(|b: &mut ScriptBindings<'_>| {
        b.select();
        if b.i() == 1 || b.i() == 3 {
            b.duplicate();
        }
        Ok(())
    });

    let selection = ApplySectionsCommand::new().run(&mut doc, &[4, 2], &mut script).unwrap();
    assert_eq!(selection, vec![5, 6, 2, 3]);
    assert_eq!(
        doc.texts(),
        [
            "{\\fs20}line 1",
            "{\\fs20}line 2",
            "{\\fs20}line 2",
            "{\\fs20}line 3",
            "{\\fs20}line 4",
            "{\\fs20}line 4",
            "{\\fs20}line 5",
            "{\\fs20}line 6",
        ]
    );
}

#[test]
fn test_select_subset() {
    init();
    let mut doc = document(&["{\\b1}bold", "plain", "{\\b1}also bold"]);
    let mut script = script_fn(|b: &mut ScriptBindings<'_>| {
        if b.tag().contains("\\b1") {
            b.select();
        }
        Ok(())
    });

    let selection = ApplySectionsCommand::new().run(&mut doc, &[1, 2, 3], &mut script).unwrap();
    assert_eq!(selection, vec![1, 3]);
}

#[test]
fn test_line_calls_from_later_sections_are_ignored() {
    init();
    let mut doc = document(&["plain{\\b1}bold"]);
    let mut script = script_fn(|b: &mut ScriptBindings<'_>| {
        if b.j() == 2 {
            b.select();
            b.duplicate();
        }
        Ok(())
    });

    let selection = ApplySectionsCommand::new().run(&mut doc, &[1], &mut script).unwrap();
    assert_eq!(selection, vec![1]);
    assert_eq!(doc.line_count(), 1);
}

#[test]
fn test_modify_line_runs_once() {
    init();
    let mut doc = document(&["{\\b1}a{\\i1}b{\\u1}c"]);
    let mut script = script_fn(|b: &mut ScriptBindings<'_>| {
        b.modify_line("layer", &add([1.0]))?;
        b.modify_line("end", &add([250.0]))
    });

    ApplySectionsCommand::new().run(&mut doc, &[1], &mut script).unwrap();
    let line = &doc.lines()[0];
    assert_eq!(line.layer, 1);
    assert_eq!(line.end_time, 250);
    assert_eq!(line.text, "{\\b1}a{\\i1}b{\\u1}c");
}

#[test]
fn test_modify_line_style() {
    init();
    let mut doc = document(&["sign text"]);
    let mut script = script_fn(|b: &mut ScriptBindings<'_>| b.modify_line("style", &replace("Sign")));

    ApplySectionsCommand::new().run(&mut doc, &[1], &mut script).unwrap();
    assert_eq!(doc.lines()[0].style, "Sign");
}

// ===== Section Edits =====

#[test]
fn test_doubling_font_size_across_sections() {
    init();
    let mut doc = document(&["{\\fs20}local", "inherited", "a{\\i1}b{\\fs10}c"]);
    let mut script = script_fn(|b: &mut ScriptBindings<'_>| b.modify("fs", &multiply([2.0])));

    ApplySectionsCommand::new().run(&mut doc, &[1, 2, 3], &mut script).unwrap();
    assert_eq!(
        doc.texts(),
        ["{\\fs40}local", "{\\fs40}inherited", "{\\fs40}a{\\i1\\fs80}b{\\fs20}c"]
    );
}

#[test]
fn test_unselected_lines_untouched() {
    init();
    let mut doc = document(&["{\\fs20}one", "{\\fs20}two"]);
    let mut script = script_fn(|b: &mut ScriptBindings<'_>| b.modify("fs", &add([1.0])));

    ApplySectionsCommand::new().run(&mut doc, &[2], &mut script).unwrap();
    assert_eq!(doc.texts(), ["{\\fs20}one", "{\\fs21}two"]);
}

#[test]
fn test_noop_script_round_trips() {
    init();
    let texts = [
        "",
        "{\\an8\\pos(10,20)}sign",
        "{}empty{}braces",
        "a{\\t(0,100,\\fs30)}b{comment}c",
    ];
    let mut doc = document(&texts);
    let mut script = script_fn(|_: &mut ScriptBindings<'_>| Ok(()));

    ApplySectionsCommand::new().run(&mut doc, &[1, 2, 3, 4], &mut script).unwrap();
    assert_eq!(doc.texts(), texts);
}

#[test]
fn test_remove_and_insert() {
    init();
    let mut doc = document(&["{\\bord3\\blur1}glow{\\bord5}more"]);
    let mut script = script_fn(|b: &mut ScriptBindings<'_>| {
        b.remove(&["bord"]);
        if b.j() == 1 {
            b.insert("\\shad0");
        }
        Ok(())
    });

    ApplySectionsCommand::new().run(&mut doc, &[1], &mut script).unwrap();
    assert_eq!(doc.texts(), ["{\\blur1\\shad0}glowmore"]);
}

#[test]
fn test_reset_style_from_document() {
    init();
    let sign = Style {
        name: "Sign".into(),
        font_size: 50.0,
        ..Style::default()
    };
    let mut doc = document(&["{\\fs30}a{\\rSign}b", "{\\fs30}a{\\r}b"]).with_style(sign);
    let mut script = script_fn(|b: &mut ScriptBindings<'_>| b.modify("fs", &add([2.0])));

    ApplySectionsCommand::new().run(&mut doc, &[1, 2], &mut script).unwrap();
    assert_eq!(
        doc.texts(),
        ["{\\fs32}a{\\rSign\\fs52}b", "{\\fs32}a{\\r\\fs22}b"]
    );
}

#[test]
fn test_missing_style_falls_back_to_default() {
    init();
    let default = Style {
        font_size: 36.0,
        ..Style::default()
    };
    let mut doc = MemoryDocument::from_lines([Line::dialogue("x").with_style("Missing")]).with_style(default);
    let mut seen = Vec::new();
    let mut script = script_fn(|b: &mut ScriptBindings<'_>| {
        seen.push(b.get("fs"));
        Ok(())
    });

    ApplySectionsCommand::new().run(&mut doc, &[1], &mut script).unwrap();
    assert_eq!(seen, vec![vec![TagValue::Number(36.0)]]);
}

#[test]
fn test_position_bindings() {
    init();
    let mut doc = document(&["bottom", "{\\an7}corner", "{\\pos(100,200)\\org(5,6)}fixed"]);
    let mut seen = Vec::new();
    let mut script = script_fn(|b: &mut ScriptBindings<'_>| {
        seen.push((b.li(), b.pos(), b.org()));
        Ok(())
    });

    ApplySectionsCommand::new().run(&mut doc, &[1, 2, 3], &mut script).unwrap();
    assert_eq!(
        seen,
        vec![
            (1, (960.0, 1070.0), (960.0, 1070.0)),
            (2, (10.0, 10.0), (10.0, 10.0)),
            (3, (100.0, 200.0), (5.0, 6.0)),
        ]
    );
}

// ===== Faults =====

#[test]
fn test_fault_aborts_with_partial_application() {
    init();
    let mut doc = document(&["one", "two", "three"]);
    let mut script = script_fn(|b: &mut ScriptBindings<'_>| {
        if b.li() == 2 {
            return Err(EditorError::runtime(b.li(), b.j(), "bad line"));
        }
        let upper = b.text().to_uppercase();
        b.set_text(upper);
        Ok(())
    });

    let err = ApplySectionsCommand::new().run(&mut doc, &[1, 2, 3], &mut script).unwrap_err();
    assert_eq!(err, EditorError::runtime(2, 1, "bad line"));
    assert_eq!(doc.texts(), ["ONE", "two", "three"]);
    assert_eq!(doc.messages(), ["Script error on line 2, section 1: bad line"]);
    assert!(doc.was_cancelled());
    assert!(doc.undo_checkpoints().is_empty());
}

#[test]
fn test_arity_mismatch_is_runtime_fault() {
    init();
    let mut doc = document(&["x"]);
    let mut script = script_fn(|b: &mut ScriptBindings<'_>| b.modify("pos", &add([1.0])));

    let err = ApplySectionsCommand::new().run(&mut doc, &[1], &mut script).unwrap_err();
    assert_eq!(
        err,
        EditorError::runtime(1, 1, "add expects 1 parameter(s) but the tag has 2")
    );
    assert!(err.is_script_fault());
}

#[test]
fn test_unknown_line_property_is_runtime_fault() {
    init();
    let mut doc = document(&["x"]);
    let mut script = script_fn(|b: &mut ScriptBindings<'_>| b.modify_line("colour", &replace(1)));

    let err = ApplySectionsCommand::new().run(&mut doc, &[1], &mut script).unwrap_err();
    assert_eq!(err, EditorError::runtime(1, 1, "Unknown line property: colour"));
    assert_eq!(doc.messages().len(), 1);
    assert!(doc.was_cancelled());
}

#[test]
fn test_invalid_line_value_is_runtime_fault() {
    init();
    let mut doc = document(&["x"]);
    let mut script = script_fn(|b: &mut ScriptBindings<'_>| b.modify_line("layer", &replace("top")));

    let err = ApplySectionsCommand::new().run(&mut doc, &[1], &mut script).unwrap_err();
    assert_eq!(
        err,
        EditorError::runtime(1, 1, "Invalid value for line property layer: top")
    );
    assert_eq!(doc.texts(), ["x"]);
}

#[test]
fn test_selection_beyond_document_fails() {
    init();
    let mut doc = document(&["x"]);
    let mut script = script_fn(|_: &mut ScriptBindings<'_>| Ok(()));

    let err = ApplySectionsCommand::new().run(&mut doc, &[4], &mut script).unwrap_err();
    assert_eq!(err, EditorError::LineNotFound { index: 4, count: 1 });
    assert!(doc.was_cancelled());
}

// ===== Selection Cap and Progress =====

#[test]
fn test_runaway_duplication_stops_at_cap() {
    init();
    let mut doc = document(&["again"]);
    let mut visits = 0;
    let mut script = script_fn(|b: &mut ScriptBindings<'_>| {
        visits += 1;
        b.duplicate();
        Ok(())
    });

    let selection = ApplySectionsCommand::new().run(&mut doc, &[1], &mut script).unwrap();
    assert_eq!(visits, 1000);
    assert_eq!(doc.line_count(), 1001);
    assert_eq!(selection, vec![1]);
    assert_eq!(doc.progress().len(), 1000);
    assert_eq!(doc.undo_checkpoints().len(), 1);
}

#[test]
fn test_custom_cap() {
    init();
    let mut doc = document(&["again"]);
    let mut script = script_fn(|b: &mut ScriptBindings<'_>| {
        b.duplicate();
        Ok(())
    });

    let command = ApplySectionsCommand::with_config(ApplyConfig::default().with_selection_cap(5));
    command.run(&mut doc, &[1], &mut script).unwrap();
    assert_eq!(doc.line_count(), 6);
}

#[test]
fn test_progress_follows_growing_selection() {
    init();
    let mut doc = numbered(4);
    let mut script = script_fn(|b: &mut ScriptBindings<'_>| {
        if b.i() == 1 {
            b.duplicate();
        }
        Ok(())
    });

    ApplySectionsCommand::new().run(&mut doc, &[1, 3], &mut script).unwrap();
    assert_eq!(doc.progress(), [1.0 / 2.0, 2.0 / 3.0, 3.0 / 3.0]);
}

#[test]
fn test_progress_can_be_disabled() {
    init();
    let mut doc = numbered(2);
    let mut script = script_fn(|_: &mut ScriptBindings<'_>| Ok(()));

    let command = ApplySectionsCommand::with_config(ApplyConfig::default().with_progress(false));
    command.run(&mut doc, &[1, 2], &mut script).unwrap();
    assert!(doc.progress().is_empty());
}

#[test]
fn test_empty_selection() {
    init();
    let mut doc = numbered(2);
    let mut script = script_fn(|_: &mut ScriptBindings<'_>| Ok(()));

    let selection = ApplySectionsCommand::new().run(&mut doc, &[], &mut script).unwrap();
    assert!(selection.is_empty());
    assert_eq!(doc.undo_checkpoints(), ["Apply to sections"]);
}

// ===== Cancellation =====

/// Host that reports cancellation after a number of line writes
struct CancelAfterWrites {
    inner: MemoryDocument,
    writes: usize,
    limit: usize,
}

impl DocumentHost for CancelAfterWrites {
    fn line(&self, index: usize) -> Result<Line> {
        self.inner.line(index)
    }

    fn set_line(&mut self, index: usize, line: Line) -> Result<()> {
        self.writes += 1;
        self.inner.set_line(index, line)
    }

    fn insert_line(&mut self, index: usize, line: Line) -> Result<()> {
        self.inner.insert_line(index, line)
    }

    fn line_count(&self) -> usize {
        self.inner.line_count()
    }

    fn style(&self, name: &str) -> Option<Style> {
        self.inner.style(name)
    }

    fn frame_size(&self) -> Frame {
        self.inner.frame_size()
    }

    fn log_message(&mut self, message: &str) {
        self.inner.log_message(message);
    }

    fn is_cancelled(&self) -> bool {
        self.writes >= self.limit
    }
}

#[test]
fn test_cancellation_keeps_written_lines() {
    init();
    let mut host = CancelAfterWrites {
        inner: document(&["a", "b", "c"]),
        writes: 0,
        limit: 1,
    };
    let mut script = script_fn(|b: &mut ScriptBindings<'_>| {
        b.set_text("done");
        Ok(())
    });

    let err = ApplySectionsCommand::new().run(&mut host, &[1, 2, 3], &mut script).unwrap_err();
    assert!(err.is_cancellation());
    assert_eq!(host.inner.texts(), ["done", "b", "c"]);
    assert!(host.inner.messages().is_empty());
}

// ===== Engines =====

/// Engine compiling a tiny command language: `fs+N` or `fail`
struct TinyEngine;

impl ScriptEngine for TinyEngine {
    type Script = Box<dyn FnMut(&mut ScriptBindings<'_>) -> Result<()>>;

    fn compile(&self, source: &str) -> Result<Self::Script> {
        let amount: f64 = source
            .strip_prefix("fs+")
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| EditorError::compile(format!("cannot parse {source:?}")))?;
        Ok(Box::new(move |b: &mut ScriptBindings<'_>| b.modify("fs", &add([amount]))))
    }
}

#[test]
fn test_run_source_compiles_then_runs() {
    init();
    let mut doc = document(&["{\\fs20}x"]);
    ApplySectionsCommand::new()
        .run_source(&TinyEngine, "fs+5", &mut doc, &[1])
        .unwrap();
    assert_eq!(doc.texts(), ["{\\fs25}x"]);
}

#[test]
fn test_compile_fault_changes_nothing() {
    init();
    let mut doc = document(&["{\\fs20}x"]);
    let err = ApplySectionsCommand::new()
        .run_source(&TinyEngine, "fail", &mut doc, &[1])
        .unwrap_err();
    assert_eq!(err, EditorError::compile("cannot parse \"fail\""));
    assert_eq!(doc.texts(), ["{\\fs20}x"]);
    assert_eq!(doc.messages(), ["Script failed to compile: cannot parse \"fail\""]);
    assert!(doc.was_cancelled());
}
