//! Lua script engine
//!
//! Scripts are Lua 5.4 chunks run once per section in a sandbox with only
//! the `math`, `string` and `table` libraries. Each run sees these globals:
//!
//! | name | meaning |
//! |------|---------|
//! | `i`, `li`, `j` | selection entry, document line and section, all 1-based |
//! | `pos`, `org` | `{x, y}` of the line's position and rotation origin |
//! | `state` | table of the section's resolved tag values |
//! | `text`, `tag` | section text and markup block; assigning them edits the section |
//!
//! and these functions:
//!
//! - `get(tag)` returns the tag's values, one per parameter
//! - `modify(tag, combinator)` rewrites the tag through a combinator
//! - `remove(tag, ...)` strips tags and `insert(literal)` appends markup
//! - `select()`, `duplicate()` and `modify_line(name, combinator)` act on
//!   the line once all sections ran
//!
//! Combinators come from `add(...)`, `multiply(...)`, `replace(...)` and
//! `append(suffix)`.

use crate::core::{EditorError, Result};
use crate::script::{ScriptBindings, ScriptEngine, SectionScript};
use ass_sections_core::combinator::{add, append, multiply};
use ass_sections_core::{Combinator, PropertyState, TagValue};
use core::cell::RefCell;
use mlua::{Function, Lua, LuaOptions, MetaMethod, StdLib, UserData, UserDataMethods, UserDataRef, Value, Variadic};

/// Chunk name shown in Lua error messages
const CHUNK_NAME: &str = "=script";

/// Base library functions that reach the filesystem, stdout or the loader
const BLOCKED_GLOBALS: [&str; 4] = ["dofile", "loadfile", "load", "print"];

/// Combinator handed to scripts as userdata
#[derive(Debug, Clone, PartialEq)]
pub struct LuaCombinator(pub Combinator);

impl UserData for LuaCombinator {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_meta_method(MetaMethod::ToString, |_, this, ()| Ok(this.0.name()));
    }
}

/// Compiles Lua source into section scripts
#[derive(Debug, Clone)]
pub struct LuaEngine {
    lua: Lua,
}

impl LuaEngine {
    /// Create a sandboxed interpreter with the combinator constructors
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ScriptCompile`] if the interpreter cannot be
    /// set up.
    pub fn new() -> Result<Self> {
        let lua = Lua::new_with(StdLib::MATH | StdLib::STRING | StdLib::TABLE, LuaOptions::new())
            .map_err(|err| EditorError::compile(root_message(&err)))?;
        register_combinators(&lua)
            .and_then(|()| restrict_base_library(&lua))
            .map_err(|err| EditorError::compile(root_message(&err)))?;
        Ok(Self { lua })
    }
}

impl ScriptEngine for LuaEngine {
    type Script = LuaScript;

    fn compile(&self, source: &str) -> Result<LuaScript> {
        let function = self
            .lua
            .load(source)
            .set_name(CHUNK_NAME)
            .into_function()
            .map_err(|err| EditorError::compile(root_message(&err)))?;
        log::debug!("compiled Lua script ({} bytes)", source.len());
        Ok(LuaScript {
            lua: self.lua.clone(),
            function,
        })
    }
}

fn register_combinators(lua: &Lua) -> mlua::Result<()> {
    let globals = lua.globals();
    globals.set(
        "add",
        lua.create_function(|_, values: Variadic<Value>| Ok(LuaCombinator(add(operands(values)?))))?,
    )?;
    globals.set(
        "multiply",
        lua.create_function(|_, values: Variadic<Value>| {
            Ok(LuaCombinator(multiply(operands(values)?)))
        })?,
    )?;
    globals.set(
        "replace",
        lua.create_function(|_, values: Variadic<Value>| {
            Ok(LuaCombinator(Combinator::Replace(operands(values)?)))
        })?,
    )?;
    globals.set(
        "append",
        lua.create_function(|_, suffix: String| Ok(LuaCombinator(append(suffix))))?,
    )?;
    Ok(())
}

/// Operands keep their Lua type; `add` and `multiply` coerce text when applied
fn operands(values: Variadic<Value>) -> mlua::Result<Vec<TagValue>> {
    values.into_iter().map(from_lua).collect()
}

fn restrict_base_library(lua: &Lua) -> mlua::Result<()> {
    let globals = lua.globals();
    for name in BLOCKED_GLOBALS {
        globals.set(name, Value::Nil)?;
    }
    Ok(())
}

/// Compiled Lua chunk
#[derive(Debug, Clone)]
pub struct LuaScript {
    lua: Lua,
    function: Function,
}

impl SectionScript for LuaScript {
    fn run(&mut self, bindings: &mut ScriptBindings<'_>) -> Result<()> {
        let (li, j) = (bindings.li(), bindings.j());
        self.execute(bindings)
            .map_err(|err| EditorError::runtime(li, j, root_message(&err)))
    }
}

impl LuaScript {
    fn execute(&self, bindings: &mut ScriptBindings<'_>) -> mlua::Result<()> {
        let lua = &self.lua;
        let globals = lua.globals();
        globals.set("i", bindings.i())?;
        globals.set("li", bindings.li())?;
        globals.set("j", bindings.j())?;
        let (x, y) = bindings.pos();
        globals.set("pos", lua.create_sequence_from([x, y])?)?;
        let (x, y) = bindings.org();
        globals.set("org", lua.create_sequence_from([x, y])?)?;
        publish(lua, bindings)?;

        let cell = RefCell::new(bindings);
        lua.scope(|scope| {
            globals.set(
                "get",
                scope.create_function(|lua, tag: String| {
                    let values = cell.borrow().get(&tag);
                    values
                        .iter()
                        .map(|value| to_lua(lua, value))
                        .collect::<mlua::Result<Variadic<Value>>>()
                })?,
            )?;
            globals.set(
                "modify",
                scope.create_function(|lua, (tag, combinator): (String, UserDataRef<LuaCombinator>)| {
                    mutate(lua, &cell, |b| b.modify(&tag, &combinator.0))
                })?,
            )?;
            globals.set(
                "remove",
                scope.create_function(|lua, tags: Variadic<String>| {
                    mutate(lua, &cell, |b| {
                        b.remove(tags.as_slice());
                        Ok(())
                    })
                })?,
            )?;
            globals.set(
                "insert",
                scope.create_function(|lua, literal: String| {
                    mutate(lua, &cell, |b| {
                        b.insert(&literal);
                        Ok(())
                    })
                })?,
            )?;
            globals.set(
                "select",
                scope.create_function(|lua, ()| {
                    mutate(lua, &cell, |b| {
                        b.select();
                        Ok(())
                    })
                })?,
            )?;
            globals.set(
                "duplicate",
                scope.create_function(|lua, ()| {
                    mutate(lua, &cell, |b| {
                        b.duplicate();
                        Ok(())
                    })
                })?,
            )?;
            globals.set(
                "modify_line",
                scope.create_function(|lua, (name, combinator): (String, UserDataRef<LuaCombinator>)| {
                    mutate(lua, &cell, |b| b.modify_line(&name, &combinator.0))
                })?,
            )?;

            self.function.call::<()>(())
        })?;

        pull(lua, cell.into_inner())
    }
}

/// Run an edit with assignments to `text` and `tag` applied first, then
/// republish the section
fn mutate<'b, F>(lua: &Lua, cell: &RefCell<&mut ScriptBindings<'b>>, edit: F) -> mlua::Result<()>
where
    F: FnOnce(&mut ScriptBindings<'b>) -> Result<()>,
{
    let mut bindings = cell.borrow_mut();
    pull(lua, &mut **bindings)?;
    edit(&mut **bindings).map_err(mlua::Error::external)?;
    publish(lua, &**bindings)
}

fn publish(lua: &Lua, bindings: &ScriptBindings<'_>) -> mlua::Result<()> {
    let globals = lua.globals();
    globals.set("text", bindings.text())?;
    globals.set("tag", bindings.tag())?;
    globals.set("state", state_table(lua, bindings.state())?)?;
    Ok(())
}

fn pull(lua: &Lua, bindings: &mut ScriptBindings<'_>) -> mlua::Result<()> {
    let globals = lua.globals();
    if let Some(tag) = globals.get::<Option<String>>("tag")? {
        if tag != bindings.tag() {
            bindings.set_tag(&tag);
        }
    }
    if let Some(text) = globals.get::<Option<String>>("text")? {
        if text != bindings.text() {
            bindings.set_text(text);
        }
    }
    Ok(())
}

fn state_table(lua: &Lua, state: &PropertyState) -> mlua::Result<mlua::Table> {
    let table = lua.create_table()?;
    for (key, value) in state.iter() {
        table.set(key, to_lua(lua, value)?)?;
    }
    Ok(table)
}

fn to_lua(lua: &Lua, value: &TagValue) -> mlua::Result<Value> {
    match value {
        TagValue::Number(n) => Ok(Value::Number(*n)),
        TagValue::Text(text) => Ok(Value::String(lua.create_string(text)?)),
    }
}

fn from_lua(value: Value) -> mlua::Result<TagValue> {
    match value {
        Value::Integer(n) => Ok(TagValue::Number(n as f64)),
        Value::Number(n) => Ok(TagValue::Number(n)),
        Value::Boolean(flag) => Ok(TagValue::Number(if flag { 1.0 } else { 0.0 })),
        Value::String(text) => Ok(TagValue::Text(text.to_string_lossy().into())),
        other => Err(mlua::Error::runtime(format!(
            "cannot use a {} as a tag value",
            other.type_name()
        ))),
    }
}

/// Innermost message of a Lua error, without callback wrapping
fn root_message(err: &mlua::Error) -> String {
    match err {
        mlua::Error::CallbackError { cause, .. } => root_message(cause),
        mlua::Error::ExternalError(inner) => inner.to_string(),
        mlua::Error::RuntimeError(message) | mlua::Error::SyntaxError { message, .. } => message.clone(),
        other => other.to_string(),
    }
}
