//=========================================================================
// Script Resources
//=========================================================================
//
// Lua-backed structured configuration and scene scripts.
//
// Architecture:
// ```text
//   *.lua ──Lua (mlua)──> globals defined by the chunk
//                              ↓ convert
//                         ScriptTable tree ──> ReadScript   (typed reads)
//                              ↑               ModifyScript (dotted writes)
//                              └── to_lua_source() ──> commit
//
//   boot.lua ──Lua (mlua)──> SceneScript (hook calls, draw queue)
// ```
//
// Config resources are executed once and copied into an owned
// `ScriptTable`, so readers never hold Lua references. Only globals the
// chunk itself defined are kept; standard library entries are ignored.
//
//=========================================================================

//=== Module Declarations =================================================

mod modify;
mod read;
mod scene;

//=== Public API ==========================================================

pub use modify::ModifyScript;
pub use read::ReadScript;
pub use scene::{SceneScript, ScriptDraw};

//=== External Dependencies ===============================================

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use mlua::{Lua, Table, Value};
use thiserror::Error;

//=== ScriptError =========================================================

/// Failures while loading, running or writing a script resource.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Lua error in '{}': {source}", .path.display())]
    Lua {
        path: PathBuf,
        #[source]
        source: mlua::Error,
    },

    #[error("'{}' does not define the tablespace '{name}'", .path.display())]
    MissingTablespace { path: PathBuf, name: String },

    #[error("'{}': {detail}", .path.display())]
    Unsupported { path: PathBuf, detail: String },
}

//=== TableKey ============================================================

/// Key of a [`ScriptTable`] entry. Sequence indices sort before names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TableKey {
    Index(i64),
    Name(String),
}

impl std::fmt::Display for TableKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKey::Index(i) => write!(f, "[{}]", i),
            TableKey::Name(name) => f.write_str(name),
        }
    }
}

//=== ScriptValue =========================================================

/// Owned copy of a Lua value that a config resource may hold.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Table(ScriptTable),
}

impl ScriptValue {
    /// Lua-style type name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ScriptValue::Bool(_) => "boolean",
            ScriptValue::Int(_) => "integer",
            ScriptValue::Float(_) => "number",
            ScriptValue::Str(_) => "string",
            ScriptValue::Table(_) => "table",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ScriptValue::Int(i) => Some(*i),
            ScriptValue::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ScriptValue::Int(i) => Some(*i as f64),
            ScriptValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScriptValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScriptValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&ScriptTable> {
        match self {
            ScriptValue::Table(t) => Some(t),
            _ => None,
        }
    }
}

//=== ScriptTable =========================================================

/// Ordered key/value table mirroring a Lua table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptTable {
    entries: BTreeMap<TableKey, ScriptValue>,
}

impl ScriptTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &TableKey) -> Option<&ScriptValue> {
        self.entries.get(key)
    }

    pub fn get_named(&self, name: &str) -> Option<&ScriptValue> {
        self.entries.get(&TableKey::Name(name.to_string()))
    }

    pub fn set(&mut self, key: TableKey, value: ScriptValue) {
        self.entries.insert(key, value);
    }

    pub fn set_named(&mut self, name: &str, value: ScriptValue) {
        self.set(TableKey::Name(name.to_string()), value);
    }

    /// Appends `value` after the current sequence part.
    pub fn push(&mut self, value: ScriptValue) {
        let next = self.sequence_len() as i64 + 1;
        self.set(TableKey::Index(next), value);
    }

    /// Length of the contiguous `1..=n` sequence part (Lua `#t`).
    pub fn sequence_len(&self) -> usize {
        let mut n = 0;
        while self.entries.contains_key(&TableKey::Index(n as i64 + 1)) {
            n += 1;
        }
        n
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TableKey, &ScriptValue)> {
        self.entries.iter()
    }

    /// Returns the named sub-table, replacing any non-table value.
    pub(crate) fn table_entry(&mut self, name: &str) -> &mut ScriptTable {
        let key = TableKey::Name(name.to_string());
        let slot = self
            .entries
            .entry(key)
            .or_insert_with(|| ScriptValue::Table(ScriptTable::new()));
        if !matches!(slot, ScriptValue::Table(_)) {
            debug!("Replacing non-table value at '{}' with a table", name);
            *slot = ScriptValue::Table(ScriptTable::new());
        }
        match slot {
            ScriptValue::Table(table) => table,
            _ => unreachable!("slot was just set to a table"),
        }
    }
}

//=== Lua Conversion ======================================================

const MAX_TABLE_DEPTH: usize = 32;

/// Runs `source` and returns the globals it defined.
pub(crate) fn execute_config(path: &Path, source: &str) -> Result<ScriptTable, ScriptError> {
    let lua = Lua::new();
    let lua_err = |source: mlua::Error| ScriptError::Lua { path: path.to_path_buf(), source };

    let globals = lua.globals();
    let builtins: HashSet<String> = globals
        .clone()
        .pairs::<Value, Value>()
        .filter_map(|pair| match pair {
            Ok((Value::String(name), _)) => name.to_str().ok().map(str::to_string),
            _ => None,
        })
        .collect();

    lua.load(source)
        .set_name(path.display().to_string())
        .exec()
        .map_err(lua_err)?;

    let mut root = ScriptTable::new();
    for pair in globals.pairs::<Value, Value>() {
        let (key, value) = pair.map_err(lua_err)?;
        let Value::String(name) = key else { continue };
        let Ok(name) = name.to_str() else { continue };
        if builtins.contains(name) {
            continue;
        }
        if let Some(value) = convert_value(path, value, 0)? {
            root.set_named(name, value);
        }
    }
    Ok(root)
}

fn convert_value(path: &Path, value: Value, depth: usize) -> Result<Option<ScriptValue>, ScriptError> {
    let converted = match value {
        Value::Boolean(b) => ScriptValue::Bool(b),
        Value::Integer(i) => ScriptValue::Int(i),
        Value::Number(n) => {
            if n.fract() == 0.0 && n.abs() < 9.0e15 {
                ScriptValue::Int(n as i64)
            } else {
                ScriptValue::Float(n)
            }
        }
        Value::String(s) => match s.to_str() {
            Ok(text) => ScriptValue::Str(text.to_string()),
            Err(_) => {
                return Err(ScriptError::Unsupported {
                    path: path.to_path_buf(),
                    detail: "string is not valid UTF-8".to_string(),
                })
            }
        },
        Value::Table(table) => ScriptValue::Table(convert_table(path, table, depth + 1)?),
        // Functions, userdata and nil carry no configuration data
        _ => return Ok(None),
    };
    Ok(Some(converted))
}

fn convert_table(path: &Path, table: Table, depth: usize) -> Result<ScriptTable, ScriptError> {
    if depth > MAX_TABLE_DEPTH {
        return Err(ScriptError::Unsupported {
            path: path.to_path_buf(),
            detail: format!("tables nested deeper than {} levels", MAX_TABLE_DEPTH),
        });
    }

    let mut out = ScriptTable::new();
    for pair in table.pairs::<Value, Value>() {
        let (key, value) = pair.map_err(|source| ScriptError::Lua { path: path.to_path_buf(), source })?;
        let key = match key {
            Value::String(s) => match s.to_str() {
                Ok(name) => TableKey::Name(name.to_string()),
                Err(_) => continue,
            },
            Value::Integer(i) => TableKey::Index(i),
            Value::Number(n) if n.fract() == 0.0 => TableKey::Index(n as i64),
            _ => continue,
        };
        if let Some(value) = convert_value(path, value, depth)? {
            out.set(key, value);
        }
    }
    Ok(out)
}

//=== Lua Serialization ===================================================

/// Renders `root` as a Lua chunk assigning each named entry as a global.
pub(crate) fn to_lua_source(root: &ScriptTable) -> String {
    let mut out = String::from("-- Rewritten by the game whenever settings change.\n");
    for (key, value) in root.iter() {
        if let TableKey::Name(name) = key {
            out.push('\n');
            let _ = write!(out, "{} = ", name);
            write_value(&mut out, value, 0);
            out.push('\n');
        }
    }
    out
}

fn write_value(out: &mut String, value: &ScriptValue, indent: usize) {
    match value {
        ScriptValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        ScriptValue::Int(i) => {
            let _ = write!(out, "{}", i);
        }
        ScriptValue::Float(f) => out.push_str(&format_float(*f)),
        ScriptValue::Str(s) => write_string(out, s),
        ScriptValue::Table(table) => write_table(out, table, indent),
    }
}

fn write_table(out: &mut String, table: &ScriptTable, indent: usize) {
    if table.is_empty() {
        out.push_str("{}");
        return;
    }

    let pad = "    ".repeat(indent + 1);
    let sequence = table.sequence_len() as i64;
    out.push_str("{\n");
    for (key, value) in table.iter() {
        out.push_str(&pad);
        match key {
            TableKey::Index(i) if (1..=sequence).contains(i) => {}
            TableKey::Index(i) => {
                let _ = write!(out, "[{}] = ", i);
            }
            TableKey::Name(name) if is_identifier(name) => {
                let _ = write!(out, "{} = ", name);
            }
            TableKey::Name(name) => {
                out.push('[');
                write_string(out, name);
                out.push_str("] = ");
            }
        }
        write_value(out, value, indent + 1);
        out.push_str(",\n");
    }
    out.push_str(&"    ".repeat(indent));
    out.push('}');
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                let _ = write!(out, "\\{:03}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "0/0".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "1/0" } else { "-1/0" }.to_string();
    }
    let text = f.to_string();
    if text.contains('.') || text.contains('e') {
        text
    } else {
        format!("{}.0", text)
    }
}

const LUA_KEYWORDS: [&str; 22] = [
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_ok = chars
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_');
    starts_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !LUA_KEYWORDS.contains(&name)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> ScriptTable {
        execute_config(Path::new("test.lua"), source).expect("script should run")
    }

    //=====================================================================
    // Conversion
    //=====================================================================

    #[test]
    fn only_script_defined_globals_are_kept() {
        let root = run("answer = 42\nlocal hidden = 1\n");

        assert_eq!(root.get_named("answer"), Some(&ScriptValue::Int(42)));
        assert!(root.get_named("hidden").is_none());
        assert!(root.get_named("string").is_none(), "stdlib must be filtered");
        assert!(root.get_named("print").is_none());
    }

    #[test]
    fn nested_tables_and_sequences_convert() {
        let root = run(r#"
            languages = { { "English", "en" }, { "Deutsch", "de" } }
            audio = { music_vol = 0.5, enabled = true }
        "#);

        let languages = root.get_named("languages").and_then(ScriptValue::as_table).unwrap();
        assert_eq!(languages.sequence_len(), 2);

        let audio = root.get_named("audio").and_then(ScriptValue::as_table).unwrap();
        assert_eq!(audio.get_named("music_vol"), Some(&ScriptValue::Float(0.5)));
        assert_eq!(audio.get_named("enabled"), Some(&ScriptValue::Bool(true)));
    }

    #[test]
    fn functions_are_ignored() {
        let root = run("helper = function() return 1 end\nvalue = helper()\n");
        assert!(root.get_named("helper").is_none());
        assert_eq!(root.get_named("value"), Some(&ScriptValue::Int(1)));
    }

    #[test]
    fn syntax_errors_are_reported() {
        let err = execute_config(Path::new("broken.lua"), "settings = {").unwrap_err();
        assert!(matches!(err, ScriptError::Lua { .. }));
        assert!(err.to_string().contains("broken.lua"));
    }

    #[test]
    fn self_referencing_table_hits_depth_limit() {
        let err = execute_config(Path::new("loop.lua"), "t = {}\nt.me = t\n").unwrap_err();
        assert!(matches!(err, ScriptError::Unsupported { .. }));
    }

    //=====================================================================
    // Serialization
    //=====================================================================

    #[test]
    fn serialized_source_reloads_identically() {
        let original = run(r#"
            settings = { first_start = 0, language = "fr" }
            audio_settings = { music_vol = 0.7, sound_vol = 1.0 }
            key_settings = { up = "up", ["odd key"] = "\\", quote = "say \"hi\"\n" }
            languages = { { "English", "en" }, { "Français", "fr" } }
        "#);

        let reloaded = run(&to_lua_source(&original));

        let audio = reloaded.get_named("audio_settings").and_then(ScriptValue::as_table).unwrap();
        assert_eq!(audio.get_named("music_vol").and_then(ScriptValue::as_float), Some(0.7));
        assert_eq!(audio.get_named("sound_vol").and_then(ScriptValue::as_float), Some(1.0));
        assert_eq!(reloaded.get_named("settings"), original.get_named("settings"));
        assert_eq!(reloaded.get_named("key_settings"), original.get_named("key_settings"));
        assert_eq!(reloaded.get_named("languages"), original.get_named("languages"));
    }

    #[test]
    fn floats_keep_a_decimal_point() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(0.25), "0.25");
        assert_eq!(format_float(f64::INFINITY), "1/0");
    }

    #[test]
    fn keywords_are_not_identifiers() {
        assert!(is_identifier("screen_resx"));
        assert!(!is_identifier("end"));
        assert!(!is_identifier("while"));
        assert!(!is_identifier("9lives"));
        assert!(!is_identifier(""));
    }
}
