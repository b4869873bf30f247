//=========================================================================
// Read Script
//=========================================================================
//
// Typed, table-scoped reads from a Lua config resource.
//
// Usage:
//   open() → open_table("video_settings") → read_int("screen_resx") ...
//          → close_table() → is_error_detected()
//
// Reads never fail outright. A missing key or a value of the wrong type
// returns the type's default and appends a message to the error log, so
// a caller can read a whole section and check for errors once.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

//=== Internal Dependencies ===============================================

use super::{execute_config, ScriptError, ScriptTable, ScriptValue, TableKey};

//=== ReadScript ==========================================================

/// Read-only view of a Lua config resource.
#[derive(Debug)]
pub struct ReadScript {
    path: PathBuf,
    root: ScriptTable,
    open_tables: Vec<TableKey>,
    errors: Vec<String>,
}

impl ReadScript {
    //--- Construction -----------------------------------------------------

    /// Reads and executes the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .map_err(|source| ScriptError::Read { path: path.to_path_buf(), source })?;
        Self::from_source(path, &source)
    }

    /// Executes `source`, reporting errors against `path`.
    pub fn from_source(path: impl AsRef<Path>, source: &str) -> Result<Self, ScriptError> {
        let path = path.as_ref().to_path_buf();
        let root = execute_config(&path, source)?;
        debug!("Opened script '{}'", path.display());
        Ok(Self { path, root, open_tables: Vec::new(), errors: Vec::new() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Top-level globals defined by the script.
    pub fn root(&self) -> &ScriptTable {
        &self.root
    }

    /// Name of the global table named after the file stem, if defined.
    pub fn tablespace(&self) -> Option<&str> {
        let stem = self.path.file_stem()?.to_str()?;
        self.root.get_named(stem)?.as_table().map(|_| stem)
    }

    //--- Table Navigation -------------------------------------------------

    /// Returns `true` if the current table has a sub-table `name`.
    pub fn does_table_exist(&self, name: &str) -> bool {
        self.lookup(&TableKey::Name(name.to_string()))
            .map_or(false, |v| v.as_table().is_some())
    }

    /// Enters the sub-table `name`. On failure the error is logged and the
    /// table is still pushed, so every `open_table` pairs with a
    /// `close_table`; reads inside it fail.
    pub fn open_table(&mut self, name: &str) -> bool {
        self.enter(TableKey::Name(name.to_string()))
    }

    /// Enters the sub-table at sequence position `index` (1-based).
    pub fn open_table_at(&mut self, index: usize) -> bool {
        self.enter(TableKey::Index(index as i64))
    }

    pub fn close_table(&mut self) {
        if self.open_tables.pop().is_none() {
            self.errors.push("close_table() called with no open table".to_string());
        }
    }

    pub fn close_all_tables(&mut self) {
        self.open_tables.clear();
    }

    /// Sequence length of the current table, or 0 if none is open.
    pub fn table_size(&self) -> usize {
        if self.open_tables.is_empty() {
            return 0;
        }
        self.current().map_or(0, ScriptTable::sequence_len)
    }

    //--- Existence Checks -------------------------------------------------

    pub fn does_int_exist(&self, key: &str) -> bool {
        self.named(key).and_then(ScriptValue::as_int).is_some()
    }

    pub fn does_float_exist(&self, key: &str) -> bool {
        self.named(key).and_then(ScriptValue::as_float).is_some()
    }

    pub fn does_bool_exist(&self, key: &str) -> bool {
        self.named(key).and_then(ScriptValue::as_bool).is_some()
    }

    pub fn does_string_exist(&self, key: &str) -> bool {
        self.named(key).and_then(ScriptValue::as_str).is_some()
    }

    //--- Typed Reads ------------------------------------------------------

    pub fn read_int(&mut self, key: &str) -> i64 {
        self.read(TableKey::Name(key.to_string()), "integer", ScriptValue::as_int)
            .unwrap_or(0)
    }

    pub fn read_float(&mut self, key: &str) -> f64 {
        self.read(TableKey::Name(key.to_string()), "number", ScriptValue::as_float)
            .unwrap_or(0.0)
    }

    pub fn read_bool(&mut self, key: &str) -> bool {
        self.read(TableKey::Name(key.to_string()), "boolean", ScriptValue::as_bool)
            .unwrap_or(false)
    }

    pub fn read_string(&mut self, key: &str) -> String {
        self.read(TableKey::Name(key.to_string()), "string", |v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    }

    /// Reads the string at sequence position `index` (1-based).
    pub fn read_string_at(&mut self, index: usize) -> String {
        self.read(TableKey::Index(index as i64), "string", |v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    }

    //--- Error Log --------------------------------------------------------

    pub fn is_error_detected(&self) -> bool {
        !self.errors.is_empty()
    }

    /// All accumulated error messages, one per line.
    pub fn error_messages(&self) -> String {
        self.errors.join("\n")
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    //--- Internal Helpers -------------------------------------------------

    fn current(&self) -> Option<&ScriptTable> {
        let mut table = &self.root;
        for key in &self.open_tables {
            table = table.get(key)?.as_table()?;
        }
        Some(table)
    }

    fn lookup(&self, key: &TableKey) -> Option<&ScriptValue> {
        self.current()?.get(key)
    }

    fn named(&self, key: &str) -> Option<&ScriptValue> {
        self.lookup(&TableKey::Name(key.to_string()))
    }

    fn scope(&self) -> String {
        if self.open_tables.is_empty() {
            return "<globals>".to_string();
        }
        self.open_tables
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }

    fn enter(&mut self, key: TableKey) -> bool {
        let found = self.lookup(&key).map_or(false, |v| v.as_table().is_some());
        if !found {
            let message = format!(
                "{}: table '{}' not found in {}",
                self.path.display(),
                key,
                self.scope()
            );
            self.errors.push(message);
        }
        self.open_tables.push(key);
        found
    }

    fn read<T>(
        &mut self,
        key: TableKey,
        expected: &str,
        convert: impl Fn(&ScriptValue) -> Option<T>,
    ) -> Option<T> {
        let outcome = match self.lookup(&key) {
            Some(value) => convert(value).ok_or_else(|| {
                format!("'{}' is a {}, expected {}", key, value.type_name(), expected)
            }),
            None => Err(format!("'{}' not found", key)),
        };

        match outcome {
            Ok(value) => Some(value),
            Err(reason) => {
                let message = format!("{}: {} in {}", self.path.display(), reason, self.scope());
                self.errors.push(message);
                None
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
