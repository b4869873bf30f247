//=========================================================================
// Modify Script
//=========================================================================
//
// Field-level edits to a Lua config resource with a single commit.
//
// Usage:
//   open() → modify_int("settings.first_start", 0) → ... → commit()
//
// Paths are dotted and resolve relative to the currently open table.
// Missing intermediate tables are created. `commit()` rewrites the whole
// file through a temporary sibling and a rename, so a failed write never
// leaves a truncated settings file behind.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{execute_config, to_lua_source, ScriptError, ScriptTable, ScriptValue};

//=== ModifyScript ========================================================

/// Editable copy of a Lua config resource.
#[derive(Debug)]
pub struct ModifyScript {
    path: PathBuf,
    root: ScriptTable,
    open_tables: Vec<String>,
}

impl ModifyScript {
    //--- Construction -----------------------------------------------------

    /// Loads the file at `path` for editing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref().to_path_buf();
        let source = fs::read_to_string(&path)
            .map_err(|source| ScriptError::Read { path: path.clone(), source })?;
        let root = execute_config(&path, &source)?;
        Ok(Self { path, root, open_tables: Vec::new() })
    }

    /// Starts an empty document that will be written to `path`.
    pub fn create(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf(), root: ScriptTable::new(), open_tables: Vec::new() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn root(&self) -> &ScriptTable {
        &self.root
    }

    //--- Table Navigation -------------------------------------------------

    /// Enters the sub-table `name`, creating it if needed.
    pub fn open_table(&mut self, name: &str) {
        self.open_tables.push(name.to_string());
    }

    pub fn close_table(&mut self) {
        if self.open_tables.pop().is_none() {
            warn!("close_table() called with no open table in '{}'", self.path.display());
        }
    }

    //--- Field Updates ----------------------------------------------------

    pub fn modify_int(&mut self, path: &str, value: i64) {
        self.modify(path, ScriptValue::Int(value));
    }

    pub fn modify_float(&mut self, path: &str, value: f64) {
        self.modify(path, ScriptValue::Float(value));
    }

    pub fn modify_bool(&mut self, path: &str, value: bool) {
        self.modify(path, ScriptValue::Bool(value));
    }

    pub fn modify_string(&mut self, path: &str, value: &str) {
        self.modify(path, ScriptValue::Str(value.to_string()));
    }

    //--- Commit -----------------------------------------------------------

    /// Writes the document back to its file.
    pub fn commit(&self) -> Result<(), ScriptError> {
        let temp = self.path.with_extension("lua.tmp");
        let write_err = |source: std::io::Error| ScriptError::Write { path: self.path.clone(), source };

        fs::write(&temp, to_lua_source(&self.root)).map_err(write_err)?;
        if let Err(source) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(write_err(source));
        }

        debug!("Committed '{}'", self.path.display());
        Ok(())
    }

    //--- Internal Helpers -------------------------------------------------

    fn modify(&mut self, path: &str, value: ScriptValue) {
        let mut segments: Vec<&str> = self.open_tables.iter().map(String::as_str).collect();
        segments.extend(path.split('.').filter(|s| !s.is_empty()));

        let Some((field, parents)) = segments.split_last() else {
            warn!("Ignoring modification with an empty path in '{}'", self.path.display());
            return;
        };

        let mut table = &mut self.root;
        for parent in parents {
            table = table.table_entry(parent);
        }
        table.set_named(field, value);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::script::ReadScript;

    fn write(dir: &tempfile::TempDir, name: &str, source: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, source).unwrap();
        path
    }

    #[test]
    fn modifications_survive_commit_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "settings.lua",
            "settings = { first_start = 1, language = \"en\" }\nvideo_settings = { screen_resx = 640 }\n",
        );

        let mut modify = ModifyScript::open(&path).unwrap();
        modify.modify_int("settings.first_start", 0);
        modify.open_table("video_settings");
        modify.modify_int("screen_resx", 1024);
        modify.modify_bool("full_screen", true);
        modify.close_table();
        modify.commit().unwrap();

        let mut read = ReadScript::open(&path).unwrap();
        read.open_table("settings");
        assert_eq!(read.read_int("first_start"), 0);
        assert_eq!(read.read_string("language"), "en", "untouched fields are kept");
        read.close_table();
        read.open_table("video_settings");
        assert_eq!(read.read_int("screen_resx"), 1024);
        assert!(read.read_bool("full_screen"));
        assert!(!read.is_error_detected(), "{}", read.error_messages());
    }

    #[test]
    fn missing_tables_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.lua");

        let mut modify = ModifyScript::create(&path);
        modify.modify_float("audio_settings.music_vol", 0.5);
        modify.commit().unwrap();

        let mut read = ReadScript::open(&path).unwrap();
        read.open_table("audio_settings");
        assert_eq!(read.read_float("music_vol"), 0.5);
    }

    #[test]
    fn commit_failure_leaves_original_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "settings.lua", "settings = { first_start = 1 }\n");
        // A directory squatting on the temp path makes the write fail
        fs::create_dir(path.with_extension("lua.tmp")).unwrap();

        let mut modify = ModifyScript::open(&path).unwrap();
        modify.modify_int("settings.first_start", 0);

        let err = modify.commit().unwrap_err();
        assert!(matches!(err, ScriptError::Write { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "settings = { first_start = 1 }\n");
    }

    #[test]
    fn scalar_is_replaced_by_table_on_nested_write() {
        let mut modify = ModifyScript::create("unused.lua");
        modify.modify_int("video_settings", 3);
        modify.modify_int("video_settings.screen_resx", 800);

        let video = modify.root().get_named("video_settings").and_then(ScriptValue::as_table);
        assert_eq!(
            video.and_then(|t| t.get_named("screen_resx")),
            Some(&ScriptValue::Int(800))
        );
    }
}
