//=========================================================================
// System Service
//=========================================================================
//
// Frame timing, exit requests, language selection and text translation.
//
// `SystemManager` is the in-process backend. Translation catalogs are
// plain string maps keyed by language code; text without a catalog entry
// is returned unchanged.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::info;

//=== SystemService =======================================================

/// Engine-wide services that are not input, audio or video.
pub trait SystemService {
    /// Milliseconds elapsed during the last frame.
    fn update_time(&self) -> u32;

    /// Records the duration of the frame that just ended.
    fn update_timers(&mut self, elapsed_ms: u32);

    /// Requests application shutdown.
    fn exit_game(&mut self);
    fn is_exiting(&self) -> bool;

    /// Active language code (e.g. `"en"`).
    fn language(&self) -> &str;
    fn set_language(&mut self, code: &str);

    /// Translates `text` into the active language.
    fn translate(&self, text: &str) -> String;

    /// Re-runs global scripts after a language change. Default: no-op.
    fn reload_global_scripts(&mut self) {}
}

//=== SystemManager =======================================================

/// Default [`SystemService`].
#[derive(Debug)]
pub struct SystemManager {
    update_time: u32,
    exiting: bool,
    language: String,
    catalogs: HashMap<String, HashMap<String, String>>,
    script_reloads: u32,
}

impl SystemManager {
    pub const DEFAULT_LANGUAGE: &'static str = "en";

    pub fn new() -> Self {
        Self {
            update_time: 0,
            exiting: false,
            language: Self::DEFAULT_LANGUAGE.to_string(),
            catalogs: HashMap::new(),
            script_reloads: 0,
        }
    }

    /// Registers translations for `language`.
    pub fn with_catalog<I, K, V>(mut self, language: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let catalog = self.catalogs.entry(language.to_string()).or_default();
        catalog.extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Number of global script reloads requested so far.
    pub fn script_reloads(&self) -> u32 {
        self.script_reloads
    }
}

impl Default for SystemManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemService for SystemManager {
    fn update_time(&self) -> u32 {
        self.update_time
    }

    fn update_timers(&mut self, elapsed_ms: u32) {
        self.update_time = elapsed_ms;
    }

    fn exit_game(&mut self) {
        if !self.exiting {
            info!("Exit requested");
        }
        self.exiting = true;
    }

    fn is_exiting(&self) -> bool {
        self.exiting
    }

    fn language(&self) -> &str {
        &self.language
    }

    fn set_language(&mut self, code: &str) {
        info!("Language set to '{}'", code);
        self.language = code.to_string();
    }

    fn translate(&self, text: &str) -> String {
        self.catalogs
            .get(&self.language)
            .and_then(|catalog| catalog.get(text))
            .cloned()
            .unwrap_or_else(|| text.to_string())
    }

    fn reload_global_scripts(&mut self) {
        self.script_reloads += 1;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
