//=========================================================================
// Boot Mode Builder
//=========================================================================
//
// Configuration and construction of the boot screen.
//
// Architecture:
// ```text
//     BootModeBuilder ──build(services)──> BootMode
//         │                                  │
//         ├─ with_data_dir()                 ├─ boot scene script
//         ├─ with_user_dir()                 ├─ stored settings applied
//         ├─ with_debug_menu()               ├─ language list
//         ├─ with_audio_enabled()            ├─ preloaded cues
//         └─ with_max_save_slots()           └─ menus
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::{Path, PathBuf};

use log::{error, info, warn};

//=== Internal Dependencies ===============================================

use super::menus::{MainMenuFlags, MenuSet};
use super::settings::{self, load_languages, load_settings};
use super::{BootError, BootMode, BOOT_SOUNDS, SOUND_OWNER};
use crate::core::script::SceneScript;
use crate::core::services::Services;

//=== BootConfig ==========================================================

/// Runtime configuration of the boot screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootConfig {
    /// Read-only game data root (`<data>/config/*.lua`).
    pub data_dir: PathBuf,
    /// Writable directory for settings and save games.
    pub user_dir: PathBuf,
    /// Adds the Battle/Menu/Shop launch entries to the main menu.
    pub debug_menu: bool,
    /// When `false`, stored volumes are ignored on load.
    pub audio_enabled: bool,
    /// Number of save slots checked for "Load Game".
    pub max_save_slots: usize,
}

impl BootConfig {
    pub fn boot_script(&self) -> PathBuf {
        self.data_dir.join("config").join("boot.lua")
    }

    pub fn languages_file(&self) -> PathBuf {
        self.data_dir.join("config").join("languages.lua")
    }

    pub fn settings_template(&self) -> PathBuf {
        self.data_dir.join("config").join("settings.lua")
    }

    pub fn user_settings(&self) -> PathBuf {
        self.user_dir.join("settings.lua")
    }

    /// The user's settings file, or the template until the first save.
    pub fn settings_source(&self) -> PathBuf {
        let user = self.user_settings();
        if user.exists() {
            user
        } else {
            self.settings_template()
        }
    }

    pub fn saves_available(&self) -> bool {
        settings::saves_available(&self.user_dir, self.max_save_slots)
    }

    pub(crate) fn main_menu_flags(&self) -> MainMenuFlags {
        MainMenuFlags { debug_menu: self.debug_menu, saves_available: self.saves_available() }
    }
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("dat"),
            user_dir: PathBuf::from("."),
            debug_menu: false,
            audio_enabled: true,
            max_save_slots: 6,
        }
    }
}

//=== BootModeBuilder =====================================================

/// Builder for configuring and constructing a [`BootMode`].
///
/// # Default Values
///
/// - **Data directory**: `dat`
/// - **User directory**: `.`
/// - **Debug menu**: off
/// - **Audio**: enabled
/// - **Save slots**: 6
///
/// # Examples
///
/// ```no_run
/// use boot_mode::boot::BootModeBuilder;
/// use boot_mode::core::services::Services;
///
/// let boot = BootModeBuilder::new()
///     .with_data_dir("dat")
///     .with_user_dir("/home/player/.game")
///     .build(Services::headless())
///     .expect("boot script");
/// ```
#[derive(Debug, Clone, Default)]
pub struct BootModeBuilder {
    config: BootConfig,
}

impl BootModeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.data_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_user_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.user_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_debug_menu(mut self, enabled: bool) -> Self {
        self.config.debug_menu = enabled;
        self
    }

    pub fn with_audio_enabled(mut self, enabled: bool) -> Self {
        self.config.audio_enabled = enabled;
        self
    }

    /// Sets how many `saved_game_<n>.lua` slots are checked.
    ///
    /// # Panics
    ///
    /// Panics if `slots == 0`.
    pub fn with_max_save_slots(mut self, slots: usize) -> Self {
        assert!(slots > 0, "Save slot count must be positive");
        self.config.max_save_slots = slots;
        self
    }

    pub fn config(&self) -> &BootConfig {
        &self.config
    }

    /// Builds the boot screen around `services`.
    ///
    /// A missing or invalid boot script is fatal: the system service is
    /// asked to exit and the error is returned. Problems with the stored
    /// settings or the language list only degrade the screen.
    pub fn build(self, mut services: Services) -> Result<BootMode, BootError> {
        let config = self.config;
        info!("Building boot mode (data: {}, user: {})", config.data_dir.display(), config.user_dir.display());

        //--- 1. Boot scene script -----------------------------------------
        let script = match SceneScript::load(config.boot_script()) {
            Ok(script) => script,
            Err(e) => {
                error!("Failed to load boot script: {}", e);
                services.system.exit_game();
                return Err(BootError::Script(e));
            }
        };

        //--- 2. Stored settings -------------------------------------------
        let settings_path = config.settings_source();
        if settings_path.exists() {
            if let Err(e) = load_settings(&settings_path, &mut services, config.audio_enabled) {
                warn!("Settings not fully loaded: {}", e);
            }
        } else {
            warn!("No settings file at '{}'; using defaults", settings_path.display());
        }

        //--- 3. Language list ---------------------------------------------
        let languages = load_languages(&config.languages_file()).unwrap_or_else(|e| {
            warn!("Language list unavailable, it will be empty: {}", e);
            Vec::new()
        });

        //--- 4. Cues and menus --------------------------------------------
        for sound in BOOT_SOUNDS {
            if !services.audio.load_sound(sound, Some(SOUND_OWNER)) {
                warn!("Failed to preload '{}'", sound);
            }
        }

        let menus = MenuSet::new(
            &*services.system,
            services.video.screen_width(),
            config.main_menu_flags(),
            languages,
        );

        script.initialize();
        Ok(BootMode::assemble(services, config, script, menus))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
