//=========================================================================
// Settings Persistence
//=========================================================================
//
// Loads and saves the user settings file, and reads the other config
// resources the boot screen depends on.
//
// Load order:
//   settings.language → key_settings → joystick_settings
//     → video_settings → audio_settings (only with audio enabled)
//
// The first section that fails to read aborts the load. Sections applied
// before it stay applied. Within a section every value is read and
// validated first and only then handed to the services, so a corrupt
// section never leaves half of its bindings changed.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::menus::Language;
use crate::core::input::event::KeyCode;
use crate::core::input::{JoyAxis, JoyButtonAction, KeyAction};
use crate::core::script::{ModifyScript, ReadScript, ScriptError};
use crate::core::services::Services;
use crate::core::video::Resolution;

//=== SettingsError =======================================================

/// Failures while reading or writing settings resources.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to open settings")]
    Open(#[source] ScriptError),

    #[error("failed to read {section} from '{}':\n{messages}", .path.display())]
    Read {
        path: PathBuf,
        section: &'static str,
        messages: String,
    },

    #[error("failed to copy settings template '{}'", .path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to commit settings")]
    Commit(#[source] ScriptError),
}

//=== Section Reader ======================================================

/// Wraps a [`ReadScript`] with per-section error checks.
struct SectionReader {
    script: ReadScript,
    problems: Vec<String>,
}

impl SectionReader {
    fn open(path: &Path) -> Result<Self, SettingsError> {
        let script = ReadScript::open(path).map_err(SettingsError::Open)?;
        Ok(Self { script, problems: Vec::new() })
    }

    /// Fails if anything read since the last check was missing or invalid.
    fn check(&mut self, section: &'static str) -> Result<(), SettingsError> {
        if !self.script.is_error_detected() && self.problems.is_empty() {
            return Ok(());
        }

        let mut messages: Vec<String> = Vec::new();
        if self.script.is_error_detected() {
            messages.push(self.script.error_messages());
        }
        messages.append(&mut self.problems);
        self.script.clear_errors();

        Err(SettingsError::Read {
            path: self.script.path().to_path_buf(),
            section,
            messages: messages.join("\n"),
        })
    }

    fn read_key(&mut self, field: &str) -> KeyCode {
        let name = self.script.read_string(field);
        match KeyCode::from_name(&name) {
            Some(key) => key,
            None => {
                if self.script.does_string_exist(field) {
                    self.problems.push(format!("'{}' names unknown key '{}'", field, name));
                }
                KeyCode::Unidentified
            }
        }
    }

    fn read_u8(&mut self, field: &str) -> u8 {
        let value = self.script.read_int(field);
        self.narrow(field, value)
    }

    fn read_optional_u8(&mut self, field: &str) -> Option<u8> {
        if !self.script.does_int_exist(field) {
            return None;
        }
        let value = self.script.read_int(field);
        Some(self.narrow(field, value))
    }

    fn narrow<T: TryFrom<i64> + Default>(&mut self, field: &str, value: i64) -> T {
        T::try_from(value).unwrap_or_else(|_| {
            self.problems.push(format!("'{}' is out of range: {}", field, value));
            T::default()
        })
    }
}

//=== Staged Sections =====================================================

#[derive(Debug)]
struct JoystickSection {
    disabled: bool,
    index: i32,
    buttons: Vec<(JoyButtonAction, u8)>,
    axes: Vec<(JoyAxis, u8)>,
    threshold: Option<u16>,
}

const JOY_BUTTONS: [JoyButtonAction; 5] = [
    JoyButtonAction::Confirm,
    JoyButtonAction::Cancel,
    JoyButtonAction::Menu,
    JoyButtonAction::Pause,
    JoyButtonAction::Quit,
];

//=== Loading =============================================================

/// Applies the settings stored at `path` to `services`.
///
/// Audio volumes are only read when `audio_enabled` is set. Loading never
/// counts as a user modification.
pub fn load_settings(
    path: &Path,
    services: &mut Services,
    audio_enabled: bool,
) -> Result<(), SettingsError> {
    let mut reader = SectionReader::open(path)?;
    debug!("Loading settings from '{}'", path.display());

    //--- Language ---------------------------------------------------------
    reader.script.open_table("settings");
    let language = reader.script.read_string("language");
    reader.script.close_table();
    reader.check("settings")?;
    services.system.set_language(&language);

    //--- Keyboard ---------------------------------------------------------
    reader.script.open_table("key_settings");
    let keys: Vec<(KeyAction, KeyCode)> = KeyAction::ALL
        .iter()
        .map(|action| (*action, reader.read_key(action.setting_key())))
        .collect();
    reader.script.close_table();
    reader.check("key_settings")?;
    for (action, key) in keys {
        services.input.set_key(action, key);
    }

    //--- Joystick ---------------------------------------------------------
    let joystick = read_joystick(&mut reader)?;
    services.input.set_joystick_enabled(!joystick.disabled);
    services.input.set_joy_index(joystick.index);
    for (action, button) in joystick.buttons {
        services.input.set_joy_button(action, button);
    }
    for (axis, index) in joystick.axes {
        services.input.set_joy_axis(axis, index);
    }
    if let Some(threshold) = joystick.threshold {
        services.input.set_joy_threshold(threshold);
    }

    //--- Video ------------------------------------------------------------
    reader.script.open_table("video_settings");
    let fullscreen = reader.script.read_bool("full_screen");
    let smoothed = reader.script.read_bool("smooth_graphics");
    let width = reader.script.read_int("screen_resx");
    reader.script.close_table();
    reader.check("video_settings")?;
    apply_video(services, width, fullscreen, smoothed);

    //--- Audio ------------------------------------------------------------
    if audio_enabled {
        reader.script.open_table("audio_settings");
        let music = reader.script.read_float("music_vol");
        let sound = reader.script.read_float("sound_vol");
        reader.script.close_all_tables();
        reader.check("audio_settings")?;
        services.audio.set_music_volume(music as f32);
        services.audio.set_sound_volume(sound as f32);
    }

    info!("Loaded settings from '{}'", path.display());
    Ok(())
}

fn read_joystick(reader: &mut SectionReader) -> Result<JoystickSection, SettingsError> {
    reader.script.open_table("joystick_settings");

    let disabled = reader.script.does_bool_exist("input_disabled")
        && reader.script.read_bool("input_disabled");
    let raw_index = reader.script.read_int("index");
    let index = reader.narrow("index", raw_index);

    let buttons = JOY_BUTTONS
        .iter()
        .map(|action| (*action, reader.read_u8(action.setting_key())))
        .collect();

    let axes = JoyAxis::ALL
        .iter()
        .filter_map(|axis| reader.read_optional_u8(axis.setting_key()).map(|i| (*axis, i)))
        .collect();

    let threshold = if reader.script.does_int_exist("threshold") {
        let raw = reader.script.read_int("threshold");
        Some(reader.narrow("threshold", raw))
    } else {
        None
    };

    reader.script.close_table();
    reader.check("joystick_settings")?;

    Ok(JoystickSection { disabled, index, buttons, axes, threshold })
}

fn apply_video(services: &mut Services, width: i64, fullscreen: bool, smoothed: bool) {
    let video = &mut services.video;
    video.set_pixel_art_smoothed(smoothed);

    let target = Resolution::snap(u32::try_from(width).unwrap_or(0));
    if video.screen_width() != target.width || video.screen_height() != target.height {
        video.set_resolution(target.width, target.height);
    }
    if video.is_fullscreen() != fullscreen {
        video.toggle_fullscreen();
    }
    video.apply_settings();
}

//=== Saving ==============================================================

/// Writes the current settings to `target`.
///
/// A missing target starts as a copy of `template`, or as an empty
/// document when there is no template either. `first_start` is always
/// cleared.
pub fn save_settings(target: &Path, template: &Path, services: &Services) -> Result<(), SettingsError> {
    let mut document = if target.exists() {
        ModifyScript::open(target).map_err(SettingsError::Open)?
    } else if template.exists() {
        fs::copy(template, target)
            .map_err(|source| SettingsError::Template { path: template.to_path_buf(), source })?;
        ModifyScript::open(target).map_err(SettingsError::Open)?
    } else {
        debug!("No settings template; writing a fresh '{}'", target.display());
        ModifyScript::create(target)
    };

    document.modify_int("settings.first_start", 0);
    document.modify_string("settings.language", services.system.language());

    let input = &services.input;
    document.open_table("key_settings");
    for action in KeyAction::ALL {
        document.modify_string(action.setting_key(), input.key(action).name());
    }
    document.close_table();

    document.open_table("joystick_settings");
    document.modify_bool("input_disabled", !input.joystick_enabled());
    document.modify_int("index", i64::from(input.joy_index()));
    for axis in JoyAxis::ALL {
        document.modify_int(axis.setting_key(), i64::from(input.joy_axis(axis)));
    }
    document.modify_int("threshold", i64::from(input.joy_threshold()));
    for action in JOY_BUTTONS {
        document.modify_int(action.setting_key(), i64::from(input.joy_button(action)));
    }
    document.close_table();

    let video = &services.video;
    document.modify_int("video_settings.screen_resx", i64::from(video.screen_width()));
    document.modify_int("video_settings.screen_resy", i64::from(video.screen_height()));
    document.modify_bool("video_settings.full_screen", video.is_fullscreen());
    document.modify_bool("video_settings.smooth_graphics", video.is_pixel_art_smoothed());

    let audio = &services.audio;
    document.modify_float("audio_settings.music_vol", f64::from(audio.music_volume()));
    document.modify_float("audio_settings.sound_vol", f64::from(audio.sound_volume()));

    document.commit().map_err(SettingsError::Commit)?;
    info!("Saved settings to '{}'", target.display());
    Ok(())
}

//=== Other Resources =====================================================

/// Reads `settings.first_start` from `path`.
pub fn is_first_start(path: &Path) -> Result<bool, SettingsError> {
    let mut reader = SectionReader::open(path)?;
    reader.script.open_table("settings");
    let first_start = reader.script.read_int("first_start");
    reader.script.close_table();
    reader.check("settings")?;
    Ok(first_start == 1)
}

/// Reads the `languages` list of `{ name, code }` pairs.
pub fn load_languages(path: &Path) -> Result<Vec<Language>, SettingsError> {
    let mut reader = SectionReader::open(path)?;
    reader.script.open_table("languages");

    let mut languages = Vec::with_capacity(reader.script.table_size());
    for i in 1..=reader.script.table_size() {
        reader.script.open_table_at(i);
        let name = reader.script.read_string_at(1);
        let code = reader.script.read_string_at(2);
        reader.script.close_table();
        languages.push(Language { name, code });
    }

    reader.script.close_table();
    reader.check("languages")?;
    Ok(languages)
}

/// Path of save slot `slot` inside `user_dir`.
pub fn save_slot_path(user_dir: &Path, slot: usize) -> PathBuf {
    user_dir.join(format!("saved_game_{}.lua", slot))
}

/// Returns `true` if any of the first `slots` save slots exists.
pub fn saves_available(user_dir: &Path, slots: usize) -> bool {
    (0..slots).any(|slot| save_slot_path(user_dir, slot).exists())
}

//=========================================================================
// Unit Tests
//=========================================================================
