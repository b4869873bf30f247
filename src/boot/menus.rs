//=========================================================================
// Boot Menus
//=========================================================================
//
// Menu identities, the actions their options carry, and construction and
// text refresh for every boot menu.
//
// Hierarchy:
//   Main
//    └─ Options
//        ├─ Video ── Resolution
//        ├─ Audio
//        ├─ Language
//        ├─ Keys
//        └─ Joystick
//
// Labels go through `SystemService::translate`, so a language change is a
// rebuild of the translatable menus followed by a refresh of their
// dynamic text.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::menu::{OptionMenu, Orientation};
use crate::core::audio::AudioService;
use crate::core::input::{InputService, JoyAxis, JoyButtonAction, KeyAction};
use crate::core::system::SystemService;
use crate::core::video::{Resolution, VideoService};

//=== MenuId ==============================================================

/// Identity of a boot menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuId {
    Main,
    Options,
    Video,
    Audio,
    Language,
    Keys,
    Joystick,
    Resolution,
}

impl MenuId {
    pub const ALL: [MenuId; 8] = [
        MenuId::Main,
        MenuId::Options,
        MenuId::Video,
        MenuId::Audio,
        MenuId::Language,
        MenuId::Keys,
        MenuId::Joystick,
        MenuId::Resolution,
    ];

    /// Menu that cancel returns to. The root menu has none.
    pub fn parent(self) -> Option<MenuId> {
        match self {
            MenuId::Main => None,
            MenuId::Options => Some(MenuId::Main),
            MenuId::Video
            | MenuId::Audio
            | MenuId::Language
            | MenuId::Keys
            | MenuId::Joystick => Some(MenuId::Options),
            MenuId::Resolution => Some(MenuId::Video),
        }
    }
}

//=== DebugTarget =========================================================

/// Modes the debug entries of the main menu can launch directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugTarget {
    Battle,
    Menu,
    Shop,
}

//=== BootAction ==========================================================

/// Direction of a value adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Down,
    Up,
}

impl Step {
    pub fn apply(self, value: f32, amount: f32) -> f32 {
        match self {
            Step::Down => value - amount,
            Step::Up => value + amount,
        }
    }
}

/// Handler bound to a menu option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootAction {
    //--- Main menu ---
    NewGame,
    LoadGame,
    Options,
    Quit,
    Debug(DebugTarget),

    //--- Navigation ---
    Open(MenuId),

    //--- Video ---
    ToggleFullscreen,
    Brightness(Step),
    TogglePixelArt,
    SetResolution(usize),

    //--- Audio ---
    SoundVolume(Step),
    MusicVolume(Step),

    //--- Language ---
    SelectLanguage(usize),

    //--- Input ---
    RedefineKey(KeyAction),
    RedefineJoyButton(JoyButtonAction),
    RedefineJoyAxis(JoyAxis),
    RestoreDefaultKeys,
    RestoreDefaultJoyButtons,
}

//=== Language ============================================================

/// Entry of the language list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub name: String,
    pub code: String,
}

//=== MenuSet =============================================================

pub type BootMenu = OptionMenu<BootAction>;

/// All boot menus, built once and refreshed in place.
#[derive(Debug, Clone)]
pub struct MenuSet {
    pub main: BootMenu,
    pub options: BootMenu,
    pub video: BootMenu,
    pub audio: BootMenu,
    pub language: BootMenu,
    pub keys: BootMenu,
    pub joystick: BootMenu,
    pub resolution: BootMenu,
    languages: Vec<Language>,
}

/// Main menu construction flags.
#[derive(Debug, Clone, Copy)]
pub struct MainMenuFlags {
    pub debug_menu: bool,
    pub saves_available: bool,
}

impl MenuSet {
    pub fn new(
        system: &dyn SystemService,
        screen_width: u32,
        flags: MainMenuFlags,
        languages: Vec<Language>,
    ) -> Self {
        Self {
            main: main_menu(system, flags),
            options: options_menu(system),
            video: video_menu(system),
            audio: audio_menu(system),
            language: language_menu(&languages),
            keys: key_settings_menu(system),
            joystick: joy_settings_menu(system),
            resolution: resolution_menu(screen_width),
            languages,
        }
    }

    pub fn get(&self, id: MenuId) -> &BootMenu {
        match id {
            MenuId::Main => &self.main,
            MenuId::Options => &self.options,
            MenuId::Video => &self.video,
            MenuId::Audio => &self.audio,
            MenuId::Language => &self.language,
            MenuId::Keys => &self.keys,
            MenuId::Joystick => &self.joystick,
            MenuId::Resolution => &self.resolution,
        }
    }

    pub fn get_mut(&mut self, id: MenuId) -> &mut BootMenu {
        match id {
            MenuId::Main => &mut self.main,
            MenuId::Options => &mut self.options,
            MenuId::Video => &mut self.video,
            MenuId::Audio => &mut self.audio,
            MenuId::Language => &mut self.language,
            MenuId::Keys => &mut self.keys,
            MenuId::Joystick => &mut self.joystick,
            MenuId::Resolution => &mut self.resolution,
        }
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// Rebuilds every menu whose labels are translated. The language
    /// list keeps its native names and is left alone.
    pub fn reload_translatable(
        &mut self,
        system: &dyn SystemService,
        screen_width: u32,
        flags: MainMenuFlags,
    ) {
        debug!("Reloading translatable menus for '{}'", system.language());
        self.main = main_menu(system, flags);
        self.options = options_menu(system);
        self.video = video_menu(system);
        self.audio = audio_menu(system);
        self.keys = key_settings_menu(system);
        self.joystick = joy_settings_menu(system);
        self.resolution = resolution_menu(screen_width);
    }
}

//=== Menu Construction ===================================================

fn vertical_menu() -> BootMenu {
    OptionMenu::new(Orientation::Vertical).with_layout(512.0, 300.0, 50.0)
}

pub fn main_menu(system: &dyn SystemService, flags: MainMenuFlags) -> BootMenu {
    let spacing = if flags.debug_menu { 140.0 } else { 200.0 };
    let mut menu = OptionMenu::new(Orientation::Horizontal).with_layout(212.0, 688.0, spacing);

    menu.add_option(system.translate("New Game"), Some(BootAction::NewGame));
    menu.add_option(system.translate("Load Game"), Some(BootAction::LoadGame));
    menu.add_option(system.translate("Options"), Some(BootAction::Options));

    if flags.debug_menu {
        menu.add_option(system.translate("Battle"), Some(BootAction::Debug(DebugTarget::Battle)));
        menu.add_option(system.translate("Menu"), Some(BootAction::Debug(DebugTarget::Menu)));
        menu.add_option(system.translate("Shop"), Some(BootAction::Debug(DebugTarget::Shop)));
    }
    menu.add_option(system.translate("Quit"), Some(BootAction::Quit));

    if flags.saves_available {
        menu.set_selection(1);
    } else {
        menu.enable_option(1, false);
        menu.set_selection(0);
    }
    menu
}

pub fn options_menu(system: &dyn SystemService) -> BootMenu {
    let mut menu = vertical_menu();
    menu.add_option(system.translate("Video"), Some(BootAction::Open(MenuId::Video)));
    menu.add_option(system.translate("Audio"), Some(BootAction::Open(MenuId::Audio)));
    menu.add_option(system.translate("Language"), Some(BootAction::Open(MenuId::Language)));
    menu.add_option(system.translate("Key Settings"), Some(BootAction::Open(MenuId::Keys)));
    menu.add_option(system.translate("Joystick Settings"), Some(BootAction::Open(MenuId::Joystick)));
    menu
}

pub fn video_menu(system: &dyn SystemService) -> BootMenu {
    let mut menu = vertical_menu();
    let fullscreen = Some(BootAction::ToggleFullscreen);
    let smoothing = Some(BootAction::TogglePixelArt);

    menu.add_option(system.translate("Resolution:"), Some(BootAction::Open(MenuId::Resolution)));
    menu.add_adjustable_option(system.translate("Window mode:"), fullscreen, fullscreen, fullscreen);
    menu.add_adjustable_option(
        system.translate("Brightness:"),
        None,
        Some(BootAction::Brightness(Step::Down)),
        Some(BootAction::Brightness(Step::Up)),
    );
    menu.add_adjustable_option(system.translate("Map tiles:"), smoothing, smoothing, smoothing);
    menu
}

pub fn audio_menu(system: &dyn SystemService) -> BootMenu {
    let mut menu = vertical_menu();
    menu.add_adjustable_option(
        system.translate("Sound Volume:"),
        None,
        Some(BootAction::SoundVolume(Step::Down)),
        Some(BootAction::SoundVolume(Step::Up)),
    );
    menu.add_adjustable_option(
        system.translate("Music Volume:"),
        None,
        Some(BootAction::MusicVolume(Step::Down)),
        Some(BootAction::MusicVolume(Step::Up)),
    );
    menu
}

pub fn language_menu(languages: &[Language]) -> BootMenu {
    let mut menu = vertical_menu();
    for (i, language) in languages.iter().enumerate() {
        menu.add_option(language.name.clone(), Some(BootAction::SelectLanguage(i)));
    }
    menu
}

pub fn key_settings_menu(system: &dyn SystemService) -> BootMenu {
    let mut menu = vertical_menu().with_layout(512.0, 220.0, 44.0);
    for action in KeyAction::ALL {
        menu.add_option(system.translate(action.label()), Some(BootAction::RedefineKey(action)));
    }
    menu.add_option(system.translate("Restore defaults"), Some(BootAction::RestoreDefaultKeys));
    menu
}

pub fn joy_settings_menu(system: &dyn SystemService) -> BootMenu {
    let mut menu = vertical_menu().with_layout(512.0, 260.0, 50.0);
    for axis in JoyAxis::ALL {
        menu.add_option(system.translate(axis.label()), Some(BootAction::RedefineJoyAxis(axis)));
    }
    for action in JoyButtonAction::REBINDABLE {
        menu.add_option(
            system.translate(action.label()),
            Some(BootAction::RedefineJoyButton(action)),
        );
    }
    menu.add_option(system.translate("Restore defaults"), Some(BootAction::RestoreDefaultJoyButtons));
    menu
}

pub fn resolution_menu(screen_width: u32) -> BootMenu {
    let mut menu = vertical_menu();
    for (i, preset) in Resolution::PRESETS.iter().enumerate() {
        menu.add_option(preset.to_string(), Some(BootAction::SetResolution(i)));
    }
    if let Some(index) = Resolution::preset_index(screen_width) {
        menu.set_selection(index);
    }
    menu
}

//=== Dynamic Text ========================================================

/// Percentage shown for a 0..=1 volume.
pub fn volume_percent(volume: f32) -> i32 {
    (volume * 100.0 + 0.5) as i32
}

/// Percentage shown for a 0..=2 gamma.
pub fn brightness_percent(gamma: f32) -> i32 {
    (gamma * 50.0 + 0.5) as i32
}

pub fn refresh_video(menu: &mut BootMenu, system: &dyn SystemService, video: &dyn VideoService) {
    let resolution = Resolution::new(video.screen_width(), video.screen_height());
    menu.set_option_text(0, format!("{} {}", system.translate("Resolution:"), resolution));

    let mode = if video.is_fullscreen() { "Fullscreen" } else { "Windowed" };
    menu.set_option_text(
        1,
        format!("{} {}", system.translate("Window mode:"), system.translate(mode)),
    );

    menu.set_option_text(
        2,
        format!("{} {} %", system.translate("Brightness:"), brightness_percent(video.gamma())),
    );

    let tiles = if video.is_pixel_art_smoothed() { "Smoothed" } else { "Normal" };
    menu.set_option_text(
        3,
        format!("{} {}", system.translate("Map tiles:"), system.translate(tiles)),
    );
}

pub fn refresh_audio(menu: &mut BootMenu, system: &dyn SystemService, audio: &dyn AudioService) {
    menu.set_option_text(
        0,
        format!("{} {} %", system.translate("Sound Volume:"), volume_percent(audio.sound_volume())),
    );
    menu.set_option_text(
        1,
        format!("{} {} %", system.translate("Music Volume:"), volume_percent(audio.music_volume())),
    );
}

pub fn refresh_keys(menu: &mut BootMenu, system: &dyn SystemService, input: &dyn InputService) {
    for (i, action) in KeyAction::ALL.iter().enumerate() {
        menu.set_option_text(
            i,
            format!("{}: {}", system.translate(action.label()), input.key_name(*action)),
        );
    }
}

pub fn refresh_joystick(menu: &mut BootMenu, system: &dyn SystemService, input: &dyn InputService) {
    let mut index = 0;
    for axis in JoyAxis::ALL {
        menu.set_option_text(
            index,
            format!("{}: {}", system.translate(axis.label()), input.joy_axis(axis)),
        );
        index += 1;
    }
    for action in JoyButtonAction::REBINDABLE {
        menu.set_option_text(
            index,
            format!(
                "{}: {} {}",
                system.translate(action.label()),
                system.translate("Button"),
                input.joy_button(action)
            ),
        );
        index += 1;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
