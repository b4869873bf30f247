//=========================================================================
// Boot Mode
//=========================================================================
//
// The title screen: intro, main menu, options hierarchy, input rebinding
// and settings persistence.
//
// Architecture:
// ```text
//   Engine tick
//     └─ BootMode::update() ─→ BootSignal
//          ├─ new game pending?   wait for the fade, emit NewGame once
//          ├─ Intro               any press enters the menu
//          ├─ help window shown   any key but help dismisses it
//          ├─ capture pending     resolve / abort the rebind
//          └─ menu routing        confirm, directions, cancel/back
// ```
//
// Menu options carry `BootAction` values; `invoke` performs them against
// the injected services. Settings changed from the menus mark the mode
// dirty; dirty settings are written by `save_settings` and on drop.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod builder;
pub mod capture;
pub mod menu;
pub mod menus;
pub mod settings;
pub mod windows;

//=== Public API ==========================================================

pub use builder::{BootConfig, BootModeBuilder};
pub use capture::{Captured, PendingCapture, WaitFor};
pub use menu::{MenuOption, OptionMenu, Orientation};
pub use menus::{BootAction, BootMenu, DebugTarget, Language, MenuId, MenuSet, Step};
pub use settings::SettingsError;

//=== External Dependencies ===============================================

use log::{debug, info, warn};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::script::{SceneScript, ScriptError};
use crate::core::services::Services;
use crate::core::video::{Color, DrawFlags, Resolution};
use self::windows::{HelpWindow, MenuWindow, MessageWindow};

//=== Constants ===========================================================

pub(crate) const SOUND_OWNER: &str = "boot";

const SND_CONFIRM: &str = "snd/confirm.wav";
const SND_CANCEL: &str = "snd/cancel.wav";
const SND_BUMP: &str = "snd/bump.wav";
const SND_VOLUME_TEST: &str = "snd/volume_test.wav";
const SND_NEW_GAME: &str = "snd/new_game.wav";

/// Cues loaded when the mode is built and released when it is dropped.
pub(crate) const BOOT_SOUNDS: [&str; 4] = [SND_CONFIRM, SND_CANCEL, SND_BUMP, SND_VOLUME_TEST];

const NEW_GAME_FADE_MS: u32 = 2000;
const GAMMA_STEP: f32 = 0.1;
const VOLUME_STEP: f32 = 0.1;

const VERSION_TEXT: &str = concat!("v", env!("CARGO_PKG_VERSION"));

//=== BootError ===========================================================

/// Fatal boot screen failures.
#[derive(Debug, Error)]
pub enum BootError {
    #[error("boot script failed to load")]
    Script(#[source] ScriptError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

//=== BootState / BootSignal ==============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootState {
    Intro,
    Menu,
}

/// Outcome of a boot update that the owner must act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootSignal {
    None,
    /// The new game fade finished; start the first map.
    NewGame,
    /// Open the save selection screen.
    LoadGame,
    /// The player quit from the main menu.
    Quit,
    /// Launch a mode directly from the debug entries.
    Launch(DebugTarget),
}

//=== BootMode ============================================================

/// Title screen controller.
pub struct BootMode {
    services: Services,
    config: BootConfig,
    script: SceneScript,

    state: BootState,
    menus: MenuSet,
    active_menu: MenuId,
    capture: PendingCapture,

    options_window: MenuWindow,
    message_window: MessageWindow,
    help_window: HelpWindow,
    help_checked: bool,

    exiting_to_new_game: bool,
    new_game_emitted: bool,
    has_modified_settings: bool,
}

impl BootMode {
    pub(crate) fn assemble(
        services: Services,
        config: BootConfig,
        script: SceneScript,
        menus: MenuSet,
    ) -> Self {
        info!("Boot mode ready");
        Self {
            services,
            config,
            script,
            state: BootState::Intro,
            menus,
            active_menu: MenuId::Main,
            capture: PendingCapture::None,
            options_window: MenuWindow::new(360.0, 188.0, 300.0, 550.0),
            message_window: MessageWindow::new(512.0, 733.0),
            help_window: HelpWindow::new(),
            help_checked: false,
            exiting_to_new_game: false,
            new_game_emitted: false,
            has_modified_settings: false,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn state(&self) -> BootState {
        self.state
    }

    pub fn active_menu(&self) -> MenuId {
        self.active_menu
    }

    pub fn menu(&self, id: MenuId) -> &BootMenu {
        self.menus.get(id)
    }

    pub fn pending_capture(&self) -> PendingCapture {
        self.capture
    }

    /// Text of the capture prompt, if it is shown.
    pub fn message(&self) -> Option<&str> {
        self.message_window.is_visible().then(|| self.message_window.text())
    }

    pub fn is_help_visible(&self) -> bool {
        self.help_window.is_active()
    }

    pub fn is_options_window_visible(&self) -> bool {
        self.options_window.is_visible()
    }

    pub fn has_modified_settings(&self) -> bool {
        self.has_modified_settings
    }

    pub fn config(&self) -> &BootConfig {
        &self.config
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn services_mut(&mut self) -> &mut Services {
        &mut self.services
    }

    //--- Lifecycle --------------------------------------------------------

    /// Restores the draw state the boot screen expects.
    pub fn reset(&mut self) {
        self.services.video.set_standard_coord_sys();
        self.services.video.set_draw_flags(DrawFlags::CENTERED);
        self.script.reset();
    }

    /// Advances the boot screen by one frame of already collected input.
    pub fn update(&mut self) -> BootSignal {
        self.script.update(self.services.system.update_time());

        if self.exiting_to_new_game {
            return self.poll_new_game();
        }

        if self.state == BootState::Intro {
            if self.services.input.any_key_press() {
                self.change_state(BootState::Menu);
            }
            return BootSignal::None;
        }

        if self.help_window.is_active() {
            self.update_help_window();
            return BootSignal::None;
        }

        if self.capture.is_pending() {
            self.update_capture();
            return BootSignal::None;
        }

        self.update_menu()
    }

    /// Draws the scene script layers behind the menus.
    pub fn draw(&mut self) {
        let video = &mut *self.services.video;
        video.push_state();
        video.set_draw_flags(DrawFlags::TOP_LEFT);
        video.set_standard_coord_sys();

        self.script.draw_background(video);
        self.script.draw_foreground(video);
        video.pop_state();
    }

    /// Draws the post effects layer and, once in the menu state, every
    /// window and the active menu.
    pub fn draw_post_effects(&mut self) {
        {
            let video = &mut *self.services.video;
            video.push_state();
            video.set_draw_flags(DrawFlags::TOP_LEFT);
            video.set_standard_coord_sys();
            self.script.draw_post_effects(video);
        }

        if self.state == BootState::Menu {
            if !self.help_checked {
                self.help_checked = true;
                self.show_help_on_first_start();
            }

            let video = &mut *self.services.video;
            self.options_window.draw(video);
            self.menus.get(self.active_menu).draw(video);

            video.set_draw_flags(DrawFlags::TOP_LEFT);
            video.move_to(10.0, 758.0);
            video.draw_text(VERSION_TEXT, Color::WHITE);

            self.help_window.draw(video, &*self.services.input, &*self.services.system);
            self.message_window.draw(video);
        }

        self.services.video.pop_state();
    }

    //--- Settings ---------------------------------------------------------

    /// Writes modified settings to the user's settings file.
    ///
    /// Returns `Ok(false)` without touching the filesystem when nothing
    /// changed since the last save.
    pub fn save_settings(&mut self) -> Result<bool, SettingsError> {
        if !self.has_modified_settings {
            return Ok(false);
        }

        settings::save_settings(
            &self.config.user_settings(),
            &self.config.settings_template(),
            &self.services,
        )?;
        self.has_modified_settings = false;
        Ok(true)
    }

    fn mark_modified(&mut self) {
        self.has_modified_settings = true;
    }

    //--- Update Phases ----------------------------------------------------

    fn change_state(&mut self, state: BootState) {
        debug!("Boot state {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    fn poll_new_game(&mut self) -> BootSignal {
        if self.new_game_emitted || self.services.video.is_fading() {
            return BootSignal::None;
        }
        self.new_game_emitted = true;
        info!("Starting new game");
        BootSignal::NewGame
    }

    fn update_help_window(&mut self) {
        let input = &self.services.input;
        if input.help_press() || !input.any_key_press() {
            return;
        }

        self.services.audio.play_sound(SND_CONFIRM);
        self.help_window.hide();

        self.mark_modified();
        if let Err(e) = self.save_settings() {
            warn!("Failed to save settings after first start: {}", e);
        }
    }

    fn update_capture(&mut self) {
        if self.services.input.cancel_press() {
            debug!("Aborted capture {:?}", self.capture);
            self.capture = PendingCapture::None;
            self.message_window.hide();
            return;
        }

        let Some(captured) = self.capture.poll(&*self.services.input) else {
            return;
        };

        debug!("Captured {:?}", captured);
        captured.apply(&mut *self.services.input);
        self.capture = PendingCapture::None;
        self.message_window.hide();
        self.mark_modified();

        match captured {
            Captured::Key(..) => self.refresh(MenuId::Keys),
            Captured::JoyButton(..) | Captured::JoyAxis(..) => self.refresh(MenuId::Joystick),
        }
    }

    fn update_menu(&mut self) -> BootSignal {
        let input = &self.services.input;
        let quit = input.quit_press();
        let confirm = input.confirm_press();
        let left = input.left_press();
        let right = input.right_press();
        let up = input.up_press();
        let down = input.down_press();
        let cancel = input.cancel_press();

        if self.active_menu == MenuId::Main && quit {
            self.services.system.exit_game();
            info!("Quit from the main menu");
            return BootSignal::Quit;
        }

        let menu = self.menus.get_mut(self.active_menu);
        let action = if confirm {
            let enabled = menu.is_selection_enabled();
            let action = menu.input_confirm();
            if !enabled {
                self.services.audio.play_sound(SND_BUMP);
            } else if self.active_menu != MenuId::Main {
                self.services.audio.play_sound(SND_CONFIRM);
            }
            action
        } else if left {
            menu.input_left()
        } else if right {
            menu.input_right()
        } else if up {
            menu.input_up()
        } else if down {
            menu.input_down()
        } else {
            if cancel || quit {
                self.navigate_back();
            }
            None
        };

        match action {
            Some(action) => self.invoke(action),
            None => BootSignal::None,
        }
    }

    fn navigate_back(&mut self) {
        let Some(parent) = self.active_menu.parent() else {
            return;
        };
        if self.active_menu == MenuId::Options {
            self.options_window.hide();
        }
        debug!("Menu {:?} -> {:?}", self.active_menu, parent);
        self.active_menu = parent;
        self.services.audio.play_sound(SND_CANCEL);
    }

    //--- Actions ----------------------------------------------------------

    /// Performs a menu action against the services.
    pub fn invoke(&mut self, action: BootAction) -> BootSignal {
        match action {
            BootAction::NewGame => self.start_new_game(),
            BootAction::LoadGame => {
                info!("Opening save selection");
                return BootSignal::LoadGame;
            }
            BootAction::Options => {
                self.open_menu(MenuId::Options);
                self.options_window.show();
            }
            BootAction::Quit => {
                self.services.system.exit_game();
                return BootSignal::Quit;
            }
            BootAction::Debug(target) => {
                info!("Launching {:?} from the debug menu", target);
                return BootSignal::Launch(target);
            }
            BootAction::Open(id) => self.open_menu(id),

            BootAction::ToggleFullscreen => {
                self.services.video.toggle_fullscreen();
                self.services.video.apply_settings();
                self.refresh(MenuId::Video);
                self.mark_modified();
            }
            BootAction::Brightness(step) => {
                let video = &mut self.services.video;
                let gamma = step.apply(video.gamma(), GAMMA_STEP);
                video.set_gamma(gamma);
                self.refresh(MenuId::Video);
            }
            BootAction::TogglePixelArt => {
                let video = &mut self.services.video;
                let smoothed = video.is_pixel_art_smoothed();
                video.set_pixel_art_smoothed(!smoothed);
                video.apply_settings();
                self.refresh(MenuId::Video);
                self.mark_modified();
            }
            BootAction::SetResolution(index) => self.change_resolution(index),

            BootAction::SoundVolume(step) => {
                let audio = &mut self.services.audio;
                let volume = step.apply(audio.sound_volume(), VOLUME_STEP);
                audio.set_sound_volume(volume);
                self.refresh(MenuId::Audio);
                self.services.audio.play_sound(SND_VOLUME_TEST);
                self.mark_modified();
            }
            BootAction::MusicVolume(step) => {
                let audio = &mut self.services.audio;
                let volume = step.apply(audio.music_volume(), VOLUME_STEP);
                audio.set_music_volume(volume);
                self.refresh(MenuId::Audio);
                self.mark_modified();
            }

            BootAction::SelectLanguage(index) => self.select_language(index),

            BootAction::RedefineKey(action) => self.arm_capture(PendingCapture::Key(action)),
            BootAction::RedefineJoyButton(action) => {
                self.arm_capture(PendingCapture::JoyButton(action))
            }
            BootAction::RedefineJoyAxis(axis) => {
                self.arm_capture(PendingCapture::JoyAxis(axis));
                self.services.input.reset_last_axis_moved();
            }
            BootAction::RestoreDefaultKeys => {
                self.services.input.restore_default_keys();
                self.refresh(MenuId::Keys);
                self.mark_modified();
            }
            BootAction::RestoreDefaultJoyButtons => {
                self.services.input.restore_default_joy_buttons();
                self.refresh(MenuId::Joystick);
                self.mark_modified();
            }
        }
        BootSignal::None
    }

    fn start_new_game(&mut self) {
        self.services.audio.stop_all_music();
        self.services.video.fade_screen(Color::BLACK, NEW_GAME_FADE_MS);
        self.services.audio.play_sound(SND_NEW_GAME);
        self.exiting_to_new_game = true;
        debug!("Fading out to a new game");
    }

    fn open_menu(&mut self, id: MenuId) {
        debug!("Menu {:?} -> {:?}", self.active_menu, id);
        self.active_menu = id;
        self.refresh(id);
    }

    /// Rewrites the value text of menus that display service state.
    fn refresh(&mut self, id: MenuId) {
        let services = &self.services;
        let menu = self.menus.get_mut(id);
        match id {
            MenuId::Video => menus::refresh_video(menu, &*services.system, &*services.video),
            MenuId::Audio => menus::refresh_audio(menu, &*services.system, &*services.audio),
            MenuId::Keys => menus::refresh_keys(menu, &*services.system, &*services.input),
            MenuId::Joystick => menus::refresh_joystick(menu, &*services.system, &*services.input),
            MenuId::Main | MenuId::Options | MenuId::Language | MenuId::Resolution => {}
        }
    }

    fn change_resolution(&mut self, index: usize) {
        let Some(preset) = Resolution::PRESETS.get(index).copied() else {
            warn!("No resolution preset {}", index);
            return;
        };

        let video = &mut self.services.video;
        if video.screen_width() == preset.width && video.screen_height() == preset.height {
            return;
        }
        video.set_resolution(preset.width, preset.height);
        if !video.apply_settings() {
            warn!("Display rejected {}", preset);
        }
        self.refresh(MenuId::Video);
        self.mark_modified();
    }

    fn select_language(&mut self, index: usize) {
        let Some(language) = self.menus.languages().get(index).cloned() else {
            warn!("No language at index {}", index);
            return;
        };

        self.services.system.set_language(&language.code);
        self.mark_modified();

        self.menus.reload_translatable(
            &*self.services.system,
            self.services.video.screen_width(),
            self.config.main_menu_flags(),
        );
        self.services.system.reload_global_scripts();
    }

    fn arm_capture(&mut self, capture: PendingCapture) {
        let Some(wait) = capture.wait_for() else {
            return;
        };
        debug!("Waiting for {:?}", wait);
        self.capture = capture;
        let prompt = self.services.system.translate(wait.prompt());
        self.message_window.show_text(prompt);
    }

    fn show_help_on_first_start(&mut self) {
        match settings::is_first_start(&self.config.settings_source()) {
            Ok(true) => self.help_window.show(),
            Ok(false) => {}
            Err(e) => warn!("Could not read the first start flag: {}", e),
        }
    }
}

impl Drop for BootMode {
    fn drop(&mut self) {
        if let Err(e) = self.save_settings() {
            warn!("Failed to save settings on exit: {}", e);
        }
        self.services.audio.release_owner(SOUND_OWNER);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
