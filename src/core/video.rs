//=========================================================================
// Video Service
//=========================================================================
//
// Display settings, screen fades and 2D draw calls used by game modes.
//
// Architecture:
// ```text
// Game mode ── VideoService (trait) ──> renderer backend
//                                   └─> VideoManager (headless)
// ```
//
// Display settings follow a pending/applied split: setters change the
// pending configuration and `apply_settings()` makes it current, so a
// mode can stage several changes and commit them at once.
//
// The headless `VideoManager` records draw calls as `DrawCommand`s and
// advances fades on `update(elapsed_ms)`.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Color ===============================================================

/// RGBA color with components in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const GRAY: Self = Self { r: 0.5, g: 0.5, b: 0.5, a: 1.0 };
    pub const CLEAR: Self = Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };
}

//=== Draw Flags ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YAlign {
    Top,
    Center,
    Bottom,
}

/// Alignment and blending applied to subsequent draw calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawFlags {
    pub x_align: XAlign,
    pub y_align: YAlign,
    pub blend: bool,
}

impl DrawFlags {
    pub const CENTERED: Self = Self { x_align: XAlign::Center, y_align: YAlign::Center, blend: true };
    pub const TOP_LEFT: Self = Self { x_align: XAlign::Left, y_align: YAlign::Top, blend: true };
}

impl Default for DrawFlags {
    fn default() -> Self {
        Self::TOP_LEFT
    }
}

//=== Resolution ==========================================================

/// Screen size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// The supported presets, smallest first.
    pub const PRESETS: [Resolution; 4] = [
        Resolution { width: 640, height: 480 },
        Resolution { width: 800, height: 600 },
        Resolution { width: 1024, height: 768 },
        Resolution { width: 1280, height: 1024 },
    ];

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Index of the preset with `width`, if any.
    pub fn preset_index(width: u32) -> Option<usize> {
        Self::PRESETS.iter().position(|r| r.width == width)
    }

    /// Preset matching `width`, or the smallest preset when none does.
    pub fn snap(width: u32) -> Resolution {
        Self::preset_index(width).map_or(Self::PRESETS[0], |i| Self::PRESETS[i])
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x {}", self.width, self.height)
    }
}

//=== VideoService ========================================================

/// Display and drawing operations used by game modes.
pub trait VideoService {
    //--- Display Settings -------------------------------------------------

    fn screen_width(&self) -> u32;
    fn screen_height(&self) -> u32;
    /// Stages a new resolution; takes effect on [`apply_settings`](Self::apply_settings).
    fn set_resolution(&mut self, width: u32, height: u32);

    fn is_fullscreen(&self) -> bool;
    /// Stages the opposite of the pending fullscreen flag.
    fn toggle_fullscreen(&mut self);

    /// Display gamma, in `[0.0, 2.0]`.
    fn gamma(&self) -> f32;
    fn set_gamma(&mut self, gamma: f32);

    fn is_pixel_art_smoothed(&self) -> bool;
    fn set_pixel_art_smoothed(&mut self, smoothed: bool);

    /// Commits staged display settings. Returns `false` if the backend
    /// rejected them.
    fn apply_settings(&mut self) -> bool;

    //--- Screen Fades -----------------------------------------------------

    fn fade_screen(&mut self, color: Color, duration_ms: u32);
    fn is_fading(&self) -> bool;

    /// Advances time-based effects such as fades.
    fn update(&mut self, elapsed_ms: u32);

    //--- Draw State -------------------------------------------------------

    fn push_state(&mut self);
    fn pop_state(&mut self);
    /// Resets to the 1024x768 virtual coordinate system.
    fn set_standard_coord_sys(&mut self);
    fn set_draw_flags(&mut self, flags: DrawFlags);
    fn draw_flags(&self) -> DrawFlags;
    fn move_to(&mut self, x: f32, y: f32);

    //--- Draw Calls -------------------------------------------------------

    fn draw_text(&mut self, text: &str, color: Color);
    fn draw_image(&mut self, path: &str);
    fn draw_panel(&mut self, width: f32, height: f32);
}

//=== DrawCommand =========================================================

/// A draw call recorded by [`VideoManager`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Text { text: String, x: f32, y: f32, color: Color },
    Image { path: String, x: f32, y: f32 },
    Panel { x: f32, y: f32, width: f32, height: f32 },
}

//=== VideoManager ========================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct DisplaySettings {
    resolution: Resolution,
    fullscreen: bool,
}

#[derive(Debug, Clone, Copy)]
struct DrawState {
    flags: DrawFlags,
    cursor: (f32, f32),
}

#[derive(Debug, Clone, Copy)]
struct Fade {
    color: Color,
    duration_ms: u32,
    elapsed_ms: u32,
}

/// Headless [`VideoService`].
#[derive(Debug)]
pub struct VideoManager {
    pending: DisplaySettings,
    applied: DisplaySettings,
    gamma: f32,
    smoothed: bool,
    fade: Option<Fade>,
    fade_overlay: Color,
    state: DrawState,
    state_stack: Vec<DrawState>,
    commands: Vec<DrawCommand>,
}

impl VideoManager {
    pub const MIN_GAMMA: f32 = 0.0;
    pub const MAX_GAMMA: f32 = 2.0;

    pub fn new() -> Self {
        let display = DisplaySettings { resolution: Resolution::PRESETS[0], fullscreen: false };
        Self {
            pending: display,
            applied: display,
            gamma: 1.0,
            smoothed: true,
            fade: None,
            fade_overlay: Color::CLEAR,
            state: DrawState { flags: DrawFlags::default(), cursor: (0.0, 0.0) },
            state_stack: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Color the screen is left covered with after the last fade.
    pub fn fade_overlay(&self) -> Color {
        self.fade_overlay
    }

    /// Draw calls recorded since the last call or frame update.
    pub fn take_draw_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Default for VideoManager {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoService for VideoManager {
    //--- Display Settings -------------------------------------------------

    fn screen_width(&self) -> u32 {
        self.applied.resolution.width
    }

    fn screen_height(&self) -> u32 {
        self.applied.resolution.height
    }

    fn set_resolution(&mut self, width: u32, height: u32) {
        self.pending.resolution = Resolution::new(width, height);
    }

    fn is_fullscreen(&self) -> bool {
        self.applied.fullscreen
    }

    fn toggle_fullscreen(&mut self) {
        self.pending.fullscreen = !self.pending.fullscreen;
    }

    fn gamma(&self) -> f32 {
        self.gamma
    }

    fn set_gamma(&mut self, gamma: f32) {
        self.gamma = gamma.clamp(Self::MIN_GAMMA, Self::MAX_GAMMA);
    }

    fn is_pixel_art_smoothed(&self) -> bool {
        self.smoothed
    }

    fn set_pixel_art_smoothed(&mut self, smoothed: bool) {
        self.smoothed = smoothed;
    }

    fn apply_settings(&mut self) -> bool {
        if self.pending.resolution.width == 0 || self.pending.resolution.height == 0 {
            warn!("Rejected display mode {}", self.pending.resolution);
            self.pending = self.applied;
            return false;
        }
        if self.pending != self.applied {
            debug!(
                "Applying display mode {} ({})",
                self.pending.resolution,
                if self.pending.fullscreen { "fullscreen" } else { "windowed" }
            );
        }
        self.applied = self.pending;
        true
    }

    //--- Screen Fades -----------------------------------------------------

    fn fade_screen(&mut self, color: Color, duration_ms: u32) {
        if duration_ms == 0 {
            self.fade = None;
            self.fade_overlay = color;
            return;
        }
        self.fade = Some(Fade { color, duration_ms, elapsed_ms: 0 });
    }

    fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    fn update(&mut self, elapsed_ms: u32) {
        // Draw calls are recorded per frame.
        self.commands.clear();

        if let Some(fade) = self.fade.as_mut() {
            fade.elapsed_ms = fade.elapsed_ms.saturating_add(elapsed_ms);
            if fade.elapsed_ms >= fade.duration_ms {
                self.fade_overlay = fade.color;
                self.fade = None;
            }
        }
    }

    //--- Draw State -------------------------------------------------------

    fn push_state(&mut self) {
        self.state_stack.push(self.state);
    }

    fn pop_state(&mut self) {
        match self.state_stack.pop() {
            Some(state) => self.state = state,
            None => warn!("pop_state() called with an empty draw state stack"),
        }
    }

    fn set_standard_coord_sys(&mut self) {
        self.state.cursor = (0.0, 0.0);
    }

    fn set_draw_flags(&mut self, flags: DrawFlags) {
        self.state.flags = flags;
    }

    fn draw_flags(&self) -> DrawFlags {
        self.state.flags
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.state.cursor = (x, y);
    }

    //--- Draw Calls -------------------------------------------------------

    fn draw_text(&mut self, text: &str, color: Color) {
        let (x, y) = self.state.cursor;
        self.commands.push(DrawCommand::Text { text: text.to_string(), x, y, color });
    }

    fn draw_image(&mut self, path: &str) {
        let (x, y) = self.state.cursor;
        self.commands.push(DrawCommand::Image { path: path.to_string(), x, y });
    }

    fn draw_panel(&mut self, width: f32, height: f32) {
        let (x, y) = self.state.cursor;
        self.commands.push(DrawCommand::Panel { x, y, width, height });
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // Resolution
    //=====================================================================

    #[test]
    fn snap_keeps_supported_widths() {
        for preset in Resolution::PRESETS {
            assert_eq!(Resolution::snap(preset.width), preset);
        }
    }

    #[test]
    fn snap_falls_back_to_smallest_preset() {
        for width in [0, 320, 1920, 801] {
            assert_eq!(Resolution::snap(width), Resolution::new(640, 480), "width {}", width);
        }
    }

    //=====================================================================
    // Display Settings
    //=====================================================================

    #[test]
    fn settings_take_effect_on_apply() {
        let mut video = VideoManager::new();
        video.set_resolution(1024, 768);
        video.toggle_fullscreen();

        assert_eq!(video.screen_width(), 640);
        assert!(!video.is_fullscreen());

        assert!(video.apply_settings());
        assert_eq!(video.screen_width(), 1024);
        assert_eq!(video.screen_height(), 768);
        assert!(video.is_fullscreen());
    }

    #[test]
    fn invalid_mode_is_rejected_and_discarded() {
        let mut video = VideoManager::new();
        video.set_resolution(0, 600);

        assert!(!video.apply_settings());
        assert_eq!(video.screen_width(), 640);

        // The rejected mode must not linger in the pending settings
        assert!(video.apply_settings());
        assert_eq!(video.screen_width(), 640);
    }

    #[test]
    fn gamma_is_clamped() {
        let mut video = VideoManager::new();
        video.set_gamma(3.0);
        assert_eq!(video.gamma(), 2.0);
        video.set_gamma(-1.0);
        assert_eq!(video.gamma(), 0.0);
    }

    //=====================================================================
    // Fades
    //=====================================================================

    #[test]
    fn fade_completes_after_duration() {
        let mut video = VideoManager::new();
        video.fade_screen(Color::BLACK, 2000);
        assert!(video.is_fading());

        video.update(1999);
        assert!(video.is_fading());

        video.update(1);
        assert!(!video.is_fading());
        assert_eq!(video.fade_overlay(), Color::BLACK);
    }

    #[test]
    fn zero_length_fade_is_instant() {
        let mut video = VideoManager::new();
        video.fade_screen(Color::BLACK, 0);
        assert!(!video.is_fading());
        assert_eq!(video.fade_overlay(), Color::BLACK);
    }

    //=====================================================================
    // Draw State
    //=====================================================================

    #[test]
    fn push_pop_restores_flags_and_cursor() {
        let mut video = VideoManager::new();
        video.move_to(10.0, 20.0);
        video.push_state();

        video.set_draw_flags(DrawFlags::CENTERED);
        video.move_to(500.0, 500.0);
        video.pop_state();

        assert_eq!(video.draw_flags(), DrawFlags::TOP_LEFT);
        video.draw_text("hi", Color::WHITE);
        assert_eq!(
            video.take_draw_commands(),
            vec![DrawCommand::Text { text: "hi".into(), x: 10.0, y: 20.0, color: Color::WHITE }]
        );
    }

    #[test]
    fn unbalanced_pop_is_ignored() {
        let mut video = VideoManager::new();
        video.set_draw_flags(DrawFlags::CENTERED);
        video.pop_state();
        assert_eq!(video.draw_flags(), DrawFlags::CENTERED);
    }
}
