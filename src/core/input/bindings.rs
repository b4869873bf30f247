//=========================================================================
// Input Bindings
//=========================================================================
//
// Maps logical game inputs to physical keys and joystick controls.
//
// Architecture:
//   KeyAction → KeyBindings → KeyCode
//   JoyButtonAction → JoyBindings → button index
//   JoyAxis → JoyBindings → axis index
//
// Each logical input has exactly one physical binding. Rebinding replaces
// the previous binding; two actions may share a key.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::event::KeyCode;

//=== KeyAction ===========================================================

/// The eight rebindable keyboard inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Cancel,
    Menu,
    Pause,
}

impl KeyAction {
    /// All actions in menu order.
    pub const ALL: [KeyAction; 8] = [
        KeyAction::Up,
        KeyAction::Down,
        KeyAction::Left,
        KeyAction::Right,
        KeyAction::Confirm,
        KeyAction::Cancel,
        KeyAction::Menu,
        KeyAction::Pause,
    ];

    /// Field name inside `key_settings`.
    pub fn setting_key(self) -> &'static str {
        match self {
            KeyAction::Up => "up",
            KeyAction::Down => "down",
            KeyAction::Left => "left",
            KeyAction::Right => "right",
            KeyAction::Confirm => "confirm",
            KeyAction::Cancel => "cancel",
            KeyAction::Menu => "menu",
            KeyAction::Pause => "pause",
        }
    }

    /// Untranslated menu label.
    pub fn label(self) -> &'static str {
        match self {
            KeyAction::Up => "Move Up",
            KeyAction::Down => "Move Down",
            KeyAction::Left => "Move Left",
            KeyAction::Right => "Move Right",
            KeyAction::Confirm => "Confirm",
            KeyAction::Cancel => "Cancel",
            KeyAction::Menu => "Menu",
            KeyAction::Pause => "Pause",
        }
    }

    /// Binding used by a fresh install.
    pub fn default_key(self) -> KeyCode {
        match self {
            KeyAction::Up => KeyCode::ArrowUp,
            KeyAction::Down => KeyCode::ArrowDown,
            KeyAction::Left => KeyCode::ArrowLeft,
            KeyAction::Right => KeyCode::ArrowRight,
            KeyAction::Confirm => KeyCode::KeyF,
            KeyAction::Cancel => KeyCode::KeyD,
            KeyAction::Menu => KeyCode::KeyS,
            KeyAction::Pause => KeyCode::Space,
        }
    }
}

//=== JoyButtonAction =====================================================

/// Joystick button inputs. `Quit` is persisted but not rebindable from
/// the menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoyButtonAction {
    Confirm,
    Cancel,
    Menu,
    Pause,
    Quit,
}

impl JoyButtonAction {
    /// Buttons offered in the joystick settings menu.
    pub const REBINDABLE: [JoyButtonAction; 4] = [
        JoyButtonAction::Confirm,
        JoyButtonAction::Cancel,
        JoyButtonAction::Menu,
        JoyButtonAction::Pause,
    ];

    /// Field name inside `joystick_settings`.
    pub fn setting_key(self) -> &'static str {
        match self {
            JoyButtonAction::Confirm => "confirm",
            JoyButtonAction::Cancel => "cancel",
            JoyButtonAction::Menu => "menu",
            JoyButtonAction::Pause => "pause",
            JoyButtonAction::Quit => "quit",
        }
    }

    /// Untranslated menu label.
    pub fn label(self) -> &'static str {
        match self {
            JoyButtonAction::Confirm => "Confirm",
            JoyButtonAction::Cancel => "Cancel",
            JoyButtonAction::Menu => "Menu",
            JoyButtonAction::Pause => "Pause",
            JoyButtonAction::Quit => "Quit",
        }
    }

    pub fn default_button(self) -> u8 {
        match self {
            JoyButtonAction::Confirm => 0,
            JoyButtonAction::Cancel => 1,
            JoyButtonAction::Menu => 2,
            JoyButtonAction::Pause => 3,
            JoyButtonAction::Quit => 7,
        }
    }
}

//=== JoyAxis =============================================================

/// Logical joystick axes used for directional input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoyAxis {
    X,
    Y,
}

impl JoyAxis {
    pub const ALL: [JoyAxis; 2] = [JoyAxis::X, JoyAxis::Y];

    /// Field name inside `joystick_settings`.
    pub fn setting_key(self) -> &'static str {
        match self {
            JoyAxis::X => "x_axis",
            JoyAxis::Y => "y_axis",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            JoyAxis::X => "X Axis",
            JoyAxis::Y => "Y Axis",
        }
    }

    pub fn default_axis(self) -> u8 {
        match self {
            JoyAxis::X => 0,
            JoyAxis::Y => 1,
        }
    }
}

//=== KeyBindings =========================================================

/// Keyboard bindings: one key per [`KeyAction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    keys: HashMap<KeyAction, KeyCode>,
}

impl KeyBindings {
    /// Creates bindings populated with the defaults.
    pub fn new() -> Self {
        let mut bindings = Self { keys: HashMap::with_capacity(KeyAction::ALL.len()) };
        bindings.restore_defaults();
        bindings
    }

    /// Returns the key bound to `action`.
    pub fn key(&self, action: KeyAction) -> KeyCode {
        self.keys.get(&action).copied().unwrap_or_else(|| action.default_key())
    }

    /// Binds `action` to `key`, replacing the previous binding.
    pub fn bind(&mut self, action: KeyAction, key: KeyCode) {
        self.keys.insert(action, key);
    }

    /// Returns `true` if `key` is bound to `action`.
    pub fn is_bound(&self, action: KeyAction, key: KeyCode) -> bool {
        self.key(action) == key
    }

    pub fn restore_defaults(&mut self) {
        for action in KeyAction::ALL {
            self.keys.insert(action, action.default_key());
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

//=== JoyBindings =========================================================

/// Joystick bindings plus device selection and dead zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoyBindings {
    buttons: HashMap<JoyButtonAction, u8>,
    axes: HashMap<JoyAxis, u8>,
    /// Axis dead zone in raw `i16` units.
    pub threshold: u16,
    /// Index of the joystick device to read.
    pub index: i32,
    /// When `false`, joystick events are dropped.
    pub enabled: bool,
}

impl JoyBindings {
    pub const DEFAULT_THRESHOLD: u16 = 8192;

    pub fn new() -> Self {
        let mut bindings = Self {
            buttons: HashMap::new(),
            axes: JoyAxis::ALL.iter().map(|a| (*a, a.default_axis())).collect(),
            threshold: Self::DEFAULT_THRESHOLD,
            index: 0,
            enabled: true,
        };
        bindings.restore_default_buttons();
        bindings
    }

    pub fn button(&self, action: JoyButtonAction) -> u8 {
        self.buttons.get(&action).copied().unwrap_or_else(|| action.default_button())
    }

    pub fn bind_button(&mut self, action: JoyButtonAction, button: u8) {
        self.buttons.insert(action, button);
    }

    pub fn axis(&self, axis: JoyAxis) -> u8 {
        self.axes.get(&axis).copied().unwrap_or_else(|| axis.default_axis())
    }

    pub fn bind_axis(&mut self, axis: JoyAxis, index: u8) {
        self.axes.insert(axis, index);
    }

    /// Restores button bindings only. Axes, threshold and device index are
    /// left alone.
    pub fn restore_default_buttons(&mut self) {
        for action in [
            JoyButtonAction::Confirm,
            JoyButtonAction::Cancel,
            JoyButtonAction::Menu,
            JoyButtonAction::Pause,
            JoyButtonAction::Quit,
        ] {
            self.buttons.insert(action, action.default_button());
        }
    }
}

impl Default for JoyBindings {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
