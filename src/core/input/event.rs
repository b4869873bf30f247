//=========================================================================
// Input Event Types
//=========================================================================
//
// Portable representation of keyboard and joystick input.
//
// Platform backends (winit, a joystick poller, test harnesses) translate
// their native events into `InputEvent` before anything else sees them.
//
// Event Flow:
// ```text
// Platform Layer (winit / joystick)
//         ↓
//    InputEvent (this module)
//         ↓
//    StateTracker (per-frame edges)
//         ↓
//    InputService queries (confirm_press, up_press, ...)
// ```
//
// Key codes carry a stable lowercase name (`"up"`, `"return"`, `"f"`).
// The same name is shown in the key settings menu and written to the
// settings file, so it must round-trip through `KeyCode::from_name`.
//
//=========================================================================

//=== KeyCode =============================================================

macro_rules! key_codes {
    ($( $(#[$meta:meta])* $variant:ident => $name:literal ),* $(,)?) => {
        /// Physical keyboard key identifier.
        ///
        /// Represents the physical key location, not the character produced.
        /// `Unidentified` covers every key the engine does not model.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum KeyCode {
            $( $(#[$meta])* $variant, )*
            /// Any key without a dedicated variant.
            Unidentified,
        }

        impl KeyCode {
            /// Every identified key, in declaration order.
            pub const ALL: &'static [KeyCode] = &[ $( KeyCode::$variant, )* ];

            /// Stable display/persistence name of the key.
            pub fn name(self) -> &'static str {
                match self {
                    $( KeyCode::$variant => $name, )*
                    KeyCode::Unidentified => "unknown",
                }
            }

            /// Parses a name produced by [`KeyCode::name`].
            pub fn from_name(name: &str) -> Option<KeyCode> {
                match name {
                    $( $name => Some(KeyCode::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

key_codes! {
    //--- Numeric Keys -----------------------------------------------------
    Digit0 => "0", Digit1 => "1", Digit2 => "2", Digit3 => "3", Digit4 => "4",
    Digit5 => "5", Digit6 => "6", Digit7 => "7", Digit8 => "8", Digit9 => "9",

    //--- Alphabetic Keys --------------------------------------------------
    KeyA => "a", KeyB => "b", KeyC => "c", KeyD => "d", KeyE => "e",
    KeyF => "f", KeyG => "g", KeyH => "h", KeyI => "i", KeyJ => "j",
    KeyK => "k", KeyL => "l", KeyM => "m", KeyN => "n", KeyO => "o",
    KeyP => "p", KeyQ => "q", KeyR => "r", KeyS => "s", KeyT => "t",
    KeyU => "u", KeyV => "v", KeyW => "w", KeyX => "x", KeyY => "y",
    KeyZ => "z",

    //--- Arrow Keys -------------------------------------------------------
    ArrowUp => "up", ArrowDown => "down", ArrowLeft => "left", ArrowRight => "right",

    //--- Function Keys ----------------------------------------------------
    F1 => "f1", F2 => "f2", F3 => "f3", F4 => "f4", F5 => "f5", F6 => "f6",
    F7 => "f7", F8 => "f8", F9 => "f9", F10 => "f10", F11 => "f11", F12 => "f12",

    //--- Editing & Whitespace ---------------------------------------------
    Space => "space", Enter => "return", Escape => "escape", Tab => "tab",
    Backspace => "backspace", Delete => "delete", Insert => "insert",
    Home => "home", End => "end", PageUp => "page up", PageDown => "page down",

    //--- Modifier Keys ----------------------------------------------------
    ShiftLeft => "left shift", ShiftRight => "right shift",
    ControlLeft => "left ctrl", ControlRight => "right ctrl",
    AltLeft => "left alt", AltRight => "right alt",

    //--- Punctuation ------------------------------------------------------
    Minus => "-", Equal => "=", Comma => ",", Period => ".", Slash => "/",
    Semicolon => ";", Quote => "'", BracketLeft => "[", BracketRight => "]",
    Backslash => "\\", Backquote => "`",

    //--- Numpad -----------------------------------------------------------
    Numpad0 => "[0]", Numpad1 => "[1]", Numpad2 => "[2]", Numpad3 => "[3]",
    Numpad4 => "[4]", Numpad5 => "[5]", Numpad6 => "[6]", Numpad7 => "[7]",
    Numpad8 => "[8]", Numpad9 => "[9]", NumpadEnter => "enter",
}

impl std::fmt::Display for KeyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

//=== InputEvent ==========================================================

/// Unified input event consumed by the input service.
///
/// # Event Types
///
/// - **KeyDown/KeyUp**: Discrete keyboard events with modifier state
/// - **JoyButtonDown/JoyButtonUp**: Joystick buttons by hardware index
/// - **JoyAxisMotion**: Raw axis position in `i16` range
/// - **QuitRequested**: The window manager asked the game to close
/// - **Unidentified**: Unknown/unsupported events (ignored by system)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// Key pressed down.
    KeyDown {
        key: KeyCode,
        modifiers: Modifiers,
    },

    /// Key released.
    KeyUp {
        key: KeyCode,
        modifiers: Modifiers,
    },

    /// Joystick button pressed.
    JoyButtonDown { button: u8 },

    /// Joystick button released.
    JoyButtonUp { button: u8 },

    /// Joystick axis moved to `value`.
    JoyAxisMotion { axis: u8, value: i16 },

    /// Close request from the window manager.
    QuitRequested,

    /// Unrecognized or unsupported event.
    Unidentified,
}

impl InputEvent {
    /// Shorthand for a key press without modifiers.
    pub fn key_down(key: KeyCode) -> Self {
        Self::KeyDown { key, modifiers: Modifiers::NONE }
    }

    /// Shorthand for a key release without modifiers.
    pub fn key_up(key: KeyCode) -> Self {
        Self::KeyUp { key, modifiers: Modifiers::NONE }
    }

    /// Returns `true` for events that count as "a key was pressed".
    ///
    /// Joystick buttons count; releases and axis motion do not.
    pub fn is_press(&self) -> bool {
        matches!(self, Self::KeyDown { .. } | Self::JoyButtonDown { .. })
    }
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt).
///
/// Left and right variants are not distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false };
    pub const SHIFT: Self = Self { shift: true, ctrl: false, alt: false };
    pub const CTRL: Self = Self { shift: false, ctrl: true, alt: false };
    pub const ALT: Self = Self { shift: false, ctrl: false, alt: true };
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    //=====================================================================
    // KeyCode Names
    //=====================================================================

    #[test]
    fn every_key_name_round_trips() {
        for key in KeyCode::ALL {
            assert_eq!(
                KeyCode::from_name(key.name()),
                Some(*key),
                "{:?} did not round-trip through '{}'",
                key,
                key.name()
            );
        }
    }

    #[test]
    fn key_names_are_unique() {
        let names: HashSet<&str> = KeyCode::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), KeyCode::ALL.len());
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(KeyCode::from_name("hyper"), None);
        assert_eq!(KeyCode::from_name(""), None);
        assert_eq!(KeyCode::from_name("unknown"), None);
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(KeyCode::ArrowUp.to_string(), "up");
        assert_eq!(KeyCode::Enter.to_string(), "return");
    }

    //=====================================================================
    // InputEvent
    //=====================================================================

    #[test]
    fn presses_include_joystick_buttons() {
        assert!(InputEvent::key_down(KeyCode::KeyA).is_press());
        assert!(InputEvent::JoyButtonDown { button: 3 }.is_press());
        assert!(!InputEvent::key_up(KeyCode::KeyA).is_press());
        assert!(!InputEvent::JoyAxisMotion { axis: 0, value: 20000 }.is_press());
        assert!(!InputEvent::QuitRequested.is_press());
    }

    #[test]
    fn modifiers_distinguish_events() {
        let plain = InputEvent::key_down(KeyCode::KeyQ);
        let ctrl = InputEvent::KeyDown { key: KeyCode::KeyQ, modifiers: Modifiers::CTRL };
        assert_ne!(plain, ctrl);
    }
}
