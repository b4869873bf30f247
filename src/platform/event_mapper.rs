//=========================================================================
// Platform Event Mapper
//=========================================================================
//
// Converts winit window events into engine `InputEvent`s.
//
// Architecture:
//   WindowEvent → WindowInputTranslator → Option<InputEvent> → InputBuffer
//
// Modifier state arrives separately (`ModifiersChanged`) and is cached so
// every key event carries the modifiers held when it happened. Key
// repeats are dropped; the input service works on edges only.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey};

//=== Internal Dependencies ===============================================

use crate::core::input::event::{InputEvent, KeyCode, Modifiers};

//=== Key Conversion ======================================================

impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Numeric keys ---------------------------------------------
            Digit0 => KeyCode::Digit0, Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2, Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4, Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6, Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8, Digit9 => KeyCode::Digit9,

            //--- Alphabetic keys ------------------------------------------
            KeyA => KeyCode::KeyA, KeyB => KeyCode::KeyB, KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD, KeyE => KeyCode::KeyE, KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG, KeyH => KeyCode::KeyH, KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ, KeyK => KeyCode::KeyK, KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM, KeyN => KeyCode::KeyN, KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP, KeyQ => KeyCode::KeyQ, KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS, KeyT => KeyCode::KeyT, KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV, KeyW => KeyCode::KeyW, KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY, KeyZ => KeyCode::KeyZ,

            //--- Arrow keys -----------------------------------------------
            ArrowUp => KeyCode::ArrowUp, ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft, ArrowRight => KeyCode::ArrowRight,

            //--- Function keys --------------------------------------------
            F1 => KeyCode::F1, F2 => KeyCode::F2, F3 => KeyCode::F3,
            F4 => KeyCode::F4, F5 => KeyCode::F5, F6 => KeyCode::F6,
            F7 => KeyCode::F7, F8 => KeyCode::F8, F9 => KeyCode::F9,
            F10 => KeyCode::F10, F11 => KeyCode::F11, F12 => KeyCode::F12,

            //--- Editing & whitespace -------------------------------------
            Space => KeyCode::Space, Enter => KeyCode::Enter,
            Escape => KeyCode::Escape, Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace, Delete => KeyCode::Delete,
            Insert => KeyCode::Insert, Home => KeyCode::Home, End => KeyCode::End,
            PageUp => KeyCode::PageUp, PageDown => KeyCode::PageDown,

            //--- Modifier keys --------------------------------------------
            ShiftLeft => KeyCode::ShiftLeft, ShiftRight => KeyCode::ShiftRight,
            ControlLeft => KeyCode::ControlLeft, ControlRight => KeyCode::ControlRight,
            AltLeft => KeyCode::AltLeft, AltRight => KeyCode::AltRight,

            //--- Punctuation ----------------------------------------------
            Minus => KeyCode::Minus, Equal => KeyCode::Equal,
            Comma => KeyCode::Comma, Period => KeyCode::Period,
            Slash => KeyCode::Slash, Semicolon => KeyCode::Semicolon,
            Quote => KeyCode::Quote, BracketLeft => KeyCode::BracketLeft,
            BracketRight => KeyCode::BracketRight, Backslash => KeyCode::Backslash,
            Backquote => KeyCode::Backquote,

            //--- Numpad ---------------------------------------------------
            Numpad0 => KeyCode::Numpad0, Numpad1 => KeyCode::Numpad1,
            Numpad2 => KeyCode::Numpad2, Numpad3 => KeyCode::Numpad3,
            Numpad4 => KeyCode::Numpad4, Numpad5 => KeyCode::Numpad5,
            Numpad6 => KeyCode::Numpad6, Numpad7 => KeyCode::Numpad7,
            Numpad8 => KeyCode::Numpad8, Numpad9 => KeyCode::Numpad9,
            NumpadEnter => KeyCode::NumpadEnter,

            //--- Fallback -------------------------------------------------
            _ => KeyCode::Unidentified,
        }
    }
}

//=== Modifier Conversion =================================================

impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

//=== WindowInputTranslator ===============================================

/// Converts winit window events to `InputEvent`s with cached modifiers.
#[derive(Debug, Default)]
pub struct WindowInputTranslator {
    modifiers: Modifiers,
}

impl WindowInputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Translates one window event. Events with no input meaning, key
    /// repeats and unmapped keys yield `None`.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = Modifiers::from(modifiers.state());
                None
            }
            WindowEvent::KeyboardInput { event, .. } => self.translate_key(event),
            WindowEvent::CloseRequested => Some(InputEvent::QuitRequested),
            _ => None,
        }
    }

    fn translate_key(&self, event: &KeyEvent) -> Option<InputEvent> {
        if event.repeat {
            return None;
        }

        let key = match event.physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            PhysicalKey::Unidentified(_) => return None,
        };
        if key == KeyCode::Unidentified {
            return None;
        }

        let modifiers = self.modifiers;
        Some(match event.state {
            ElementState::Pressed => InputEvent::KeyDown { key, modifiers },
            ElementState::Released => InputEvent::KeyUp { key, modifiers },
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
