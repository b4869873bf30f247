//=========================================================================
// Rebind Capture
//=========================================================================
//
// The single pending "press a new input" request of the boot screen.
//
// Lifecycle:
//   None ──arm──> Key | JoyButton | JoyAxis ──resolve/abort──> None
//
// Arming always replaces whatever was pending, so at most one capture
// exists. Resolution takes the raw input of a later frame and hands it to
// the setter named by the payload.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::event::KeyCode;
use crate::core::input::{InputService, JoyAxis, JoyButtonAction, KeyAction};

//=== WaitFor =============================================================

/// What kind of input a capture prompt asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitFor {
    Key,
    JoyButton,
    JoyAxis,
}

impl WaitFor {
    /// Untranslated prompt text.
    pub fn prompt(self) -> &'static str {
        match self {
            WaitFor::Key => "Please press a new key.",
            WaitFor::JoyButton => "Please press a new joystick button.",
            WaitFor::JoyAxis => "Please move an axis.",
        }
    }
}

//=== PendingCapture ======================================================

/// Binding waiting for the player's next input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingCapture {
    #[default]
    None,
    Key(KeyAction),
    JoyButton(JoyButtonAction),
    JoyAxis(JoyAxis),
}

/// Binding change produced by a resolved capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Captured {
    Key(KeyAction, KeyCode),
    JoyButton(JoyButtonAction, u8),
    JoyAxis(JoyAxis, u8),
}

impl PendingCapture {
    pub fn is_pending(&self) -> bool {
        !matches!(self, PendingCapture::None)
    }

    /// Prompt kind for this capture, or `None` when idle.
    pub fn wait_for(&self) -> Option<WaitFor> {
        match self {
            PendingCapture::None => None,
            PendingCapture::Key(_) => Some(WaitFor::Key),
            PendingCapture::JoyButton(_) => Some(WaitFor::JoyButton),
            PendingCapture::JoyAxis(_) => Some(WaitFor::JoyAxis),
        }
    }

    /// Looks for the input this capture waits on in the current frame.
    pub fn poll(&self, input: &dyn InputService) -> Option<Captured> {
        match *self {
            PendingCapture::None => None,
            PendingCapture::Key(action) => {
                input.last_key_press().map(|key| Captured::Key(action, key))
            }
            PendingCapture::JoyButton(action) => {
                input.last_joy_button_press().map(|button| Captured::JoyButton(action, button))
            }
            PendingCapture::JoyAxis(axis) => {
                input.last_axis_moved().map(|index| Captured::JoyAxis(axis, index))
            }
        }
    }
}

impl Captured {
    /// Hands the captured input to its setter.
    pub fn apply(self, input: &mut dyn InputService) {
        match self {
            Captured::Key(action, key) => input.set_key(action, key),
            Captured::JoyButton(action, button) => input.set_joy_button(action, button),
            Captured::JoyAxis(axis, index) => input.set_joy_axis(axis, index),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::InputEvent;
    use crate::core::input::InputSystem;

    #[test]
    fn idle_capture_has_no_prompt() {
        let capture = PendingCapture::default();
        assert!(!capture.is_pending());
        assert_eq!(capture.wait_for(), None);
    }

    #[test]
    fn prompt_follows_payload() {
        assert_eq!(PendingCapture::Key(KeyAction::Up).wait_for(), Some(WaitFor::Key));
        assert_eq!(
            PendingCapture::JoyButton(JoyButtonAction::Menu).wait_for().map(WaitFor::prompt),
            Some("Please press a new joystick button.")
        );
        assert_eq!(PendingCapture::JoyAxis(JoyAxis::Y).wait_for(), Some(WaitFor::JoyAxis));
    }

    #[test]
    fn key_capture_ignores_joystick_input() {
        let mut input = InputSystem::new();
        let capture = PendingCapture::Key(KeyAction::Menu);

        input.update(&[InputEvent::JoyButtonDown { button: 4 }]);
        assert_eq!(capture.poll(&input), None);

        input.update(&[InputEvent::key_down(KeyCode::KeyM)]);
        assert_eq!(capture.poll(&input), Some(Captured::Key(KeyAction::Menu, KeyCode::KeyM)));
    }

    #[test]
    fn key_capture_sees_key_before_axis_motion() {
        let mut input = InputSystem::new();
        let capture = PendingCapture::Key(KeyAction::Left);

        input.update(&[
            InputEvent::key_down(KeyCode::KeyH),
            InputEvent::JoyAxisMotion { axis: 1, value: -30000 },
        ]);
        assert_eq!(capture.poll(&input), Some(Captured::Key(KeyAction::Left, KeyCode::KeyH)));
    }

    #[test]
    fn button_capture_sees_button_before_key() {
        let mut input = InputSystem::new();
        let capture = PendingCapture::JoyButton(JoyButtonAction::Cancel);

        input.update(&[InputEvent::JoyButtonDown { button: 5 }, InputEvent::key_down(KeyCode::KeyA)]);
        assert_eq!(capture.poll(&input), Some(Captured::JoyButton(JoyButtonAction::Cancel, 5)));
    }

    #[test]
    fn button_capture_applies_to_setter() {
        let mut input = InputSystem::new();
        let capture = PendingCapture::JoyButton(JoyButtonAction::Pause);

        input.update(&[InputEvent::JoyButtonDown { button: 9 }]);
        let captured = capture.poll(&input).expect("button captured");
        captured.apply(&mut input);

        assert_eq!(input.joy_button(JoyButtonAction::Pause), 9);
    }

    #[test]
    fn axis_capture_uses_last_axis_moved() {
        let mut input = InputSystem::new();
        let capture = PendingCapture::JoyAxis(JoyAxis::X);

        input.update(&[InputEvent::JoyAxisMotion { axis: 3, value: 100 }]);
        assert_eq!(capture.poll(&input), None, "below threshold");

        input.update(&[InputEvent::JoyAxisMotion { axis: 3, value: 30000 }]);
        assert_eq!(capture.poll(&input), Some(Captured::JoyAxis(JoyAxis::X, 3)));
    }
}
