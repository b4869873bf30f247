//=========================================================================
// Input System
//=========================================================================
//
// High-level input handling for game modes.
//
// Architecture:
// ```text
// InputEvent batch → InputSystem::update()
//                        ├─ StateTracker (edges, most recent event, axes)
//                        └─ KeyBindings / JoyBindings (logical → physical)
//                    → InputService queries (confirm_press, up_press, ...)
// ```
//
// Modes talk to input through the `InputService` trait so that tests and
// alternate backends can substitute their own implementation.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod bindings;
pub mod event;
mod state_tracker;

//=== Public API ==========================================================

pub use bindings::{JoyAxis, JoyBindings, JoyButtonAction, KeyAction, KeyBindings};
pub use event::{InputEvent, KeyCode, Modifiers};
pub use state_tracker::{AxisDirection, StateTracker};

//=== External Dependencies ===============================================

use log::debug;

//=== InputService ========================================================

/// Per-frame input queries and binding management used by game modes.
///
/// All `*_press` queries are edge-triggered: they report `true` only on
/// the frame the input went down.
pub trait InputService {
    /// Feeds the events of one frame. Clears the previous frame's edges.
    fn update(&mut self, events: &[InputEvent]);

    //--- Edge Queries -----------------------------------------------------

    /// Any key or joystick button went down this frame.
    fn any_key_press(&self) -> bool;
    fn up_press(&self) -> bool;
    fn down_press(&self) -> bool;
    fn left_press(&self) -> bool;
    fn right_press(&self) -> bool;
    fn confirm_press(&self) -> bool;
    fn cancel_press(&self) -> bool;
    fn menu_press(&self) -> bool;
    fn pause_press(&self) -> bool;
    /// Window close, Ctrl+Q or the joystick quit button.
    fn quit_press(&self) -> bool;
    /// The fixed help key (F1).
    fn help_press(&self) -> bool;

    /// Last meaningful event of the current frame.
    fn most_recent_event(&self) -> Option<InputEvent>;

    /// Last key pressed this frame, even if other events followed it.
    fn last_key_press(&self) -> Option<KeyCode>;
    /// Last joystick button pressed this frame.
    fn last_joy_button_press(&self) -> Option<u8>;

    /// Last joystick axis pushed past the threshold since the last reset.
    fn last_axis_moved(&self) -> Option<u8>;
    fn reset_last_axis_moved(&mut self);

    //--- Keyboard Bindings ------------------------------------------------

    fn key(&self, action: KeyAction) -> KeyCode;
    fn set_key(&mut self, action: KeyAction, key: KeyCode);
    fn restore_default_keys(&mut self);

    /// Display name of the key bound to `action`.
    fn key_name(&self, action: KeyAction) -> String {
        self.key(action).name().to_string()
    }

    //--- Joystick Bindings ------------------------------------------------

    fn joy_button(&self, action: JoyButtonAction) -> u8;
    fn set_joy_button(&mut self, action: JoyButtonAction, button: u8);
    fn restore_default_joy_buttons(&mut self);

    fn joy_axis(&self, axis: JoyAxis) -> u8;
    fn set_joy_axis(&mut self, axis: JoyAxis, index: u8);

    fn joy_threshold(&self) -> u16;
    fn set_joy_threshold(&mut self, threshold: u16);

    fn joy_index(&self) -> i32;
    fn set_joy_index(&mut self, index: i32);

    fn joystick_enabled(&self) -> bool;
    fn set_joystick_enabled(&mut self, enabled: bool);
}

//=== InputSystem =========================================================

/// Default [`InputService`] backed by a [`StateTracker`] and binding tables.
pub struct InputSystem {
    tracker: StateTracker,
    keys: KeyBindings,
    joy: JoyBindings,
}

impl InputSystem {
    /// Creates an input system with default bindings.
    pub fn new() -> Self {
        Self {
            tracker: StateTracker::new(),
            keys: KeyBindings::new(),
            joy: JoyBindings::new(),
        }
    }

    /// Read-only access to raw per-frame state.
    pub fn tracker(&self) -> &StateTracker {
        &self.tracker
    }

    //--- Internal Helpers -------------------------------------------------

    fn key_pressed(&self, action: KeyAction) -> bool {
        self.tracker.is_key_pressed(self.keys.key(action))
    }

    fn joy_pressed(&self, action: JoyButtonAction) -> bool {
        self.joy.enabled && self.tracker.is_joy_button_pressed(self.joy.button(action))
    }

    fn axis_pushed(&self, axis: JoyAxis, direction: AxisDirection) -> bool {
        self.joy.enabled && self.tracker.is_axis_pushed(self.joy.axis(axis), direction)
    }
}

impl Default for InputSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl InputService for InputSystem {
    fn update(&mut self, events: &[InputEvent]) {
        self.tracker.clear();

        if self.joy.enabled {
            self.tracker.process_events(events, self.joy.threshold);
        } else {
            let filtered: Vec<InputEvent> = events
                .iter()
                .copied()
                .filter(|e| {
                    !matches!(
                        e,
                        InputEvent::JoyButtonDown { .. }
                            | InputEvent::JoyButtonUp { .. }
                            | InputEvent::JoyAxisMotion { .. }
                    )
                })
                .collect();
            self.tracker.process_events(&filtered, self.joy.threshold);
        }
    }

    //--- Edge Queries -----------------------------------------------------

    fn any_key_press(&self) -> bool {
        self.tracker.any_press()
    }

    fn up_press(&self) -> bool {
        self.key_pressed(KeyAction::Up) || self.axis_pushed(JoyAxis::Y, AxisDirection::Negative)
    }

    fn down_press(&self) -> bool {
        self.key_pressed(KeyAction::Down) || self.axis_pushed(JoyAxis::Y, AxisDirection::Positive)
    }

    fn left_press(&self) -> bool {
        self.key_pressed(KeyAction::Left) || self.axis_pushed(JoyAxis::X, AxisDirection::Negative)
    }

    fn right_press(&self) -> bool {
        self.key_pressed(KeyAction::Right) || self.axis_pushed(JoyAxis::X, AxisDirection::Positive)
    }

    fn confirm_press(&self) -> bool {
        self.key_pressed(KeyAction::Confirm) || self.joy_pressed(JoyButtonAction::Confirm)
    }

    fn cancel_press(&self) -> bool {
        self.key_pressed(KeyAction::Cancel) || self.joy_pressed(JoyButtonAction::Cancel)
    }

    fn menu_press(&self) -> bool {
        self.key_pressed(KeyAction::Menu) || self.joy_pressed(JoyButtonAction::Menu)
    }

    fn pause_press(&self) -> bool {
        self.key_pressed(KeyAction::Pause) || self.joy_pressed(JoyButtonAction::Pause)
    }

    fn quit_press(&self) -> bool {
        self.tracker.quit_requested()
            || (self.tracker.is_key_pressed(KeyCode::KeyQ) && self.tracker.modifiers().ctrl)
            || self.joy_pressed(JoyButtonAction::Quit)
    }

    fn help_press(&self) -> bool {
        self.tracker.is_key_pressed(KeyCode::F1)
    }

    fn most_recent_event(&self) -> Option<InputEvent> {
        self.tracker.most_recent_event()
    }

    fn last_key_press(&self) -> Option<KeyCode> {
        self.tracker.last_key_pressed()
    }

    fn last_joy_button_press(&self) -> Option<u8> {
        self.tracker.last_joy_button_pressed()
    }

    fn last_axis_moved(&self) -> Option<u8> {
        self.tracker.last_axis_moved()
    }

    fn reset_last_axis_moved(&mut self) {
        self.tracker.reset_last_axis_moved();
    }

    //--- Keyboard Bindings ------------------------------------------------

    fn key(&self, action: KeyAction) -> KeyCode {
        self.keys.key(action)
    }

    fn set_key(&mut self, action: KeyAction, key: KeyCode) {
        debug!("Binding {:?} to key '{}'", action, key);
        self.keys.bind(action, key);
    }

    fn restore_default_keys(&mut self) {
        self.keys.restore_defaults();
    }

    //--- Joystick Bindings ------------------------------------------------

    fn joy_button(&self, action: JoyButtonAction) -> u8 {
        self.joy.button(action)
    }

    fn set_joy_button(&mut self, action: JoyButtonAction, button: u8) {
        debug!("Binding {:?} to joystick button {}", action, button);
        self.joy.bind_button(action, button);
    }

    fn restore_default_joy_buttons(&mut self) {
        self.joy.restore_default_buttons();
    }

    fn joy_axis(&self, axis: JoyAxis) -> u8 {
        self.joy.axis(axis)
    }

    fn set_joy_axis(&mut self, axis: JoyAxis, index: u8) {
        debug!("Binding {:?} to joystick axis {}", axis, index);
        self.joy.bind_axis(axis, index);
    }

    fn joy_threshold(&self) -> u16 {
        self.joy.threshold
    }

    fn set_joy_threshold(&mut self, threshold: u16) {
        self.joy.threshold = threshold;
    }

    fn joy_index(&self) -> i32 {
        self.joy.index
    }

    fn set_joy_index(&mut self, index: i32) {
        self.joy.index = index;
    }

    fn joystick_enabled(&self) -> bool {
        self.joy.enabled
    }

    fn set_joystick_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.tracker.release_joystick();
        }
        self.joy.enabled = enabled;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn joy_axis(axis: u8, value: i16) -> InputEvent {
        InputEvent::JoyAxisMotion { axis, value }
    }

    //=====================================================================
    // Logical Presses
    //=====================================================================

    #[test]
    fn confirm_follows_key_binding() {
        let mut input = InputSystem::new();
        input.update(&[InputEvent::key_down(KeyCode::KeyF)]);
        assert!(input.confirm_press());

        input.set_key(KeyAction::Confirm, KeyCode::Enter);
        input.update(&[InputEvent::key_up(KeyCode::KeyF), InputEvent::key_down(KeyCode::KeyF)]);
        assert!(!input.confirm_press(), "old key must no longer confirm");

        input.update(&[InputEvent::key_down(KeyCode::Enter)]);
        assert!(input.confirm_press());
    }

    #[test]
    fn joystick_button_confirms() {
        let mut input = InputSystem::new();
        input.update(&[InputEvent::JoyButtonDown { button: 0 }]);
        assert!(input.confirm_press());
        assert!(!input.cancel_press());
    }

    #[test]
    fn joystick_axes_drive_directions() {
        let mut input = InputSystem::new();

        input.update(&[joy_axis(0, -30000)]);
        assert!(input.left_press());
        assert!(!input.right_press());

        input.update(&[joy_axis(0, 0), joy_axis(1, 30000)]);
        assert!(input.down_press());
        assert!(!input.up_press());
    }

    #[test]
    fn quit_sources() {
        let mut input = InputSystem::new();

        input.update(&[InputEvent::QuitRequested]);
        assert!(input.quit_press());

        input.update(&[InputEvent::KeyDown { key: KeyCode::KeyQ, modifiers: Modifiers::CTRL }]);
        assert!(input.quit_press());

        input.update(&[InputEvent::key_up(KeyCode::KeyQ), InputEvent::key_down(KeyCode::KeyQ)]);
        assert!(!input.quit_press(), "plain Q is not quit");

        input.update(&[InputEvent::JoyButtonDown { button: 7 }]);
        assert!(input.quit_press());
    }

    #[test]
    fn help_is_f1() {
        let mut input = InputSystem::new();
        input.update(&[InputEvent::key_down(KeyCode::F1)]);
        assert!(input.help_press());
        assert!(input.any_key_press());
    }

    //=====================================================================
    // Joystick Enable Flag
    //=====================================================================

    #[test]
    fn disabled_joystick_events_are_dropped() {
        let mut input = InputSystem::new();
        input.set_joystick_enabled(false);

        input.update(&[InputEvent::JoyButtonDown { button: 0 }, joy_axis(0, 30000)]);

        assert!(!input.any_key_press());
        assert!(!input.confirm_press());
        assert!(!input.right_press());
        assert_eq!(input.last_axis_moved(), None);
    }

    //=====================================================================
    // Bindings
    //=====================================================================

    #[test]
    fn key_name_reports_bound_key() {
        let mut input = InputSystem::new();
        assert_eq!(input.key_name(KeyAction::Pause), "space");

        input.set_key(KeyAction::Pause, KeyCode::KeyP);
        assert_eq!(input.key_name(KeyAction::Pause), "p");

        input.restore_default_keys();
        assert_eq!(input.key_name(KeyAction::Pause), "space");
    }

    #[test]
    fn threshold_controls_axis_detection() {
        let mut input = InputSystem::new();
        input.set_joy_threshold(20000);

        input.update(&[joy_axis(2, 15000)]);
        assert_eq!(input.last_axis_moved(), None);

        input.update(&[joy_axis(2, 25000)]);
        assert_eq!(input.last_axis_moved(), Some(2));
    }
}
