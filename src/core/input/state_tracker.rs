//=========================================================================
// State Tracker
//=========================================================================
//
// Low-level input state tracking with per-frame delta tracking.
//
// Architecture:
//   InputEvent → process_events() → HashSet (keys/buttons held) → query
//
// Frame lifecycle: clear() → process_events() → query
//
// Joystick axes are tracked as raw positions. Pushing an axis past the
// threshold from rest produces a one-frame directional edge, so a held
// stick does not repeat.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, HashSet};

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers};

//=== AxisDirection =======================================================

/// Side of an axis that was pushed past the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisDirection {
    Negative,
    Positive,
}

impl AxisDirection {
    fn of(value: i16, threshold: u16) -> Option<Self> {
        let magnitude = i32::from(value).abs();
        if magnitude <= i32::from(threshold) {
            None
        } else if value < 0 {
            Some(Self::Negative)
        } else {
            Some(Self::Positive)
        }
    }
}

//=== StateTracker ========================================================

/// Tracks persistent state (keys held) and per-frame deltas (keys pressed).
pub struct StateTracker {
    //--- Persistent State (survives frame boundary) ----------------------
    keys_down: HashSet<KeyCode>,
    joy_buttons_down: HashSet<u8>,
    joy_axes: HashMap<u8, i16>,
    modifiers: Modifiers,
    last_axis_moved: Option<u8>,

    //--- Frame Deltas (reset each frame via clear()) --------------------
    keys_pressed_this_frame: HashSet<KeyCode>,
    keys_released_this_frame: HashSet<KeyCode>,
    joy_buttons_pressed_this_frame: HashSet<u8>,
    axes_pushed_this_frame: HashSet<(u8, AxisDirection)>,
    most_recent_event: Option<InputEvent>,
    last_key_pressed: Option<KeyCode>,
    last_joy_button_pressed: Option<u8>,
    quit_requested: bool,
}

impl StateTracker {
    /// Creates a new state tracker with empty state.
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            joy_buttons_down: HashSet::new(),
            joy_axes: HashMap::new(),
            modifiers: Modifiers::NONE,
            last_axis_moved: None,
            keys_pressed_this_frame: HashSet::new(),
            keys_released_this_frame: HashSet::new(),
            joy_buttons_pressed_this_frame: HashSet::new(),
            axes_pushed_this_frame: HashSet::new(),
            most_recent_event: None,
            last_key_pressed: None,
            last_joy_button_pressed: None,
            quit_requested: false,
        }
    }

    //--- Frame Processing -------------------------------------------------

    /// Clears frame-specific deltas.
    pub(super) fn clear(&mut self) {
        self.keys_pressed_this_frame.clear();
        self.keys_released_this_frame.clear();
        self.joy_buttons_pressed_this_frame.clear();
        self.axes_pushed_this_frame.clear();
        self.most_recent_event = None;
        self.last_key_pressed = None;
        self.last_joy_button_pressed = None;
        self.quit_requested = false;
    }

    /// Processes input events, updating internal state.
    ///
    /// `threshold` is the joystick dead zone; axis motion inside it is
    /// treated as noise.
    pub(super) fn process_events(&mut self, events: &[InputEvent], threshold: u16) {
        for event in events {
            self.process_event(event, threshold);
        }
    }

    /// Forgets the last axis moved so the next push is reported fresh.
    pub(super) fn reset_last_axis_moved(&mut self) {
        self.last_axis_moved = None;
    }

    /// Releases all held joystick state (used when the joystick is disabled).
    pub(super) fn release_joystick(&mut self) {
        self.joy_buttons_down.clear();
        self.joy_axes.clear();
        self.last_axis_moved = None;
    }

    //--- Internal Helpers -------------------------------------------------
    fn process_event(&mut self, event: &InputEvent, threshold: u16) {
        match event {
            InputEvent::KeyDown { key, modifiers } => {
                self.modifiers = *modifiers;
                // Only mark as pressed if it wasn't already down
                if self.keys_down.insert(*key) {
                    self.keys_pressed_this_frame.insert(*key);
                    self.last_key_pressed = Some(*key);
                    self.most_recent_event = Some(*event);
                }
            }

            InputEvent::KeyUp { key, modifiers } => {
                self.modifiers = *modifiers;
                if self.keys_down.remove(key) {
                    self.keys_released_this_frame.insert(*key);
                    self.most_recent_event = Some(*event);
                }
            }

            InputEvent::JoyButtonDown { button } => {
                if self.joy_buttons_down.insert(*button) {
                    self.joy_buttons_pressed_this_frame.insert(*button);
                    self.last_joy_button_pressed = Some(*button);
                    self.most_recent_event = Some(*event);
                }
            }

            InputEvent::JoyButtonUp { button } => {
                if self.joy_buttons_down.remove(button) {
                    self.most_recent_event = Some(*event);
                }
            }

            InputEvent::JoyAxisMotion { axis, value } => {
                let previous = self.joy_axes.insert(*axis, *value).unwrap_or(0);
                let before = AxisDirection::of(previous, threshold);
                let after = AxisDirection::of(*value, threshold);

                if let Some(direction) = after {
                    self.last_axis_moved = Some(*axis);
                    if before != after {
                        self.axes_pushed_this_frame.insert((*axis, direction));
                        self.most_recent_event = Some(*event);
                    }
                }
            }

            InputEvent::QuitRequested => {
                self.quit_requested = true;
                self.most_recent_event = Some(*event);
            }

            InputEvent::Unidentified => {
                // Ignore unrecognized events
            }
        }
    }

    //=====================================================================
    // Query API - Keyboard
    //=====================================================================

    /// Returns `true` if key transitioned UP → DOWN (one frame only).
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed_this_frame.contains(&key)
    }

    /// Returns `true` while key is held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns `true` if key transitioned DOWN → UP.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released_this_frame.contains(&key)
    }

    /// Returns the current modifier key state.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    //=====================================================================
    // Query API - Joystick
    //=====================================================================

    /// Like [`is_key_pressed`](Self::is_key_pressed) but for joystick buttons.
    pub fn is_joy_button_pressed(&self, button: u8) -> bool {
        self.joy_buttons_pressed_this_frame.contains(&button)
    }

    /// Returns `true` if `axis` crossed the threshold toward `direction` this frame.
    pub fn is_axis_pushed(&self, axis: u8, direction: AxisDirection) -> bool {
        self.axes_pushed_this_frame.contains(&(axis, direction))
    }

    /// Last axis moved beyond the threshold since the last reset.
    pub fn last_axis_moved(&self) -> Option<u8> {
        self.last_axis_moved
    }

    //=====================================================================
    // Query API - Frame Summary
    //=====================================================================

    /// Returns `true` if any key or joystick button went down this frame.
    pub fn any_press(&self) -> bool {
        !self.keys_pressed_this_frame.is_empty() || !self.joy_buttons_pressed_this_frame.is_empty()
    }

    /// The last meaningful event of the current frame.
    pub fn most_recent_event(&self) -> Option<InputEvent> {
        self.most_recent_event
    }

    /// Last key that went down this frame, regardless of later events.
    pub fn last_key_pressed(&self) -> Option<KeyCode> {
        self.last_key_pressed
    }

    /// Last joystick button that went down this frame.
    pub fn last_joy_button_pressed(&self) -> Option<u8> {
        self.last_joy_button_pressed
    }

    /// Returns `true` if the window manager asked to close this frame.
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}

//--- Trait Implementations -----------------------------------------------

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: u16 = 8192;

    //--- Test Helpers -----------------------------------------------------

    fn frame(tracker: &mut StateTracker, events: &[InputEvent]) {
        tracker.clear();
        tracker.process_events(events, THRESHOLD);
    }

    fn axis(axis: u8, value: i16) -> InputEvent {
        InputEvent::JoyAxisMotion { axis, value }
    }

    //=====================================================================
    // Keyboard Tests
    //=====================================================================

    #[test]
    fn key_pressed_only_on_transition_frame() {
        let mut tracker = StateTracker::new();

        // Frame 1: Key down
        frame(&mut tracker, &[InputEvent::key_down(KeyCode::KeyA)]);
        assert!(tracker.is_key_pressed(KeyCode::KeyA));
        assert!(tracker.is_key_down(KeyCode::KeyA));

        // Frame 2: Still held
        frame(&mut tracker, &[]);
        assert!(!tracker.is_key_pressed(KeyCode::KeyA));
        assert!(tracker.is_key_down(KeyCode::KeyA));

        // Frame 3: Released
        frame(&mut tracker, &[InputEvent::key_up(KeyCode::KeyA)]);
        assert!(!tracker.is_key_down(KeyCode::KeyA));
        assert!(tracker.is_key_released(KeyCode::KeyA));
    }

    #[test]
    fn repeated_key_down_is_not_a_new_press() {
        let mut tracker = StateTracker::new();
        frame(&mut tracker, &[InputEvent::key_down(KeyCode::Space)]);
        frame(&mut tracker, &[InputEvent::key_down(KeyCode::Space)]);

        assert!(!tracker.is_key_pressed(KeyCode::Space));
        assert!(!tracker.any_press());
        assert_eq!(tracker.most_recent_event(), None);
    }

    #[test]
    fn modifiers_follow_latest_key_event() {
        let mut tracker = StateTracker::new();
        frame(
            &mut tracker,
            &[InputEvent::KeyDown { key: KeyCode::KeyQ, modifiers: Modifiers::CTRL }],
        );
        assert!(tracker.modifiers().ctrl);
    }

    //=====================================================================
    // Frame Summary Tests
    //=====================================================================

    #[test]
    fn most_recent_event_is_cleared_each_frame() {
        let mut tracker = StateTracker::new();
        frame(
            &mut tracker,
            &[InputEvent::key_down(KeyCode::KeyA), InputEvent::key_down(KeyCode::KeyB)],
        );
        assert_eq!(tracker.most_recent_event(), Some(InputEvent::key_down(KeyCode::KeyB)));

        frame(&mut tracker, &[]);
        assert_eq!(tracker.most_recent_event(), None);
    }

    #[test]
    fn key_press_survives_later_events_in_the_frame() {
        let mut tracker = StateTracker::new();
        frame(
            &mut tracker,
            &[
                InputEvent::key_down(KeyCode::KeyJ),
                InputEvent::JoyButtonDown { button: 6 },
                axis(2, 30000),
            ],
        );
        assert_eq!(tracker.most_recent_event(), Some(axis(2, 30000)));
        assert_eq!(tracker.last_key_pressed(), Some(KeyCode::KeyJ));
        assert_eq!(tracker.last_joy_button_pressed(), Some(6));

        frame(&mut tracker, &[]);
        assert_eq!(tracker.last_key_pressed(), None);
        assert_eq!(tracker.last_joy_button_pressed(), None);
    }

    #[test]
    fn held_key_is_not_a_new_press() {
        let mut tracker = StateTracker::new();
        frame(&mut tracker, &[InputEvent::key_down(KeyCode::KeyJ)]);
        frame(&mut tracker, &[InputEvent::key_down(KeyCode::KeyJ)]);
        assert_eq!(tracker.last_key_pressed(), None);
    }

    #[test]
    fn joystick_buttons_count_as_any_press() {
        let mut tracker = StateTracker::new();
        frame(&mut tracker, &[InputEvent::JoyButtonDown { button: 2 }]);

        assert!(tracker.any_press());
        assert!(tracker.is_joy_button_pressed(2));
        assert!(!tracker.is_joy_button_pressed(1));
    }

    #[test]
    fn quit_request_lasts_one_frame() {
        let mut tracker = StateTracker::new();
        frame(&mut tracker, &[InputEvent::QuitRequested]);
        assert!(tracker.quit_requested());

        frame(&mut tracker, &[]);
        assert!(!tracker.quit_requested());
    }

    //=====================================================================
    // Joystick Axis Tests
    //=====================================================================

    #[test]
    fn axis_noise_inside_threshold_is_ignored() {
        let mut tracker = StateTracker::new();
        frame(&mut tracker, &[axis(0, 4000), axis(1, -8192)]);

        assert_eq!(tracker.last_axis_moved(), None);
        assert!(!tracker.is_axis_pushed(0, AxisDirection::Positive));
        assert!(!tracker.is_axis_pushed(1, AxisDirection::Negative));
    }

    #[test]
    fn axis_push_is_a_single_frame_edge() {
        let mut tracker = StateTracker::new();
        frame(&mut tracker, &[axis(1, -20000)]);
        assert!(tracker.is_axis_pushed(1, AxisDirection::Negative));
        assert_eq!(tracker.last_axis_moved(), Some(1));

        // Held past the threshold: no new edge
        frame(&mut tracker, &[axis(1, -25000)]);
        assert!(!tracker.is_axis_pushed(1, AxisDirection::Negative));

        // Flipped to the other side: new edge
        frame(&mut tracker, &[axis(1, 20000)]);
        assert!(tracker.is_axis_pushed(1, AxisDirection::Positive));
    }

    #[test]
    fn last_axis_moved_survives_frames_until_reset() {
        let mut tracker = StateTracker::new();
        frame(&mut tracker, &[axis(3, 30000)]);
        frame(&mut tracker, &[]);
        assert_eq!(tracker.last_axis_moved(), Some(3));

        tracker.reset_last_axis_moved();
        assert_eq!(tracker.last_axis_moved(), None);
    }

    #[test]
    fn extreme_negative_axis_value_does_not_overflow() {
        let mut tracker = StateTracker::new();
        frame(&mut tracker, &[axis(0, i16::MIN)]);
        assert!(tracker.is_axis_pushed(0, AxisDirection::Negative));
    }
}
