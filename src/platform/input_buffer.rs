//=========================================================================
// Input Buffer
//=========================================================================
//
// Per-frame aggregation of platform input before it crosses the channel.
//
// Architecture:
//   push_discrete(key/button) ─┐
//   push_continuous(axis)    ──┼→ flush() → PlatformEvent::Inputs → Sender
//
// Discrete inputs keep arrival order with consecutive duplicates
// dropped. Continuous inputs (joystick axes) are coalesced to the latest
// value per axis. Empty frames are not sent.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;

use crossbeam_channel::Sender;

//=== Internal Dependencies ===============================================

use crate::core::input::event::InputEvent;
use crate::core::platform_bridge::PlatformEvent;

//=== InputBuffer =========================================================

/// Transient store for one frame of platform input.
#[derive(Debug, Default)]
pub struct InputBuffer {
    discrete: Vec<InputEvent>,
    axes: BTreeMap<u8, i16>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self {
            discrete: Vec::with_capacity(32),
            axes: BTreeMap::new(),
        }
    }

    /// Routes `event` to the discrete or continuous store.
    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::JoyAxisMotion { axis, value } => {
                self.axes.insert(axis, value);
            }
            InputEvent::Unidentified => {}
            other => self.push_discrete(other),
        }
    }

    /// Appends a discrete input, ignoring an exact repeat of the last one.
    pub fn push_discrete(&mut self, event: InputEvent) {
        if self.discrete.last() != Some(&event) {
            self.discrete.push(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.axes.is_empty()
    }

    /// Sends the buffered frame and clears the buffer.
    ///
    /// Returns `false` if the receiving side is gone.
    pub fn flush(&mut self, sender: &Sender<PlatformEvent>) -> bool {
        if self.is_empty() {
            return true;
        }

        let discrete = std::mem::take(&mut self.discrete);
        let continuous = std::mem::take(&mut self.axes)
            .into_iter()
            .map(|(axis, value)| InputEvent::JoyAxisMotion { axis, value })
            .collect();

        sender.send(PlatformEvent::Inputs { discrete, continuous }).is_ok()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::KeyCode;
    use crossbeam_channel::unbounded;

    #[test]
    fn consecutive_duplicates_are_dropped() {
        let mut buffer = InputBuffer::new();
        buffer.push(InputEvent::key_down(KeyCode::KeyA));
        buffer.push(InputEvent::key_down(KeyCode::KeyA));
        buffer.push(InputEvent::key_up(KeyCode::KeyA));
        buffer.push(InputEvent::key_down(KeyCode::KeyA));

        let (tx, rx) = unbounded();
        assert!(buffer.flush(&tx));

        match rx.try_recv().unwrap() {
            PlatformEvent::Inputs { discrete, .. } => assert_eq!(discrete.len(), 3),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn axes_coalesce_to_latest_value() {
        let mut buffer = InputBuffer::new();
        buffer.push(InputEvent::JoyAxisMotion { axis: 1, value: 100 });
        buffer.push(InputEvent::JoyAxisMotion { axis: 0, value: -5 });
        buffer.push(InputEvent::JoyAxisMotion { axis: 1, value: 20000 });

        let (tx, rx) = unbounded();
        buffer.flush(&tx);

        assert_eq!(
            rx.try_recv().unwrap(),
            PlatformEvent::Inputs {
                discrete: vec![],
                continuous: vec![
                    InputEvent::JoyAxisMotion { axis: 0, value: -5 },
                    InputEvent::JoyAxisMotion { axis: 1, value: 20000 },
                ],
            }
        );
    }

    #[test]
    fn empty_frames_are_not_sent() {
        let mut buffer = InputBuffer::new();
        buffer.push(InputEvent::Unidentified);

        let (tx, rx) = unbounded();
        assert!(buffer.flush(&tx));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn flush_reports_disconnect() {
        let mut buffer = InputBuffer::new();
        buffer.push(InputEvent::JoyButtonDown { button: 0 });

        let (tx, rx) = unbounded();
        drop(rx);
        assert!(!buffer.flush(&tx));
        assert!(buffer.is_empty());
    }
}
