//=========================================================================
// Platform Subsystem
//=========================================================================
//
// Producer side of the platform bridge.
//
// Architecture:
// ```text
//  Platform thread(s):                 Update thread:
//  ┌──────────────────────────┐       ┌──────────────────┐
//  │ winit WindowEvent        │       │  EventCollector  │
//  │   ↓ WindowInputTranslator│       │   ↓              │
//  │ joystick poller          │       │  InputService    │
//  │   ↓                      │       │   ↓              │
//  │ InputBuffer              │       │  BootMode        │
//  │   ↓ end_frame()          │       └──────────────────┘
//  │ crossbeam Sender ────────┼──────────────↑
//  └──────────────────────────┘   PlatformEvent
// ```
//
// The window backend owns a `PlatformSink`, feeds it every window event
// and joystick sample, and calls `end_frame()` at its frame boundary
// (winit's `RedrawRequested` or `AboutToWait`).
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event_mapper;
pub mod input_buffer;

//=== Public API ==========================================================

pub use event_mapper::WindowInputTranslator;
pub use input_buffer::InputBuffer;

//=== External Dependencies ===============================================

use crossbeam_channel::Sender;
use log::warn;
use winit::event::WindowEvent;

//=== Internal Dependencies ===============================================

use crate::core::input::event::InputEvent;
use crate::core::platform_bridge::PlatformEvent;

//=== PlatformSink ========================================================

/// Buffers platform input and forwards it once per frame.
pub struct PlatformSink {
    sender: Sender<PlatformEvent>,
    translator: WindowInputTranslator,
    buffer: InputBuffer,
    connected: bool,
}

impl PlatformSink {
    pub fn new(sender: Sender<PlatformEvent>) -> Self {
        Self {
            sender,
            translator: WindowInputTranslator::new(),
            buffer: InputBuffer::new(),
            connected: true,
        }
    }

    /// Feeds a winit window event.
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        if let Some(input) = self.translator.translate(event) {
            self.buffer.push(input);
        }
    }

    /// Feeds an already translated event (joystick poller, replay).
    pub fn push(&mut self, event: InputEvent) {
        self.buffer.push(event);
    }

    /// Sends this frame's input. Returns `false` once the update side is gone.
    pub fn end_frame(&mut self) -> bool {
        if self.connected && !self.buffer.flush(&self.sender) {
            warn!("Update thread disconnected; dropping further input");
            self.connected = false;
        }
        self.connected
    }

    /// Flushes remaining input and reports that the window is gone.
    pub fn close(mut self) {
        self.end_frame();
        if self.connected {
            let _ = self.sender.send(PlatformEvent::WindowClosed);
        }
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
    fn window_close_request_is_forwarded_as_quit_input() {
        let (tx, rx) = unbounded();
        let mut sink = PlatformSink::new(tx);

        sink.handle_window_event(&WindowEvent::CloseRequested);
        assert!(sink.end_frame());

        assert_eq!(
            rx.try_recv().unwrap(),
            PlatformEvent::Inputs { discrete: vec![InputEvent::QuitRequested], continuous: vec![] }
        );
    }

    #[test]
    fn close_flushes_then_reports_window_closed() {
        let (tx, rx) = unbounded();
        let mut sink = PlatformSink::new(tx);
        sink.push(InputEvent::key_down(KeyCode::Enter));

        sink.close();

        assert!(matches!(rx.try_recv().unwrap(), PlatformEvent::Inputs { .. }));
        assert_eq!(rx.try_recv().unwrap(), PlatformEvent::WindowClosed);
    }

    #[test]
    fn disconnect_is_sticky() {
        let (tx, rx) = unbounded();
        let mut sink = PlatformSink::new(tx);
        drop(rx);

        sink.push(InputEvent::JoyButtonDown { button: 0 });
        assert!(!sink.end_frame());
        assert!(!sink.end_frame());
    }
}
