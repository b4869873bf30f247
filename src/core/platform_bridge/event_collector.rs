//=========================================================================
// Event Collector
//=========================================================================
//
// Update-side platform event collection with bounded draining and
// shutdown detection.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → input_batches → TickControl
//                           → wait_key_press() / wait_joy_press() (blocking)
//
// Bounded draining prevents a flooded channel from starving the frame.
// The blocking waits exist for capture flows that run outside the frame
// loop; the frame loop itself never blocks here.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::event::{InputEvent, KeyCode};

//=== TickControl =========================================================

/// Update loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

/// Collects platform events with bounded draining and batch extraction.
pub struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    input_batches: Vec<Vec<InputEvent>>,
}

impl EventCollector {
    const MAX_EVENTS_PER_FRAME: usize = 100;

    pub fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            input_batches: Vec::with_capacity(4),
        }
    }

    /// Collects pending platform events (bounded to prevent starvation).
    pub fn collect_frame(&mut self) -> TickControl {
        self.input_batches.clear();
        let mut drained = 0;

        while drained < Self::MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.handle_event(event) == TickControl::Exit {
                        return TickControl::Exit;
                    }
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= Self::MAX_EVENTS_PER_FRAME {
            warn!("Event queue backlog: drained {} events this frame", drained);
        }

        TickControl::Continue
    }

    /// Returns collected input batches for this frame.
    pub fn batches(&self) -> &[Vec<InputEvent>] {
        &self.input_batches
    }

    /// Takes this frame's events as one flat list in arrival order.
    pub fn take_events(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.input_batches).into_iter().flatten().collect()
    }

    //--- Blocking Waits ---------------------------------------------------

    /// Blocks until a key goes down and returns it.
    ///
    /// Events other than key presses are consumed and discarded. Returns
    /// `None` if the window closes or every sender is dropped first.
    pub fn wait_key_press(&self) -> Option<KeyCode> {
        self.wait_for(|event| match event {
            InputEvent::KeyDown { key, .. } => Some(*key),
            _ => None,
        })
    }

    /// Blocks until a joystick button goes down and returns its index.
    pub fn wait_joy_press(&self) -> Option<u8> {
        self.wait_for(|event| match event {
            InputEvent::JoyButtonDown { button } => Some(*button),
            _ => None,
        })
    }

    //--- Internal Helpers -------------------------------------------------

    fn wait_for<T>(&self, matcher: impl Fn(&InputEvent) -> Option<T>) -> Option<T> {
        loop {
            match self.receiver.recv() {
                Ok(PlatformEvent::Inputs { discrete, .. }) => {
                    if let Some(found) = discrete.iter().find_map(&matcher) {
                        return Some(found);
                    }
                }
                Ok(PlatformEvent::WindowClosed) | Err(_) => {
                    debug!("Stopped waiting for input: platform closed");
                    return None;
                }
            }
        }
    }

    fn handle_event(&mut self, event: PlatformEvent) -> TickControl {
        match event {
            PlatformEvent::Inputs { discrete, continuous } => {
                if !discrete.is_empty() {
                    self.input_batches.push(discrete);
                }
                if !continuous.is_empty() {
                    self.input_batches.push(continuous);
                }
                TickControl::Continue
            }
            PlatformEvent::WindowClosed => TickControl::Exit,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
