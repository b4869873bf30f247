//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges platform producers (winit window, joystick poller) with the
// single logical thread that updates game modes.
//
// Components:
// - `interface`: Event types crossing the channel (the contract)
// - `event_collector`: Update-side draining, batching and blocking waits
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Public API ==========================================================

pub use event_collector::{EventCollector, TickControl};
pub use interface::PlatformEvent;
