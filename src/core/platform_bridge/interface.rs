//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Platform-to-core event type.
//
// Producers may live on any thread; everything they report reaches game
// modes only through this enum and a crossbeam channel, which keeps all
// mode state mutation on the update thread.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::event::InputEvent;

//=== PlatformEvent =======================================================

/// Events sent from platform producers to the update thread.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// Batched input events for a frame.
    ///
    /// `discrete` holds keys and buttons in arrival order; `continuous`
    /// holds the latest position of each joystick axis.
    Inputs {
        discrete: Vec<InputEvent>,
        continuous: Vec<InputEvent>,
    },

    /// Window close requested.
    WindowClosed,
}
