//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use boot_mode::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Frame driver
pub use crate::engine::{Engine, EngineBuilder};

// Boot mode
pub use crate::boot::{BootAction, BootError, BootMode, BootModeBuilder, BootSignal, MenuId};

// Services
pub use crate::core::{
    AudioService, Color, InputService, Resolution, Services, SystemService, VideoService,
};

// Input
pub use crate::core::input::{InputEvent, JoyAxis, JoyButtonAction, KeyAction, KeyCode};

// Platform
pub use crate::core::platform_bridge::PlatformEvent;
pub use crate::platform::PlatformSink;
