//=========================================================================
// Core Services
//=========================================================================
//
// Engine services a game mode talks to, plus the bridge that brings
// platform input to the update thread.
//
// Components:
// - `audio`, `input`, `video`, `system`: service traits and headless
//   implementations
// - `services`: the container a mode owns
// - `script`: Lua config access and the scene script host
// - `platform_bridge`: channel contract and update-side collection
//
//=========================================================================

//=== Module Declarations =================================================

pub mod audio;
pub mod input;
pub mod platform_bridge;
pub mod script;
pub mod services;
pub mod system;
pub mod video;

//=== Public API ==========================================================

pub use audio::{AudioManager, AudioService};
pub use input::{InputService, InputSystem};
pub use services::Services;
pub use system::{SystemManager, SystemService};
pub use video::{Color, DrawFlags, Resolution, VideoManager, VideoService};
