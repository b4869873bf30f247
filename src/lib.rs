//=========================================================================
// Boot Mode: Library Root
//
// Title screen of a role-playing game engine: intro, main menu, options
// menus, input rebinding and settings persistence.
//
// Typical usage:
// ```no_run
// use boot_mode::boot::{BootModeBuilder, BootSignal};
// use boot_mode::core::Services;
// use boot_mode::EngineBuilder;
//
// let boot = BootModeBuilder::new().build(Services::headless()).expect("boot script");
// match EngineBuilder::new().build(boot).run() {
//     BootSignal::NewGame => { /* load the first map */ }
//     _ => {}
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the engine services and the Lua script layer.
// `boot` is the title screen mode built on them.
// `platform` is the producer side of the input channel (winit mapping
// and per-frame batching).
//
pub mod boot;
pub mod core;
pub mod platform;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `engine` drives a mode at a fixed tick rate.
//
mod engine;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
