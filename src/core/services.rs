//=========================================================================
// Engine Services
//=========================================================================
//
// Container for the engine services a game mode drives.
//
// Architecture:
//   Services
//     ├─ audio:  Box<dyn AudioService>
//     ├─ input:  Box<dyn InputService>
//     ├─ video:  Box<dyn VideoService>
//     └─ system: Box<dyn SystemService>
//
// Each field is a trait object so a backend (or a test double) can be
// injected without the mode knowing its concrete type.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::audio::{AudioManager, AudioService};
use super::input::event::InputEvent;
use super::input::{InputService, InputSystem};
use super::system::{SystemManager, SystemService};
use super::video::{VideoManager, VideoService};

//=== Services ============================================================

/// Engine services owned by the active mode.
pub struct Services {
    pub audio: Box<dyn AudioService>,
    pub input: Box<dyn InputService>,
    pub video: Box<dyn VideoService>,
    pub system: Box<dyn SystemService>,
}

impl Services {
    pub fn new(
        audio: Box<dyn AudioService>,
        input: Box<dyn InputService>,
        video: Box<dyn VideoService>,
        system: Box<dyn SystemService>,
    ) -> Self {
        Self { audio, input, video, system }
    }

    /// Services backed by the headless reference implementations.
    pub fn headless() -> Self {
        Self::new(
            Box::new(AudioManager::new()),
            Box::new(InputSystem::new()),
            Box::new(VideoManager::new()),
            Box::new(SystemManager::new()),
        )
    }

    //--- Frame Update -----------------------------------------------------

    /// Advances the services by one frame.
    ///
    /// # Processing Pipeline
    ///
    /// 1. **Timers**: records the frame's elapsed time
    /// 2. **Video**: advances fades by the same amount
    /// 3. **Input**: rebuilds per-frame input state from `events`
    pub fn update_frame(&mut self, events: &[InputEvent], elapsed_ms: u32) {
        self.system.update_timers(elapsed_ms);
        self.video.update(elapsed_ms);
        self.input.update(events);
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::headless()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::KeyCode;
    use crate::core::video::Color;

    #[test]
    fn update_frame_feeds_every_service() {
        let mut services = Services::headless();
        services.video.fade_screen(Color::BLACK, 100);

        services.update_frame(&[InputEvent::key_down(KeyCode::KeyF)], 120);

        assert_eq!(services.system.update_time(), 120);
        assert!(!services.video.is_fading());
        assert!(services.input.confirm_press());
    }
}
