//=========================================================================
// Frame Driver
//=========================================================================
//
// Drives the boot mode at a fixed tick rate from platform input.
//
// Architecture:
// ```text
//     EngineBuilder  ──build(boot)──>  Engine  ──run()──>  BootSignal
//         │                              │
//         ├─ with_tps()                  ├─ sender() for the platform side
//         └─ with_channel_capacity()     └─ tick():
//                                             drain channel
//                                             update services
//                                             update + draw boot mode
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Sender};
use log::info;

//=== Internal Dependencies ===============================================

use crate::boot::{BootMode, BootSignal};
use crate::core::platform_bridge::{EventCollector, PlatformEvent, TickControl};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (logic updates per second)
/// - **Channel capacity**: 128 events
///
/// # Examples
///
/// ```no_run
/// use boot_mode::boot::BootModeBuilder;
/// use boot_mode::core::services::Services;
/// use boot_mode::EngineBuilder;
///
/// let boot = BootModeBuilder::new().build(Services::headless()).expect("boot script");
/// let mut engine = EngineBuilder::new()
///     .with_tps(30.0)
///     .build(boot);
///
/// let signal = engine.run();
/// ```
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self { tps: 60.0, channel_capacity: 128 }
    }

    /// Sets the target ticks per second.
    ///
    /// Every tick advances timers and fades by `1000 / tps` milliseconds.
    /// Fractional milliseconds carry over to later ticks.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the capacity of the platform → engine channel.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    pub fn build(self, boot: BootMode) -> Engine {
        info!("Building engine (TPS: {}, channel: {})", self.tps, self.channel_capacity);

        let (sender, receiver) = bounded(self.channel_capacity);
        Engine {
            boot,
            collector: EventCollector::new(receiver),
            sender,
            frame: Duration::from_secs_f64(1.0 / self.tps),
            frame_ms: 1000.0 / self.tps,
            carry_ms: 0.0,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Fixed-step driver for a [`BootMode`].
///
/// The platform side sends [`PlatformEvent`]s through [`Engine::sender`];
/// each tick drains them and advances the mode by one frame.
pub struct Engine {
    boot: BootMode,
    collector: EventCollector,
    sender: Sender<PlatformEvent>,
    frame: Duration,
    frame_ms: f64,
    // Sub-millisecond remainder not yet handed to the services.
    carry_ms: f64,
}

impl Engine {
    //--- Accessors --------------------------------------------------------

    /// Sender for the platform producer (window backend, joystick poller).
    pub fn sender(&self) -> Sender<PlatformEvent> {
        self.sender.clone()
    }

    pub fn boot(&self) -> &BootMode {
        &self.boot
    }

    pub fn boot_mut(&mut self) -> &mut BootMode {
        &mut self.boot
    }

    /// Milliseconds each tick advances timers by, on average.
    pub fn frame_ms(&self) -> f64 {
        self.frame_ms
    }

    //--- Execution --------------------------------------------------------

    /// Runs one frame.
    ///
    /// # Processing Pipeline
    ///
    /// 1. **Drain**: collects the platform events queued since last tick
    /// 2. **Services**: timers, fades, then input state
    /// 3. **Update**: the boot mode consumes the frame's input
    /// 4. **Draw**: scene layers, then menus and windows
    ///
    /// A closed window yields [`BootSignal::Quit`].
    pub fn tick(&mut self) -> BootSignal {
        //--- 1. Drain platform events -------------------------------------
        if self.collector.collect_frame() == TickControl::Exit {
            info!("Platform closed; leaving boot mode");
            self.boot.services_mut().system.exit_game();
            return BootSignal::Quit;
        }
        let events = self.collector.take_events();

        //--- 2. Services ---------------------------------------------------
        let step = self.take_step_ms();
        self.boot.services_mut().update_frame(&events, step);

        //--- 3. Update -----------------------------------------------------
        let signal = self.boot.update();

        //--- 4. Draw -------------------------------------------------------
        self.boot.draw();
        self.boot.draw_post_effects();

        signal
    }

    /// Whole milliseconds for this tick; the remainder carries forward.
    fn take_step_ms(&mut self) -> u32 {
        self.carry_ms += self.frame_ms;
        let step = self.carry_ms.floor();
        self.carry_ms -= step;
        step as u32
    }

    /// Ticks at the configured rate until the boot mode produces a signal
    /// or the game is exiting.
    pub fn run(&mut self) -> BootSignal {
        info!("Starting boot loop ({:.3} ms per frame)", self.frame_ms);
        self.boot.reset();

        loop {
            let frame_start = Instant::now();

            let signal = self.tick();
            if signal != BootSignal::None {
                info!("Boot loop finished with {:?}", signal);
                return signal;
            }
            if self.boot.services().system.is_exiting() {
                info!("Exit requested; leaving boot loop");
                return BootSignal::Quit;
            }

            let elapsed = frame_start.elapsed();
            if elapsed < self.frame {
                thread::sleep(self.frame - elapsed);
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boot::{BootAction, BootModeBuilder, BootState};
    use crate::core::input::event::{InputEvent, KeyCode};
    use crate::core::services::Services;
    use std::fs;
    use tempfile::TempDir;

    const BOOT_SCRIPT: &str = include_str!("../dat/config/boot.lua");
    const SETTINGS: &str = include_str!("../dat/config/settings.lua");

    fn boot_mode(dir: &TempDir) -> BootMode {
        let config = dir.path().join("config");
        fs::create_dir_all(&config).unwrap();
        fs::write(config.join("boot.lua"), BOOT_SCRIPT).unwrap();
        // Skip the first start help window so quit input reaches the menu.
        let settings = SETTINGS.replace("first_start = 1", "first_start = 0");
        fs::write(config.join("settings.lua"), settings).unwrap();

        BootModeBuilder::new()
            .with_data_dir(dir.path())
            .with_user_dir(dir.path())
            .build(Services::headless())
            .unwrap()
    }

    fn inputs(events: Vec<InputEvent>) -> PlatformEvent {
        PlatformEvent::Inputs { discrete: events, continuous: vec![] }
    }

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.tps, 60.0);
        assert_eq!(builder.channel_capacity, 128);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        EngineBuilder::new().with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        EngineBuilder::new().with_channel_capacity(0);
    }

    #[test]
    fn frame_length_follows_tps() {
        let dir = tempfile::tempdir().unwrap();
        let engine = EngineBuilder::new().with_tps(50.0).build(boot_mode(&dir));
        assert_eq!(engine.frame_ms(), 20.0);
    }

    #[test]
    fn sub_millisecond_frames_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = EngineBuilder::new().with_tps(4000.0).build(boot_mode(&dir));

        let steps: Vec<u32> = (0..8).map(|_| engine.take_step_ms()).collect();
        assert_eq!(steps.iter().sum::<u32>(), 2);
        assert!(steps.iter().all(|&ms| ms <= 1));
    }

    #[test]
    fn new_game_fade_completes_at_high_tps() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = EngineBuilder::new().with_tps(2500.0).build(boot_mode(&dir));
        assert_eq!(engine.boot_mut().invoke(BootAction::NewGame), BootSignal::None);

        // 2000 ms fade at 0.4 ms per tick needs 5000 ticks.
        let mut signals = Vec::new();
        for tick in 0..6000 {
            if engine.tick() == BootSignal::NewGame {
                signals.push(tick);
            }
        }
        assert_eq!(signals.len(), 1);
        assert!(signals[0] >= 4990 && signals[0] <= 5010, "fired on tick {}", signals[0]);
    }

    //=====================================================================
    // Tick Tests
    //=====================================================================

    #[test]
    fn tick_feeds_platform_input_to_boot_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = EngineBuilder::new().build(boot_mode(&dir));
        let sender = engine.sender();

        assert_eq!(engine.tick(), BootSignal::None);
        assert_eq!(engine.boot().state(), BootState::Intro);

        sender.send(inputs(vec![InputEvent::key_down(KeyCode::Enter)])).unwrap();
        assert_eq!(engine.tick(), BootSignal::None);
        assert_eq!(engine.boot().state(), BootState::Menu);
    }

    #[test]
    fn window_close_ends_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = EngineBuilder::new().build(boot_mode(&dir));
        engine.sender().send(PlatformEvent::WindowClosed).unwrap();

        assert_eq!(engine.run(), BootSignal::Quit);
        assert!(engine.boot().services().system.is_exiting());
    }

    #[test]
    fn quit_request_on_main_menu_ends_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = EngineBuilder::new().with_tps(1000.0).build(boot_mode(&dir));
        let sender = engine.sender();
        sender.send(inputs(vec![InputEvent::key_down(KeyCode::Enter)])).unwrap();
        engine.tick();

        sender.send(inputs(vec![InputEvent::QuitRequested])).unwrap();
        assert_eq!(engine.run(), BootSignal::Quit);
    }
}
