//=========================================================================
// Audio Service
//=========================================================================
//
// Sound cue and volume contract consumed by game modes.
//
// Architecture:
//   Game mode → AudioService (trait) → backend (mixer, or AudioManager)
//
// `AudioManager` is the headless backend: it keeps the sound registry and
// volume state without producing output. It records every cue it was
// asked to play, which makes mode behavior observable in tests.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};

//=== AudioService ========================================================

/// Sound and music control used by game modes.
pub trait AudioService {
    /// Loads a sound by resource name. `owner` ties its lifetime to a mode;
    /// see [`release_owner`](Self::release_owner).
    ///
    /// Returns `false` if the sound could not be loaded.
    fn load_sound(&mut self, name: &str, owner: Option<&str>) -> bool;

    /// Frees every sound registered under `owner`.
    fn release_owner(&mut self, owner: &str);

    /// Plays a sound, loading it first if needed.
    fn play_sound(&mut self, name: &str);

    fn stop_all_music(&mut self);

    /// Music volume in `[0.0, 1.0]`.
    fn music_volume(&self) -> f32;
    /// Sets the music volume, clamped to `[0.0, 1.0]`.
    fn set_music_volume(&mut self, volume: f32);

    /// Sound effect volume in `[0.0, 1.0]`.
    fn sound_volume(&self) -> f32;
    /// Sets the sound effect volume, clamped to `[0.0, 1.0]`.
    fn set_sound_volume(&mut self, volume: f32);
}

//=== AudioManager ========================================================

/// Headless [`AudioService`] that tracks state without a mixer.
#[derive(Debug)]
pub struct AudioManager {
    sounds: HashMap<String, Option<String>>,
    played: Vec<String>,
    music_playing: bool,
    music_volume: f32,
    sound_volume: f32,
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            sounds: HashMap::new(),
            played: Vec::new(),
            music_playing: false,
            music_volume: 1.0,
            sound_volume: 1.0,
        }
    }

    /// Starts a music track (state only).
    pub fn play_music(&mut self, name: &str) {
        debug!("Playing music '{}'", name);
        self.music_playing = true;
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    /// Returns `true` if `name` is currently loaded.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.sounds.contains_key(name)
    }

    /// Every sound played so far, oldest first.
    pub fn played_sounds(&self) -> &[String] {
        &self.played
    }
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioService for AudioManager {
    fn load_sound(&mut self, name: &str, owner: Option<&str>) -> bool {
        if name.is_empty() {
            warn!("Refusing to load a sound with an empty name");
            return false;
        }
        self.sounds.insert(name.to_string(), owner.map(str::to_string));
        true
    }

    fn release_owner(&mut self, owner: &str) {
        self.sounds.retain(|_, o| o.as_deref() != Some(owner));
    }

    fn play_sound(&mut self, name: &str) {
        if !self.sounds.contains_key(name) && !self.load_sound(name, None) {
            return;
        }
        self.played.push(name.to_string());
    }

    fn stop_all_music(&mut self) {
        self.music_playing = false;
    }

    fn music_volume(&self) -> f32 {
        self.music_volume
    }

    fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = volume.clamp(0.0, 1.0);
    }

    fn sound_volume(&self) -> f32 {
        self.sound_volume
    }

    fn set_sound_volume(&mut self, volume: f32) {
        self.sound_volume = volume.clamp(0.0, 1.0);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volumes_are_clamped() {
        let mut audio = AudioManager::new();

        audio.set_music_volume(1.4);
        audio.set_sound_volume(-0.2);

        assert_eq!(audio.music_volume(), 1.0);
        assert_eq!(audio.sound_volume(), 0.0);
    }

    #[test]
    fn releasing_owner_frees_only_its_sounds() {
        let mut audio = AudioManager::new();
        assert!(audio.load_sound("snd/confirm.wav", Some("boot")));
        assert!(audio.load_sound("snd/battle.wav", Some("battle")));
        assert!(audio.load_sound("snd/global.wav", None));

        audio.release_owner("boot");

        assert!(!audio.is_loaded("snd/confirm.wav"));
        assert!(audio.is_loaded("snd/battle.wav"));
        assert!(audio.is_loaded("snd/global.wav"));
    }

    #[test]
    fn playing_an_unloaded_sound_loads_it() {
        let mut audio = AudioManager::new();
        audio.play_sound("snd/bump.wav");

        assert!(audio.is_loaded("snd/bump.wav"));
        assert_eq!(audio.played_sounds(), ["snd/bump.wav".to_string()]);
    }

    #[test]
    fn empty_names_are_rejected() {
        let mut audio = AudioManager::new();
        assert!(!audio.load_sound("", None));
        audio.play_sound("");
        assert!(audio.played_sounds().is_empty());
    }

    #[test]
    fn stop_all_music() {
        let mut audio = AudioManager::new();
        audio.play_music("mus/title.ogg");
        assert!(audio.is_music_playing());

        audio.stop_all_music();
        assert!(!audio.is_music_playing());
    }
}
