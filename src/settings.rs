//! Gameplay tuning
//!
//! Everything a designer would want to tweak between sessions. Fixed geometry
//! (world size, building layout) lives in [`crate::consts`] instead.

use serde::{Deserialize, Serialize};

/// Game balance settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for spawn positions and debris (same seed = same session)
    pub seed: u64,

    // === Zombies ===
    /// Base zombie walking speed (px/s)
    pub zombie_speed: f32,
    /// Extra speed per wave after the first
    pub zombie_speed_per_wave: f32,
    /// Speed cap regardless of wave
    pub zombie_max_speed: f32,
    /// Hit points on wave 1
    pub zombie_health: u32,
    /// One extra hit point every this many waves
    pub zombie_health_wave_step: u32,
    /// Damage per second while a hunting zombie touches the player
    pub zombie_dps: f32,
    /// Seconds to tear off one plank
    pub attack_time_per_plank: f32,
    /// Seconds to climb through an open window
    pub climb_time: f32,

    // === Waves ===
    /// Countdown before the very first wave
    pub first_wave_delay: f32,
    /// Countdown between a cleared wave and the next one
    pub wave_delay: f32,
    /// Seconds between individual spawns within a wave
    pub spawn_interval: f32,

    // === Barricades ===
    /// Seconds of held repair to add one plank
    pub repair_time: f32,
    /// Max distance from window centre for repairing
    pub repair_range: f32,
    /// Progress decay speed relative to fill speed
    pub repair_decay_multiplier: f32,
    /// Seconds for the plank pop-in animation
    pub plank_pop_in_time: f32,

    // === Economy ===
    pub money_per_hit: u32,
    pub money_per_kill: u32,

    // === Network ===
    /// Host snapshot broadcasts per second
    pub snapshot_hz: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED_0F_DEAD,

            zombie_speed: 60.0,
            zombie_speed_per_wave: 4.0,
            zombie_max_speed: 120.0,
            zombie_health: 3,
            zombie_health_wave_step: 3,
            zombie_dps: 10.0,
            attack_time_per_plank: 1.5,
            climb_time: 1.0,

            first_wave_delay: 5.0,
            wave_delay: 10.0,
            spawn_interval: 1.0,

            repair_time: 2.0,
            repair_range: 60.0,
            repair_decay_multiplier: 2.0,
            plank_pop_in_time: 0.25,

            money_per_hit: 10,
            money_per_kill: 50,

            snapshot_hz: 20.0,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Settings = serde_json::from_str(json)?;
        log::info!("Loaded settings (seed {})", settings.seed);
        Ok(settings)
    }

    /// Serialize settings to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Zombie speed for a given wave (1-based)
    pub fn zombie_speed_for_wave(&self, wave: u32) -> f32 {
        let extra = wave.saturating_sub(1) as f32 * self.zombie_speed_per_wave;
        (self.zombie_speed + extra).min(self.zombie_max_speed)
    }

    /// Zombie hit points for a given wave (1-based)
    pub fn zombie_health_for_wave(&self, wave: u32) -> u32 {
        let step = self.zombie_health_wave_step.max(1);
        self.zombie_health.max(1) + wave.saturating_sub(1) / step
    }

    /// Seconds between host snapshots
    pub fn snapshot_interval(&self) -> f32 {
        1.0 / self.snapshot_hz.max(1.0)
    }
}
