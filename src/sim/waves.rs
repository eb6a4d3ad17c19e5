//! Wave countdown and trickle spawning
//!
//! Waves only start once the previous one is fully dead. Each wave queues a
//! batch of zombies that enter one at a time from the world edge.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::pathing::{compute_path_to_window, has_clear_line, path_length};
use super::state::{GameEvent, GameState, Zombie};
use crate::consts::{WORLD_H, WORLD_W};
use crate::settings::Settings;

/// Zombies queued for a wave (1-based): 6, 8, 10, ...
pub fn zombies_for_wave(wave: u32) -> u32 {
    4 + 2 * wave
}

/// Wave counters (host/solo authoritative, mirrored on joiners)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveSpawner {
    /// Current wave number (0 before the first wave)
    pub wave: u32,
    /// Seconds until the next wave starts
    pub countdown: f32,
    /// Zombies still queued for this wave
    pub to_spawn: u32,
    /// Seconds until the next queued zombie enters
    pub spawn_timer: f32,
}

impl WaveSpawner {
    pub fn new(settings: &Settings) -> Self {
        Self {
            wave: 0,
            countdown: settings.first_wave_delay,
            to_spawn: 0,
            spawn_timer: 0.0,
        }
    }
}

/// Advance the wave countdown and spawn queued zombies
pub fn update_waves(state: &mut GameState, dt: f32) {
    if state.zombies.is_empty() && state.waves.to_spawn == 0 {
        state.waves.countdown -= dt;
        if state.waves.countdown <= 0.0 {
            start_next_wave(state);
        }
        return;
    }

    if state.waves.to_spawn > 0 {
        state.waves.spawn_timer -= dt;
        if state.waves.spawn_timer <= 0.0 {
            let pos = random_edge_point(state);
            spawn_zombie(state, pos);
            state.waves.to_spawn -= 1;
            state.waves.spawn_timer = state.settings.spawn_interval;
        }
    }
}

fn start_next_wave(state: &mut GameState) {
    let waves = &mut state.waves;
    waves.wave += 1;
    waves.to_spawn = zombies_for_wave(waves.wave);
    waves.countdown = state.settings.wave_delay;
    waves.spawn_timer = 0.0;

    log::info!("Wave {} started: {} zombies", waves.wave, waves.to_spawn);
    let wave = waves.wave;
    state.events.push(GameEvent::WaveStarted { wave });
}

/// Uniform point on the world boundary
fn random_edge_point(state: &mut GameState) -> Vec2 {
    let rng = &mut state.rng;
    match rng.random_range(0..4) {
        0 => Vec2::new(rng.random_range(0.0..WORLD_W), 0.0),
        1 => Vec2::new(rng.random_range(0.0..WORLD_W), WORLD_H),
        2 => Vec2::new(0.0, rng.random_range(0.0..WORLD_H)),
        _ => Vec2::new(WORLD_W, rng.random_range(0.0..WORLD_H)),
    }
}

/// Nearest window with a clear line from `pos`, else the nearest window
pub fn choose_target_window(state: &GameState, pos: Vec2) -> usize {
    let building = &state.building;
    let by_distance = |a: &(usize, f32), b: &(usize, f32)| a.1.total_cmp(&b.1);

    let distances: Vec<(usize, f32)> = building
        .windows
        .iter()
        .enumerate()
        .map(|(i, w)| (i, pos.distance(w.approach_point())))
        .collect();

    distances
        .iter()
        .filter(|(i, _)| has_clear_line(pos, building, &building.windows[*i]))
        .min_by(|a, b| by_distance(a, b))
        .or_else(|| distances.iter().min_by(|a, b| by_distance(a, b)))
        .map(|(i, _)| *i)
        .unwrap_or(0)
}

/// Spawn a zombie at `pos`, routed to the best window. Returns its ID.
pub fn spawn_zombie(state: &mut GameState, pos: Vec2) -> u32 {
    let window = choose_target_window(state, pos);
    spawn_zombie_targeting(state, pos, window)
}

/// Spawn a zombie at `pos` heading for a specific window. Returns its ID.
pub fn spawn_zombie_targeting(state: &mut GameState, pos: Vec2, window: usize) -> u32 {
    let id = state.next_zombie_id();
    let path = compute_path_to_window(pos, &state.building, &state.building.windows[window]);
    let wave = state.waves.wave.max(1);
    let health = state.settings.zombie_health_for_wave(wave);
    let speed = state.settings.zombie_speed_for_wave(wave);

    log::debug!(
        "Zombie {} spawned at ({:.0}, {:.0}) -> window {} via {} waypoints ({:.0}px)",
        id,
        pos.x,
        pos.y,
        window,
        path.len(),
        path_length(pos, &path)
    );
    state
        .zombies
        .push(Zombie::new(id, pos, window, path, health, speed));
    id
}
