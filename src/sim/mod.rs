//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (zombies by spawn order, windows by index)
//! - No rendering, audio, or transport dependencies

pub mod barricade;
pub mod building;
pub mod geometry;
pub mod pathing;
pub mod state;
pub mod tick;
pub mod upgrades;
pub mod waves;
pub mod zombie;

pub use barricade::{repairable_window, update_repairs};
pub use building::{Building, GameWindow, Side};
pub use geometry::{Rect, point_in_rect, resolve_circle_rect, segment_intersects_aabb};
pub use pathing::{compute_path_to_window, has_clear_line};
pub use state::{
    Bullet, GameEvent, GameState, Hud, Particle, ParticleKind, Player, PlayerStats, RemotePeer,
    Role, Zombie, ZombieState, ZombieView,
};
pub use tick::{TickInput, tick};
pub use upgrades::{UPGRADES, UpgradeKind, buy_upgrade, get_upgrade_cost};
pub use waves::{WaveSpawner, spawn_zombie, update_waves, zombies_for_wave};
pub use zombie::{damage_zombie, update_zombies};
