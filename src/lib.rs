//! Holdout - zombie survival around a boarded-up building
//!
//! Core modules:
//! - `sim`: Simulation (player, zombies, barricades, waves, collisions)
//! - `net`: Best-effort two-player sync (host simulates, joiner mirrors)
//! - `game`: Fixed-step frame loop and camera
//! - `settings`: Data-driven game balance

pub mod game;
pub mod net;
pub mod settings;
pub mod sim;

pub use game::{Camera, Game};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame gap fed into the accumulator (tab switches, debugger stalls)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// World dimensions (larger than the viewport, camera scrolls)
    pub const WORLD_W: f32 = 3200.0;
    pub const WORLD_H: f32 = 2400.0;

    /// Building footprint, centred in the world
    pub const BUILDING_W: f32 = 600.0;
    pub const BUILDING_H: f32 = 400.0;
    pub const WALL_THICKNESS: f32 = 24.0;
    /// Window gap size along the wall face
    pub const WINDOW_GAP: f32 = 55.0;
    /// Planks on a fully boarded window
    pub const MAX_PLANKS: u8 = 3;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 200.0;
    pub const PLAYER_RADIUS: f32 = 14.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;

    /// Pistol defaults
    pub const BULLET_SPEED: f32 = 700.0;
    /// Seconds before a bullet expires
    pub const BULLET_LIFE: f32 = 1.2;
    pub const MAG_SIZE: u32 = 8;
    pub const RELOAD_TIME: f32 = 1.5;
    /// 4 shots per second max
    pub const FIRE_COOLDOWN: f32 = 0.25;
    /// Gun barrel tip in player-local space
    pub const GUN_TIP_X: f32 = 18.0;
    pub const GUN_TIP_Y: f32 = 9.5;
    /// Weapon hotbar slots (only slot 0, the pistol, fires)
    pub const WEAPON_SLOTS: u8 = 3;

    /// Zombie defaults
    pub const ZOMBIE_RADIUS: f32 = 14.0;
    /// Distance at which a waypoint counts as reached
    pub const WAYPOINT_TOLERANCE: f32 = 8.0;
    /// How far outside (or inside) the wall face a zombie stands at a window
    pub const APPROACH_OFFSET: f32 = 30.0;
    /// Clearance around the building used by the detour pathfinder
    pub const PATH_PADDING: f32 = 20.0;
}

/// Initialise the `log` backend for the current platform.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init();
    }
}

/// Unit vector for an angle (radians)
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of the vector from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Rotate a local-space offset by `angle` and translate it to `origin`
#[inline]
pub fn local_to_world(origin: Vec2, angle: f32, local: Vec2) -> Vec2 {
    origin + Vec2::from_angle(angle).rotate(local)
}
