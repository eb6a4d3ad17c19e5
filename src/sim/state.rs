//! Game state and core simulation types
//!
//! One `GameState` per session holds everything the frame loop mutates.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::building::Building;
use super::upgrades::UpgradeLevels;
use super::waves::WaveSpawner;
use crate::consts::*;
use crate::settings::Settings;
use crate::{direction, local_to_world};

/// Who holds zombie authority in this session, fixed at session start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Single player, no network
    Solo,
    /// Simulates zombies and waves, broadcasts snapshots
    Host,
    /// Mirrors the host's zombies, reports hits and repairs
    Joiner,
}

impl Role {
    /// Whether this side runs zombie AI, waves, and authoritative damage
    pub fn simulates_zombies(&self) -> bool {
        !matches!(self, Role::Joiner)
    }
}

/// Upgradeable player attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub speed: f32,
    pub max_health: f32,
    pub mag_size: u32,
    pub fire_cooldown: f32,
    pub bullet_damage: u32,
    /// Multiplier on the configured repair time (lower = faster)
    pub repair_time_scale: f32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            speed: PLAYER_SPEED,
            max_health: PLAYER_MAX_HEALTH,
            mag_size: MAG_SIZE,
            fire_cooldown: FIRE_COOLDOWN,
            bullet_damage: 1,
            repair_time_scale: 1.0,
        }
    }
}

/// The local player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub angle: f32,
    pub health: f32,
    pub stats: PlayerStats,
    /// Rounds left in the magazine
    pub ammo: u32,
    pub reloading: bool,
    pub reload_timer: f32,
    /// Counts down to 0 before the next shot
    pub fire_cooldown: f32,
    /// Hotbar slot (0 = pistol)
    pub weapon: u8,
    pub money: u32,
}

impl Default for Player {
    fn default() -> Self {
        let stats = PlayerStats::default();
        Self {
            // Inside the building, slightly south of centre
            pos: Vec2::new(WORLD_W / 2.0, WORLD_H / 2.0 + 50.0),
            angle: 0.0,
            health: stats.max_health,
            ammo: stats.mag_size,
            stats,
            reloading: false,
            reload_timer: 0.0,
            fire_cooldown: 0.0,
            weapon: 0,
            money: 0,
        }
    }
}

impl Player {
    pub fn is_down(&self) -> bool {
        self.health <= 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.stats.max_health);
    }

    /// Begin reloading unless already reloading or the magazine is full
    pub fn start_reload(&mut self) -> bool {
        if self.reloading || self.ammo >= self.stats.mag_size {
            return false;
        }
        self.reloading = true;
        self.reload_timer = RELOAD_TIME;
        true
    }

    /// Tick fire cooldown and reload timers
    pub fn update_timers(&mut self, dt: f32) {
        if self.fire_cooldown > 0.0 {
            self.fire_cooldown -= dt;
        }
        if self.reloading {
            self.reload_timer -= dt;
            if self.reload_timer <= 0.0 {
                self.ammo = self.stats.mag_size;
                self.reloading = false;
                self.reload_timer = 0.0;
            }
        }
    }

    /// Attempt a pistol shot. An empty magazine starts a reload instead.
    pub fn try_fire(&mut self) -> Option<Bullet> {
        if self.fire_cooldown > 0.0 || self.reloading || self.weapon != 0 {
            return None;
        }
        if self.ammo == 0 {
            self.start_reload();
            return None;
        }

        let tip = local_to_world(self.pos, self.angle, Vec2::new(GUN_TIP_X, GUN_TIP_Y));
        let vel = direction(self.angle) * BULLET_SPEED;
        self.ammo -= 1;
        self.fire_cooldown = self.stats.fire_cooldown;

        Some(Bullet::new(tip, vel, self.stats.bullet_damage))
    }
}

/// Last state received from the other player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RemotePeer {
    pub pos: Vec2,
    pub angle: f32,
    pub weapon: u8,
}

/// Zombie AI state (exactly one at a time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZombieState {
    /// Walking the waypoint route to the target window
    ToWindow,
    /// Tearing planks off the target window
    Attacking,
    /// Climbing through an open window
    Climbing,
    /// Inside, chasing the nearest player
    Hunting,
}

/// A zombie (host/solo only; joiners see `ZombieView`s)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zombie {
    pub id: u32,
    pub pos: Vec2,
    pub angle: f32,
    pub health: u32,
    pub speed: f32,
    pub state: ZombieState,
    /// Index into `Building::windows`
    pub target_window: usize,
    /// Remaining route, consumed front to back
    pub waypoints: VecDeque<Vec2>,
    /// Attack or climb countdown (seconds)
    pub timer: f32,
}

impl Zombie {
    pub fn new(
        id: u32,
        pos: Vec2,
        target_window: usize,
        waypoints: VecDeque<Vec2>,
        health: u32,
        speed: f32,
    ) -> Self {
        Self {
            id,
            pos,
            angle: 0.0,
            health,
            speed,
            state: ZombieState::ToWindow,
            target_window,
            waypoints,
            timer: 0.0,
        }
    }

    /// Apply damage; returns true when this kills the zombie
    pub fn damage(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }

    pub fn view(&self) -> ZombieView {
        ZombieView {
            id: self.id,
            x: self.pos.x,
            y: self.pos.y,
            state: self.state,
            angle: self.angle,
        }
    }
}

/// Render/sync view of a zombie: what the host broadcasts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZombieView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub state: ZombieState,
    pub angle: f32,
}

impl ZombieView {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// A bullet in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left before expiry
    pub life: f32,
    pub damage: u32,
}

impl Bullet {
    pub fn new(pos: Vec2, vel: Vec2, damage: u32) -> Self {
        Self {
            pos,
            vel,
            life: BULLET_LIFE,
            damage,
        }
    }

    /// Move and age the bullet; false once it has expired or left the world
    pub fn advance(&mut self, dt: f32) -> bool {
        self.pos += self.vel * dt;
        self.life -= dt;
        self.life > 0.0
            && self.pos.x >= 0.0
            && self.pos.x <= WORLD_W
            && self.pos.y >= 0.0
            && self.pos.y <= WORLD_H
    }
}

/// Visual-only particle kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Splintered plank
    Debris,
    /// Bullet impact on a zombie
    Spark,
}

/// A particle for visual effects (never affects gameplay)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub spin: f32,
    pub life: f32, // 0-1, decreases over time
    pub size: f32,
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// Things that happened during a tick, for the network layer and renderer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Local player fired (peer should render the bullet)
    BulletFired { pos: Vec2, vel: Vec2 },
    /// Joiner's bullet hit a mirrored zombie (host applies damage)
    ZombieHit { id: u32, damage: u32 },
    /// Joiner finished a repair (host applies the plank)
    PlankRequested { window: usize },
    /// A plank was torn off
    PlankBroken { window: usize },
    /// A plank was added
    PlankAdded { window: usize },
    ZombieKilled { id: u32 },
    WaveStarted { wave: u32 },
}

/// Read-only values for the HUD layer
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub health: f32,
    pub max_health: f32,
    pub ammo: u32,
    pub mag_size: u32,
    pub reloading: bool,
    pub weapon: u8,
    pub money: u32,
    pub wave: u32,
    pub wave_countdown: f32,
    pub zombies_remaining: u32,
    /// Connection status line (networked sessions only)
    pub net_status: Option<String>,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub role: Role,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    /// The other player, while connected and heard from
    pub remote: Option<RemotePeer>,
    pub building: Building,
    /// Authoritative zombies (empty on joiners)
    pub zombies: Vec<Zombie>,
    /// Last snapshot received from the host (joiners only)
    pub remote_zombies: Vec<ZombieView>,
    pub bullets: Vec<Bullet>,
    pub remote_bullets: Vec<Bullet>,
    pub particles: Vec<Particle>,
    pub waves: WaveSpawner,
    pub upgrades: UpgradeLevels,
    /// Events raised since the frame loop last cleared them (one step)
    pub events: Vec<GameEvent>,
    /// Next zombie ID
    next_zombie_id: u32,
}

impl GameState {
    pub fn new(settings: Settings, role: Role) -> Self {
        let rng = Pcg32::seed_from_u64(settings.seed);
        let waves = WaveSpawner::new(&settings);
        Self {
            settings,
            role,
            rng,
            time_ticks: 0,
            player: Player::default(),
            remote: None,
            building: Building::default(),
            zombies: Vec::new(),
            remote_zombies: Vec::new(),
            bullets: Vec::new(),
            remote_bullets: Vec::new(),
            particles: Vec::new(),
            waves,
            upgrades: UpgradeLevels::default(),
            events: Vec::new(),
            next_zombie_id: 1,
        }
    }

    /// Allocate a new zombie ID
    pub fn next_zombie_id(&mut self) -> u32 {
        let id = self.next_zombie_id;
        self.next_zombie_id += 1;
        id
    }

    /// Zombies as the renderer should draw them, regardless of role
    pub fn visible_zombies(&self) -> Vec<ZombieView> {
        if self.role.simulates_zombies() {
            self.zombies.iter().map(Zombie::view).collect()
        } else {
            self.remote_zombies.clone()
        }
    }

    pub fn hud(&self) -> Hud {
        Hud {
            health: self.player.health,
            max_health: self.player.stats.max_health,
            ammo: self.player.ammo,
            mag_size: self.player.stats.mag_size,
            reloading: self.player.reloading,
            weapon: self.player.weapon,
            money: self.player.money,
            wave: self.waves.wave,
            wave_countdown: self.waves.countdown,
            zombies_remaining: self.waves.to_spawn + self.visible_zombies().len() as u32,
            net_status: None,
        }
    }

    /// Add a plank locally and record it
    pub fn apply_add_plank(&mut self, window: usize) -> bool {
        let added = self.building.apply_add_plank(window);
        if added {
            self.events.push(GameEvent::PlankAdded { window });
        }
        added
    }

    /// Splinters flying outward from a window
    pub fn spawn_debris(&mut self, window: usize) {
        let Some(win) = self.building.windows.get(window) else {
            return;
        };
        let origin = win.center();
        let outward = win.side.outward();

        for _ in 0..6 {
            let spread = self.rng.random_range(-1.0..1.0_f32);
            let speed = self.rng.random_range(60.0..160.0_f32);
            let tangent = outward.perp() * spread;
            let particle = Particle {
                kind: ParticleKind::Debris,
                pos: origin,
                vel: (outward + tangent).normalize_or_zero() * speed,
                rotation: self.rng.random_range(0.0..std::f32::consts::TAU),
                spin: self.rng.random_range(-8.0..8.0_f32),
                life: 1.0,
                size: self.rng.random_range(4.0..9.0_f32),
            };
            self.push_particle(particle);
        }
    }

    /// Impact sparks at a bullet hit
    pub fn spawn_sparks(&mut self, pos: Vec2, incoming: Vec2) {
        let back = -incoming.normalize_or_zero();
        for _ in 0..4 {
            let angle = self.rng.random_range(-0.8..0.8_f32);
            let speed = self.rng.random_range(40.0..120.0_f32);
            self.push_particle(Particle {
                kind: ParticleKind::Spark,
                pos,
                vel: Vec2::from_angle(angle).rotate(back) * speed,
                rotation: 0.0,
                spin: 0.0,
                life: 0.5,
                size: 2.5,
            });
        }
    }

    fn push_particle(&mut self, particle: Particle) {
        if self.particles.len() < MAX_PARTICLES {
            self.particles.push(particle);
        }
    }

    /// Age and move particles
    pub fn update_particles(&mut self, dt: f32) {
        for p in self.particles.iter_mut() {
            p.pos += p.vel * dt;
            p.vel *= 0.92;
            p.rotation += p.spin * dt;
            p.life -= dt * 1.2;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}
