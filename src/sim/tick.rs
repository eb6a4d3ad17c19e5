//! Fixed timestep simulation tick
//!
//! Core game loop step: player, bullets, zombies, waves, barricades, effects.

use glam::Vec2;

use super::barricade::update_repairs;
use super::building::Building;
use super::geometry::{point_in_rect, resolve_circle_rect};
use super::state::{Bullet, GameEvent, GameState};
use super::waves::update_waves;
use super::zombie::{apply_contact_damage, apply_remote_contact_damage, damage_zombie, update_zombies};
use crate::angle_between;
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Pointer position in world space (the frame loop converts from screen)
    pub pointer_world: Vec2,
    /// Fire the current weapon (one-shot)
    pub fire: bool,
    /// Reload key (one-shot)
    pub reload: bool,
    /// Repair key (held)
    pub repair: bool,
    /// Hotbar selection (one-shot)
    pub weapon_slot: Option<u8>,
}

impl TickInput {
    /// Movement direction from the held keys, diagonals normalised
    pub fn move_dir(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir.normalize_or_zero()
    }
}

/// Advance the game state by one fixed timestep.
///
/// Events are appended to `state.events`; the frame loop clears them before
/// each step so that events raised by network messages survive the tick.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    update_player(state, input, dt);
    update_local_bullets(state, dt);
    update_remote_bullets(state, dt);

    if state.role.simulates_zombies() {
        update_waves(state, dt);
        update_zombies(state, dt);
        apply_contact_damage(state, dt);
    } else {
        apply_remote_contact_damage(state, dt);
    }

    update_repairs(state, input.repair, dt);
    state.update_particles(dt);
}

fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let player = &mut state.player;
    player.update_timers(dt);

    if player.is_down() {
        return;
    }

    if let Some(slot) = input.weapon_slot {
        if slot < WEAPON_SLOTS {
            player.weapon = slot;
        }
    }
    if input.reload {
        player.start_reload();
    }

    // Move, then keep inside the world and out of walls. Windows block the
    // player regardless of plank count.
    player.pos += input.move_dir() * player.stats.speed * dt;
    player.pos = player.pos.clamp(
        Vec2::splat(PLAYER_RADIUS),
        Vec2::new(WORLD_W - PLAYER_RADIUS, WORLD_H - PLAYER_RADIUS),
    );
    for wall in state.building.walls() {
        resolve_circle_rect(&mut player.pos, PLAYER_RADIUS, wall);
    }
    for window in &state.building.windows {
        resolve_circle_rect(&mut player.pos, PLAYER_RADIUS, &window.rect);
    }

    if input.pointer_world != player.pos {
        player.angle = angle_between(player.pos, input.pointer_world);
    }

    if input.fire {
        if let Some(bullet) = player.try_fire() {
            state.events.push(GameEvent::BulletFired {
                pos: bullet.pos,
                vel: bullet.vel,
            });
            state.bullets.push(bullet);
        }
    }
}

fn hits_wall(building: &Building, pos: Vec2) -> bool {
    building.walls().iter().any(|w| point_in_rect(pos, w))
}

/// ID of the first zombie (authoritative or mirrored) under `pos`
fn zombie_at(state: &GameState, pos: Vec2) -> Option<u32> {
    let hit = |zpos: Vec2| zpos.distance_squared(pos) < ZOMBIE_RADIUS * ZOMBIE_RADIUS;
    if state.role.simulates_zombies() {
        state.zombies.iter().find(|z| hit(z.pos)).map(|z| z.id)
    } else {
        state.remote_zombies.iter().find(|z| hit(z.pos())).map(|z| z.id)
    }
}

fn update_local_bullets(state: &mut GameState, dt: f32) {
    let mut bullets = std::mem::take(&mut state.bullets);
    bullets.retain_mut(|b| {
        if !b.advance(dt) || hits_wall(&state.building, b.pos) {
            return false;
        }
        match zombie_at(state, b.pos) {
            Some(id) => {
                on_bullet_hit(state, id, b);
                false
            }
            None => true,
        }
    });
    state.bullets = bullets;
}

fn on_bullet_hit(state: &mut GameState, id: u32, bullet: &Bullet) {
    state.player.money += state.settings.money_per_hit;
    state.spawn_sparks(bullet.pos, bullet.vel);

    if state.role.simulates_zombies() {
        if damage_zombie(state, id, bullet.damage) == Some(true) {
            state.player.money += state.settings.money_per_kill;
        }
    } else {
        state.events.push(GameEvent::ZombieHit {
            id,
            damage: bullet.damage,
        });
    }
}

/// The peer's bullets are visual only; the peer reports its own hits
fn update_remote_bullets(state: &mut GameState, dt: f32) {
    let mut bullets = std::mem::take(&mut state.remote_bullets);
    bullets.retain_mut(|b| {
        b.advance(dt) && !hits_wall(&state.building, b.pos) && zombie_at(state, b.pos).is_none()
    });
    state.remote_bullets = bullets;
}
