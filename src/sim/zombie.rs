//! Zombie behaviour: walk to a window, break the boards, climb in, hunt
//!
//! ```text
//! ToWindow ──planks>0──▶ Attacking ──planks==0──▶ ToWindow
//!     │                                              │
//!     └──────────────planks==0──────▶ Climbing ◀─────┘
//!                                        │
//!                                        ▼
//!                                     Hunting (until dead)
//! ```

use glam::Vec2;

use super::geometry::{circles_overlap, resolve_circle_rect};
use super::state::{GameEvent, GameState, ZombieState};
use crate::angle_between;
use crate::consts::*;

/// Run one step of AI for every zombie (host/solo only)
pub fn update_zombies(state: &mut GameState, dt: f32) {
    let player_pos = state.player.pos;
    let remote_pos = state.remote.map(|r| r.pos);
    let attack_time = state.settings.attack_time_per_plank;
    let climb_time = state.settings.climb_time;
    let mut broken = Vec::new();

    for zombie in state.zombies.iter_mut() {
        let window = &mut state.building.windows[zombie.target_window];

        match zombie.state {
            ZombieState::ToWindow => {
                if let Some(&target) = zombie.waypoints.front() {
                    step_toward(&mut zombie.pos, &mut zombie.angle, target, zombie.speed * dt);
                    if zombie.pos.distance(target) < WAYPOINT_TOLERANCE {
                        zombie.waypoints.pop_front();
                    }
                } else if window.is_open() {
                    zombie.state = ZombieState::Climbing;
                    zombie.timer = climb_time;
                } else {
                    zombie.state = ZombieState::Attacking;
                    zombie.timer = attack_time;
                }
            }

            ZombieState::Attacking => {
                zombie.angle = angle_between(zombie.pos, window.center());
                if window.is_open() {
                    // Someone else finished the job
                    zombie.state = ZombieState::ToWindow;
                } else {
                    zombie.timer -= dt;
                    if zombie.timer <= 0.0 {
                        if window.remove_plank() {
                            broken.push(zombie.target_window);
                        }
                        if window.is_open() {
                            zombie.state = ZombieState::ToWindow;
                        } else {
                            zombie.timer = attack_time;
                        }
                    }
                }
            }

            ZombieState::Climbing => {
                zombie.timer -= dt;
                if zombie.timer <= 0.0 {
                    zombie.pos = window.inside_point();
                    zombie.state = ZombieState::Hunting;
                    log::debug!("Zombie {} climbed in", zombie.id);
                }
            }

            ZombieState::Hunting => {
                let target = nearest_target(zombie.pos, player_pos, remote_pos);
                step_toward(&mut zombie.pos, &mut zombie.angle, target, zombie.speed * dt);
            }
        }

        // Zombies walk through window gaps, so only wall pieces block them
        if zombie.state != ZombieState::Hunting {
            for wall in state.building.walls() {
                resolve_circle_rect(&mut zombie.pos, ZOMBIE_RADIUS, wall);
            }
        }
    }

    for window in broken {
        state.events.push(GameEvent::PlankBroken { window });
        state.spawn_debris(window);
    }

    separate_zombies(state);
}

/// Hunting zombies touching the local player drain health (host/solo)
pub fn apply_contact_damage(state: &mut GameState, dt: f32) {
    let touching = state.zombies.iter().any(|z| {
        z.state == ZombieState::Hunting
            && circles_overlap(z.pos, ZOMBIE_RADIUS, state.player.pos, PLAYER_RADIUS)
    });
    if touching {
        state.player.take_damage(state.settings.zombie_dps * dt);
    }
}

/// Joiner-side contact check against the host's latest snapshot
pub fn apply_remote_contact_damage(state: &mut GameState, dt: f32) {
    let touching = state.remote_zombies.iter().any(|z| {
        z.state == ZombieState::Hunting
            && circles_overlap(z.pos(), ZOMBIE_RADIUS, state.player.pos, PLAYER_RADIUS)
    });
    if touching {
        state.player.take_damage(state.settings.zombie_dps * dt);
    }
}

/// Push overlapping zombies apart, each taking half the overlap
pub fn separate_zombies(state: &mut GameState) {
    let min_dist = ZOMBIE_RADIUS * 2.0;
    let zombies = &mut state.zombies;

    for i in 0..zombies.len() {
        for j in (i + 1)..zombies.len() {
            let delta = zombies[j].pos - zombies[i].pos;
            let dist = delta.length();
            if dist >= min_dist {
                continue;
            }
            // Coincident centres split along +x
            let normal = if dist > f32::EPSILON {
                delta / dist
            } else {
                Vec2::X
            };
            let push = normal * ((min_dist - dist) / 2.0);
            zombies[i].pos -= push;
            zombies[j].pos += push;
        }
    }
}

/// Authoritative damage to a zombie by ID. Removes it at 0 health.
///
/// Returns `None` if no such zombie exists, otherwise whether it died.
pub fn damage_zombie(state: &mut GameState, id: u32, damage: u32) -> Option<bool> {
    let idx = state.zombies.iter().position(|z| z.id == id)?;
    let killed = state.zombies[idx].damage(damage);
    if killed {
        state.zombies.remove(idx);
        state.events.push(GameEvent::ZombieKilled { id });
        log::debug!("Zombie {} killed", id);
    }
    Some(killed)
}

fn nearest_target(from: Vec2, player: Vec2, remote: Option<Vec2>) -> Vec2 {
    match remote {
        Some(r) if from.distance_squared(r) < from.distance_squared(player) => r,
        _ => player,
    }
}

/// Move up to `max_step` toward `target` without overshooting
fn step_toward(pos: &mut Vec2, angle: &mut f32, target: Vec2, max_step: f32) {
    let delta = target - *pos;
    let dist = delta.length();
    if dist <= f32::EPSILON {
        return;
    }
    *angle = delta.y.atan2(delta.x);
    *pos += delta / dist * dist.min(max_step);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use crate::settings::Settings;
    use crate::sim::state::{RemotePeer, Role, Zombie};
    use crate::sim::waves::spawn_zombie_targeting;

    const DT: f32 = SIM_DT;
    const LEFT: usize = 2;

    fn solo() -> GameState {
        GameState::new(Settings::default(), Role::Solo)
    }

    /// A zombie standing at the approach point of `window`
    fn at_window(state: &mut GameState, window: usize) -> u32 {
        let id = state.next_zombie_id();
        let pos = state.building.windows[window].approach_point();
        state
            .zombies
            .push(Zombie::new(id, pos, window, VecDeque::new(), 3, 60.0));
        id
    }

    fn run(state: &mut GameState, seconds: f32) {
        let steps = (seconds / DT).round() as u32;
        for _ in 0..steps {
            update_zombies(state, DT);
        }
    }

    #[test]
    fn test_boarded_window_leads_to_attacking() {
        let mut state = solo();
        at_window(&mut state, LEFT);
        update_zombies(&mut state, DT);
        assert_eq!(state.zombies[0].state, ZombieState::Attacking);
    }

    #[test]
    fn test_open_window_leads_to_climbing() {
        let mut state = solo();
        state.building.windows[LEFT].set_planks(0);
        at_window(&mut state, LEFT);
        update_zombies(&mut state, DT);
        assert_eq!(state.zombies[0].state, ZombieState::Climbing);
    }

    #[test]
    fn test_attacking_removes_one_plank_per_interval() {
        let mut state = solo();
        at_window(&mut state, LEFT);
        update_zombies(&mut state, DT); // -> Attacking

        let plank_time = state.settings.attack_time_per_plank + DT;
        run(&mut state, plank_time);
        assert_eq!(state.building.windows[LEFT].planks(), 2);
        assert_eq!(state.zombies[0].state, ZombieState::Attacking);
        assert!(state.events.contains(&GameEvent::PlankBroken { window: LEFT }));
        assert!(!state.particles.is_empty());
    }

    #[test]
    fn test_attacking_returns_to_window_then_climbs() {
        let mut state = solo();
        state.building.windows[LEFT].set_planks(1);
        at_window(&mut state, LEFT);
        update_zombies(&mut state, DT); // -> Attacking

        let plank_time = state.settings.attack_time_per_plank + DT;
        run(&mut state, plank_time);
        assert_eq!(state.building.windows[LEFT].planks(), 0);
        assert_eq!(state.zombies[0].state, ZombieState::ToWindow);

        update_zombies(&mut state, DT);
        assert_eq!(state.zombies[0].state, ZombieState::Climbing);
    }

    #[test]
    fn test_attacking_gives_up_when_window_already_open() {
        let mut state = solo();
        at_window(&mut state, LEFT);
        update_zombies(&mut state, DT); // -> Attacking
        state.building.windows[LEFT].set_planks(0);

        update_zombies(&mut state, DT);
        assert_eq!(state.zombies[0].state, ZombieState::ToWindow);
        assert_eq!(state.building.windows[LEFT].planks(), 0);
    }

    #[test]
    fn test_climb_takes_climb_time_then_hunts_inside() {
        let mut state = solo();
        state.building.windows[LEFT].set_planks(0);
        at_window(&mut state, LEFT);
        update_zombies(&mut state, DT); // -> Climbing
        let start = state.zombies[0].pos;

        let almost = state.settings.climb_time - 0.1;
        run(&mut state, almost);
        assert_eq!(state.zombies[0].state, ZombieState::Climbing);
        assert_eq!(state.zombies[0].pos, start, "no movement while climbing");

        run(&mut state, 0.1 + DT);
        assert_eq!(state.zombies[0].state, ZombieState::Hunting);
        assert!(crate::sim::geometry::point_in_rect(
            state.zombies[0].pos,
            &state.building.rect
        ));
    }

    #[test]
    fn test_hunting_is_terminal() {
        let mut state = solo();
        let id = at_window(&mut state, LEFT);
        state.zombies[0].state = ZombieState::Hunting;
        run(&mut state, 5.0);
        let zombie = state.zombies.iter().find(|z| z.id == id).unwrap();
        assert_eq!(zombie.state, ZombieState::Hunting);
    }

    #[test]
    fn test_hunting_chases_nearest_player() {
        let mut state = solo();
        at_window(&mut state, LEFT);
        state.zombies[0].state = ZombieState::Hunting;
        state.zombies[0].pos = Vec2::new(1400.0, 1100.0);
        state.player.pos = Vec2::new(1800.0, 1300.0);
        state.remote = Some(RemotePeer {
            pos: Vec2::new(1400.0, 1200.0),
            angle: 0.0,
            weapon: 0,
        });

        run(&mut state, 0.5);
        let z = state.zombies[0].pos;
        assert!((z.x - 1400.0).abs() < 0.01);
        assert!(z.y > 1100.0);
    }

    #[test]
    fn test_separation_splits_overlap_evenly() {
        let mut state = solo();
        let a = state.next_zombie_id();
        let b = state.next_zombie_id();
        state
            .zombies
            .push(Zombie::new(a, Vec2::new(100.0, 100.0), 0, VecDeque::new(), 3, 0.0));
        state
            .zombies
            .push(Zombie::new(b, Vec2::new(110.0, 100.0), 0, VecDeque::new(), 3, 0.0));

        separate_zombies(&mut state);
        let (pa, pb) = (state.zombies[0].pos, state.zombies[1].pos);
        assert!((pa.x - 91.0).abs() < 0.001);
        assert!((pb.x - 119.0).abs() < 0.001);
        assert!((pa.distance(pb) - ZOMBIE_RADIUS * 2.0).abs() < 0.001);
    }

    #[test]
    fn test_separation_coincident() {
        let mut state = solo();
        for _ in 0..2 {
            let id = state.next_zombie_id();
            state
                .zombies
                .push(Zombie::new(id, Vec2::new(50.0, 50.0), 0, VecDeque::new(), 3, 0.0));
        }
        separate_zombies(&mut state);
        assert!(state.zombies[0].pos.x < state.zombies[1].pos.x);
    }

    #[test]
    fn test_damage_zombie_removes_on_death() {
        let mut state = solo();
        let id = at_window(&mut state, LEFT);
        assert_eq!(damage_zombie(&mut state, id, 1), Some(false));
        assert_eq!(damage_zombie(&mut state, id, 5), Some(true));
        assert!(state.zombies.is_empty());
        assert_eq!(damage_zombie(&mut state, id, 1), None);
    }

    #[test]
    fn test_state_transitions_follow_graph() {
        use ZombieState::*;
        let allowed = |from: ZombieState, to: ZombieState| {
            from == to
                || matches!(
                    (from, to),
                    (ToWindow, Attacking) | (ToWindow, Climbing) | (Attacking, ToWindow) | (Climbing, Hunting)
                )
        };

        let mut state = solo();
        state.settings.attack_time_per_plank = 0.2;
        state.settings.climb_time = 0.2;
        for (i, x) in [0.0, 200.0, 400.0].into_iter().enumerate() {
            spawn_zombie_targeting(&mut state, Vec2::new(x, 1200.0 + i as f32 * 40.0), LEFT);
        }

        let mut last: Vec<ZombieState> = state.zombies.iter().map(|z| z.state).collect();
        for _ in 0..(60.0 / DT) as u32 {
            update_zombies(&mut state, DT);
            for (z, prev) in state.zombies.iter().zip(last.iter()) {
                assert!(allowed(*prev, z.state), "{:?} -> {:?}", prev, z.state);
            }
            last = state.zombies.iter().map(|z| z.state).collect();
        }
        assert!(state.zombies.iter().all(|z| z.state == Hunting));
    }

    #[test]
    fn test_end_to_end_unboarded_left_window() {
        let mut state = solo();
        state.building.windows[LEFT].set_planks(0);
        let approach = state.building.windows[LEFT].approach_point();
        spawn_zombie_targeting(&mut state, Vec2::new(0.0, 1200.0), LEFT);
        assert_eq!(state.zombies[0].waypoints.len(), 1);

        // Walk until the zombie reaches the approach point and starts climbing
        let mut steps = 0;
        while state.zombies[0].state == ZombieState::ToWindow {
            update_zombies(&mut state, DT);
            steps += 1;
            assert!(steps < 60 * 60, "zombie never reached the window");
        }
        assert_eq!(state.zombies[0].state, ZombieState::Climbing);
        assert!(state.zombies[0].pos.distance(approach) < WAYPOINT_TOLERANCE);
        assert!(state.zombies[0].waypoints.is_empty());

        // Climb for the climb duration (within one step of float slack)
        let climb_steps = (state.settings.climb_time / DT).round() as u32;
        for _ in 0..climb_steps - 1 {
            update_zombies(&mut state, DT);
        }
        assert_eq!(state.zombies[0].state, ZombieState::Climbing);
        update_zombies(&mut state, DT);
        update_zombies(&mut state, DT);
        assert_eq!(state.zombies[0].state, ZombieState::Hunting);

        // Player out of reach: no damage
        let zpos = state.zombies[0].pos;
        state.player.pos = zpos + Vec2::new(ZOMBIE_RADIUS + PLAYER_RADIUS + 5.0, 0.0);
        state.zombies[0].speed = 0.0;
        apply_contact_damage(&mut state, DT);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);

        // Chases the player
        state.zombies[0].speed = 60.0;
        update_zombies(&mut state, 0.2);
        assert!(state.zombies[0].pos.x > zpos.x);

        // In contact: exactly dps * dt
        state.player.pos = state.zombies[0].pos + Vec2::new(ZOMBIE_RADIUS + PLAYER_RADIUS - 1.0, 0.0);
        apply_contact_damage(&mut state, 0.5);
        let expected = PLAYER_MAX_HEALTH - state.settings.zombie_dps * 0.5;
        assert!((state.player.health - expected).abs() < 0.001);

        // Exactly touching (distance == sum of radii) is not contact
        let before = state.player.health;
        state.player.pos = state.zombies[0].pos + Vec2::new(ZOMBIE_RADIUS + PLAYER_RADIUS, 0.0);
        apply_contact_damage(&mut state, 0.5);
        assert_eq!(state.player.health, before);
    }

    #[test]
    fn test_non_hunting_zombies_deal_no_damage() {
        let mut state = solo();
        at_window(&mut state, LEFT);
        state.player.pos = state.zombies[0].pos;
        apply_contact_damage(&mut state, 1.0);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
    }
}
