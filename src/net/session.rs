//! Role-aware message application and broadcast
//!
//! The host owns zombies and barricades and broadcasts snapshots; the joiner
//! mirrors them and reports its own hits and repairs. Both sides exchange
//! player poses and shots. Delivery is best effort: no sequence numbers, the
//! newest snapshot simply replaces the last one.

use glam::Vec2;

use super::channel::{Channel, ChannelEvent};
use super::message::NetMessage;
use crate::sim::{Bullet, GameEvent, GameState, RemotePeer, Role, damage_zombie};

/// Status line shown while waiting for the transport
pub const STATUS_CONNECTING: &str = "Connecting...";
pub const STATUS_CONNECTED: &str = "Connected.";
pub const STATUS_DISCONNECTED: &str = "Other player disconnected.";

/// One side of a two-player session
pub struct NetSession {
    channel: Box<dyn Channel>,
    open: bool,
    status: String,
    /// Seconds until the next host snapshot
    snapshot_timer: f32,
}

impl NetSession {
    pub fn new(channel: Box<dyn Channel>) -> Self {
        Self {
            channel,
            open: false,
            status: STATUS_CONNECTING.to_string(),
            snapshot_timer: 0.0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Drain the transport and apply everything received
    pub fn poll(&mut self, state: &mut GameState) {
        while let Some(event) = self.channel.poll() {
            match event {
                ChannelEvent::Open => {
                    log::info!("Peer connected ({:?})", state.role);
                    self.open = true;
                    self.status = STATUS_CONNECTED.to_string();
                }
                ChannelEvent::Data(text) => {
                    match NetMessage::decode(&text, state.building.windows.len()) {
                        Ok(msg) => apply_message(state, msg),
                        Err(e) => log::warn!("Dropping peer message: {}", e),
                    }
                }
                ChannelEvent::Close => {
                    log::info!("Peer disconnected");
                    self.open = false;
                    self.status = STATUS_DISCONNECTED.to_string();
                    state.remote = None;
                }
            }
        }
    }

    /// Send this step's outgoing messages
    pub fn flush(&mut self, state: &GameState, dt: f32) {
        if !self.open {
            return;
        }

        let player = &state.player;
        self.send(&NetMessage::Move {
            x: player.pos.x,
            y: player.pos.y,
            angle: player.angle,
            weapon: player.weapon,
        });

        for event in &state.events {
            let msg = match *event {
                GameEvent::BulletFired { pos, vel } => NetMessage::Shoot {
                    x: pos.x,
                    y: pos.y,
                    vx: vel.x,
                    vy: vel.y,
                },
                GameEvent::ZombieHit { id, damage } => NetMessage::ZombieHit { id, damage },
                GameEvent::PlankRequested { window } => NetMessage::AddPlank { index: window },
                _ => continue,
            };
            self.send(&msg);
        }

        if state.role == Role::Host {
            self.snapshot_timer -= dt;
            if self.snapshot_timer <= 0.0 {
                self.snapshot_timer += state.settings.snapshot_interval();
                // Don't let a long stall turn into a burst
                self.snapshot_timer = self.snapshot_timer.max(0.0);
                self.send(&snapshot(state));
            }
        }
    }

    /// Hang up
    pub fn close(&mut self) {
        self.channel.close();
        self.open = false;
    }

    fn send(&mut self, msg: &NetMessage) {
        match msg.encode() {
            Ok(text) => self.channel.send(text),
            Err(e) => log::warn!("Failed to encode {:?}: {}", msg, e),
        }
    }
}

/// The host's authoritative view, as broadcast to the joiner
pub fn snapshot(state: &GameState) -> NetMessage {
    NetMessage::Zombies {
        zombies: state.zombies.iter().map(|z| z.view()).collect(),
        wave: state.waves.wave,
        wave_timer: state.waves.countdown,
        planks: state.building.plank_counts(),
    }
}

/// Apply a validated message according to this side's role
pub fn apply_message(state: &mut GameState, msg: NetMessage) {
    match msg {
        NetMessage::Move {
            x,
            y,
            angle,
            weapon,
        } => {
            state.remote = Some(RemotePeer {
                pos: Vec2::new(x, y),
                angle,
                weapon,
            });
        }
        NetMessage::Shoot { x, y, vx, vy } => {
            state
                .remote_bullets
                .push(Bullet::new(Vec2::new(x, y), Vec2::new(vx, vy), 0));
        }
        NetMessage::Zombies {
            zombies,
            wave,
            wave_timer,
            planks,
        } => {
            if state.role != Role::Joiner {
                log::debug!("Ignoring zombie snapshot as {:?}", state.role);
                return;
            }
            state.remote_zombies = zombies;
            state.waves.wave = wave;
            state.waves.countdown = wave_timer;
            for (window, count) in state.building.windows.iter_mut().zip(planks) {
                window.sync_planks(count);
            }
        }
        NetMessage::ZombieHit { id, damage } => {
            if state.role != Role::Host {
                log::debug!("Ignoring zombie hit as {:?}", state.role);
                return;
            }
            if damage_zombie(state, id, damage).is_none() {
                log::debug!("Hit on unknown zombie {}", id);
            }
        }
        NetMessage::AddPlank { index } => {
            if state.role != Role::Host {
                log::debug!("Ignoring plank request as {:?}", state.role);
                return;
            }
            if state.apply_add_plank(index) {
                log::debug!("Peer repaired window {}", index);
            }
        }
    }
}
