//! Peer-to-peer wire messages
//!
//! JSON objects discriminated by a `type` field. Every incoming message is
//! validated before it reaches the simulation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAX_PLANKS, WEAPON_SLOTS};
use crate::sim::ZombieView;

/// Why an incoming message was rejected
#[derive(Debug, Error)]
pub enum NetError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("non-finite value in `{0}`")]
    NonFinite(&'static str),
    #[error("window index {index} out of range (building has {count})")]
    WindowOutOfRange { index: usize, count: usize },
    #[error("expected {expected} plank counts, got {got}")]
    PlankCount { expected: usize, got: usize },
    #[error("plank count {0} above maximum")]
    PlankValue(u8),
    #[error("zombie hit with zero damage")]
    ZeroDamage,
    #[error("unknown weapon slot {0}")]
    UnknownWeapon(u8),
}

/// Everything the two peers say to each other
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NetMessage {
    /// Sender's player pose, every step
    Move { x: f32, y: f32, angle: f32, weapon: u8 },
    /// Sender fired a bullet
    Shoot { x: f32, y: f32, vx: f32, vy: f32 },
    /// Host snapshot of all zombies, wave counters and barricades
    Zombies {
        zombies: Vec<ZombieView>,
        wave: u32,
        wave_timer: f32,
        planks: Vec<u8>,
    },
    /// Joiner's bullet hit a zombie
    ZombieHit { id: u32, damage: u32 },
    /// Joiner finished repairing a window
    AddPlank { index: usize },
}

fn finite(name: &'static str, values: &[f32]) -> Result<(), NetError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(NetError::NonFinite(name))
    }
}

impl NetMessage {
    /// Parse and validate a message against a building with `window_count` windows
    pub fn decode(text: &str, window_count: usize) -> Result<Self, NetError> {
        let msg: NetMessage = serde_json::from_str(text)?;
        msg.validate(window_count)?;
        Ok(msg)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn validate(&self, window_count: usize) -> Result<(), NetError> {
        match self {
            NetMessage::Move {
                x,
                y,
                angle,
                weapon,
            } => {
                finite("move", &[*x, *y, *angle])?;
                if *weapon >= WEAPON_SLOTS {
                    return Err(NetError::UnknownWeapon(*weapon));
                }
            }
            NetMessage::Shoot { x, y, vx, vy } => finite("shoot", &[*x, *y, *vx, *vy])?,
            NetMessage::Zombies {
                zombies,
                wave_timer,
                planks,
                ..
            } => {
                finite("waveTimer", &[*wave_timer])?;
                for z in zombies {
                    finite("zombies", &[z.x, z.y, z.angle])?;
                }
                if planks.len() != window_count {
                    return Err(NetError::PlankCount {
                        expected: window_count,
                        got: planks.len(),
                    });
                }
                if let Some(&p) = planks.iter().find(|&&p| p > MAX_PLANKS) {
                    return Err(NetError::PlankValue(p));
                }
            }
            NetMessage::ZombieHit { damage, .. } => {
                if *damage == 0 {
                    return Err(NetError::ZeroDamage);
                }
            }
            NetMessage::AddPlank { index } => {
                if *index >= window_count {
                    return Err(NetError::WindowOutOfRange {
                        index: *index,
                        count: window_count,
                    });
                }
            }
        }
        Ok(())
    }
}
