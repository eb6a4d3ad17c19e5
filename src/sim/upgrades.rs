//! Upgrade shop
//!
//! Money earned from shooting zombies buys levelled stat upgrades. A purchase
//! either goes through completely or not at all.

use serde::{Deserialize, Serialize};

use super::state::GameState;

/// Something the player can buy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    MoveSpeed,
    FireRate,
    MagSize,
    MaxHealth,
    BulletDamage,
    RepairSpeed,
    /// Restores health; unlimited purchases, only when hurt
    Medkit,
}

/// Static shop entry
#[derive(Debug, Clone, Copy)]
pub struct UpgradeDef {
    pub kind: UpgradeKind,
    pub name: &'static str,
    pub desc: &'static str,
    pub base_cost: u32,
    /// `None` = unlimited, flat price
    pub max_level: Option<u32>,
}

/// Shop contents, in display order
pub const UPGRADES: [UpgradeDef; 7] = [
    UpgradeDef {
        kind: UpgradeKind::MoveSpeed,
        name: "Move Speed",
        desc: "+15 px/s",
        base_cost: 30,
        max_level: Some(5),
    },
    UpgradeDef {
        kind: UpgradeKind::FireRate,
        name: "Fire Rate",
        desc: "-0.03s between shots",
        base_cost: 50,
        max_level: Some(5),
    },
    UpgradeDef {
        kind: UpgradeKind::MagSize,
        name: "Magazine",
        desc: "+2 rounds",
        base_cost: 40,
        max_level: Some(4),
    },
    UpgradeDef {
        kind: UpgradeKind::MaxHealth,
        name: "Max Health",
        desc: "+20 max HP",
        base_cost: 100,
        max_level: Some(3),
    },
    UpgradeDef {
        kind: UpgradeKind::BulletDamage,
        name: "Bullet Damage",
        desc: "+1 bullet damage",
        base_cost: 100,
        max_level: Some(2),
    },
    UpgradeDef {
        kind: UpgradeKind::RepairSpeed,
        name: "Carpentry",
        desc: "-15% repair time",
        base_cost: 60,
        max_level: Some(3),
    },
    UpgradeDef {
        kind: UpgradeKind::Medkit,
        name: "Medkit",
        desc: "Restore 50 HP",
        base_cost: 75,
        max_level: None,
    },
];

/// Levels bought, indexed like [`UPGRADES`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeLevels {
    levels: [u32; UPGRADES.len()],
}

impl UpgradeLevels {
    pub fn level(&self, index: usize) -> Option<u32> {
        self.levels.get(index).copied()
    }
}

/// Current price of an upgrade: +50% of base per level already bought
pub fn get_upgrade_cost(state: &GameState, index: usize) -> Option<u32> {
    let def = UPGRADES.get(index)?;
    let level = state.upgrades.level(index)?;
    Some(match def.max_level {
        None => def.base_cost,
        Some(_) => def.base_cost + level * (def.base_cost / 2),
    })
}

/// Validate and apply a purchase. Returns false (and changes nothing) when the
/// index is unknown, the upgrade is maxed, money is short, or a medkit would
/// be wasted at full health.
pub fn buy_upgrade(state: &mut GameState, index: usize) -> bool {
    let Some(def) = UPGRADES.get(index) else {
        log::debug!("Upgrade {} does not exist", index);
        return false;
    };
    let Some(cost) = get_upgrade_cost(state, index) else {
        return false;
    };
    let level = state.upgrades.levels[index];

    if def.max_level.is_some_and(|max| level >= max) {
        log::debug!("{} already maxed", def.name);
        return false;
    }
    if def.kind == UpgradeKind::Medkit && state.player.health >= state.player.stats.max_health {
        log::debug!("Medkit refused at full health");
        return false;
    }
    if state.player.money < cost {
        log::debug!("{} costs {}, have {}", def.name, cost, state.player.money);
        return false;
    }

    state.player.money -= cost;
    state.upgrades.levels[index] += 1;
    apply_upgrade(state, def.kind);
    log::info!("Bought {} (level {})", def.name, state.upgrades.levels[index]);
    true
}

fn apply_upgrade(state: &mut GameState, kind: UpgradeKind) {
    let player = &mut state.player;
    let stats = &mut player.stats;
    match kind {
        UpgradeKind::MoveSpeed => stats.speed += 15.0,
        UpgradeKind::FireRate => stats.fire_cooldown = (stats.fire_cooldown - 0.03).max(0.08),
        UpgradeKind::MagSize => stats.mag_size += 2,
        UpgradeKind::MaxHealth => {
            stats.max_health += 20.0;
            player.health += 20.0;
        }
        UpgradeKind::BulletDamage => stats.bullet_damage += 1,
        UpgradeKind::RepairSpeed => stats.repair_time_scale *= 0.85,
        UpgradeKind::Medkit => player.heal(50.0),
    }
}
