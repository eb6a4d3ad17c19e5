//! Barricade repair: hold the repair key near a damaged window to add planks

use super::state::{GameEvent, GameState};

/// Index of the nearest window within repair range that is missing planks
pub fn repairable_window(state: &GameState) -> Option<usize> {
    let range = state.settings.repair_range;
    let pos = state.player.pos;

    state
        .building
        .windows
        .iter()
        .enumerate()
        .filter(|(_, w)| !w.is_full())
        .map(|(i, w)| (i, pos.distance(w.center())))
        .filter(|&(_, d)| d <= range)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Accumulate or decay repair progress for every window.
///
/// A completed repair applies the plank directly on solo/host; a joiner only
/// requests it and waits for the host's snapshot.
pub fn update_repairs(state: &mut GameState, repair_held: bool, dt: f32) {
    let target = if repair_held && !state.player.is_down() {
        repairable_window(state)
    } else {
        None
    };

    let repair_time = (state.settings.repair_time * state.player.stats.repair_time_scale).max(0.05);
    let fill = dt / repair_time;
    let decay = fill * state.settings.repair_decay_multiplier;
    let pop_in_time = state.settings.plank_pop_in_time;
    let mut completed = None;

    for (i, window) in state.building.windows.iter_mut().enumerate() {
        window.animate(dt, pop_in_time);

        if Some(i) == target {
            window.repair_progress += fill;
            if window.repair_progress >= 1.0 {
                window.repair_progress = 0.0;
                completed = Some(i);
            }
        } else {
            window.repair_progress = (window.repair_progress - decay).max(0.0);
        }
    }

    if let Some(window) = completed {
        if state.role.simulates_zombies() {
            state.apply_add_plank(window);
        } else {
            state.events.push(GameEvent::PlankRequested { window });
        }
    }
}
