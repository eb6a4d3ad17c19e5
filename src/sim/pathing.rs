//! Detour routing around the building
//!
//! The building is the only obstacle, and it is a convex box, so a full
//! navmesh is unnecessary: a route needs at most two of the padded box's
//! corners. Candidates are enumerated and the shortest collision-free one wins.

use std::collections::VecDeque;

use glam::Vec2;

use super::building::{Building, GameWindow};
use super::geometry::{Rect, segment_intersects_aabb};

/// Corner waypoints sit this far outside the padded box so that legs running
/// along a face don't graze it.
const CORNER_MARGIN: f32 = 2.0;

/// True when the straight line from `start` to the window's approach point
/// clears the padded building footprint
pub fn has_clear_line(start: Vec2, building: &Building, window: &GameWindow) -> bool {
    !segment_intersects_aabb(start, window.approach_point(), &building.padded_bounds())
}

/// Route from `start` to the window's approach point.
///
/// The returned waypoints always end at the approach point. When no detour
/// validates, the approach point alone is returned and the walker may clip a
/// corner.
pub fn compute_path_to_window(
    start: Vec2,
    building: &Building,
    window: &GameWindow,
) -> VecDeque<Vec2> {
    let bounds = building.padded_bounds();
    let goal = window.approach_point();
    let route = find_route(start, goal, &bounds).unwrap_or_default();

    let mut path: VecDeque<Vec2> = route.into_iter().collect();
    path.push_back(goal);
    path
}

/// Intermediate corners (0, 1 or 2 of them) for the shortest valid route
fn find_route(start: Vec2, goal: Vec2, bounds: &Rect) -> Option<Vec<Vec2>> {
    let clear = |a: Vec2, b: Vec2| !segment_intersects_aabb(a, b, bounds);

    if clear(start, goal) {
        return Some(Vec::new());
    }

    let corners = bounds.expand(CORNER_MARGIN).corners();

    let single = corners
        .iter()
        .filter(|&&c| clear(start, c) && clear(c, goal))
        .map(|&c| (start.distance(c) + c.distance(goal), vec![c]))
        .min_by(|a, b| a.0.total_cmp(&b.0));
    if let Some((_, route)) = single {
        return Some(route);
    }

    let mut best: Option<(f32, Vec<Vec2>)> = None;
    for (i, &c1) in corners.iter().enumerate() {
        if !clear(start, c1) {
            continue;
        }
        for (j, &c2) in corners.iter().enumerate() {
            if i == j || !clear(c1, c2) || !clear(c2, goal) {
                continue;
            }
            let len = start.distance(c1) + c1.distance(c2) + c2.distance(goal);
            if best.as_ref().is_none_or(|(best_len, _)| len < *best_len) {
                best = Some((len, vec![c1, c2]));
            }
        }
    }

    best.map(|(_, route)| route)
}

/// Total length of walking `path` from `start`
pub fn path_length(start: Vec2, path: &VecDeque<Vec2>) -> f32 {
    let mut prev = start;
    let mut total = 0.0;
    for &p in path {
        total += prev.distance(p);
        prev = p;
    }
    total
}
