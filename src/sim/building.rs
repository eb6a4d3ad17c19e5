//! Static building geometry: outer walls with boarded window gaps
//!
//! The building is a single rectangle centred in the world. Each wall side has
//! one window gap; the remaining wall pieces are solid rects computed once.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;

/// Which wall a window sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Unit vector pointing out of the building through this wall
    pub fn outward(&self) -> Vec2 {
        match self {
            Side::Top => Vec2::new(0.0, -1.0),
            Side::Bottom => Vec2::new(0.0, 1.0),
            Side::Left => Vec2::new(-1.0, 0.0),
            Side::Right => Vec2::new(1.0, 0.0),
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }
}

/// A barricadable gap in one of the walls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameWindow {
    pub rect: Rect,
    pub side: Side,
    /// Boards covering the gap, always within 0..=MAX_PLANKS
    planks: u8,
    /// Repair progress toward the next plank (0-1)
    pub repair_progress: f32,
    /// Pop-in animation for the newest plank (0 = just added, 1 = settled)
    pub pop_in: f32,
}

impl GameWindow {
    pub fn new(rect: Rect, side: Side) -> Self {
        Self {
            rect,
            side,
            planks: MAX_PLANKS,
            repair_progress: 0.0,
            pop_in: 1.0,
        }
    }

    pub fn planks(&self) -> u8 {
        self.planks
    }

    /// Set the plank count, clamped to the valid range
    pub fn set_planks(&mut self, planks: u8) {
        self.planks = planks.min(MAX_PLANKS);
    }

    /// Adopt a count from the authoritative side, replaying the pop-in when
    /// it grew
    pub fn sync_planks(&mut self, planks: u8) {
        let planks = planks.min(MAX_PLANKS);
        if planks > self.planks {
            self.pop_in = 0.0;
        }
        self.planks = planks;
    }

    pub fn is_full(&self) -> bool {
        self.planks >= MAX_PLANKS
    }

    pub fn is_open(&self) -> bool {
        self.planks == 0
    }

    /// Add one plank. Returns false (and changes nothing) when already full.
    pub fn add_plank(&mut self) -> bool {
        if self.is_full() {
            return false;
        }
        self.planks += 1;
        self.pop_in = 0.0;
        true
    }

    /// Tear off one plank. Returns false (and changes nothing) when already open.
    pub fn remove_plank(&mut self) -> bool {
        if self.is_open() {
            return false;
        }
        self.planks -= 1;
        true
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    /// Where a zombie stands outside the wall face before breaking in
    pub fn approach_point(&self) -> Vec2 {
        self.face_point(self.side.outward())
    }

    /// Where a zombie lands after climbing through
    pub fn inside_point(&self) -> Vec2 {
        self.face_point(-self.side.outward())
    }

    fn face_point(&self, dir: Vec2) -> Vec2 {
        let half_depth = if self.side.is_horizontal() {
            self.rect.h / 2.0
        } else {
            self.rect.w / 2.0
        };
        self.center() + dir * (half_depth + APPROACH_OFFSET)
    }

    /// Advance the plank pop-in animation
    pub fn animate(&mut self, dt: f32, pop_in_time: f32) {
        if self.pop_in < 1.0 {
            self.pop_in = (self.pop_in + dt / pop_in_time.max(f32::EPSILON)).min(1.0);
        }
    }
}

/// The building: footprint, windows, and derived solid walls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    pub rect: Rect,
    pub wall_thickness: f32,
    pub windows: Vec<GameWindow>,
    /// Solid wall pieces (window gaps excluded), computed once
    walls: Vec<Rect>,
}

impl Default for Building {
    fn default() -> Self {
        Self::new(Rect::new(
            WORLD_W / 2.0 - BUILDING_W / 2.0,
            WORLD_H / 2.0 - BUILDING_H / 2.0,
            BUILDING_W,
            BUILDING_H,
        ))
    }
}

impl Building {
    /// Build the standard layout: one window per side
    pub fn new(rect: Rect) -> Self {
        let t = WALL_THICKNESS;
        let c = rect.center();
        let windows = vec![
            GameWindow::new(
                Rect::new(c.x - WINDOW_GAP / 2.0, rect.y, WINDOW_GAP, t),
                Side::Top,
            ),
            GameWindow::new(
                Rect::new(rect.x + 100.0, rect.y + rect.h - t, WINDOW_GAP, t),
                Side::Bottom,
            ),
            GameWindow::new(
                Rect::new(rect.x, rect.y + rect.h - WINDOW_GAP - 100.0, t, WINDOW_GAP),
                Side::Left,
            ),
            GameWindow::new(
                Rect::new(rect.x + rect.w - t, c.y - WINDOW_GAP / 2.0, t, WINDOW_GAP),
                Side::Right,
            ),
        ];
        let walls = build_walls(&rect, &windows);

        Self {
            rect,
            wall_thickness: t,
            windows,
            walls,
        }
    }

    pub fn walls(&self) -> &[Rect] {
        &self.walls
    }

    /// Footprint grown by the pathfinding clearance
    pub fn padded_bounds(&self) -> Rect {
        self.rect.expand(PATH_PADDING)
    }

    /// Plank counts in window order (for snapshots)
    pub fn plank_counts(&self) -> Vec<u8> {
        self.windows.iter().map(|w| w.planks()).collect()
    }

    /// Add a plank to a window by index. No-op when full or out of range.
    pub fn apply_add_plank(&mut self, index: usize) -> bool {
        match self.windows.get_mut(index) {
            Some(window) => window.add_plank(),
            None => false,
        }
    }
}

/// Split each wall side into the two solid pieces around its window
fn build_walls(b: &Rect, windows: &[GameWindow]) -> Vec<Rect> {
    let t = WALL_THICKNESS;
    let mut rects = Vec::with_capacity(windows.len() * 2);

    for win in windows {
        let r = &win.rect;
        if win.side.is_horizontal() {
            rects.push(Rect::new(b.x, r.y, r.x - b.x, t));
            let right_x = r.x + r.w;
            rects.push(Rect::new(right_x, r.y, b.x + b.w - right_x, t));
        } else {
            rects.push(Rect::new(r.x, b.y, t, r.y - b.y));
            let below_y = r.y + r.h;
            rects.push(Rect::new(r.x, below_y, t, b.y + b.h - below_y));
        }
    }

    rects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::{point_in_rect, segment_intersects_aabb};

    #[test]
    fn test_layout_matches_world() {
        let building = Building::default();
        assert_eq!(building.rect, Rect::new(1300.0, 1000.0, 600.0, 400.0));
        assert_eq!(building.windows.len(), 4);
        assert_eq!(building.walls().len(), 8);
        assert!(building.windows.iter().all(|w| w.planks() == MAX_PLANKS));
    }

    #[test]
    fn test_walls_leave_window_gaps() {
        let building = Building::default();
        for win in &building.windows {
            let c = win.center();
            assert!(
                !building.walls().iter().any(|w| point_in_rect(c, w)),
                "window centre {:?} should not be inside a wall",
                c
            );
        }
    }

    #[test]
    fn test_approach_points_outside_padded_box() {
        let building = Building::default();
        let padded = building.padded_bounds();
        for win in &building.windows {
            assert!(!point_in_rect(win.approach_point(), &padded));
            assert!(point_in_rect(win.inside_point(), &building.rect));
        }
    }

    #[test]
    fn test_left_window_approach_point() {
        let building = Building::default();
        let left = &building.windows[2];
        assert_eq!(left.side, Side::Left);
        let p = left.approach_point();
        assert!((p.x - 1270.0).abs() < 0.001);
        assert!((p.y - 1272.5).abs() < 0.001);
    }

    #[test]
    fn test_plank_count_bounds() {
        let mut win = GameWindow::new(Rect::new(0.0, 0.0, 55.0, 24.0), Side::Top);
        assert!(!win.add_plank());
        assert_eq!(win.planks(), MAX_PLANKS);

        for _ in 0..MAX_PLANKS {
            assert!(win.remove_plank());
        }
        assert!(!win.remove_plank());
        assert_eq!(win.planks(), 0);

        win.set_planks(200);
        assert_eq!(win.planks(), MAX_PLANKS);
    }

    #[test]
    fn test_add_plank_restarts_pop_in() {
        let mut building = Building::default();
        building.windows[0].set_planks(1);
        assert!(building.apply_add_plank(0));
        assert_eq!(building.windows[0].pop_in, 0.0);
        building.windows[0].animate(0.1, 0.25);
        assert!((building.windows[0].pop_in - 0.4).abs() < 0.001);
        assert!(!building.apply_add_plank(99));
    }

    #[test]
    fn test_sync_planks_pops_in_only_when_grown() {
        let mut win = Building::default().windows[0].clone();
        win.set_planks(1);
        win.pop_in = 1.0;

        win.sync_planks(1);
        assert_eq!(win.pop_in, 1.0);
        win.sync_planks(0);
        assert_eq!(win.pop_in, 1.0);
        win.sync_planks(2);
        assert_eq!(win.pop_in, 0.0);
        win.sync_planks(9);
        assert_eq!(win.planks(), MAX_PLANKS);
    }

    #[test]
    fn test_window_gap_passable_through_wall_line() {
        // A straight line into the building through the left window gap hits no wall
        let building = Building::default();
        let left = &building.windows[2];
        let a = left.approach_point();
        let b = left.inside_point();
        assert!(
            !building
                .walls()
                .iter()
                .any(|w| segment_intersects_aabb(a, b, w))
        );
    }
}
