//! Collision helpers for circles and axis-aligned rectangles
//!
//! Everything in the world is either a circle (player, zombies) or an AABB
//! (walls, windows, the building footprint).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Below this, a segment direction component is treated as zero
const PARALLEL_EPSILON: f32 = 1e-6;

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.w, self.y + self.h)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Grow the rect by `pad` on every side
    pub fn expand(&self, pad: f32) -> Rect {
        Rect::new(
            self.x - pad,
            self.y - pad,
            self.w + pad * 2.0,
            self.h + pad * 2.0,
        )
    }

    /// Corners in clockwise order starting top-left
    pub fn corners(&self) -> [Vec2; 4] {
        let (min, max) = (self.min(), self.max());
        [
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ]
    }

    /// Closest point inside (or on) the rect to `p`
    #[inline]
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min(), self.max())
    }
}

/// Push a circle out of a rect, moving `pos` in place.
///
/// Multiple overlapping rects are handled by calling this once per rect;
/// corrections are sequential, not solved simultaneously.
pub fn resolve_circle_rect(pos: &mut Vec2, radius: f32, rect: &Rect) {
    let near = rect.clamp_point(*pos);
    let delta = *pos - near;
    let dist_sq = delta.length_squared();
    if dist_sq >= radius * radius {
        return;
    }

    if dist_sq > 0.0 {
        let dist = dist_sq.sqrt();
        *pos += delta / dist * (radius - dist);
        return;
    }

    // Centre is inside the rect: exit through the closest edge
    let to_left = pos.x - rect.x;
    let to_right = rect.x + rect.w - pos.x;
    let to_top = pos.y - rect.y;
    let to_bottom = rect.y + rect.h - pos.y;
    let nearest = to_left.min(to_right).min(to_top).min(to_bottom);

    if nearest == to_left {
        pos.x = rect.x - radius;
    } else if nearest == to_right {
        pos.x = rect.x + rect.w + radius;
    } else if nearest == to_top {
        pos.y = rect.y - radius;
    } else {
        pos.y = rect.y + rect.h + radius;
    }
}

/// Inclusive point-in-rect test
#[inline]
pub fn point_in_rect(p: Vec2, rect: &Rect) -> bool {
    p.x >= rect.x && p.x <= rect.x + rect.w && p.y >= rect.y && p.y <= rect.y + rect.h
}

/// Whether any point of segment `a`-`b` lies within `rect` (slab method)
pub fn segment_intersects_aabb(a: Vec2, b: Vec2, rect: &Rect) -> bool {
    let d = b - a;
    let (min, max) = (rect.min(), rect.max());
    let mut t_enter = 0.0_f32;
    let mut t_exit = 1.0_f32;

    for axis in 0..2 {
        let (origin, dir, lo, hi) = (a[axis], d[axis], min[axis], max[axis]);

        if dir.abs() < PARALLEL_EPSILON {
            // Parallel to this slab: only an interval check
            if origin < lo || origin > hi {
                return false;
            }
            continue;
        }

        let mut t1 = (lo - origin) / dir;
        let mut t2 = (hi - origin) / dir;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        t_enter = t_enter.max(t1);
        t_exit = t_exit.min(t2);
        if t_enter > t_exit {
            return false;
        }
    }

    true
}

/// Distance from `p` to the nearest point of `rect` (0 when inside)
#[inline]
pub fn distance_to_rect(p: Vec2, rect: &Rect) -> f32 {
    (p - rect.clamp_point(p)).length()
}

/// Circle-circle overlap test
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}
