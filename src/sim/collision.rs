//! Collision geometry
//!
//! Everything in the world is one of three shapes: an axis-aligned box
//! (fortress, enemies, kinetic projectiles), a circle (trees, drop
//! collection), or a segment (beam projectiles). All positions are
//! shape centers.

use glam::Vec2;

/// Center-based AABB overlap test
#[inline]
pub fn aabb_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    (a_pos.x - b_pos.x).abs() < (a_size.x + b_size.x) / 2.0
        && (a_pos.y - b_pos.y).abs() < (a_size.y + b_size.y) / 2.0
}

#[inline]
pub fn circle_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

/// Box-vs-circle overlap via the closest point on the box
#[inline]
pub fn aabb_circle_overlap(box_pos: Vec2, box_size: Vec2, center: Vec2, radius: f32) -> bool {
    let half = box_size / 2.0;
    let closest = center.clamp(box_pos - half, box_pos + half);
    closest.distance_squared(center) < radius * radius
}

/// Distance from `p` to the segment `a`..`b`
pub fn segment_point_distance(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-6 {
        return a.distance(p);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t).distance(p)
}

/// Beam hit test: segment-to-center distance within the combined half-widths
#[inline]
pub fn beam_hits(start: Vec2, end: Vec2, center: Vec2, combined_half_width: f32) -> bool {
    segment_point_distance(start, end, center) < combined_half_width
}
