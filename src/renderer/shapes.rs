//! Shape generation for 2D primitives
//!
//! All coordinates are canvas pixels; conversion to NDC happens in the
//! pipeline.

use glam::Vec2;

use super::vertex::Vertex;

/// Two triangles covering a quad given by its corners in order
fn quad(corners: [Vec2; 4], color: [f32; 4], out: &mut Vec<Vertex>) {
    let [a, b, c, d] = corners;
    for p in [a, b, c, c, d, a] {
        out.push(Vertex::at(p, color));
    }
}

/// Filled rectangle rotated by `rotation` radians about its centre
pub fn rotated_rect(
    center: Vec2,
    half_extents: Vec2,
    rotation: f32,
    color: [f32; 4],
    out: &mut Vec<Vertex>,
) {
    let rot = Vec2::from_angle(rotation);
    let corners = [
        Vec2::new(-half_extents.x, -half_extents.y),
        Vec2::new(half_extents.x, -half_extents.y),
        Vec2::new(half_extents.x, half_extents.y),
        Vec2::new(-half_extents.x, half_extents.y),
    ]
    .map(|c| center + rot.rotate(c));
    quad(corners, color, out);
}

/// Thick line segment from `a` to `b`
pub fn line(a: Vec2, b: Vec2, width: f32, color: [f32; 4], out: &mut Vec<Vertex>) {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    quad([a + perp, b + perp, b - perp, a - perp], color, out);
}
