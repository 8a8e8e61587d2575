//! Stroke emboldening.
//!
//! Every control point moves along the bisector of the normals of its two
//! adjacent edges, scaled so that both edges end up exactly `offset` units
//! further out. This is the miter offset FreeType's `FT_Outline_EmboldenXY`
//! applies; it keeps the point structure intact at the cost of exact curve
//! offsets, which is fine for the stroke widths bold variants use.

use kurbo::{Point, Vec2};

use crate::contour::{Contour, Orientation};

/// Lower bound for `1 + cos(turn)`; caps miter length at about 5.7x the offset.
const MITER_FLOOR: f64 = 0.0625;

/// Points closer than this are treated as coincident.
const COINCIDENT: f64 = 1e-9;

/// Push every edge of `contour` outward by `offset` font units.
///
/// `orientation` is the orientation of the glyph the contour belongs to, so
/// that filled areas always grow and counters always shrink.
pub fn embolden_contour(contour: &mut Contour, offset: f64, orientation: Orientation) {
    let n = contour.len();
    if n < 2 || offset == 0.0 {
        return;
    }

    let positions: Vec<Point> = contour.points().iter().map(|p| p.pos).collect();
    let scale = offset * orientation.outward_sign();

    let shifts: Vec<Vec2> = (0..n).map(|i| miter_shift(&positions, i) * scale).collect();

    for (point, shift) in contour.points_mut().iter_mut().zip(shifts) {
        point.pos += shift;
    }
}

/// Unit-offset miter shift for point `i`, along left-hand normals.
fn miter_shift(positions: &[Point], i: usize) -> Vec2 {
    let n = positions.len();
    let current = positions[i];

    let previous = (1..n)
        .map(|k| positions[(i + n - k) % n])
        .find(|p| p.distance(current) > COINCIDENT);
    let next = (1..n)
        .map(|k| positions[(i + k) % n])
        .find(|p| p.distance(current) > COINCIDENT);

    let (Some(previous), Some(next)) = (previous, next) else {
        return Vec2::ZERO;
    };

    let incoming = (current - previous).normalize();
    let outgoing = (next - current).normalize();
    let normal_in = Vec2::new(-incoming.y, incoming.x);
    let normal_out = Vec2::new(-outgoing.y, outgoing.x);

    let cos_turn = incoming.dot(outgoing);
    (normal_in + normal_out) / (1.0 + cos_turn).max(MITER_FLOOR)
}
