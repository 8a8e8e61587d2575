//! Contour model shared by the outline transforms.
//!
//! Contours keep the TrueType point list as-is (on-curve and off-curve quadratic
//! control points) in `f64` space. Every transform here works on the control
//! polygon, so point counts and on/off-curve flags never change and the output
//! stays compatible with the source glyph's structure.

use kurbo::{Affine, Point, Vec2};
use read_fonts::tables::glyf::{CurvePoint, SimpleGlyph as ReadSimpleGlyph};
use write_fonts::tables::glyf::{Bbox, Contour as WriteContour, SimpleGlyph};

/// Below this, a contour has no meaningful orientation.
const AREA_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlinePoint {
    pub pos: Point,
    pub on_curve: bool,
}

impl OutlinePoint {
    pub fn new(x: f64, y: f64, on_curve: bool) -> Self {
        Self { pos: Point::new(x, y), on_curve }
    }
}

/// Winding direction in y-up font space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Outer contours clockwise (TrueType convention).
    Clockwise,
    /// Outer contours counter-clockwise (PostScript convention).
    CounterClockwise,
}

impl Orientation {
    /// Orientation of a whole outline, judged by the sign of its total area.
    ///
    /// Empty or zero-area outlines are treated as TrueType.
    pub fn of(contours: &[Contour]) -> Self {
        let area: f64 = contours.iter().map(Contour::signed_area).sum();
        if area > AREA_EPSILON { Self::CounterClockwise } else { Self::Clockwise }
    }

    /// Multiplier that turns a left-hand edge normal into an outward one.
    pub(crate) fn outward_sign(self) -> f64 {
        match self {
            Self::Clockwise => 1.0,
            Self::CounterClockwise => -1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contour {
    points: Vec<OutlinePoint>,
}

impl Contour {
    pub fn new(points: Vec<OutlinePoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[OutlinePoint] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [OutlinePoint] {
        &mut self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shoelace area of the control polygon; positive when counter-clockwise.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice_area: f64 = (0..n)
            .map(|i| {
                let a = self.points[i].pos;
                let b = self.points[(i + 1) % n].pos;
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice_area / 2.0
    }

    /// Whether the contour has enough extent to carry a direction.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3 || self.signed_area().abs() < AREA_EPSILON
    }

    /// Non-zero winding test against the control polygon.
    pub fn winding_contains(&self, p: Point) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }

        let mut winding = 0i32;
        for i in 0..n {
            let a = self.points[i].pos;
            let b = self.points[(i + 1) % n].pos;
            let side = (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y);
            if a.y <= p.y {
                if b.y > p.y && side > 0.0 {
                    winding += 1;
                }
            } else if b.y <= p.y && side < 0.0 {
                winding -= 1;
            }
        }
        winding != 0
    }

    /// A point used to decide which contours enclose this one.
    pub fn sample_point(&self) -> Option<Point> {
        self.points
            .iter()
            .find(|p| p.on_curve)
            .or_else(|| self.points.first())
            .map(|p| p.pos)
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    pub fn translate(&mut self, offset: Vec2) {
        for point in &mut self.points {
            point.pos += offset;
        }
    }

    pub fn apply_affine(&mut self, affine: Affine) {
        for point in &mut self.points {
            point.pos = affine * point.pos;
        }
    }
}

pub(crate) fn clamp_i16(value: f64) -> i16 {
    value.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// Split a simple glyph's points into contours.
pub fn contours_from_simple(glyph: &ReadSimpleGlyph) -> Vec<Contour> {
    let all_points: Vec<CurvePoint> = glyph.points().collect();
    let mut contours = Vec::new();

    let mut start = 0usize;
    for end in glyph.end_pts_of_contours() {
        let end_idx = (end.get() as usize + 1).min(all_points.len());
        if end_idx <= start {
            continue;
        }
        let points = all_points[start..end_idx]
            .iter()
            .map(|p| OutlinePoint::new(p.x as f64, p.y as f64, p.on_curve))
            .collect();
        contours.push(Contour::new(points));
        start = end_idx;
    }

    contours
}

/// Build a simple glyph from contours, rounding coordinates to font units.
///
/// Hinting instructions are not carried over; they no longer match the outline.
pub fn contours_to_simple(contours: &[Contour]) -> SimpleGlyph {
    let contours = contours
        .iter()
        .filter(|c| !c.is_empty())
        .map(|c| {
            let points: Vec<CurvePoint> = c
                .points()
                .iter()
                .map(|p| CurvePoint::new(clamp_i16(p.pos.x), clamp_i16(p.pos.y), p.on_curve))
                .collect();
            WriteContour::from(points)
        })
        .collect();

    let mut glyph = SimpleGlyph { bbox: Bbox::default(), contours, instructions: Vec::new() };
    glyph.recompute_bounding_box();
    glyph
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Axis-aligned square as a contour of on-curve points.
    pub(crate) fn square(x0: f64, y0: f64, size: f64, clockwise: bool) -> Contour {
        let mut points = vec![
            OutlinePoint::new(x0, y0, true),
            OutlinePoint::new(x0, y0 + size, true),
            OutlinePoint::new(x0 + size, y0 + size, true),
            OutlinePoint::new(x0 + size, y0, true),
        ];
        if !clockwise {
            points.reverse();
        }
        Contour::new(points)
    }

    #[test]
    fn clockwise_square_has_negative_area() {
        let contour = square(0.0, 0.0, 100.0, true);
        assert_eq!(contour.signed_area(), -10000.0);
    }

    #[test]
    fn reverse_flips_area_sign() {
        let mut contour = square(0.0, 0.0, 100.0, true);
        contour.reverse();
        assert_eq!(contour.signed_area(), 10000.0);
    }

    #[test]
    fn winding_contains_inner_point_only() {
        let contour = square(0.0, 0.0, 100.0, true);
        assert!(contour.winding_contains(Point::new(50.0, 50.0)));
        assert!(!contour.winding_contains(Point::new(150.0, 50.0)));
        assert!(!contour.winding_contains(Point::new(50.0, -1.0)));
    }

    #[test]
    fn degenerate_contours() {
        let line = Contour::new(vec![
            OutlinePoint::new(0.0, 0.0, true),
            OutlinePoint::new(10.0, 0.0, true),
        ]);
        assert!(line.is_degenerate());
        assert!(!square(0.0, 0.0, 10.0, true).is_degenerate());
    }

    #[test]
    fn orientation_of_outline() {
        assert_eq!(Orientation::of(&[square(0.0, 0.0, 10.0, true)]), Orientation::Clockwise);
        assert_eq!(
            Orientation::of(&[square(0.0, 0.0, 10.0, false)]),
            Orientation::CounterClockwise
        );
        assert_eq!(Orientation::of(&[]), Orientation::Clockwise);
    }

    #[test]
    fn sample_point_prefers_on_curve() {
        let contour = Contour::new(vec![
            OutlinePoint::new(5.0, 5.0, false),
            OutlinePoint::new(0.0, 0.0, true),
            OutlinePoint::new(10.0, 0.0, true),
        ]);
        assert_eq!(contour.sample_point(), Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn to_simple_rounds_and_computes_bbox() {
        let contour = Contour::new(vec![
            OutlinePoint::new(0.4, 0.6, true),
            OutlinePoint::new(0.0, 99.5, true),
            OutlinePoint::new(100.2, 100.0, true),
        ]);
        let glyph = contours_to_simple(&[contour]);
        assert_eq!(glyph.contours.len(), 1);
        assert_eq!(glyph.bbox.x_min, 0);
        assert_eq!(glyph.bbox.y_min, 1);
        assert_eq!(glyph.bbox.x_max, 100);
        assert_eq!(glyph.bbox.y_max, 100);
        assert!(glyph.instructions.is_empty());
    }

    #[test]
    fn clamps_out_of_range_coordinates() {
        assert_eq!(clamp_i16(40000.0), i16::MAX);
        assert_eq!(clamp_i16(-40000.0), i16::MIN);
        assert_eq!(clamp_i16(-2.5), -3);
    }
}
