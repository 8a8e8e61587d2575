//! Contour direction correction.

use crate::{Result, contour::Contour, deadline::Deadline};

/// Reorient contours to the TrueType convention.
///
/// A contour enclosed by an even number of other contours is an outer contour
/// and must run clockwise; an odd nesting depth marks a counter (hole), which
/// must run counter-clockwise. Degenerate contours are left alone.
///
/// Returns the number of contours reversed.
pub fn correct_direction(contours: &mut [Contour], deadline: &Deadline) -> Result<usize> {
    let mut depths = Vec::with_capacity(contours.len());
    for (i, contour) in contours.iter().enumerate() {
        deadline.check()?;
        let depth = match contour.sample_point() {
            Some(sample) => contours
                .iter()
                .enumerate()
                .filter(|(j, other)| *j != i && other.winding_contains(sample))
                .count(),
            None => 0,
        };
        depths.push(depth);
    }

    let mut reversed = 0;
    for (contour, depth) in contours.iter_mut().zip(depths) {
        if contour.is_degenerate() {
            continue;
        }
        let should_be_clockwise = depth % 2 == 0;
        let is_clockwise = contour.signed_area() < 0.0;
        if should_be_clockwise != is_clockwise {
            contour.reverse();
            reversed += 1;
        }
    }

    Ok(reversed)
}
