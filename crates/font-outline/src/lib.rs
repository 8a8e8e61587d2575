//! # Font Outline
//!
//! Bold and italic outline transforms for static TrueType fonts.
//!
//! - direction correction: outer contours clockwise, counters counter-clockwise
//! - emboldening: miter offset of each contour's control polygon
//! - slanting: horizontal shear around half the x-height
//!
//! Glyphs can be excluded by codepoint class (private use, emoji, symbols),
//! custom ranges or glyph-name markers, and each glyph runs under an optional
//! time limit.
//!
//! ## Example
//!
//! ```no_run
//! use font_outline::{TransformOptions, transform_glyphs};
//!
//! let data = std::fs::read("input.ttf").unwrap();
//! let options = TransformOptions::bold(30.0).with_italic_angle(12.0);
//! let result = transform_glyphs(&data, &options).unwrap();
//! println!("{} glyphs transformed", result.report.transformed);
//! std::fs::write("output.ttf", result.data).unwrap();
//! ```

mod contour;
mod deadline;
mod direction;
mod embolden;
mod error;
mod exclusion;
mod glyphs;
mod skew;
mod types;

pub use contour::{Contour, Orientation, OutlinePoint, contours_from_simple, contours_to_simple};
pub use deadline::Deadline;
pub use direction::correct_direction;
pub use embolden::embolden_contour;
pub use error::{Error, Result};
pub use exclusion::{
    CodepointRange, DEFAULT_NAME_MARKERS, EMOJI_RANGES, ExclusionReason, ExclusionRules,
    PRIVATE_USE_RANGES, SYMBOL_RANGES,
};
pub use glyphs::{excluded_glyphs, transform_glyphs};
pub use skew::Skew;
pub use types::{
    AdvanceMode, ExcludedGlyph, GlyphFailure, GlyphOutcome, TransformOptions, TransformReport,
    Transformed,
};
