//! Configuration constants for variant generation.

use std::time::Duration;

/// Stroke width in font units added by emboldening.
pub const DEFAULT_STROKE: f64 = 30.0;

/// Slant of italic variants, in degrees leaning right.
pub const DEFAULT_ITALIC_ANGLE: f64 = 12.0;

/// OS/2 weight class of bold variants.
pub const BOLD_WEIGHT_CLASS: u16 = 700;

/// Processing limit for a single glyph.
pub const DEFAULT_GLYPH_TIMEOUT: Duration = Duration::from_secs(5);

/// Extension of generated fonts.
pub const OUTPUT_EXTENSION: &str = "ttf";

/// Pattern used to expand directory inputs.
pub const INPUT_PATTERN: &str = "*.ttf";
