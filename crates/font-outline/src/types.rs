//! Options and reports for glyph transforms.

use std::{collections::BTreeMap, time::Duration};

use crate::{Error, Result, exclusion::{ExclusionReason, ExclusionRules}};

/// What happens to advance widths when glyphs are emboldened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdvanceMode {
    /// Grow each transformed glyph's advance by the stroke width and shift its
    /// outline right by half of it, keeping side bearings.
    #[default]
    Expand,
    /// Keep advances and positions; needed for monospaced fonts.
    Preserve,
}

/// Glyph transform settings.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Stroke width in font units added to every stem. `None` disables emboldening.
    pub stroke: Option<f64>,
    /// Slant in degrees, positive leaning right. `None` disables shearing.
    pub italic_angle: Option<f64>,
    pub advance_mode: AdvanceMode,
    pub correct_direction: bool,
    pub exclusions: ExclusionRules,
    /// Per-glyph processing limit. `None` disables the guard.
    pub glyph_timeout: Option<Duration>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            stroke: None,
            italic_angle: None,
            advance_mode: AdvanceMode::default(),
            correct_direction: true,
            exclusions: ExclusionRules::default(),
            glyph_timeout: None,
        }
    }
}

impl TransformOptions {
    pub fn bold(stroke: f64) -> Self {
        Self { stroke: Some(stroke), ..Self::default() }
    }

    pub fn italic(angle: f64) -> Self {
        Self { italic_angle: Some(angle), ..Self::default() }
    }

    pub fn with_stroke(mut self, stroke: f64) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn with_italic_angle(mut self, angle: f64) -> Self {
        self.italic_angle = Some(angle);
        self
    }

    pub fn with_advance_mode(mut self, mode: AdvanceMode) -> Self {
        self.advance_mode = mode;
        self
    }

    pub fn with_exclusions(mut self, rules: ExclusionRules) -> Self {
        self.exclusions = rules;
        self
    }

    pub fn with_glyph_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.glyph_timeout = timeout;
        self
    }

    /// Half the stroke, i.e. how far each edge moves outward.
    pub(crate) fn edge_offset(&self) -> Option<f64> {
        self.stroke.filter(|s| *s != 0.0).map(|s| s / 2.0)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(stroke) = self.stroke
            && !stroke.is_finite()
        {
            return Err(Error::InvalidStroke(stroke));
        }
        Ok(())
    }
}

/// What happened to a single glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlyphOutcome {
    Transformed,
    /// No outline to transform.
    Empty,
    Excluded(ExclusionReason),
    /// Transform failed or timed out; the original outline was kept.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphFailure {
    pub glyph_id: u32,
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct TransformReport {
    pub transformed: usize,
    pub empty: usize,
    pub excluded: BTreeMap<ExclusionReason, usize>,
    pub failed: Vec<GlyphFailure>,
    pub contours_reversed: usize,
}

impl TransformReport {
    pub fn excluded_total(&self) -> usize {
        self.excluded.values().sum()
    }

    pub fn total(&self) -> usize {
        self.transformed + self.empty + self.excluded_total() + self.failed.len()
    }

    pub(crate) fn record(&mut self, glyph_id: u32, name: &str, outcome: &GlyphOutcome) {
        match outcome {
            GlyphOutcome::Transformed => self.transformed += 1,
            GlyphOutcome::Empty => self.empty += 1,
            GlyphOutcome::Excluded(reason) => *self.excluded.entry(*reason).or_default() += 1,
            GlyphOutcome::Failed(error) => self.failed.push(GlyphFailure {
                glyph_id,
                name: name.to_string(),
                error: error.clone(),
            }),
        }
    }
}

/// Output of a glyph table rewrite.
#[derive(Debug, Clone)]
pub struct Transformed {
    pub data: Vec<u8>,
    pub report: TransformReport,
}

/// A glyph the exclusion rules would leave untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedGlyph {
    pub glyph_id: u32,
    pub name: String,
    pub codepoints: Vec<u32>,
    pub reason: ExclusionReason,
}
