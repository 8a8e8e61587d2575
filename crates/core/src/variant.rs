//! Style variant definitions.

use std::{fmt, path::PathBuf, time::Duration};

use font_outline::{AdvanceMode, ExclusionRules, TransformOptions};
use restyle_font_metadata::StyleMetadata;

use crate::config::{
    BOLD_WEIGHT_CLASS, DEFAULT_GLYPH_TIMEOUT, DEFAULT_ITALIC_ANGLE, DEFAULT_STROKE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Bold,
    Italic,
    BoldItalic,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Bold, Variant::Italic, Variant::BoldItalic];

    /// Subfamily name, e.g. `Bold Italic`.
    pub const fn style_name(self) -> &'static str {
        match self {
            Variant::Bold => "Bold",
            Variant::Italic => "Italic",
            Variant::BoldItalic => "Bold Italic",
        }
    }

    pub const fn postscript_suffix(self) -> &'static str {
        match self {
            Variant::Bold => "Bold",
            Variant::Italic => "Italic",
            Variant::BoldItalic => "BoldItalic",
        }
    }

    /// Appended to the input file stem, e.g. `Foo-bold.ttf`.
    pub const fn file_suffix(self) -> &'static str {
        match self {
            Variant::Bold => "bold",
            Variant::Italic => "italic",
            Variant::BoldItalic => "bolditalic",
        }
    }

    pub const fn is_bold(self) -> bool {
        matches!(self, Variant::Bold | Variant::BoldItalic)
    }

    pub const fn is_italic(self) -> bool {
        matches!(self, Variant::Italic | Variant::BoldItalic)
    }

    pub fn transform_options(self, options: &VariantOptions) -> TransformOptions {
        TransformOptions {
            stroke: self.is_bold().then_some(options.stroke),
            italic_angle: self.is_italic().then_some(options.italic_angle),
            advance_mode: options.advance_mode,
            correct_direction: options.correct_direction,
            exclusions: options.exclusions.clone(),
            glyph_timeout: options.glyph_timeout,
        }
    }

    pub fn style_metadata(self, options: &VariantOptions) -> StyleMetadata {
        let mut metadata = StyleMetadata::new(self.style_name());
        if self.is_bold() {
            metadata = metadata.with_weight_class(BOLD_WEIGHT_CLASS);
        }
        if self.is_italic() {
            metadata = metadata.with_italic_angle(options.italic_angle);
        }
        metadata
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.style_name())
    }
}

/// Settings shared by every variant of one run.
#[derive(Debug, Clone)]
pub struct VariantOptions {
    /// Stroke width in font units, used by bold variants.
    pub stroke: f64,
    /// Slant in degrees, used by italic variants.
    pub italic_angle: f64,
    pub advance_mode: AdvanceMode,
    pub correct_direction: bool,
    pub exclusions: ExclusionRules,
    /// `None` disables the per-glyph guard.
    pub glyph_timeout: Option<Duration>,
    /// Write outputs here instead of next to each input.
    pub output_dir: Option<PathBuf>,
    /// Replace existing outputs.
    pub force: bool,
}

impl Default for VariantOptions {
    fn default() -> Self {
        Self {
            stroke: DEFAULT_STROKE,
            italic_angle: DEFAULT_ITALIC_ANGLE,
            advance_mode: AdvanceMode::default(),
            correct_direction: true,
            exclusions: ExclusionRules::default(),
            glyph_timeout: Some(DEFAULT_GLYPH_TIMEOUT),
            output_dir: None,
            force: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_names() {
        assert_eq!(Variant::BoldItalic.style_name(), "Bold Italic");
        assert_eq!(Variant::BoldItalic.postscript_suffix(), "BoldItalic");
        assert_eq!(Variant::BoldItalic.file_suffix(), "bolditalic");
        assert_eq!(Variant::Italic.to_string(), "Italic");
    }

    #[test]
    fn test_transform_options() {
        let options = VariantOptions::default();

        let bold = Variant::Bold.transform_options(&options);
        assert_eq!(bold.stroke, Some(DEFAULT_STROKE));
        assert_eq!(bold.italic_angle, None);
        assert_eq!(bold.glyph_timeout, Some(DEFAULT_GLYPH_TIMEOUT));

        let italic = Variant::Italic.transform_options(&options);
        assert_eq!(italic.stroke, None);
        assert_eq!(italic.italic_angle, Some(DEFAULT_ITALIC_ANGLE));

        let both = Variant::BoldItalic.transform_options(&options);
        assert!(both.stroke.is_some() && both.italic_angle.is_some());
    }

    #[test]
    fn test_style_metadata() {
        let options = VariantOptions { italic_angle: 10.0, ..VariantOptions::default() };

        let bold = Variant::Bold.style_metadata(&options);
        assert_eq!(bold.weight_class, Some(BOLD_WEIGHT_CLASS));
        assert_eq!(bold.italic_angle, None);
        assert_eq!(bold.naming.postscript_suffix, "Bold");

        let italic = Variant::Italic.style_metadata(&options);
        assert_eq!(italic.weight_class, None);
        assert_eq!(italic.italic_angle, Some(10.0));

        let both = Variant::BoldItalic.style_metadata(&options);
        assert_eq!(both.naming.style, "Bold Italic");
        assert!(both.is_bold() && both.is_italic());
    }
}
