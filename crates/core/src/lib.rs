//! Restyle Core - bold and italic variant generation for static TrueType fonts.

pub mod config;
pub mod io;
pub mod parallel;
pub mod pipeline;
pub mod variant;

pub use font_outline::{
    AdvanceMode, CodepointRange, ExcludedGlyph, ExclusionReason, ExclusionRules,
    TransformOptions, TransformReport,
};
pub use pipeline::{GeneratedFont, generate_variant, generate_variants, inspect, output_path};
pub use restyle_font_metadata::{StyleMetadata, StyleNaming};
pub use variant::{Variant, VariantOptions};
