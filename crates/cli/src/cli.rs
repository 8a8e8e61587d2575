//! CLI definitions and command dispatch.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::debug;
use restyle_core::{
    AdvanceMode, CodepointRange, ExclusionRules, Variant, VariantOptions,
    config::{DEFAULT_ITALIC_ANGLE, DEFAULT_STROKE},
    generate_variants, inspect,
};

#[derive(Parser)]
#[command(name = "restyle")]
#[command(about = "Generate bold and italic variants of TrueType fonts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Which glyphs keep their original outlines.
#[derive(Debug, Clone, Default, Args)]
pub struct ExclusionArgs {
    /// Transform private use area glyphs (icon fonts, Powerline symbols)
    #[arg(long)]
    pub include_pua: bool,
    /// Transform emoji and dingbats
    #[arg(long)]
    pub include_emoji: bool,
    /// Transform arrows, box drawing, block elements and braille
    #[arg(long)]
    pub include_symbols: bool,
    /// Also skip glyphs whose name contains MARKER (case-insensitive)
    #[arg(long = "exclude-name", value_name = "MARKER")]
    pub exclude_names: Vec<String>,
    /// Also skip glyphs mapped from a codepoint range, e.g. U+E000-U+F8FF
    #[arg(long = "exclude-range", value_name = "RANGE", value_parser = parse_range)]
    pub exclude_ranges: Vec<CodepointRange>,
}

impl ExclusionArgs {
    pub fn rules(&self) -> ExclusionRules {
        let mut rules = ExclusionRules {
            private_use: !self.include_pua,
            emoji: !self.include_emoji,
            symbols: !self.include_symbols,
            ..ExclusionRules::default()
        };
        for marker in &self.exclude_names {
            rules = rules.with_marker(marker.clone());
        }
        for range in &self.exclude_ranges {
            rules = rules.with_range(range.clone());
        }
        rules
    }
}

#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Font files, or directories of .ttf files
    #[arg(required = true)]
    pub fonts: Vec<PathBuf>,
    /// Write variants here instead of next to each input
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Overwrite existing outputs
    #[arg(short, long)]
    pub force: bool,
    /// Per-glyph time limit in seconds (0 disables)
    #[arg(long, value_name = "SECS", default_value = "5", value_parser = parse_seconds)]
    pub timeout: Duration,
    /// Keep contour directions as they are
    #[arg(long)]
    pub no_correct_direction: bool,
    #[command(flatten)]
    pub exclusions: ExclusionArgs,
}

#[derive(Debug, Clone, Args)]
pub struct StrokeArgs {
    /// Stroke width in font units
    #[arg(long, default_value_t = DEFAULT_STROKE)]
    pub stroke: f64,
    /// Keep advance widths (for monospaced fonts)
    #[arg(long)]
    pub preserve_advance: bool,
}

impl Default for StrokeArgs {
    fn default() -> Self {
        Self { stroke: DEFAULT_STROKE, preserve_advance: false }
    }
}

#[derive(Debug, Clone, Args)]
pub struct AngleArgs {
    /// Slant in degrees, positive leaning right
    #[arg(long, default_value_t = DEFAULT_ITALIC_ANGLE, allow_negative_numbers = true)]
    pub angle: f64,
}

impl Default for AngleArgs {
    fn default() -> Self {
        Self { angle: DEFAULT_ITALIC_ANGLE }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Embolden fonts
    Bold {
        #[command(flatten)]
        stroke: StrokeArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Slant fonts
    Italic {
        #[command(flatten)]
        angle: AngleArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Embolden and slant fonts
    BoldItalic {
        #[command(flatten)]
        stroke: StrokeArgs,
        #[command(flatten)]
        angle: AngleArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Generate bold, italic and bold italic variants
    All {
        #[command(flatten)]
        stroke: StrokeArgs,
        #[command(flatten)]
        angle: AngleArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// List glyphs that would keep their original outlines
    Inspect {
        font: PathBuf,
        #[command(flatten)]
        exclusions: ExclusionArgs,
    },
}

fn variant_options(stroke: &StrokeArgs, angle: &AngleArgs, output: &OutputArgs) -> VariantOptions {
    VariantOptions {
        stroke: stroke.stroke,
        italic_angle: angle.angle,
        advance_mode: if stroke.preserve_advance {
            AdvanceMode::Preserve
        } else {
            AdvanceMode::Expand
        },
        correct_direction: !output.no_correct_direction,
        exclusions: output.exclusions.rules(),
        glyph_timeout: (!output.timeout.is_zero()).then_some(output.timeout),
        output_dir: output.output_dir.clone(),
        force: output.force,
    }
}

fn generate(
    variants: &[Variant],
    stroke: &StrokeArgs,
    angle: &AngleArgs,
    output: &OutputArgs,
) -> Result<()> {
    let options = variant_options(stroke, angle, output);
    debug!("Options: {options:?}");
    generate_variants(&output.fonts, variants, &options)
}

fn print_excluded(font: &Path, rules: &ExclusionRules) -> Result<()> {
    let excluded = inspect(font, rules)?;
    for glyph in &excluded {
        let codepoints: Vec<String> =
            glyph.codepoints.iter().map(|cp| format!("U+{cp:04X}")).collect();
        println!(
            "{:>6}  {:<32} {:<16} {}",
            glyph.glyph_id,
            glyph.name,
            codepoints.join(","),
            glyph.reason
        );
    }
    println!("{}: {} glyphs excluded", font.display(), excluded.len());
    Ok(())
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Bold { stroke, output } => {
                generate(&[Variant::Bold], &stroke, &AngleArgs::default(), &output)?;
            }
            Commands::Italic { angle, output } => {
                generate(&[Variant::Italic], &StrokeArgs::default(), &angle, &output)?;
            }
            Commands::BoldItalic { stroke, angle, output } => {
                generate(&[Variant::BoldItalic], &stroke, &angle, &output)?;
            }
            Commands::All { stroke, angle, output } => {
                generate(&Variant::ALL, &stroke, &angle, &output)?;
            }
            Commands::Inspect { font, exclusions } => {
                print_excluded(&font, &exclusions.rules())?;
            }
        }
        Ok(())
    }
}

fn parse_range(s: &str) -> Result<CodepointRange, String> {
    s.parse::<CodepointRange>().map_err(|e| e.to_string())
}

fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|_| format!("Invalid number of seconds: {s}"))?;
    Duration::try_from_secs_f64(secs)
        .map_err(|_| format!("Timeout must be a non-negative number of seconds: {s}"))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use restyle_core::config::DEFAULT_GLYPH_TIMEOUT;

    use super::*;

    fn parse(args: &[&str]) -> Commands {
        Cli::try_parse_from(std::iter::once("restyle").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bold_defaults() {
        let Commands::Bold { stroke, output } = parse(&["bold", "Foo.ttf"]) else {
            panic!("expected bold");
        };
        assert_eq!(stroke.stroke, DEFAULT_STROKE);
        assert!(!stroke.preserve_advance);
        assert_eq!(output.fonts, [PathBuf::from("Foo.ttf")]);
        assert_eq!(output.timeout, DEFAULT_GLYPH_TIMEOUT);

        let options = variant_options(&stroke, &AngleArgs::default(), &output);
        assert_eq!(options.advance_mode, AdvanceMode::Expand);
        assert_eq!(options.glyph_timeout, Some(Duration::from_secs(5)));
        assert!(options.correct_direction);
        assert!(options.exclusions.private_use);
        assert!(!options.force);
    }

    #[test]
    fn test_bold_italic_flags() {
        let command = parse(&[
            "bold-italic",
            "--stroke",
            "40",
            "--angle",
            "-8",
            "--preserve-advance",
            "-o",
            "dist",
            "-f",
            "--timeout",
            "0",
            "--no-correct-direction",
            "A.ttf",
            "B.ttf",
        ]);
        let Commands::BoldItalic { stroke, angle, output } = command else {
            panic!("expected bold-italic");
        };

        let options = variant_options(&stroke, &angle, &output);
        assert_eq!(options.stroke, 40.0);
        assert_eq!(options.italic_angle, -8.0);
        assert_eq!(options.advance_mode, AdvanceMode::Preserve);
        assert_eq!(options.output_dir, Some(PathBuf::from("dist")));
        assert!(options.force);
        assert_eq!(options.glyph_timeout, None);
        assert!(!options.correct_direction);
        assert_eq!(output.fonts.len(), 2);
    }

    #[test]
    fn test_exclusion_flags() {
        let Commands::Inspect { font, exclusions } = parse(&[
            "inspect",
            "Foo.ttf",
            "--include-pua",
            "--include-symbols",
            "--exclude-name",
            "icon",
            "--exclude-range",
            "U+0030-U+0039",
        ]) else {
            panic!("expected inspect");
        };
        assert_eq!(font, PathBuf::from("Foo.ttf"));

        let rules = exclusions.rules();
        assert!(!rules.private_use);
        assert!(rules.emoji);
        assert!(!rules.symbols);
        assert!(rules.name_markers.iter().any(|m| m == "icon"));
        assert!(rules.name_markers.iter().any(|m| m == "powerline"));
        assert_eq!(rules.ranges, [CodepointRange::new(0x30, 0x39)]);
    }

    #[test]
    fn test_rejects_bad_values() {
        let parse_err = |args: &[&str]| {
            Cli::try_parse_from(std::iter::once("restyle").chain(args.iter().copied())).is_err()
        };
        assert!(parse_err(&["bold"]));
        assert!(parse_err(&["bold", "--timeout", "-1", "Foo.ttf"]));
        assert!(parse_err(&["bold", "--timeout", "1e30", "Foo.ttf"]));
        assert!(parse_err(&["italic", "--exclude-range", "U+ZZZZ", "Foo.ttf"]));
        assert!(parse_err(&["italic", "--stroke", "40", "Foo.ttf"]));
    }

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds("2.5"), Ok(Duration::from_millis(2500)));
        assert_eq!(parse_seconds("0"), Ok(Duration::ZERO));
        assert!(parse_seconds("NaN").is_err());
        assert!(parse_seconds("-1").is_err());
        assert!(parse_seconds("1e30").is_err());
        assert!(parse_seconds("soon").is_err());
    }
}
