//! Variant generation pipeline.
//!
//! One run per input font and variant:
//! read → update metadata → transform glyphs → write.

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result};
use font_outline::{
    ExcludedGlyph, ExclusionRules, TransformReport, excluded_glyphs, transform_glyphs,
};
use log::info;

use crate::{
    config::OUTPUT_EXTENSION,
    io::{FontFile, expand_inputs},
    parallel::run_parallel,
    variant::{Variant, VariantOptions},
};

const TOTAL_STEPS: usize = 4;

/// A variant written to disk.
#[derive(Debug, Clone)]
pub struct GeneratedFont {
    pub output: PathBuf,
    pub variant: Variant,
    pub report: TransformReport,
}

/// `{stem}-{suffix}.ttf`, next to the input unless `output_dir` is given.
pub fn output_path(input: &Path, output_dir: Option<&Path>, variant: Variant) -> PathBuf {
    let stem = input.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    let file_name = format!("{stem}-{}.{OUTPUT_EXTENSION}", variant.file_suffix());
    match output_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

/// Progress lines for one job, printed as a single block so parallel jobs
/// don't interleave.
struct Progress {
    lines: Vec<String>,
}

impl Progress {
    fn new(header: String) -> Self {
        Self { lines: vec![header] }
    }

    fn line(&mut self, line: String) {
        self.lines.push(line);
    }

    /// Run a named pipeline step with timing.
    fn run_step<T>(
        &mut self,
        name: &str,
        step_num: usize,
        f: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        self.line(format!("[{step_num}/{TOTAL_STEPS}] {name}"));
        let start = Instant::now();
        let value = f()?;
        self.line(format!("  ✓ {name} ({:.2}s)", start.elapsed().as_secs_f64()));
        Ok(value)
    }

    fn summary(&mut self, report: &TransformReport) {
        self.line(format!(
            "  Glyphs: {} transformed, {} excluded, {} empty, {} failed",
            report.transformed,
            report.excluded_total(),
            report.empty,
            report.failed.len()
        ));
        for (reason, count) in &report.excluded {
            self.line(format!("    {count} excluded ({reason})"));
        }
        for failure in &report.failed {
            self.line(format!("    ! {}: {}", failure.name, failure.error));
        }
    }

    fn print(self) {
        println!("{}", self.lines.join("\n"));
    }
}

/// Generate one variant of one font.
///
/// Fails before reading anything if the input is missing or the output
/// exists and `options.force` is unset.
pub fn generate_variant(
    input: &Path,
    variant: Variant,
    options: &VariantOptions,
) -> Result<GeneratedFont> {
    let source = FontFile::new(input);
    source.ensure_exists()?;

    let target = FontFile::new(output_path(input, options.output_dir.as_deref(), variant));
    target.ensure_writable(options.force)?;

    let mut progress =
        Progress::new(format!("\n{} → {} ({variant})", input.display(), target.path().display()));
    let report = run_steps(&mut progress, &source, &target, variant, options);
    progress.print();
    let report = report?;
    info!("{variant} font generated: {}", target.path().display());

    Ok(GeneratedFont { output: target.path().to_path_buf(), variant, report })
}

fn run_steps(
    progress: &mut Progress,
    source: &FontFile,
    target: &FontFile,
    variant: Variant,
    options: &VariantOptions,
) -> Result<TransformReport> {
    let input = source.path();
    let data = progress.run_step("Read font", 1, || source.read())?;

    let data = progress.run_step("Update metadata", 2, || {
        variant
            .style_metadata(options)
            .apply(&data)
            .with_context(|| format!("Failed to update metadata: {}", input.display()))
    })?;

    let transformed = progress.run_step("Transform glyphs", 3, || {
        transform_glyphs(&data, &variant.transform_options(options))
            .with_context(|| format!("Failed to transform glyphs: {}", input.display()))
    })?;
    progress.summary(&transformed.report);

    progress.run_step("Write font", 4, || target.write(&transformed.data))?;
    Ok(transformed.report)
}

/// Generate every requested variant of every input in parallel.
///
/// Directory inputs expand to the fonts they contain. Fails if any variant
/// failed; the others are still written.
pub fn generate_variants(
    inputs: &[PathBuf],
    variants: &[Variant],
    options: &VariantOptions,
) -> Result<()> {
    let fonts = expand_inputs(inputs)?;
    let jobs: Vec<(&PathBuf, Variant)> = fonts
        .iter()
        .flat_map(|font| variants.iter().map(move |variant| (font, *variant)))
        .collect();

    let label = match variants {
        [variant] => format!("Generate {variant}"),
        _ => "Generate variants".to_string(),
    };

    run_parallel(&label, jobs, |(font, variant)| {
        generate_variant(font, variant, options)
            .with_context(|| format!("Failed to generate {variant} from {}", font.display()))
    })
    .ok_or_bail(&label)
}

/// List the glyphs `rules` would exclude, without writing anything.
pub fn inspect(input: &Path, rules: &ExclusionRules) -> Result<Vec<ExcludedGlyph>> {
    let source = FontFile::new(input);
    source.ensure_exists()?;
    let data = source.read()?;
    excluded_glyphs(&data, rules)
        .with_context(|| format!("Failed to inspect font: {}", input.display()))
}
