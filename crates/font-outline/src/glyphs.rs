//! `glyf`-level rewrite: transform every glyph, then rebuild the tables whose
//! values derive from outlines (`loca`, `hmtx`, `hhea`, `head`).

use kurbo::Vec2;
use log::{debug, info, warn};
use rayon::prelude::*;
use read_fonts::{
    FontRef, TableProvider,
    tables::glyf::{
        Anchor as ReadAnchor, CompositeGlyph as ReadCompositeGlyph, Glyph as ReadGlyph,
        SimpleGlyph as ReadSimpleGlyph,
    },
    types::{GlyphId, Tag},
};
use restyle_font_ops::{codepoints_by_glyph, glyph_names};
use write_fonts::{
    FontBuilder,
    from_obj::ToOwnedTable,
    tables::{
        glyf::{
            Anchor, Bbox, Component, ComponentFlags, CompositeGlyph, GlyfLocaBuilder, Glyph,
            SimpleGlyph, Transform,
        },
        head::Head,
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
    },
};

use crate::{
    Error, Result,
    contour::{Orientation, clamp_i16, contours_from_simple, contours_to_simple},
    deadline::Deadline,
    direction::correct_direction,
    embolden::embolden_contour,
    exclusion::ExclusionRules,
    skew::Skew,
    types::{
        AdvanceMode, ExcludedGlyph, GlyphOutcome, TransformOptions, TransformReport, Transformed,
    },
};

const REPLACED_TABLES: [Tag; 5] = [
    Tag::new(b"glyf"),
    Tag::new(b"loca"),
    Tag::new(b"hmtx"),
    Tag::new(b"hhea"),
    Tag::new(b"head"),
];

/// Per-font settings every glyph job shares.
struct GlyphContext<'a> {
    options: &'a TransformOptions,
    edge_offset: Option<f64>,
    skew: Option<Skew>,
}

struct ProcessedGlyph {
    glyph: Glyph,
    outcome: GlyphOutcome,
    reversed: usize,
    /// Source composite, restored if one of its components is left untouched.
    original_composite: Option<Glyph>,
}

impl ProcessedGlyph {
    fn new(glyph: Glyph, outcome: GlyphOutcome) -> Self {
        Self { glyph, outcome, reversed: 0, original_composite: None }
    }
}

fn ensure_static_glyf(font: &FontRef) -> Result<()> {
    if font.fvar().is_ok() || font.gvar().is_ok() {
        return Err(Error::VariableFont);
    }
    Ok(())
}

/// Embolden and/or slant every eligible glyph of a static TrueType font.
///
/// Glyphs are processed in parallel. A glyph that fails or exceeds the
/// per-glyph timeout keeps its original outline and is listed in the report.
///
/// # Errors
///
/// - `Error::NoGlyf` if the font has no `glyf`/`loca` tables (CFF outlines)
/// - `Error::VariableFont` if the font has `fvar` or `gvar`
/// - `Error::InvalidStroke` / `Error::InvalidAngle` for unusable options
pub fn transform_glyphs(data: &[u8], options: &TransformOptions) -> Result<Transformed> {
    options.validate()?;

    let font = FontRef::new(data)?;
    let glyf = font.glyf().map_err(|_| Error::NoGlyf)?;
    let loca = font.loca(None).map_err(|_| Error::NoGlyf)?;
    ensure_static_glyf(&font)?;

    let skew = match options.italic_angle {
        Some(angle) => {
            let origin_y = font
                .os2()
                .ok()
                .and_then(|os2| os2.sx_height())
                .map(|x_height| f64::from(x_height) / 2.0)
                .unwrap_or(0.0);
            Some(Skew::from_degrees(angle, origin_y)?)
        }
        None => None,
    };

    let ctx = GlyphContext { options, edge_offset: options.edge_offset(), skew };

    let num_glyphs = font.maxp()?.num_glyphs() as u32;
    let names = glyph_names(&font);
    let codepoints = codepoints_by_glyph(&font);

    info!("Transforming {num_glyphs} glyphs");

    let processed: Vec<ProcessedGlyph> = (0..num_glyphs)
        .into_par_iter()
        .map(|gid| {
            let glyph_id = GlyphId::new(gid);
            let glyph = loca.get_glyf(glyph_id, &glyf)?;
            let cps = codepoints.get(&glyph_id).map(Vec::as_slice).unwrap_or(&[]);
            let name = names.get(gid as usize).map(String::as_str).unwrap_or_default();
            Ok(process_glyph(&ctx, glyph, cps, name))
        })
        .collect::<Result<_>>()?;
    let processed = resolve_composite_outcomes(processed, &names);

    let mut report = TransformReport::default();
    let mut glyphs = Vec::with_capacity(processed.len());
    let mut outcomes = Vec::with_capacity(processed.len());

    for (gid, item) in processed.into_iter().enumerate() {
        let name = names.get(gid).map(String::as_str).unwrap_or_default();
        match &item.outcome {
            GlyphOutcome::Transformed => debug!("Processed glyph: {name}"),
            GlyphOutcome::Failed(error) => warn!("Error processing glyph '{name}': {error}"),
            GlyphOutcome::Excluded(reason) => debug!("Skipped glyph {name} ({reason})"),
            GlyphOutcome::Empty => {}
        }
        report.record(gid as u32, name, &item.outcome);
        report.contours_reversed += item.reversed;
        glyphs.push(item.glyph);
        outcomes.push(item.outcome);
    }

    let bboxes = resolve_composite_bboxes(&mut glyphs);

    let advance_delta = match (options.advance_mode, options.stroke) {
        (AdvanceMode::Expand, Some(stroke)) => advance_growth(stroke) as i32,
        _ => 0,
    };

    let hmtx = font.hmtx()?;
    let mut advances = Vec::with_capacity(glyphs.len());
    let mut lsbs = Vec::with_capacity(glyphs.len());
    let mut bounds = FontBounds::new();

    for (gid, (outcome, bbox)) in outcomes.iter().zip(&bboxes).enumerate() {
        let glyph_id = GlyphId::new(gid as u32);
        let advance = hmtx.advance(glyph_id).unwrap_or(0);
        let advance = if *outcome == GlyphOutcome::Transformed {
            (i32::from(advance) + advance_delta).clamp(0, i32::from(u16::MAX)) as u16
        } else {
            advance
        };
        let lsb = match bbox {
            Some(bbox) => bbox.x_min,
            None => hmtx.side_bearing(glyph_id).unwrap_or(0),
        };

        bounds.update(bbox.as_ref(), advance);
        advances.push(advance);
        lsbs.push(lsb);
    }
    bounds.finalize();

    let mut glyf_builder = GlyfLocaBuilder::new();
    for glyph in &glyphs {
        glyf_builder.add_glyph(glyph)?;
    }
    let (new_glyf, new_loca, loca_format) = glyf_builder.build();

    let (new_hmtx, num_long_metrics) = build_hmtx(&advances, &lsbs);

    let mut builder = FontBuilder::new();
    for record in font.table_directory.table_records() {
        let tag = record.tag();
        if REPLACED_TABLES.contains(&tag) {
            continue;
        }
        if let Some(table_data) = font.table_data(tag) {
            builder.add_raw(tag, table_data);
        }
    }

    builder.add_table(&new_glyf)?;
    builder.add_table(&new_loca)?;
    builder.add_table(&new_hmtx)?;

    let mut new_head: Head = font.head()?.to_owned_table();
    new_head.x_min = bounds.x_min;
    new_head.y_min = bounds.y_min;
    new_head.x_max = bounds.x_max;
    new_head.y_max = bounds.y_max;
    new_head.index_to_loc_format = loca_format as i16;
    builder.add_table(&new_head)?;

    let mut new_hhea: Hhea = font.hhea()?.to_owned_table();
    new_hhea.advance_width_max = bounds.advance_width_max.into();
    new_hhea.min_left_side_bearing = bounds.min_left_side_bearing.into();
    new_hhea.min_right_side_bearing = bounds.min_right_side_bearing.into();
    new_hhea.x_max_extent = bounds.x_max_extent.into();
    new_hhea.number_of_h_metrics = num_long_metrics;
    builder.add_table(&new_hhea)?;

    info!(
        "Transformed {} glyphs ({} empty, {} excluded, {} failed, {} contours reversed)",
        report.transformed,
        report.empty,
        report.excluded_total(),
        report.failed.len(),
        report.contours_reversed
    );

    Ok(Transformed { data: builder.build(), report })
}

/// List the glyphs `rules` would leave untouched, without transforming anything.
pub fn excluded_glyphs(data: &[u8], rules: &ExclusionRules) -> Result<Vec<ExcludedGlyph>> {
    let font = FontRef::new(data)?;
    let names = glyph_names(&font);
    let codepoints = codepoints_by_glyph(&font);

    Ok(names
        .into_iter()
        .enumerate()
        .filter_map(|(gid, name)| {
            let cps = codepoints.get(&GlyphId::new(gid as u32)).cloned().unwrap_or_default();
            rules.classify(&cps, &name).map(|reason| ExcludedGlyph {
                glyph_id: gid as u32,
                name,
                codepoints: cps,
                reason,
            })
        })
        .collect())
}

fn process_glyph(
    ctx: &GlyphContext,
    glyph: Option<ReadGlyph>,
    codepoints: &[u32],
    name: &str,
) -> ProcessedGlyph {
    let glyph = match glyph {
        Some(ReadGlyph::Simple(simple)) if simple.num_points() > 0 => ReadGlyph::Simple(simple),
        Some(ReadGlyph::Composite(composite)) if composite.components().next().is_some() => {
            ReadGlyph::Composite(composite)
        }
        _ => return ProcessedGlyph::new(Glyph::Empty, GlyphOutcome::Empty),
    };

    if let Some(reason) = ctx.options.exclusions.classify(codepoints, name) {
        return ProcessedGlyph::new(owned_glyph(&glyph), GlyphOutcome::Excluded(reason));
    }

    let deadline = Deadline::start(ctx.options.glyph_timeout);
    let result = match &glyph {
        ReadGlyph::Simple(simple) => transform_simple(ctx, simple, &deadline)
            .map(|(simple, reversed)| (Glyph::Simple(simple), reversed)),
        ReadGlyph::Composite(composite) => {
            transform_composite(ctx, composite, &deadline).map(|composite| (composite, 0))
        }
    };

    match result {
        Ok((new_glyph, reversed)) => ProcessedGlyph {
            glyph: new_glyph,
            outcome: GlyphOutcome::Transformed,
            reversed,
            original_composite: matches!(glyph, ReadGlyph::Composite(_))
                .then(|| owned_glyph(&glyph)),
        },
        Err(e) => ProcessedGlyph::new(owned_glyph(&glyph), GlyphOutcome::Failed(e.to_string())),
    }
}

/// A transformed composite is only consistent if every component was
/// transformed too. Otherwise it keeps its source outline and advance and
/// takes on the first untouched component's outcome.
fn resolve_composite_outcomes(
    mut processed: Vec<ProcessedGlyph>,
    names: &[String],
) -> Vec<ProcessedGlyph> {
    let mut changed = true;
    while changed {
        changed = false;
        for gid in 0..processed.len() {
            let item = &processed[gid];
            let (Glyph::Composite(composite), Some(_)) = (&item.glyph, &item.original_composite)
            else {
                continue;
            };
            if item.outcome != GlyphOutcome::Transformed {
                continue;
            }

            let inherited = composite.components().iter().find_map(|component| {
                let base = component.glyph.to_u16() as usize;
                let outcome = &processed.get(base)?.outcome;
                match outcome {
                    GlyphOutcome::Excluded(reason) => Some(GlyphOutcome::Excluded(*reason)),
                    GlyphOutcome::Failed(_) => {
                        let name = names.get(base).map(String::as_str).unwrap_or_default();
                        let error = format!("component '{name}' was not transformed");
                        Some(GlyphOutcome::Failed(error))
                    }
                    GlyphOutcome::Transformed | GlyphOutcome::Empty => None,
                }
            });

            if let Some(outcome) = inherited {
                let item = &mut processed[gid];
                if let Some(original) = item.original_composite.take() {
                    item.glyph = original;
                }
                item.outcome = outcome;
                changed = true;
            }
        }
    }
    processed
}

fn owned_glyph(glyph: &ReadGlyph) -> Glyph {
    match glyph {
        ReadGlyph::Simple(simple) => {
            let owned: SimpleGlyph = simple.to_owned_table();
            Glyph::Simple(owned)
        }
        ReadGlyph::Composite(composite) => {
            let owned: CompositeGlyph = composite.to_owned_table();
            Glyph::Composite(owned)
        }
    }
}

fn transform_simple(
    ctx: &GlyphContext,
    simple: &ReadSimpleGlyph,
    deadline: &Deadline,
) -> Result<(SimpleGlyph, usize)> {
    let mut contours = contours_from_simple(simple);
    deadline.check()?;

    let reversed = if ctx.options.correct_direction {
        correct_direction(&mut contours, deadline)?
    } else {
        0
    };

    if let (Some(offset), Some(stroke)) = (ctx.edge_offset, ctx.options.stroke) {
        let orientation = Orientation::of(&contours);
        for contour in &mut contours {
            deadline.check()?;
            embolden_contour(contour, offset, orientation);
        }
        if ctx.options.advance_mode == AdvanceMode::Expand {
            let shift = Vec2::new(advance_growth(stroke) / 2.0, 0.0);
            for contour in &mut contours {
                contour.translate(shift);
            }
        }
    }

    if let Some(skew) = ctx.skew {
        let affine = skew.affine();
        for contour in &mut contours {
            deadline.check()?;
            contour.apply_affine(affine);
        }
    }

    deadline.check()?;
    Ok((contours_to_simple(&contours), reversed))
}

/// Whole units an expanded glyph's advance grows by. The outline moves right
/// by half of it so both side bearings stay put.
fn advance_growth(stroke: f64) -> f64 {
    stroke.round()
}

/// Composites inherit stroke and shift from their components; only the
/// component offsets need shearing.
fn transform_composite(
    ctx: &GlyphContext,
    composite: &ReadCompositeGlyph,
    deadline: &Deadline,
) -> Result<Glyph> {
    deadline.check()?;
    let mut components = Vec::new();
    for c in composite.components() {
        deadline.check()?;
        let anchor = match (c.anchor, ctx.skew) {
            (ReadAnchor::Offset { x, y }, Some(skew)) => {
                let offset = skew.apply_offset(Vec2::new(f64::from(x), f64::from(y)));
                Anchor::Offset { x: clamp_i16(offset.x), y: clamp_i16(offset.y) }
            }
            (ReadAnchor::Offset { x, y }, None) => Anchor::Offset { x, y },
            (ReadAnchor::Point { base, component }, _) => Anchor::Point { base, component },
        };

        let t = c.transform;
        let transform = Transform { xx: t.xx, yx: t.yx, xy: t.xy, yy: t.yy };

        components.push(Component::new(c.glyph, anchor, transform, ComponentFlags::from(c.flags)));
    }

    let mut components = components.into_iter();
    let Some(first) = components.next() else {
        return Ok(Glyph::Empty);
    };

    let mut new_composite = CompositeGlyph::new(first, Bbox::default());
    for component in components {
        new_composite.add_component(component, Bbox::default());
    }

    Ok(Glyph::Composite(new_composite))
}

#[derive(Debug, Clone, Copy)]
enum Extent {
    Pending,
    Empty,
    Bounds(Bbox),
}

/// Recompute composite bounding boxes from their (possibly nested) components.
///
/// Returns the bounding box of every glyph, `None` for empty glyphs. Composites
/// whose components never resolve (cycles, missing glyphs) keep their stored box.
fn resolve_composite_bboxes(glyphs: &mut [Glyph]) -> Vec<Option<Bbox>> {
    let mut extents: Vec<Extent> = glyphs
        .iter()
        .map(|glyph| match glyph {
            Glyph::Simple(simple) if !simple.contours.is_empty() => Extent::Bounds(simple.bbox),
            Glyph::Composite(_) => Extent::Pending,
            _ => Extent::Empty,
        })
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for gid in 0..glyphs.len() {
            if !matches!(extents[gid], Extent::Pending) {
                continue;
            }
            let Glyph::Composite(composite) = &glyphs[gid] else {
                continue;
            };
            let Some(extent) = composite_extent(composite, &extents) else {
                continue;
            };
            if let (Extent::Bounds(bbox), Glyph::Composite(composite)) = (extent, &mut glyphs[gid])
            {
                composite.bbox = bbox;
            }
            extents[gid] = extent;
            changed = true;
        }
    }

    extents
        .iter()
        .zip(glyphs.iter())
        .map(|(extent, glyph)| match (extent, glyph) {
            (Extent::Bounds(bbox), _) => Some(*bbox),
            (Extent::Pending, Glyph::Composite(composite)) => Some(composite.bbox),
            _ => None,
        })
        .collect()
}

/// `None` while a component is still pending.
fn composite_extent(composite: &CompositeGlyph, extents: &[Extent]) -> Option<Extent> {
    let mut x_min = f64::MAX;
    let mut y_min = f64::MAX;
    let mut x_max = f64::MIN;
    let mut y_max = f64::MIN;
    let mut has_content = false;

    for component in composite.components() {
        let bbox = match extents.get(component.glyph.to_u16() as usize) {
            Some(Extent::Bounds(bbox)) => bbox,
            Some(Extent::Pending) => return None,
            Some(Extent::Empty) | None => continue,
        };

        let (dx, dy) = match component.anchor {
            Anchor::Offset { x, y } => (f64::from(x), f64::from(y)),
            Anchor::Point { .. } => (0.0, 0.0),
        };
        let t = &component.transform;
        let (xx, xy) = (f64::from(t.xx.to_f32()), f64::from(t.xy.to_f32()));
        let (yx, yy) = (f64::from(t.yx.to_f32()), f64::from(t.yy.to_f32()));

        let corners = [
            (bbox.x_min, bbox.y_min),
            (bbox.x_min, bbox.y_max),
            (bbox.x_max, bbox.y_min),
            (bbox.x_max, bbox.y_max),
        ];
        for (cx, cy) in corners {
            let (cx, cy) = (f64::from(cx), f64::from(cy));
            let x = xx * cx + xy * cy + dx;
            let y = yx * cx + yy * cy + dy;
            x_min = x_min.min(x);
            y_min = y_min.min(y);
            x_max = x_max.max(x);
            y_max = y_max.max(y);
            has_content = true;
        }
    }

    if !has_content {
        return Some(Extent::Empty);
    }

    Some(Extent::Bounds(Bbox {
        x_min: clamp_i16(x_min),
        y_min: clamp_i16(y_min),
        x_max: clamp_i16(x_max),
        y_max: clamp_i16(y_max),
    }))
}

/// Build `hmtx`, folding a trailing run of equal advances into the short form.
fn build_hmtx(advances: &[u16], lsbs: &[i16]) -> (Hmtx, u16) {
    let mut num_long = advances.len();
    while num_long > 1 && advances[num_long - 1] == advances[num_long - 2] {
        num_long -= 1;
    }

    let h_metrics = advances[..num_long]
        .iter()
        .zip(lsbs)
        .map(|(&advance, &side_bearing)| LongMetric { advance, side_bearing })
        .collect();
    let left_side_bearings = lsbs[num_long.min(lsbs.len())..].to_vec();

    (Hmtx::new(h_metrics, left_side_bearings), num_long as u16)
}

/// Font-wide extents accumulated from glyph boxes and advances.
#[derive(Debug, Clone, Copy)]
struct FontBounds {
    x_min: i16,
    x_max: i16,
    y_min: i16,
    y_max: i16,
    min_left_side_bearing: i16,
    min_right_side_bearing: i16,
    x_max_extent: i16,
    advance_width_max: u16,
}

impl FontBounds {
    fn new() -> Self {
        FontBounds {
            x_min: i16::MAX,
            x_max: i16::MIN,
            y_min: i16::MAX,
            y_max: i16::MIN,
            min_left_side_bearing: i16::MAX,
            min_right_side_bearing: i16::MAX,
            x_max_extent: i16::MIN,
            advance_width_max: 0,
        }
    }

    fn update(&mut self, bbox: Option<&Bbox>, advance: u16) {
        self.advance_width_max = self.advance_width_max.max(advance);

        let Some(bbox) = bbox else {
            return;
        };

        self.x_min = self.x_min.min(bbox.x_min);
        self.x_max = self.x_max.max(bbox.x_max);
        self.y_min = self.y_min.min(bbox.y_min);
        self.y_max = self.y_max.max(bbox.y_max);

        let lsb = bbox.x_min;
        self.min_left_side_bearing = self.min_left_side_bearing.min(lsb);

        let glyph_width = bbox.x_max.saturating_sub(bbox.x_min);
        let rsb = (advance as i16).saturating_sub(lsb).saturating_sub(glyph_width);
        self.min_right_side_bearing = self.min_right_side_bearing.min(rsb);

        self.x_max_extent = self.x_max_extent.max(lsb.saturating_add(glyph_width));
    }

    fn finalize(&mut self) {
        if self.x_min == i16::MAX {
            *self = FontBounds { advance_width_max: self.advance_width_max, ..Default::default() };
        }
    }
}

impl Default for FontBounds {
    fn default() -> Self {
        FontBounds {
            x_min: 0,
            x_max: 0,
            y_min: 0,
            y_max: 0,
            min_left_side_bearing: 0,
            min_right_side_bearing: 0,
            x_max_extent: 0,
            advance_width_max: 0,
        }
    }
}
