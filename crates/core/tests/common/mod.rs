//! Synthetic TrueType fonts for pipeline tests.

#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use font_outline::{Contour, OutlinePoint, contours_to_simple};
use read_fonts::types::GlyphId;
use write_fonts::{
    FontBuilder,
    tables::{
        cmap::Cmap,
        glyf::{
            Anchor, Bbox, Component, ComponentFlags, CompositeGlyph, GlyfLocaBuilder, Glyph,
            Transform,
        },
        head::{Flags, Head, MacStyle},
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        loca::LocaFormat,
        maxp::Maxp,
        name::{Name, NameRecord},
        os2::{Os2, SelectionFlags},
        post::Post,
    },
    types::{FWord, Fixed, GlyphId16, LongDateTime, NameId, Tag, UfWord},
};

pub const ADVANCE: u16 = 600;
pub const UNITS_PER_EM: u16 = 1000;
pub const X_HEIGHT: i16 = 500;

pub const GID_NOTDEF: u32 = 0;
pub const GID_SPACE: u32 = 1;
pub const GID_O: u32 = 2;
pub const GID_I: u32 = 3;
pub const GID_PUA: u32 = 4;
pub const GID_BOX: u32 = 5;
pub const GID_IGRAVE: u32 = 6;
pub const GID_POWERLINE: u32 = 7;

/// Axis-aligned rectangle of on-curve points.
pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64, clockwise: bool) -> Contour {
    let mut points = vec![
        OutlinePoint::new(x0, y0, true),
        OutlinePoint::new(x0, y1, true),
        OutlinePoint::new(x1, y1, true),
        OutlinePoint::new(x1, y0, true),
    ];
    if !clockwise {
        points.reverse();
    }
    Contour::new(points)
}

fn simple(contours: &[Contour]) -> Glyph {
    Glyph::Simple(contours_to_simple(contours))
}

fn composite(base: u32, x: i16, y: i16) -> Glyph {
    let component = Component::new(
        GlyphId16::new(base as u16),
        Anchor::Offset { x, y },
        Transform::default(),
        ComponentFlags::default(),
    );
    Glyph::Composite(CompositeGlyph::new(component, Bbox::default()))
}

fn bbox_of(glyph: &Glyph) -> Option<Bbox> {
    match glyph {
        Glyph::Simple(simple) if !simple.contours.is_empty() => Some(simple.bbox),
        _ => None,
    }
}

/// `(name, codepoint, glyph)` for every glyph, in glyph id order.
///
/// The inner contour of `O` runs the same way as the outer one, so direction
/// correction has one contour to reverse.
fn glyphs() -> Vec<(&'static str, Option<char>, Glyph)> {
    vec![
        (".notdef", None, Glyph::Empty),
        ("space", Some(' '), Glyph::Empty),
        (
            "O",
            Some('O'),
            simple(&[rect(100.0, 0.0, 500.0, 700.0, true), rect(200.0, 100.0, 400.0, 600.0, true)]),
        ),
        ("I", Some('I'), simple(&[rect(250.0, 0.0, 350.0, 700.0, true)])),
        ("uniE000", Some('\u{E000}'), simple(&[rect(0.0, 0.0, 600.0, 700.0, true)])),
        ("uni2502", Some('\u{2502}'), simple(&[rect(250.0, -200.0, 350.0, 800.0, true)])),
        ("Igrave", Some('\u{CC}'), composite(GID_I, 0, 0)),
        ("powerline.arrow", None, simple(&[rect(0.0, 0.0, 300.0, 300.0, true)])),
    ]
}

fn name_record(name_id: u16, value: &str) -> NameRecord {
    NameRecord::new(3, 1, 0x409, NameId::new(name_id), value.to_string().into())
}

/// A static TrueType font named `{family} Regular`.
pub fn sample_font(family: &str) -> Vec<u8> {
    let glyphs = glyphs();
    let num_glyphs = glyphs.len() as u16;
    let postscript_family: String = family.split_whitespace().collect();

    let mut glyf_builder = GlyfLocaBuilder::new();
    for (_, _, glyph) in &glyphs {
        glyf_builder.add_glyph(glyph).unwrap();
    }
    let (glyf, loca, loca_format) = glyf_builder.build();

    let mappings: Vec<(char, GlyphId)> = glyphs
        .iter()
        .enumerate()
        .filter_map(|(gid, (_, ch, _))| ch.map(|ch| (ch, GlyphId::new(gid as u32))))
        .collect();
    let cmap = Cmap::from_mappings(mappings).expect("cmap");

    let hmtx = Hmtx {
        h_metrics: glyphs
            .iter()
            .map(|(_, _, glyph)| LongMetric {
                advance: ADVANCE,
                side_bearing: bbox_of(glyph).map(|b| b.x_min).unwrap_or(0),
            })
            .collect(),
        left_side_bearings: vec![],
    };

    let head = Head {
        font_revision: Fixed::from_f64(1.0),
        checksum_adjustment: 0,
        magic_number: 0x5F0F3CF5,
        flags: Flags::empty(),
        units_per_em: UNITS_PER_EM,
        created: LongDateTime::new(0),
        modified: LongDateTime::new(0),
        x_min: 0,
        y_min: -200,
        x_max: 600,
        y_max: 800,
        mac_style: MacStyle::empty(),
        lowest_rec_ppem: 8,
        font_direction_hint: 2,
        index_to_loc_format: match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        },
    };

    let hhea = Hhea {
        ascender: FWord::new(800),
        descender: FWord::new(-200),
        line_gap: FWord::new(0),
        advance_width_max: UfWord::new(ADVANCE),
        min_left_side_bearing: FWord::new(0),
        min_right_side_bearing: FWord::new(0),
        x_max_extent: FWord::new(600),
        caret_slope_rise: 1,
        caret_slope_run: 0,
        caret_offset: 0,
        number_of_h_metrics: num_glyphs,
    };

    let maxp = Maxp {
        num_glyphs,
        max_points: Some(8),
        max_contours: Some(2),
        max_composite_points: Some(4),
        max_composite_contours: Some(1),
        max_zones: Some(1),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(1),
        max_component_depth: Some(1),
    };

    let os2 = Os2 {
        x_avg_char_width: ADVANCE as i16,
        us_weight_class: 400,
        us_width_class: 5,
        fs_type: 0,
        y_subscript_x_size: 650,
        y_subscript_y_size: 600,
        y_subscript_x_offset: 0,
        y_subscript_y_offset: 75,
        y_superscript_x_size: 650,
        y_superscript_y_size: 600,
        y_superscript_x_offset: 0,
        y_superscript_y_offset: 350,
        y_strikeout_size: 50,
        y_strikeout_position: 300,
        s_family_class: 0,
        panose_10: [2, 11, 5, 9, 0, 0, 0, 0, 0, 0],
        ul_unicode_range_1: 0,
        ul_unicode_range_2: 0,
        ul_unicode_range_3: 0,
        ul_unicode_range_4: 0,
        ach_vend_id: Tag::new(b"NONE"),
        fs_selection: SelectionFlags::REGULAR,
        us_first_char_index: 0x20,
        us_last_char_index: 0xE000,
        s_typo_ascender: 800,
        s_typo_descender: -200,
        s_typo_line_gap: 0,
        us_win_ascent: 1000,
        us_win_descent: 200,
        ul_code_page_range_1: Some(0),
        ul_code_page_range_2: Some(0),
        sx_height: Some(X_HEIGHT),
        s_cap_height: Some(700),
        us_default_char: Some(0),
        us_break_char: Some(0x20),
        us_max_context: Some(0),
        us_lower_optical_point_size: None,
        us_upper_optical_point_size: None,
    };

    let post = Post::new_v2(glyphs.iter().map(|(name, _, _)| *name));

    let name = Name::new(vec![
        name_record(1, family),
        name_record(2, "Regular"),
        name_record(3, &format!("{family} Regular 1.000")),
        name_record(4, &format!("{family} Regular")),
        name_record(5, "Version 1.000"),
        name_record(6, &format!("{postscript_family}-Regular")),
    ]);

    let mut builder = FontBuilder::new();
    builder.add_table(&head).unwrap();
    builder.add_table(&hhea).unwrap();
    builder.add_table(&hmtx).unwrap();
    builder.add_table(&maxp).unwrap();
    builder.add_table(&os2).unwrap();
    builder.add_table(&cmap).unwrap();
    builder.add_table(&post).unwrap();
    builder.add_table(&name).unwrap();
    builder.add_table(&glyf).unwrap();
    builder.add_table(&loca).unwrap();
    builder.build()
}

/// Fresh, empty directory under the system temp dir.
pub fn scratch_dir(test_name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("restyle-tests")
        .join(format!("{test_name}-{}", std::process::id()));
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write the sample font to `{dir}/{file_name}`.
pub fn write_sample_font(dir: &Path, file_name: &str) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, sample_font("Sample Mono")).unwrap();
    path
}
