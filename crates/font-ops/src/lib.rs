//! Generic font table manipulation utilities.

use std::collections::BTreeMap;

use anyhow::Result;
use read_fonts::{FontRef, TableProvider, types::GlyphId};
use skrifa::MetadataProvider;
use write_fonts::{
    FontBuilder,
    tables::name::{Name, NameRecord},
};

/// Rewrite font data by applying a transformation function.
///
/// Copies all tables from the source font, then calls `f` to modify or add tables.
/// The function receives a reference to the source font and a mutable builder
/// that already contains all original tables.
pub fn rewrite_font(
    data: &[u8],
    f: impl FnOnce(&FontRef, &mut FontBuilder) -> Result<()>,
) -> Result<Vec<u8>> {
    let font = FontRef::new(data)?;
    let mut builder = FontBuilder::new();

    for record in font.table_directory.table_records() {
        let tag = record.tag();
        if let Some(table_data) = font.table_data(tag) {
            builder.add_raw(tag, table_data);
        }
    }

    f(&font, &mut builder)?;
    Ok(builder.build())
}

/// Windows platform, Unicode BMP encoding, US English.
const WINDOWS_PLATFORM_ID: u16 = 3;
const WINDOWS_UNICODE_BMP: u16 = 1;
const WINDOWS_ENGLISH_US: u16 = 0x409;

/// Map name table records using a transformation function.
///
/// The mapper receives `(name_id, current_string)` and returns:
/// - `Some(new_string)` to replace the record's string
/// - `None` to keep the current string unchanged
pub fn map_name_records(
    font: &FontRef,
    mapper: impl FnMut(u16, &str) -> Option<String>,
) -> Result<Name> {
    Ok(Name::new(mapped_name_records(font, mapper)?))
}

/// Like [`map_name_records`], then add a Windows English record for every
/// `(name_id, value)` in `required` the font has no Windows English record for.
pub fn map_name_records_with_required(
    font: &FontRef,
    mapper: impl FnMut(u16, &str) -> Option<String>,
    required: &[(u16, String)],
) -> Result<Name> {
    let mut records = mapped_name_records(font, mapper)?;

    for (name_id, value) in required {
        let present = records.iter().any(|record| {
            record.name_id.to_u16() == *name_id
                && record.platform_id == WINDOWS_PLATFORM_ID
                && record.language_id == WINDOWS_ENGLISH_US
        });
        if !present {
            records.push(NameRecord::new(
                WINDOWS_PLATFORM_ID,
                WINDOWS_UNICODE_BMP,
                WINDOWS_ENGLISH_US,
                read_fonts::types::NameId::new(*name_id),
                value.clone().into(),
            ));
        }
    }

    records.sort();
    Ok(Name::new(records))
}

fn mapped_name_records(
    font: &FontRef,
    mut mapper: impl FnMut(u16, &str) -> Option<String>,
) -> Result<Vec<NameRecord>> {
    let name = font.name()?;
    let mut new_records = Vec::new();

    for record in name.name_record() {
        let name_id = record.name_id().to_u16();
        let current = match record.string(name.string_data()) {
            Ok(s) => s.chars().collect::<String>(),
            Err(_) => continue,
        };

        let new_string = mapper(name_id, &current).unwrap_or(current);

        new_records.push(NameRecord::new(
            record.platform_id(),
            record.encoding_id(),
            record.language_id(),
            read_fonts::types::NameId::new(name_id),
            new_string.into(),
        ));
    }

    Ok(new_records)
}

/// First decodable string for `name_id`, if the font has one.
pub fn name_string(font: &FontRef, name_id: u16) -> Option<String> {
    let name = font.name().ok()?;
    name.name_record()
        .iter()
        .filter(|record| record.name_id().to_u16() == name_id)
        .find_map(|record| record.string(name.string_data()).ok())
        .map(|s| s.chars().collect())
}

/// Reverse character map: glyph id to every codepoint that maps to it.
///
/// Codepoints are sorted ascending. Glyphs without a mapping are absent.
pub fn codepoints_by_glyph(font: &FontRef) -> BTreeMap<GlyphId, Vec<u32>> {
    let mut reverse: BTreeMap<GlyphId, Vec<u32>> = BTreeMap::new();
    for (codepoint, gid) in font.charmap().mappings() {
        reverse.entry(gid).or_default().push(codepoint);
    }
    for codepoints in reverse.values_mut() {
        codepoints.sort_unstable();
        codepoints.dedup();
    }
    reverse
}

/// Glyph names indexed by glyph id.
///
/// Names come from `post`; glyphs without one get a synthesized `gidN`.
pub fn glyph_names(font: &FontRef) -> Vec<String> {
    let num_glyphs = font.maxp().map(|m| m.num_glyphs()).unwrap_or(0) as u32;
    let names = font.glyph_names();

    (0..num_glyphs)
        .map(|gid| {
            names
                .get(GlyphId::new(gid))
                .map(|name| name.as_str().to_string())
                .unwrap_or_else(|| format!("gid{gid}"))
        })
        .collect()
}
