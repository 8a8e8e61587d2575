//! Font-wide style metadata (names, weight class, style bits, italic angle).

use anyhow::Result;
use log::debug;
use read_fonts::{FontRef, TableProvider};
use restyle_font_ops::{map_name_records_with_required, name_string, rewrite_font};
use write_fonts::{
    from_obj::ToOwnedTable,
    tables::{
        head::{Head, MacStyle},
        hhea::Hhea,
        os2::{Os2, SelectionFlags},
        post::Post,
    },
    types::Fixed,
};

/// Name table IDs.
const NAME_ID_SUBFAMILY: u16 = 2;
const NAME_ID_UNIQUE_ID: u16 = 3;
const NAME_ID_FULL_NAME: u16 = 4;
const NAME_ID_VERSION: u16 = 5;
const NAME_ID_POSTSCRIPT: u16 = 6;
const NAME_ID_TYPO_SUBFAMILY: u16 = 17;

pub const WEIGHT_CLASS_BOLD: u16 = 700;

/// PANOSE bWeight value for "Bold".
const PANOSE_WEIGHT_BOLD: u8 = 8;
const PANOSE_WEIGHT_INDEX: usize = 2;

/// Derives a variant's names from the regular font's names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleNaming {
    /// Subfamily, e.g. `Bold Italic`.
    pub style: String,
    /// PostScript style suffix, e.g. `BoldItalic`.
    pub postscript_suffix: String,
}

impl StyleNaming {
    pub fn new(style: impl Into<String>) -> Self {
        let style = style.into();
        let postscript_suffix = style.split_whitespace().collect();
        Self { style, postscript_suffix }
    }

    /// `Foo Regular` becomes `Foo Bold`; `Foo` becomes `Foo Bold`.
    pub fn full_name(&self, current: &str) -> String {
        let base = current.trim();
        let base = base
            .strip_suffix(" Regular")
            .or_else(|| base.strip_suffix(" regular"))
            .unwrap_or(base);
        format!("{base} {}", self.style)
    }

    /// `Foo-Regular` becomes `Foo-Bold`; `Foo` becomes `Foo-Bold`.
    pub fn postscript_name(&self, current: &str) -> String {
        let base = current.trim();
        let base = base
            .strip_suffix("-Regular")
            .or_else(|| base.strip_suffix("-regular"))
            .unwrap_or(base);
        format!("{base}-{}", self.postscript_suffix)
    }

    pub fn unique_id(full_name: &str, version: &str) -> String {
        format!("{full_name} {version}")
    }

    /// Map one name record, or `None` to keep it.
    fn rename(&self, name_id: u16, current: &str, unique_id: &str) -> Option<String> {
        match name_id {
            NAME_ID_SUBFAMILY | NAME_ID_TYPO_SUBFAMILY => Some(self.style.clone()),
            NAME_ID_UNIQUE_ID => Some(unique_id.to_string()),
            NAME_ID_FULL_NAME => Some(self.full_name(current)),
            NAME_ID_POSTSCRIPT => Some(self.postscript_name(current)),
            _ => None,
        }
    }
}

/// Version string for the unique ID: name ID 5 without its `Version ` prefix,
/// else `head.fontRevision`.
pub fn font_version(font: &FontRef) -> Option<String> {
    if let Some(version) = name_string(font, NAME_ID_VERSION) {
        let version = version.trim();
        let version = version.strip_prefix("Version ").unwrap_or(version);
        let version = version.split(';').next().unwrap_or(version).trim();
        if !version.is_empty() {
            return Some(version.to_string());
        }
    }
    font.head().ok().map(|head| format!("{:.3}", head.font_revision().to_f64()))
}

/// Font-wide changes for one style variant.
#[derive(Debug, Clone)]
pub struct StyleMetadata {
    pub naming: StyleNaming,
    /// Weight class to set, when the variant is bold.
    pub weight_class: Option<u16>,
    /// Slant in degrees, positive leaning right, when the variant is italic.
    pub italic_angle: Option<f64>,
}

impl StyleMetadata {
    pub fn new(style: impl Into<String>) -> Self {
        Self { naming: StyleNaming::new(style), weight_class: None, italic_angle: None }
    }

    pub fn with_weight_class(mut self, weight_class: u16) -> Self {
        self.weight_class = Some(weight_class);
        self
    }

    pub fn with_italic_angle(mut self, angle: f64) -> Self {
        self.italic_angle = Some(angle);
        self
    }

    pub fn is_bold(&self) -> bool {
        self.weight_class.is_some_and(|w| w >= WEIGHT_CLASS_BOLD)
    }

    pub fn is_italic(&self) -> bool {
        self.italic_angle.is_some()
    }

    /// Apply names, weight and style bits to font data.
    ///
    /// Tables the font lacks are skipped.
    pub fn apply(&self, data: &[u8]) -> Result<Vec<u8>> {
        rewrite_font(data, |font, builder| {
            if font.name().is_ok() {
                let full_name = name_string(font, NAME_ID_FULL_NAME)
                    .map(|current| self.naming.full_name(&current))
                    .unwrap_or_else(|| self.naming.style.clone());
                let unique_id = match font_version(font) {
                    Some(version) => StyleNaming::unique_id(&full_name, &version),
                    None => full_name.clone(),
                };
                debug!("Unique ID: {unique_id}");

                let required = [
                    (NAME_ID_SUBFAMILY, self.naming.style.clone()),
                    (NAME_ID_UNIQUE_ID, unique_id.clone()),
                    (NAME_ID_FULL_NAME, full_name.clone()),
                ];
                let new_name = map_name_records_with_required(
                    font,
                    |name_id, current| self.naming.rename(name_id, current, &unique_id),
                    &required,
                )?;
                builder.add_table(&new_name)?;
            }

            if let Ok(os2) = font.os2() {
                let mut new_os2: Os2 = os2.to_owned_table();
                self.update_os2(&mut new_os2);
                builder.add_table(&new_os2)?;
            }

            if let Ok(head) = font.head() {
                let mut new_head: Head = head.to_owned_table();
                self.update_head(&mut new_head);
                builder.add_table(&new_head)?;

                if let (Some(angle), Ok(hhea)) = (self.italic_angle, font.hhea()) {
                    let mut new_hhea: Hhea = hhea.to_owned_table();
                    let (rise, run) = caret_slope(new_head.units_per_em, angle);
                    new_hhea.caret_slope_rise = rise;
                    new_hhea.caret_slope_run = run;
                    builder.add_table(&new_hhea)?;
                }
            }

            if let (Some(angle), Ok(post)) = (self.italic_angle, font.post()) {
                let mut new_post: Post = post.to_owned_table();
                new_post.italic_angle = Fixed::from_f64(-angle);
                builder.add_table(&new_post)?;
            }

            Ok(())
        })
    }

    fn update_os2(&self, os2: &mut Os2) {
        if let Some(weight_class) = self.weight_class {
            os2.us_weight_class = weight_class;
        }
        if self.is_bold() {
            os2.fs_selection.insert(SelectionFlags::BOLD);
            os2.panose_10[PANOSE_WEIGHT_INDEX] = PANOSE_WEIGHT_BOLD;
        }
        if self.is_italic() {
            os2.fs_selection.insert(SelectionFlags::ITALIC);
        }
        if self.is_bold() || self.is_italic() {
            os2.fs_selection.remove(SelectionFlags::REGULAR);
        }
    }

    fn update_head(&self, head: &mut Head) {
        if self.is_bold() {
            head.mac_style.insert(MacStyle::BOLD);
        }
        if self.is_italic() {
            head.mac_style.insert(MacStyle::ITALIC);
        }
    }
}

/// Caret slope `(rise, run)` for a slant of `angle` degrees.
pub fn caret_slope(units_per_em: u16, angle: f64) -> (i16, i16) {
    let rise = units_per_em as f64;
    let run = (rise * angle.to_radians().tan()).round();
    (rise as i16, run.clamp(i16::MIN as f64, i16::MAX as f64) as i16)
}
