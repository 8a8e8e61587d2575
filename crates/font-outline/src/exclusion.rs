//! Rules for glyphs that must keep their original outlines.
//!
//! Icon, emoji and box-drawing glyphs are designed to tile or to sit at exact
//! cell sizes; emboldening or slanting them breaks that. Glyphs are matched by
//! the codepoints mapped to them and by glyph-name markers.

use std::{fmt, ops::RangeInclusive, str::FromStr};

use crate::{Error, Result};

/// Unicode private use areas.
pub const PRIVATE_USE_RANGES: &[RangeInclusive<u32>] =
    &[0xE000..=0xF8FF, 0xF0000..=0xFFFFD, 0x100000..=0x10FFFD];

/// Emoji blocks, plus the miscellaneous symbols and dingbats many emoji live in.
pub const EMOJI_RANGES: &[RangeInclusive<u32>] = &[
    0x2600..=0x27BF,
    0xFE0F..=0xFE0F,
    0x1F000..=0x1FAFF,
];

/// Symbol blocks whose glyphs connect across cells or encode pictures.
pub const SYMBOL_RANGES: &[RangeInclusive<u32>] = &[
    // Arrows
    0x2190..=0x21FF,
    // Miscellaneous technical
    0x2300..=0x23FF,
    // Box drawing, block elements
    0x2500..=0x259F,
    // Geometric shapes
    0x25A0..=0x25FF,
    // Braille patterns
    0x2800..=0x28FF,
    // Symbols for legacy computing
    0x1FB00..=0x1FBFF,
];

pub const DEFAULT_NAME_MARKERS: &[&str] = &["powerline", "nerd", "emoji", ".pua"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExclusionReason {
    PrivateUse,
    Emoji,
    Symbol,
    CustomRange,
    NameMarker,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PrivateUse => "private use",
            Self::Emoji => "emoji",
            Self::Symbol => "symbol",
            Self::CustomRange => "custom range",
            Self::NameMarker => "name marker",
        })
    }
}

/// Inclusive codepoint range, parsed from `U+E000-U+F8FF`, `E000-F8FF` or `U+2603`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodepointRange(RangeInclusive<u32>);

impl CodepointRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self(start.min(end)..=start.max(end))
    }

    pub fn contains(&self, codepoint: u32) -> bool {
        self.0.contains(&codepoint)
    }
}

fn parse_codepoint(s: &str) -> Option<u32> {
    let s = s.trim();
    let hex = s
        .strip_prefix("U+")
        .or_else(|| s.strip_prefix("u+"))
        .or_else(|| s.strip_prefix("0x"))
        .unwrap_or(s);
    u32::from_str_radix(hex, 16).ok().filter(|cp| *cp <= 0x10FFFF)
}

impl FromStr for CodepointRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidRange(s.to_string());
        match s.split_once('-') {
            Some((start, end)) => {
                let start = parse_codepoint(start).ok_or_else(invalid)?;
                let end = parse_codepoint(end).ok_or_else(invalid)?;
                Ok(Self::new(start, end))
            }
            None => parse_codepoint(s).map(|cp| Self::new(cp, cp)).ok_or_else(invalid),
        }
    }
}

impl fmt::Display for CodepointRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X}-U+{:04X}", self.0.start(), self.0.end())
    }
}

/// Which glyphs to leave untouched.
#[derive(Debug, Clone)]
pub struct ExclusionRules {
    pub private_use: bool,
    pub emoji: bool,
    pub symbols: bool,
    pub ranges: Vec<CodepointRange>,
    /// Case-insensitive substrings of glyph names.
    pub name_markers: Vec<String>,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self {
            private_use: true,
            emoji: true,
            symbols: true,
            ranges: Vec::new(),
            name_markers: DEFAULT_NAME_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

fn in_any(ranges: &[RangeInclusive<u32>], codepoint: u32) -> bool {
    ranges.iter().any(|r| r.contains(&codepoint))
}

impl ExclusionRules {
    /// Rules that exclude nothing.
    pub fn none() -> Self {
        Self {
            private_use: false,
            emoji: false,
            symbols: false,
            ranges: Vec::new(),
            name_markers: Vec::new(),
        }
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.name_markers.push(marker.into());
        self
    }

    pub fn with_range(mut self, range: CodepointRange) -> Self {
        self.ranges.push(range);
        self
    }

    fn classify_codepoint(&self, codepoint: u32) -> Option<ExclusionReason> {
        if self.private_use && in_any(PRIVATE_USE_RANGES, codepoint) {
            Some(ExclusionReason::PrivateUse)
        } else if self.emoji && in_any(EMOJI_RANGES, codepoint) {
            Some(ExclusionReason::Emoji)
        } else if self.symbols && in_any(SYMBOL_RANGES, codepoint) {
            Some(ExclusionReason::Symbol)
        } else if self.ranges.iter().any(|r| r.contains(codepoint)) {
            Some(ExclusionReason::CustomRange)
        } else {
            None
        }
    }

    /// Why a glyph with these codepoints and this name is excluded, if it is.
    ///
    /// Any one codepoint in an excluded class excludes the glyph. Name markers
    /// are checked last and are the only rule that applies to unmapped glyphs.
    pub fn classify(&self, codepoints: &[u32], glyph_name: &str) -> Option<ExclusionReason> {
        if let Some(reason) = codepoints.iter().find_map(|cp| self.classify_codepoint(*cp)) {
            return Some(reason);
        }

        let name = glyph_name.to_lowercase();
        self.name_markers
            .iter()
            .filter(|marker| !marker.is_empty())
            .any(|marker| name.contains(&marker.to_lowercase()))
            .then_some(ExclusionReason::NameMarker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin_is_not_excluded() {
        let rules = ExclusionRules::default();
        assert_eq!(rules.classify(&[0x41], "A"), None);
        assert_eq!(rules.classify(&[], "A.alt"), None);
    }

    #[test]
    fn classifies_by_codepoint() {
        let rules = ExclusionRules::default();
        assert_eq!(rules.classify(&[0xE0A0], "uniE0A0"), Some(ExclusionReason::PrivateUse));
        assert_eq!(rules.classify(&[0xF0001], "uF0001"), Some(ExclusionReason::PrivateUse));
        assert_eq!(rules.classify(&[0x1F600], "u1F600"), Some(ExclusionReason::Emoji));
        assert_eq!(rules.classify(&[0x2603], "snowman"), Some(ExclusionReason::Emoji));
        assert_eq!(rules.classify(&[0x2502], "uni2502"), Some(ExclusionReason::Symbol));
        assert_eq!(rules.classify(&[0x2192], "arrowright"), Some(ExclusionReason::Symbol));
    }

    #[test]
    fn any_codepoint_excludes() {
        let rules = ExclusionRules::default();
        assert_eq!(rules.classify(&[0x41, 0xE000], "A"), Some(ExclusionReason::PrivateUse));
    }

    #[test]
    fn name_markers_are_case_insensitive() {
        let rules = ExclusionRules::default();
        assert_eq!(rules.classify(&[], "PowerlineArrow"), Some(ExclusionReason::NameMarker));
        assert_eq!(rules.classify(&[], "a.pua"), Some(ExclusionReason::NameMarker));

        let rules = ExclusionRules::none().with_marker("ICON");
        assert_eq!(rules.classify(&[0x41], "my-icon-A"), Some(ExclusionReason::NameMarker));
    }

    #[test]
    fn disabled_classes_pass_through() {
        let rules = ExclusionRules { private_use: false, ..ExclusionRules::default() };
        assert_eq!(rules.classify(&[0xE000], "uniE000"), None);
        assert_eq!(ExclusionRules::none().classify(&[0x1F600], "emoji_smile"), None);
    }

    #[test]
    fn custom_ranges() {
        let rules = ExclusionRules::none().with_range("U+0030-U+0039".parse().unwrap());
        assert_eq!(rules.classify(&[0x35], "five"), Some(ExclusionReason::CustomRange));
        assert_eq!(rules.classify(&[0x41], "A"), None);
    }

    #[test]
    fn parses_range_forms() {
        let parse = |s: &str| s.parse::<CodepointRange>().unwrap();
        assert_eq!(parse("E000-F8FF"), CodepointRange::new(0xE000, 0xF8FF));
        assert_eq!(parse("U+2603"), CodepointRange::new(0x2603, 0x2603));
        assert_eq!(parse("0x41-0x40"), CodepointRange::new(0x40, 0x41));
        assert!("U+ZZZZ".parse::<CodepointRange>().is_err());
        assert!("U+110000".parse::<CodepointRange>().is_err());
        assert!("".parse::<CodepointRange>().is_err());
    }

    #[test]
    fn range_display() {
        assert_eq!(CodepointRange::new(0xE000, 0xF8FF).to_string(), "U+E000-U+F8FF");
    }
}
