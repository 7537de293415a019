use dicom_core::Tag;
use dicom_core::dictionary::{DataDictionary, TagRange};
use dicom_dictionary_std::StandardDataDictionary;

use crate::errors::TagParseError;

/// Resolve a textual tag reference.
///
/// Accepts a standard dictionary keyword (`AccessionNumber`, matched case-sensitively)
/// or a hexadecimal group/element pair: `(0008,0050)`, `0008,0050` or `00080050`.
/// Text starting with `(` or a digit is always read as a numeric pair.
pub fn parse_tag(text: &str) -> Result<Tag, TagParseError> {
    let invalid = || TagParseError(text.to_string());
    let first = text.chars().next().ok_or_else(invalid)?;

    if first == '(' || first.is_ascii_digit() {
        return parse_numeric(text).ok_or_else(invalid);
    }

    if let Some(entry) = StandardDataDictionary.by_name(text) {
        return match entry.tag {
            TagRange::Single(tag) => Ok(tag),
            // Repeating groups/elements have no single concrete tag.
            _ => Err(invalid()),
        };
    }

    // Hex pairs may start with a letter, e.g. "FFFE,E000".
    parse_numeric(text).ok_or_else(invalid)
}

fn parse_numeric(text: &str) -> Option<Tag> {
    let inner = text.trim();
    let inner = match (inner.strip_prefix('('), inner.ends_with(')')) {
        (Some(rest), true) => &rest[..rest.len() - 1],
        (None, false) => inner,
        _ => return None,
    };

    let (group, element) = match inner.split_once(',') {
        Some((g, e)) => (g.trim(), e.trim()),
        None if inner.len() == 8 && inner.is_ascii() => inner.split_at(4),
        None => return None,
    };
    Some(Tag(hex_u16(group)?, hex_u16(element)?))
}

fn hex_u16(s: &str) -> Option<u16> {
    if s.is_empty() || s.len() > 4 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(s, 16).ok()
}
