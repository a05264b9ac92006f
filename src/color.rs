//! Color value parsing.
//!
//! Configuration and CLI color values are plain strings: either a CSS-style
//! color name (`"white"`, `"darkgray"`) or a hex literal (`"#fff"`,
//! `"#1a2b3c"`). This module turns them into [`image::Rgb`] pixels.

use image::Rgb;

use crate::error::SheetError;

/// Named colors accepted in configuration values.
///
/// Covers the CSS keyword set that contact-sheet configurations actually use;
/// anything fancier can be written as a hex literal.
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("darkgray", [169, 169, 169]),
    ("darkgrey", [169, 169, 169]),
    ("lightgray", [211, 211, 211]),
    ("lightgrey", [211, 211, 211]),
    ("silver", [192, 192, 192]),
    ("maroon", [128, 0, 0]),
    ("olive", [128, 128, 0]),
    ("lime", [0, 255, 0]),
    ("teal", [0, 128, 128]),
    ("navy", [0, 0, 128]),
    ("purple", [128, 0, 128]),
    ("orange", [255, 165, 0]),
    ("brown", [165, 42, 42]),
    ("pink", [255, 192, 203]),
];

/// Parse a color name or hex literal into an RGB pixel.
///
/// Accepts named colors (case-insensitive) and `#rgb` / `#rrggbb` hex
/// notation.
///
/// # Errors
///
/// Returns [`SheetError::Config`] if the value matches neither form.
pub fn parse_color(value: &str) -> Result<Rgb<u8>, SheetError> {
    let trimmed = value.trim();

    if let Some(hex) = trimmed.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| SheetError::Config {
            reason: format!("invalid hex color: '{trimmed}'"),
        });
    }

    let lowered = trimmed.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, rgb)| Rgb(*rgb))
        .ok_or_else(|| SheetError::Config {
            reason: format!("unknown color name: '{trimmed}'"),
        })
}

fn parse_hex(hex: &str) -> Option<Rgb<u8>> {
    match hex.len() {
        3 => {
            let mut channels = [0u8; 3];
            for (index, character) in hex.chars().enumerate() {
                let nibble = character.to_digit(16)? as u8;
                channels[index] = nibble << 4 | nibble;
            }
            Some(Rgb(channels))
        }
        6 => {
            let red = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let green = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let blue = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Rgb([red, green, blue]))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors() {
        assert_eq!(parse_color("white").unwrap(), Rgb([255, 255, 255]));
        assert_eq!(parse_color("Black").unwrap(), Rgb([0, 0, 0]));
        assert_eq!(parse_color("  orange ").unwrap(), Rgb([255, 165, 0]));
        assert_eq!(parse_color("grey").unwrap(), parse_color("gray").unwrap());
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_color("#ffffff").unwrap(), Rgb([255, 255, 255]));
        assert_eq!(parse_color("#1a2b3c").unwrap(), Rgb([0x1a, 0x2b, 0x3c]));
        assert_eq!(parse_color("#fff").unwrap(), Rgb([255, 255, 255]));
        assert_eq!(parse_color("#f00").unwrap(), Rgb([255, 0, 0]));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_color("not-a-color").is_err());
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("#gggggg").is_err());
        assert!(parse_color("").is_err());
    }
}
