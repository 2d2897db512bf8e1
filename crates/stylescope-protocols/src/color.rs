//! Color format conversion.
//!
//! Canonical hex (`#rrggbb`) is the pivot format: computed `rgb(r, g, b)`
//! values are converted to hex, and the rgb/hsl display strings are derived
//! from the hex. Values that cannot be parsed pass through unchanged.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static RGB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)$").expect("valid rgb regex")
});

static HEX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^#?([a-f\d]{2})([a-f\d]{2})([a-f\d]{2})$").expect("valid hex regex")
});

/// Computed values that mean "no color".
const TRANSPARENT_VALUES: &[&str] = &["rgba(0, 0, 0, 0)", "transparent"];

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// An HSL color. Hue in degrees (0-360), saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a computed `rgb(r, g, b)` string.
    pub fn parse_css(value: &str) -> Option<Self> {
        let caps = RGB_RE.captures(value.trim())?;
        let channel = |i: usize| caps[i].parse::<u8>().ok();
        Some(Self::new(channel(1)?, channel(2)?, channel(3)?))
    }

    /// Parse a six digit hex string, with or without the leading `#`.
    pub fn parse_hex(value: &str) -> Option<Self> {
        let caps = HEX_RE.captures(value.trim())?;
        let channel = |i: usize| u8::from_str_radix(&caps[i], 16).ok();
        Some(Self::new(channel(1)?, channel(2)?, channel(3)?))
    }

    /// `#rrggbb`, lowercase.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `rgb(r, g, b)`.
    pub fn to_css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    pub fn to_hsl(&self) -> Hsl {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let mut h = 0.0;
        let mut s = 0.0;

        if max != min {
            let d = max - min;
            s = if l > 0.5 {
                d / (2.0 - max - min)
            } else {
                d / (max + min)
            };
            h = if max == r {
                (g - b) / d + if g < b { 6.0 } else { 0.0 }
            } else if max == g {
                (b - r) / d + 2.0
            } else {
                (r - g) / d + 4.0
            };
            h /= 6.0;
        }

        Hsl {
            h: h * 360.0,
            s: s * 100.0,
            l: l * 100.0,
        }
    }
}

impl Hsl {
    /// `hsl(H, S%, L%)` with each component rounded.
    pub fn to_css(&self) -> String {
        format!(
            "hsl({}, {}%, {}%)",
            self.h.round() as i64,
            self.s.round() as i64,
            self.l.round() as i64
        )
    }

    pub fn to_rgb(&self) -> Rgb {
        let h = self.h / 360.0;
        let s = self.s / 100.0;
        let l = self.l / 100.0;

        if s == 0.0 {
            let v = to_channel(l);
            return Rgb::new(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Rgb::new(
            to_channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            to_channel(hue_to_rgb(p, q, h)),
            to_channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
        )
    }
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Canonical hex form of a computed color value.
///
/// `rgb(...)` values are converted, hex passes through, anything else
/// (`rgba` with alpha, named colors) is returned unchanged.
pub fn to_hex(value: &str) -> String {
    if value.starts_with("rgb") {
        if let Some(rgb) = Rgb::parse_css(value) {
            return rgb.to_hex();
        }
    }
    value.to_string()
}

/// `rgb(r, g, b)` for a hex value; the input when it is not hex.
pub fn hex_to_rgb(hex: &str) -> String {
    Rgb::parse_hex(hex)
        .map(|rgb| rgb.to_css())
        .unwrap_or_else(|| hex.to_string())
}

/// `hsl(H, S%, L%)` for a hex value; the input when it is not hex.
pub fn hex_to_hsl(hex: &str) -> String {
    Rgb::parse_hex(hex)
        .map(|rgb| rgb.to_hsl().to_css())
        .unwrap_or_else(|| hex.to_string())
}

/// Whether a computed background value is fully transparent.
pub fn is_transparent(value: &str) -> bool {
    TRANSPARENT_VALUES.contains(&value)
}

/// Display format selected in the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFormat {
    #[default]
    Hex,
    Rgb,
    Hsl,
}

impl ColorFormat {
    /// Render an arbitrary computed color value in this format.
    pub fn render(&self, value: &str) -> String {
        let hex = to_hex(value);
        match self {
            Self::Hex => hex,
            Self::Rgb => {
                if Rgb::parse_hex(&hex).is_some() {
                    hex_to_rgb(&hex)
                } else {
                    value.to_string()
                }
            }
            Self::Hsl => hex_to_hsl(&hex),
        }
    }
}

impl FromStr for ColorFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(Self::Hex),
            "rgb" => Ok(Self::Rgb),
            "hsl" => Ok(Self::Hsl),
            other => Err(format!("unknown color format: {}", other)),
        }
    }
}

impl std::fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hex => f.write_str("hex"),
            Self::Rgb => f.write_str("rgb"),
            Self::Hsl => f.write_str("hsl"),
        }
    }
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
