//! Analysis results and element snapshots.

use serde::{Deserialize, Serialize};

use crate::color::{self, ColorFormat};

/// One entry of the page palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSummary {
    pub hex: String,
    pub rgb: String,
    pub hsl: String,
    pub frequency: u32,
}

impl ColorSummary {
    /// Build a summary from a raw computed color value.
    pub fn from_computed(value: &str, frequency: u32) -> Self {
        let hex = color::to_hex(value);
        Self {
            rgb: color::hex_to_rgb(&hex),
            hsl: color::hex_to_hsl(&hex),
            hex,
            frequency,
        }
    }

    /// The color rendered in the requested display format.
    pub fn value(&self, format: ColorFormat) -> &str {
        match format {
            ColorFormat::Hex => &self.hex,
            ColorFormat::Rgb => &self.rgb,
            ColorFormat::Hsl => &self.hsl,
        }
    }
}

/// One entry of the page font list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSummary {
    pub family: String,
    pub frequency: u32,
}

impl FontSummary {
    /// First family of the font stack, e.g. `Inter` for `Inter, sans-serif`.
    pub fn primary_family(&self) -> &str {
        self.family.split(',').next().unwrap_or("").trim()
    }
}

/// Ranked color and font usage of one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub colors: Vec<ColorSummary>,
    pub fonts: Vec<FontSummary>,
    /// Wall-clock duration of the pass in milliseconds.
    #[serde(rename = "analysisTime", default)]
    pub analysis_time_ms: f64,
}

impl AnalysisResult {
    /// The result used when the document could not be reached.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.fonts.is_empty()
    }
}

/// Computed styles captured for a picked element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComputedStyleSummary {
    pub width: String,
    pub height: String,
    pub margin: String,
    pub padding: String,
    pub background_color: String,
    pub color: String,
    pub font_family: String,
    pub font_size: String,
    pub font_weight: String,
    pub line_height: String,
    pub border: String,
    pub border_radius: String,
    pub display: String,
    pub position: String,
}

/// The element reported by a successful pick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementSnapshot {
    /// Lowercase tag name.
    pub tag_name: String,
    pub class_name: String,
    pub id: String,
    /// Leading text content, at most the configured preview length.
    pub text_content: String,
    pub computed_styles: ComputedStyleSummary,
}

/// Size and spacing of an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxModel {
    pub width: String,
    pub height: String,
    pub margin: String,
    pub padding: String,
}

/// Background and text color of an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPair {
    pub background: String,
    pub color: String,
}

/// Font settings of an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub font_family: String,
    pub font_size: String,
    pub font_weight: String,
    pub line_height: String,
}

fn or_default(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

impl ElementSnapshot {
    pub fn box_model(&self) -> BoxModel {
        let s = &self.computed_styles;
        BoxModel {
            width: or_default(&s.width, "auto"),
            height: or_default(&s.height, "auto"),
            margin: or_default(&s.margin, "0"),
            padding: or_default(&s.padding, "0"),
        }
    }

    pub fn colors(&self) -> ColorPair {
        let s = &self.computed_styles;
        ColorPair {
            background: or_default(&s.background_color, "transparent"),
            color: or_default(&s.color, "#000000"),
        }
    }

    pub fn typography(&self) -> Typography {
        let s = &self.computed_styles;
        Typography {
            font_family: or_default(&s.font_family, "inherit"),
            font_size: or_default(&s.font_size, "16px"),
            font_weight: or_default(&s.font_weight, "normal"),
            line_height: or_default(&s.line_height, "normal"),
        }
    }

    /// CSS-like selector label, e.g. `button#save.btn.primary`.
    pub fn selector_label(&self) -> String {
        let mut label = self.tag_name.clone();
        if !self.id.is_empty() {
            label.push('#');
            label.push_str(&self.id);
        }
        for class in self.class_name.split_whitespace() {
            label.push('.');
            label.push_str(class);
        }
        label
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
