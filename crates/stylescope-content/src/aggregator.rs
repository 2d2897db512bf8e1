//! Page-wide color and font aggregation.

use std::time::Instant;

use indexmap::IndexMap;
use stylescope_protocols::{color, AnalysisResult, ColorSummary, FontSummary};
use tracing::debug;

use crate::dom::Document;

/// Text color value a computed style reports for fully transparent text.
const TRANSPARENT_TEXT: &str = "rgba(0, 0, 0, 0)";

/// Frequency tables of one pass, keyed by the raw computed value in
/// first-seen order.
#[derive(Debug, Default)]
pub struct StyleTally {
    colors: IndexMap<String, u32>,
    fonts: IndexMap<String, u32>,
}

impl StyleTally {
    pub fn record_background(&mut self, value: &str) {
        if !value.is_empty() && !color::is_transparent(value) {
            *self.colors.entry(value.to_string()).or_insert(0) += 1;
        }
    }

    pub fn record_text_color(&mut self, value: &str) {
        if !value.is_empty() && value != TRANSPARENT_TEXT {
            *self.colors.entry(value.to_string()).or_insert(0) += 1;
        }
    }

    pub fn record_font(&mut self, value: &str) {
        if !value.is_empty() {
            *self.fonts.entry(value.to_string()).or_insert(0) += 1;
        }
    }

    /// Rank both tables and cut them to the given lengths.
    pub fn summarize(self, max_colors: usize, max_fonts: usize) -> (Vec<ColorSummary>, Vec<FontSummary>) {
        let colors = ranked(self.colors, max_colors)
            .into_iter()
            .map(|(value, frequency)| ColorSummary::from_computed(&value, frequency))
            .collect();
        let fonts = ranked(self.fonts, max_fonts)
            .into_iter()
            .map(|(value, frequency)| FontSummary {
                family: value.replace('"', ""),
                frequency,
            })
            .collect();
        (colors, fonts)
    }
}

/// Descending by count; `sort_by` is stable so ties keep first-seen order.
fn ranked(table: IndexMap<String, u32>, limit: usize) -> Vec<(String, u32)> {
    let mut entries: Vec<(String, u32)> = table.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(limit);
    entries
}

/// Walks a document and ranks its colors and fonts.
#[derive(Debug, Clone, Copy)]
pub struct StyleAggregator {
    max_colors: usize,
    max_fonts: usize,
}

impl Default for StyleAggregator {
    fn default() -> Self {
        Self::new(20, 10)
    }
}

impl StyleAggregator {
    pub fn new(max_colors: usize, max_fonts: usize) -> Self {
        Self {
            max_colors,
            max_fonts,
        }
    }

    pub fn max_colors(&self) -> usize {
        self.max_colors
    }

    pub fn max_fonts(&self) -> usize {
        self.max_fonts
    }

    pub fn aggregate<D: Document + ?Sized>(&self, document: &D) -> AnalysisResult {
        let started = Instant::now();
        let mut tally = StyleTally::default();

        let elements = document.elements();
        for &node in &elements {
            let style = document.computed_style(node);
            tally.record_background(style.background_color());
            tally.record_text_color(style.color());
            tally.record_font(style.font_family());
        }

        let (colors, fonts) = tally.summarize(self.max_colors, self.max_fonts);
        let analysis_time_ms = started.elapsed().as_secs_f64() * 1000.0;
        debug!(
            elements = elements.len(),
            colors = colors.len(),
            fonts = fonts.len(),
            analysis_time_ms,
            "Style aggregation finished"
        );

        AnalysisResult {
            colors,
            fonts,
            analysis_time_ms,
        }
    }
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;
