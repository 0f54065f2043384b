use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::chart::Metric;

/// Line colour for a metric: median in blue, minimum in red.
pub fn metric_color(metric: Metric) -> Color32 {
    match metric {
        Metric::MedianBid => Color32::from_rgb(31, 90, 220),
        Metric::MinBid => Color32::from_rgb(214, 39, 40),
    }
}

// ---------------------------------------------------------------------------
// Section palette (compare view)
// ---------------------------------------------------------------------------

/// `n` distinct colours with evenly spaced hues, starting at blue.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = 220.0 + (i as f32 / n as f32) * 360.0;
            let rgb: Srgb = Hsl::new(hue, 0.7, 0.5).into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

/// Maps section names to distinct colours for the overlay plot.
#[derive(Debug, Clone)]
pub struct SectionColors {
    mapping: BTreeMap<String, Color32>,
}

impl SectionColors {
    /// Colours are assigned in the order the sections are given.
    pub fn new<S: AsRef<str>>(sections: &[S]) -> Self {
        let mapping = sections
            .iter()
            .zip(generate_palette(sections.len()))
            .map(|(s, c)| (s.as_ref().to_string(), c))
            .collect();
        SectionColors { mapping }
    }

    pub fn color_for(&self, section: &str) -> Color32 {
        self.mapping.get(section).copied().unwrap_or(Color32::GRAY)
    }
}
