//! Structural summaries of decoded pages.
//!
//! Powers the `inspect` subcommand: a quick look at what a page holds
//! without converting it, in text or JSON form.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::ink::Page;

/// Per-layer stroke and point counts.
#[derive(Debug, Serialize)]
pub struct LayerSummary {
    pub strokes: usize,
    pub points: usize,
}

/// Summary of one decoded page.
#[derive(Debug, Serialize)]
pub struct PageSummary {
    /// Wire-format revision number.
    pub version: u32,
    pub layer_count: usize,
    pub stroke_count: usize,
    pub point_count: usize,
    pub layers: Vec<LayerSummary>,
    /// Stroke counts per pen name, including `unknown(id)` entries.
    pub pens: BTreeMap<String, usize>,
    /// Stroke counts per color name, including `unknown(id)` entries.
    pub colors: BTreeMap<String, usize>,
}

impl PageSummary {
    /// Builds a summary from a decoded page.
    pub fn from_page(page: &Page) -> Self {
        let layers: Vec<LayerSummary> = page
            .layers
            .iter()
            .map(|layer| LayerSummary {
                strokes: layer.strokes.len(),
                points: layer.strokes.iter().map(|s| s.points.len()).sum(),
            })
            .collect();

        let mut pens: BTreeMap<String, usize> = BTreeMap::new();
        let mut colors: BTreeMap<String, usize> = BTreeMap::new();
        for stroke in page.strokes() {
            *pens.entry(stroke.pen.to_string()).or_default() += 1;
            *colors.entry(stroke.color.to_string()).or_default() += 1;
        }

        Self {
            version: page.version.number(),
            layer_count: page.layers.len(),
            stroke_count: page.stroke_count(),
            point_count: page.point_count(),
            layers,
            pens,
            colors,
        }
    }
}

impl fmt::Display for PageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, ".lines version: {}", self.version)?;
        writeln!(
            f,
            "{} layer(s), {} stroke(s), {} point(s)",
            self.layer_count, self.stroke_count, self.point_count
        )?;
        for (index, layer) in self.layers.iter().enumerate() {
            writeln!(
                f,
                "  layer {index}: {} stroke(s), {} point(s)",
                layer.strokes, layer.points
            )?;
        }
        if !self.pens.is_empty() {
            writeln!(f, "pens:")?;
            for (pen, count) in &self.pens {
                writeln!(f, "  {pen}: {count}")?;
            }
        }
        if !self.colors.is_empty() {
            writeln!(f, "colors:")?;
            for (color, count) in &self.colors {
                writeln!(f, "  {color}: {count}")?;
            }
        }
        Ok(())
    }
}
