//! Core page model shared by the format reader and the document writer.
//!
//! A decoded [`Page`] is an ordered sequence of [`Layer`]s, drawn
//! bottom-to-top; each layer is an ordered sequence of [`Stroke`]s, and
//! each stroke an ordered run of sampled [`Point`]s. Nothing here is
//! mutated after decoding.

use serde::{Deserialize, Serialize};

use super::color::PenColor;
use super::pen::Pen;

/// Wire-format revision that produced a decoded page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Version {
    /// Fixed-record layout, 33-byte header.
    V3,
    /// Fixed-record layout with one extra reserved stroke field, 43-byte header.
    V5,
    /// Tag-length-value block stream, 43-byte header.
    V6,
}

impl Version {
    /// The revision number as written in the file header.
    pub fn number(&self) -> u32 {
        match self {
            Version::V3 => 3,
            Version::V5 => 5,
            Version::V6 => 6,
        }
    }
}

/// One sampled location along a stroke.
///
/// Coordinates are device-space with the origin at the top-left. The
/// remaining channels are normalized to `0..=1` except `direction`,
/// which is in degrees (`0..=360`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    /// Normalized pen speed at this sample.
    pub speed: f32,
    /// Travel direction in degrees.
    pub direction: f32,
    /// Relative line thickness at this sample.
    pub width: f32,
    /// Normalized pen pressure at this sample.
    pub pressure: f32,
}

/// One continuous pen gesture.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Drawing instrument, preserved even when unrecognized.
    pub pen: Pen,

    /// Palette index, preserved even when unrecognized.
    pub color: PenColor,

    /// Base thickness in format units (not yet display units).
    pub width: f32,

    /// Index of the containing layer within the page.
    pub layer: usize,

    /// Ordered point samples. May be empty for a degenerate record;
    /// empty strokes are dropped during conversion, not here.
    pub points: Vec<Point>,
}

impl Stroke {
    /// Creates a stroke with no points.
    pub fn new(pen: Pen, color: PenColor, width: f32, layer: usize) -> Self {
        Self {
            pen,
            color,
            width,
            layer,
            points: Vec::new(),
        }
    }

    /// Sets the point run for this stroke.
    pub fn with_points(mut self, points: Vec<Point>) -> Self {
        self.points = points;
        self
    }
}

/// An ordered group of strokes composited bottom-to-top.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub strokes: Vec<Stroke>,
}

/// A fully decoded notebook page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// The wire-format revision the page was decoded from.
    pub version: Version,

    /// Layers in draw order.
    pub layers: Vec<Layer>,
}

impl Page {
    /// Total number of strokes across all layers.
    pub fn stroke_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.strokes.len()).sum()
    }

    /// Total number of point samples across all strokes.
    pub fn point_count(&self) -> usize {
        self.layers
            .iter()
            .flat_map(|layer| &layer.strokes)
            .map(|stroke| stroke.points.len())
            .sum()
    }

    /// Iterate over all strokes in layer order.
    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.layers.iter().flat_map(|layer| &layer.strokes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_point() -> Point {
        Point {
            x: 1.0,
            y: 2.0,
            speed: 0.1,
            direction: 90.0,
            width: 0.5,
            pressure: 0.8,
        }
    }

    #[test]
    fn test_page_counts() {
        let page = Page {
            version: Version::V5,
            layers: vec![
                Layer {
                    strokes: vec![
                        Stroke::new(Pen::Ballpoint, PenColor::Black, 2.0, 0)
                            .with_points(vec![sample_point(), sample_point()]),
                    ],
                },
                Layer {
                    strokes: vec![Stroke::new(Pen::Marker, PenColor::Red, 2.0, 1)
                        .with_points(vec![sample_point()])],
                },
            ],
        };

        assert_eq!(page.stroke_count(), 2);
        assert_eq!(page.point_count(), 3);
        assert_eq!(page.strokes().count(), 2);
    }

    #[test]
    fn test_version_numbers() {
        assert_eq!(Version::V3.number(), 3);
        assert_eq!(Version::V5.number(), 5);
        assert_eq!(Version::V6.number(), 6);
    }
}
