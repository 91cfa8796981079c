//! Drawing instrument taxonomy and rendering characteristics.
//!
//! Pen ids are an open enumeration: the tablet firmware has introduced
//! new tool ids across releases, and both the original id range (0..=8)
//! and the later range (12..=21) appear in the wild. Unrecognized ids
//! are preserved in [`Pen::Unknown`] and resolve to a default style, so
//! a decode never fails over a tool we have not seen before.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Enumerated drawing instrument for a stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pen {
    Paintbrush,
    Pencil,
    Ballpoint,
    Marker,
    Fineliner,
    Highlighter,
    Eraser,
    MechanicalPencil,
    EraseArea,
    Calligraphy,
    /// A tool id outside the known set, preserved as decoded.
    Unknown(u32),
}

impl Pen {
    /// Resolves a raw on-disk tool id.
    ///
    /// Both the version-3 id range and the version-5/6 range map onto the
    /// same variants; anything else is preserved as [`Pen::Unknown`].
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 | 12 => Pen::Paintbrush,
            1 | 14 => Pen::Pencil,
            2 | 15 => Pen::Ballpoint,
            3 | 16 => Pen::Marker,
            4 | 17 => Pen::Fineliner,
            5 | 18 => Pen::Highlighter,
            6 => Pen::Eraser,
            7 | 13 => Pen::MechanicalPencil,
            8 => Pen::EraseArea,
            21 => Pen::Calligraphy,
            other => Pen::Unknown(other),
        }
    }

    /// True for both eraser variants (point eraser and erase-area).
    pub fn is_eraser(self) -> bool {
        matches!(self, Pen::Eraser | Pen::EraseArea)
    }

    /// Rendering characteristics for this pen.
    ///
    /// This mapping is total: unknown tools get a neutral default rather
    /// than an error, and the table never fails.
    pub fn style(self) -> PenStyle {
        match self {
            Pen::Paintbrush => PenStyle {
                width_multiplier: 1.8,
                pressure_sensitive: true,
                opacity: 100,
                roughness: 1,
                stroke_style: StrokeStyle::Solid,
                simulate_pressure: false,
            },
            Pen::Pencil => PenStyle {
                width_multiplier: 0.7,
                pressure_sensitive: true,
                opacity: 90,
                roughness: 2,
                stroke_style: StrokeStyle::Solid,
                simulate_pressure: false,
            },
            Pen::Ballpoint => PenStyle {
                width_multiplier: 0.8,
                pressure_sensitive: true,
                opacity: 100,
                roughness: 1,
                stroke_style: StrokeStyle::Solid,
                simulate_pressure: false,
            },
            Pen::Marker => PenStyle {
                width_multiplier: 1.4,
                pressure_sensitive: true,
                opacity: 100,
                roughness: 1,
                stroke_style: StrokeStyle::Solid,
                simulate_pressure: false,
            },
            Pen::Fineliner => PenStyle {
                width_multiplier: 0.6,
                pressure_sensitive: false,
                opacity: 100,
                roughness: 0,
                stroke_style: StrokeStyle::Solid,
                simulate_pressure: true,
            },
            Pen::Highlighter => PenStyle {
                width_multiplier: 3.0,
                pressure_sensitive: false,
                opacity: 40,
                roughness: 0,
                stroke_style: StrokeStyle::Solid,
                simulate_pressure: true,
            },
            Pen::Eraser | Pen::EraseArea => PenStyle {
                width_multiplier: 2.0,
                pressure_sensitive: false,
                opacity: 100,
                roughness: 0,
                stroke_style: StrokeStyle::Solid,
                simulate_pressure: true,
            },
            Pen::MechanicalPencil => PenStyle {
                width_multiplier: 0.5,
                pressure_sensitive: true,
                opacity: 90,
                roughness: 1,
                stroke_style: StrokeStyle::Solid,
                simulate_pressure: false,
            },
            Pen::Calligraphy => PenStyle {
                width_multiplier: 1.0,
                pressure_sensitive: true,
                opacity: 100,
                roughness: 0,
                stroke_style: StrokeStyle::Solid,
                simulate_pressure: false,
            },
            Pen::Unknown(_) => PenStyle::default(),
        }
    }
}

impl fmt::Display for Pen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pen::Paintbrush => write!(f, "paintbrush"),
            Pen::Pencil => write!(f, "pencil"),
            Pen::Ballpoint => write!(f, "ballpoint"),
            Pen::Marker => write!(f, "marker"),
            Pen::Fineliner => write!(f, "fineliner"),
            Pen::Highlighter => write!(f, "highlighter"),
            Pen::Eraser => write!(f, "eraser"),
            Pen::MechanicalPencil => write!(f, "mechanical pencil"),
            Pen::EraseArea => write!(f, "erase area"),
            Pen::Calligraphy => write!(f, "calligraphy"),
            Pen::Unknown(raw) => write!(f, "unknown({raw})"),
        }
    }
}

/// Resolved rendering characteristics for a pen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PenStyle {
    /// Multiplier applied to the stroke's base width.
    pub width_multiplier: f64,

    /// Whether decoded per-point pressure drives the rendered line.
    /// Pens that draw at constant thickness report `false` and get a
    /// uniform pressure array instead.
    pub pressure_sensitive: bool,

    /// Element opacity, `0..=100`.
    pub opacity: u8,

    /// Excalidraw roughness level, `0..=2`.
    pub roughness: u8,

    /// Line style of the rendered stroke.
    pub stroke_style: StrokeStyle,

    /// Whether the renderer should synthesize pressure from velocity.
    pub simulate_pressure: bool,
}

impl Default for PenStyle {
    /// Neutral style used for tools outside the known set.
    fn default() -> Self {
        Self {
            width_multiplier: 1.0,
            pressure_sensitive: true,
            opacity: 100,
            roughness: 1,
            stroke_style: StrokeStyle::Solid,
            simulate_pressure: false,
        }
    }
}

/// Line style variants understood by the output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeStyle {
    Solid,
    Dashed,
    Dotted,
}

impl StrokeStyle {
    /// The wire string used in Excalidraw documents.
    pub fn as_str(self) -> &'static str {
        match self {
            StrokeStyle::Solid => "solid",
            StrokeStyle::Dashed => "dashed",
            StrokeStyle::Dotted => "dotted",
        }
    }
}
