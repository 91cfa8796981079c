//! Palette indices and their display colors.
//!
//! Like pens, colors are an open enumeration. The original firmware only
//! shipped black, gray and white; later releases added the extended
//! palette. Unrecognized indices are preserved and resolve to black.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Enumerated palette index for a stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PenColor {
    Black,
    Gray,
    White,
    Yellow,
    Green,
    Pink,
    Blue,
    Red,
    GrayOverlap,
    /// A palette index outside the known set, preserved as decoded.
    Unknown(u32),
}

impl PenColor {
    /// Resolves a raw on-disk palette index.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => PenColor::Black,
            1 => PenColor::Gray,
            2 => PenColor::White,
            3 => PenColor::Yellow,
            4 => PenColor::Green,
            5 => PenColor::Pink,
            6 => PenColor::Blue,
            7 => PenColor::Red,
            8 => PenColor::GrayOverlap,
            other => PenColor::Unknown(other),
        }
    }

    /// Display color as a `#rrggbb` hex string.
    ///
    /// Total mapping: unknown indices render as black rather than failing.
    pub fn hex(self) -> &'static str {
        match self {
            PenColor::Black => "#000000",
            PenColor::Gray => "#808080",
            PenColor::White => "#ffffff",
            PenColor::Yellow => "#ffd700",
            PenColor::Green => "#2e8b57",
            PenColor::Pink => "#ff69b4",
            PenColor::Blue => "#0062cc",
            PenColor::Red => "#d82d2d",
            PenColor::GrayOverlap => "#bfbfbf",
            PenColor::Unknown(_) => "#000000",
        }
    }
}

impl fmt::Display for PenColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PenColor::Black => write!(f, "black"),
            PenColor::Gray => write!(f, "gray"),
            PenColor::White => write!(f, "white"),
            PenColor::Yellow => write!(f, "yellow"),
            PenColor::Green => write!(f, "green"),
            PenColor::Pink => write!(f, "pink"),
            PenColor::Blue => write!(f, "blue"),
            PenColor::Red => write!(f, "red"),
            PenColor::GrayOverlap => write!(f, "gray overlap"),
            PenColor::Unknown(raw) => write!(f, "unknown({raw})"),
        }
    }
}
