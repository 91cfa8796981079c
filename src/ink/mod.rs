//! Normalized stroke model for decoded notebook pages.
//!
//! This module defines the canonical, format-agnostic representation of a
//! handwritten page: ordered layers of strokes, each stroke an ordered run
//! of sampled points with pen and color metadata. The `.lines`/`.rm`
//! reader parses into this model, and the Excalidraw writer consumes it,
//! so the two sides never depend on each other's internals.
//!
//! # Design Principles
//!
//! 1. **Permissive Construction**: pen and color ids outside the known set
//!    are preserved as decoded rather than rejected. Downstream mapping
//!    resolves them to a default style; a decode never fails over an
//!    unrecognized tool.
//!
//! 2. **Bounded Reads**: every count field in the wire formats is checked
//!    against a sanity ceiling and the remaining buffer length before any
//!    allocation happens.
//!
//! 3. **Pure Decoding**: the reader is a function of bytes to a [`Page`]
//!    or a structured [`io_lines::DecodeError`]; it performs no I/O and
//!    never mutates its input.

mod color;
pub mod io_lines;
mod model;
mod pen;
mod reader;

// Re-export core types for convenient access
pub use color::PenColor;
pub use model::{Layer, Page, Point, Stroke, Version};
pub use pen::{Pen, PenStyle, StrokeStyle};
