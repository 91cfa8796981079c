//! Excalidraw document schema.
//!
//! These types reproduce the `.excalidraw` file shape field-for-field,
//! including the constant and sentinel values third-party consumers
//! expect (`frameId: null`, `boundElements: null`, `roundness: null`,
//! `lastCommittedPoint: null`, image `status: "saved"`, `scale: [1,1]`).
//! The shape is a compatibility contract; do not rename or drop fields
//! without checking it against a document exported by the editor itself.

mod document;
mod element;

pub use document::{
    AppState, BinaryFileEntry, ExcalidrawDocument, DEFAULT_BACKGROUND, DEFAULT_FONT_FAMILY,
    DOCUMENT_TYPE, DOCUMENT_VERSION,
};
pub use element::{Element, FreedrawElement, ImageElement};
