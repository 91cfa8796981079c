//! Top-level document structure and embedded-file table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::element::Element;

/// Value of the document's `type` tag.
pub const DOCUMENT_TYPE: &str = "excalidraw";

/// Document format version understood by current editors.
pub const DOCUMENT_VERSION: u32 = 2;

/// Default canvas background color.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Default font selection (1 = the editor's hand-drawn face).
pub const DEFAULT_FONT_FAMILY: u32 = 1;

/// A complete, self-contained Excalidraw document.
///
/// Constructed once by the converter and never mutated afterwards; the
/// whole structure is handed to the caller for serialization.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcalidrawDocument {
    #[serde(rename = "type")]
    pub document_type: String,
    pub version: u32,
    pub source: String,
    pub elements: Vec<Element>,
    pub app_state: AppState,
    /// Embedded-file table, keyed by generated file id. A `BTreeMap`
    /// keeps serialization order deterministic.
    pub files: BTreeMap<String, BinaryFileEntry>,
}

impl ExcalidrawDocument {
    /// Serializes the document as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Global display defaults carried by the document.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub view_background_color: String,
    pub current_item_font_family: u32,
}

/// One embedded raster payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryFileEntry {
    pub mime_type: String,
    pub id: String,
    #[serde(rename = "dataURL")]
    pub data_url: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub created: u64,
}
