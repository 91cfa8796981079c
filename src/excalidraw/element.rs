//! Drawable element types.

use serde::{Deserialize, Serialize};

/// A drawable element in an Excalidraw document.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Element {
    Freedraw(FreedrawElement),
    Image(ImageElement),
}

/// One converted stroke: a polyline of element-local points with a
/// per-point pressure array.
///
/// Geometry is the stroke's axis-aligned bounding box; `points` are
/// relative to its top-left corner, so the smallest x and y in `points`
/// are always 0.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreedrawElement {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
    pub stroke_color: String,
    pub background_color: String,
    pub fill_style: String,
    pub stroke_width: f64,
    pub stroke_style: String,
    pub roughness: u8,
    pub opacity: u8,
    pub group_ids: Vec<String>,
    pub frame_id: Option<String>,
    pub roundness: Option<serde_json::Value>,
    pub seed: u32,
    pub version: u32,
    pub version_nonce: u32,
    pub is_deleted: bool,
    pub bound_elements: Option<serde_json::Value>,
    pub locked: bool,
    pub points: Vec<[f64; 2]>,
    pub pressures: Vec<f64>,
    pub simulate_pressure: bool,
    pub last_committed_point: Option<[f64; 2]>,
}

/// A raster element referencing an entry in the embedded-file table.
///
/// Used for the optional page background; always locked so strokes on
/// top of it stay selectable.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    pub id: String,
    #[serde(rename = "type")]
    pub element_type: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
    pub stroke_color: String,
    pub background_color: String,
    pub fill_style: String,
    pub stroke_width: f64,
    pub stroke_style: String,
    pub roughness: u8,
    pub opacity: u8,
    pub group_ids: Vec<String>,
    pub frame_id: Option<String>,
    pub roundness: Option<serde_json::Value>,
    pub seed: u32,
    pub version: u32,
    pub version_nonce: u32,
    pub is_deleted: bool,
    pub bound_elements: Option<serde_json::Value>,
    pub locked: bool,
    pub status: String,
    pub file_id: String,
    pub scale: [f64; 2],
}
