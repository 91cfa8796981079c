//! Conversion from decoded pages to Excalidraw documents.
//!
//! [`to_excalidraw`] is a pure function of the page, the options, and an
//! injected [`IdSource`] supplying element identity and render seeds.
//! Substituting a deterministic source makes the output reproducible,
//! which is how both the tests and the CLI's `--seed` flag work. There
//! is no failure path for well-formed input: unrecognized pen and color
//! values degrade to default styles rather than erroring.

use std::collections::{BTreeMap, HashMap};

use base64::Engine;
use rand::distr::Alphanumeric;
use rand::rngs::{StdRng, SysRng};
use rand::{RngExt, SeedableRng};

use crate::excalidraw::{
    AppState, BinaryFileEntry, Element, ExcalidrawDocument, FreedrawElement, ImageElement,
    DEFAULT_BACKGROUND, DEFAULT_FONT_FAMILY, DOCUMENT_TYPE, DOCUMENT_VERSION,
};
use crate::ink::{Page, Stroke};

/// Bounds for the rendered stroke width; the editor renders degenerately
/// outside this range.
const MIN_STROKE_WIDTH: f64 = 1.0;
const MAX_STROKE_WIDTH: f64 = 16.0;

/// Length of generated element and group ids.
const ELEMENT_ID_LEN: usize = 20;

/// Length of generated embedded-file ids.
const FILE_ID_LEN: usize = 40;

/// Render seeds stay within the editor's positive 31-bit range.
const MAX_SEED: u32 = 2_147_483_647;

/// Uniform pressure emitted for pens that are not pressure sensitive.
const UNIFORM_PRESSURE: f64 = 0.5;

/// User-tunable conversion options.
#[derive(Clone, Debug)]
pub struct ConvertOptions {
    /// When true, all strokes from the same source layer carry a shared
    /// group identifier.
    pub preserve_layers: bool,

    /// When false, strokes drawn with either eraser variant are dropped
    /// before element creation.
    pub include_eraser: bool,

    /// User-facing width multiplier applied on top of the per-pen base
    /// multipliers. Expected range 0.25..=2.0.
    pub stroke_width_scale: f64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            preserve_layers: true,
            include_eraser: false,
            stroke_width_scale: 0.5,
        }
    }
}

/// A raster page background attached by the caller before conversion.
///
/// The converter does not render or inspect the payload; it embeds the
/// bytes as a data URL and positions one locked image element at the
/// origin with the supplied native pixel dimensions.
#[derive(Clone, Debug)]
pub struct BackgroundImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub width: f64,
    pub height: f64,
    /// Creation time in milliseconds since the Unix epoch, recorded in
    /// the embedded-file table.
    pub created_ms: u64,
}

/// Source of element identity and render seeds.
///
/// The output format requires fresh unique ids and random render seeds
/// per element; injecting them keeps the converter itself deterministic
/// and testable.
pub trait IdSource {
    /// A fresh element or group identifier.
    fn element_id(&mut self) -> String;

    /// A fresh embedded-file identifier.
    fn file_id(&mut self) -> String;

    /// A fresh render seed.
    fn seed(&mut self) -> u32;
}

/// Default [`IdSource`] backed by a PRNG.
pub struct RandomIdSource {
    rng: StdRng,
}

impl RandomIdSource {
    /// OS-seeded source for normal operation.
    pub fn new() -> Self {
        Self {
            rng: StdRng::try_from_rng(&mut SysRng).expect("OS RNG unavailable"),
        }
    }

    /// Deterministic source for reproducible output.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn alphanumeric(&mut self, len: usize) -> String {
        (&mut self.rng)
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }
}

impl Default for RandomIdSource {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for RandomIdSource {
    fn element_id(&mut self) -> String {
        self.alphanumeric(ELEMENT_ID_LEN)
    }

    fn file_id(&mut self) -> String {
        self.alphanumeric(FILE_ID_LEN)
    }

    fn seed(&mut self) -> u32 {
        self.rng.random_range(1..=MAX_SEED)
    }
}

/// Counter-based [`IdSource`] yielding a predictable sequence.
#[derive(Debug, Default)]
pub struct SequentialIdSource {
    next: u64,
}

impl SequentialIdSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&mut self) -> u64 {
        self.next += 1;
        self.next
    }
}

impl IdSource for SequentialIdSource {
    fn element_id(&mut self) -> String {
        format!("element-{:04}", self.bump())
    }

    fn file_id(&mut self) -> String {
        format!("file-{:04}", self.bump())
    }

    fn seed(&mut self) -> u32 {
        self.bump() as u32
    }
}

/// Converts a decoded page into a self-contained Excalidraw document.
///
/// Strokes with zero points are skipped, eraser strokes are dropped
/// unless [`ConvertOptions::include_eraser`] is set, and an attached
/// background image is always the first element so strokes draw on top
/// of it. The returned document is complete; nothing mutates it after
/// assembly.
///
/// # Example
///
/// ```
/// use rmdraw::convert::{to_excalidraw, ConvertOptions, SequentialIdSource};
/// use rmdraw::ink::{Layer, Page, Version};
///
/// let page = Page { version: Version::V5, layers: vec![Layer::default()] };
/// let mut ids = SequentialIdSource::new();
/// let doc = to_excalidraw(&page, None, &ConvertOptions::default(), &mut ids);
/// assert!(doc.elements.is_empty());
/// ```
pub fn to_excalidraw<I: IdSource>(
    page: &Page,
    background: Option<&BackgroundImage>,
    options: &ConvertOptions,
    ids: &mut I,
) -> ExcalidrawDocument {
    let mut elements = Vec::new();
    let mut files = BTreeMap::new();

    if let Some(image) = background {
        let file_id = ids.file_id();
        elements.push(Element::Image(image_element(image, file_id.clone(), ids)));
        files.insert(
            file_id.clone(),
            BinaryFileEntry {
                mime_type: image.mime_type.clone(),
                id: file_id,
                data_url: format!(
                    "data:{};base64,{}",
                    image.mime_type,
                    base64::engine::general_purpose::STANDARD.encode(&image.bytes)
                ),
                created: image.created_ms,
            },
        );
    }

    // Group ids are scoped to this one call: one generated id per source
    // layer, shared by every stroke converted from it.
    let mut layer_groups: HashMap<usize, String> = HashMap::new();

    for stroke in page.strokes() {
        if stroke.points.is_empty() {
            continue;
        }
        if !options.include_eraser && stroke.pen.is_eraser() {
            continue;
        }

        let group_ids = if options.preserve_layers {
            let group = layer_groups
                .entry(stroke.layer)
                .or_insert_with(|| ids.element_id());
            vec![group.clone()]
        } else {
            Vec::new()
        };

        elements.push(Element::Freedraw(freedraw_element(
            stroke, group_ids, options, ids,
        )));
    }

    ExcalidrawDocument {
        document_type: DOCUMENT_TYPE.to_string(),
        version: DOCUMENT_VERSION,
        source: concat!("rmdraw ", env!("CARGO_PKG_VERSION")).to_string(),
        elements,
        app_state: AppState {
            view_background_color: DEFAULT_BACKGROUND.to_string(),
            current_item_font_family: DEFAULT_FONT_FAMILY,
        },
        files,
    }
}

/// Effective display width for a stroke: base width times the pen's
/// multiplier times the user scale, clamped to the renderable range.
pub fn effective_width(base: f64, pen_multiplier: f64, user_scale: f64) -> f64 {
    let width = base * pen_multiplier * user_scale;
    if width.is_finite() {
        width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH)
    } else {
        MIN_STROKE_WIDTH
    }
}

fn freedraw_element<I: IdSource>(
    stroke: &Stroke,
    group_ids: Vec<String>,
    options: &ConvertOptions,
    ids: &mut I,
) -> FreedrawElement {
    let style = stroke.pen.style();

    // Bounding box over the raw coordinates, then translate every point
    // to be relative to its top-left corner.
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for point in &stroke.points {
        min_x = min_x.min(f64::from(point.x));
        min_y = min_y.min(f64::from(point.y));
        max_x = max_x.max(f64::from(point.x));
        max_y = max_y.max(f64::from(point.y));
    }

    let points: Vec<[f64; 2]> = stroke
        .points
        .iter()
        .map(|point| [f64::from(point.x) - min_x, f64::from(point.y) - min_y])
        .collect();

    let pressures: Vec<f64> = if style.pressure_sensitive {
        stroke
            .points
            .iter()
            .map(|point| f64::from(point.pressure).clamp(0.0, 1.0))
            .collect()
    } else {
        vec![UNIFORM_PRESSURE; stroke.points.len()]
    };

    FreedrawElement {
        id: ids.element_id(),
        element_type: "freedraw".to_string(),
        x: min_x,
        y: min_y,
        width: max_x - min_x,
        height: max_y - min_y,
        angle: 0.0,
        stroke_color: stroke.color.hex().to_string(),
        background_color: "transparent".to_string(),
        fill_style: "solid".to_string(),
        stroke_width: effective_width(
            f64::from(stroke.width),
            style.width_multiplier,
            options.stroke_width_scale,
        ),
        stroke_style: style.stroke_style.as_str().to_string(),
        roughness: style.roughness,
        opacity: style.opacity,
        group_ids,
        frame_id: None,
        roundness: None,
        seed: ids.seed(),
        version: 1,
        version_nonce: ids.seed(),
        is_deleted: false,
        bound_elements: None,
        locked: false,
        points,
        pressures,
        simulate_pressure: style.simulate_pressure,
        last_committed_point: None,
    }
}

fn image_element<I: IdSource>(
    image: &BackgroundImage,
    file_id: String,
    ids: &mut I,
) -> ImageElement {
    ImageElement {
        id: ids.element_id(),
        element_type: "image".to_string(),
        x: 0.0,
        y: 0.0,
        width: image.width,
        height: image.height,
        angle: 0.0,
        stroke_color: "transparent".to_string(),
        background_color: "transparent".to_string(),
        fill_style: "solid".to_string(),
        stroke_width: 1.0,
        stroke_style: "solid".to_string(),
        roughness: 1,
        opacity: 100,
        group_ids: Vec::new(),
        frame_id: None,
        roundness: None,
        seed: ids.seed(),
        version: 1,
        version_nonce: ids.seed(),
        is_deleted: false,
        bound_elements: None,
        locked: true,
        status: "saved".to_string(),
        file_id,
        scale: [1.0, 1.0],
    }
}
