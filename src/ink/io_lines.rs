//! reMarkable `.lines`/`.rm` notebook page reader.
//!
//! This module decodes the tablet's proprietary stroke-capture format
//! into the canonical page model. Three on-disk revisions are supported:
//!
//! - **Version 3**: 33-byte ASCII header, then fixed-size records
//!   (layer count, per-layer stroke count, per-stroke point run).
//! - **Version 5**: identical structure with a 43-byte header and one
//!   extra reserved 32-bit field per stroke.
//! - **Version 6**: 43-byte header followed by a tag-length-value block
//!   stream. Only line-definition blocks are consumed; every other block
//!   type is skipped by its declared length. Layer/grouping metadata
//!   blocks are not interpreted, so all version-6 strokes land in a
//!   single synthetic layer 0.
//!
//! All multi-byte integers and floats are little-endian.
//!
//! # Failure policy
//!
//! For versions 3 and 5 the first structural failure aborts the whole
//! decode: the caller sees one aggregated error naming the layer and
//! stroke index that failed, never partial data. Version 6 is decoded
//! best-effort instead: a block with a corrupt length field causes the
//! scanner to resynchronize one byte forward, and a line block that
//! cannot be fully parsed yields no stroke, without failing the page.

use std::fs;
use std::path::Path;

use thiserror::Error;

use super::color::PenColor;
use super::model::{Layer, Page, Point, Stroke, Version};
use super::pen::Pen;
use super::reader::ByteReader;
use crate::error::RmdrawError;

/// ASCII magic prefix shared by all known revisions.
const MAGIC_PREFIX: &str = "reMarkable .lines file, version=";

/// Header sizes: version 3 ends right after the revision digit; versions
/// 5 and 6 pad the header with trailing spaces to 43 bytes.
const HEADER_LEN_V3: usize = 33;
const HEADER_LEN_V5: usize = 43;
const MIN_HEADER_LEN: usize = HEADER_LEN_V3;
const MAX_HEADER_LEN: usize = HEADER_LEN_V5;

/// Sanity ceilings. These protect against corrupt count fields driving
/// unbounded allocation; they are far above anything a real page holds.
const MAX_LAYERS: i32 = 100;
const MAX_STROKES_PER_LAYER: i32 = 100_000;
const MAX_POINTS_PER_STROKE: i32 = 100_000;

/// Absolute ceiling on a version-6 block's declared length.
const MAX_BLOCK_LEN: usize = 10_000_000;

/// Type flag marking a line-definition block in version-6 streams: the
/// info byte, the two version bytes (1, 2) and the item-type byte 0x05,
/// read as one little-endian word.
pub const LINE_DEFINITION_FLAG: u32 = 0x0502_0100;

/// Fixed point-record sizes: six packed f32 fields for versions 3/5,
/// packed f32/u16/u8 fields for version 6.
const POINT_LEN_FIXED: usize = 24;
const POINT_LEN_V6: usize = 14;

/// Minimum per-stroke header sizes (pen, color, reserved, width, point
/// count; version 5 carries one extra reserved field).
const STROKE_HEADER_LEN_V3: usize = 20;
const STROKE_HEADER_LEN_V5: usize = 24;

// Wire types in the low 4 bits of a version-6 field tag.
const WIRE_BYTE1: u8 = 0x1;
const WIRE_BYTE4: u8 = 0x4;
const WIRE_BYTE8: u8 = 0x8;
const WIRE_LENGTH4: u8 = 0xC;
const WIRE_ID: u8 = 0xF;

// Recognized field indices within a line-definition block.
const FIELD_TOOL: u64 = 1;
const FIELD_COLOR: u64 = 2;
const FIELD_THICKNESS_SCALE: u64 = 3;
const FIELD_STARTING_LENGTH: u64 = 4;
const FIELD_POINTS: u64 = 5;

/// Structured decode failure for a `.lines`/`.rm` buffer.
///
/// Malformed input is an expected, frequent outcome on this path, so the
/// decoder returns these rather than panicking, carrying the byte offset
/// where the failure was detected whenever it is known.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DecodeError {
    /// Buffer too small for any header, or magic prefix missing.
    #[error("invalid .lines header: {reason}")]
    InvalidHeader { reason: String },

    /// The magic prefix matched but the revision number is not one we
    /// can decode.
    #[error("unsupported .lines version {version}")]
    UnsupportedVersion { version: u32 },

    /// A read ran past the end of the buffer.
    #[error("truncated read of {what} at offset {offset}")]
    Truncated { what: &'static str, offset: usize },

    /// A count field fell outside its sanity range.
    #[error("{what} count {value} out of range (0..={max}) at offset {offset}")]
    CountOutOfRange {
        what: &'static str,
        value: i64,
        max: i64,
        offset: usize,
    },

    /// A count field was in range but the records it promises do not fit
    /// in the remaining buffer.
    #[error("{what} count {value} needs more than the {remaining} byte(s) remaining at offset {offset}")]
    CountExceedsBuffer {
        what: &'static str,
        value: i64,
        remaining: usize,
        offset: usize,
    },

    /// A structural failure inside a specific stroke record.
    #[error("layer {layer}, stroke {stroke}: {source}")]
    Stroke {
        layer: usize,
        stroke: usize,
        source: Box<DecodeError>,
    },
}

/// Decodes one page from a raw byte buffer.
///
/// Pure function of bytes to a [`Page`] or a [`DecodeError`]; performs no
/// I/O and never mutates the input.
pub fn from_lines_slice(data: &[u8]) -> Result<Page, DecodeError> {
    match detect_version(data)? {
        Version::V3 => decode_fixed(data, Version::V3),
        Version::V5 => decode_fixed(data, Version::V5),
        Version::V6 => decode_blocks(data),
    }
}

/// Reads and decodes a page from a file on disk.
pub fn read_lines_file(path: &Path) -> Result<Page, RmdrawError> {
    let data = fs::read(path).map_err(RmdrawError::Io)?;
    from_lines_slice(&data).map_err(|source| RmdrawError::LinesDecode {
        path: path.to_path_buf(),
        source,
    })
}

/// Detects the wire-format revision from the header text.
///
/// Distinguishes three outcomes: a known-good revision, a recognized
/// magic with an unsupported revision number (reported by number), and a
/// header that matches nothing. Operators see materially different
/// messages for the latter two.
pub fn detect_version(data: &[u8]) -> Result<Version, DecodeError> {
    if data.len() < MIN_HEADER_LEN {
        return Err(DecodeError::InvalidHeader {
            reason: format!(
                "{} byte(s) is smaller than the minimum {MIN_HEADER_LEN}-byte header",
                data.len()
            ),
        });
    }

    let head = &data[..data.len().min(MAX_HEADER_LEN)];
    let text = String::from_utf8_lossy(head);
    let Some(rest) = text.strip_prefix(MAGIC_PREFIX) else {
        return Err(DecodeError::InvalidHeader {
            reason: "magic string missing".to_string(),
        });
    };

    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    let version: u32 = digits.parse().map_err(|_| DecodeError::InvalidHeader {
        reason: "revision number missing after magic".to_string(),
    })?;

    match version {
        3 => Ok(Version::V3),
        5 => Ok(Version::V5),
        6 => Ok(Version::V6),
        other => Err(DecodeError::UnsupportedVersion { version: other }),
    }
}

// ============================================================================
// Versions 3 and 5: fixed-size records
// ============================================================================

fn decode_fixed(data: &[u8], version: Version) -> Result<Page, DecodeError> {
    let header_len = match version {
        Version::V3 => HEADER_LEN_V3,
        _ => HEADER_LEN_V5,
    };
    let mut r = ByteReader::new(data);
    r.set_position(header_len);

    let offset = r.position();
    let layer_count = r.read_i32("layer count")?;
    check_count("layer", layer_count, MAX_LAYERS, offset)?;
    check_fit("layer", layer_count, 4, r.remaining(), offset)?;

    let mut layers = Vec::with_capacity(layer_count as usize);
    for layer_index in 0..layer_count as usize {
        let offset = r.position();
        let stroke_count = r.read_i32("stroke count")?;
        check_count("stroke", stroke_count, MAX_STROKES_PER_LAYER, offset)?;
        let min_stroke_len = match version {
            Version::V3 => STROKE_HEADER_LEN_V3,
            _ => STROKE_HEADER_LEN_V5,
        };
        check_fit("stroke", stroke_count, min_stroke_len, r.remaining(), offset)?;

        let mut strokes = Vec::with_capacity(stroke_count as usize);
        for stroke_index in 0..stroke_count as usize {
            let stroke = decode_fixed_stroke(&mut r, version, layer_index).map_err(|source| {
                DecodeError::Stroke {
                    layer: layer_index,
                    stroke: stroke_index,
                    source: Box::new(source),
                }
            })?;
            strokes.push(stroke);
        }
        layers.push(Layer { strokes });
    }

    Ok(Page { version, layers })
}

fn decode_fixed_stroke(
    r: &mut ByteReader<'_>,
    version: Version,
    layer_index: usize,
) -> Result<Stroke, DecodeError> {
    let pen_raw = r.read_u32("pen id")?;
    let color_raw = r.read_u32("color id")?;
    r.skip(4, "reserved stroke field")?;
    let width = r.read_f32("base width")?;
    if version == Version::V5 {
        r.skip(4, "reserved stroke field")?;
    }

    let offset = r.position();
    let point_count = r.read_i32("point count")?;
    check_count("point", point_count, MAX_POINTS_PER_STROKE, offset)?;
    check_fit("point", point_count, POINT_LEN_FIXED, r.remaining(), offset)?;

    let mut points = Vec::with_capacity(point_count as usize);
    for _ in 0..point_count {
        points.push(Point {
            x: r.read_f32("point x")?,
            y: r.read_f32("point y")?,
            speed: r.read_f32("point speed")?,
            direction: r.read_f32("point direction")?,
            width: r.read_f32("point width")?,
            pressure: r.read_f32("point pressure")?,
        });
    }

    Ok(Stroke {
        pen: Pen::from_raw(pen_raw),
        color: PenColor::from_raw(color_raw),
        width,
        layer: layer_index,
        points,
    })
}

fn check_count(
    what: &'static str,
    value: i32,
    max: i32,
    offset: usize,
) -> Result<(), DecodeError> {
    if value < 0 || value > max {
        return Err(DecodeError::CountOutOfRange {
            what,
            value: value.into(),
            max: max.into(),
            offset,
        });
    }
    Ok(())
}

/// Checks that `value` records of at least `record_len` bytes fit in the
/// remaining buffer, so no count field drives an allocation the data
/// cannot back.
fn check_fit(
    what: &'static str,
    value: i32,
    record_len: usize,
    remaining: usize,
    offset: usize,
) -> Result<(), DecodeError> {
    if value as usize * record_len > remaining {
        return Err(DecodeError::CountExceedsBuffer {
            what,
            value: value.into(),
            remaining,
            offset,
        });
    }
    Ok(())
}

// ============================================================================
// Version 6: tag-length-value block stream
// ============================================================================

fn decode_blocks(data: &[u8]) -> Result<Page, DecodeError> {
    let mut r = ByteReader::new(data);
    r.set_position(HEADER_LEN_V5);

    let mut strokes = Vec::new();
    while r.remaining() >= 8 {
        let mark = r.position();
        let declared = r.read_u32("block length")? as usize;
        let flag = r.read_u32("block type flag")?;

        if declared == 0 || declared > MAX_BLOCK_LEN || declared > r.remaining() {
            // Corrupt length field: resynchronize one byte past the mark
            // instead of skipping the declared span, so a single bad
            // length does not swallow the rest of the stream.
            r.set_position(mark + 1);
            continue;
        }

        let payload = r.read_bytes(declared, "block payload")?;
        if flag == LINE_DEFINITION_FLAG {
            if let Some(stroke) = decode_line_block(payload) {
                strokes.push(stroke);
            }
        }
    }

    Ok(Page {
        version: Version::V6,
        layers: vec![Layer { strokes }],
    })
}

/// Parses one line-definition block payload, best-effort.
///
/// Fields arrive as varuint tags whose low 4 bits select a wire type and
/// whose upper bits select a field index. Every field is structurally
/// consumed according to its wire type whether or not the index is
/// recognized, so the cursor never desynchronizes over fields added by
/// newer firmware. A block that cannot be consumed to the end yields no
/// stroke.
fn decode_line_block(payload: &[u8]) -> Option<Stroke> {
    let mut r = ByteReader::new(payload);
    let mut pen_raw = 0u32;
    let mut color_raw = 0u32;
    let mut width = 1.0f32;
    let mut points = Vec::new();

    while r.remaining() > 0 {
        let tag = r.read_varuint("field tag").ok()?;
        let index = tag >> 4;
        let wire = (tag & 0xf) as u8;

        match wire {
            WIRE_BYTE1 => {
                r.read_u8("1-byte field").ok()?;
            }
            WIRE_BYTE4 => {
                let raw = r.read_u32("4-byte field").ok()?;
                match index {
                    FIELD_TOOL => pen_raw = raw,
                    FIELD_COLOR => color_raw = raw,
                    // Starting length is read and discarded, like any
                    // other unrecognized 4-byte field.
                    FIELD_STARTING_LENGTH => {}
                    _ => {}
                }
            }
            WIRE_BYTE8 => {
                let raw = r.read_f64("8-byte field").ok()?;
                if index == FIELD_THICKNESS_SCALE {
                    width = raw as f32;
                }
            }
            WIRE_LENGTH4 => {
                let len = r.read_u32("sub-block length").ok()? as usize;
                let body = r.read_bytes(len, "sub-block payload").ok()?;
                if index == FIELD_POINTS {
                    points = decode_point_run(body);
                }
            }
            WIRE_ID => {
                // CRDT identifier pair (timestamp/move ids and any
                // future identifier fields): two varuints, skipped.
                r.read_varuint("identifier part").ok()?;
                r.read_varuint("identifier part").ok()?;
            }
            _ => return None,
        }
    }

    Some(Stroke {
        pen: Pen::from_raw(pen_raw),
        color: PenColor::from_raw(color_raw),
        width,
        layer: 0,
        points,
    })
}

/// Decodes a flat run of fixed 14-byte version-6 point records.
///
/// Channels are normalized here: speed and width from `u16` by 65535,
/// direction from the `0..=255` byte to `0..=360` degrees, pressure from
/// `u8` by 255. Trailing bytes shorter than one record are ignored.
fn decode_point_run(body: &[u8]) -> Vec<Point> {
    let mut r = ByteReader::new(body);
    let mut points = Vec::with_capacity(body.len() / POINT_LEN_V6);
    while r.remaining() >= POINT_LEN_V6 {
        let Ok(point) = decode_v6_point(&mut r) else {
            break;
        };
        points.push(point);
    }
    points
}

fn decode_v6_point(r: &mut ByteReader<'_>) -> Result<Point, DecodeError> {
    let x = r.read_f32("point x")?;
    let y = r.read_f32("point y")?;
    let speed = f32::from(r.read_u16("point speed")?) / 65535.0;
    let width = f32::from(r.read_u16("point width")?) / 65535.0;
    let direction = f32::from(r.read_u8("point direction")?) * 360.0 / 255.0;
    let pressure = f32::from(r.read_u8("point pressure")?) / 255.0;
    Ok(Point {
        x,
        y,
        speed,
        direction,
        width,
        pressure,
    })
}
