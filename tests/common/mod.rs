//! Synthetic `.lines`/`.rm` buffers for integration tests.

use rmdraw::ink::io_lines::LINE_DEFINITION_FLAG;

pub const MAGIC_PREFIX: &str = "reMarkable .lines file, version=";

/// One stroke for the fixed-record builders. Points are
/// `[x, y, speed, direction, width, pressure]` in wire order.
pub struct TestStroke {
    pub pen: u32,
    pub color: u32,
    pub width: f32,
    pub points: Vec<[f32; 6]>,
}

impl TestStroke {
    pub fn new(pen: u32, color: u32, width: f32) -> Self {
        Self {
            pen,
            color,
            width,
            points: Vec::new(),
        }
    }

    pub fn with_xy(mut self, coords: &[(f32, f32)]) -> Self {
        self.points = coords
            .iter()
            .map(|&(x, y)| [x, y, 0.0, 0.0, 0.5, 1.0])
            .collect();
        self
    }
}

/// Header bytes for the given revision: 33 bytes for version 3,
/// space-padded to 43 bytes otherwise.
pub fn header(version: u32) -> Vec<u8> {
    let mut text = format!("{MAGIC_PREFIX}{version}");
    if version != 3 {
        while text.len() < 43 {
            text.push(' ');
        }
    }
    text.into_bytes()
}

/// Builds a complete version-3 or version-5 page buffer.
pub fn fixed_page(version: u32, layers: &[Vec<TestStroke>]) -> Vec<u8> {
    let mut bytes = header(version);
    bytes.extend_from_slice(&(layers.len() as i32).to_le_bytes());
    for strokes in layers {
        bytes.extend_from_slice(&(strokes.len() as i32).to_le_bytes());
        for stroke in strokes {
            bytes.extend_from_slice(&stroke.pen.to_le_bytes());
            bytes.extend_from_slice(&stroke.color.to_le_bytes());
            bytes.extend_from_slice(&0u32.to_le_bytes()); // reserved
            bytes.extend_from_slice(&stroke.width.to_le_bytes());
            if version == 5 {
                bytes.extend_from_slice(&0u32.to_le_bytes()); // reserved
            }
            bytes.extend_from_slice(&(stroke.points.len() as i32).to_le_bytes());
            for point in &stroke.points {
                for field in point {
                    bytes.extend_from_slice(&field.to_le_bytes());
                }
            }
        }
    }
    bytes
}

/// Little-endian base-128 varuint encoding.
pub fn varuint(mut value: u64) -> Vec<u8> {
    let mut bytes = Vec::new();
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        bytes.push(byte);
        if value == 0 {
            return bytes;
        }
    }
}

/// One packed 14-byte version-6 point record.
pub fn v6_point(x: f32, y: f32, speed: u16, width: u16, direction: u8, pressure: u8) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(14);
    bytes.extend_from_slice(&x.to_le_bytes());
    bytes.extend_from_slice(&y.to_le_bytes());
    bytes.extend_from_slice(&speed.to_le_bytes());
    bytes.extend_from_slice(&width.to_le_bytes());
    bytes.push(direction);
    bytes.push(pressure);
    bytes
}

fn tag(index: u64, wire: u8) -> Vec<u8> {
    varuint(index << 4 | u64::from(wire))
}

/// Line-definition block payload with the recognized fields in their
/// usual order: timestamp id, move id, tool, color, thickness scale,
/// starting length, points.
pub fn v6_line_payload(pen: u32, color: u32, thickness: f64, point_records: &[Vec<u8>]) -> Vec<u8> {
    let mut bytes = Vec::new();

    bytes.extend_from_slice(&tag(6, 0xf)); // timestamp identifier pair
    bytes.extend_from_slice(&varuint(0));
    bytes.extend_from_slice(&varuint(17));
    bytes.extend_from_slice(&tag(7, 0xf)); // move identifier pair
    bytes.extend_from_slice(&varuint(0));
    bytes.extend_from_slice(&varuint(18));

    bytes.extend_from_slice(&tag(1, 0x4)); // tool
    bytes.extend_from_slice(&pen.to_le_bytes());
    bytes.extend_from_slice(&tag(2, 0x4)); // color
    bytes.extend_from_slice(&color.to_le_bytes());
    bytes.extend_from_slice(&tag(3, 0x8)); // thickness scale
    bytes.extend_from_slice(&thickness.to_le_bytes());
    bytes.extend_from_slice(&tag(4, 0x4)); // starting length
    bytes.extend_from_slice(&0.0f32.to_le_bytes());

    let mut points = Vec::new();
    for record in point_records {
        points.extend_from_slice(record);
    }
    bytes.extend_from_slice(&tag(5, 0xc)); // points sub-block
    bytes.extend_from_slice(&(points.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&points);

    bytes
}

/// Wraps a payload in a `(length, type flag)` block header.
pub fn v6_block(flag: u32, payload: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(payload.len() + 8);
    bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&flag.to_le_bytes());
    bytes.extend_from_slice(payload);
    bytes
}

/// A line-definition block carrying the given stroke.
pub fn v6_line_block(pen: u32, color: u32, thickness: f64, point_records: &[Vec<u8>]) -> Vec<u8> {
    v6_block(
        LINE_DEFINITION_FLAG,
        &v6_line_payload(pen, color, thickness, point_records),
    )
}

/// A complete version-6 page buffer from raw blocks.
pub fn v6_page(blocks: &[Vec<u8>]) -> Vec<u8> {
    let mut bytes = header(6);
    for block in blocks {
        bytes.extend_from_slice(block);
    }
    bytes
}
