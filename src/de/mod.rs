mod ascii;
mod binary;

mod val_reader;

use std::io::BufRead;

use crate::{PlyError, PlyFormat, PlyHeader};

/// Cap on up-front allocation driven by header-declared counts.
const MAX_PREALLOC: usize = 1 << 20;

/// A body line the ascii decoder skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeWarning {
    /// 1-based line number, counted from the first body line.
    pub line: usize,
    pub message: String,
}

/// Decoded body, before any quantization.
///
/// `positions` and `colors` always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGeometry {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[u8; 3]>,
    pub faces: Vec<Vec<i32>>,
    pub warnings: Vec<DecodeWarning>,
}

impl RawGeometry {
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count.min(MAX_PREALLOC)),
            colors: Vec::with_capacity(vertex_count.min(MAX_PREALLOC)),
            faces: Vec::with_capacity(face_count.min(MAX_PREALLOC)),
            warnings: Vec::new(),
        }
    }

    pub fn push_point(&mut self, position: [f32; 3], color: [u8; 3]) {
        self.positions.push(position);
        self.colors.push(color);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Decode the body that follows `header`. The reader must be positioned on its first byte.
pub fn decode_body<R: BufRead>(reader: R, header: &PlyHeader) -> Result<RawGeometry, PlyError> {
    match header.format {
        PlyFormat::BinaryLittleEndian => binary::decode(reader, header),
        PlyFormat::Ascii => ascii::decode(reader, header),
    }
}
