use std::io::Read;

use byteorder::LittleEndian;
use tracing::warn;

use super::val_reader::BinValReader;
use super::RawGeometry;
use crate::{PlyError, PlyHeader, PropertyKind};

/// Values gathered while walking one vertex record.
///
/// Reset before each record, so a slot missing from the header keeps its default:
/// 0.0 for positions, 255 for color channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct VertexAccumulator {
    pub position: [f32; 3],
    pub color: [u8; 4],
}

impl Default for VertexAccumulator {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            color: [255; 4],
        }
    }
}

impl VertexAccumulator {
    fn read_property<R: Read>(
        &mut self,
        kind: PropertyKind,
        reader: &mut BinValReader<R, LittleEndian>,
    ) -> Result<(), PlyError> {
        match kind {
            PropertyKind::Red8 => self.color[0] = reader.read_u8()?,
            PropertyKind::Green8 => self.color[1] = reader.read_u8()?,
            PropertyKind::Blue8 => self.color[2] = reader.read_u8()?,
            PropertyKind::Alpha8 => self.color[3] = reader.read_u8()?,
            // Wide channels keep their high byte.
            PropertyKind::Red16 => self.color[0] = (reader.read_u16()? >> 8) as u8,
            PropertyKind::Green16 => self.color[1] = (reader.read_u16()? >> 8) as u8,
            PropertyKind::Blue16 => self.color[2] = (reader.read_u16()? >> 8) as u8,
            PropertyKind::Alpha16 => self.color[3] = (reader.read_u16()? >> 8) as u8,
            PropertyKind::X32 => self.position[0] = reader.read_f32()?,
            PropertyKind::Y32 => self.position[1] = reader.read_f32()?,
            PropertyKind::Z32 => self.position[2] = reader.read_f32()?,
            PropertyKind::X64 => self.position[0] = reader.read_f64()? as f32,
            PropertyKind::Y64 => self.position[1] = reader.read_f64()? as f32,
            PropertyKind::Z64 => self.position[2] = reader.read_f64()? as f32,
            PropertyKind::Pad8
            | PropertyKind::Pad16
            | PropertyKind::Pad32
            | PropertyKind::Pad64 => reader.skip(kind.size_bytes())?,
        }
        Ok(())
    }

    fn rgb(&self) -> [u8; 3] {
        [self.color[0], self.color[1], self.color[2]]
    }
}

/// Decode a little-endian binary body. `reader` must sit on the first byte after the header.
pub(crate) fn decode<R: Read>(reader: R, header: &PlyHeader) -> Result<RawGeometry, PlyError> {
    let mut reader = BinValReader::<_, LittleEndian>::new(reader);
    let mut geometry = RawGeometry::with_capacity(header.vertex_count, header.face_count);

    for index in 0..header.vertex_count {
        reader.begin_record("vertex", index);
        let mut vertex = VertexAccumulator::default();
        for &kind in &header.properties {
            vertex.read_property(kind, &mut reader)?;
        }
        geometry.push_point(vertex.position, vertex.rgb());
    }

    if let Some(list) = &header.face_list {
        if list.count_type != "int" && list.count_type != "int32" {
            warn!(
                count_type = %list.count_type,
                "face counts are read as 32-bit integers regardless of the declared type"
            );
        }
    }

    for index in 0..header.face_count {
        reader.begin_record("face", index);
        let count = reader.read_i32()?;
        let count = usize::try_from(count).map_err(|_| {
            PlyError::InvalidBody(format!("Negative index count {count} in face {index}"))
        })?;
        let mut face = Vec::with_capacity(count.min(64));
        for _ in 0..count {
            face.push(reader.read_i32()?);
        }
        geometry.faces.push(face);
    }

    Ok(geometry)
}
