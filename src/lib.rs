//! A PLY (Polygon File Format) reader that turns point clouds into voxel points.
//!
//! The header of a PLY file describes the layout of its body, so the header is parsed
//! first into a [`PlyHeader`] and that schema drives either the binary little-endian or
//! the ascii body decoder. Both produce [`RawGeometry`], which [`voxelize`] shifts onto a
//! non-negative integer lattice and deduplicates into [`VoxelPoint`]s.
//!
//! # Example
//!
//! ```rust
//! use ply_voxel::VoxelizeOptions;
//!
//! let ply_data = "ply
//! format ascii 1.0
//! element vertex 2
//! property float x
//! property float y
//! property float z
//! property float nx
//! property float ny
//! property float nz
//! property uchar red
//! property uchar green
//! property uchar blue
//! end_header
//! -1.0 0.0 2.0 0 0 1 255 0 0
//! 0.5 1.0 0.0 0 0 1 0 255 0
//! ";
//!
//! let cloud = ply_voxel::from_bytes(ply_data.as_bytes(), &VoxelizeOptions::with_scale(2)).unwrap();
//! assert_eq!(cloud.points.len(), 2);
//! assert_eq!((cloud.points[0].x, cloud.points[0].y, cloud.points[0].z), (0, 2, 6));
//! assert_eq!(cloud.points[0].color, 0xFFFF0000);
//! assert_eq!(cloud.extents.length, 4);
//! ```

mod config;
pub mod de;
mod error;
mod header;
mod property;
pub mod voxel;

pub use config::VoxelizeOptions;
pub use de::{decode_body, DecodeWarning, RawGeometry};
pub use error::PlyError;
pub use header::{FaceListDef, PlyFormat, PlyHeader};
pub use property::{scalar_width, PropertyKind};
pub use voxel::{
    pack_argb, voxelize, voxelize_with_progress, Extents, ProgressSink, VoxelCloud, VoxelPoint,
};

use std::io::{BufRead, Cursor, Seek, SeekFrom};
use tracing::info;

/// Parse the header and decode the body of a PLY stream.
///
/// The body decoder starts exactly `header_len` bytes after the position the stream had
/// on entry.
pub fn read_geometry<R: BufRead + Seek>(mut reader: R) -> Result<RawGeometry, PlyError> {
    let start = reader.stream_position()?;
    let (header, header_len) = PlyHeader::parse(&mut reader)?;
    reader.seek(SeekFrom::Start(start + header_len as u64))?;

    let geometry = decode_body(&mut reader, &header)?;
    info!(
        format = %header.format,
        vertices = geometry.len(),
        faces = geometry.faces.len(),
        skipped_lines = geometry.warnings.len(),
        "decoded PLY body"
    );
    Ok(geometry)
}

/// Read a PLY stream and quantize it into voxel points.
#[tracing::instrument(skip_all, fields(scale = options.scale))]
pub fn load_voxels<R: BufRead + Seek>(
    reader: R,
    options: &VoxelizeOptions,
) -> Result<VoxelCloud, PlyError> {
    let geometry = read_geometry(reader)?;
    Ok(voxelize(&geometry, options))
}

/// Convenience function for an in-memory PLY file.
pub fn from_bytes(bytes: &[u8], options: &VoxelizeOptions) -> Result<VoxelCloud, PlyError> {
    load_voxels(Cursor::new(bytes), options)
}
