//! Quantization of decoded geometry onto a voxel lattice.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{RawGeometry, VoxelizeOptions};

/// One lattice cell with a packed `0xAARRGGBB` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoxelPoint {
    pub x: u16,
    pub y: u16,
    pub z: u16,
    pub color: u32,
}

impl VoxelPoint {
    pub fn rgb(&self) -> [u8; 3] {
        [
            (self.color >> 16) as u8,
            (self.color >> 8) as u8,
            self.color as u8,
        ]
    }
}

/// Per-axis span (`max - min`) of the emitted points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extents {
    /// X axis.
    pub width: u16,
    /// Y axis.
    pub height: u16,
    /// Z axis.
    pub length: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoxelCloud {
    /// In first-seen order of the source vertices.
    pub points: Vec<VoxelPoint>,
    pub extents: Extents,
}

/// Receives the fraction of the dedup pass completed so far.
pub trait ProgressSink {
    fn report(&mut self, fraction: f32);
}

impl<F: FnMut(f32)> ProgressSink for F {
    fn report(&mut self, fraction: f32) {
        self(fraction)
    }
}

pub fn voxelize(geometry: &RawGeometry, options: &VoxelizeOptions) -> VoxelCloud {
    voxelize_with_progress(geometry, options, &mut |_: f32| {})
}

/// Shift, quantize and deduplicate `geometry`.
///
/// 1. Every position is shifted by `|min(min_x, min_y, min_z)|`, scaled and truncated.
/// 2. Points sharing a lattice cell with an earlier point are dropped, color included.
/// 3. The smallest remaining component is subtracted from every coordinate.
pub fn voxelize_with_progress(
    geometry: &RawGeometry,
    options: &VoxelizeOptions,
    progress: &mut impl ProgressSink,
) -> VoxelCloud {
    if geometry.is_empty() {
        progress.report(1.0);
        return VoxelCloud::default();
    }

    let shift = axis_minimum(&geometry.positions).abs();
    let scale = options.scale as f32;

    let total = geometry.len();
    let mut non_finite = 0usize;
    let mut seen = HashSet::with_capacity(total);
    let mut cells = Vec::new();
    for (i, (position, color)) in geometry.positions.iter().zip(&geometry.colors).enumerate() {
        progress.report(i as f32 / total as f32);
        if !is_finite(position) {
            non_finite += 1;
            continue;
        }
        let cell = position.map(|v| ((v + shift) * scale).trunc() as i64);
        if seen.insert(cell) {
            cells.push((cell, *color));
        }
    }
    progress.report(1.0);
    if non_finite > 0 {
        warn!(non_finite, "dropped vertices with non-finite coordinates");
    }

    let min = cells
        .iter()
        .flat_map(|(cell, _)| cell.iter().copied())
        .min()
        .unwrap_or(0);

    let mut saturated = 0usize;
    let mut points = Vec::with_capacity(cells.len());
    for ([x, y, z], [r, g, b]) in cells {
        let max = x.max(y).max(z);
        if max - min < 0 {
            continue;
        }
        let mut to_u16 = |v: i64| {
            let shifted = v - min;
            u16::try_from(shifted).unwrap_or_else(|_| {
                saturated += 1;
                if shifted < 0 { 0 } else { u16::MAX }
            })
        };
        let (x, y, z) = (to_u16(x), to_u16(y), to_u16(z));
        points.push(VoxelPoint {
            x,
            y,
            z,
            color: pack_argb(255, r, g, b),
        });
    }
    if saturated > 0 {
        warn!(saturated, "coordinates clamped to the u16 lattice");
    }

    let extents = extents(&points);
    info!(
        vertices = total,
        voxels = points.len(),
        ?extents,
        "voxelized geometry"
    );
    VoxelCloud { points, extents }
}

pub fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

fn is_finite(position: &[f32; 3]) -> bool {
    position.iter().all(|v| v.is_finite())
}

/// Smallest of the three per-axis minima over finite positions, 0.0 if there are none.
fn axis_minimum(positions: &[[f32; 3]]) -> f32 {
    let mins = positions
        .iter()
        .filter(|p| is_finite(p))
        .fold([f32::INFINITY; 3], |acc, p| {
            [acc[0].min(p[0]), acc[1].min(p[1]), acc[2].min(p[2])]
        });
    let min = mins[0].min(mins[1]).min(mins[2]);
    if min.is_finite() {
        min
    } else {
        0.0
    }
}

fn extents(points: &[VoxelPoint]) -> Extents {
    let Some(first) = points.first() else {
        return Extents::default();
    };
    let init = ([first.x, first.y, first.z], [first.x, first.y, first.z]);
    let (min, max) = points.iter().fold(init, |(min, max), p| {
        (
            [min[0].min(p.x), min[1].min(p.y), min[2].min(p.z)],
            [max[0].max(p.x), max[1].max(p.y), max[2].max(p.z)],
        )
    });
    Extents {
        width: max[0] - min[0],
        height: max[1] - min[1],
        length: max[2] - min[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(points: &[([f32; 3], [u8; 3])]) -> RawGeometry {
        let mut geometry = RawGeometry::default();
        for &(position, color) in points {
            geometry.push_point(position, color);
        }
        geometry
    }

    #[test]
    fn test_shift_and_scale() {
        let geometry = geometry(&[([-1.0, 0.0, 2.0], [1, 2, 3]), ([0.5, 1.0, 0.0], [4, 5, 6])]);
        let cloud = voxelize(&geometry, &VoxelizeOptions::with_scale(2));

        // Shift by 1 then scale by 2: (0, 2, 6) and (3, 4, 2); global min 0.
        assert_eq!(
            cloud.points,
            vec![
                VoxelPoint { x: 0, y: 2, z: 6, color: 0xFF010203 },
                VoxelPoint { x: 3, y: 4, z: 2, color: 0xFF040506 },
            ]
        );
        assert_eq!(
            cloud.extents,
            Extents {
                width: 3,
                height: 2,
                length: 4
            }
        );
    }

    #[test]
    fn test_second_shift_uses_global_minimum() {
        let geometry = geometry(&[([5.2, 7.9, 6.0], [0, 0, 0]), ([9.0, 6.5, 8.1], [0, 0, 0])]);
        let cloud = voxelize(&geometry, &VoxelizeOptions::default());

        // The first shift adds |5.2| to every axis: (10, 13, 11) and (14, 11, 13).
        // The second subtracts the smallest component (10) from every axis.
        let coords: Vec<_> = cloud.points.iter().map(|p| (p.x, p.y, p.z)).collect();
        assert_eq!(coords, vec![(0, 3, 1), (4, 1, 3)]);
    }

    #[test]
    fn test_first_color_wins() {
        let geometry = geometry(&[
            ([0.1, 0.1, 0.1], [10, 10, 10]),
            ([3.0, 3.0, 3.0], [20, 20, 20]),
            ([0.7, 0.2, 0.5], [30, 30, 30]),
        ]);
        let cloud = voxelize(&geometry, &VoxelizeOptions::default());
        assert_eq!(cloud.points.len(), 2);
        assert_eq!(cloud.points[0].rgb(), [10, 10, 10]);
        assert_eq!(cloud.points[1].rgb(), [20, 20, 20]);
    }

    #[test]
    fn test_idempotent() {
        let geometry = geometry(&[
            ([-3.5, 2.0, 1.0], [1, 1, 1]),
            ([-3.5, 2.0, 1.0], [2, 2, 2]),
            ([4.0, -1.25, 0.0], [3, 3, 3]),
        ]);
        let options = VoxelizeOptions::with_scale(4);
        assert_eq!(voxelize(&geometry, &options), voxelize(&geometry, &options));
    }

    #[test]
    fn test_empty_geometry() {
        let cloud = voxelize(&RawGeometry::default(), &VoxelizeOptions::default());
        assert!(cloud.points.is_empty());
        assert_eq!(cloud.extents, Extents::default());
    }

    #[test]
    fn test_progress_reports() {
        let geometry = geometry(&[([0.0; 3], [0; 3]), ([1.0; 3], [0; 3]), ([1.0; 3], [0; 3])]);
        let mut reports = Vec::new();
        voxelize_with_progress(&geometry, &VoxelizeOptions::default(), &mut |f: f32| {
            reports.push(f)
        });
        assert_eq!(reports.len(), 4);
        assert_eq!(reports[0], 0.0);
        assert_eq!(*reports.last().unwrap(), 1.0);
        assert!(reports.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_large_coordinates_saturate() {
        let geometry = geometry(&[([0.0; 3], [0; 3]), ([70000.0, 1.0, 2.0], [0; 3])]);
        let cloud = voxelize(&geometry, &VoxelizeOptions::default());
        assert_eq!(cloud.points[1].x, u16::MAX);
        assert_eq!(cloud.points[1].y, 1);
    }

    #[test]
    fn test_non_finite_positions_are_dropped() {
        let geometry = geometry(&[
            ([0.0, 0.0, 0.0], [1, 1, 1]),
            ([f32::NEG_INFINITY, 0.0, 0.0], [2, 2, 2]),
            ([5.0, 5.0, 5.0], [3, 3, 3]),
            ([f32::NAN, f32::NAN, f32::NAN], [4, 4, 4]),
            ([9.0, 1.0, 3.0], [5, 5, 5]),
        ]);
        let cloud = voxelize(&geometry, &VoxelizeOptions::default());
        let points: Vec<_> = cloud.points.iter().map(|p| (p.x, p.y, p.z, p.rgb())).collect();
        assert_eq!(
            points,
            vec![
                (0, 0, 0, [1, 1, 1]),
                (5, 5, 5, [3, 3, 3]),
                (9, 1, 3, [5, 5, 5]),
            ]
        );
    }

    #[test]
    fn test_only_non_finite_positions() {
        let geometry = geometry(&[([f32::INFINITY, 0.0, 0.0], [1, 1, 1])]);
        let cloud = voxelize(&geometry, &VoxelizeOptions::default());
        assert!(cloud.points.is_empty());
        assert_eq!(cloud.extents, Extents::default());
    }

    #[test]
    fn test_pack_argb() {
        assert_eq!(pack_argb(0xFF, 0x12, 0x34, 0x56), 0xFF123456);
    }
}
