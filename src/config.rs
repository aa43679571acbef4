use serde::{Deserialize, Serialize};

/// Knobs for turning decoded geometry into voxel points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoxelizeOptions {
    /// Lattice cells per model unit. Coordinates are multiplied by this before truncation.
    pub scale: u32,
}

impl Default for VoxelizeOptions {
    fn default() -> Self {
        Self { scale: 1 }
    }
}

impl VoxelizeOptions {
    pub fn with_scale(scale: u32) -> Self {
        Self { scale }
    }
}
