//! Per-flock summaries.

use glam::{Mat3, Vec3};

/// Summary of one connected component.
///
/// `transform` packs the flock's frame as matrix columns: column 0 is the
/// forward axis (normalized mean velocity), column 1 the planar side axis,
/// column 2 the world-space centroid.  `extent` holds the bounding-box side
/// lengths along forward / side / up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockDescriptor {
    pub size:      usize,
    /// Mean member velocity.
    pub vel:       Vec3,
    /// Mean cosine similarity of member velocities vs. the mean, in
    /// `[-1, 1]`.  Size-1 flocks report 0 by convention.
    pub pol:       f32,
    pub transform: Mat3,
    pub extent:    Vec3,
}

impl FlockDescriptor {
    /// World-space centroid of the bounding box.
    #[inline]
    pub fn centroid(&self) -> Vec3 {
        self.transform.z_axis
    }

    /// Forward axis (unit, along the mean velocity).
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.transform.x_axis
    }
}

impl Default for FlockDescriptor {
    fn default() -> Self {
        FlockDescriptor {
            size:      0,
            vel:       Vec3::ZERO,
            pol:       0.0,
            transform: Mat3::IDENTITY,
            extent:    Vec3::ZERO,
        }
    }
}
