//! `murmur-flock` — emergent flock membership tracking.
//!
//! A [`FlockTracker`] is fed one `(index, pos, vel)` sample per awake agent,
//! clusters them into connected components under a distance threshold, and
//! summarizes each component as a [`FlockDescriptor`] (size, mean velocity,
//! polarization, velocity-aligned bounding box).  Between clustering runs the
//! descriptors coast: [`FlockTracker::track`] advects each centroid by its
//! flock's mean velocity.

pub mod descriptor;
pub mod tracker;

#[cfg(test)]
mod tests;

pub use descriptor::FlockDescriptor;
pub use tracker::FlockTracker;
