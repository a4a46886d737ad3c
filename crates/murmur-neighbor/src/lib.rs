//! `murmur-neighbor` — exact pairwise neighbor indexing.
//!
//! For every ordered species pair the simulation keeps a [`NeighborTable`]:
//! one row per member of the focal species, one [`NeighborRecord`] per member
//! of the other species.  Each row exists twice, in insertion order (*raw*)
//! and ascending by squared distance (*sorted*); behaviors read the first K
//! sorted entries as their topological neighborhood.
//!
//! Rows are refreshed from the per-tick [`AgentFrame`] captures, never from
//! live agents, so refresh and behavioral updates parallelize without
//! cross-agent races.
//!
//! [`AgentFrame`]: murmur_agent::AgentFrame

pub mod record;
pub mod sort;
pub mod table;


pub use record::{EscapeSet, NeighborRecord};
pub use table::NeighborTable;
