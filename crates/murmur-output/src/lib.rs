//! `murmur-output` — observers that export running simulations.
//!
//! [`TimeSeriesObserver`] hooks into the simulation's event stream and
//! appends one CSV row per awake agent at a configurable sampling interval.
//! Observer callbacks cannot return errors, so I/O failures are latched and
//! surface from [`TimeSeriesObserver::finish`].

pub mod error;
pub mod timeseries;

#[cfg(test)]
mod tests;

pub use error::{OutputError, OutputResult};
pub use timeseries::TimeSeriesObserver;
