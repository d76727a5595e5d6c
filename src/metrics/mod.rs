//! Local machine resource metrics.

pub mod collector;
pub mod data;

pub use collector::ResourceCollector;
pub use data::ResourceSnapshot;
