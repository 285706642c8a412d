//! Zones: pixel ranges of a port that each run their own pattern.

pub mod engine;
pub mod topology;

pub use engine::{PatternZone, RunZone};
pub use topology::{even_partition, validate_topology, TopologyError, ZoneDefinition};
