//! Statistics for the frame pipeline

pub mod metrics;

pub use metrics::{PipelineStats, StatsSnapshot};
