// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod analyze;
pub mod budget;
pub mod config;
pub mod dedup;
pub mod entry;
pub mod filter;
pub mod ingest;
pub mod pipeline;
pub mod rank;
pub mod regions;
pub mod source_weights;

// ---- Re-exports for stable public API ----
pub use crate::budget::extract_budget;
pub use crate::config::{Config, ConfigError, RegionSpec, WeightOverrides};
pub use crate::entry::{Budget, Entry, RawEntry};
pub use crate::filter::{filter_entries, FilterDiagnostics};
pub use crate::pipeline::{run, run_now, PipelineOutput, RunMetrics};
pub use crate::rank::{rank, PriorityBand};
pub use crate::regions::{normalize_region_group, RegionGroup};
pub use crate::source_weights::apply_source_weighting;
