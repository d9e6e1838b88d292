//! Spatial co-occurrence (contingency-table) statistics for classified 3D
//! ion clouds, as used on atom-probe tomography datasets.
//!
//! For each pair of particle types the analysis partitions the volume into
//! spatial blocks holding a target ion count, bins the per-block counts of
//! each type, and derives experimental vs. expected (independence) tables, a
//! chi-square statistic, and a trend-sign matrix.
//!
//! # Pipeline
//!
//! 1. [`resolver::TypeResolver`] — raw type codes to dense element indices
//! 2. [`geometry::GridGeometry`] — block spacing and 2D grid dimensions
//! 3. [`accumulate`] — streaming per-column accumulation and block closure
//! 4. [`contingency`] — per-pair binned co-occurrence matrices
//! 5. [`stats::PairStatistics`] — expected values, chi-square, trend signs
//!
//! [`analysis::CoOccurrenceAnalysis`] orchestrates the full run against any
//! [`provider::IonDataProvider`]; rendering of the resulting
//! [`analysis::AnalysisReport`] is left to an external collaborator.

pub mod accumulate;
pub mod analysis;
pub mod catalog;
pub mod config;
pub mod contingency;
pub mod errors;
pub mod geometry;
pub mod provider;
pub mod resolver;
pub mod stats;
pub mod types;

// Re-exports
pub use accumulate::{accumulate_blocks, Block, BlockAccumulator, BlockSet};
pub use analysis::{AnalysisReport, CoOccurrenceAnalysis, IonTypeSummary, PairResult};
pub use catalog::{IonType, IonTypeCatalog, UNRANGED};
pub use config::AnalysisConfig;
pub use contingency::{element_pairs, experimental_matrix};
pub use errors::{CoocError, Result};
pub use geometry::GridGeometry;
pub use provider::{IonChunk, IonDataProvider, MemoryDataset};
pub use resolver::TypeResolver;
pub use stats::{PairStatistics, CHI_SQUARE_EXPECTED_FLOOR};
pub use types::{Extents, Matrix, Trend};

/// Crate version (from Cargo.toml)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
