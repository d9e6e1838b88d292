//! Report collaborator for the aptcon co-occurrence analysis.
//!
//! The core produces plain numeric results ([`aptcon_core::AnalysisReport`]);
//! this crate owns everything presentational: text-table rendering, output
//! files, dataset loading for the CLI, and the `aptcon` binary itself.

pub mod dataset;
pub mod outputs;
pub mod render;

// Re-exports
pub use dataset::{read_dataset, read_ranges, IonRecord, IonWriter, RangeEntry, RangeFile};
pub use outputs::OutputBundle;
pub use render::{matrix_csv, render_pair, render_report};

/// Crate version (from Cargo.toml)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
