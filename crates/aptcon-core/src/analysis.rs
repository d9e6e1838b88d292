//! Analysis orchestration: config → resolver → geometry → accumulation →
//! per-pair tables and statistics.
//!
//! Produces plain structured numeric results; all table/text formatting
//! belongs to the external report collaborator.

use crate::accumulate::accumulate_blocks;
use crate::config::AnalysisConfig;
use crate::contingency::{element_pairs, experimental_matrix};
use crate::errors::Result;
use crate::geometry::GridGeometry;
use crate::provider::IonDataProvider;
use crate::resolver::TypeResolver;
use crate::stats::PairStatistics;
use crate::types::{Extents, Matrix};
use serde::{Deserialize, Serialize};

// =============================================================================
// RESULTS
// =============================================================================

/// Per-type summary of the catalog, for the basic ranges table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IonTypeSummary {
    /// Range name
    pub name: String,
    /// Ions of this type in the dataset
    pub count: u64,
}

/// One unordered element pair's complete output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairResult {
    /// Dense element index of the first axis
    pub element_a: usize,
    /// Dense element index of the second axis
    pub element_b: usize,
    /// Axis label for element A
    pub label_a: String,
    /// Axis label for element B
    pub label_b: String,
    /// Binned co-occurrence counts across all blocks
    pub experimental: Matrix<u64>,
    /// Derived statistics; `None` when the table was empty (degenerate pair,
    /// skipped with a warning rather than emitting NaN)
    pub statistics: Option<PairStatistics>,
}

/// Complete analysis output handed to the report collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Parameters the run was performed with
    pub config: AnalysisConfig,
    /// Dataset bounding box
    pub extents: Extents,
    /// Per-type name/count summary in catalog order
    pub ion_types: Vec<IonTypeSummary>,
    /// Total ranged ions
    pub total_ranged: u64,
    /// Block spacing (nm)
    pub spacing: f32,
    /// Grid dimensions (columns along X, Y)
    pub grid_dims: (usize, usize),
    /// Closed blocks across the whole dataset
    pub total_blocks: usize,
    /// Matrix dimension shared by all pairs
    pub rows: usize,
    /// Axis labels, one per dense element index
    pub element_names: Vec<String>,
    /// One result per unordered element pair, `a < b` in axis order
    pub pairs: Vec<PairResult>,
}

// =============================================================================
// ANALYSIS
// =============================================================================

/// Spatial co-occurrence analysis over an ion data provider.
pub struct CoOccurrenceAnalysis {
    config: AnalysisConfig,
}

impl CoOccurrenceAnalysis {
    /// Create an analysis run; the config is validated in [`Self::run`]
    /// before any computation.
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Execute the full pipeline against a dataset.
    ///
    /// Resolver and geometry are computed once up front and treated as
    /// read-only; the dataset is streamed in a single fused pass.
    pub fn run(&self, provider: &dyn IonDataProvider) -> Result<AnalysisReport> {
        self.config.validate()?;

        let catalog = provider.catalog();
        let extents = provider.extents();
        let total_ranged = catalog.total_ranged();

        let resolver = TypeResolver::for_mode(catalog, self.config.decompose);
        let geometry = GridGeometry::compute(&extents, self.config.block_size, total_ranged)?;
        log::info!(
            "grid: spacing {:.4} nm, {}x{} columns, {} ranged ions, {} element axes",
            geometry.spacing,
            geometry.nx,
            geometry.ny,
            total_ranged,
            resolver.num_elements()
        );

        let blocks = accumulate_blocks(provider, geometry, &resolver, self.config.block_size)?;

        let rows = self.config.rows();
        let mut pairs = Vec::new();
        for (a, b) in element_pairs(resolver.num_elements()) {
            let experimental = experimental_matrix(&blocks, a, b, self.config.bin_size, rows);
            let statistics = match PairStatistics::compute(&experimental) {
                Ok(stats) => Some(stats),
                Err(err) => {
                    log::warn!(
                        "pair ({}, {}): statistics skipped: {}",
                        resolver.element_names()[a],
                        resolver.element_names()[b],
                        err
                    );
                    None
                }
            };
            pairs.push(PairResult {
                element_a: a,
                element_b: b,
                label_a: resolver.element_names()[a].clone(),
                label_b: resolver.element_names()[b].clone(),
                experimental,
                statistics,
            });
        }

        Ok(AnalysisReport {
            config: self.config,
            extents,
            ion_types: catalog
                .iter()
                .map(|t| IonTypeSummary {
                    name: t.name.clone(),
                    count: t.count,
                })
                .collect(),
            total_ranged,
            spacing: geometry.spacing,
            grid_dims: (geometry.nx, geometry.ny),
            total_blocks: blocks.len(),
            rows,
            element_names: resolver.element_names().to_vec(),
            pairs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{IonType, IonTypeCatalog};
    use crate::provider::MemoryDataset;

    /// Deterministic interleaved lattice of two types inside a unit-ish box
    fn two_type_dataset(n_fe: usize, n_ni: usize) -> MemoryDataset {
        let total = n_fe + n_ni;
        let mut positions = Vec::with_capacity(total);
        let mut types = Vec::with_capacity(total);
        for i in 0..total {
            // Low-discrepancy-ish scatter, reproducible without an RNG
            let t = i as f32;
            positions.push([
                (t * 0.618_034).fract() * 10.0,
                (t * 0.754_877).fract() * 10.0,
                (t * 0.569_840).fract() * 10.0,
            ]);
            types.push(if i % (total / n_ni.max(1)).max(2) == 0 { 1 } else { 0 });
        }
        let n_ones = types.iter().filter(|&&t| t == 1).count();
        let catalog = IonTypeCatalog::new(vec![
            IonType::atomic("Fe", (total - n_ones) as u64),
            IonType::atomic("Ni", n_ones as u64),
        ]);
        MemoryDataset::new(
            Extents::new([0.0; 3], [10.0; 3]),
            catalog,
            positions,
            types,
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_config_aborts_without_output() {
        let dataset = two_type_dataset(600, 400);
        let analysis = CoOccurrenceAnalysis::new(AnalysisConfig {
            block_size: 25,
            bin_size: 50,
            decompose: false,
        });
        assert!(analysis.run(&dataset).is_err());
    }

    #[test]
    fn test_single_pair_for_two_types() {
        let dataset = two_type_dataset(600, 400);
        let report = CoOccurrenceAnalysis::new(AnalysisConfig {
            block_size: 100,
            bin_size: 25,
            decompose: false,
        })
        .run(&dataset)
        .unwrap();

        assert_eq!(report.rows, 5);
        assert_eq!(report.pairs.len(), 1);
        assert_eq!(report.pairs[0].label_a, "Fe");
        assert_eq!(report.pairs[0].label_b, "Ni");
        assert_eq!(
            report.pairs[0].experimental.total(),
            report.total_blocks as u64
        );
    }

    #[test]
    fn test_degenerate_pair_statistics_skipped_not_nan() {
        // Block size larger than the dataset: no block ever closes, the
        // pair's table is empty and statistics must be absent, not NaN.
        let dataset = two_type_dataset(30, 10);
        let report = CoOccurrenceAnalysis::new(AnalysisConfig {
            block_size: 1000,
            bin_size: 100,
            decompose: false,
        })
        .run(&dataset)
        .unwrap();

        assert_eq!(report.total_blocks, 0);
        assert_eq!(report.pairs.len(), 1);
        assert!(report.pairs[0].statistics.is_none());
    }
}
