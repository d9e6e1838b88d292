//! Output artifacts: summary JSON, text report, and per-pair CSV matrices.

use crate::render::{matrix_csv, render_report};
use anyhow::{Context, Result};
use aptcon_core::AnalysisReport;
use std::fs;
use std::path::{Path, PathBuf};

/// Output directory contract for one analysis run.
///
/// ```text
/// out/
///   summary.json        # full AnalysisReport, machine-readable
///   report.txt          # rendered tables
///   tables/
///     <A>_<B>.csv       # experimental matrix per pair
/// ```
pub struct OutputBundle {
    root: PathBuf,
}

impl OutputBundle {
    /// Create the output directory structure.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("tables"))
            .with_context(|| format!("Failed to create output dir: {}", root.display()))?;
        Ok(Self { root })
    }

    /// Output root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write every artifact for a report. Returns the files generated.
    pub fn write(&self, report: &AnalysisReport) -> Result<Vec<PathBuf>> {
        let mut generated = Vec::new();

        let summary_path = self.root.join("summary.json");
        let json = serde_json::to_string_pretty(report)?;
        fs::write(&summary_path, json)
            .with_context(|| format!("Failed to write {}", summary_path.display()))?;
        generated.push(summary_path);

        let report_path = self.root.join("report.txt");
        fs::write(&report_path, render_report(report))
            .with_context(|| format!("Failed to write {}", report_path.display()))?;
        generated.push(report_path);

        for pair in &report.pairs {
            let name = format!(
                "{}_{}.csv",
                sanitize(&pair.label_a),
                sanitize(&pair.label_b)
            );
            let path = self.root.join("tables").join(name);
            fs::write(
                &path,
                matrix_csv(
                    &pair.experimental,
                    report.config.bin_size,
                    report.config.block_size,
                ),
            )
            .with_context(|| format!("Failed to write {}", path.display()))?;
            generated.push(path);
        }

        log::info!(
            "wrote {} output files under {}",
            generated.len(),
            self.root.display()
        );
        Ok(generated)
    }
}

/// Keep file names portable: labels may contain arbitrary range strings.
fn sanitize(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
