//! Plain-text rendering of analysis results.
//!
//! Pure string production: the core hands over matrices, labels and scalars,
//! and everything about layout lives here.

use aptcon_core::{AnalysisReport, Matrix, PairResult, Trend};

/// Width of one numeric table cell
const CELL_WIDTH: usize = 10;

/// Bin label for row/column `k`: the count range it covers.
fn bin_label(k: usize, bin_size: u32, block_size: u32) -> String {
    let lo = k as u32 * bin_size;
    let hi = ((k as u32 + 1) * bin_size - 1).min(block_size);
    if lo == hi {
        format!("{}", lo)
    } else {
        format!("{}-{}", lo, hi)
    }
}

fn table_header(title: &str, label_a: &str, label_b: &str) -> String {
    format!("{} — {} (rows) vs {} (columns)\n", title, label_a, label_b)
}

fn bin_header_row(rows: usize, bin_size: u32, block_size: u32) -> String {
    let mut line = format!("{:>width$}", "", width = CELL_WIDTH);
    for j in 0..rows {
        line.push_str(&format!(
            "{:>width$}",
            bin_label(j, bin_size, block_size),
            width = CELL_WIDTH
        ));
    }
    line.push('\n');
    line
}

/// Render a count matrix with marginal totals and grand total.
pub fn render_count_matrix(
    title: &str,
    pair: &PairResult,
    matrix: &Matrix<u64>,
    row_totals: &[u64],
    col_totals: &[u64],
    grand_total: u64,
    bin_size: u32,
    block_size: u32,
) -> String {
    let rows = matrix.rows();
    let mut out = table_header(title, &pair.label_a, &pair.label_b);
    out.push_str(&bin_header_row(rows, bin_size, block_size));
    for i in 0..rows {
        out.push_str(&format!(
            "{:>width$}",
            bin_label(i, bin_size, block_size),
            width = CELL_WIDTH
        ));
        for j in 0..rows {
            out.push_str(&format!("{:>width$}", matrix.get(i, j), width = CELL_WIDTH));
        }
        out.push_str(&format!("{:>width$}\n", row_totals[i], width = CELL_WIDTH));
    }
    out.push_str(&format!("{:>width$}", "total", width = CELL_WIDTH));
    for j in 0..rows {
        out.push_str(&format!("{:>width$}", col_totals[j], width = CELL_WIDTH));
    }
    out.push_str(&format!("{:>width$}\n", grand_total, width = CELL_WIDTH));
    out
}

/// Render a real-valued matrix (expected or difference).
pub fn render_value_matrix(
    title: &str,
    pair: &PairResult,
    matrix: &Matrix<f64>,
    bin_size: u32,
    block_size: u32,
) -> String {
    let rows = matrix.rows();
    let mut out = table_header(title, &pair.label_a, &pair.label_b);
    out.push_str(&bin_header_row(rows, bin_size, block_size));
    for i in 0..rows {
        out.push_str(&format!(
            "{:>width$}",
            bin_label(i, bin_size, block_size),
            width = CELL_WIDTH
        ));
        for j in 0..rows {
            out.push_str(&format!(
                "{:>width$.2}",
                matrix.get(i, j),
                width = CELL_WIDTH
            ));
        }
        out.push('\n');
    }
    out
}

/// Render the trend-sign matrix with `+` / `o` / `-` cells.
pub fn render_trend_matrix(
    pair: &PairResult,
    matrix: &Matrix<Trend>,
    bin_size: u32,
    block_size: u32,
) -> String {
    let rows = matrix.rows();
    let mut out = table_header("Trend", &pair.label_a, &pair.label_b);
    out.push_str(&bin_header_row(rows, bin_size, block_size));
    for i in 0..rows {
        out.push_str(&format!(
            "{:>width$}",
            bin_label(i, bin_size, block_size),
            width = CELL_WIDTH
        ));
        for j in 0..rows {
            out.push_str(&format!(
                "{:>width$}",
                matrix.get(i, j).symbol(),
                width = CELL_WIDTH
            ));
        }
        out.push('\n');
    }
    out
}

/// Render one pair's full section: all four matrices plus the scalars.
pub fn render_pair(pair: &PairResult, bin_size: u32, block_size: u32) -> String {
    let mut out = format!("=== Pair {} / {} ===\n\n", pair.label_a, pair.label_b);

    match &pair.statistics {
        Some(stats) => {
            out.push_str(&render_count_matrix(
                "Experimental",
                pair,
                &pair.experimental,
                &stats.row_totals,
                &stats.col_totals,
                stats.total_observations,
                bin_size,
                block_size,
            ));
            out.push('\n');
            out.push_str(&render_value_matrix(
                "Expected",
                pair,
                &stats.expected,
                bin_size,
                block_size,
            ));
            out.push('\n');
            out.push_str(&render_value_matrix(
                "Difference",
                pair,
                &stats.difference,
                bin_size,
                block_size,
            ));
            out.push('\n');
            out.push_str(&render_trend_matrix(pair, &stats.trend, bin_size, block_size));
            out.push('\n');
            out.push_str(&format!(
                "chi-square = {:.4}   df = {}   reduced df = {} ({} rows, {} cols populated)\n",
                stats.chi_square,
                stats.degrees_of_freedom,
                stats.reduced_degrees_of_freedom,
                stats.nonzero_rows,
                stats.nonzero_cols,
            ));
        }
        None => {
            out.push_str("No closed blocks for this pair; statistics undefined, skipped.\n");
        }
    }
    out
}

/// Render the run summary and every pair section.
pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();
    out.push_str("Spatial co-occurrence analysis\n");
    out.push_str("==============================\n\n");

    let e = &report.extents;
    out.push_str(&format!(
        "extents: min ({:.2}, {:.2}, {:.2})  max ({:.2}, {:.2}, {:.2}) nm\n",
        e.min[0], e.min[1], e.min[2], e.max[0], e.max[1], e.max[2]
    ));
    out.push_str("ranges:\n");
    for t in &report.ion_types {
        out.push_str(&format!("  {:<12} {:>10} ions\n", t.name, t.count));
    }
    out.push_str(&format!(
        "ranged ions: {}   block size: {}   bin size: {}   decomposed: {}\n",
        report.total_ranged,
        report.config.block_size,
        report.config.bin_size,
        report.config.decompose
    ));
    out.push_str(&format!(
        "spacing: {:.4} nm   grid: {} x {} columns   blocks: {}\n",
        report.spacing, report.grid_dims.0, report.grid_dims.1, report.total_blocks,
    ));
    out.push_str(&format!("matrix dimension: {} bins per axis\n\n", report.rows));

    for pair in &report.pairs {
        out.push_str(&render_pair(
            pair,
            report.config.bin_size,
            report.config.block_size,
        ));
        out.push('\n');
    }
    out
}

/// CSV for a count matrix, labels on both axes.
pub fn matrix_csv(matrix: &Matrix<u64>, bin_size: u32, block_size: u32) -> String {
    let rows = matrix.rows();
    let mut csv = String::from("bin");
    for j in 0..rows {
        csv.push_str(&format!(",{}", bin_label(j, bin_size, block_size)));
    }
    csv.push('\n');
    for i in 0..rows {
        csv.push_str(&bin_label(i, bin_size, block_size));
        for j in 0..rows {
            csv.push_str(&format!(",{}", matrix.get(i, j)));
        }
        csv.push('\n');
    }
    csv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_labels_clip_at_block_size() {
        assert_eq!(bin_label(0, 25, 100), "0-24");
        assert_eq!(bin_label(3, 25, 100), "75-99");
        assert_eq!(bin_label(4, 25, 100), "100");
    }

    #[test]
    fn test_matrix_csv_shape() {
        let mut m: Matrix<u64> = Matrix::new(2);
        m.set(0, 1, 3);
        let csv = matrix_csv(&m, 50, 99);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "bin,0-49,50-99");
        assert_eq!(lines[1], "0-49,0,3");
    }
}
