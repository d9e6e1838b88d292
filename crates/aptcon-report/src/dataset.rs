//! Dataset loading: JSONL ion records plus a JSON range file.
//!
//! The range file declares the ordered type table; per-type counts and the
//! bounding box are derived while streaming the records, so the files stay
//! minimal.

use anyhow::{Context, Result};
use aptcon_core::{Extents, IonType, IonTypeCatalog, MemoryDataset, UNRANGED};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

// =============================================================================
// FILE SCHEMAS
// =============================================================================

/// One ion record, one JSON object per line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IonRecord {
    /// Position (nm)
    pub position: [f32; 3],
    /// Raw type code; 255 = unranged
    pub type_code: u8,
}

/// One entry of the range file's ordered type list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeEntry {
    /// Range name, e.g. "Fe" or "Fe2O3"
    pub name: String,
    /// Elemental composition; empty or absent for atomic types
    #[serde(default)]
    pub composition: Vec<CompositionTerm>,
}

/// One element term of a molecular composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionTerm {
    /// Element symbol
    pub element: String,
    /// Atoms of this element per ion
    pub n: u32,
}

/// Range file: the ordered type table (position = raw code).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeFile {
    /// Types in raw-code order
    pub types: Vec<RangeEntry>,
}

// =============================================================================
// LOADING
// =============================================================================

/// Read the range file.
pub fn read_ranges(path: impl AsRef<Path>) -> Result<RangeFile> {
    let json = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read range file: {}", path.as_ref().display()))?;
    let ranges: RangeFile = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse range file: {}", path.as_ref().display()))?;
    Ok(ranges)
}

/// Read ion records (JSONL) and assemble the in-memory dataset.
///
/// Counts per type and the extents come from the records themselves; a
/// record whose code is neither in the range table nor the sentinel is an
/// error rather than silently misattributed.
pub fn read_dataset(
    ions_path: impl AsRef<Path>,
    ranges: &RangeFile,
) -> Result<MemoryDataset> {
    let file = File::open(ions_path.as_ref())
        .with_context(|| format!("Failed to open ion file: {}", ions_path.as_ref().display()))?;
    let reader = BufReader::new(file);

    let mut positions = Vec::new();
    let mut types = Vec::new();
    let mut counts = vec![0u64; ranges.types.len()];
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let record: IonRecord = serde_json::from_str(trimmed)
            .with_context(|| format!("Failed to parse ion record on line {}", line_num + 1))?;

        if record.type_code != UNRANGED {
            let idx = record.type_code as usize;
            if idx >= ranges.types.len() {
                anyhow::bail!(
                    "line {}: type code {} outside range table of {} types",
                    line_num + 1,
                    record.type_code,
                    ranges.types.len()
                );
            }
            counts[idx] += 1;
        }
        for i in 0..3 {
            min[i] = min[i].min(record.position[i]);
            max[i] = max[i].max(record.position[i]);
        }
        positions.push(record.position);
        types.push(record.type_code);
    }

    if positions.is_empty() {
        anyhow::bail!(
            "ion file {} contains no records",
            ions_path.as_ref().display()
        );
    }

    let catalog = IonTypeCatalog::new(
        ranges
            .types
            .iter()
            .zip(counts.iter())
            .map(|(entry, &count)| IonType {
                name: entry.name.clone(),
                count,
                formula: entry
                    .composition
                    .iter()
                    .map(|term| (term.element.clone(), term.n))
                    .collect(),
            })
            .collect(),
    );

    log::info!(
        "loaded {} records ({} ranged) from {}",
        positions.len(),
        catalog.total_ranged(),
        ions_path.as_ref().display()
    );

    let dataset = MemoryDataset::new(Extents::new(min, max), catalog, positions, types)?;
    Ok(dataset)
}

// =============================================================================
// WRITING
// =============================================================================

/// Streaming writer for ion JSONL files.
pub struct IonWriter {
    writer: BufWriter<File>,
}

impl IonWriter {
    /// Create a new ion file, truncating any existing one.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create ion file: {}", path.as_ref().display()))?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Write a single record (JSONL format).
    pub fn write_record(&mut self, record: &IonRecord) -> Result<()> {
        let json = serde_json::to_string(record)?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    /// Flush to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aptcon_core::IonDataProvider;
    use tempfile::TempDir;

    fn fe_ni_ranges() -> RangeFile {
        RangeFile {
            types: vec![
                RangeEntry {
                    name: "Fe".to_string(),
                    composition: vec![],
                },
                RangeEntry {
                    name: "Ni".to_string(),
                    composition: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_jsonl_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ions.jsonl");

        {
            let mut writer = IonWriter::new(&path).unwrap();
            writer
                .write_record(&IonRecord {
                    position: [1.0, 2.0, 3.0],
                    type_code: 0,
                })
                .unwrap();
            writer
                .write_record(&IonRecord {
                    position: [4.0, 5.0, 6.0],
                    type_code: 1,
                })
                .unwrap();
            writer
                .write_record(&IonRecord {
                    position: [0.5, 0.5, 0.5],
                    type_code: UNRANGED,
                })
                .unwrap();
            writer.flush().unwrap();
        }

        let dataset = read_dataset(&path, &fe_ni_ranges()).unwrap();
        assert_eq!(dataset.len(), 3);

        let catalog = dataset.catalog();
        assert_eq!(catalog.get(0).unwrap().count, 1);
        assert_eq!(catalog.get(1).unwrap().count, 1);
        assert_eq!(catalog.total_ranged(), 2);

        // Extents span all records, sentinel included
        let extents = dataset.extents();
        assert_eq!(extents.min, [0.5, 0.5, 0.5]);
        assert_eq!(extents.max, [4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_unknown_type_code_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ions.jsonl");
        std::fs::write(&path, "{\"position\":[0,0,0],\"type_code\":9}\n").unwrap();

        let err = read_dataset(&path, &fe_ni_ranges());
        assert!(err.is_err());
        assert!(err.unwrap_err().to_string().contains("type code 9"));
    }

    #[test]
    fn test_range_file_parsing_with_composition() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ranges.json");
        std::fs::write(
            &path,
            r#"{"types":[{"name":"Fe2O3","composition":[{"element":"Fe","n":2},{"element":"O","n":3}]},{"name":"Ni"}]}"#,
        )
        .unwrap();

        let ranges = read_ranges(&path).unwrap();
        assert_eq!(ranges.types.len(), 2);
        assert_eq!(ranges.types[0].composition.len(), 2);
        assert_eq!(ranges.types[0].composition[1].element, "O");
        assert!(ranges.types[1].composition.is_empty());
    }
}
