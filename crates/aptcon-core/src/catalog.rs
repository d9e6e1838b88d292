//! Ion type catalog: the ordered range table the data provider exposes.

use serde::{Deserialize, Serialize};

/// Sentinel type code for unranged ions, excluded from all grids and blocks.
pub const UNRANGED: u8 = 255;

// =============================================================================
// ION TYPE
// =============================================================================

/// One ranged ion type from the dataset's range table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IonType {
    /// Range name, e.g. "Fe" or "FeO"
    pub name: String,

    /// Number of ions of this type in the dataset
    pub count: u64,

    /// Elemental composition as ordered (symbol, multiplicity) pairs.
    /// Empty for non-molecular types.
    #[serde(default)]
    pub formula: Vec<(String, u32)>,
}

impl IonType {
    /// Atomic (non-molecular) type
    pub fn atomic(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
            formula: Vec::new(),
        }
    }

    /// Molecular type with an explicit formula
    pub fn molecular(name: impl Into<String>, count: u64, formula: Vec<(&str, u32)>) -> Self {
        Self {
            name: name.into(),
            count,
            formula: formula
                .into_iter()
                .map(|(sym, n)| (sym.to_string(), n))
                .collect(),
        }
    }

    /// Total atoms per ion of this type (1 for non-molecular)
    pub fn atoms_per_ion(&self) -> u32 {
        if self.formula.is_empty() {
            1
        } else {
            self.formula.iter().map(|(_, n)| n).sum()
        }
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// Ordered, immutable mapping from raw type code to ion type.
///
/// The raw code of a type is its position in the catalog (dense `0..N-1`);
/// code [`UNRANGED`] never appears here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IonTypeCatalog {
    types: Vec<IonType>,
}

impl IonTypeCatalog {
    /// Build a catalog from an ordered type list
    pub fn new(types: Vec<IonType>) -> Self {
        debug_assert!(types.len() < UNRANGED as usize);
        Self { types }
    }

    /// Number of ranged types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Is the catalog empty?
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Type for a raw code, if ranged
    pub fn get(&self, code: u8) -> Option<&IonType> {
        self.types.get(code as usize)
    }

    /// Iterate types in catalog (= raw code) order
    pub fn iter(&self) -> impl Iterator<Item = &IonType> {
        self.types.iter()
    }

    /// Total ranged ion count across all types
    pub fn total_ranged(&self) -> u64 {
        self.types.iter().map(|t| t.count).sum()
    }
}
