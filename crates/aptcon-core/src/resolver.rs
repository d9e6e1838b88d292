//! Type resolver: raw type codes to dense element indices.
//!
//! Built once per run from the immutable catalog and passed read-only into
//! every downstream component; never recomputed per chunk or per pair.

use crate::catalog::IonTypeCatalog;

/// Mapping from raw ion-type codes to dense element indices and names.
///
/// In decomposed mode each molecular type expands to one entry per
/// constituent atom (repeated per multiplicity); in direct mode every raw
/// type is a single "element" of its own.
#[derive(Debug, Clone)]
pub struct TypeResolver {
    /// Canonical name per dense element index, in first-seen order
    element_names: Vec<String>,
    /// Per raw code: constituent element indices, repeated per multiplicity
    expansions: Vec<Vec<u16>>,
}

impl TypeResolver {
    /// Decomposing resolver: molecular formulas expand into elements.
    ///
    /// Dense indices are assigned the first time an element symbol is seen,
    /// iterating the catalog in order. A type with no formula contributes a
    /// single element under its own name.
    pub fn decomposed(catalog: &IonTypeCatalog) -> Self {
        let mut element_names: Vec<String> = Vec::new();
        let mut index_of = |names: &mut Vec<String>, symbol: &str| -> u16 {
            match names.iter().position(|n| n == symbol) {
                Some(idx) => idx as u16,
                None => {
                    names.push(symbol.to_string());
                    (names.len() - 1) as u16
                }
            }
        };

        let mut expansions = Vec::with_capacity(catalog.len());
        for ion_type in catalog.iter() {
            let mut expansion = Vec::new();
            if ion_type.formula.is_empty() {
                expansion.push(index_of(&mut element_names, &ion_type.name));
            } else {
                for (symbol, multiplicity) in &ion_type.formula {
                    let idx = index_of(&mut element_names, symbol);
                    for _ in 0..*multiplicity {
                        expansion.push(idx);
                    }
                }
            }
            expansions.push(expansion);
        }

        Self {
            element_names,
            expansions,
        }
    }

    /// Direct resolver: identity mapping, one name per raw type.
    pub fn direct(catalog: &IonTypeCatalog) -> Self {
        let element_names = catalog.iter().map(|t| t.name.clone()).collect();
        let expansions = (0..catalog.len()).map(|i| vec![i as u16]).collect();
        Self {
            element_names,
            expansions,
        }
    }

    /// Build per the decomposition flag
    pub fn for_mode(catalog: &IonTypeCatalog, decompose: bool) -> Self {
        if decompose {
            Self::decomposed(catalog)
        } else {
            Self::direct(catalog)
        }
    }

    /// Number of dense element indices
    pub fn num_elements(&self) -> usize {
        self.element_names.len()
    }

    /// Axis labels, one per dense element index
    pub fn element_names(&self) -> &[String] {
        &self.element_names
    }

    /// Constituent element indices for a raw code, multiplicities expanded.
    /// Empty for codes outside the catalog.
    pub fn expand(&self, code: u8) -> &[u16] {
        self.expansions
            .get(code as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
