//! Ion data provider seam.
//!
//! The core never owns dataset storage; it consumes a bounding box, the type
//! catalog, and a chunked column-oriented record stream through this trait.

use crate::catalog::IonTypeCatalog;
use crate::errors::{CoocError, Result};
use crate::types::Extents;

/// One chunk of the record stream: parallel position/type arrays of equal
/// length, aligned by index.
#[derive(Debug, Clone, Copy)]
pub struct IonChunk<'a> {
    /// Ion positions (nm)
    pub positions: &'a [[f32; 3]],
    /// Raw type codes; [`crate::catalog::UNRANGED`] marks excluded records
    pub types: &'a [u8],
}

impl<'a> IonChunk<'a> {
    /// Records in this chunk
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Is the chunk empty?
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// External dataset collaborator.
///
/// `for_each_chunk` must be re-iterable: every call traverses the full
/// dataset in the same record order. The analysis is single-threaded and
/// never revisits a chunk within one pass.
pub trait IonDataProvider {
    /// Bounding box of the dataset
    fn extents(&self) -> Extents;

    /// Ordered type catalog
    fn catalog(&self) -> &IonTypeCatalog;

    /// Stream every chunk, in order, through `visit`
    fn for_each_chunk(&self, visit: &mut dyn FnMut(IonChunk<'_>) -> Result<()>) -> Result<()>;
}

// =============================================================================
// IN-MEMORY DATASET
// =============================================================================

/// Simple provider over fully materialized arrays.
///
/// Backs the CLI loaders and the test harness; larger deployments can
/// implement [`IonDataProvider`] over their own storage.
#[derive(Debug, Clone)]
pub struct MemoryDataset {
    extents: Extents,
    catalog: IonTypeCatalog,
    positions: Vec<[f32; 3]>,
    types: Vec<u8>,
    chunk_len: usize,
}

/// Default records per streamed chunk
pub const DEFAULT_CHUNK_LEN: usize = 8192;

impl MemoryDataset {
    /// Create a dataset; positions and types must be index-aligned.
    pub fn new(
        extents: Extents,
        catalog: IonTypeCatalog,
        positions: Vec<[f32; 3]>,
        types: Vec<u8>,
    ) -> Result<Self> {
        if positions.len() != types.len() {
            return Err(CoocError::dataset(format!(
                "position/type arrays misaligned: {} positions vs {} types",
                positions.len(),
                types.len()
            )));
        }
        Ok(Self {
            extents,
            catalog,
            positions,
            types,
            chunk_len: DEFAULT_CHUNK_LEN,
        })
    }

    /// Override the chunk length (mainly for tests exercising chunk seams)
    pub fn with_chunk_len(mut self, chunk_len: usize) -> Self {
        self.chunk_len = chunk_len.max(1);
        self
    }

    /// Total records, ranged or not
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Is the dataset empty?
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl IonDataProvider for MemoryDataset {
    fn extents(&self) -> Extents {
        self.extents
    }

    fn catalog(&self) -> &IonTypeCatalog {
        &self.catalog
    }

    fn for_each_chunk(&self, visit: &mut dyn FnMut(IonChunk<'_>) -> Result<()>) -> Result<()> {
        for (positions, types) in self
            .positions
            .chunks(self.chunk_len)
            .zip(self.types.chunks(self.chunk_len))
        {
            visit(IonChunk { positions, types })?;
        }
        Ok(())
    }
}
