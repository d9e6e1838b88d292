//! Analysis configuration.

use crate::errors::{CoocError, Result};
use serde::{Deserialize, Serialize};

/// Largest supported block size (ions per spatial block)
pub const MAX_BLOCK_SIZE: u32 = 1000;

/// Co-occurrence analysis parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Ions per spatial block (1..=1000)
    pub block_size: u32,

    /// Ions per count bin; must not exceed `block_size`
    pub bin_size: u32,

    /// Expand molecular types into elemental constituents before binning
    pub decompose: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            block_size: 100,
            bin_size: 25,
            decompose: false,
        }
    }
}

impl AnalysisConfig {
    /// Validate parameters before any computation runs.
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 || self.block_size > MAX_BLOCK_SIZE {
            return Err(CoocError::config(format!(
                "block size {} outside supported range 1..={}",
                self.block_size, MAX_BLOCK_SIZE
            )));
        }
        if self.bin_size == 0 {
            return Err(CoocError::config("bin size must be at least 1"));
        }
        if self.bin_size > self.block_size {
            return Err(CoocError::config(format!(
                "bin size {} exceeds block size {}",
                self.bin_size, self.block_size
            )));
        }
        Ok(())
    }

    /// Matrix dimension: number of bins covering counts `0..=block_size`.
    ///
    /// `rows = ceil((block_size + 1) / bin_size)`, so any per-block count
    /// maps to a bin index strictly below `rows`.
    pub fn rows(&self) -> usize {
        ((self.block_size + self.bin_size) / self.bin_size) as usize
    }
}
