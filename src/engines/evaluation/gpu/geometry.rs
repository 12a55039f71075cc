//! Work partition for the block-reduction kernel.
//!
//! Samples are spread one per thread over `blocks` blocks of `block_size`
//! threads. When the sample count is not a multiple of the block size the
//! grid is padded up to the next multiple; padded threads contribute zero to
//! every sum, so no sample is dropped and the result matches the sequential
//! reduction.

use crate::engines::evaluation::correlation::CorrelationSums;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchGeometry {
    pub samples: usize,
    pub block_size: usize,
    pub blocks: usize,
}

impl LaunchGeometry {
    pub fn new(samples: usize, block_size: usize) -> Self {
        let block_size = block_size.max(1);
        Self {
            samples,
            block_size,
            blocks: samples.div_ceil(block_size),
        }
    }

    /// Threads launched in total, padding included.
    pub fn padded_samples(&self) -> usize {
        self.blocks * self.block_size
    }

    /// Threads that carry no sample.
    pub fn padding(&self) -> usize {
        self.padded_samples() - self.samples
    }

    /// Dynamic shared memory for the three per-block scratch arrays.
    pub fn shared_mem_bytes(&self) -> usize {
        3 * self.block_size * std::mem::size_of::<f64>()
    }
}

/// Sum per-block partials read back from the device, in block order.
pub fn reduce_partials(sum: &[f64], sum_sq: &[f64], sum_product: &[f64]) -> CorrelationSums {
    CorrelationSums {
        sum: sum.iter().sum(),
        sum_sq: sum_sq.iter().sum(),
        sum_product: sum_product.iter().sum(),
    }
}

/// Largest power of two not above `limit`; the tree reduction halves its stride each round.
pub fn block_size_for(limit: usize) -> usize {
    if limit == 0 {
        1
    } else {
        1 << (usize::BITS - 1 - limit.leading_zeros())
    }
}
