//! Per-channel intensity histogram.
//!
//! A [`Histogram`] is a fixed 3×256 matrix of pixel counts, one row per
//! RGB channel. It is computed once from an [`Image`](crate::Image) by
//! `pixkit_ops::histogram::compute` and never mutated afterwards.

use crate::{Channel, Error, Result};

/// Number of bins per channel.
pub const BINS: usize = 256;

/// RGB frequency table: `counts[channel][value]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: [[u32; BINS]; 3],
}

impl Histogram {
    /// Wraps a precomputed count matrix.
    ///
    /// # Errors
    ///
    /// Rows must describe the same number of pixels; a histogram whose
    /// rows disagree cannot have come from a single image.
    pub fn from_counts(counts: [[u32; BINS]; 3]) -> Result<Self> {
        let totals: Vec<u64> = counts
            .iter()
            .map(|row| row.iter().map(|&c| c as u64).sum())
            .collect();
        if totals.iter().any(|&t| t != totals[0]) {
            return Err(Error::invalid_dimensions(
                0,
                0,
                format!("histogram rows disagree on pixel count: {:?}", totals),
            ));
        }
        Ok(Self { counts })
    }

    /// Count row of one color channel.
    ///
    /// # Panics
    ///
    /// Panics on [`Channel::Alpha`]; histograms only cover RGB.
    #[inline]
    pub fn row(&self, channel: Channel) -> &[u32; BINS] {
        &self.counts[channel.index()]
    }

    /// All three rows.
    #[inline]
    pub fn counts(&self) -> &[[u32; BINS]; 3] {
        &self.counts
    }

    /// Number of pixels with `value` in `channel`.
    #[inline]
    pub fn count(&self, channel: Channel, value: u8) -> u32 {
        self.counts[channel.index()][value as usize]
    }

    /// Sum of one row, i.e. the pixel count of the source image.
    pub fn total(&self, channel: Channel) -> u64 {
        self.row(channel).iter().map(|&c| c as u64).sum()
    }

    /// Largest single cell across all rows.
    pub fn max_count(&self) -> u32 {
        self.counts
            .iter()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or(0)
    }

    /// Most frequent value of `channel` within `range`.
    ///
    /// Ties resolve to the lowest value. An empty range yields its start.
    pub fn peak_in(&self, channel: Channel, range: std::ops::Range<usize>) -> u8 {
        let row = self.row(channel);
        let start = range.start.min(BINS - 1);
        let end = range.end.min(BINS);
        let mut best = start;
        for v in start..end {
            if row[v] > row[best] {
                best = v;
            }
        }
        best as u8
    }
}
