//! Histogram computation and plotting.
//!
//! - [`compute`] - count RGB intensities of an image
//! - [`render`] - draw a histogram as a 256×256 line plot

use pixkit_core::{Channel, Histogram, Image, BINS};
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::OpsResult;

/// Side length of [`render`] output.
pub const PLOT_SIZE: u32 = 256;

const GRID_STEP: u32 = 32;
const GRID_GREY: u8 = 220;
const LINE_COLORS: [[u8; 3]; 3] = [[255, 0, 0], [0, 255, 0], [0, 0, 255]];

/// Counts every RGB sample of `src`.
///
/// Each row of the result sums to `width * height`.
pub fn compute(src: &Image) -> OpsResult<Histogram> {
    trace!(width = src.width(), height = src.height(), "histogram");
    let mut counts = [[0u32; BINS]; 3];
    for channel in Channel::RGB {
        let row = &mut counts[channel.index()];
        for &v in src.plane(channel) {
            row[v as usize] += 1;
        }
    }
    Ok(Histogram::from_counts(counts)?)
}

/// Draws the three channel curves on a white, gridded 256×256 canvas.
///
/// Counts are normalised by the largest cell so the tallest peak touches
/// the top edge.
pub fn render(hist: &Histogram) -> OpsResult<Image> {
    let mut plot = Image::filled(PLOT_SIZE, PLOT_SIZE, &[255, 255, 255])?;
    for i in (0..PLOT_SIZE).step_by(GRID_STEP as usize) {
        for j in 0..PLOT_SIZE {
            plot.set_rgb(i, j, [GRID_GREY; 3]);
            plot.set_rgb(j, i, [GRID_GREY; 3]);
        }
    }

    let max = hist.max_count().max(1) as f64;
    let top = (PLOT_SIZE - 1) as f64;
    for (channel, color) in Channel::RGB.into_iter().zip(LINE_COLORS) {
        let row = hist.row(channel);
        let y_of = |v: usize| (top - (row[v] as f64 / max * top).round()) as u32;

        let mut prev = y_of(0);
        for v in 0..BINS {
            let y = y_of(v);
            let (lo, hi) = if prev <= y { (prev, y) } else { (y, prev) };
            for yy in lo..=hi {
                plot.set_rgb(v as u32, yy, color);
            }
            prev = y;
        }
    }
    Ok(plot)
}
