use std::ops::Range;

use crate::core::pixel_buffer::{PixelBuffer, BYTES_PER_PIXEL};

use super::{truncate_channel, BlurEngineT};

/// Averages a rectangular window clipped to the image, without a circular mask.
///
/// The window covers `[x - r, x + r) × [y - r, y + r)`. Each sample adds
/// `value / count` to an `f32` accumulator, columns outer and rows inner.
/// When `count` is not a power of two the accumulated sum can land just under
/// the exact mean, so a uniform field may come back one lower after truncation.
pub struct FastBlur {
    radius: usize,
}

impl FastBlur {
    pub fn new(radius: usize) -> Self {
        Self { radius }
    }

    fn blur_pixel(&self, src: &PixelBuffer, x: usize, rows: &Range<usize>) -> [u8; 3] {
        let columns = window(x, self.radius, src.width());
        let count = (columns.len() * rows.len()) as f32;

        let mut averages = [0.0_f32; 3];
        for sx in columns {
            for sy in rows.clone() {
                let color = src.pixel(sx, sy);
                for (average, value) in averages.iter_mut().zip(color.iter()) {
                    *average += f32::from(*value) / count;
                }
            }
        }

        [
            truncate_channel(averages[0]),
            truncate_channel(averages[1]),
            truncate_channel(averages[2]),
        ]
    }
}

impl BlurEngineT for FastBlur {
    fn radius(&self) -> usize {
        self.radius
    }

    fn blur_row(&self, src: &PixelBuffer, y: usize, out_row: &mut [u8]) {
        let rows = window(y, self.radius, src.height());
        for (x, out) in out_row
            .chunks_exact_mut(BYTES_PER_PIXEL)
            .take(src.width())
            .enumerate()
        {
            out.copy_from_slice(&self.blur_pixel(src, x, &rows));
        }
    }
}

/// `[center - radius, center + radius)` clipped to `[0, extent)`.
/// Never empty while `radius > 0` and `center < extent`.
fn window(center: usize, radius: usize, extent: usize) -> Range<usize> {
    center.saturating_sub(radius)..(center + radius).min(extent)
}
