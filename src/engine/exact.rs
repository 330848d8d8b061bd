use crate::core::{
    mask::CircularMask,
    pixel_buffer::{PixelBuffer, BYTES_PER_PIXEL},
};

use super::{truncate_channel, BlurEngineT};

/// Averages every in-bounds pixel under a circular kernel.
///
/// Samples falling outside the image are left out of the average, so border
/// pixels use a smaller effective kernel.
pub struct ExactBlur {
    mask: CircularMask,
}

impl ExactBlur {
    pub fn new(radius: usize) -> Self {
        Self {
            mask: CircularMask::new(radius),
        }
    }

    pub fn mask(&self) -> &CircularMask {
        &self.mask
    }

    fn blur_pixel(&self, src: &PixelBuffer, x: usize, y: usize) -> [u8; 3] {
        let radius = self.mask.radius() as isize;
        let width = src.width() as isize;
        let height = src.height() as isize;

        let mut sums = [0_u64; 3];
        let mut samples = 0_u64;
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if !self.mask.contains(dx, dy) {
                    continue;
                }
                let sx = x as isize + dx;
                let sy = y as isize + dy;
                if !(0..width).contains(&sx) || !(0..height).contains(&sy) {
                    continue;
                }
                let color = src.pixel(sx as usize, sy as usize);
                for (sum, value) in sums.iter_mut().zip(color.iter()) {
                    *sum += u64::from(*value);
                }
                samples += 1;
            }
        }

        // the center is always sampled, so `samples` is never zero
        [
            truncate_channel(mean(sums[0], samples)),
            truncate_channel(mean(sums[1], samples)),
            truncate_channel(mean(sums[2], samples)),
        ]
    }
}

impl BlurEngineT for ExactBlur {
    fn radius(&self) -> usize {
        self.mask.radius()
    }

    fn blur_row(&self, src: &PixelBuffer, y: usize, out_row: &mut [u8]) {
        for (x, out) in out_row
            .chunks_exact_mut(BYTES_PER_PIXEL)
            .take(src.width())
            .enumerate()
        {
            out.copy_from_slice(&self.blur_pixel(src, x, y));
        }
    }
}

/// Mean taken in `f64`, then narrowed to `f32`.
fn mean(sum: u64, count: u64) -> f32 {
    (sum as f64 / count as f64) as f32
}
