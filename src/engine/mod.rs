mod exact;
mod fast;

pub use exact::*;
pub use fast::*;

use crate::core::pixel_buffer::PixelBuffer;

#[enum_dispatch::enum_dispatch(BlurEngine)]
pub trait BlurEngineT: Send + Sync {
    fn radius(&self) -> usize;

    /// Writes the blurred row `y` of `src` into `out_row`, which holds at
    /// least `width * 3` bytes. Reads `src` only.
    fn blur_row(&self, src: &PixelBuffer, y: usize, out_row: &mut [u8]);
}

#[enum_dispatch::enum_dispatch]
pub enum BlurEngine {
    ExactBlur,
    FastBlur,
}

/// Narrows an averaged channel to a byte, truncating toward zero. Never rounds.
#[inline]
pub fn truncate_channel(value: f32) -> u8 {
    value as u8
}
