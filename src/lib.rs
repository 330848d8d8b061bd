pub mod blur;
pub mod core;
pub mod engine;

pub use crate::blur::{
    apply, apply_async, blur, BlurConfig, BlurHandle, BlurMode, Parallelism, Rejected,
};
pub use crate::core::{error::BlurError, mask::CircularMask, pixel_buffer::PixelBuffer};
