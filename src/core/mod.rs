pub mod error;
pub mod mask;
pub mod pixel_buffer;
