use image::{ImageBuffer, Rgb, RgbImage};

use crate::core::error::BlurError;

pub const BYTES_PER_PIXEL: usize = 3;

/// An RGB8 bitmap with an explicit row stride.
///
/// Pixel `(x, y)` channel `c` lives at `y * stride + x * 3 + c`. Bytes between
/// `width * 3` and `stride` in each row are padding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: usize,
    height: usize,
    stride: usize,
}

impl PixelBuffer {
    pub fn new(
        data: Vec<u8>,
        width: usize,
        height: usize,
        stride: usize,
    ) -> Result<Self, BlurError> {
        if width == 0 || height == 0 {
            return Err(BlurError::invalid(format!(
                "pixel buffer - size {}x{} is empty",
                width, height
            )));
        }
        let min_stride = width
            .checked_mul(BYTES_PER_PIXEL)
            .ok_or_else(|| BlurError::invalid("pixel buffer - width overflows"))?;
        if stride < min_stride {
            return Err(BlurError::invalid(format!(
                "pixel buffer - stride {} is less than {} bytes per row",
                stride, min_stride
            )));
        }
        let required = stride
            .checked_mul(height)
            .ok_or_else(|| BlurError::invalid("pixel buffer - stride * height overflows"))?;
        if data.len() < required {
            return Err(BlurError::invalid(format!(
                "pixel buffer - {} bytes given, {} needed",
                data.len(),
                required
            )));
        }

        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// A tightly packed black buffer.
    pub fn with_size(width: usize, height: usize) -> Result<Self, BlurError> {
        Self::filled(width, height, [0, 0, 0])
    }

    pub fn filled(width: usize, height: usize, color: [u8; 3]) -> Result<Self, BlurError> {
        let data = color
            .iter()
            .copied()
            .cycle()
            .take(width * height * BYTES_PER_PIXEL)
            .collect();
        Self::new(data, width, height, width * BYTES_PER_PIXEL)
    }

    pub fn from_rgb_image(image: RgbImage) -> Result<Self, BlurError> {
        let (width, height) = image.dimensions();
        let (width, height) = (width as usize, height as usize);
        Self::new(image.into_raw(), width, height, width * BYTES_PER_PIXEL)
    }

    /// Converts back to a packed `RgbImage`, dropping row padding.
    pub fn into_rgb_image(self) -> RgbImage {
        ImageBuffer::from_fn(self.width as u32, self.height as u32, |x, y| {
            Rgb(self.pixel(x as usize, y as usize))
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Number of addressed bytes, `stride * height`.
    pub fn byte_len(&self) -> usize {
        self.stride * self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn offset_of(&self, x: usize, y: usize, channel: usize) -> usize {
        y * self.stride + x * BYTES_PER_PIXEL + channel
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let offset = self.offset_of(x, y, 0);
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: [u8; 3]) {
        let offset = self.offset_of(x, y, 0);
        self.data[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&color);
    }

    /// The pixel bytes of row `y`, without padding.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = self.offset_of(0, y, 0);
        &self.data[start..start + self.width * BYTES_PER_PIXEL]
    }

    /// Overwrites the addressed bytes with a blurred copy of the same layout.
    pub(crate) fn replace_rows(&mut self, blurred: &[u8]) {
        debug_assert_eq!(blurred.len(), self.byte_len());
        self.data[..blurred.len()].copy_from_slice(blurred);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_layouts() {
        assert!(PixelBuffer::new(vec![], 0, 4, 0)
            .unwrap_err()
            .is_invalid_argument());
        assert!(PixelBuffer::new(vec![0; 12], 2, 2, 5)
            .unwrap_err()
            .is_invalid_argument());
        assert!(PixelBuffer::new(vec![0; 15], 2, 2, 8)
            .unwrap_err()
            .is_invalid_argument());
        assert!(PixelBuffer::new(vec![0; 16], 2, 2, 8).is_ok());
    }

    #[test]
    fn offsets_honor_stride() {
        let mut buffer = PixelBuffer::new(vec![0; 16 * 3], 4, 3, 16).unwrap();
        assert_eq!(buffer.offset_of(0, 1, 0), 16);
        assert_eq!(buffer.offset_of(2, 2, 1), 32 + 6 + 1);

        buffer.set_pixel(3, 1, [1, 2, 3]);
        assert_eq!(&buffer.as_bytes()[25..28], &[1, 2, 3]);
        assert_eq!(buffer.pixel(3, 1), [1, 2, 3]);
        assert_eq!(buffer.row(1), &buffer.as_bytes()[16..28]);
    }

    #[test]
    fn rgb_image_conversion_drops_padding() {
        let mut data = vec![0xee; 8 * 2];
        data[..6].copy_from_slice(&[1, 2, 3, 4, 5, 6]);
        data[8..14].copy_from_slice(&[7, 8, 9, 10, 11, 12]);
        let buffer = PixelBuffer::new(data, 2, 2, 8).unwrap();

        let image = buffer.into_rgb_image();
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.into_raw(), (1..=12).collect::<Vec<u8>>());
    }

    #[test]
    fn filled_repeats_color() {
        let buffer = PixelBuffer::filled(3, 2, [100, 150, 200]).unwrap();
        assert_eq!(buffer.stride(), 9);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(buffer.pixel(x, y), [100, 150, 200]);
            }
        }
    }
}
