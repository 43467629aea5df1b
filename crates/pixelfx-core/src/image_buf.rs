use anyhow::{Context, Result, bail};
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

/// Channel layout of an [`ImageBuf`]. All formats are 8 bits per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Gray,
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }

    /// Channels that carry color (alpha excluded).
    pub fn color_channels(self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::Rgb | PixelFormat::Rgba => 3,
        }
    }
}

/// Interleaved 8-bit raster buffer.
///
/// Pixel data is stored row-major as [C0, C1, ..., C0, C1, ...] with the
/// channel count given by `format`. Transforms never mutate their input in
/// place as far as the caller can observe; each produces a new buffer (or
/// hands back the one it owns untouched).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBuf {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl ImageBuf {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            data: vec![0; width as usize * height as usize * format.channels()],
        }
    }

    pub fn from_data(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * format.channels();
        anyhow::ensure!(
            data.len() == expected,
            "expected {expected} bytes for {width}x{height} {format:?}, got {}",
            data.len()
        );
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Solid single-color image, every channel set to `value`.
    pub fn filled(width: u32, height: u32, format: PixelFormat, value: u8) -> Self {
        Self {
            width,
            height,
            format,
            data: vec![value; width as usize * height as usize * format.channels()],
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Rec. 601 luma of one pixel slice (`format.channels()` bytes).
    pub fn luma(&self, pixel: &[u8]) -> u8 {
        match self.format {
            PixelFormat::Gray => pixel[0],
            PixelFormat::Rgb | PixelFormat::Rgba => {
                let y = 0.299 * pixel[0] as f32 + 0.587 * pixel[1] as f32 + 0.114 * pixel[2] as f32;
                y.round().clamp(0.0, 255.0) as u8
            }
        }
    }

    pub fn to_dynamic(&self) -> Result<DynamicImage> {
        let img = match self.format {
            PixelFormat::Gray => GrayImage::from_raw(self.width, self.height, self.data.clone())
                .map(DynamicImage::ImageLuma8),
            PixelFormat::Rgb => RgbImage::from_raw(self.width, self.height, self.data.clone())
                .map(DynamicImage::ImageRgb8),
            PixelFormat::Rgba => RgbaImage::from_raw(self.width, self.height, self.data.clone())
                .map(DynamicImage::ImageRgba8),
        };
        img.context("buffer length does not match dimensions")
    }

    /// Adopt a decoded image, re-expanding anything exotic (16-bit, LumaA)
    /// into one of our three canonical formats.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        match img {
            DynamicImage::ImageLuma8(g) => {
                let (width, height) = g.dimensions();
                Self {
                    width,
                    height,
                    format: PixelFormat::Gray,
                    data: g.into_raw(),
                }
            }
            DynamicImage::ImageRgb8(rgb) => {
                let (width, height) = rgb.dimensions();
                Self {
                    width,
                    height,
                    format: PixelFormat::Rgb,
                    data: rgb.into_raw(),
                }
            }
            DynamicImage::ImageRgba8(rgba) => {
                let (width, height) = rgba.dimensions();
                Self {
                    width,
                    height,
                    format: PixelFormat::Rgba,
                    data: rgba.into_raw(),
                }
            }
            other => {
                let rgb = other.to_rgb8();
                let (width, height) = rgb.dimensions();
                Self {
                    width,
                    height,
                    format: PixelFormat::Rgb,
                    data: rgb.into_raw(),
                }
            }
        }
    }

    /// Downscale so the longest edge fits within `max_edge` pixels, keeping
    /// aspect ratio. Returns a clone if already small enough.
    pub fn resize_to_fit(&self, max_edge: u32) -> Result<Self> {
        if self.width.max(self.height) <= max_edge {
            return Ok(self.clone());
        }
        let resized = self
            .to_dynamic()?
            .resize(max_edge, max_edge, FilterType::Lanczos3);
        Ok(Self::from_dynamic(resized))
    }

    /// Resample to exactly `width` x `height`.
    pub fn resize_exact(&self, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            bail!("cannot resize to {width}x{height}");
        }
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }
        let resized = self
            .to_dynamic()?
            .resize_exact(width, height, FilterType::Lanczos3);
        Ok(Self::from_dynamic(resized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_and_channel_counts() {
        let buf = ImageBuf::new(100, 50, PixelFormat::Rgb);
        assert_eq!(buf.data.len(), 100 * 50 * 3);
        assert_eq!(buf.pixel_count(), 5000);
        assert_eq!(PixelFormat::Gray.channels(), 1);
        assert_eq!(PixelFormat::Rgba.channels(), 4);
        assert_eq!(PixelFormat::Rgba.color_channels(), 3);
    }

    #[test]
    fn from_data_validates_length() {
        assert!(ImageBuf::from_data(2, 2, PixelFormat::Rgb, vec![0; 12]).is_ok());
        assert!(ImageBuf::from_data(2, 2, PixelFormat::Rgb, vec![0; 10]).is_err());
        assert!(ImageBuf::from_data(2, 2, PixelFormat::Gray, vec![0; 4]).is_ok());
    }

    #[test]
    fn luma_of_gray_is_identity() {
        let buf = ImageBuf::filled(1, 1, PixelFormat::Gray, 77);
        assert_eq!(buf.luma(&[77]), 77);
    }

    #[test]
    fn luma_weights_green_highest() {
        let buf = ImageBuf::new(1, 1, PixelFormat::Rgb);
        let r = buf.luma(&[255, 0, 0]);
        let g = buf.luma(&[0, 255, 0]);
        let b = buf.luma(&[0, 0, 255]);
        assert!(g > r && r > b);
        assert_eq!(buf.luma(&[255, 255, 255]), 255);
        assert_eq!(buf.luma(&[0, 0, 0]), 0);
    }

    #[test]
    fn dynamic_roundtrip_preserves_pixels() {
        let data = vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120];
        let buf = ImageBuf::from_data(2, 2, PixelFormat::Rgb, data.clone()).unwrap();
        let back = ImageBuf::from_dynamic(buf.to_dynamic().unwrap());
        assert_eq!(back.format, PixelFormat::Rgb);
        assert_eq!(back.data, data);
    }

    #[test]
    fn resize_to_fit_noop_when_small() {
        let buf = ImageBuf::filled(100, 50, PixelFormat::Rgb, 128);
        let out = buf.resize_to_fit(200).unwrap();
        assert_eq!(out.width, 100);
        assert_eq!(out.height, 50);
    }

    #[test]
    fn resize_to_fit_caps_longest_edge() {
        let buf = ImageBuf::filled(1000, 500, PixelFormat::Rgb, 128);
        let out = buf.resize_to_fit(100).unwrap();
        assert_eq!(out.width, 100);
        assert_eq!(out.height, 50);
        assert_eq!(out.data.len(), 100 * 50 * 3);
    }

    #[test]
    fn resize_preserves_solid_color() {
        let buf = ImageBuf::filled(400, 200, PixelFormat::Rgb, 180);
        let out = buf.resize_to_fit(50).unwrap();
        for &v in &out.data {
            assert!((v as i32 - 180).abs() <= 1, "got {v}");
        }
    }

    #[test]
    fn resize_exact_roundtrip_dimensions() {
        let buf = ImageBuf::filled(64, 48, PixelFormat::Rgba, 90);
        let small = buf.resize_exact(20, 15).unwrap();
        let back = small.resize_exact(64, 48).unwrap();
        assert_eq!(back.width, 64);
        assert_eq!(back.height, 48);
        assert_eq!(back.format, PixelFormat::Rgba);
    }

    #[test]
    fn resize_exact_rejects_zero() {
        let buf = ImageBuf::filled(10, 10, PixelFormat::Gray, 5);
        assert!(buf.resize_exact(0, 10).is_err());
    }
}
