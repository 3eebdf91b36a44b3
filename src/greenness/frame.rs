use std::{io::Cursor, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat, RgbaImage};

const CHANNELS: usize = 4;

/// A decoded image: row-major RGBA bytes, four per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFrame {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl ImageFrame {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(CHANNELS))
            .ok_or_else(|| anyhow!("image dimensions {width}x{height} overflow"))?;
        if rgba.len() != expected {
            bail!(
                "pixel buffer holds {} bytes, expected {expected} for {width}x{height} RGBA",
                rgba.len()
            );
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn from_image(image: &DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            width,
            height,
            rgba: rgba.into_raw(),
        }
    }

    /// Decode an encoded image (PNG, JPEG, ...) held in memory.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes).context("failed to decode image bytes")?;
        Ok(Self::from_image(&image))
    }

    pub fn open(path: &Path) -> Result<Self> {
        let image = image::open(path)
            .with_context(|| format!("failed to open image {}", path.display()))?;
        Ok(Self::from_image(&image))
    }

    /// Decode a base64 `data:` URL such as the ones browsers hand out for uploads.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| anyhow!("not a data URL"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| anyhow!("data URL has no payload"))?;
        if !header.ends_with(";base64") {
            bail!("only base64 data URLs are supported");
        }
        let bytes = STANDARD
            .decode(payload.trim())
            .context("data URL payload is not valid base64")?;
        Self::decode(&bytes)
    }

    /// Encode as a PNG `data:` URL, the form a captured frame is stored under.
    pub fn to_png_data_url(&self) -> Result<String> {
        let image = RgbaImage::from_raw(self.width, self.height, self.rgba.clone())
            .ok_or_else(|| anyhow!("pixel buffer does not match frame dimensions"))?;
        let mut encoded = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut encoded, ImageFormat::Png)
            .context("failed to encode frame as PNG")?;
        Ok(format!(
            "data:image/png;base64,{}",
            STANDARD.encode(encoded.into_inner())
        ))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn is_empty(&self) -> bool {
        self.rgba.is_empty()
    }

    /// RGB of the pixel at `(x, y)`; alpha is dropped.
    pub(crate) fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        let offset = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [
            self.rgba[offset],
            self.rgba[offset + 1],
            self.rgba[offset + 2],
        ]
    }
}

#[cfg(test)]
pub(crate) fn solid_frame(width: u32, height: u32, rgb: [u8; 3]) -> ImageFrame {
    let mut rgba = Vec::with_capacity(width as usize * height as usize * CHANNELS);
    for _ in 0..(width * height) {
        rgba.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
    }
    ImageFrame {
        width,
        height,
        rgba,
    }
}
