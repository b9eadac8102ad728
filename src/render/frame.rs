use std::io::Cursor;

use anyhow::Context;

use crate::foundation::error::{ReelError, ReelResult};

/// A frame as straight-alpha RGBA8 pixels, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// A frame filled with one color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let px = width as usize * height as usize;
        Self {
            width,
            height,
            data: rgba.repeat(px),
        }
    }

    /// Check that `data` matches the declared dimensions.
    pub fn validate(&self) -> ReelResult<()> {
        let expected = self.width as usize * self.height as usize * 4;
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::render("frame width/height must be non-zero"));
        }
        if self.data.len() != expected {
            return Err(ReelError::render(format!(
                "frame data is {} bytes, expected {expected} for {}x{}",
                self.data.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }

    /// Encode as PNG bytes.
    pub fn encode_png(&self) -> ReelResult<Vec<u8>> {
        self.validate()?;
        let img = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| ReelError::render("frame buffer does not match its dimensions"))?;
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode frame as png")?;
        Ok(buf)
    }
}

/// Decode encoded image bytes (PNG, JPEG, GIF, ...) into an RGBA8 frame.
pub fn decode_frame(bytes: &[u8]) -> ReelResult<FrameRGBA> {
    let dyn_img = image::load_from_memory(bytes).context("decode map image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(FrameRGBA {
        width,
        height,
        data: rgba.into_raw(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
