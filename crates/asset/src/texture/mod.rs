//! Texture loading and data structures.
//! PNG/JPG go through the `image` crate; TGA and DDS are read by hand.

pub mod classify;
pub mod dds;
pub mod tga;

use std::path::Path;

use crate::error::TextureError;

/// Texture data in CPU-friendly format before GPU upload.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// Supported texture formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFormat {
    Rgba8,
    /// DXT1, 8 bytes per 4x4 block.
    Bc1,
    /// DXT5, 16 bytes per 4x4 block.
    Bc3,
}

impl TextureFormat {
    /// Bytes needed for the top level of a `width` x `height` image.
    pub fn level_size(self, width: u32, height: u32) -> usize {
        let (w, h) = (width as usize, height as usize);
        match self {
            TextureFormat::Rgba8 => w * h * 4,
            TextureFormat::Bc1 => w.div_ceil(4) * h.div_ceil(4) * 8,
            TextureFormat::Bc3 => w.div_ceil(4) * h.div_ceil(4) * 16,
        }
    }
}

impl TextureData {
    /// Create a new texture with given dimensions and RGBA8 format.
    pub fn new_rgba8(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            TextureFormat::Rgba8.level_size(width, height),
            "Data size doesn't match RGBA8 format"
        );
        Self {
            data,
            width,
            height,
            format: TextureFormat::Rgba8,
        }
    }

    /// Load a texture, picking the decoder from the file extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(TextureError::NotFound(path.display().to_string()));
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "png" | "jpg" | "jpeg" => Self::load_image(path),
            "tga" => tga::load_tga(path),
            "dds" => Ok(dds::load_dds_or_placeholder(path)),
            _ => Err(TextureError::Unsupported(path.display().to_string())),
        }
    }

    /// Load a PNG or JPG file through the `image` crate.
    pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let path = path.as_ref();
        log::info!("Loading texture from {:?}", path);

        let rgba = image::open(path)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        let data = rgba.into_raw();

        log::info!("Loaded texture {}x{} with {} bytes", width, height, data.len());

        Ok(Self::new_rgba8(width, height, data))
    }

    /// Small checkerboard returned where a texture could not be read.
    pub fn placeholder() -> Self {
        const SIZE: u32 = 8;
        let mut data = Vec::with_capacity((SIZE * SIZE * 4) as usize);

        for y in 0..SIZE {
            for x in 0..SIZE {
                if (x / 4 + y / 4) % 2 == 0 {
                    data.extend_from_slice(&[255, 255, 255, 255]);
                } else {
                    data.extend_from_slice(&[128, 128, 128, 255]);
                }
            }
        }

        Self::new_rgba8(SIZE, SIZE, data)
    }

    /// Move channels into the layout expected for normal maps (R <- G, A <- R).
    /// Block-compressed data is left untouched.
    pub fn swizzle_normal_map(&mut self) {
        if self.format != TextureFormat::Rgba8 {
            log::debug!("Normal-map swizzle skipped for {:?} texture", self.format);
            return;
        }
        for px in self.data.chunks_exact_mut(4) {
            let (r, g) = (px[0], px[1]);
            px[0] = g;
            px[3] = r;
        }
    }

    /// Check if the texture data is valid.
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.data.len() == self.format.level_size(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_valid() {
        let tex = TextureData::placeholder();
        assert!(tex.is_valid());
        assert_eq!((tex.width, tex.height), (8, 8));
    }

    #[test]
    fn block_sizes_round_up() {
        assert_eq!(TextureFormat::Bc1.level_size(4, 4), 8);
        assert_eq!(TextureFormat::Bc1.level_size(5, 5), 32);
        assert_eq!(TextureFormat::Bc3.level_size(8, 4), 32);
    }

    #[test]
    fn normal_map_swizzle_moves_red_to_alpha() {
        let mut tex = TextureData::new_rgba8(1, 1, vec![10, 20, 30, 40]);
        tex.swizzle_normal_map();
        assert_eq!(tex.data, vec![20, 20, 30, 10]);
    }

    #[test]
    fn missing_and_unknown_files_fail() {
        assert!(matches!(
            TextureData::load("/definitely/not/here.png"),
            Err(TextureError::NotFound(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        let bmp = dir.path().join("image.bmp");
        std::fs::write(&bmp, b"BM").unwrap();
        assert!(matches!(
            TextureData::load(&bmp),
            Err(TextureError::Unsupported(_))
        ));
    }

    #[test]
    fn png_round_trips_through_image_crate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        image::RgbaImage::from_pixel(2, 3, image::Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let tex = TextureData::load(&path).unwrap();
        assert_eq!((tex.width, tex.height), (2, 3));
        assert_eq!(&tex.data[..4], &[255, 0, 0, 255]);
    }
}
