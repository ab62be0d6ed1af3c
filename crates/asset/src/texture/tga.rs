//! Uncompressed true-color TGA reader (24 and 32 bit).
//!
//! Rows are kept in file order: the origin bit in the descriptor byte is not
//! applied, so bottom-up files come out vertically mirrored.

use std::{fs, path::Path};

use super::TextureData;
use crate::error::TextureError;

const HEADER_LEN: usize = 18;
const IMAGE_TYPE_TRUECOLOR: u8 = 2;

pub fn load_tga(path: &Path) -> Result<TextureData, TextureError> {
    log::info!("Loading TGA texture from {:?}", path);
    let bytes = fs::read(path)?;
    decode_tga(&bytes)
}

pub fn decode_tga(bytes: &[u8]) -> Result<TextureData, TextureError> {
    if bytes.len() < HEADER_LEN {
        return Err(TextureError::TgaTruncated {
            expected: HEADER_LEN,
            found: bytes.len(),
        });
    }

    let id_len = bytes[0] as usize;
    let image_type = bytes[2];
    let width = u16::from_le_bytes([bytes[12], bytes[13]]) as u32;
    let height = u16::from_le_bytes([bytes[14], bytes[15]]) as u32;
    let depth = bytes[16];

    let bpp = match depth {
        32 => 4,
        24 => 3,
        other => return Err(TextureError::TgaBitDepth(other)),
    };
    if image_type != IMAGE_TYPE_TRUECOLOR {
        return Err(TextureError::Unsupported(format!(
            "TGA image type {image_type} (only uncompressed true-color is read)"
        )));
    }

    let start = HEADER_LEN + id_len;
    let expected = (width * height) as usize * bpp;
    let pixels = bytes
        .get(start..start + expected)
        .ok_or(TextureError::TgaTruncated {
            expected,
            found: bytes.len().saturating_sub(start),
        })?;

    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for px in pixels.chunks_exact(bpp) {
        let alpha = if bpp == 4 { px[3] } else { 255 };
        data.extend_from_slice(&[px[2], px[1], px[0], alpha]);
    }

    Ok(TextureData::new_rgba8(width, height, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(width: u16, height: u16, depth: u8) -> Vec<u8> {
        let mut h = vec![0u8; HEADER_LEN];
        h[2] = IMAGE_TYPE_TRUECOLOR;
        h[12..14].copy_from_slice(&width.to_le_bytes());
        h[14..16].copy_from_slice(&height.to_le_bytes());
        h[16] = depth;
        h
    }

    #[test]
    fn decodes_32_bit_bgra() {
        let mut bytes = header(2, 1, 32);
        bytes.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let tex = decode_tga(&bytes).unwrap();
        assert_eq!((tex.width, tex.height), (2, 1));
        assert_eq!(tex.data, vec![3, 2, 1, 4, 7, 6, 5, 8]);
    }

    #[test]
    fn decodes_24_bit_bgr_with_opaque_alpha() {
        let mut bytes = header(1, 2, 24);
        bytes.extend_from_slice(&[10, 20, 30, 40, 50, 60]);
        let tex = decode_tga(&bytes).unwrap();
        assert_eq!(tex.data, vec![30, 20, 10, 255, 60, 50, 40, 255]);
    }

    #[test]
    fn skips_image_id_field() {
        let mut bytes = header(1, 1, 24);
        bytes[0] = 3;
        bytes.extend_from_slice(b"abc");
        bytes.extend_from_slice(&[1, 2, 3]);
        assert_eq!(decode_tga(&bytes).unwrap().data, vec![3, 2, 1, 255]);
    }

    #[test]
    fn rejects_other_bit_depths() {
        let mut bytes = header(1, 1, 16);
        bytes.extend_from_slice(&[0, 0]);
        assert!(matches!(decode_tga(&bytes), Err(TextureError::TgaBitDepth(16))));
    }

    #[test]
    fn rejects_truncated_pixels() {
        let mut bytes = header(4, 4, 32);
        bytes.extend_from_slice(&[0; 10]);
        assert!(matches!(
            decode_tga(&bytes),
            Err(TextureError::TgaTruncated { expected: 64, found: 10 })
        ));
    }
}
