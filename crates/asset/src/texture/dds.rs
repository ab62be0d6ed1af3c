//! DXT1/DXT5 DDS reader with a fixed 128-byte header.

use std::{fs, path::Path};

use super::{TextureData, TextureFormat};
use crate::error::TextureError;

pub const DDS_HEADER_LEN: usize = 128;

/// `dwSize` of DDS_HEADER, stored right after the magic.
const HEADER_SIZE_OFFSET: usize = 4;
const HEADER_SIZE: u8 = 124;
/// Last character of the pixel-format FourCC (`DXT1` / `DXT5`).
const FOURCC_TAIL_OFFSET: usize = 87;
const FOURCC_DXT1: u8 = b'1';
const FOURCC_DXT5: u8 = b'5';

/// Decode the top mip level of a DXT1/DXT5 DDS file.
pub fn decode_dds(bytes: &[u8]) -> Result<TextureData, TextureError> {
    if bytes.len() < DDS_HEADER_LEN {
        return Err(TextureError::InvalidDds("file is shorter than the header"));
    }
    if bytes[HEADER_SIZE_OFFSET] != HEADER_SIZE {
        return Err(TextureError::InvalidDds("header size byte is not 124"));
    }

    let height = u16::from_le_bytes([bytes[12], bytes[13]]) as u32;
    let width = u16::from_le_bytes([bytes[16], bytes[17]]) as u32;
    if width == 0 || height == 0 {
        return Err(TextureError::InvalidDds("zero-sized image"));
    }

    let format = match bytes[FOURCC_TAIL_OFFSET] {
        FOURCC_DXT1 => TextureFormat::Bc1,
        FOURCC_DXT5 => TextureFormat::Bc3,
        _ => return Err(TextureError::InvalidDds("pixel format is not DXT1 or DXT5")),
    };

    let level = format.level_size(width, height);
    let payload = &bytes[DDS_HEADER_LEN..];
    if payload.len() < level {
        return Err(TextureError::InvalidDds("payload is shorter than the top mip level"));
    }

    Ok(TextureData {
        data: payload[..level].to_vec(),
        width,
        height,
        format,
    })
}

/// Load a DDS file; any failure is logged and replaced by [`TextureData::placeholder`].
pub fn load_dds_or_placeholder(path: &Path) -> TextureData {
    let decoded = fs::read(path)
        .map_err(TextureError::from)
        .and_then(|bytes| decode_dds(&bytes));
    match decoded {
        Ok(tex) => {
            log::info!(
                "Loaded DDS {:?}: {}x{} {:?}",
                path,
                tex.width,
                tex.height,
                tex.format
            );
            tex
        }
        Err(err) => {
            log::error!("Could not load DDS {:?}: {}", path, err);
            TextureData::placeholder()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dds(width: u16, height: u16, fourcc_tail: u8, payload: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; DDS_HEADER_LEN + payload];
        bytes[..4].copy_from_slice(b"DDS ");
        bytes[HEADER_SIZE_OFFSET] = HEADER_SIZE;
        bytes[12..14].copy_from_slice(&height.to_le_bytes());
        bytes[16..18].copy_from_slice(&width.to_le_bytes());
        bytes[84..88].copy_from_slice(&[b'D', b'X', b'T', fourcc_tail]);
        bytes
    }

    #[test]
    fn detects_dxt1_and_dxt5() {
        let bc1 = decode_dds(&dds(8, 4, b'1', 16)).unwrap();
        assert_eq!(bc1.format, TextureFormat::Bc1);
        assert_eq!((bc1.width, bc1.height), (8, 4));
        assert!(bc1.is_valid());

        let bc3 = decode_dds(&dds(4, 4, b'5', 16)).unwrap();
        assert_eq!(bc3.format, TextureFormat::Bc3);
        assert_eq!(bc3.data.len(), 16);
    }

    #[test]
    fn extra_mips_are_ignored() {
        let tex = decode_dds(&dds(4, 4, b'1', 8 + 8)).unwrap();
        assert_eq!(tex.data.len(), 8);
    }

    #[test]
    fn rejects_bad_header_size_byte() {
        let mut bytes = dds(4, 4, b'1', 8);
        bytes[HEADER_SIZE_OFFSET] = 100;
        assert!(matches!(decode_dds(&bytes), Err(TextureError::InvalidDds(_))));
    }

    #[test]
    fn rejects_unknown_fourcc_and_short_payload() {
        assert!(decode_dds(&dds(4, 4, b'3', 16)).is_err());
        assert!(decode_dds(&dds(8, 8, b'5', 16)).is_err());
        assert!(decode_dds(&[0u8; 64]).is_err());
    }

    #[test]
    fn invalid_file_yields_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.dds");
        let mut bytes = dds(4, 4, b'1', 8);
        bytes[HEADER_SIZE_OFFSET] = 0;
        fs::write(&path, bytes).unwrap();

        let tex = load_dds_or_placeholder(&path);
        assert_eq!(tex, TextureData::placeholder());
    }
}
