//! Texture body variant and pixel decoding.
//!
//! A level file stores textures as
//! `tex_ / FMT_ / { INFO, FACE / LVL_ / { INFO, BODY } }`. The `FMT_/INFO`
//! chunk names the Direct3D surface format and base dimensions, each
//! `LVL_/INFO` names the mip level its `BODY` holds. The parser attaches a
//! [`TextureBody`] to every `BODY` it can resolve this way; callers reach the
//! pixels through [`ImageSource`].
use thiserror::Error;

use crate::binutil::{ParseError, read_u16_le_at, read_u32_le_at};

/// Direct3D surface formats found in `FMT_/INFO`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum D3DFormat {
    A8R8G8B8,
    X8R8G8B8,
    R5G6B5,
    X1R5G5B5,
    A1R5G5B5,
    A4R4G4B4,
    A8,
    L8,
    A8L8,
    Dxt1,
    Dxt3,
    Dxt5,
    Unknown(u32),
}

impl D3DFormat {
    const FOURCC_DXT1: u32 = u32::from_le_bytes(*b"DXT1");
    const FOURCC_DXT3: u32 = u32::from_le_bytes(*b"DXT3");
    const FOURCC_DXT5: u32 = u32::from_le_bytes(*b"DXT5");

    pub fn from_u32(v: u32) -> Self {
        match v {
            21 => D3DFormat::A8R8G8B8,
            22 => D3DFormat::X8R8G8B8,
            23 => D3DFormat::R5G6B5,
            24 => D3DFormat::X1R5G5B5,
            25 => D3DFormat::A1R5G5B5,
            26 => D3DFormat::A4R4G4B4,
            28 => D3DFormat::A8,
            50 => D3DFormat::L8,
            51 => D3DFormat::A8L8,
            Self::FOURCC_DXT1 => D3DFormat::Dxt1,
            Self::FOURCC_DXT3 => D3DFormat::Dxt3,
            Self::FOURCC_DXT5 => D3DFormat::Dxt5,
            other => D3DFormat::Unknown(other),
        }
    }

    pub fn to_u32(self) -> u32 {
        match self {
            D3DFormat::A8R8G8B8 => 21,
            D3DFormat::X8R8G8B8 => 22,
            D3DFormat::R5G6B5 => 23,
            D3DFormat::X1R5G5B5 => 24,
            D3DFormat::A1R5G5B5 => 25,
            D3DFormat::A4R4G4B4 => 26,
            D3DFormat::A8 => 28,
            D3DFormat::L8 => 50,
            D3DFormat::A8L8 => 51,
            D3DFormat::Dxt1 => Self::FOURCC_DXT1,
            D3DFormat::Dxt3 => Self::FOURCC_DXT3,
            D3DFormat::Dxt5 => Self::FOURCC_DXT5,
            D3DFormat::Unknown(v) => v,
        }
    }

    /// Number of payload bytes a `width` x `height` surface occupies, or
    /// `None` for formats this crate cannot decode.
    pub fn surface_size(self, width: usize, height: usize) -> Option<usize> {
        let blocks = || width.div_ceil(4) * height.div_ceil(4);
        match self {
            D3DFormat::A8R8G8B8 | D3DFormat::X8R8G8B8 => Some(width * height * 4),
            D3DFormat::R5G6B5
            | D3DFormat::X1R5G5B5
            | D3DFormat::A1R5G5B5
            | D3DFormat::A4R4G4B4
            | D3DFormat::A8L8 => Some(width * height * 2),
            D3DFormat::A8 | D3DFormat::L8 => Some(width * height),
            D3DFormat::Dxt1 => Some(blocks() * 8),
            D3DFormat::Dxt3 | D3DFormat::Dxt5 => Some(blocks() * 16),
            D3DFormat::Unknown(_) => None,
        }
    }
}

/// Contents of a `FMT_/INFO` chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatInfo {
    pub format: D3DFormat,
    pub width: u16,
    pub height: u16,
    pub depth: u16,
    pub mip_count: u16,
    pub detail_bias: u32,
}

impl FormatInfo {
    pub const SIZE: usize = 16;

    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        Ok(Self {
            format: D3DFormat::from_u32(read_u32_le_at(data, 0)?),
            width: read_u16_le_at(data, 4)?,
            height: read_u16_le_at(data, 6)?,
            depth: read_u16_le_at(data, 8)?,
            mip_count: read_u16_le_at(data, 10)?,
            detail_bias: read_u32_le_at(data, 12)?,
        })
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0..4].copy_from_slice(&self.format.to_u32().to_le_bytes());
        out[4..6].copy_from_slice(&self.width.to_le_bytes());
        out[6..8].copy_from_slice(&self.height.to_le_bytes());
        out[8..10].copy_from_slice(&self.depth.to_le_bytes());
        out[10..12].copy_from_slice(&self.mip_count.to_le_bytes());
        out[12..16].copy_from_slice(&self.detail_bias.to_le_bytes());
        out
    }
}

/// Contents of a `LVL_/INFO` chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelInfo {
    pub mip_level: u32,
    pub body_size: u32,
}

impl LevelInfo {
    pub const SIZE: usize = 8;

    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        Ok(Self {
            mip_level: read_u32_le_at(data, 0)?,
            body_size: read_u32_le_at(data, 4)?,
        })
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0..4].copy_from_slice(&self.mip_level.to_le_bytes());
        out[4..8].copy_from_slice(&self.body_size.to_le_bytes());
        out
    }
}

/// Channel order of decoded pixel buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    R8G8B8A8,
    B8G8R8A8,
}

/// Resolved texture metadata attached to a `BODY` chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureBody {
    pub format: D3DFormat,
    /// Width of this mip level in pixels.
    pub width: u16,
    /// Height of this mip level in pixels.
    pub height: u16,
    pub mip_level: u32,
}

impl TextureBody {
    /// Build the body metadata for `mip_level` of a `base_width` x `base_height` texture.
    pub fn for_level(format: D3DFormat, base_width: u16, base_height: u16, mip_level: u32) -> Self {
        let shift = mip_level.min(15);
        Self {
            format,
            width: (base_width >> shift).max(1),
            height: (base_height >> shift).max(1),
            mip_level,
        }
    }
}

/// Decoded pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageData {
    pub width: usize,
    pub height: usize,
    pub format: ImageFormat,
    /// `width * height * 4` bytes in `format` channel order.
    pub pixels: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextureError {
    #[error("unsupported texture format {0:?}")]
    UnsupportedFormat(D3DFormat),

    #[error("texture body too short for {format:?}: need {expected} bytes, have {actual}")]
    Truncated {
        format: D3DFormat,
        expected: usize,
        actual: usize,
    },
}

/// Image capability of a texture body chunk.
///
/// Obtained from [`Container::image_source`](crate::Container::image_source);
/// only texture bodies produce one.
#[derive(Clone, Copy, Debug)]
pub struct ImageSource<'a> {
    body: &'a TextureBody,
    data: &'a [u8],
}

impl<'a> ImageSource<'a> {
    pub(crate) fn new(body: &'a TextureBody, data: &'a [u8]) -> Self {
        Self { body, data }
    }

    pub fn width(&self) -> usize {
        self.body.width as usize
    }

    pub fn height(&self) -> usize {
        self.body.height as usize
    }

    pub fn format(&self) -> D3DFormat {
        self.body.format
    }

    pub fn mip_level(&self) -> u32 {
        self.body.mip_level
    }

    /// Decode the body into a 4-channel buffer in the requested channel order.
    pub fn image_data(&self, format: ImageFormat) -> Result<ImageData, TextureError> {
        let (width, height) = (self.width(), self.height());
        let mut pixels = decode_rgba(self.body.format, self.data, width, height)?;
        if format == ImageFormat::B8G8R8A8 {
            for px in pixels.chunks_exact_mut(4) {
                px.swap(0, 2);
            }
        }
        Ok(ImageData {
            width,
            height,
            format,
            pixels,
        })
    }
}

/// Expand a 5-bit channel to 8 bits.
fn expand5(v: u16) -> u8 {
    let v = (v & 0x1f) as u8;
    (v << 3) | (v >> 2)
}

/// Expand a 6-bit channel to 8 bits.
fn expand6(v: u16) -> u8 {
    let v = (v & 0x3f) as u8;
    (v << 2) | (v >> 4)
}

fn expand4(v: u16) -> u8 {
    ((v & 0x0f) as u8) * 17
}

/// Decode a surface of `format` to tightly packed R8G8B8A8.
pub fn decode_rgba(
    format: D3DFormat,
    data: &[u8],
    width: usize,
    height: usize,
) -> Result<Vec<u8>, TextureError> {
    let expected = format
        .surface_size(width, height)
        .ok_or(TextureError::UnsupportedFormat(format))?;
    if data.len() < expected {
        return Err(TextureError::Truncated {
            format,
            expected,
            actual: data.len(),
        });
    }
    let data = &data[..expected];
    let mut rgba = Vec::with_capacity(width * height * 4);

    match format {
        D3DFormat::A8R8G8B8 | D3DFormat::X8R8G8B8 => {
            let opaque = format == D3DFormat::X8R8G8B8;
            for px in data.chunks_exact(4) {
                let a = if opaque { 0xff } else { px[3] };
                rgba.extend_from_slice(&[px[2], px[1], px[0], a]);
            }
        }
        D3DFormat::R5G6B5 => {
            for v in u16_pixels(data) {
                rgba.extend_from_slice(&[expand5(v >> 11), expand6(v >> 5), expand5(v), 0xff]);
            }
        }
        D3DFormat::X1R5G5B5 | D3DFormat::A1R5G5B5 => {
            let has_alpha = format == D3DFormat::A1R5G5B5;
            for v in u16_pixels(data) {
                let a = if !has_alpha || v & 0x8000 != 0 { 0xff } else { 0 };
                rgba.extend_from_slice(&[expand5(v >> 10), expand5(v >> 5), expand5(v), a]);
            }
        }
        D3DFormat::A4R4G4B4 => {
            for v in u16_pixels(data) {
                rgba.extend_from_slice(&[expand4(v >> 8), expand4(v >> 4), expand4(v), expand4(v >> 12)]);
            }
        }
        D3DFormat::L8 => {
            for &l in data {
                rgba.extend_from_slice(&[l, l, l, 0xff]);
            }
        }
        D3DFormat::A8L8 => {
            for px in data.chunks_exact(2) {
                rgba.extend_from_slice(&[px[0], px[0], px[0], px[1]]);
            }
        }
        // Alpha-only surfaces are shown as greyscale so they stay visible
        // once the alpha channel is dropped.
        D3DFormat::A8 => {
            for &a in data {
                rgba.extend_from_slice(&[a, a, a, 0xff]);
            }
        }
        D3DFormat::Dxt1 => return Ok(decode_bc(data, width, height, BcFormat::Bc1)),
        D3DFormat::Dxt3 => return Ok(decode_bc(data, width, height, BcFormat::Bc2)),
        D3DFormat::Dxt5 => return Ok(decode_bc(data, width, height, BcFormat::Bc3)),
        D3DFormat::Unknown(_) => return Err(TextureError::UnsupportedFormat(format)),
    }

    Ok(rgba)
}

fn u16_pixels(data: &[u8]) -> impl Iterator<Item = u16> + '_ {
    data.chunks_exact(2).map(|p| u16::from_le_bytes([p[0], p[1]]))
}

#[derive(Clone, Copy)]
enum BcFormat {
    Bc1, // DXT1, 8 bytes per 4x4 block
    Bc2, // DXT3, 16 bytes per block
    Bc3, // DXT5, 16 bytes per block
}

impl BcFormat {
    const fn block_size(self) -> usize {
        match self {
            Self::Bc1 => 8,
            Self::Bc2 | Self::Bc3 => 16,
        }
    }
}

/// Decode block-compressed data to RGBA. `data` must already hold every block.
fn decode_bc(data: &[u8], width: usize, height: usize, format: BcFormat) -> Vec<u8> {
    let mut rgba = vec![0u8; width * height * 4];
    let blocks_x = width.div_ceil(4);
    let blocks_y = height.div_ceil(4);
    let block_size = format.block_size();

    // one 4x4 block, 16 bytes per row
    let mut block_rgba = [0u8; 64];
    let block_pitch = 16;

    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let start = (by * blocks_x + bx) * block_size;
            let block = &data[start..start + block_size];

            match format {
                BcFormat::Bc1 => bcdec_rs::bc1(block, &mut block_rgba, block_pitch),
                BcFormat::Bc2 => bcdec_rs::bc2(block, &mut block_rgba, block_pitch),
                BcFormat::Bc3 => bcdec_rs::bc3(block, &mut block_rgba, block_pitch),
            }

            for py in 0..4 {
                for px in 0..4 {
                    let fx = bx * 4 + px;
                    let fy = by * 4 + py;
                    if fx >= width || fy >= height {
                        continue;
                    }
                    let src = (py * 4 + px) * 4;
                    let dst = (fy * width + fx) * 4;
                    rgba[dst..dst + 4].copy_from_slice(&block_rgba[src..src + 4]);
                }
            }
        }
    }

    rgba
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_codes_round_trip_through_u32() {
        for f in [D3DFormat::A8R8G8B8, D3DFormat::Dxt1, D3DFormat::Dxt5, D3DFormat::L8] {
            assert_eq!(D3DFormat::from_u32(f.to_u32()), f);
        }
        assert_eq!(D3DFormat::from_u32(0xdead), D3DFormat::Unknown(0xdead));
    }

    #[test]
    fn r5g6b5_expands_channels() {
        // pure red, pure green, pure blue, white
        let data = [0x00, 0xf8, 0xe0, 0x07, 0x1f, 0x00, 0xff, 0xff];
        let rgba = decode_rgba(D3DFormat::R5G6B5, &data, 2, 2).unwrap();
        assert_eq!(&rgba[0..4], &[0xff, 0, 0, 0xff]);
        assert_eq!(&rgba[4..8], &[0, 0xff, 0, 0xff]);
        assert_eq!(&rgba[8..12], &[0, 0, 0xff, 0xff]);
        assert_eq!(&rgba[12..16], &[0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn a4r4g4b4_expands_nibbles() {
        let data = 0x8f40u16.to_le_bytes();
        let rgba = decode_rgba(D3DFormat::A4R4G4B4, &data, 1, 1).unwrap();
        assert_eq!(rgba, vec![0xff, 0x44, 0x00, 0x88]);
    }

    #[test]
    fn dxt1_solid_block() {
        // color0 = color1 = pure red (565), all indices 0
        let block = [0x00, 0xf8, 0x00, 0xf8, 0, 0, 0, 0];
        let rgba = decode_rgba(D3DFormat::Dxt1, &block, 4, 4).unwrap();
        assert_eq!(rgba.len(), 64);
        for px in rgba.chunks_exact(4) {
            assert_eq!(px, &[0xff, 0, 0, 0xff]);
        }
    }

    #[test]
    fn dxt_dimensions_smaller_than_a_block() {
        let block = [0x1f, 0x00, 0x1f, 0x00, 0, 0, 0, 0];
        let rgba = decode_rgba(D3DFormat::Dxt1, &block, 2, 1).unwrap();
        assert_eq!(rgba, vec![0, 0, 0xff, 0xff, 0, 0, 0xff, 0xff]);
    }

    #[test]
    fn truncated_body_is_an_error() {
        let err = decode_rgba(D3DFormat::A8R8G8B8, &[0u8; 12], 2, 2).unwrap_err();
        assert_eq!(
            err,
            TextureError::Truncated {
                format: D3DFormat::A8R8G8B8,
                expected: 16,
                actual: 12
            }
        );
    }

    #[test]
    fn mip_level_dimensions_never_reach_zero() {
        let body = TextureBody::for_level(D3DFormat::Dxt1, 256, 64, 7);
        assert_eq!((body.width, body.height), (2, 1));
    }
}
