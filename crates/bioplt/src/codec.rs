//! Encoding and decoding of the on-disk PLT byte stream.
//!
//! File layout:
//!
//! ```text
//! offset  0: 8 bytes  magic "PLT V1  " (case-insensitive on read)
//! offset  8: 8 bytes  reserved, ignored on read
//! offset 16: 4 bytes  width  (u32, little-endian)
//! offset 20: 4 bytes  height (u32, little-endian)
//! offset 24: width * height * 2 bytes of (intensity, material) pairs,
//!            row-major with file row 0 at the canvas bottom
//! ```

use crate::catalog::MATERIAL_COUNT;
use crate::error::Error;
use crate::packed::{PackedImage, PackedPixel};

/// The 8-byte file magic.
pub const MAGIC: [u8; 8] = *b"PLT V1  ";

/// Total header size in bytes.
pub const HEADER_SIZE: usize = 24;

/// A cursor over an in-memory byte buffer that reports short reads as
/// [`Error::Truncated`].
struct SliceReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        SliceReader { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        if self.remaining() < N {
            return Err(Error::Truncated {
                needed: N as u64,
                available: self.remaining() as u64,
            });
        }
        let mut out = [0; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    fn read_u8(&mut self) -> Result<u8, Error> {
        Ok(self.read_array::<1>()?[0])
    }

    fn read_u32_le(&mut self) -> Result<u32, Error> {
        Ok(u32::from_le_bytes(self.read_array::<4>()?))
    }
}

/// Decodes a PLT byte stream into a [`PackedImage`] in canvas orientation.
///
/// Fails without side effects: a malformed input never yields a partial
/// image. Material tags are not validated here; tags outside the catalog
/// simply never match any slot during compositing.
pub fn decode(data: &[u8]) -> Result<PackedImage, Error> {
    let mut reader = SliceReader::new(data);

    let magic: [u8; 8] = reader.read_array()?;
    if !magic.eq_ignore_ascii_case(&MAGIC) {
        return Err(Error::BadMagic { found: magic });
    }
    let _reserved: [u8; 8] = reader.read_array()?;
    let width = reader.read_u32_le()?;
    let height = reader.read_u32_le()?;

    let pixel_count = u64::from(width) * u64::from(height);
    let expected = pixel_count * 2;
    let available = reader.remaining() as u64;
    if available < expected {
        return Err(Error::Truncated {
            needed: expected,
            available,
        });
    }
    if available > expected {
        return Err(Error::SizeMismatch {
            width,
            height,
            expected,
            actual: available,
        });
    }

    // expected == available, so this fits in memory.
    let pixel_count = usize::try_from(pixel_count).unwrap_or(usize::MAX);
    let mut pixels = Vec::with_capacity(pixel_count);
    for _ in 0..pixel_count {
        let intensity = reader.read_u8()?;
        let material = reader.read_u8()?;
        pixels.push(PackedPixel {
            intensity,
            material,
        });
    }

    log::debug!("Decoded PLT stream: {width}x{height}, {pixel_count} pixels");
    Ok(PackedImage::from_pixels(width, height, pixels).flipped_vertical())
}

/// Encodes a [`PackedImage`] into PLT bytes.
///
/// The reserved header block carries the material slot count in its first
/// byte, matching the original writer; decoders ignore it.
#[must_use]
pub fn encode(image: &PackedImage) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_SIZE + image.pixels().len() * 2);
    out.extend_from_slice(&MAGIC);

    let mut reserved = [0u8; 8];
    reserved[0] = MATERIAL_COUNT as u8;
    out.extend_from_slice(&reserved);

    out.extend_from_slice(&image.width().to_le_bytes());
    out.extend_from_slice(&image.height().to_le_bytes());

    for pixel in image.flipped_vertical().pixels() {
        out.push(pixel.intensity);
        out.push(pixel.material);
    }

    log::debug!(
        "Encoded PLT stream: {}x{}, {} bytes",
        image.width(),
        image.height(),
        out.len()
    );
    out
}
