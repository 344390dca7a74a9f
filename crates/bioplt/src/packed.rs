//! The in-memory form of a PLT pixel stream.

/// A single packed pixel: a gray intensity plus the material tag of the
/// layer it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedPixel {
    pub intensity: u8,
    pub material: u8,
}

/// The "no material assigned" pixel. Written for every canvas position no
/// layer covers.
pub const SENTINEL: PackedPixel = PackedPixel {
    intensity: 255,
    material: 0,
};

/// A full-canvas grid of packed pixels, stored row-major with row 0 at the
/// top of the canvas.
///
/// The on-disk stream stores rows bottom-to-top instead; the codec performs
/// that flip, so a `PackedImage` is always in canvas orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedImage {
    width: u32,
    height: u32,
    pixels: Vec<PackedPixel>,
}

impl PackedImage {
    /// Creates an image with every pixel set to [`SENTINEL`].
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        PackedImage {
            width,
            height,
            pixels: vec![SENTINEL; len],
        }
    }

    /// Wraps an existing pixel vector. The vector length must match the
    /// dimensions.
    #[must_use]
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<PackedPixel>) -> Self {
        assert_eq!(
            pixels.len(),
            width as usize * height as usize,
            "pixel count must equal width * height"
        );
        PackedImage {
            width,
            height,
            pixels,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn pixels(&self) -> &[PackedPixel] {
        &self.pixels
    }

    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> PackedPixel {
        assert!(x < self.width && y < self.height);
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, pixel: PackedPixel) {
        assert!(x < self.width && y < self.height);
        self.pixels[y as usize * self.width as usize + x as usize] = pixel;
    }

    /// Returns a copy of this image with its row order reversed.
    ///
    /// This is the single coordinate-system reconciliation between canvas
    /// orientation (row 0 on top) and file orientation (row 0 at the
    /// bottom). It is its own inverse.
    #[must_use]
    pub fn flipped_vertical(&self) -> PackedImage {
        let width = self.width as usize;
        if width == 0 {
            return self.clone();
        }
        let mut pixels = Vec::with_capacity(self.pixels.len());
        for row in self.pixels.chunks_exact(width).rev() {
            pixels.extend_from_slice(row);
        }
        PackedImage {
            width: self.width,
            height: self.height,
            pixels,
        }
    }
}
