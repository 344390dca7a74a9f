//! The collaborator interface to the image-editing host.
//!
//! The core never owns canvases or layers; it only reads and writes
//! rectangular pixel regions through this trait. This keeps the codec and
//! compositor independent of any concrete editor and testable against the
//! in-memory implementation in [`mem`].

use crate::error::Error;

pub mod mem;

/// The color model of a canvas and its layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
    Gray,
    Rgb,
    /// Palette-indexed canvases cannot be reduced to intensities and are
    /// rejected by every operation that reads or creates layer pixels.
    Indexed,
}

impl ColorMode {
    /// Color channels per pixel, not counting alpha.
    #[must_use]
    pub fn channels(self) -> usize {
        match self {
            ColorMode::Gray | ColorMode::Indexed => 1,
            ColorMode::Rgb => 3,
        }
    }
}

/// An image-editing host holding canvases composed of named raster layers.
///
/// Layers are handles into host-owned state. A layer has a name, its own
/// pixel dimensions, an integer offset relative to the canvas origin (which
/// may be negative or exceed the canvas bounds), and 1-4 bytes per pixel
/// depending on color mode and alpha. Region coordinates passed to
/// [`read_region`](Host::read_region) and
/// [`write_region`](Host::write_region) are layer-local and must lie within
/// the layer; callers clip against the canvas first.
pub trait Host {
    type Canvas;
    type Layer: Clone;

    fn create_canvas(
        &mut self,
        width: u32,
        height: u32,
        mode: ColorMode,
    ) -> Result<Self::Canvas, Error>;

    /// Destroys a canvas and all of its layers. Used to roll back a failed
    /// load so no partially populated canvas is left behind.
    fn delete_canvas(&mut self, canvas: &Self::Canvas);

    fn canvas_size(&self, canvas: &Self::Canvas) -> (u32, u32);

    fn canvas_mode(&self, canvas: &Self::Canvas) -> ColorMode;

    /// Creates a new, fully transparent layer. The layer is not part of the
    /// canvas stack until [`insert_layer`](Host::insert_layer) is called.
    fn create_layer(
        &mut self,
        canvas: &Self::Canvas,
        name: &str,
        width: u32,
        height: u32,
        has_alpha: bool,
    ) -> Self::Layer;

    /// Inserts a layer into the canvas stack. Position 0 is the top of the
    /// stack; positions past the end append at the bottom.
    fn insert_layer(&mut self, canvas: &Self::Canvas, layer: Self::Layer, position: usize);

    /// All layers of the canvas, ordered top-to-bottom.
    fn list_layers(&self, canvas: &Self::Canvas) -> Vec<Self::Layer>;

    fn layer_name(&self, layer: &Self::Layer) -> String;

    /// The layer's offset relative to the canvas origin.
    fn layer_offset(&self, layer: &Self::Layer) -> (i32, i32);

    fn layer_size(&self, layer: &Self::Layer) -> (u32, u32);

    fn layer_has_alpha(&self, layer: &Self::Layer) -> bool;

    fn layer_bytes_per_pixel(&self, layer: &Self::Layer) -> usize;

    /// Reads a layer-local rectangle as packed rows of
    /// `layer_bytes_per_pixel` bytes per pixel.
    fn read_region(&self, layer: &Self::Layer, x: u32, y: u32, w: u32, h: u32) -> Vec<u8>;

    /// Writes a layer-local rectangle. `data` must hold exactly
    /// `w * h * layer_bytes_per_pixel` bytes.
    fn write_region(&mut self, layer: &Self::Layer, x: u32, y: u32, w: u32, h: u32, data: &[u8]);
}
