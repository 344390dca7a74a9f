//! An in-memory [`Host`] implementation.
//!
//! Backs the command-line tool and the test suite. Canvases and layers are
//! stored in flat arenas and addressed by copyable id handles, mirroring
//! the handle-based object model of a real editor host.

use crate::error::Error;
use crate::host::{ColorMode, Host};

/// Handle to a canvas owned by a [`MemHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanvasId(usize);

/// Handle to a layer owned by a [`MemHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(usize);

#[derive(Debug)]
struct CanvasData {
    width: u32,
    height: u32,
    mode: ColorMode,
    /// Layer stack, top-to-bottom.
    stack: Vec<LayerId>,
}

#[derive(Debug)]
struct LayerData {
    name: String,
    width: u32,
    height: u32,
    offset: (i32, i32),
    has_alpha: bool,
    bytes_per_pixel: usize,
    pixels: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct MemHost {
    canvases: Vec<Option<CanvasData>>,
    layers: Vec<LayerData>,
}

impl MemHost {
    #[must_use]
    pub fn new() -> Self {
        MemHost::default()
    }

    /// Number of live (not deleted) canvases.
    #[must_use]
    pub fn canvas_count(&self) -> usize {
        self.canvases.iter().flatten().count()
    }

    /// Moves a layer relative to its canvas origin.
    pub fn set_layer_offset(&mut self, layer: LayerId, x: i32, y: i32) {
        self.layers[layer.0].offset = (x, y);
    }

    /// Fills an entire layer with one repeated pixel value. `pixel` must be
    /// `layer_bytes_per_pixel` bytes long.
    pub fn fill_layer(&mut self, layer: LayerId, pixel: &[u8]) {
        let data = &mut self.layers[layer.0];
        assert_eq!(pixel.len(), data.bytes_per_pixel);
        for chunk in data.pixels.chunks_exact_mut(pixel.len()) {
            chunk.copy_from_slice(pixel);
        }
    }

    fn canvas(&self, id: CanvasId) -> &CanvasData {
        self.canvases[id.0]
            .as_ref()
            .expect("canvas used after deletion")
    }

    fn canvas_mut(&mut self, id: CanvasId) -> &mut CanvasData {
        self.canvases[id.0]
            .as_mut()
            .expect("canvas used after deletion")
    }
}

impl Host for MemHost {
    type Canvas = CanvasId;
    type Layer = LayerId;

    fn create_canvas(
        &mut self,
        width: u32,
        height: u32,
        mode: ColorMode,
    ) -> Result<CanvasId, Error> {
        self.canvases.push(Some(CanvasData {
            width,
            height,
            mode,
            stack: Vec::new(),
        }));
        Ok(CanvasId(self.canvases.len() - 1))
    }

    fn delete_canvas(&mut self, canvas: &CanvasId) {
        self.canvases[canvas.0] = None;
    }

    fn canvas_size(&self, canvas: &CanvasId) -> (u32, u32) {
        let data = self.canvas(*canvas);
        (data.width, data.height)
    }

    fn canvas_mode(&self, canvas: &CanvasId) -> ColorMode {
        self.canvas(*canvas).mode
    }

    fn create_layer(
        &mut self,
        canvas: &CanvasId,
        name: &str,
        width: u32,
        height: u32,
        has_alpha: bool,
    ) -> LayerId {
        let mode = self.canvas(*canvas).mode;
        let bytes_per_pixel = mode.channels() + usize::from(has_alpha);
        self.layers.push(LayerData {
            name: name.to_owned(),
            width,
            height,
            offset: (0, 0),
            has_alpha,
            bytes_per_pixel,
            pixels: vec![0; width as usize * height as usize * bytes_per_pixel],
        });
        LayerId(self.layers.len() - 1)
    }

    fn insert_layer(&mut self, canvas: &CanvasId, layer: LayerId, position: usize) {
        let stack = &mut self.canvas_mut(*canvas).stack;
        let position = position.min(stack.len());
        stack.insert(position, layer);
    }

    fn list_layers(&self, canvas: &CanvasId) -> Vec<LayerId> {
        self.canvas(*canvas).stack.clone()
    }

    fn layer_name(&self, layer: &LayerId) -> String {
        self.layers[layer.0].name.clone()
    }

    fn layer_offset(&self, layer: &LayerId) -> (i32, i32) {
        self.layers[layer.0].offset
    }

    fn layer_size(&self, layer: &LayerId) -> (u32, u32) {
        let data = &self.layers[layer.0];
        (data.width, data.height)
    }

    fn layer_has_alpha(&self, layer: &LayerId) -> bool {
        self.layers[layer.0].has_alpha
    }

    fn layer_bytes_per_pixel(&self, layer: &LayerId) -> usize {
        self.layers[layer.0].bytes_per_pixel
    }

    fn read_region(&self, layer: &LayerId, x: u32, y: u32, w: u32, h: u32) -> Vec<u8> {
        let data = &self.layers[layer.0];
        assert!(x + w <= data.width && y + h <= data.height);
        let bpp = data.bytes_per_pixel;
        let mut out = Vec::with_capacity(w as usize * h as usize * bpp);
        for row in y..y + h {
            let start = (row as usize * data.width as usize + x as usize) * bpp;
            out.extend_from_slice(&data.pixels[start..start + w as usize * bpp]);
        }
        out
    }

    fn write_region(&mut self, layer: &LayerId, x: u32, y: u32, w: u32, h: u32, data: &[u8]) {
        let target = &mut self.layers[layer.0];
        assert!(x + w <= target.width && y + h <= target.height);
        let bpp = target.bytes_per_pixel;
        assert_eq!(data.len(), w as usize * h as usize * bpp);
        for (j, row) in data.chunks_exact(w as usize * bpp).enumerate() {
            let start = ((y as usize + j) * target.width as usize + x as usize) * bpp;
            target.pixels[start..start + row.len()].copy_from_slice(row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_read_write_round_trip() {
        let mut host = MemHost::new();
        let canvas = host.create_canvas(4, 4, ColorMode::Gray).unwrap();
        let layer = host.create_layer(&canvas, "skin", 4, 4, true);
        host.insert_layer(&canvas, layer, 0);

        host.write_region(&layer, 1, 1, 2, 2, &[10, 255, 20, 255, 30, 255, 40, 255]);
        assert_eq!(
            host.read_region(&layer, 1, 1, 2, 2),
            vec![10, 255, 20, 255, 30, 255, 40, 255]
        );
        // Pixels outside the written rectangle stay transparent.
        assert_eq!(host.read_region(&layer, 0, 0, 1, 1), vec![0, 0]);
    }

    #[test]
    fn insert_positions_are_top_down() {
        let mut host = MemHost::new();
        let canvas = host.create_canvas(2, 2, ColorMode::Gray).unwrap();
        let bottom = host.create_layer(&canvas, "bottom", 2, 2, true);
        let top = host.create_layer(&canvas, "top", 2, 2, true);
        host.insert_layer(&canvas, bottom, 0);
        host.insert_layer(&canvas, top, 0);

        let names: Vec<String> = host
            .list_layers(&canvas)
            .iter()
            .map(|layer| host.layer_name(layer))
            .collect();
        assert_eq!(names, vec!["top", "bottom"]);
    }

    #[test]
    fn delete_canvas_releases_it() {
        let mut host = MemHost::new();
        let canvas = host.create_canvas(2, 2, ColorMode::Gray).unwrap();
        assert_eq!(host.canvas_count(), 1);
        host.delete_canvas(&canvas);
        assert_eq!(host.canvas_count(), 0);
    }

    #[test]
    fn bytes_per_pixel_follows_mode_and_alpha() {
        let mut host = MemHost::new();
        let gray = host.create_canvas(1, 1, ColorMode::Gray).unwrap();
        let rgb = host.create_canvas(1, 1, ColorMode::Rgb).unwrap();

        let graya = host.create_layer(&gray, "a", 1, 1, true);
        let gray_flat = host.create_layer(&gray, "b", 1, 1, false);
        let rgba = host.create_layer(&rgb, "c", 1, 1, true);
        let rgb_flat = host.create_layer(&rgb, "d", 1, 1, false);

        assert_eq!(host.layer_bytes_per_pixel(&graya), 2);
        assert_eq!(host.layer_bytes_per_pixel(&gray_flat), 1);
        assert_eq!(host.layer_bytes_per_pixel(&rgba), 4);
        assert_eq!(host.layer_bytes_per_pixel(&rgb_flat), 3);
    }
}
