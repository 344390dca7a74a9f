//! Splitting a packed image into per-material masks and merging host
//! layers back into a packed image.

use crate::catalog::Material;
use crate::clip::clip_to_canvas;
use crate::error::Error;
use crate::host::{ColorMode, Host};
use crate::packed::{PackedImage, PackedPixel};
use crate::resolve::BindingTable;

/// Alpha values at or below this are treated as not covering the pixel
/// when a layer carries an alpha channel. The comparison is strict:
/// alpha 127 is skipped, alpha 128 is written.
pub const ALPHA_THRESHOLD: u8 = 127;

/// A full-canvas gray+alpha raster for one material slot, as produced on
/// decode. Pixels tagged with the slot's material carry their intensity and
/// full alpha; all others are transparent black.
#[derive(Debug, Clone)]
pub struct SlotMask {
    material: Material,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl SlotMask {
    #[must_use]
    pub fn material(&self) -> Material {
        self.material
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Interleaved (intensity, alpha) pairs, row-major in canvas
    /// orientation.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.pixels
    }

    /// True when no pixel of the image belongs to this slot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixels.chunks_exact(2).all(|pair| pair[1] == 0)
    }
}

/// Splits a packed image into one mask per catalog slot.
///
/// Pure and total: pixels with a material tag outside the catalog simply
/// appear in no mask. Note that background sentinel pixels carry tag 0 and
/// therefore land in the skin mask with intensity 255; this mirrors the
/// original loader and keeps gray round trips exact.
#[must_use]
pub fn split_to_masks(image: &PackedImage) -> Vec<SlotMask> {
    Material::ALL
        .into_iter()
        .map(|material| {
            let mut pixels = vec![0u8; image.pixels().len() * 2];
            for (index, pixel) in image.pixels().iter().enumerate() {
                if pixel.material == material.tag() {
                    pixels[index * 2] = pixel.intensity;
                    pixels[index * 2 + 1] = 255;
                }
            }
            SlotMask {
                material,
                width: image.width(),
                height: image.height(),
                pixels,
            }
        })
        .collect()
}

/// Reduces one layer pixel to a single intensity. Gray layers use their
/// single channel; RGB layers use the truncated mean of the three
/// channels.
fn reduce_intensity(pixel: &[u8], color_channels: usize) -> u8 {
    if color_channels >= 3 {
        let sum = u16::from(pixel[0]) + u16::from(pixel[1]) + u16::from(pixel[2]);
        (sum / 3) as u8
    } else {
        pixel[0]
    }
}

/// Merges the bound slot layers of a canvas into a packed image.
///
/// Every output pixel starts as the background sentinel. Slots are visited
/// in catalog order (slot 0 first); each bound layer is clipped against the
/// canvas and written into the output:
///
/// - layers with an alpha channel write only where alpha exceeds
///   [`ALPHA_THRESHOLD`], leaving earlier writes (or the sentinel) in place
///   elsewhere;
/// - layers without alpha are treated as fully opaque and overwrite the
///   whole clipped region unconditionally.
///
/// The stacking precedence is therefore "higher slot index wins" on
/// opaque overlaps, not host z-order. That is the documented behavior of
/// the format's original writer and is preserved as-is.
///
/// Fails with [`Error::UnsupportedColorMode`] on indexed canvases, before
/// any layer data is read.
pub fn merge_from_layers<H: Host>(
    host: &H,
    canvas: &H::Canvas,
    bindings: &BindingTable<H::Layer>,
) -> Result<PackedImage, Error> {
    let mode = host.canvas_mode(canvas);
    if mode == ColorMode::Indexed {
        return Err(Error::UnsupportedColorMode(mode));
    }
    let (canvas_w, canvas_h) = host.canvas_size(canvas);
    let mut out = PackedImage::new(canvas_w, canvas_h);

    for binding in bindings.iter() {
        let Some(layer) = binding.layer.as_ref() else {
            continue;
        };
        let (layer_w, layer_h) = host.layer_size(layer);
        let offset = host.layer_offset(layer);
        let Some(rect) = clip_to_canvas(canvas_w, canvas_h, offset, layer_w, layer_h) else {
            continue;
        };

        let data = host.read_region(layer, rect.layer_x, rect.layer_y, rect.width, rect.height);
        let bytes_per_pixel = host.layer_bytes_per_pixel(layer);
        let has_alpha = host.layer_has_alpha(layer);
        let color_channels = bytes_per_pixel - usize::from(has_alpha);

        for j in 0..rect.height {
            for i in 0..rect.width {
                let start = (j as usize * rect.width as usize + i as usize) * bytes_per_pixel;
                let pixel = &data[start..start + bytes_per_pixel];
                if has_alpha && pixel[bytes_per_pixel - 1] <= ALPHA_THRESHOLD {
                    continue;
                }
                out.set(
                    rect.canvas_x + i,
                    rect.canvas_y + j,
                    PackedPixel {
                        intensity: reduce_intensity(pixel, color_channels),
                        material: binding.material.tag(),
                    },
                );
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mem::{LayerId, MemHost};
    use crate::packed::SENTINEL;
    use crate::resolve::resolve_layers;

    fn gray_canvas(
        host: &mut MemHost,
        width: u32,
        height: u32,
    ) -> <MemHost as Host>::Canvas {
        host.create_canvas(width, height, ColorMode::Gray).unwrap()
    }

    fn add_layer(
        host: &mut MemHost,
        canvas: &<MemHost as Host>::Canvas,
        name: &str,
        width: u32,
        height: u32,
        has_alpha: bool,
    ) -> LayerId {
        let layer = host.create_layer(canvas, name, width, height, has_alpha);
        host.insert_layer(canvas, layer, 0);
        layer
    }

    #[test]
    fn split_masks_partition_by_tag() {
        let mut image = PackedImage::new(2, 1);
        image.set(0, 0, PackedPixel { intensity: 80, material: 1 });
        image.set(1, 0, PackedPixel { intensity: 90, material: 9 });

        let masks = split_to_masks(&image);
        assert_eq!(masks.len(), 10);
        assert_eq!(masks[1].data(), &[80, 255, 0, 0]);
        assert_eq!(masks[9].data(), &[0, 0, 90, 255]);
        assert!(masks[2].is_empty());
        assert!(!masks[1].is_empty());
    }

    #[test]
    fn split_puts_sentinel_pixels_in_slot_zero() {
        let image = PackedImage::new(1, 1);
        let masks = split_to_masks(&image);
        assert_eq!(masks[0].data(), &[255, 255]);
        assert!(masks.iter().skip(1).all(SlotMask::is_empty));
    }

    #[test]
    fn out_of_catalog_tags_match_no_mask() {
        let mut image = PackedImage::new(1, 1);
        image.set(0, 0, PackedPixel { intensity: 1, material: 42 });
        let masks = split_to_masks(&image);
        assert!(masks.iter().all(SlotMask::is_empty));
    }

    #[test]
    fn merge_with_no_bindings_is_all_sentinel() {
        let mut host = MemHost::new();
        let canvas = gray_canvas(&mut host, 3, 3);
        let table = resolve_layers(&host, &canvas);

        let image = merge_from_layers(&host, &canvas, &table).unwrap();
        assert!(image.pixels().iter().all(|px| *px == SENTINEL));
    }

    #[test]
    fn alpha_threshold_is_strict() {
        let mut host = MemHost::new();
        let canvas = gray_canvas(&mut host, 2, 1);
        let skin = add_layer(&mut host, &canvas, "skin", 2, 1, true);
        host.write_region(&skin, 0, 0, 2, 1, &[100, 127, 200, 128]);

        let table = resolve_layers(&host, &canvas);
        let image = merge_from_layers(&host, &canvas, &table).unwrap();
        // Alpha 127 is at the threshold: not written, sentinel survives.
        assert_eq!(image.get(0, 0), SENTINEL);
        // Alpha 128 is one above: written.
        assert_eq!(image.get(1, 0), PackedPixel { intensity: 200, material: 0 });
    }

    #[test]
    fn opaque_layer_overwrites_earlier_slot() {
        let mut host = MemHost::new();
        let canvas = gray_canvas(&mut host, 1, 1);
        let metal = add_layer(&mut host, &canvas, "metal1", 1, 1, true);
        host.write_region(&metal, 0, 0, 1, 1, &[50, 255]);
        // cloth2 (slot 5) has no alpha channel: unconditionally opaque.
        let cloth = add_layer(&mut host, &canvas, "cloth2", 1, 1, false);
        host.write_region(&cloth, 0, 0, 1, 1, &[60]);

        let table = resolve_layers(&host, &canvas);
        let image = merge_from_layers(&host, &canvas, &table).unwrap();
        assert_eq!(image.get(0, 0), PackedPixel { intensity: 60, material: 5 });
    }

    #[test]
    fn transparent_later_slot_preserves_earlier_write() {
        let mut host = MemHost::new();
        let canvas = gray_canvas(&mut host, 1, 1);
        let hair = add_layer(&mut host, &canvas, "hair", 1, 1, true);
        host.write_region(&hair, 0, 0, 1, 1, &[70, 255]);
        // A fully transparent later slot must not erase hair's pixel.
        add_layer(&mut host, &canvas, "tattoo2", 1, 1, true);

        let table = resolve_layers(&host, &canvas);
        let image = merge_from_layers(&host, &canvas, &table).unwrap();
        assert_eq!(image.get(0, 0), PackedPixel { intensity: 70, material: 1 });
    }

    #[test]
    fn rgb_layers_reduce_by_truncated_mean() {
        let mut host = MemHost::new();
        let canvas = host.create_canvas(2, 1, ColorMode::Rgb).unwrap();
        let skin = add_layer(&mut host, &canvas, "skin", 2, 1, true);
        // (10 + 11 + 13) / 3 = 11.33 -> 11; (255 + 255 + 254) / 3 -> 254
        host.write_region(&skin, 0, 0, 2, 1, &[10, 11, 13, 255, 255, 255, 254, 255]);

        let table = resolve_layers(&host, &canvas);
        let image = merge_from_layers(&host, &canvas, &table).unwrap();
        assert_eq!(image.get(0, 0).intensity, 11);
        assert_eq!(image.get(1, 0).intensity, 254);
    }

    #[test]
    fn offset_layers_are_clipped() {
        let mut host = MemHost::new();
        let canvas = gray_canvas(&mut host, 2, 2);
        let skin = add_layer(&mut host, &canvas, "skin", 2, 2, false);
        host.fill_layer(skin, &[33]);
        // Shift the layer so only its bottom-right pixel stays on canvas.
        host.set_layer_offset(skin, -1, -1);

        let table = resolve_layers(&host, &canvas);
        let image = merge_from_layers(&host, &canvas, &table).unwrap();
        assert_eq!(image.get(0, 0), PackedPixel { intensity: 33, material: 0 });
        assert_eq!(image.get(1, 0), SENTINEL);
        assert_eq!(image.get(0, 1), SENTINEL);
        assert_eq!(image.get(1, 1), SENTINEL);
    }

    #[test]
    fn fully_offscreen_layer_contributes_nothing() {
        let mut host = MemHost::new();
        let canvas = gray_canvas(&mut host, 2, 2);
        let skin = add_layer(&mut host, &canvas, "skin", 2, 2, false);
        host.fill_layer(skin, &[33]);
        host.set_layer_offset(skin, 10, 10);

        let table = resolve_layers(&host, &canvas);
        let image = merge_from_layers(&host, &canvas, &table).unwrap();
        assert!(image.pixels().iter().all(|px| *px == SENTINEL));
    }

    #[test]
    fn indexed_canvas_is_rejected() {
        let mut host = MemHost::new();
        let canvas = host.create_canvas(2, 2, ColorMode::Indexed).unwrap();
        let table = resolve_layers(&host, &canvas);
        assert!(matches!(
            merge_from_layers(&host, &canvas, &table),
            Err(Error::UnsupportedColorMode(ColorMode::Indexed))
        ));
    }

    #[test]
    fn two_by_one_scenario() {
        // Smallest interesting canvas: one skin pixel, one background pixel.
        let mut host = MemHost::new();
        let canvas = gray_canvas(&mut host, 2, 1);
        let skin = add_layer(&mut host, &canvas, "skin", 2, 1, true);
        host.write_region(&skin, 0, 0, 2, 1, &[200, 255, 0, 0]);

        let table = resolve_layers(&host, &canvas);
        let image = merge_from_layers(&host, &canvas, &table).unwrap();
        assert_eq!(image.get(0, 0), PackedPixel { intensity: 200, material: 0 });
        assert_eq!(image.get(1, 0), SENTINEL);

        let encoded = crate::codec::encode(&image);
        assert_eq!(encoded.len(), 26);
        assert_eq!(crate::codec::decode(&encoded).unwrap(), image);
    }
}
