//! File-level operations tying the codec to a host canvas.

use std::fs;
use std::path::Path;

use crate::codec;
use crate::composite::{merge_from_layers, split_to_masks};
use crate::error::Error;
use crate::host::{ColorMode, Host};
use crate::packed::PackedImage;
use crate::resolve::resolve_layers;

/// Reads and decodes a PLT file.
pub fn decode_file(path: &Path) -> Result<PackedImage, Error> {
    let data = fs::read(path)?;
    codec::decode(&data)
}

/// Encodes a packed image and writes it to `path`, replacing any existing
/// file.
pub fn encode_file(path: &Path, image: &PackedImage) -> Result<(), Error> {
    fs::write(path, codec::encode(image))?;
    Ok(())
}

/// Creates the ten material layers on a canvas and fills each with its
/// slot's mask from the packed image.
///
/// Layers are created in catalog order, each at the top of the stack, so
/// the canvas ends up in canonical stacking order. The canvas must be in
/// [`ColorMode::Gray`] and match the image dimensions; nothing is created
/// on failure.
pub fn populate_canvas_from_packed_image<H: Host>(
    host: &mut H,
    canvas: &H::Canvas,
    image: &PackedImage,
) -> Result<(), Error> {
    let mode = host.canvas_mode(canvas);
    if mode != ColorMode::Gray {
        return Err(Error::UnsupportedColorMode(mode));
    }
    let (canvas_w, canvas_h) = host.canvas_size(canvas);
    if (canvas_w, canvas_h) != (image.width(), image.height()) {
        return Err(Error::SizeMismatch {
            width: image.width(),
            height: image.height(),
            expected: u64::from(image.width()) * u64::from(image.height()) * 2,
            actual: u64::from(canvas_w) * u64::from(canvas_h) * 2,
        });
    }

    for mask in split_to_masks(image) {
        let layer = host.create_layer(
            canvas,
            mask.material().name(),
            image.width(),
            image.height(),
            true,
        );
        host.insert_layer(canvas, layer.clone(), 0);
        host.write_region(&layer, 0, 0, mask.width(), mask.height(), mask.data());
    }
    Ok(())
}

/// Resolves the canvas's layers against the catalog and merges them into a
/// packed image ready for [`encode_file`].
pub fn build_packed_image_from_canvas<H: Host>(
    host: &H,
    canvas: &H::Canvas,
) -> Result<PackedImage, Error> {
    let bindings = resolve_layers(host, canvas);
    merge_from_layers(host, canvas, &bindings)
}

/// Decodes a PLT file into a freshly created gray canvas.
///
/// If populating fails after the canvas was created, the canvas is deleted
/// before the error is returned; a failed load never leaves a partial
/// canvas behind.
pub fn load_canvas<H: Host>(host: &mut H, path: &Path) -> Result<H::Canvas, Error> {
    let image = decode_file(path)?;
    let canvas = host.create_canvas(image.width(), image.height(), ColorMode::Gray)?;
    if let Err(err) = populate_canvas_from_packed_image(host, &canvas, &image) {
        host.delete_canvas(&canvas);
        return Err(err);
    }
    Ok(canvas)
}
