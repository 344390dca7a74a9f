//! Intersection of an offset layer footprint with the canvas.

/// The visible rectangle of a layer, expressed in both coordinate systems.
///
/// Pixel `(i, j)` of the clipped region is layer-local pixel
/// `(layer_x + i, layer_y + j)` and canvas pixel
/// `(canvas_x + i, canvas_y + j)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRect {
    pub layer_x: u32,
    pub layer_y: u32,
    pub canvas_x: u32,
    pub canvas_y: u32,
    pub width: u32,
    pub height: u32,
}

/// Clips a layer of size `layer_w` x `layer_h` at `offset` against a canvas
/// of size `canvas_w` x `canvas_h`.
///
/// Offsets may be negative or place the layer partially or entirely outside
/// the canvas; out-of-canvas pixels are never part of the result, and there
/// is no wraparound. Returns `None` when the intersection is empty on
/// either axis.
#[must_use]
pub fn clip_to_canvas(
    canvas_w: u32,
    canvas_h: u32,
    offset: (i32, i32),
    layer_w: u32,
    layer_h: u32,
) -> Option<ClipRect> {
    let (offset_x, offset_y) = (i64::from(offset.0), i64::from(offset.1));

    let x0 = offset_x.max(0);
    let x1 = (offset_x + i64::from(layer_w)).min(i64::from(canvas_w));
    let y0 = offset_y.max(0);
    let y1 = (offset_y + i64::from(layer_h)).min(i64::from(canvas_h));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    Some(ClipRect {
        layer_x: (x0 - offset_x) as u32,
        layer_y: (y0 - offset_y) as u32,
        canvas_x: x0 as u32,
        canvas_y: y0 as u32,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
    })
}
