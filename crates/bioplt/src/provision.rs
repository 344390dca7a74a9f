//! Creation of the canonical material layers on a canvas.

use crate::catalog::Material;
use crate::error::Error;
use crate::host::{ColorMode, Host};

/// Ensures every catalog slot exists as a layer on the canvas.
///
/// Presence is checked by case-insensitive name, so the operation is
/// idempotent. A missing layer is inserted directly below the layer of the
/// nearest catalog successor that already exists, or at the top of the
/// stack when none does; starting from an empty canvas this produces the
/// canonical stacking order with `tattoo2` topmost and `skin` bottommost.
///
/// New layers are canvas-sized, transparent, and carry an alpha channel.
/// Indexed canvases are rejected before any layer is created.
pub fn ensure_layers<H: Host>(host: &mut H, canvas: &H::Canvas) -> Result<(), Error> {
    let mode = host.canvas_mode(canvas);
    if mode == ColorMode::Indexed {
        return Err(Error::UnsupportedColorMode(mode));
    }
    let (width, height) = host.canvas_size(canvas);

    for (index, material) in Material::ALL.into_iter().enumerate() {
        // Re-list every iteration: each insertion shifts stack positions.
        let layers = host.list_layers(canvas);
        let position_of = |name: &str| {
            layers
                .iter()
                .position(|layer| host.layer_name(layer).eq_ignore_ascii_case(name))
        };

        if position_of(material.name()).is_some() {
            continue;
        }

        let position = Material::ALL[index + 1..]
            .iter()
            .find_map(|successor| position_of(successor.name()))
            .map_or(0, |successor_position| successor_position + 1);

        let layer = host.create_layer(canvas, material.name(), width, height, true);
        host.insert_layer(canvas, layer, position);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MATERIAL_COUNT;
    use crate::host::mem::MemHost;

    fn layer_names(host: &MemHost, canvas: &<MemHost as Host>::Canvas) -> Vec<String> {
        host.list_layers(canvas)
            .iter()
            .map(|layer| host.layer_name(layer))
            .collect()
    }

    #[test]
    fn empty_canvas_gets_canonical_stack() {
        let mut host = MemHost::new();
        let canvas = host.create_canvas(4, 4, ColorMode::Gray).unwrap();
        ensure_layers(&mut host, &canvas).unwrap();

        let expected: Vec<&str> = Material::ALL.iter().rev().map(|m| m.name()).collect();
        assert_eq!(layer_names(&host, &canvas), expected);
    }

    #[test]
    fn is_idempotent() {
        let mut host = MemHost::new();
        let canvas = host.create_canvas(4, 4, ColorMode::Rgb).unwrap();
        ensure_layers(&mut host, &canvas).unwrap();
        ensure_layers(&mut host, &canvas).unwrap();

        assert_eq!(host.list_layers(&canvas).len(), MATERIAL_COUNT);
    }

    #[test]
    fn existing_layers_are_kept_and_gaps_filled() {
        let mut host = MemHost::new();
        let canvas = host.create_canvas(4, 4, ColorMode::Gray).unwrap();
        // Pre-existing, case-variant metal1 plus an unrelated layer below.
        let extra = host.create_layer(&canvas, "sketch", 4, 4, true);
        host.insert_layer(&canvas, extra, 0);
        let metal = host.create_layer(&canvas, "Metal1", 4, 4, true);
        host.insert_layer(&canvas, metal, 0);

        ensure_layers(&mut host, &canvas).unwrap();

        let names = layer_names(&host, &canvas);
        assert_eq!(names.len(), MATERIAL_COUNT + 1);
        // The case-variant layer was reused (not duplicated), hair and skin
        // went directly below it, and everything later in the catalog
        // stacked on top; the unrelated layer stays at the bottom.
        assert_eq!(
            names,
            vec![
                "tattoo2", "tattoo1", "leather2", "leather1", "cloth2", "cloth1", "metal2",
                "Metal1", "hair", "skin", "sketch",
            ]
        );
    }

    #[test]
    fn indexed_canvas_is_rejected() {
        let mut host = MemHost::new();
        let canvas = host.create_canvas(4, 4, ColorMode::Indexed).unwrap();
        assert!(matches!(
            ensure_layers(&mut host, &canvas),
            Err(Error::UnsupportedColorMode(ColorMode::Indexed))
        ));
        assert!(host.list_layers(&canvas).is_empty());
    }
}
