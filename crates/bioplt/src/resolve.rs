//! Binding of host layers to material slots.

use crate::catalog::{MATERIAL_COUNT, Material};
use crate::error::Error;
use crate::host::Host;

/// A material slot and the host layer bound to it, if any. An unbound slot
/// contributes nothing to a merge.
#[derive(Debug, Clone)]
pub struct SlotBinding<L> {
    pub material: Material,
    pub layer: Option<L>,
}

/// The resolved slot-to-layer table for one encode call.
///
/// Rebuilt from scratch on every call; layer identity in the host can
/// change between calls, so bindings are never cached.
#[derive(Debug)]
pub struct BindingTable<L> {
    bindings: Vec<SlotBinding<L>>,
    detected: usize,
}

impl<L> BindingTable<L> {
    /// Bindings in catalog order (slot 0 first).
    pub fn iter(&self) -> impl Iterator<Item = &SlotBinding<L>> {
        self.bindings.iter()
    }

    #[must_use]
    pub fn layer_for(&self, material: Material) -> Option<&L> {
        self.bindings[usize::from(material.tag())].layer.as_ref()
    }

    /// Number of slots bound by name matching. Zero when the positional
    /// fallback was used or no layers were bound at all.
    #[must_use]
    pub fn detected_count(&self) -> usize {
        self.detected
    }

    #[must_use]
    pub fn bound_count(&self) -> usize {
        self.bindings
            .iter()
            .filter(|binding| binding.layer.is_some())
            .count()
    }

    /// Policy hook: fails with [`Error::InsufficientLayers`] unless at
    /// least `required` slots are bound. The merge itself tolerates zero
    /// bound slots and emits an all-sentinel image.
    pub fn require_bound(&self, required: usize) -> Result<(), Error> {
        let found = self.bound_count();
        if found < required {
            return Err(Error::InsufficientLayers { required, found });
        }
        Ok(())
    }
}

/// Resolves the canvas's layer stack against the material catalog.
///
/// Layers are scanned topmost first. A layer whose name case-insensitively
/// equals a catalog name binds that slot; later layers with the same name
/// are ignored. When no layer matches any catalog name at all, the topmost
/// `min(MATERIAL_COUNT, layer count)` layers are bound positionally to
/// slots `0..k` instead, for canvases authored before the naming convention
/// existed. Partial name matches are never supplemented positionally.
pub fn resolve_layers<H: Host>(host: &H, canvas: &H::Canvas) -> BindingTable<H::Layer> {
    let layers = host.list_layers(canvas);

    let mut bound: Vec<Option<H::Layer>> = vec![None; MATERIAL_COUNT];
    let mut detected = 0;
    for layer in &layers {
        let name = host.layer_name(layer);
        if let Some(material) = Material::from_name(&name) {
            let slot = &mut bound[usize::from(material.tag())];
            if slot.is_none() {
                *slot = Some(layer.clone());
                detected += 1;
            }
        }
    }

    if detected == 0 && !layers.is_empty() {
        log::warn!(
            "No layers named after material slots; binding the {} topmost layers positionally",
            layers.len().min(MATERIAL_COUNT)
        );
        for (slot, layer) in bound.iter_mut().zip(&layers) {
            *slot = Some(layer.clone());
        }
    }

    let bindings = Material::ALL
        .into_iter()
        .zip(bound)
        .map(|(material, layer)| SlotBinding { material, layer })
        .collect();
    BindingTable { bindings, detected }
}
