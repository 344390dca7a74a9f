//! Codec and compositing engine for Bioware's Packed Layer Texture (PLT)
//! format.
//!
//! A PLT file stores one `(intensity, material)` byte pair per pixel. In an
//! image editor the same data lives as a stack of named, per-material
//! layers. This crate converts between the two: [`codec`] handles the
//! on-disk stream, [`composite`] splits a decoded stream into per-material
//! masks and merges layers back into one, [`resolve`] binds host layers to
//! material slots, and [`file`] wires these together against the [`host`]
//! collaborator interface.

pub mod catalog;
pub mod clip;
pub mod codec;
pub mod composite;
pub mod error;
pub mod file;
pub mod host;
pub mod packed;
pub mod provision;
pub mod resolve;

pub use catalog::{MATERIAL_COUNT, Material};
pub use error::Error;
pub use packed::{PackedImage, PackedPixel, SENTINEL};
