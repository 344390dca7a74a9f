use std::io;

use crate::host::ColorMode;

/// Errors produced by the PLT codec and compositing operations.
///
/// All errors are terminal for the call that produced them; no partially
/// decoded image or partially populated canvas survives a failure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not a PLT file: expected magic \"PLT V1  \", got {found:?}")]
    BadMagic { found: [u8; 8] },

    #[error("File truncated: needed {needed} bytes, but only {available} available")]
    Truncated { needed: u64, available: u64 },

    #[error(
        "Pixel data length mismatch: {width}x{height} needs {expected} bytes, got {actual}"
    )]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: u64,
        actual: u64,
    },

    #[error("Unsupported canvas color mode: {0:?}")]
    UnsupportedColorMode(ColorMode),

    #[error("Found {found} material layers, but at least {required} are required")]
    InsufficientLayers { required: usize, found: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}
