//! Typed failure reasons for skin loading, validation and registration.

use std::path::PathBuf;

use thiserror::Error;

/// Why a skin could not be loaded, validated or registered.
///
/// None of these are fatal to the hosting process. Validation and decode
/// failures go back to the immediate caller, which decides whether to surface
/// them to the user; I/O and settings failures are logged and degrade to
/// defaults or a skipped operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkinError {
    /// The raw bytes were not a decodable PNG image.
    #[error("image data could not be decoded: {0}")]
    DecodeFailed(String),

    /// Width or height is zero.
    #[error("invalid skin dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Width or height is not a power of two.
    #[error("skin dimensions {width}x{height} are not powers of two")]
    NotPowerOfTwo { width: u32, height: u32 },

    /// Width or height exceeds the configured maximum.
    #[error("skin dimensions {width}x{height} exceed the maximum size {max}")]
    TooLarge { width: u32, height: u32, max: u32 },

    /// Width divided by height is outside `0.5..=2.0`.
    #[error("skin aspect ratio for {width}x{height} is outside 0.5..=2.0")]
    BadAspectRatio { width: u32, height: u32 },

    /// The raw file is over the hard cap, so it was not even decoded.
    #[error("file is {size} bytes, over the {max} byte limit")]
    FileTooLarge { size: u64, max: u64 },

    /// The raw file contains no bytes at all.
    #[error("file is empty")]
    FileEmpty,

    /// The file vanished, or never existed.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The settings file exists but could not be parsed.
    #[error("settings file could not be parsed: {0}")]
    SettingsCorrupt(String),

    /// The render backend is not ready to register textures yet.
    #[error("render sink is not ready to register textures")]
    SinkUnavailable,
}
