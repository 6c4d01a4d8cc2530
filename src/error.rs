use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaletteError {
    #[error("Unsupported image format for {input}: {reason}")]
    UnsupportedFormat { input: String, reason: String },

    #[error("No decoder available for {format}; rebuild `image` with that codec enabled")]
    MissingCapability { format: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid hex color: {0}")]
    InvalidHex(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Unsupported image source {input}: {reason}")]
    UnsupportedSource { input: String, reason: String },

    #[cfg(not(target_arch = "wasm32"))]
    #[error("Failed to fetch image: {0}")]
    Fetch(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, PaletteError>;
