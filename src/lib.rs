use js_sys::Array;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod image_palette;
pub mod matcher;
pub mod rank;
pub mod sampler;
pub mod source;

pub use config::Config;
pub use error::PaletteError;
pub use image_palette::{ImagePalette, PaletteExtractor};
pub use matcher::{PaletteMatcher, Swatch, WHITELIST};
pub use rank::RankedColor;
pub use sampler::{Classification, ClassificationMultiset};

// ------------------------------------------------------------
// Entry points
// ------------------------------------------------------------

/// Find the prominent colors of an encoded image.
///
/// Steps performed:
/// 1. Decode the bytes (PNG, JPEG, GIF or BMP, sniffed from the content).
/// 2. Visit every `precision`-th pixel in both axes and snap it to the nearest
///    whitelist color, skipping fully transparent pixels.
/// 3. Return up to `num_colors` hex strings, most frequent first.
#[wasm_bindgen]
pub fn prominent_colors(
    input: Vec<u8>,
    precision: u32,
    num_colors: usize,
) -> Result<Array, JsValue> {
    let config = Config::new(precision, num_colors)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let colors = ImagePalette::from_bytes(&input, config)
        .map_err(|e| JsValue::from_str(&e.to_string()))?
        .colors();

    let colors_js = Array::new();
    for hex in colors {
        colors_js.push(&JsValue::from_str(&hex));
    }
    Ok(colors_js)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn prominent_colors_bytes(input: &[u8], config: &Config) -> error::Result<Vec<String>> {
    Ok(ImagePalette::from_bytes(input, *config)?.colors())
}
