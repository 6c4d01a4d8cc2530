use std::sync::LazyLock;

use palette::Srgb;
use tracing::trace;

use crate::error::{PaletteError, Result};

/// Reference colors every sampled pixel is snapped to. Order matters: on equal
/// distance the earlier entry wins.
pub const WHITELIST: [&str; 33] = [
    "#660000", "#990000", "#cc0000", "#cc3333", "#ea4c88", "#993399",
    "#663399", "#333399", "#0066cc", "#0099cc", "#66cccc", "#77cc33",
    "#669900", "#336600", "#666600", "#999900", "#cccc33", "#ffff00",
    "#ffcc33", "#ff9900", "#ff6600", "#cc6633", "#996633", "#663300",
    "#000000", "#999999", "#cccccc", "#ffffff", "#E7D8B1", "#FDADC7",
    "#424153", "#ABBCDA", "#F5DD01",
];

/// A palette entry: the hex literal it was declared with plus its decoded RGB.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Swatch {
    pub hex: &'static str,
    pub rgb: Srgb<u8>,
}

impl Swatch {
    pub fn parse(hex: &'static str) -> Result<Self> {
        Ok(Self {
            hex,
            rgb: parse_hex(hex)?,
        })
    }

    /// Squared Euclidean distance in RGB space. Ordering is identical to the
    /// plain Euclidean distance, so the square root is skipped.
    #[inline(always)]
    pub fn distance_sq(&self, r: u8, g: u8, b: u8) -> u32 {
        let dr = i32::from(r) - i32::from(self.rgb.red);
        let dg = i32::from(g) - i32::from(self.rgb.green);
        let db = i32::from(b) - i32::from(self.rgb.blue);
        (dr * dr + dg * dg + db * db) as u32
    }
}

/// Parse `#rgb` or `#rrggbb` (the `#` is optional). Shorthand digits are doubled.
pub fn parse_hex(hex: &str) -> Result<Srgb<u8>> {
    let digits = hex.trim_start_matches('#');
    if !digits.is_ascii() || (digits.len() != 3 && digits.len() != 6) {
        return Err(PaletteError::InvalidHex(hex.to_string()));
    }
    digits
        .parse::<Srgb<u8>>()
        .map_err(|_| PaletteError::InvalidHex(hex.to_string()))
}

/// Immutable nearest-color lookup over a fixed set of swatches.
///
/// Holds no per-run state, so a single matcher can be shared by reference across
/// any number of sampling runs.
#[derive(Clone, Debug)]
pub struct PaletteMatcher {
    swatches: Vec<Swatch>,
}

impl PaletteMatcher {
    /// Build a matcher from hex literals, decoding each one up front.
    pub fn new(hexes: &[&'static str]) -> Result<Self> {
        if hexes.is_empty() {
            return Err(PaletteError::InvalidConfig(
                "palette must contain at least one color".to_string(),
            ));
        }
        let swatches = hexes
            .iter()
            .map(|&hex| Swatch::parse(hex))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { swatches })
    }

    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    /// Hex of the swatch closest to `(r, g, b)`. Ties go to the first swatch in
    /// declaration order.
    pub fn nearest_color(&self, r: u8, g: u8, b: u8) -> &'static str {
        let mut best_idx = 0usize;
        let mut best_dist = u32::MAX;
        for (idx, swatch) in self.swatches.iter().enumerate() {
            let dist = swatch.distance_sq(r, g, b);
            if dist < best_dist {
                best_dist = dist;
                best_idx = idx;
                if dist == 0 {
                    break;
                }
            }
        }
        let hex = self.swatches[best_idx].hex;
        trace!(r, g, b, hex, "matched pixel to palette");
        hex
    }
}

static STANDARD: LazyLock<PaletteMatcher> = LazyLock::new(|| {
    PaletteMatcher::new(&WHITELIST).expect("built-in whitelist contains only valid hex colors")
});

impl PaletteMatcher {
    /// The whitelist matcher, decoded once per process.
    pub fn standard() -> &'static PaletteMatcher {
        &STANDARD
    }
}

impl Default for PaletteMatcher {
    fn default() -> Self {
        Self::standard().clone()
    }
}
