use crate::error::{PaletteError, Result};

pub const DEFAULT_PRECISION: u32 = 10;
pub const DEFAULT_NUM_COLORS: usize = 5;

/// Sampling parameters, fixed for the lifetime of one extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Stride in both axes: every `precision`-th pixel is sampled.
    pub precision: u32,
    /// Maximum number of colors returned.
    pub num_colors: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            num_colors: DEFAULT_NUM_COLORS,
        }
    }
}

impl Config {
    pub fn new(precision: u32, num_colors: usize) -> Result<Self> {
        let config = Self {
            precision,
            num_colors,
        };
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    #[must_use]
    pub fn with_num_colors(mut self, num_colors: usize) -> Self {
        self.num_colors = num_colors;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.precision == 0 {
            return Err(PaletteError::InvalidConfig(
                "precision must be a positive integer".to_string(),
            ));
        }
        if self.num_colors == 0 {
            return Err(PaletteError::InvalidConfig(
                "num_colors must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.precision, 10);
        assert_eq!(config.num_colors, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_values_are_rejected() {
        assert!(matches!(
            Config::new(0, 5),
            Err(PaletteError::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::new(10, 0),
            Err(PaletteError::InvalidConfig(_))
        ));
        assert!(Config::default().with_precision(0).validate().is_err());
    }

    #[test]
    fn builder_overrides_fields() {
        let config = Config::default().with_precision(3).with_num_colors(8);
        assert_eq!(config, Config::new(3, 8).unwrap());
    }
}
