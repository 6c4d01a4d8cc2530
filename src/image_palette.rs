use std::borrow::Cow;
use std::path::Path;

use image::{GenericImageView, Rgba};
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::Result;
use crate::matcher::PaletteMatcher;
use crate::rank::{RankedColor, rank};
use crate::sampler::{ClassificationMultiset, sample};
use crate::source::Codecs;

/// Reusable extraction context: the palette, the decoders and the sampling
/// parameters. Build it once and feed it as many images as needed.
#[derive(Clone, Debug)]
pub struct PaletteExtractor {
    matcher: Cow<'static, PaletteMatcher>,
    codecs: Codecs,
    config: Config,
}

impl PaletteExtractor {
    /// Validates `config` and probes the image decoders before any input is read.
    pub fn new(config: Config) -> Result<Self> {
        Self::build(config, Cow::Borrowed(PaletteMatcher::standard()))
    }

    pub fn with_matcher(config: Config, matcher: PaletteMatcher) -> Result<Self> {
        Self::build(config, Cow::Owned(matcher))
    }

    fn build(config: Config, matcher: Cow<'static, PaletteMatcher>) -> Result<Self> {
        config.validate()?;
        let codecs = Codecs::detect()?;
        Ok(Self {
            matcher,
            codecs,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn matcher(&self) -> &PaletteMatcher {
        &self.matcher
    }

    /// Decode a local path, or a `file://`/`http(s)://` URI, and sample it.
    pub fn extract_path<P: AsRef<Path>>(&self, path: P) -> Result<ImagePalette> {
        let img = self.codecs.decode_source(path.as_ref())?;
        Ok(self.extract_image(&img))
    }

    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<ImagePalette> {
        let img = self.codecs.decode_bytes(bytes)?;
        Ok(self.extract_image(&img))
    }

    /// Sample an already decoded image.
    pub fn extract_image<I>(&self, image: &I) -> ImagePalette
    where
        I: GenericImageView<Pixel = Rgba<u8>>,
    {
        ImagePalette {
            multiset: sample(image, &self.matcher, self.config.precision),
            num_colors: self.config.num_colors,
        }
    }
}

/// The classified samples of one image and the ranked colors derived from them.
#[derive(Clone, Debug)]
pub struct ImagePalette {
    multiset: ClassificationMultiset,
    num_colors: usize,
}

impl ImagePalette {
    /// Decode `path` (a local path or a URI) and sample it with the built-in palette.
    pub fn open<P: AsRef<Path>>(path: P, config: Config) -> Result<Self> {
        PaletteExtractor::new(config)?.extract_path(path)
    }

    pub fn from_bytes(bytes: &[u8], config: Config) -> Result<Self> {
        PaletteExtractor::new(config)?.extract_bytes(bytes)
    }

    pub fn from_image<I>(image: &I, config: Config) -> Result<Self>
    where
        I: GenericImageView<Pixel = Rgba<u8>>,
    {
        Ok(PaletteExtractor::new(config)?.extract_image(image))
    }

    /// Prominent colors as hex strings, most frequent first.
    pub fn colors(&self) -> Vec<String> {
        self.ranked().into_iter().map(|c| c.hex.to_string()).collect()
    }

    #[instrument(skip(self), fields(samples = self.multiset.total()))]
    pub fn ranked(&self) -> Vec<RankedColor> {
        let ranked = rank(&self.multiset, self.num_colors);
        debug!(returned = ranked.len(), "ranked colors");
        ranked
    }

    pub fn multiset(&self) -> &ClassificationMultiset {
        &self.multiset
    }

    pub fn sample_count(&self) -> usize {
        self.multiset.total()
    }
}
