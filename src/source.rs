use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::{debug, instrument};
#[cfg(not(target_arch = "wasm32"))]
use url::{Host, Url};

use crate::error::{PaletteError, Result};

/// Raster formats accepted as input.
pub const SUPPORTED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::Bmp,
];

/// The set of supported formats this build can actually decode.
#[derive(Clone, Debug)]
pub struct Codecs {
    enabled: Vec<ImageFormat>,
}

impl Codecs {
    /// Probe the linked `image` build. Fails when none of the supported formats
    /// has a decoder, so callers learn about it before touching any file.
    pub fn detect() -> Result<Self> {
        Self::from_candidates(&SUPPORTED_FORMATS)
    }

    /// Keep the candidates whose decoder is compiled in.
    pub fn from_candidates(candidates: &[ImageFormat]) -> Result<Self> {
        let enabled: Vec<ImageFormat> = candidates
            .iter()
            .copied()
            .filter(ImageFormat::reading_enabled)
            .collect();

        if enabled.is_empty() {
            return Err(PaletteError::MissingCapability {
                format: format!("any of {candidates:?}"),
            });
        }

        debug!(?enabled, "image decoders available");
        Ok(Self { enabled })
    }

    pub fn enabled(&self) -> &[ImageFormat] {
        &self.enabled
    }

    fn require(&self, format: ImageFormat, input: &str) -> Result<()> {
        if !SUPPORTED_FORMATS.contains(&format) {
            return Err(PaletteError::UnsupportedFormat {
                input: input.to_string(),
                reason: format!("{format:?} images are not supported"),
            });
        }
        if !self.enabled.contains(&format) {
            return Err(PaletteError::MissingCapability {
                format: format!("{format:?}"),
            });
        }
        Ok(())
    }

    fn format_for_extension(&self, ext: Option<&OsStr>, input: &str) -> Result<ImageFormat> {
        let ext = ext.ok_or_else(|| PaletteError::UnsupportedFormat {
            input: input.to_string(),
            reason: "missing file extension".to_string(),
        })?;
        let format =
            ImageFormat::from_extension(ext).ok_or_else(|| PaletteError::UnsupportedFormat {
                input: input.to_string(),
                reason: format!("the file type .{} is not supported", ext.to_string_lossy()),
            })?;
        self.require(format, input)?;
        Ok(format)
    }

    /// Pick the decoder from the file extension (case-insensitive).
    pub fn format_for_path(&self, path: &Path) -> Result<ImageFormat> {
        self.format_for_extension(path.extension(), &path.display().to_string())
    }

    /// Decode a filesystem path, or a URI when `source` parses as one.
    pub fn decode_source(&self, source: &Path) -> Result<DynamicImage> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Some(uri) = source.to_str().and_then(parse_uri) {
                return self.decode_uri(&uri);
            }
        }
        self.decode_path(source)
    }

    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn decode_path(&self, path: &Path) -> Result<DynamicImage> {
        let format = self.format_for_path(path)?;
        let reader = BufReader::new(File::open(path)?);
        let img = ImageReader::with_format(reader, format).decode()?;
        debug!(?format, width = img.width(), height = img.height(), "decoded file");
        Ok(img)
    }

    /// Decode a `file://` or `http(s)://` image. Remote formats are picked from
    /// the extension of the URL path, like local files.
    #[cfg(not(target_arch = "wasm32"))]
    #[instrument(skip(self, uri), fields(uri = %uri))]
    pub fn decode_uri(&self, uri: &Url) -> Result<DynamicImage> {
        match uri.scheme() {
            "file" => {
                let path = uri
                    .to_file_path()
                    .map_err(|()| PaletteError::UnsupportedSource {
                        input: uri.to_string(),
                        reason: "not a local file path".to_string(),
                    })?;
                self.decode_path(&path)
            }
            "http" | "https" => {
                let format =
                    self.format_for_extension(Path::new(uri.path()).extension(), uri.as_str())?;

                let mut builder = reqwest::blocking::Client::builder();
                // Loopback hosts bypass any configured proxy.
                if is_loopback(uri) {
                    builder = builder.no_proxy();
                }
                let bytes = builder
                    .build()?
                    .get(uri.clone())
                    .send()?
                    .error_for_status()?
                    .bytes()?;

                let img = ImageReader::with_format(Cursor::new(&bytes[..]), format).decode()?;
                debug!(
                    ?format,
                    len = bytes.len(),
                    width = img.width(),
                    height = img.height(),
                    "decoded remote image"
                );
                Ok(img)
            }
            other => Err(PaletteError::UnsupportedSource {
                input: uri.to_string(),
                reason: format!("the {other}:// scheme is not supported"),
            }),
        }
    }

    /// Decode an in-memory image, sniffing the format from its magic bytes.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<DynamicImage> {
        let format = image::guess_format(bytes).map_err(|e| PaletteError::UnsupportedFormat {
            input: "<memory>".to_string(),
            reason: e.to_string(),
        })?;
        self.require(format, "<memory>")?;
        let img = ImageReader::with_format(Cursor::new(bytes), format).decode()?;
        debug!(?format, width = img.width(), height = img.height(), "decoded buffer");
        Ok(img)
    }
}

/// Treat `source` as a URI when it carries a scheme. Single-letter schemes are
/// Windows drive letters, not URIs.
#[cfg(not(target_arch = "wasm32"))]
pub fn parse_uri(source: &str) -> Option<Url> {
    Url::parse(source).ok().filter(|url| url.scheme().len() > 1)
}

#[cfg(not(target_arch = "wasm32"))]
fn is_loopback(uri: &Url) -> bool {
    match uri.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}
