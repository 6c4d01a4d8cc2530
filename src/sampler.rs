use std::collections::HashMap;

use image::{GenericImageView, Rgba};
use tracing::{debug, instrument};

use crate::matcher::PaletteMatcher;

/// Alpha on the 7-bit scale: 0 is opaque, 127 is fully transparent.
const ALPHA7_TRANSPARENT: u8 = 127;

/// Map an 8-bit alpha (255 opaque) onto the 7-bit scale (127 transparent).
#[inline(always)]
fn alpha7(alpha: u8) -> u8 {
    ALPHA7_TRANSPARENT - (alpha >> 1)
}

/// Only a fully transparent pixel counts; partial transparency is opaque.
#[inline(always)]
pub fn is_transparent(pixel: Rgba<u8>) -> bool {
    alpha7(pixel[3]) == ALPHA7_TRANSPARENT
}

/// What a single sampled pixel was classified as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    Transparent,
    Color(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Tally {
    count: usize,
    first_seen: usize,
}

/// Occurrence counts per classification, remembering the order in which each
/// classification was first recorded.
#[derive(Clone, Debug, Default)]
pub struct ClassificationMultiset {
    tallies: HashMap<Classification, Tally>,
    total: usize,
}

impl ClassificationMultiset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, class: Classification) {
        let next = self.tallies.len();
        self.tallies
            .entry(class)
            .or_insert(Tally {
                count: 0,
                first_seen: next,
            })
            .count += 1;
        self.total += 1;
    }

    pub fn count(&self, class: Classification) -> usize {
        self.tallies.get(&class).map_or(0, |t| t.count)
    }

    /// Number of recorded samples, transparent ones included.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn transparent_count(&self) -> usize {
        self.count(Classification::Transparent)
    }

    /// Number of distinct classifications.
    pub fn len(&self) -> usize {
        self.tallies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }

    /// `(classification, count, first_seen)` in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Classification, usize, usize)> + '_ {
        self.tallies
            .iter()
            .map(|(&class, tally)| (class, tally.count, tally.first_seen))
    }
}

/// Visit every `precision`-th pixel in both axes (x-major) and classify it.
///
/// A zero-sized image yields an empty multiset; a stride larger than both
/// dimensions visits only `(0, 0)`.
#[instrument(skip(image, matcher), fields(width = image.width(), height = image.height()))]
pub fn sample<I>(image: &I, matcher: &PaletteMatcher, precision: u32) -> ClassificationMultiset
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    let (width, height) = image.dimensions();
    let step = precision.max(1) as usize;
    let mut multiset = ClassificationMultiset::new();

    for x in (0..width).step_by(step) {
        for y in (0..height).step_by(step) {
            let pixel = image.get_pixel(x, y);
            let class = if is_transparent(pixel) {
                Classification::Transparent
            } else {
                Classification::Color(matcher.nearest_color(pixel[0], pixel[1], pixel[2]))
            };
            multiset.record(class);
        }
    }

    debug!(
        samples = multiset.total(),
        transparent = multiset.transparent_count(),
        distinct = multiset.len(),
        "sampled image"
    );
    multiset
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const CLEAR: Rgba<u8> = Rgba([12, 200, 40, 0]);

    #[test]
    fn transparency_only_for_fully_clear_alpha() {
        assert!(is_transparent(Rgba([0, 0, 0, 0])));
        assert!(is_transparent(Rgba([255, 255, 255, 1])));
        assert!(!is_transparent(Rgba([0, 0, 0, 2])));
        assert!(!is_transparent(Rgba([0, 0, 0, 128])));
        assert!(!is_transparent(Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn multiset_counts_and_first_seen() {
        let mut set = ClassificationMultiset::new();
        set.record(Classification::Color("#ffffff"));
        set.record(Classification::Transparent);
        set.record(Classification::Color("#ffffff"));
        set.record(Classification::Color("#000000"));

        assert_eq!(set.total(), 4);
        assert_eq!(set.len(), 3);
        assert_eq!(set.count(Classification::Color("#ffffff")), 2);
        assert_eq!(set.transparent_count(), 1);
        assert_eq!(set.count(Classification::Color("#cc0000")), 0);

        let black = set
            .iter()
            .find(|(c, _, _)| *c == Classification::Color("#000000"))
            .unwrap();
        assert_eq!(black, (Classification::Color("#000000"), 1, 2));
    }

    #[test]
    fn empty_image_yields_empty_multiset() {
        let matcher = PaletteMatcher::default();
        let set = sample(&RgbaImage::new(0, 0), &matcher, 10);
        assert!(set.is_empty());
        assert_eq!(set.total(), 0);

        let set = sample(&RgbaImage::new(0, 25), &matcher, 10);
        assert!(set.is_empty());
    }

    #[test]
    fn stride_sample_grid() {
        let matcher = PaletteMatcher::default();
        let img = RgbaImage::from_pixel(25, 11, BLACK);
        // x in {0, 10, 20}, y in {0, 10}
        let set = sample(&img, &matcher, 10);
        assert_eq!(set.total(), 6);
        assert_eq!(set.count(Classification::Color("#000000")), 6);
    }

    #[test]
    fn oversized_stride_samples_origin_only() {
        let matcher = PaletteMatcher::default();
        let mut img = RgbaImage::from_pixel(8, 6, BLACK);
        img.put_pixel(0, 0, WHITE);
        let set = sample(&img, &matcher, 8);
        assert_eq!(set.total(), 1);
        assert_eq!(set.count(Classification::Color("#ffffff")), 1);

        let set = sample(&img, &matcher, 100);
        assert_eq!(set.total(), 1);
    }

    #[test]
    fn transparent_pixels_skip_matching() {
        let matcher = PaletteMatcher::default();
        let mut img = RgbaImage::from_pixel(2, 2, CLEAR);
        img.put_pixel(1, 1, WHITE);
        let set = sample(&img, &matcher, 1);
        assert_eq!(set.transparent_count(), 3);
        assert_eq!(set.count(Classification::Color("#ffffff")), 1);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn sweep_is_x_major() {
        let matcher = PaletteMatcher::default();
        // Column 0 ends in a clear pixel, column 1 turns white below the top row.
        let mut img = RgbaImage::from_pixel(2, 3, BLACK);
        img.put_pixel(1, 1, WHITE);
        img.put_pixel(1, 2, WHITE);
        img.put_pixel(0, 2, CLEAR);
        let set = sample(&img, &matcher, 1);
        let mut order: Vec<_> = set.iter().map(|(c, _, first)| (first, c)).collect();
        order.sort_by_key(|(first, _)| *first);
        assert_eq!(
            order,
            vec![
                (0, Classification::Color("#000000")),
                (1, Classification::Transparent),
                (2, Classification::Color("#ffffff")),
            ]
        );
    }
}
