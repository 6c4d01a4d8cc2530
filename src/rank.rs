use crate::sampler::{Classification, ClassificationMultiset};

/// A palette color and how many samples snapped to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankedColor {
    pub hex: &'static str,
    pub count: usize,
}

/// Most frequent colors first, at most `k` of them. Transparent samples are never
/// reported. Equal counts keep the order in which the colors were first sampled.
pub fn rank(multiset: &ClassificationMultiset, k: usize) -> Vec<RankedColor> {
    let mut entries: Vec<(&'static str, usize, usize)> = multiset
        .iter()
        .filter_map(|(class, count, first_seen)| match class {
            Classification::Transparent => None,
            Classification::Color(hex) => Some((hex, count, first_seen)),
        })
        .collect();

    entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    entries
        .into_iter()
        .take(k)
        .map(|(hex, count, _)| RankedColor { hex, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multiset(classes: &[Classification]) -> ClassificationMultiset {
        let mut set = ClassificationMultiset::new();
        for &class in classes {
            set.record(class);
        }
        set
    }

    fn hexes(ranked: &[RankedColor]) -> Vec<&'static str> {
        ranked.iter().map(|c| c.hex).collect()
    }

    const RED: Classification = Classification::Color("#cc0000");
    const BLUE: Classification = Classification::Color("#333399");
    const GREEN: Classification = Classification::Color("#669900");
    const CLEAR: Classification = Classification::Transparent;

    #[test]
    fn sorts_by_count_descending() {
        let set = multiset(&[RED, BLUE, BLUE, GREEN, BLUE, GREEN]);
        let ranked = rank(&set, 5);
        assert_eq!(hexes(&ranked), vec!["#333399", "#669900", "#cc0000"]);
        assert_eq!(ranked[0].count, 3);
        assert_eq!(ranked[2].count, 1);
    }

    #[test]
    fn transparency_is_never_reported() {
        let set = multiset(&[CLEAR, CLEAR, CLEAR, RED]);
        assert_eq!(hexes(&rank(&set, 5)), vec!["#cc0000"]);

        let set = multiset(&[CLEAR, CLEAR]);
        assert!(rank(&set, 5).is_empty());
    }

    #[test]
    fn truncates_to_k() {
        let set = multiset(&[RED, BLUE, BLUE, GREEN, GREEN, GREEN]);
        assert_eq!(hexes(&rank(&set, 2)), vec!["#669900", "#333399"]);
        assert_eq!(rank(&set, 1).len(), 1);
        assert!(rank(&set, 0).is_empty());
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let set = multiset(&[GREEN, CLEAR, RED, BLUE, RED, GREEN, BLUE]);
        assert_eq!(
            hexes(&rank(&set, 5)),
            vec!["#669900", "#cc0000", "#333399"]
        );
    }

    #[test]
    fn empty_multiset_ranks_empty() {
        assert!(rank(&ClassificationMultiset::new(), 5).is_empty());
    }
}
