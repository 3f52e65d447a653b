use super::WordToken;

/// Hand-curated groups of words that sound alike but are spelled differently.
/// The table is closed: membership in the same group is the only sound-alike
/// relation, nothing is learned or derived.
///
/// Normalization keeps internal apostrophes, so contractions appear in their
/// apostrophized form.
const SOUND_ALIKE_GROUPS: &[&[&str]] = &[
    &["they're", "their", "there"],
    &["your", "you're"],
    &["its", "it's"],
    &["to", "too", "two"],
    &["then", "than"],
    &["hear", "here"],
    &["where", "wear", "were"],
    &["know", "no"],
    &["right", "write"],
    &["our", "hour"],
    &["through", "threw"],
    &["by", "buy", "bye"],
    &["new", "knew"],
    &["one", "won"],
    &["for", "four"],
    &["would", "wood"],
    &["could", "could've"],
    &["should", "should've"],
    &["won't", "want"],
];

/// Whether two word tokens count as "the same word" for difference counting.
///
/// Equivalence is symmetric and used only to decide whether a position is
/// recorded as a difference; it never alters the text that is kept.
pub fn equivalent(a: &WordToken, b: &WordToken) -> bool {
    words_equivalent(&a.normalized, &b.normalized)
}

/// Equivalence over normalized word forms: exact match, bounded
/// plural/singular variation, or a shared sound-alike group.
pub fn words_equivalent(a: &str, b: &str) -> bool {
    a == b || is_plural_variant(a, b) || are_sound_alikes(a, b)
}

/// Whether one word is the other with a plural suffix added or removed.
/// Covers `-s`, `-es`, and the `-ies`/`-y` swap; deliberately not a stemmer.
pub fn is_plural_variant(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }

    let suffixed = |base: &str, full: &str| {
        full.len() > base.len()
            && full.starts_with(base)
            && matches!(&full[base.len()..], "s" | "es")
    };
    if suffixed(a, b) || suffixed(b, a) {
        return true;
    }

    // baby/babies: strip "ies" from one and "y" from the other
    let ies_variant = |x: &str, y: &str| {
        x.len() > 3
            && y.len() > 1
            && x.ends_with("ies")
            && y.ends_with('y')
            && x[..x.len() - 3] == y[..y.len() - 1]
    };
    ies_variant(a, b) || ies_variant(b, a)
}

/// Whether two words share a sound-alike group
pub fn are_sound_alikes(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    match (group_of(a), group_of(b)) {
        (Some(ga), Some(gb)) => ga == gb,
        _ => false,
    }
}

fn group_of(word: &str) -> Option<usize> {
    SOUND_ALIKE_GROUPS
        .iter()
        .position(|group| group.contains(&word))
}
