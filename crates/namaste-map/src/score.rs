//! Text similarity for display-to-display matching.
//!
//! The hybrid score is the maximum of two signals computed on lower-cased,
//! trimmed text:
//!
//! - **edit similarity**: normalized Levenshtein distance, favouring
//!   near-identical spellings and typos;
//! - **term overlap**: TF-IDF cosine over the two-document corpus `{a, b}`,
//!   favouring reordered multi-word phrases.
//!
//! Taking the maximum biases the matcher towards recall; the ranker and the
//! publish threshold decide what survives.

use std::collections::{BTreeMap, BTreeSet};

use rapidfuzz::distance::levenshtein;

/// Words carrying no signal for term overlap.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "in", "into", "is", "it",
    "of", "on", "or", "such", "that", "the", "their", "then", "there", "these", "they", "this",
    "to", "was", "will", "with",
];

/// Lower-case and trim.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// `1 - levenshtein(a, b) / max(len(a), len(b), 1)`, lengths in chars.
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    let distance = levenshtein::distance(a.chars(), b.chars());
    let longest = a.chars().count().max(b.chars().count()).max(1);
    1.0 - distance as f64 / longest as f64
}

/// TF-IDF cosine similarity treating `a` and `b` as a two-document corpus.
///
/// Returns 0 when either side has no indexable terms.
pub fn term_overlap_similarity(a: &str, b: &str) -> f64 {
    let docs = [term_counts(a), term_counts(b)];
    let terms: BTreeSet<&str> = docs
        .iter()
        .flat_map(|doc| doc.keys().map(String::as_str))
        .collect();

    let corpus_size = docs.len() as f64;
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for term in terms {
        let doc_freq = docs.iter().filter(|doc| doc.contains_key(term)).count() as f64;
        let idf = 1.0 + (corpus_size / (1.0 + doc_freq)).ln();
        let weight_a = docs[0].get(term).copied().unwrap_or(0) as f64 * idf;
        let weight_b = docs[1].get(term).copied().unwrap_or(0) as f64 * idf;
        dot += weight_a * weight_b;
        norm_a += weight_a * weight_a;
        norm_b += weight_b * weight_b;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}

/// `max(edit_similarity, term_overlap_similarity)`.
pub fn hybrid_similarity(a: &str, b: &str) -> f64 {
    edit_similarity(a, b).max(term_overlap_similarity(a, b))
}

fn term_counts(text: &str) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for token in normalize(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty() && !STOP_WORDS.contains(token))
    {
        *counts.entry(token.to_string()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn identical_text_ignores_case_and_padding() {
        assert_eq!(hybrid_similarity("Vata Dosha Imbalance", " vata dosha imbalance "), 1.0);
    }

    #[test]
    fn edit_similarity_counts_single_typo() {
        let sim = edit_similarity("jvara", "jwara");
        assert!((sim - 0.8).abs() < 1e-9, "got {sim}");
    }

    #[test]
    fn reordered_words_score_high_on_term_overlap() {
        let reordered = term_overlap_similarity("fever intermittent", "intermittent fever");
        assert!((reordered - 1.0).abs() < 1e-9, "got {reordered}");
        assert!(edit_similarity("fever intermittent", "intermittent fever") < 0.5);
        assert!(hybrid_similarity("fever intermittent", "intermittent fever") > 0.99);
    }

    #[test]
    fn stop_words_only_gives_zero_overlap() {
        assert_eq!(term_overlap_similarity("of the", "of the"), 0.0);
        assert_eq!(term_overlap_similarity("", "fever"), 0.0);
    }

    #[test]
    fn disjoint_terms_have_no_overlap() {
        assert_eq!(term_overlap_similarity("kapha", "pitta"), 0.0);
    }

    proptest! {
        #[test]
        fn hybrid_is_reflexive(a in "[A-Za-z][A-Za-z ]{0,30}") {
            prop_assert_eq!(hybrid_similarity(&a, &a), 1.0);
        }

        #[test]
        fn hybrid_is_symmetric(a in "[a-z ]{0,24}", b in "[a-z ]{0,24}") {
            prop_assert_eq!(hybrid_similarity(&a, &b), hybrid_similarity(&b, &a));
        }

        #[test]
        fn hybrid_stays_in_unit_range(a in "\\PC{0,20}", b in "\\PC{0,20}") {
            let score = hybrid_similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&score));
        }
    }
}
