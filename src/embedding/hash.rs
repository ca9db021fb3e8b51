//! Hash embeddings
//!
//! Feature hashing over word tokens, word bigrams and character trigrams. No
//! model weights; fully deterministic, so two sessions over the same corpus
//! always agree.
//!
//! Each feature is spread over a few slots picked by independent hashes.
//! Slot weights are never negated, so two vectors never score below zero and
//! texts with no features in common score close to zero. The last content
//! word of a term (its head, "lease" in "ground lease") weighs more than its
//! modifiers, and stopwords weigh little.

use rayon::prelude::*;
use unicode_normalization::UnicodeNormalization;

use super::Embedder;
use crate::error::Result;

const HEAD_WEIGHT: f32 = 2.0;
const MODIFIER_WEIGHT: f32 = 1.0;
const STOPWORD_WEIGHT: f32 = 0.25;
/// Trigram weight relative to the word it came from
const TRIGRAM_FACTOR: f32 = 0.3;
const BIGRAM_WEIGHT: f32 = 0.5;

const SLOTS_PER_FEATURE: u64 = 4;
const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "by", "for", "from", "in", "of", "on", "or", "the", "to", "with",
];

/// Feature used when the input has no tokens at all.
const EMPTY_INPUT_FEATURE: &str = "\u{2205}";

/// Hash embedder using FNV-1a feature hashing
pub struct HashEmbedder {
    /// Embedding dimension (default: 384)
    dim: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self { dim: 384 }
    }
}

impl HashEmbedder {
    /// Create embedder with specified dimension
    pub const fn new(dim: usize) -> Self {
        Self { dim }
    }

    /// Embed text into an L2-normalized vector.
    ///
    /// Input without any usable token still gets a fixed, non-zero vector so
    /// an empty query stays a valid (if uninformative) query.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        if self.dim == 0 {
            return Vec::new();
        }

        let tokens = tokenize(text);
        let mut embedding = vec![0.0; self.dim];

        if tokens.is_empty() {
            accumulate_embedding(&mut embedding, EMPTY_INPUT_FEATURE, MODIFIER_WEIGHT);
            l2_normalize(&mut embedding);
            return embedding;
        }

        let content: Vec<&str> = tokens
            .iter()
            .map(String::as_str)
            .filter(|token| !is_stopword(token))
            .collect();
        let head = tokens
            .iter()
            .rposition(|token| !is_stopword(token))
            .unwrap_or(tokens.len() - 1);

        for (position, token) in tokens.iter().enumerate() {
            let weight = if is_stopword(token) {
                STOPWORD_WEIGHT
            } else if position == head {
                HEAD_WEIGHT
            } else {
                MODIFIER_WEIGHT
            };
            accumulate_embedding(&mut embedding, token, weight);
            for trigram in char_trigrams(token) {
                accumulate_embedding(&mut embedding, &trigram, weight * TRIGRAM_FACTOR);
            }
        }

        for window in content.windows(2) {
            let bigram = format!("{} {}", window[0], window[1]);
            accumulate_embedding(&mut embedding, &bigram, BIGRAM_WEIGHT);
        }

        l2_normalize(&mut embedding);
        embedding
    }
}

impl Embedder for HashEmbedder {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.par_iter().map(|text| self.embed(text)).collect())
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed(text))
    }

    fn dims(&self) -> usize {
        self.dim
    }

    fn name(&self) -> &str {
        "hash"
    }
}

fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text.nfkc().collect::<String>().to_lowercase();
    normalized
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|token| token.chars().count() >= 2)
        .map(fold_plural)
        .collect()
}

/// `leases` -> `lease`, `parties` -> `party`; `business`, `status` and
/// `basis` are left alone.
fn fold_plural(token: &str) -> String {
    if token.chars().count() <= 3 {
        return token.to_string();
    }
    if let Some(stem) = token.strip_suffix("ies") {
        return format!("{stem}y");
    }
    if token.ends_with('s') && !["ss", "us", "is"].iter().any(|end| token.ends_with(end)) {
        return token[..token.len() - 1].to_string();
    }
    token.to_string()
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Boundary-marked character trigrams, e.g. `lease` -> `<le lea eas ase se>`.
fn char_trigrams(token: &str) -> Vec<String> {
    let chars: Vec<char> = std::iter::once('<')
        .chain(token.chars())
        .chain(std::iter::once('>'))
        .collect();
    chars
        .windows(3)
        .map(|window| format!("#{}", window.iter().collect::<String>()))
        .collect()
}

fn accumulate_embedding(embedding: &mut [f32], feature: &str, weight: f32) {
    let base = fnv1a_hash(feature.as_bytes());
    let len = embedding.len() as u64;
    #[allow(clippy::cast_precision_loss)]
    let share = weight / (SLOTS_PER_FEATURE as f32).sqrt();

    for slot in 1..=SLOTS_PER_FEATURE {
        let hash = mix64(base ^ slot.wrapping_mul(GOLDEN_GAMMA));
        let index = usize::try_from(hash % len).unwrap_or(0);
        embedding[index] += share;
    }
}

/// SplitMix64 finalizer; spreads every input bit over the whole output.
const fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

fn fnv1a_hash(data: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    let mut hash = FNV_OFFSET;
    for byte in data {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn l2_normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vec.iter_mut() {
            *value /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::cosine_similarity;

    fn norm(v: &[f32]) -> f32 {
        v.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    #[test]
    fn test_fnv1a_hash_known_value() {
        assert_eq!(fnv1a_hash(b"hello"), 0xa430_d846_80aa_bd0b);
    }

    #[test]
    fn test_embedding_dimensions() {
        let embedder = HashEmbedder::new(64);
        assert_eq!(embedder.embed("ground lease agreement").len(), 64);
    }

    #[test]
    fn test_embedding_normalized() {
        let embedder = HashEmbedder::new(128);
        let embedding = embedder.embed("tenant obligations under the lease");
        assert!((norm(&embedding) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_empty_input_embeds_to_fixed_nonzero_vector() {
        let embedder = HashEmbedder::new(32);
        let empty = embedder.embed("");
        // 1-char tokens are dropped by the tokenizer
        let only_short = embedder.embed("a b c d");
        assert!((norm(&empty) - 1.0).abs() < 1e-3);
        assert_eq!(empty, only_short);
    }

    #[test]
    fn test_identical_text_is_maximally_similar() {
        let embedder = HashEmbedder::new(384);
        let a = embedder.embed("ground lease");
        let b = embedder.embed("Ground  Lease");
        assert!(cosine_similarity(&a, &b).unwrap() > 0.999);
    }

    #[test]
    fn test_similarity_prefers_related_text() {
        let embedder = HashEmbedder::new(384);
        let query = embedder.embed("ground lease");
        let related = embedder.embed("site lease");
        let unrelated = embedder.embed("employee handbook");

        let sim_related = cosine_similarity(&query, &related).unwrap();
        let sim_unrelated = cosine_similarity(&query, &unrelated).unwrap();
        assert!(sim_related > sim_unrelated);
    }

    #[test]
    fn test_trigrams_link_inflections() {
        let embedder = HashEmbedder::new(384);
        let singular = embedder.embed("agreement");
        let plural = embedder.embed("agreements");
        let unrelated = embedder.embed("handbook");
        assert!(
            cosine_similarity(&singular, &plural).unwrap()
                > cosine_similarity(&singular, &unrelated).unwrap()
        );
    }

    #[test]
    fn test_unrelated_words_are_near_orthogonal() {
        let embedder = HashEmbedder::new(384);
        let words = [
            "apple", "truck", "zebra", "violin", "mountain", "coffee", "pencil", "guitar",
            "ocean", "rabbit", "window", "candle",
        ];
        let vectors: Vec<_> = words.iter().map(|w| embedder.embed(w)).collect();

        let mut worst = 0.0f32;
        for (i, a) in vectors.iter().enumerate() {
            for b in &vectors[i + 1..] {
                worst = worst.max(cosine_similarity(a, b).unwrap().abs());
            }
        }
        assert!(worst < 0.3, "unrelated words scored {worst}");

        let related = cosine_similarity(&embedder.embed("ground lease"), &embedder.embed("site lease"))
            .unwrap();
        assert!(related > 0.7, "related pair scored {related}");
        assert!(related > worst * 2.0);
    }

    #[test]
    fn test_similarity_is_never_negative() {
        let embedder = HashEmbedder::new(64);
        let texts = ["ground lease", "employee handbook", "royalty revenue", "", "zz qq"];
        for a in &texts {
            for b in &texts {
                let sim = cosine_similarity(&embedder.embed(a), &embedder.embed(b)).unwrap();
                assert!(sim >= 0.0, "{a:?} vs {b:?} scored {sim}");
            }
        }
    }

    #[test]
    fn test_head_word_outweighs_modifier() {
        let embedder = HashEmbedder::new(384);
        let query = embedder.embed("ground lease");
        let same_head = cosine_similarity(&query, &embedder.embed("site lease")).unwrap();
        let same_modifier = cosine_similarity(&query, &embedder.embed("ground rent")).unwrap();
        assert!(same_head > same_modifier);
    }

    #[test]
    fn test_plurals_fold_to_singular() {
        let embedder = HashEmbedder::new(128);
        assert_eq!(embedder.embed("ground leases"), embedder.embed("ground lease"));
        assert_eq!(embedder.embed("parties"), embedder.embed("party"));
        assert_eq!(fold_plural("business"), "business");
        assert_eq!(fold_plural("status"), "status");
        assert_eq!(fold_plural("gas"), "gas");
    }

    #[test]
    fn test_stopwords_carry_little_weight() {
        let embedder = HashEmbedder::new(384);
        let with = embedder.embed("memorandum of lease");
        let without = embedder.embed("memorandum lease");
        assert!(cosine_similarity(&with, &without).unwrap() > 0.95);
    }

    #[test]
    fn test_slots_spread_over_dimensions() {
        let mut slots = std::collections::HashSet::new();
        let base = fnv1a_hash(b"lease");
        for slot in 1..=SLOTS_PER_FEATURE {
            slots.insert(mix64(base ^ slot.wrapping_mul(GOLDEN_GAMMA)) % 384);
        }
        assert!(slots.len() > 1);
    }

    #[test]
    fn test_nfkc_folds_compatibility_forms() {
        let embedder = HashEmbedder::new(64);
        // Fullwidth letters normalize to ASCII
        assert_eq!(embedder.embed("ｌｅａｓｅ"), embedder.embed("lease"));
    }

    #[test]
    fn test_batch_preserves_input_order() {
        let embedder = HashEmbedder::new(64);
        let texts = vec![
            "ground lease".to_string(),
            "site agreement".to_string(),
            "lease liability".to_string(),
        ];
        let batch = embedder.embed_batch(&texts).unwrap();
        assert_eq!(batch.len(), 3);
        for (row, text) in batch.iter().zip(&texts) {
            assert_eq!(row, &embedder.embed(text));
        }
    }

    #[test]
    fn test_embedding_normalized_random_inputs() {
        let embedder = HashEmbedder::new(64);
        let mut seed = 0x1234_5678_9abc_def0u64;

        for _ in 0..20 {
            let text = random_text(&mut seed, 6);
            let embedding = embedder.embed(&text);
            assert!((norm(&embedding) - 1.0).abs() < 1e-3);
        }
    }

    fn random_text(seed: &mut u64, words: usize) -> String {
        let mut out = String::new();
        for i in 0..words {
            if i > 0 {
                out.push(' ');
            }
            let len = 3 + (next_u32(seed) % 6) as usize;
            for _ in 0..len {
                out.push(char::from(b'a' + (next_u32(seed) % 26) as u8));
            }
        }
        out
    }

    fn next_u32(seed: &mut u64) -> u32 {
        *seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        (*seed >> 32) as u32
    }
}
