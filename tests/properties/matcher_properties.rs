use std::sync::Arc;

use proptest::prelude::*;

use termalign::config::MatcherConfig;
use termalign::embedding::{Embedder, HashEmbedder};
use termalign::index::cosine_similarity;
use termalign::matcher::{DomainFilter, SemanticMatcher};
use termalign::terms::{Corpus, Term};

const DOMAINS: [&str; 3] = ["Legal", "Restaurant Development", "Finance"];

fn term_text() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{2,8}", 1..4).prop_map(|words| words.join(" "))
}

fn corpus_strategy() -> impl Strategy<Value = Corpus> {
    prop::collection::vec((term_text(), 0..DOMAINS.len()), 1..24).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(text, domain)| Term::new(text, DOMAINS[domain]))
            .collect()
    })
}

fn matcher_for(corpus: Corpus) -> SemanticMatcher {
    let embedder: Arc<dyn Embedder> = Arc::new(HashEmbedder::new(128));
    let matcher = SemanticMatcher::new(embedder, MatcherConfig::default());
    matcher.load_corpus(corpus).unwrap();
    matcher
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn results_are_bounded_sorted_and_thresholded(
        corpus in corpus_strategy(),
        query in term_text(),
        top_k in 0usize..30,
        min_similarity in 0.0f32..=1.0,
    ) {
        let matcher = matcher_for(corpus);
        let results = matcher.search(&query, &DomainFilter::All, top_k, min_similarity).unwrap();

        prop_assert!(results.len() <= top_k);
        for pair in results.windows(2) {
            prop_assert!(pair[0].similarity >= pair[1].similarity);
            if pair[0].similarity == pair[1].similarity {
                prop_assert!(pair[0].position < pair[1].position);
            }
        }
        for result in &results {
            prop_assert!(result.similarity >= min_similarity);
            prop_assert!(result.similarity <= 1.0);
        }
    }

    #[test]
    fn domain_filter_only_returns_that_domain(
        corpus in corpus_strategy(),
        query in term_text(),
        domain in 0..DOMAINS.len(),
    ) {
        let matcher = matcher_for(corpus);
        let filter = DomainFilter::domain(DOMAINS[domain]);
        let results = matcher.search(&query, &filter, 50, 0.0).unwrap();
        prop_assert!(results.iter().all(|r| r.domain() == DOMAINS[domain]));
    }

    #[test]
    fn repeated_searches_are_identical(corpus in corpus_strategy(), query in term_text()) {
        let matcher = matcher_for(corpus);
        let first = matcher.search(&query, &DomainFilter::All, 10, 0.0).unwrap();
        let second = matcher.search(&query, &DomainFilter::All, 10, 0.0).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn every_term_finds_itself(corpus in corpus_strategy()) {
        let matcher = matcher_for(corpus.clone());
        for (position, term) in corpus.iter().enumerate() {
            let results = matcher
                .search(&term.text, &DomainFilter::All, corpus.len(), 0.0)
                .unwrap();
            prop_assert!(results[0].similarity > 0.99);
            // Texts that differ only by plural endings embed identically
            let own = results.iter().find(|r| r.position == position);
            prop_assert!(own.is_some_and(|r| r.similarity > 0.99));
        }
    }

    #[test]
    fn results_align_with_corpus_positions(corpus in corpus_strategy(), query in term_text()) {
        let matcher = matcher_for(corpus.clone());
        for result in matcher.search(&query, &DomainFilter::All, 50, 0.0).unwrap() {
            prop_assert_eq!(corpus.get(result.position), Some(&result.term));
        }
    }

    #[test]
    fn cross_domain_never_returns_source_domain(
        corpus in corpus_strategy(),
        query in term_text(),
        domain in 0..DOMAINS.len(),
    ) {
        let matcher = matcher_for(corpus);
        let grouped = matcher.cross_domain_matches(&query, DOMAINS[domain], 0.0).unwrap();
        prop_assert!(!grouped.contains_key(DOMAINS[domain]));
        for (group, matches) in &grouped {
            prop_assert!(!matches.is_empty());
            prop_assert!(matches.iter().all(|r| r.domain() == group));
        }
    }

    #[test]
    fn cosine_is_symmetric_and_non_negative(a in term_text(), b in term_text()) {
        let embedder = HashEmbedder::new(128);
        let (va, vb) = (embedder.embed(&a), embedder.embed(&b));
        let ab = cosine_similarity(&va, &vb).unwrap();
        let ba = cosine_similarity(&vb, &va).unwrap();
        prop_assert!((ab - ba).abs() < 1e-6);
        prop_assert!((0.0..=1.0).contains(&ab));
    }
}
