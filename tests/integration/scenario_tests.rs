//! The ground-lease scenarios end to end through the public API.

use std::sync::Arc;

use termalign::AlignError;
use termalign::config::MatcherConfig;
use termalign::matcher::{CanonicalMapping, DomainFilter, SemanticMatcher};
use termalign::terms::TermSource;
use termalign::test_utils::embedders::FixtureEmbedder;
use termalign::test_utils::fixtures::{GROUND_LEASE, lease_corpus};

use crate::fixture::{TermDir, hash_matcher};

fn fixture_session() -> SemanticMatcher {
    let matcher = SemanticMatcher::new(
        Arc::new(FixtureEmbedder::lease_fixture()),
        MatcherConfig::default(),
    );
    matcher.load_corpus(lease_corpus()).unwrap();
    matcher
}

#[test]
fn ground_lease_search_with_hash_embeddings() {
    let matcher = hash_matcher();
    matcher.load_corpus(lease_corpus()).unwrap();

    let results = matcher
        .search("ground lease", &DomainFilter::All, 3, 0.0)
        .unwrap();
    let texts: Vec<_> = results.iter().map(|r| r.text()).collect();
    assert_eq!(texts, vec!["ground lease", "site lease", "employee handbook"]);
    assert!((results[0].similarity - 1.0).abs() < 1e-3);
}

#[test]
fn cross_domain_scenario_with_hash_embeddings() {
    let matcher = hash_matcher();
    matcher.load_corpus(lease_corpus()).unwrap();

    let grouped = matcher
        .cross_domain_matches("ground lease", "Legal", 0.7)
        .unwrap();
    assert!(!grouped.contains_key("Legal"));
    assert!(!grouped.contains_key("HR"));
    let restdev = grouped.get("RestDev").expect("RestDev group");
    assert_eq!(restdev[0].text(), "site lease");
    assert!(restdev[0].similarity >= 0.7);
}

#[test]
fn resolve_scenarios_with_hash_embeddings() {
    let matcher = hash_matcher();
    matcher.load_corpus(lease_corpus()).unwrap();

    assert_eq!(
        matcher.resolve_canonical("ground lease").unwrap(),
        CanonicalMapping::Mapped(GROUND_LEASE.to_string())
    );
    assert_eq!(
        matcher.resolve_canonical("unrelated gibberish xyz").unwrap(),
        CanonicalMapping::Unmapped
    );
}

#[test]
fn cross_domain_scenario() {
    let matcher = fixture_session();
    let grouped = matcher
        .cross_domain_matches("ground lease", "Legal", 0.7)
        .unwrap();

    assert!(!grouped.contains_key("Legal"));
    let restdev = grouped.get("RestDev").expect("RestDev group");
    assert!(restdev.iter().any(|r| r.text() == "site lease"));
}

#[test]
fn resolve_scenarios() {
    let matcher = fixture_session();
    assert_eq!(
        matcher.resolve_canonical("ground lease").unwrap(),
        CanonicalMapping::Mapped(GROUND_LEASE.to_string())
    );
    assert_eq!(
        matcher
            .resolve_canonical("unrelated gibberish xyz")
            .unwrap()
            .to_string(),
        "unmapped"
    );
}

#[test]
fn lower_canonical_threshold_maps_everything() {
    let matcher = SemanticMatcher::new(
        Arc::new(FixtureEmbedder::lease_fixture()),
        MatcherConfig {
            canonical_min_similarity: 0.0,
            ..MatcherConfig::default()
        },
    );
    matcher.load_corpus(lease_corpus()).unwrap();
    assert!(
        matcher
            .resolve_canonical("unrelated gibberish xyz")
            .unwrap()
            .is_mapped()
    );
}

#[test]
fn missing_required_source_leaves_nothing_searchable() {
    let dir = TermDir::new();
    let legal = dir.write_raw("legal.json", r#"[{"term": "ground lease"}]"#);

    let matcher = hash_matcher();
    let err = matcher
        .load(&[
            TermSource::required(legal, "Legal"),
            TermSource::required(dir.path("restdev_terms.json"), "Restaurant Development"),
        ])
        .unwrap_err();
    assert!(matches!(err, AlignError::SourceLoad { .. }));

    assert!(matches!(
        matcher.search("ground lease", &DomainFilter::All, 3, 0.0),
        Err(AlignError::EmptyIndex(_))
    ));
    assert_eq!(matcher.get_stats().total, 0);
}

#[test]
fn empty_query_is_a_valid_query() {
    let matcher = hash_matcher();
    matcher.load_corpus(lease_corpus()).unwrap();
    let results = matcher.search("", &DomainFilter::All, 3, 0.0).unwrap();
    assert!(results.len() <= 3);
}

#[test]
fn self_similarity_for_every_term() {
    let matcher = hash_matcher();
    let dir = TermDir::new();
    matcher.load(&dir.standard_sources()).unwrap();

    let snapshot = matcher.snapshot().unwrap();
    for term in snapshot.corpus() {
        let results = matcher.search(&term.text, &DomainFilter::All, 1, 0.0).unwrap();
        assert_eq!(results[0].text(), term.text);
        assert!(results[0].similarity > 0.99, "{}", term.text);
    }
}
