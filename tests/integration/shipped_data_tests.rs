//! The bundled `data/` term files under the default configuration.

use std::path::Path;

use termalign::config::Config;
use termalign::matcher::{CanonicalMapping, DomainFilter, SemanticMatcher};

fn shipped_session() -> SemanticMatcher {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut config = Config::default();
    for source in &mut config.sources {
        source.path = root.join(&source.path);
    }
    let matcher = SemanticMatcher::from_config(&config).unwrap();
    matcher.load(&config.sources).unwrap();
    matcher
}

#[test]
fn plural_query_finds_singular_term_first() {
    let matcher = shipped_session();
    let results = matcher
        .search("ground leases", &DomainFilter::All, 3, 0.0)
        .unwrap();
    assert_eq!(results[0].text(), "ground lease");
    assert!(results.iter().all(|r| r.text() != "right-of-use asset"));
}

#[test]
fn lease_terms_outrank_unrelated_terms() {
    let matcher = shipped_session();
    let results = matcher
        .search("ground lease", &DomainFilter::All, 4, 0.0)
        .unwrap();
    assert!(results.iter().all(|r| r.text().contains("lease")));
}

#[test]
fn cross_domain_at_default_threshold() {
    let matcher = shipped_session();
    let threshold = matcher.config().cross_domain_min_similarity;
    let grouped = matcher
        .cross_domain_matches("ground lease", "Legal", threshold)
        .unwrap();
    let restdev = grouped
        .get("Restaurant Development")
        .expect("Restaurant Development group");
    assert_eq!(restdev[0].text(), "site lease");
    assert!(!grouped.contains_key("Legal"));
}

#[test]
fn resolve_at_default_threshold() {
    let matcher = shipped_session();
    assert!(
        matcher
            .resolve_canonical("site agreement")
            .unwrap()
            .label()
            .is_some_and(|label| label.starts_with("Agreements > "))
    );
    assert_eq!(
        matcher.resolve_canonical("unrelated gibberish xyz").unwrap(),
        CanonicalMapping::Unmapped
    );
}
