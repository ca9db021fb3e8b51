use serde_json::json;

use termalign::AlignError;
use termalign::terms::{TermSource, load_sources};

use crate::fixture::{TermDir, hash_matcher};

#[test]
fn standard_sources_load_with_missing_optional() {
    let dir = TermDir::new();
    let loaded = load_sources(&dir.standard_sources()).unwrap();

    assert_eq!(loaded.corpus.len(), 6);
    assert_eq!(loaded.skipped, vec![dir.path("finance_terms.json")]);

    let stats = loaded.corpus.stats();
    assert_eq!(stats.domain_count("Legal"), 3);
    assert_eq!(stats.domain_count("Restaurant Development"), 3);
}

#[test]
fn present_optional_source_is_appended_last() {
    let dir = TermDir::new();
    dir.write(
        "finance_terms.json",
        &json!({"domain": "Finance", "terms": [{"term": "lease liability"}]}),
    );
    let loaded = load_sources(&dir.standard_sources()).unwrap();

    let last = loaded.corpus.terms().last().unwrap();
    assert_eq!(last.text, "lease liability");
    assert_eq!(last.domain, "Finance");
    assert!(loaded.skipped.is_empty());
}

#[test]
fn passthrough_fields_reach_search_results() {
    let dir = TermDir::new();
    let matcher = hash_matcher();
    matcher.load(&dir.standard_sources()).unwrap();

    let results = matcher
        .search("site lease", &"Restaurant Development".into(), 1, 0.0)
        .unwrap();
    let json = serde_json::to_value(&results[0]).unwrap();
    assert_eq!(json["term"], "site lease");
    assert_eq!(json["stage"], "site selection");
    assert!(json["similarity"].as_f64().unwrap() > 0.99);
}

#[test]
fn malformed_optional_source_fails_whole_load() {
    let dir = TermDir::new();
    dir.write_raw("finance_terms.json", r#"{"domain": "Finance"}"#);

    let matcher = hash_matcher();
    let err = matcher.load(&dir.standard_sources()).unwrap_err();
    match err {
        AlignError::SourceLoad { source_name, .. } => {
            assert!(source_name.ends_with("finance_terms.json"));
        }
        other => panic!("expected SourceLoad, got {other:?}"),
    }
    assert!(!matcher.is_loaded());
}

#[test]
fn yaml_and_json_sources_mix() {
    let dir = TermDir::new();
    let legal = dir.write("legal.json", &json!([{"term": "ground lease"}]));
    let hr = dir.write_raw(
        "hr.yml",
        "- term: employee handbook\n  canonical: Policies > HR\n  owner: people-ops\n",
    );

    let loaded = load_sources(&[
        TermSource::required(legal, "Legal"),
        TermSource::required(hr, "HR"),
    ])
    .unwrap();
    let hr_term = &loaded.corpus.terms()[1];
    assert_eq!(hr_term.domain, "HR");
    assert_eq!(hr_term.canonical.as_deref(), Some("Policies > HR"));
    assert_eq!(hr_term.extra["owner"], "people-ops");
}
