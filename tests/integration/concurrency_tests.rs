use std::sync::Arc;
use std::thread;

use termalign::matcher::DomainFilter;
use termalign::terms::{Corpus, Term};
use termalign::test_utils::fixtures::lease_corpus;

use crate::fixture::hash_matcher;

#[test]
fn concurrent_searches_agree() {
    let matcher = Arc::new(hash_matcher());
    matcher.load_corpus(lease_corpus()).unwrap();
    let expected = matcher
        .search("ground lease", &DomainFilter::All, 3, 0.0)
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let matcher = Arc::clone(&matcher);
            thread::spawn(move || {
                (0..25)
                    .map(|_| {
                        matcher
                            .search("ground lease", &DomainFilter::All, 3, 0.0)
                            .unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for results in handle.join().unwrap() {
            assert_eq!(results, expected);
        }
    }
}

#[test]
fn searches_during_reload_see_a_whole_corpus() {
    let matcher = Arc::new(hash_matcher());
    let small = lease_corpus();
    let large: Corpus = lease_corpus()
        .iter()
        .cloned()
        .chain((0..50).map(|i| Term::new(format!("filler term {i}"), "Filler")))
        .collect();
    matcher.load_corpus(small.clone()).unwrap();

    let reloader = {
        let matcher = Arc::clone(&matcher);
        let (small, large) = (small.clone(), large.clone());
        thread::spawn(move || {
            for round in 0..20 {
                let corpus = if round % 2 == 0 { large.clone() } else { small.clone() };
                matcher.load_corpus(corpus).unwrap();
            }
        })
    };

    let searchers: Vec<_> = (0..4)
        .map(|_| {
            let matcher = Arc::clone(&matcher);
            thread::spawn(move || {
                for _ in 0..50 {
                    let snapshot = matcher.snapshot().unwrap();
                    assert_eq!(snapshot.corpus().len(), snapshot.index().len());

                    let results = matcher
                        .search("ground lease", &DomainFilter::All, 100, 0.0)
                        .unwrap();
                    assert!(results.len() == 3 || results.len() == 53);
                }
            })
        })
        .collect();

    reloader.join().unwrap();
    for searcher in searchers {
        searcher.join().unwrap();
    }
}
