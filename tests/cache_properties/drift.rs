use reweave::PointcutSpec;

use crate::common::fingerprint;
use crate::common::new_cache;
use crate::common::spec;

#[test]
fn drift_is_set_equality_on_versions() {
    let cache = new_cache(&[spec("a", "1"), spec("b", "2")]);

    // reordered and duplicated: same set
    assert!(!cache.is_out_of_sync(&[spec("b", "2"), spec("a", "1"), spec("a", "1")]));
    // subset
    assert!(cache.is_out_of_sync(&[spec("a", "1")]));
    // superset
    assert!(cache.is_out_of_sync(&[spec("a", "1"), spec("b", "2"), spec("c", "3")]));
    // changed version
    assert!(cache.is_out_of_sync(&[spec("a", "1"), spec("b", "3")]));
}

#[test]
fn shared_version_tokens_collapse_into_one() {
    let cache = new_cache(&[spec("a", "1"), spec("b", "1")]);

    // only the version set {"1"} is tracked
    assert!(!cache.is_out_of_sync(&[spec("a", "1")]));
    assert!(cache.is_out_of_sync(&[spec("a", "1"), spec("b", "2")]));
}

#[test]
fn drift_check_ignores_ids_and_content() {
    let cache = new_cache(&[spec("a", "1")]);

    // only the version identifier participates
    let renamed = PointcutSpec::new("renamed", "1", "com.example.Other", "other");
    assert!(!cache.is_out_of_sync(&[renamed]));
}

#[test]
fn drift_check_never_publishes() {
    let cache = new_cache(&[spec("a", "1")]);
    let before = cache.current_advisors();

    for _ in 0..10 {
        assert!(cache.is_out_of_sync(&[spec("a", "2")]));
    }

    assert_eq!(cache.current_advisors().generation(), before.generation());
}

#[test]
fn update_with_same_content_is_idempotent() {
    let specs = vec![spec("a", "1"), spec("b", "1")];
    let cache = new_cache(&specs);

    let first = cache.update(&specs).unwrap();
    let second = cache.update(&specs).unwrap();

    assert_eq!(fingerprint(&first), fingerprint(&second));
    assert_eq!(first.advisors(), second.advisors());
    assert_eq!(first.spec_versions(), second.spec_versions());
    assert!(!cache.is_out_of_sync(&specs));
}

#[test]
fn failed_update_keeps_previous_generation() {
    let cache = new_cache(&[spec("a", "1")]);
    let before = cache.current_advisors();

    let broken = PointcutSpec::new("a", "2", "com.example.Foo", "/(unclosed/");
    assert!(cache.update(&[spec("b", "1"), broken.clone()]).is_err());

    let after = cache.current_advisors();
    assert_eq!(after.generation(), before.generation());
    assert_eq!(fingerprint(&after), vec![("a".into(), "1".into())]);
    // still out of sync, so the next change event will retry
    assert!(cache.is_out_of_sync(&[spec("b", "1"), broken]));
}

#[test]
fn published_generation_ids_increase() {
    let cache = new_cache(&[]);
    let mut last = cache.current_advisors().generation();

    for version in 1..=5 {
        let published = cache.update(&[spec("a", &version.to_string())]).unwrap();
        assert!(published.generation() > last);
        last = published.generation();
    }
}
