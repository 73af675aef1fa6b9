use std::sync::Arc;

use reweave::AdviceCompiler;
use reweave::AdvisorCache;
use reweave::CaptureSpec;
use reweave::Error;
use reweave::MethodSignature;
use reweave::PointcutSpec;

use crate::common::fingerprint;
use crate::common::new_cache;
use crate::common::spec;

#[test]
fn version_bump_publishes_new_generation() {
    let cache = new_cache(&[spec("a", "v1")]);
    let initial = cache.current_advisors();

    assert!(cache.is_out_of_sync(&[spec("a", "v2")]));
    let published = cache.update(&[spec("a", "v2")]).unwrap();

    assert_eq!(published.generation(), initial.generation() + 1);
    assert_eq!(fingerprint(&published), vec![("a".into(), "v2".into())]);
    assert!(!cache.is_out_of_sync(&[spec("a", "v2")]));
    // a reader holding the old snapshot still sees v1
    assert_eq!(initial.advisors()[0].spec_version(), "v1");
}

#[test]
fn removing_all_pointcuts_publishes_empty_generation() {
    let cache = new_cache(&[spec("a", "v1"), spec("b", "v1")]);

    let published = cache.update(&[]).unwrap();

    assert!(published.is_empty());
    assert!(published.spec_versions().is_empty());
    assert!(!cache.is_out_of_sync(&[]));
    assert!(cache.is_out_of_sync(&[spec("a", "v1")]));
}

#[test]
fn empty_startup_is_a_usable_generation() {
    let cache = new_cache(&[]);

    let current = cache.current_advisors();
    assert_eq!(current.generation(), 0);
    assert!(current.is_empty());
    assert!(!cache.is_out_of_sync(&[]));
}

#[test]
fn malformed_startup_pointcut_fails_construction() {
    let result = AdvisorCache::new(
        AdviceCompiler::default(),
        &[PointcutSpec::new("a", "v1", "com.example.Foo", "/[/")],
    );

    assert!(matches!(result, Err(Error::Compile(_))));
}

#[test]
fn published_advisors_match_woven_methods() {
    let cache = new_cache(&[PointcutSpec::new("orders", "v1", "com.example.Orders*", "place")
        .with_parameter_types(["java.lang.String", ".."])
        .with_capture(CaptureSpec::trace_entry(
            "orders",
            "placing {{0}} via {{methodName}}",
        ))]);

    let current = cache.current_advisors();
    let place = MethodSignature::new("place").with_parameters(["java.lang.String", "int"]);
    let cancel = MethodSignature::new("cancel");

    assert_eq!(current.advisors_for_class("com.example.OrdersService").count(), 1);
    assert_eq!(
        current
            .advisors_for_method("com.example.OrdersService", &place)
            .count(),
        1
    );
    assert_eq!(
        current
            .advisors_for_method("com.example.OrdersService", &cancel)
            .count(),
        0
    );
    assert_eq!(current.advisors_for_class("com.example.Billing").count(), 0);
}

#[test]
fn supplier_follows_published_generations() {
    let cache = new_cache(&[spec("a", "v1")]);
    let supplier = cache.supplier();
    let handed_out = supplier.clone();

    cache.update(&[spec("a", "v2")]).unwrap();

    assert!(Arc::ptr_eq(&supplier.get(), &cache.current_advisors()));
    assert_eq!(handed_out.get().generation(), 1);
}
