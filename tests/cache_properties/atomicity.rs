use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Barrier;
use std::thread;

use reweave::AdvisorGeneration;
use reweave::PointcutSpec;

use crate::common::new_cache;
use crate::common::spec;

const READERS: usize = 4;
const UPDATES: usize = 200;

fn batch(version: &str) -> Vec<PointcutSpec> {
    ["a", "b", "c", "d"]
        .iter()
        .map(|id| spec(id, version))
        .collect()
}

/// Every advisor in a snapshot comes from the same batch
fn assert_consistent(generation: &AdvisorGeneration) {
    let versions: Vec<&str> = generation
        .advisors()
        .iter()
        .map(|a| a.spec_version())
        .collect();
    assert_eq!(versions.len(), 4, "partial generation observed");
    assert!(
        versions.iter().all(|v| *v == versions[0]),
        "torn generation {}: {:?}",
        generation.generation(),
        versions
    );
    assert_eq!(generation.spec_versions().len(), 1);
    assert!(generation.spec_versions().contains(versions[0]));
}

#[test]
fn readers_never_observe_a_torn_generation() {
    let cache = new_cache(&batch("even"));
    let done = Arc::new(AtomicBool::new(false));
    let started = Arc::new(Barrier::new(READERS + 1));

    let readers: Vec<_> = (0..READERS)
        .map(|_| {
            let supplier = cache.supplier();
            let done = done.clone();
            let started = started.clone();
            thread::spawn(move || {
                started.wait();
                let mut last_seen = 0;
                let mut reads = 0usize;
                loop {
                    let finished = done.load(Ordering::Acquire);
                    let current = supplier.get();
                    assert_consistent(&current);
                    assert!(current.generation() >= last_seen, "generation went backwards");
                    last_seen = current.generation();
                    reads += 1;
                    if finished {
                        break;
                    }
                }
                reads
            })
        })
        .collect();

    started.wait();
    for i in 0..UPDATES {
        let version = if i % 2 == 0 { "odd" } else { "even" };
        cache.update(&batch(version)).unwrap();
    }
    done.store(true, Ordering::Release);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
    assert_eq!(cache.current_advisors().generation(), UPDATES as u64);
}

#[test]
fn concurrent_writers_publish_distinct_generations() {
    let cache = new_cache(&[]);

    let writers: Vec<_> = (0..4)
        .map(|w| {
            let cache = cache.clone();
            thread::spawn(move || {
                (0..25)
                    .map(|i| {
                        cache
                            .update(&batch(&format!("{w}-{i}")))
                            .unwrap()
                            .generation()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut generations: Vec<u64> = writers
        .into_iter()
        .flat_map(|w| w.join().unwrap())
        .collect();
    generations.sort_unstable();
    generations.dedup();

    assert_eq!(generations.len(), 100);
    assert_eq!(generations, (1..=100).collect::<Vec<_>>());

    let last = cache.current_advisors();
    assert_eq!(last.generation(), 100);
    assert_consistent(&last);
}
