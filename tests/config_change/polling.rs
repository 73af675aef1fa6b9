use std::sync::Arc;
use std::time::Duration;

use reweave::AdviceCompiler;
use reweave::AdvisorCache;
use reweave::ReweaveCoordinator;
use reweave::StaticPointcutSource;
use tokio::sync::watch;

use crate::common::spec;
use crate::common::RecordingWeaver;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn poller_publishes_pushed_changes_until_shutdown() {
    let source = Arc::new(StaticPointcutSource::new(vec![spec("a", "1")]));
    let cache = Arc::new(AdvisorCache::new(AdviceCompiler::default(), &[spec("a", "1")]).unwrap());
    let supplier = cache.supplier();
    let weaver = Arc::new(RecordingWeaver::default());
    let coordinator = Arc::new(ReweaveCoordinator::new(
        cache,
        source.clone(),
        weaver.clone(),
        Some(Duration::from_millis(15)),
    ));
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let handle = tokio::spawn(coordinator.clone().run(shutdown_rx));

    source.replace(vec![spec("a", "2"), spec("b", "1")]);
    let mut published = None;
    for _ in 0..200 {
        let current = supplier.get();
        if current.len() == 2 {
            published = Some(current);
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let published = published.expect("poller never published the change");
    assert_eq!(published.generation(), 1);

    shutdown_tx.send(()).unwrap();
    handle.await.unwrap().unwrap();

    // no further publications after shutdown
    source.replace(vec![spec("a", "3")]);
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(supplier.get().generation(), 1);
    assert_eq!(*weaver.woven.lock(), vec![1]);
}
