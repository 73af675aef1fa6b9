use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time;
use tokio::time::MissedTickBehavior;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::Weaver;
use crate::AdvisorCache;
use crate::PointcutSource;
use crate::PointcutSpec;
use crate::Result;

/// Result of handling one configuration change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReweaveOutcome {
    /// Published generation already matches configuration and is woven
    InSync { generation: u64 },
    /// A generation was woven into loaded code
    Reweaved { generation: u64, classes: usize },
}

/// Glue between configuration changes, the advisor cache and the weaver
///
/// On every change: drift check, then `update` when out of sync, then
/// reweave loaded code with the freshly published generation. Changes are
/// handled one at a time.
pub struct ReweaveCoordinator {
    cache: Arc<AdvisorCache>,
    source: Arc<dyn PointcutSource>,
    weaver: Arc<dyn Weaver>,
    poll_interval: Option<Duration>,
    /// Last generation the weaver accepted
    last_woven: Mutex<u64>,
}

impl ReweaveCoordinator {
    /// The cache's current generation is assumed woven at class load time
    pub fn new(
        cache: Arc<AdvisorCache>,
        source: Arc<dyn PointcutSource>,
        weaver: Arc<dyn Weaver>,
        poll_interval: Option<Duration>,
    ) -> Self {
        let last_woven = cache.current_advisors().generation();
        Self {
            cache,
            source,
            weaver,
            poll_interval,
            last_woven: Mutex::new(last_woven),
        }
    }

    pub fn cache(&self) -> &Arc<AdvisorCache> {
        &self.cache
    }

    /// Reloads pointcuts from the source and applies them
    pub fn on_config_changed(&self) -> Result<ReweaveOutcome> {
        let specs = self.source.load()?;
        self.on_specs_changed(&specs)
    }

    /// Applies a pointcut list pushed by the configuration store
    ///
    /// # Errors
    /// - [`crate::Error::Compile`]: configuration rejected, previous
    ///   instrumentation still active
    /// - [`crate::Error::Weave`]: the new generation is published but loaded
    ///   code was not re-instrumented; the next change retries weaving
    pub fn on_specs_changed(
        &self,
        specs: &[PointcutSpec],
    ) -> Result<ReweaveOutcome> {
        let mut last_woven = self.last_woven.lock();

        let generation = if self.cache.is_out_of_sync(specs) {
            self.cache.update(specs).inspect_err(|e| {
                warn!("{}", e);
            })?
        } else {
            let current = self.cache.current_advisors();
            if current.generation() == *last_woven {
                debug!("pointcuts in sync with generation {}", current.generation());
                return Ok(ReweaveOutcome::InSync {
                    generation: current.generation(),
                });
            }
            info!(
                "generation {} was never woven, retrying",
                current.generation()
            );
            current
        };

        let classes = self.weaver.reweave(&generation).inspect_err(|e| {
            error!(
                "reweave of generation {} failed: {:?}",
                generation.generation(),
                e
            );
        })?;
        *last_woven = generation.generation();

        info!(
            "reweaved {} classes with generation {}",
            classes,
            generation.generation()
        );
        Ok(ReweaveOutcome::Reweaved {
            generation: generation.generation(),
            classes,
        })
    }

    /// Polls the pointcut source until shutdown
    ///
    /// Returns immediately when polling is disabled. Failed checks are
    /// logged and retried on the next tick.
    pub async fn run(
        self: Arc<Self>,
        mut shutdown_signal: watch::Receiver<()>,
    ) -> Result<()> {
        let Some(poll_interval) = self.poll_interval else {
            info!("pointcut polling disabled");
            return Ok(());
        };

        let mut ticker = time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately; startup is already in sync
        ticker.tick().await;

        loop {
            tokio::select! {
                biased;
                _ = shutdown_signal.changed() => {
                    warn!("pointcut poller shutdown signal received.");
                    return Ok(());
                }
                _ = ticker.tick() => {
                    let this = self.clone();
                    match tokio::task::spawn_blocking(move || this.on_config_changed()).await {
                        Ok(Ok(outcome)) => debug!("pointcut poll: {:?}", outcome),
                        Ok(Err(e)) => warn!("pointcut poll failed: {}", e),
                        Err(e) => error!("pointcut poll task failed: {:?}", e),
                    }
                }
            }
        }
    }
}
