//! Versioned advisor cache with lock-free reads.
//!
//! ```text
//! Read path (hot, any thread):
//!   current_advisors() -> ArcSwap::load_full() -> Arc<AdvisorGeneration>
//!
//! Write path (config change handler):
//!   update(specs) -> compile (no lock held) -> publish_lock -> ArcSwap::store()
//! ```
//!
//! Readers never wait on writers. Writers compile against a private
//! candidate and only serialize the final swap, so publication order is
//! the order in which `update` calls finish compiling. A failed compile
//! leaves the published generation untouched.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::debug;
use tracing::info;
use tracing::trace;
use tracing::warn;

use super::AdvisorGeneration;
use crate::Advisor;
use crate::AdviceCompiler;
use crate::CompileError;
use crate::PointcutSpec;
use crate::Result;
use crate::VersionSet;
use crate::ADVISOR_COMPILE_DURATION_MS;
use crate::ADVISOR_COMPILE_FAILURES;
use crate::ADVISOR_COUNT;
use crate::ADVISOR_DRIFT_CHECKS;
use crate::ADVISOR_GENERATION;

/// Holds the single current [`AdvisorGeneration`] for user-editable pointcuts
///
/// Always holds a usable generation once constructed; there is no empty or
/// uninitialized state. Share it behind an `Arc` with the configuration
/// change handler and hand [`AdvisorCache::supplier`] to the weaver.
pub struct AdvisorCache {
    compiler: AdviceCompiler,
    current: Arc<ArcSwap<AdvisorGeneration>>,
    /// Last published generation id; held only for the swap itself
    publish_lock: Mutex<u64>,
}

/// Cheap, cloneable read handle on the cache's current generation
#[derive(Clone)]
pub struct AdvisorsSupplier {
    current: Arc<ArcSwap<AdvisorGeneration>>,
}

impl AdvisorsSupplier {
    /// Snapshot of the current generation; never blocks
    pub fn get(&self) -> Arc<AdvisorGeneration> {
        self.current.load_full()
    }
}

impl Debug for AdvisorsSupplier {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("AdvisorsSupplier")
            .field("generation", &self.current.load().generation)
            .finish()
    }
}

impl AdvisorCache {
    /// Seeds the cache with advisors compiled from the startup pointcuts
    ///
    /// # Errors
    /// Returns [`crate::Error::Compile`] when a startup pointcut is malformed.
    pub fn new(
        compiler: AdviceCompiler,
        specs: &[PointcutSpec],
    ) -> Result<Self> {
        let advisors = timed_compile(&compiler, specs).inspect_err(|e| {
            ADVISOR_COMPILE_FAILURES.inc();
            warn!("startup pointcuts rejected: {}", e);
        })?;

        let initial = AdvisorGeneration {
            generation: 0,
            advisors,
            spec_versions: VersionSet::from_specs(specs),
        };
        info!(
            "Initializing advisor cache with {} advisors",
            initial.advisors.len()
        );
        ADVISOR_GENERATION.set(0);
        ADVISOR_COUNT.set(initial.advisors.len() as i64);

        Ok(Self {
            compiler,
            current: Arc::new(ArcSwap::from_pointee(initial)),
            publish_lock: Mutex::new(0),
        })
    }

    /// Snapshot of the current generation; never blocks on writers
    ///
    /// In-flight readers keep the generation they loaded alive even after a
    /// newer one is published.
    pub fn current_advisors(&self) -> Arc<AdvisorGeneration> {
        let current = self.current.load_full();
        trace!("read advisor generation {}", current.generation);
        current
    }

    /// Read handle for the weaver and intercepted call sites
    pub fn supplier(&self) -> AdvisorsSupplier {
        AdvisorsSupplier {
            current: self.current.clone(),
        }
    }

    /// True when the version set of `specs` differs from the published one
    ///
    /// Order and duplicates in `specs` are irrelevant. Pure read; it never
    /// triggers recompilation.
    pub fn is_out_of_sync(
        &self,
        specs: &[PointcutSpec],
    ) -> bool {
        let versions = VersionSet::from_specs(specs);
        let current = self.current.load();
        let out_of_sync = versions != current.spec_versions;

        debug!(
            "drift check against generation {}: out_of_sync={}",
            current.generation, out_of_sync
        );
        let outcome = if out_of_sync { "out_of_sync" } else { "in_sync" };
        ADVISOR_DRIFT_CHECKS.with_label_values(&[outcome]).inc();
        out_of_sync
    }

    /// Compiles `specs` and publishes them as the new current generation
    ///
    /// Concurrent calls are serialized on the publish step only. When
    /// racing, the call that finishes compiling last wins.
    ///
    /// # Errors
    /// Returns [`crate::Error::Compile`] when any spec is malformed; the
    /// previously published generation stays active.
    pub fn update(
        &self,
        specs: &[PointcutSpec],
    ) -> Result<Arc<AdvisorGeneration>> {
        let advisors = timed_compile(&self.compiler, specs).inspect_err(|e| {
            ADVISOR_COMPILE_FAILURES.inc();
            warn!(
                "pointcut update rejected, keeping generation {}: {}",
                self.current.load().generation,
                e
            );
        })?;
        let spec_versions = VersionSet::from_specs(specs);

        let mut last_generation = self.publish_lock.lock();
        *last_generation += 1;
        let published = Arc::new(AdvisorGeneration {
            generation: *last_generation,
            advisors,
            spec_versions,
        });
        self.current.store(published.clone());
        ADVISOR_GENERATION.set(published.generation as i64);
        ADVISOR_COUNT.set(published.advisors.len() as i64);
        drop(last_generation);

        info!(
            "published advisor generation {} with {} advisors",
            published.generation,
            published.advisors.len()
        );
        Ok(published)
    }

    /// Copy of the published advisor list for assertions
    #[cfg(any(test, feature = "test-utils"))]
    pub fn advisors_for_test(&self) -> Vec<Advisor> {
        self.current.load().advisors.clone()
    }
}

/// Every compile attempt is observed, rejected ones included
fn timed_compile(
    compiler: &AdviceCompiler,
    specs: &[PointcutSpec],
) -> std::result::Result<Vec<Advisor>, CompileError> {
    let started = Instant::now();
    let result = compiler.compile(specs);
    ADVISOR_COMPILE_DURATION_MS.observe(started.elapsed().as_secs_f64() * 1000.0);
    result
}

impl Debug for AdvisorCache {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let current = self.current.load();
        f.debug_struct("AdvisorCache")
            .field("generation", &current.generation)
            .field("advisors", &current.advisors.len())
            .finish()
    }
}
