//! Assembles the advisor cache and its coordinator from [`AgentConfig`].
//!
//! ## Example
//! ```ignore
//! let config = AgentConfig::new()?.validate()?;
//! let coordinator = Arc::new(
//!     ReweaveCoordinatorBuilder::new(config, weaver)
//!         .source(store)      // Optional, defaults to `reweave.pointcuts_path`
//!         .build()?,
//! );
//! let supplier = coordinator.cache().supplier(); // hand to the weaver
//! tokio::spawn(coordinator.clone().run(shutdown_rx));
//! ```

use std::sync::Arc;

use config::ConfigError;
use tracing::info;

use super::ReweaveCoordinator;
use super::Weaver;
use crate::AdviceCompiler;
use crate::AdvisorCache;
use crate::AgentConfig;
use crate::Error;
use crate::FilePointcutSource;
use crate::PointcutSource;
use crate::Result;

pub struct ReweaveCoordinatorBuilder {
    config: AgentConfig,
    weaver: Arc<dyn Weaver>,
    source: Option<Arc<dyn PointcutSource>>,
}

impl ReweaveCoordinatorBuilder {
    pub fn new(
        config: AgentConfig,
        weaver: Arc<dyn Weaver>,
    ) -> Self {
        Self {
            config,
            weaver,
            source: None,
        }
    }

    /// Overrides the file source configured by `reweave.pointcuts_path`
    pub fn source(
        mut self,
        source: Arc<dyn PointcutSource>,
    ) -> Self {
        self.source = Some(source);
        self
    }

    /// Loads the startup pointcuts and seeds the cache with them
    ///
    /// # Errors
    /// - no source given and `reweave.pointcuts_path` unset
    /// - the source fails to load
    /// - a startup pointcut fails to compile
    pub fn build(self) -> Result<ReweaveCoordinator> {
        let source = match self.source {
            Some(source) => source,
            None => {
                let path = self.config.reweave.pointcuts_path.clone().ok_or_else(|| {
                    Error::Config(ConfigError::Message(
                        "no pointcut source given and reweave.pointcuts_path is unset".into(),
                    ))
                })?;
                info!("reading pointcuts from {}", path.display());
                Arc::new(FilePointcutSource::new(path)) as Arc<dyn PointcutSource>
            }
        };

        let specs = source.load()?;
        let compiler = AdviceCompiler::new(self.config.compiler.clone());
        let cache = Arc::new(AdvisorCache::new(compiler, &specs)?);

        Ok(ReweaveCoordinator::new(
            cache,
            source,
            self.weaver,
            self.config.reweave.poll_interval(),
        ))
    }
}
