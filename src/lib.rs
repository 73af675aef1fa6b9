//! Dynamic instrumentation rule cache.
//!
//! Compiles user-editable pointcut rules into advisors, publishes them as
//! immutable generations that hot call paths read without locking, detects
//! drift against the configuration store, and hot-swaps a new generation
//! when pointcuts change.
//!
//! ```ignore
//! let cache = Arc::new(AdvisorCache::new(AdviceCompiler::default(), &store.load()?)?);
//! let supplier = cache.supplier(); // weaver side
//!
//! // configuration change handler
//! let specs = store.load()?;
//! if cache.is_out_of_sync(&specs) {
//!     let generation = cache.update(&specs)?;
//!     weaver.reweave(&generation)?;
//! }
//! ```

mod advice;
mod cache;
mod config;
mod coordinator;
mod errors;
mod metrics;
mod pointcut;

pub use advice::*;
pub use cache::*;
pub use config::*;
pub use coordinator::*;
pub use errors::*;
pub use metrics::*;
pub use pointcut::*;
