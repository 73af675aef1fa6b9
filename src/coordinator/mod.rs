//! Configuration-change handling on top of the advisor cache.
//!
//! The cache answers "are you out of sync?" and "what are the current
//! advisors?". [`ReweaveCoordinator`] strings those together with the
//! external [`Weaver`] whenever pointcut configuration changes.

mod builder;
mod reweave_coordinator;
mod weaver;
pub use builder::*;
pub use reweave_coordinator::*;
pub use weaver::*;
