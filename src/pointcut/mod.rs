//! Declarative pointcut rules as supplied by the configuration store.
//!
//! A [`PointcutSpec`] is read-only input to one compile cycle. Only the
//! user-editable rules flow through here; plugin-bundled rules are compiled
//! once at startup and never take part in drift detection.

mod source;
mod spec;
mod version;
pub use source::*;
pub use spec::*;
pub use version::*;
