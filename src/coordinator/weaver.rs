#[cfg(test)]
use mockall::automock;

use crate::AdvisorGeneration;
use crate::Result;

/// Mechanism that attaches interception to live code
///
/// Implemented by the embedding runtime. The cache never instruments code
/// itself; it only hands over the generation to weave with.
#[cfg_attr(test, automock)]
pub trait Weaver: Send + Sync {
    /// Re-derives interception for already-loaded code from `generation`
    ///
    /// Returns the number of classes that were re-instrumented.
    fn reweave(
        &self,
        generation: &AdvisorGeneration,
    ) -> Result<usize>;
}
