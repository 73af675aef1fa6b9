mod advisor_cache;
mod generation;
pub use advisor_cache::*;
pub use generation::*;
