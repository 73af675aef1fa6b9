//! Advisor compilation.
//!
//! [`AdviceCompiler`] turns an ordered pointcut list into an ordered advisor
//! list. Each [`Advisor`] carries the matchers the weaver needs to decide
//! whether a candidate method is intercepted and the capture behavior to
//! attach when it is.

mod advisor;
mod compiler;
mod matcher;
mod template;
pub use advisor::*;
pub use compiler::*;
pub use matcher::*;
pub use template::*;
