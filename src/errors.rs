//! Advisor Cache Error Hierarchy
//!
//! Defines the error types surfaced by the compile/publish pipeline,
//! categorized by the collaborator that produced them.

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Pointcut configuration rejected by the compiler.
    /// The previously published generation stays active.
    #[error("configuration rejected, previous instrumentation still active: {0}")]
    Compile(#[from] CompileError),

    /// Agent configuration loading or validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Pointcut source could not produce a spec list
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Weaver failed to re-instrument loaded code
    #[error(transparent)]
    Weave(#[from] WeaveError),

    /// Unrecoverable failures requiring process termination
    #[error("Fatal error: {0}")]
    Fatal(String),
}

/// A pointcut spec could not be translated into an advisor.
///
/// Every variant names the offending spec so an operator can find it.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("pointcut {id}: required field `{field}` is empty")]
    EmptyField { id: String, field: &'static str },

    #[error("pointcut id must not be empty")]
    MissingId,

    #[error("pointcut {id}: duplicate id in pointcut list")]
    DuplicateId { id: String },

    #[error("pointcut {id}: invalid {field} pattern `{pattern}`")]
    InvalidPattern {
        id: String,
        field: &'static str,
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    #[error("pointcut {id}: regex pattern `{pattern}` in {field} is not allowed")]
    RegexNotAllowed {
        id: String,
        field: &'static str,
        pattern: String,
    },

    #[error("pointcut {id}: {field} pattern exceeds {max} characters")]
    PatternTooLong {
        id: String,
        field: &'static str,
        max: usize,
    },

    #[error("pointcut {id}: `..` is only allowed as the last parameter type")]
    MisplacedVarargs { id: String },

    #[error("pointcut {id}: method modifiers `{first}` and `{second}` can never both hold")]
    ConflictingModifiers {
        id: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("pointcut {id}: invalid template `{template}`: {reason}")]
    InvalidTemplate {
        id: String,
        template: String,
        reason: String,
    },

    #[error("pointcut {id}: unsupported capture: {reason}")]
    UnsupportedCapture { id: String, reason: String },

    #[error("{count} pointcuts exceed the configured maximum of {max}")]
    TooManyPointcuts { count: usize, max: usize },
}

impl CompileError {
    /// Id of the spec that failed to compile, if the failure is spec-specific
    pub fn spec_id(&self) -> Option<&str> {
        match self {
            CompileError::EmptyField { id, .. }
            | CompileError::DuplicateId { id }
            | CompileError::InvalidPattern { id, .. }
            | CompileError::RegexNotAllowed { id, .. }
            | CompileError::PatternTooLong { id, .. }
            | CompileError::MisplacedVarargs { id }
            | CompileError::ConflictingModifiers { id, .. }
            | CompileError::InvalidTemplate { id, .. }
            | CompileError::UnsupportedCapture { id, .. } => Some(id),
            CompileError::MissingId | CompileError::TooManyPointcuts { .. } => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Pointcut file missing or unreadable
    #[error("Failed to read pointcuts from {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: ConfigError,
    },

    /// Source is temporarily unable to serve pointcuts
    #[error("Pointcut source unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum WeaveError {
    /// Class could not be re-instrumented
    #[error("Failed to reweave {class_name}: {reason}")]
    ClassRejected { class_name: String, reason: String },

    /// Runtime does not support retransforming loaded code
    #[error("Retransformation unsupported: {0}")]
    Unsupported(String),
}
