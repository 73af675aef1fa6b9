use serde::Deserialize;
use serde::Serialize;

/// Parameter type pattern matching any number of remaining parameters
pub const ANY_REMAINING_PARAMETERS: &str = "..";

/// One user-editable match rule
///
/// `version` is assigned by the configuration store and is the only field
/// consulted for drift detection. Everything else describes what to match
/// and what to capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointcutSpec {
    /// Stable identifier, unique within one pointcut list
    pub id: String,

    /// Opaque version token, changes whenever the content changes
    pub version: String,

    /// Class-match pattern: literal, `*` glob, or `/regex/`
    pub class_name: String,

    /// Method-match pattern: literal, `*` glob, or `/regex/`
    pub method_name: String,

    /// Per-position parameter type patterns; a trailing `..` matches the rest
    #[serde(default)]
    pub method_parameter_types: Vec<String>,

    /// Return type pattern, empty matches any
    #[serde(default)]
    pub method_return_type: String,

    /// Modifiers that must all hold on the target method
    #[serde(default)]
    pub method_modifiers: Vec<MethodModifier>,

    /// What to record on entry, exit and exception
    #[serde(default)]
    pub capture: CaptureSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodModifier {
    Public,
    Static,
    NotStatic,
}

impl MethodModifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodModifier::Public => "public",
            MethodModifier::Static => "static",
            MethodModifier::NotStatic => "not_static",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureKind {
    /// Time the call under `metric_name`
    Metric,
    /// Time the call and record a trace entry rendered from `message_template`
    TraceEntry,
    /// Start a transaction of `transaction_type` named by `transaction_name_template`
    Transaction,
    /// Attach nothing beyond return/exception capture
    #[default]
    Other,
}

impl CaptureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureKind::Metric => "metric",
            CaptureKind::TraceEntry => "trace_entry",
            CaptureKind::Transaction => "transaction",
            CaptureKind::Other => "other",
        }
    }
}

/// Capture-behavior descriptor of a pointcut
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CaptureSpec {
    #[serde(default)]
    pub kind: CaptureKind,

    #[serde(default)]
    pub metric_name: String,

    /// Trace entry message, e.g. `query {{0}} on {{this.url}}`
    #[serde(default)]
    pub message_template: String,

    /// Only trace entries slower than this capture a stack trace
    #[serde(default)]
    pub stack_threshold_millis: Option<u64>,

    #[serde(default)]
    pub transaction_type: String,

    #[serde(default)]
    pub transaction_name_template: String,

    /// Record the return value on exit; enables the `{{_}}` placeholder
    #[serde(default)]
    pub capture_return: bool,

    /// Record the thrown error on exceptional exit
    #[serde(default)]
    pub capture_exception: bool,
}

impl PointcutSpec {
    /// Creates a spec matching `class_name.method_name` with no capture behavior
    pub fn new(
        id: impl Into<String>,
        version: impl Into<String>,
        class_name: impl Into<String>,
        method_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            class_name: class_name.into(),
            method_name: method_name.into(),
            method_parameter_types: Vec::new(),
            method_return_type: String::new(),
            method_modifiers: Vec::new(),
            capture: CaptureSpec::default(),
        }
    }

    pub fn with_parameter_types<I, S>(
        mut self,
        types: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.method_parameter_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_return_type(
        mut self,
        return_type: impl Into<String>,
    ) -> Self {
        self.method_return_type = return_type.into();
        self
    }

    pub fn with_modifiers(
        mut self,
        modifiers: Vec<MethodModifier>,
    ) -> Self {
        self.method_modifiers = modifiers;
        self
    }

    pub fn with_capture(
        mut self,
        capture: CaptureSpec,
    ) -> Self {
        self.capture = capture;
        self
    }

    /// Replaces the version with one derived from the spec content
    pub fn with_content_version(mut self) -> Self {
        self.version = self.content_version();
        self
    }
}

impl CaptureSpec {
    pub fn metric(metric_name: impl Into<String>) -> Self {
        Self {
            kind: CaptureKind::Metric,
            metric_name: metric_name.into(),
            ..Default::default()
        }
    }

    pub fn trace_entry(
        metric_name: impl Into<String>,
        message_template: impl Into<String>,
    ) -> Self {
        Self {
            kind: CaptureKind::TraceEntry,
            metric_name: metric_name.into(),
            message_template: message_template.into(),
            ..Default::default()
        }
    }

    pub fn transaction(
        metric_name: impl Into<String>,
        transaction_type: impl Into<String>,
        transaction_name_template: impl Into<String>,
    ) -> Self {
        Self {
            kind: CaptureKind::Transaction,
            metric_name: metric_name.into(),
            transaction_type: transaction_type.into(),
            transaction_name_template: transaction_name_template.into(),
            ..Default::default()
        }
    }
}
