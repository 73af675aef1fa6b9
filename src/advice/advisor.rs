use std::time::Duration;

use super::MessageTemplate;
use super::MethodSignature;
use super::NameMatcher;
use super::ParameterMatcher;
use crate::CaptureKind;
use crate::MethodModifier;

/// Compiled, immutable counterpart of one pointcut spec
///
/// The weaver asks [`Advisor::matches`] for every candidate method and, on a
/// hit, attaches the [`CaptureBehavior`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisor {
    pub(super) spec_id: String,
    pub(super) spec_version: String,
    pub(super) class_matcher: NameMatcher,
    pub(super) method_matcher: NameMatcher,
    pub(super) parameter_matcher: ParameterMatcher,
    pub(super) return_type_matcher: NameMatcher,
    pub(super) modifiers: Vec<MethodModifier>,
    pub(super) capture: CaptureBehavior,
}

/// What an attached interception records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureBehavior {
    pub kind: CaptureKind,
    pub metric_name: String,
    pub message_template: Option<MessageTemplate>,
    pub stack_threshold: Option<Duration>,
    pub transaction_type: String,
    pub transaction_name_template: Option<MessageTemplate>,
    pub capture_return: bool,
    pub capture_exception: bool,
}

impl Advisor {
    pub fn spec_id(&self) -> &str {
        &self.spec_id
    }

    pub fn spec_version(&self) -> &str {
        &self.spec_version
    }

    pub fn class_matcher(&self) -> &NameMatcher {
        &self.class_matcher
    }

    pub fn method_matcher(&self) -> &NameMatcher {
        &self.method_matcher
    }

    pub fn parameter_matcher(&self) -> &ParameterMatcher {
        &self.parameter_matcher
    }

    pub fn capture(&self) -> &CaptureBehavior {
        &self.capture
    }

    pub fn message_template(&self) -> Option<&MessageTemplate> {
        self.capture.message_template.as_ref()
    }

    pub fn transaction_name_template(&self) -> Option<&MessageTemplate> {
        self.capture.transaction_name_template.as_ref()
    }

    /// Cheap pre-filter the weaver runs before inspecting methods
    pub fn matches_class(
        &self,
        class_name: &str,
    ) -> bool {
        self.class_matcher.is_match(class_name)
    }

    pub fn matches_method(
        &self,
        method: &MethodSignature,
    ) -> bool {
        self.method_matcher.is_match(&method.name)
            && self.parameter_matcher.is_match(&method.parameter_types)
            && self.return_type_matcher.is_match(&method.return_type)
            && self.modifiers.iter().all(|modifier| method.has_modifier(*modifier))
    }

    pub fn matches(
        &self,
        class_name: &str,
        method: &MethodSignature,
    ) -> bool {
        self.matches_class(class_name) && self.matches_method(method)
    }
}
