use std::collections::HashSet;
use std::time::Duration;

use tracing::debug;
use tracing::trace;

use super::Advisor;
use super::CaptureBehavior;
use super::MessageTemplate;
use super::NameMatcher;
use super::ParameterMatcher;
use super::PlaceholderRoot;
use crate::CaptureKind;
use crate::CompileError;
use crate::CompilerConfig;
use crate::MethodModifier;
use crate::PointcutSpec;

/// Translates pointcut specs into advisors
///
/// Compilation is pure: the same spec content always produces equal
/// advisors, so a generation can be rebuilt at any time. A single malformed
/// spec fails the whole call.
#[derive(Debug, Clone, Default)]
pub struct AdviceCompiler {
    config: CompilerConfig,
}

impl AdviceCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compiles `specs` into advisors in the same order
    pub fn compile(
        &self,
        specs: &[PointcutSpec],
    ) -> Result<Vec<Advisor>, CompileError> {
        if self.config.max_pointcuts > 0 && specs.len() > self.config.max_pointcuts {
            return Err(CompileError::TooManyPointcuts {
                count: specs.len(),
                max: self.config.max_pointcuts,
            });
        }

        let mut seen_ids = HashSet::with_capacity(specs.len());
        let mut advisors = Vec::with_capacity(specs.len());
        for spec in specs {
            if !spec.id.is_empty() && !seen_ids.insert(spec.id.as_str()) {
                return Err(CompileError::DuplicateId { id: spec.id.clone() });
            }
            advisors.push(self.compile_one(spec)?);
        }

        debug!("compiled {} advisors", advisors.len());
        Ok(advisors)
    }

    fn compile_one(
        &self,
        spec: &PointcutSpec,
    ) -> Result<Advisor, CompileError> {
        trace!("compiling pointcut {} (version {})", spec.id, spec.version);
        if spec.id.is_empty() {
            return Err(CompileError::MissingId);
        }
        let id = spec.id.as_str();
        require(id, "version", &spec.version)?;
        require(id, "class_name", &spec.class_name)?;
        require(id, "method_name", &spec.method_name)?;

        let class_matcher = self.name_matcher(id, "class_name", &spec.class_name)?;
        let method_matcher = self.name_matcher(id, "method_name", &spec.method_name)?;
        for parameter_type in &spec.method_parameter_types {
            self.check_length(id, "method_parameter_types", parameter_type)?;
        }
        let parameter_matcher = ParameterMatcher::compile(
            id,
            &spec.method_parameter_types,
            self.config.allow_regex_patterns,
        )?;
        let return_type_matcher = if spec.method_return_type.is_empty() {
            NameMatcher::Any
        } else {
            self.name_matcher(id, "method_return_type", &spec.method_return_type)?
        };

        let capture = compile_capture(spec, &parameter_matcher)?;

        let modifiers = compile_modifiers(id, &spec.method_modifiers)?;

        Ok(Advisor {
            spec_id: spec.id.clone(),
            spec_version: spec.version.clone(),
            class_matcher,
            method_matcher,
            parameter_matcher,
            return_type_matcher,
            modifiers,
            capture,
        })
    }

    fn name_matcher(
        &self,
        id: &str,
        field: &'static str,
        pattern: &str,
    ) -> Result<NameMatcher, CompileError> {
        self.check_length(id, field, pattern)?;
        NameMatcher::compile(id, field, pattern, self.config.allow_regex_patterns)
    }

    fn check_length(
        &self,
        id: &str,
        field: &'static str,
        pattern: &str,
    ) -> Result<(), CompileError> {
        if pattern.chars().count() > self.config.max_pattern_len {
            return Err(CompileError::PatternTooLong {
                id: id.to_string(),
                field,
                max: self.config.max_pattern_len,
            });
        }
        Ok(())
    }
}

fn require(
    id: &str,
    field: &'static str,
    value: &str,
) -> Result<(), CompileError> {
    if value.trim().is_empty() {
        return Err(CompileError::EmptyField {
            id: id.to_string(),
            field,
        });
    }
    Ok(())
}

/// Removes repeated modifiers, keeping first-seen order
fn compile_modifiers(
    id: &str,
    modifiers: &[MethodModifier],
) -> Result<Vec<MethodModifier>, CompileError> {
    let mut unique = Vec::with_capacity(modifiers.len());
    for modifier in modifiers {
        if !unique.contains(modifier) {
            unique.push(*modifier);
        }
    }
    if unique.contains(&MethodModifier::Static) && unique.contains(&MethodModifier::NotStatic) {
        return Err(CompileError::ConflictingModifiers {
            id: id.to_string(),
            first: MethodModifier::Static.as_str(),
            second: MethodModifier::NotStatic.as_str(),
        });
    }
    Ok(unique)
}

fn unsupported(
    id: &str,
    reason: impl Into<String>,
) -> CompileError {
    CompileError::UnsupportedCapture {
        id: id.to_string(),
        reason: reason.into(),
    }
}

fn compile_capture(
    spec: &PointcutSpec,
    parameters: &ParameterMatcher,
) -> Result<CaptureBehavior, CompileError> {
    let id = spec.id.as_str();
    let capture = &spec.capture;
    let kind = capture.kind;

    if kind != CaptureKind::Other {
        require(id, "capture.metric_name", &capture.metric_name)?;
    } else if !capture.metric_name.is_empty() {
        return Err(unsupported(id, "metric_name requires a timed capture kind"));
    }

    if kind == CaptureKind::TraceEntry {
        require(id, "capture.message_template", &capture.message_template)?;
    } else if !capture.message_template.is_empty() {
        return Err(unsupported(id, "message_template requires kind trace_entry"));
    }
    if kind != CaptureKind::TraceEntry && capture.stack_threshold_millis.is_some() {
        return Err(unsupported(id, "stack_threshold_millis requires kind trace_entry"));
    }

    if kind == CaptureKind::Transaction {
        require(id, "capture.transaction_type", &capture.transaction_type)?;
        require(
            id,
            "capture.transaction_name_template",
            &capture.transaction_name_template,
        )?;
    } else if !capture.transaction_type.is_empty() || !capture.transaction_name_template.is_empty() {
        return Err(unsupported(id, "transaction fields require kind transaction"));
    }

    let message_template = compile_template(spec, parameters, &capture.message_template)?;
    let transaction_name_template =
        compile_template(spec, parameters, &capture.transaction_name_template)?;

    Ok(CaptureBehavior {
        kind,
        metric_name: capture.metric_name.clone(),
        message_template,
        stack_threshold: capture.stack_threshold_millis.map(Duration::from_millis),
        transaction_type: capture.transaction_type.clone(),
        transaction_name_template,
        capture_return: capture.capture_return,
        capture_exception: capture.capture_exception,
    })
}

fn compile_template(
    spec: &PointcutSpec,
    parameters: &ParameterMatcher,
    text: &str,
) -> Result<Option<MessageTemplate>, CompileError> {
    if text.is_empty() {
        return Ok(None);
    }
    let invalid = |reason: String| CompileError::InvalidTemplate {
        id: spec.id.clone(),
        template: text.to_string(),
        reason,
    };

    let template = MessageTemplate::parse(text).map_err(invalid)?;
    for placeholder in template.placeholders() {
        match placeholder.root {
            PlaceholderRoot::Return if !spec.capture.capture_return => {
                return Err(invalid(
                    "{{_}} requires capture_return to be enabled".to_string(),
                ));
            }
            PlaceholderRoot::Argument(index) => {
                if let Some(max) = parameters.max_arity() {
                    if index >= max {
                        return Err(invalid(format!(
                            "argument {index} is out of range for {max} declared parameters"
                        )));
                    }
                }
            }
            _ => {}
        }
    }
    Ok(Some(template))
}
