use regex::Regex;

use crate::CompileError;
use crate::MethodModifier;
use crate::ANY_REMAINING_PARAMETERS;

/// Compiled name pattern
///
/// Equality compares the source pattern, so recompiling identical spec
/// content yields equal matchers even though the regex objects differ.
#[derive(Debug, Clone)]
pub enum NameMatcher {
    /// Matches every name, used for omitted optional patterns
    Any,
    Exact(String),
    Pattern { source: String, regex: Regex },
}

impl PartialEq for NameMatcher {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        match (self, other) {
            (NameMatcher::Any, NameMatcher::Any) => true,
            (NameMatcher::Exact(left), NameMatcher::Exact(right)) => left == right,
            (NameMatcher::Pattern { source: left, .. }, NameMatcher::Pattern { source: right, .. }) => {
                left == right
            }
            _ => false,
        }
    }
}

impl Eq for NameMatcher {}

impl NameMatcher {
    /// Compiles a literal, `*` glob or `/regex/` pattern
    ///
    /// Globs and regexes are anchored at both ends.
    pub(crate) fn compile(
        id: &str,
        field: &'static str,
        pattern: &str,
        allow_regex: bool,
    ) -> Result<Self, CompileError> {
        let regex_source = if is_regex_literal(pattern) {
            if !allow_regex {
                return Err(CompileError::RegexNotAllowed {
                    id: id.to_string(),
                    field,
                    pattern: pattern.to_string(),
                });
            }
            format!("^(?:{})$", &pattern[1..pattern.len() - 1])
        } else if pattern.contains('*') {
            let escaped: Vec<String> = pattern.split('*').map(regex::escape).collect();
            format!("^{}$", escaped.join(".*"))
        } else {
            return Ok(NameMatcher::Exact(pattern.to_string()));
        };

        let regex = Regex::new(&regex_source).map_err(|e| CompileError::InvalidPattern {
            id: id.to_string(),
            field,
            pattern: pattern.to_string(),
            source: Box::new(e),
        })?;
        Ok(NameMatcher::Pattern {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn is_match(
        &self,
        name: &str,
    ) -> bool {
        match self {
            NameMatcher::Any => true,
            NameMatcher::Exact(expected) => expected == name,
            NameMatcher::Pattern { regex, .. } => regex.is_match(name),
        }
    }

    /// Pattern text as written in the pointcut, empty for [`NameMatcher::Any`]
    pub fn as_str(&self) -> &str {
        match self {
            NameMatcher::Any => "",
            NameMatcher::Exact(name) => name,
            NameMatcher::Pattern { source, .. } => source,
        }
    }
}

fn is_regex_literal(pattern: &str) -> bool {
    pattern.len() >= 2 && pattern.starts_with('/') && pattern.ends_with('/')
}

/// Positional parameter type matcher with optional trailing wildcard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterMatcher {
    positional: Vec<NameMatcher>,
    any_remaining: bool,
}

impl ParameterMatcher {
    pub(crate) fn compile(
        id: &str,
        parameter_types: &[String],
        allow_regex: bool,
    ) -> Result<Self, CompileError> {
        let mut positional = Vec::with_capacity(parameter_types.len());
        let mut any_remaining = false;

        for (index, parameter_type) in parameter_types.iter().enumerate() {
            if parameter_type == ANY_REMAINING_PARAMETERS {
                if index != parameter_types.len() - 1 {
                    return Err(CompileError::MisplacedVarargs { id: id.to_string() });
                }
                any_remaining = true;
                continue;
            }
            if parameter_type.is_empty() {
                return Err(CompileError::EmptyField {
                    id: id.to_string(),
                    field: "method_parameter_types",
                });
            }
            positional.push(NameMatcher::compile(
                id,
                "method_parameter_types",
                parameter_type,
                allow_regex,
            )?);
        }

        Ok(Self {
            positional,
            any_remaining,
        })
    }

    pub fn is_match(
        &self,
        parameter_types: &[String],
    ) -> bool {
        let arity_ok = if self.any_remaining {
            parameter_types.len() >= self.positional.len()
        } else {
            parameter_types.len() == self.positional.len()
        };
        arity_ok
            && self
                .positional
                .iter()
                .zip(parameter_types)
                .all(|(matcher, parameter_type)| matcher.is_match(parameter_type))
    }

    /// Number of parameters a matched method is guaranteed to have
    pub fn guaranteed_arity(&self) -> usize {
        self.positional.len()
    }

    /// Upper bound on parameters, `None` when trailing `..` is present
    pub fn max_arity(&self) -> Option<usize> {
        if self.any_remaining {
            None
        } else {
            Some(self.positional.len())
        }
    }
}

/// Candidate method presented by the weaver
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: String,
    pub parameter_types: Vec<String>,
    pub return_type: String,
    pub is_public: bool,
    pub is_static: bool,
}

impl MethodSignature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: "void".to_string(),
            is_public: true,
            ..Default::default()
        }
    }

    pub fn with_parameters<I, S>(
        mut self,
        parameter_types: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameter_types = parameter_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn returning(
        mut self,
        return_type: impl Into<String>,
    ) -> Self {
        self.return_type = return_type.into();
        self
    }

    pub fn with_visibility(
        mut self,
        is_public: bool,
    ) -> Self {
        self.is_public = is_public;
        self
    }

    pub fn with_static(
        mut self,
        is_static: bool,
    ) -> Self {
        self.is_static = is_static;
        self
    }

    pub(crate) fn has_modifier(
        &self,
        modifier: MethodModifier,
    ) -> bool {
        match modifier {
            MethodModifier::Public => self.is_public,
            MethodModifier::Static => self.is_static,
            MethodModifier::NotStatic => !self.is_static,
        }
    }
}
