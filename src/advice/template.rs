//! `{{placeholder}}` templates used for trace entry messages and
//! transaction names.
//!
//! Templates are parsed once at compile time so malformed text is rejected
//! with the rest of the pointcut instead of failing inside the target call.

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    source: String,
    parts: Vec<TemplatePart>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    Literal(String),
    Placeholder(Placeholder),
}

/// A value reference such as `{{0.url}}` or `{{this.name}}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub root: PlaceholderRoot,
    /// Property path below the root, empty for the root itself
    pub path: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderRoot {
    /// Receiver of the intercepted call
    This,
    MethodName,
    /// Return value, written `{{_}}`
    Return,
    /// Zero-based argument index
    Argument(usize),
}

impl MessageTemplate {
    /// Parses template text; the error is a human readable reason
    pub fn parse(template: &str) -> Result<Self, String> {
        let mut parts = Vec::new();
        let mut rest = template;

        while let Some(open) = rest.find(OPEN) {
            if open > 0 {
                parts.push(TemplatePart::Literal(rest[..open].to_string()));
            }
            let after_open = &rest[open + OPEN.len()..];
            let close = after_open
                .find(CLOSE)
                .ok_or_else(|| format!("unterminated placeholder at `{}`", &rest[open..]))?;
            parts.push(TemplatePart::Placeholder(Placeholder::parse(&after_open[..close])?));
            rest = &after_open[close + CLOSE.len()..];
        }
        if !rest.is_empty() {
            parts.push(TemplatePart::Literal(rest.to_string()));
        }

        Ok(Self {
            source: template.to_string(),
            parts,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn parts(&self) -> &[TemplatePart] {
        &self.parts
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.parts.iter().filter_map(|part| match part {
            TemplatePart::Placeholder(placeholder) => Some(placeholder),
            TemplatePart::Literal(_) => None,
        })
    }
}

impl Placeholder {
    fn parse(text: &str) -> Result<Self, String> {
        let text = text.trim();
        if text.is_empty() {
            return Err("empty placeholder".to_string());
        }

        let mut segments = text.split('.');
        let root_text = segments.next().unwrap_or_default();
        let root = match root_text {
            "this" => PlaceholderRoot::This,
            "methodName" => PlaceholderRoot::MethodName,
            "_" => PlaceholderRoot::Return,
            index if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) => {
                let index = index
                    .parse()
                    .map_err(|_| format!("argument index `{index}` is out of range"))?;
                PlaceholderRoot::Argument(index)
            }
            other => return Err(format!("unknown placeholder root `{other}`")),
        };

        let path: Vec<String> = segments.map(str::to_string).collect();
        if path.iter().any(String::is_empty) {
            return Err(format!("empty property in placeholder `{text}`"));
        }
        if root == PlaceholderRoot::MethodName && !path.is_empty() {
            return Err("methodName does not have properties".to_string());
        }

        Ok(Self { root, path })
    }
}
