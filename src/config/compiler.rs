use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Limits applied while compiling pointcuts into advisors
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CompilerConfig {
    /// Accept `/regex/` class, method and type patterns
    #[serde(default = "default_allow_regex_patterns")]
    pub allow_regex_patterns: bool,

    /// Maximum pointcuts in one compile call (0 means unlimited)
    #[serde(default = "default_max_pointcuts")]
    pub max_pointcuts: usize,

    /// Maximum length of a single match pattern, in characters
    #[serde(default = "default_max_pattern_len")]
    pub max_pattern_len: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            allow_regex_patterns: default_allow_regex_patterns(),
            max_pointcuts: default_max_pointcuts(),
            max_pattern_len: default_max_pattern_len(),
        }
    }
}

impl CompilerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_pattern_len == 0 {
            return Err(Error::Config(ConfigError::Message(
                "max_pattern_len must be greater than 0".into(),
            )));
        }
        Ok(())
    }
}

fn default_allow_regex_patterns() -> bool {
    true
}
fn default_max_pointcuts() -> usize {
    0
}
fn default_max_pattern_len() -> usize {
    1024
}
