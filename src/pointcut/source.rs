use std::path::Path;
use std::path::PathBuf;

#[cfg(test)]
use mockall::automock;
use config::Config;
use config::File;
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::debug;

use super::PointcutSpec;
use crate::Result;
use crate::SourceError;

/// Authoritative supplier of the user-editable pointcut list
///
/// The configuration store owns persistence and version assignment; the
/// cache only ever reads from it.
#[cfg_attr(test, automock)]
pub trait PointcutSource: Send + Sync {
    /// Returns the current pointcut list in configured order
    fn load(&self) -> Result<Vec<PointcutSpec>>;
}

#[derive(Debug, Deserialize)]
struct PointcutFile {
    #[serde(default)]
    pointcuts: Vec<PointcutSpec>,
}

/// Reads `[[pointcuts]]` tables from a configuration file on every load
///
/// ```toml
/// [[pointcuts]]
/// id = "jdbc-execute"
/// version = "7"
/// class_name = "java.sql.Statement"
/// method_name = "execute*"
/// method_parameter_types = ["java.lang.String", ".."]
///
/// [pointcuts.capture]
/// kind = "trace_entry"
/// metric_name = "jdbc execute"
/// message_template = "jdbc execution: {{0}}"
/// ```
#[derive(Debug, Clone)]
pub struct FilePointcutSource {
    path: PathBuf,
}

impl FilePointcutSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PointcutSource for FilePointcutSource {
    fn load(&self) -> Result<Vec<PointcutSpec>> {
        let load_error = |source| SourceError::Load {
            path: self.path.display().to_string(),
            source,
        };

        let file: PointcutFile = Config::builder()
            .add_source(File::from(self.path.as_path()).required(true))
            .build()
            .map_err(load_error)?
            .try_deserialize()
            .map_err(load_error)?;

        debug!(
            "loaded {} pointcuts from {}",
            file.pointcuts.len(),
            self.path.display()
        );
        Ok(file.pointcuts)
    }
}

/// In-memory pointcut list for embedders that push configuration changes
#[derive(Debug, Default)]
pub struct StaticPointcutSource {
    pointcuts: RwLock<Vec<PointcutSpec>>,
}

impl StaticPointcutSource {
    pub fn new(pointcuts: Vec<PointcutSpec>) -> Self {
        Self {
            pointcuts: RwLock::new(pointcuts),
        }
    }

    /// Replaces the whole list, returning the previous one
    pub fn replace(
        &self,
        pointcuts: Vec<PointcutSpec>,
    ) -> Vec<PointcutSpec> {
        std::mem::replace(&mut *self.pointcuts.write(), pointcuts)
    }
}

impl PointcutSource for StaticPointcutSource {
    fn load(&self) -> Result<Vec<PointcutSpec>> {
        Ok(self.pointcuts.read().clone())
    }
}
