use std::collections::HashSet;

use sha2::Digest;
use sha2::Sha256;

use super::PointcutSpec;

/// Unordered set of spec versions a generation was compiled from
///
/// Drift is decided by set equality, so reordering a pointcut list or
/// listing the same spec twice never counts as a change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionSet(HashSet<String>);

impl VersionSet {
    pub fn from_specs(specs: &[PointcutSpec]) -> Self {
        Self(specs.iter().map(|spec| spec.version.clone()).collect())
    }

    pub fn contains(
        &self,
        version: &str,
    ) -> bool {
        self.0.contains(version)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for VersionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl PointcutSpec {
    /// SHA-256 hex digest over every field except `version`
    ///
    /// Stores that do not track their own version tokens can use this to
    /// assign one. Fields are length-prefixed so adjacent values never alias.
    pub fn content_version(&self) -> String {
        let mut hasher = Sha256::new();
        update_field(&mut hasher, self.id.as_bytes());
        update_field(&mut hasher, self.class_name.as_bytes());
        update_field(&mut hasher, self.method_name.as_bytes());

        update_len(&mut hasher, self.method_parameter_types.len());
        for parameter_type in &self.method_parameter_types {
            update_field(&mut hasher, parameter_type.as_bytes());
        }
        update_field(&mut hasher, self.method_return_type.as_bytes());

        update_len(&mut hasher, self.method_modifiers.len());
        for modifier in &self.method_modifiers {
            update_field(&mut hasher, modifier.as_str().as_bytes());
        }

        let capture = &self.capture;
        update_field(&mut hasher, capture.kind.as_str().as_bytes());
        update_field(&mut hasher, capture.metric_name.as_bytes());
        update_field(&mut hasher, capture.message_template.as_bytes());
        match capture.stack_threshold_millis {
            Some(millis) => update_field(&mut hasher, &millis.to_le_bytes()),
            None => update_field(&mut hasher, &[]),
        }
        update_field(&mut hasher, capture.transaction_type.as_bytes());
        update_field(&mut hasher, capture.transaction_name_template.as_bytes());
        update_field(
            &mut hasher,
            &[capture.capture_return as u8, capture.capture_exception as u8],
        );

        hex::encode(hasher.finalize())
    }
}

fn update_len(
    hasher: &mut Sha256,
    len: usize,
) {
    hasher.update((len as u64).to_le_bytes());
}

fn update_field(
    hasher: &mut Sha256,
    value: &[u8],
) {
    update_len(hasher, value.len());
    hasher.update(value);
}
