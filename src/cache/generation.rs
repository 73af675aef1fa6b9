use crate::Advisor;
use crate::MethodSignature;
use crate::VersionSet;

/// One atomically published pairing of advisors and the spec versions they
/// were compiled from
///
/// Never mutated after construction; a newer generation replaces it whole.
#[derive(Debug)]
pub struct AdvisorGeneration {
    pub(super) generation: u64,
    pub(super) advisors: Vec<Advisor>,
    pub(super) spec_versions: VersionSet,
}

impl AdvisorGeneration {
    /// Publication sequence number, 0 for the startup generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Advisors in pointcut order
    pub fn advisors(&self) -> &[Advisor] {
        &self.advisors
    }

    pub fn spec_versions(&self) -> &VersionSet {
        &self.spec_versions
    }

    pub fn len(&self) -> usize {
        self.advisors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.advisors.is_empty()
    }

    /// Advisors whose class pattern accepts `class_name`, in precedence order
    pub fn advisors_for_class<'a>(
        &'a self,
        class_name: &'a str,
    ) -> impl Iterator<Item = &'a Advisor> + 'a {
        self.advisors
            .iter()
            .filter(move |advisor| advisor.matches_class(class_name))
    }

    /// Advisors to attach to one method, in precedence order
    pub fn advisors_for_method<'a>(
        &'a self,
        class_name: &'a str,
        method: &'a MethodSignature,
    ) -> impl Iterator<Item = &'a Advisor> + 'a {
        self.advisors
            .iter()
            .filter(move |advisor| advisor.matches(class_name, method))
    }
}
