use std::sync::Arc;

use parking_lot::Mutex;
use reweave::AdviceCompiler;
use reweave::AdvisorCache;
use reweave::AdvisorGeneration;
use reweave::CaptureSpec;
use reweave::PointcutSpec;
use reweave::WeaveError;
use reweave::Weaver;

pub fn spec(
    id: &str,
    version: &str,
) -> PointcutSpec {
    PointcutSpec::new(id, version, format!("com.example.{id}.*"), "handle*")
        .with_capture(CaptureSpec::metric(id))
}

pub fn new_cache(specs: &[PointcutSpec]) -> Arc<AdvisorCache> {
    Arc::new(AdvisorCache::new(AdviceCompiler::default(), specs).expect("seed compiles"))
}

/// `(id, version)` pairs of a generation in advisor order
pub fn fingerprint(generation: &AdvisorGeneration) -> Vec<(String, String)> {
    generation
        .advisors()
        .iter()
        .map(|a| (a.spec_id().to_string(), a.spec_version().to_string()))
        .collect()
}

/// Records every generation it is asked to weave
#[derive(Default)]
pub struct RecordingWeaver {
    pub woven: Mutex<Vec<u64>>,
    pub fail_next: Mutex<bool>,
}

impl Weaver for RecordingWeaver {
    fn reweave(
        &self,
        generation: &AdvisorGeneration,
    ) -> reweave::Result<usize> {
        let mut fail_next = self.fail_next.lock();
        if *fail_next {
            *fail_next = false;
            return Err(WeaveError::ClassRejected {
                class_name: "com.example.Broken".into(),
                reason: "verifier failure".into(),
            }
            .into());
        }
        self.woven.lock().push(generation.generation());
        Ok(generation.len())
    }
}
