use std::path::Path;
use std::sync::Arc;

use reweave::AgentConfig;
use reweave::Error;
use reweave::ReweaveCoordinatorBuilder;
use reweave::ReweaveOutcome;

use crate::common::RecordingWeaver;

fn write_pointcuts(
    path: &Path,
    version: &str,
    method: &str,
) {
    std::fs::write(
        path,
        format!(
            r#"
            [[pointcuts]]
            id = "checkout"
            version = "{version}"
            class_name = "com.example.shop.*"
            method_name = "{method}"
            method_parameter_types = ["java.lang.String", ".."]

            [pointcuts.capture]
            kind = "trace_entry"
            metric_name = "checkout"
            message_template = "checkout {{{{0}}}}"
            "#
        ),
    )
    .unwrap();
}

#[test]
fn edited_pointcut_file_is_reweaved_once() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("pointcuts.toml");
    write_pointcuts(&path, "1", "checkout");

    let mut config = AgentConfig::default();
    config.reweave.pointcuts_path = Some(path.clone());
    let weaver = Arc::new(RecordingWeaver::default());
    let coordinator = ReweaveCoordinatorBuilder::new(config, weaver.clone())
        .build()
        .unwrap();
    let supplier = coordinator.cache().supplier();

    assert_eq!(
        coordinator.on_config_changed().unwrap(),
        ReweaveOutcome::InSync { generation: 0 }
    );

    write_pointcuts(&path, "2", "pay*");
    let outcome = coordinator.on_config_changed().unwrap();

    assert_eq!(
        outcome,
        ReweaveOutcome::Reweaved {
            generation: 1,
            classes: 1
        }
    );
    assert_eq!(*weaver.woven.lock(), vec![1]);
    let current = supplier.get();
    assert_eq!(current.advisors()[0].method_matcher().as_str(), "pay*");

    assert_eq!(
        coordinator.on_config_changed().unwrap(),
        ReweaveOutcome::InSync { generation: 1 }
    );
    assert_eq!(weaver.woven.lock().len(), 1);
}

#[test]
fn broken_edit_leaves_instrumentation_untouched() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("pointcuts.toml");
    write_pointcuts(&path, "1", "checkout");

    let mut config = AgentConfig::default();
    config.reweave.pointcuts_path = Some(path.clone());
    let weaver = Arc::new(RecordingWeaver::default());
    let coordinator = ReweaveCoordinatorBuilder::new(config, weaver.clone())
        .build()
        .unwrap();

    write_pointcuts(&path, "2", "/pay(/");
    let result = coordinator.on_config_changed();

    assert!(matches!(result, Err(Error::Compile(_))));
    assert_eq!(coordinator.cache().current_advisors().generation(), 0);
    assert!(weaver.woven.lock().is_empty());
}

#[test]
fn unreadable_pointcut_file_is_a_source_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("pointcuts.toml");
    write_pointcuts(&path, "1", "checkout");

    let mut config = AgentConfig::default();
    config.reweave.pointcuts_path = Some(path.clone());
    let coordinator =
        ReweaveCoordinatorBuilder::new(config, Arc::new(RecordingWeaver::default()))
            .build()
            .unwrap();

    std::fs::remove_file(&path).unwrap();

    assert!(matches!(
        coordinator.on_config_changed(),
        Err(Error::Source(_))
    ));
    assert_eq!(coordinator.cache().current_advisors().len(), 1);
}

#[test]
fn weave_failure_is_retried_on_next_event() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("pointcuts.toml");
    write_pointcuts(&path, "1", "checkout");

    let mut config = AgentConfig::default();
    config.reweave.pointcuts_path = Some(path.clone());
    let weaver = Arc::new(RecordingWeaver::default());
    let coordinator = ReweaveCoordinatorBuilder::new(config, weaver.clone())
        .build()
        .unwrap();

    write_pointcuts(&path, "2", "checkout");
    *weaver.fail_next.lock() = true;
    assert!(matches!(
        coordinator.on_config_changed(),
        Err(Error::Weave(_))
    ));

    assert_eq!(
        coordinator.on_config_changed().unwrap(),
        ReweaveOutcome::Reweaved {
            generation: 1,
            classes: 1
        }
    );
    assert_eq!(*weaver.woven.lock(), vec![1]);
}
