use dupfold::error::PipelineError;
use dupfold::pipeline::Pipeline;
use dupfold::progress::ProgressCallback;
use dupfold::scanner::ExtensionFilter;
use filetime::FileTime;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

fn pipeline(dest: &Path) -> Pipeline {
    Pipeline::new(ExtensionFilter::new(["bin"]), dest)
}

/// Snapshot of a flat directory: file name to contents.
fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let entry = entry.unwrap();
            (
                entry.file_name().to_string_lossy().into_owned(),
                fs::read(entry.path()).unwrap(),
            )
        })
        .collect()
}

#[derive(Default)]
struct PhaseRecorder {
    phases: Mutex<Vec<String>>,
}

impl ProgressCallback for PhaseRecorder {
    fn on_phase_start(&self, phase: &str, _total: usize) {
        self.phases.lock().unwrap().push(phase.to_string());
    }

    fn on_progress(&self, _current: usize, _path: &str) {}

    fn on_phase_end(&self, _phase: &str) {}
}

#[test]
fn test_pipeline_end_to_end() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    fs::write(src.path().join("a.bin"), b"X").unwrap();
    fs::write(src.path().join("b.bin"), b"X").unwrap();
    fs::write(src.path().join("c.bin"), b"Y").unwrap();
    fs::write(src.path().join("d.txt"), b"X").unwrap();

    let summary = pipeline(dest.path()).run(src.path()).unwrap();

    let expected: BTreeMap<String, Vec<u8>> = [
        ("a.bin".to_string(), b"X".to_vec()),
        ("b.bin".to_string(), b"X".to_vec()),
        ("c.bin".to_string(), b"Y".to_vec()),
    ]
    .into_iter()
    .collect();
    assert_eq!(snapshot(dest.path()), expected);
    assert_eq!(summary.materialize.total_copied(), 3);
    assert_eq!(summary.tracked_bytes, 3);
}

#[test]
fn test_pipeline_runs_phases_in_order() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    fs::write(src.path().join("a.bin"), b"X").unwrap();
    fs::write(src.path().join("b.bin"), b"X").unwrap();

    let recorder = Arc::new(PhaseRecorder::default());
    pipeline(dest.path())
        .with_progress_callback(recorder.clone())
        .run(src.path())
        .unwrap();

    let phases = recorder.phases.lock().unwrap().clone();
    assert_eq!(
        phases,
        vec![
            "walking".to_string(),
            "hashing".to_string(),
            "copying duplicates".to_string(),
            "copying originals".to_string(),
        ]
    );
}

#[test]
fn test_pipeline_is_deterministic() {
    let src = tempdir().unwrap();
    for (name, content) in [
        ("m.bin", &b"same"[..]),
        ("k.bin", b"same"),
        ("z.bin", b"diff"),
        ("q.bin", b"longer one"),
    ] {
        fs::write(src.path().join(name), content).unwrap();
    }

    let dest1 = tempdir().unwrap();
    let dest2 = tempdir().unwrap();
    let first = pipeline(dest1.path()).run(src.path()).unwrap();
    let second = pipeline(dest2.path()).run(src.path()).unwrap();

    assert_eq!(snapshot(dest1.path()), snapshot(dest2.path()));
    assert_eq!(first.resolve, second.resolve);
    assert_eq!(first.materialize, second.materialize);
}

#[test]
fn test_pipeline_rerun_leaves_originals_untouched() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    fs::write(src.path().join("solo.bin"), b"only one").unwrap();

    pipeline(dest.path()).run(src.path()).unwrap();

    let mtime = FileTime::from_unix_time(1_234_567, 0);
    filetime::set_file_mtime(dest.path().join("solo.bin"), mtime).unwrap();

    let summary = pipeline(dest.path()).run(src.path()).unwrap();

    assert_eq!(summary.materialize.originals_copied, 0);
    assert_eq!(summary.materialize.originals_skipped, 1);
    let meta = fs::metadata(dest.path().join("solo.bin")).unwrap();
    assert_eq!(FileTime::from_last_modification_time(&meta), mtime);
}

#[test]
fn test_pipeline_same_basename_collision() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    fs::create_dir_all(src.path().join("p")).unwrap();
    fs::create_dir_all(src.path().join("q")).unwrap();
    fs::write(src.path().join("p").join("f.bin"), b"twin").unwrap();
    fs::write(src.path().join("q").join("f.bin"), b"twin").unwrap();

    let summary = pipeline(dest.path()).run(src.path()).unwrap();

    assert_eq!(summary.materialize.duplicates_copied, 2);
    assert_eq!(summary.materialize.originals_skipped, 2);
    assert_eq!(snapshot(dest.path()).len(), 1);
    assert_eq!(fs::read(dest.path().join("f.bin")).unwrap(), b"twin");
}

#[test]
fn test_pipeline_empty_tree() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();

    let summary = pipeline(dest.path()).run(src.path()).unwrap();

    assert_eq!(summary.tracked_files, 0);
    assert_eq!(summary.materialize.total_copied(), 0);
    assert!(snapshot(dest.path()).is_empty());
}

#[test]
fn test_pipeline_missing_destination() {
    let src = tempdir().unwrap();
    let parent = tempdir().unwrap();
    let dest = parent.path().join("dest_files");
    fs::write(src.path().join("a.bin"), b"x").unwrap();

    let err = pipeline(&dest).run(src.path()).unwrap_err();

    assert!(matches!(err, PipelineError::Copy(_)));
    assert!(!dest.exists());
}

#[test]
fn test_pipeline_error_message_names_path() {
    let dest = tempdir().unwrap();
    let missing = dest.path().join("no_such_root");

    let err = pipeline(dest.path()).run(&missing).unwrap_err();

    assert!(err.to_string().contains("no_such_root"));
}

#[cfg(unix)]
#[test]
fn test_pipeline_keeps_source_hardlinked_into_destination() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    fs::write(src.path().join("a.bin"), b"precious").unwrap();
    fs::write(src.path().join("b.bin"), b"precious").unwrap();
    fs::hard_link(src.path().join("a.bin"), dest.path().join("a.bin")).unwrap();

    let summary = pipeline(dest.path()).run(src.path()).unwrap();

    assert_eq!(summary.materialize.duplicates_copied, 1);
    assert_eq!(fs::read(src.path().join("a.bin")).unwrap(), b"precious");
    assert_eq!(fs::read(dest.path().join("a.bin")).unwrap(), b"precious");
    assert_eq!(fs::read(dest.path().join("b.bin")).unwrap(), b"precious");
}
