use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use dicom_dictionary_std::tags;
use tempfile::tempdir;

use dcm_organize::errors::{DatasetError, OrganizeError};
use dcm_organize::{
    Action, CancelToken, Config, DatasetReader, ErrorMode, FileOutcome, FileSource, MapTagStore,
    OrganizeJob, Organizer, Reporter, RunState,
};

/// Reads "patient|uid" text files; files starting with "BAD" are rejected.
struct FakeReader;

impl DatasetReader for FakeReader {
    type Store = MapTagStore;

    fn read(&self, path: &Path) -> Result<MapTagStore, DatasetError> {
        let text = fs::read_to_string(path).map_err(|source| DatasetError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        if text.starts_with("BAD") {
            return Err(DatasetError::NotDicom {
                path: path.to_path_buf(),
                source: "no preamble".into(),
            });
        }
        let (patient, uid) = text.split_once('|').unwrap_or((text.as_str(), ""));
        Ok(MapTagStore::new()
            .with(tags::PATIENT_NAME, patient)
            .with(tags::SOP_INSTANCE_UID, uid))
    }
}

/// `FakeReader` that takes a while on every readable file.
struct SlowReader(Duration);

impl DatasetReader for SlowReader {
    type Store = MapTagStore;

    fn read(&self, path: &Path) -> Result<MapTagStore, DatasetError> {
        let store = FakeReader.read(path)?;
        thread::sleep(self.0);
        Ok(store)
    }
}

fn count_files(dir: &Path) -> usize {
    fs::read_dir(dir)
        .map(|entries| entries.filter(|e| e.as_ref().is_ok_and(|e| e.path().is_file())).count())
        .unwrap_or(0)
}

#[derive(Default)]
struct Collect {
    ok: Mutex<Vec<FileOutcome>>,
    failed: Mutex<Vec<String>>,
    cancel_after_first: Option<CancelToken>,
}

impl Reporter for Collect {
    fn organized(&self, outcome: &FileOutcome) {
        self.ok.lock().unwrap().push(outcome.clone());
        if let Some(token) = &self.cancel_after_first {
            token.cancel();
        }
    }
    fn failed(&self, error: &OrganizeError) {
        self.failed.lock().unwrap().push(error.to_string());
    }
}

const PATTERN: &str = "{PatientName}/{SOPInstanceUID}.dcm";

fn job(target: &Path, action: Action, mode: ErrorMode, parallelism: usize) -> OrganizeJob {
    let mut cfg = Config::new(target, PATTERN);
    cfg.action = action;
    cfg.error_mode = mode;
    cfg.parallelism = parallelism;
    cfg.to_job().unwrap()
}

fn write_inputs(dir: &Path, contents: &[&str]) -> Vec<PathBuf> {
    fs::create_dir_all(dir).unwrap();
    contents
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let p = dir.join(format!("in{i}.dcm"));
            fs::write(&p, c).unwrap();
            p
        })
        .collect()
}

#[test]
fn continue_mode_processes_everything_else() {
    let td = tempdir().unwrap();
    let out = td.path().join("out");
    fs::create_dir_all(&out).unwrap();
    let inputs = write_inputs(
        &td.path().join("in"),
        &["P1|1.1", "P1|1.2", "BAD", "P2|2.1", "P2|2.2"],
    );

    let organizer = Organizer::new(job(&out, Action::Move, ErrorMode::Continue, 4), FakeReader);
    let reporter = Collect::default();
    let summary = organizer
        .run(FileSource::Paths(inputs.clone()), &reporter)
        .unwrap();

    assert_eq!(summary.state, RunState::Completed);
    assert_eq!(summary.organized, 4);
    assert_eq!(summary.failed, 1);
    assert_eq!(reporter.failed.lock().unwrap().len(), 1);
    for rel in ["P1/1.1.dcm", "P1/1.2.dcm", "P2/2.1.dcm", "P2/2.2.dcm"] {
        assert!(out.join(rel).is_file(), "missing {rel}");
    }
    assert!(inputs[2].exists(), "failed file stays where it was");
    assert!(!inputs[0].exists(), "moved file is gone from the source");
}

#[test]
fn stop_mode_returns_first_failure_and_starts_nothing_new() {
    let td = tempdir().unwrap();
    let out = td.path().join("out");
    fs::create_dir_all(&out).unwrap();
    let inputs = write_inputs(&td.path().join("in"), &["P1|1", "BAD", "P1|2", "P1|3"]);

    let organizer = Organizer::new(job(&out, Action::Move, ErrorMode::Stop, 1), FakeReader);
    let reporter = Collect::default();
    let err = organizer
        .run(FileSource::Paths(inputs.clone()), &reporter)
        .unwrap_err();

    assert!(matches!(err, OrganizeError::SourceFile { ref path, .. } if *path == inputs[1]));
    assert!(out.join("P1/1.dcm").is_file());
    assert!(!out.join("P1/2.dcm").exists());
    assert!(inputs[2].exists() && inputs[3].exists());
}

#[test]
fn cancelled_before_start_touches_nothing() {
    let td = tempdir().unwrap();
    let out = td.path().join("out");
    fs::create_dir_all(&out).unwrap();
    let inputs = write_inputs(&td.path().join("in"), &["P1|1", "P1|2"]);

    let cancel = CancelToken::new();
    cancel.cancel();
    let organizer = Organizer::new(job(&out, Action::Move, ErrorMode::Stop, 2), FakeReader)
        .with_cancel_token(cancel);
    let summary = organizer
        .run(FileSource::Paths(inputs.clone()), &Collect::default())
        .unwrap();

    assert_eq!(summary.state, RunState::Cancelled);
    assert_eq!(summary.organized, 0);
    assert!(inputs.iter().all(|p| p.exists()));
}

#[test]
fn cancel_mid_run_finishes_in_flight_file_only() {
    let td = tempdir().unwrap();
    let out = td.path().join("out");
    fs::create_dir_all(&out).unwrap();
    let inputs = write_inputs(&td.path().join("in"), &["P1|1", "P1|2", "P1|3"]);

    let organizer = Organizer::new(job(&out, Action::Move, ErrorMode::Stop, 1), FakeReader);
    let reporter = Collect {
        cancel_after_first: Some(organizer.cancel_token().clone()),
        ..Default::default()
    };
    let summary = organizer
        .run(FileSource::Paths(inputs), &reporter)
        .unwrap();

    assert_eq!(summary.state, RunState::Cancelled);
    assert_eq!(summary.organized, 1);
    assert_eq!(reporter.ok.lock().unwrap().len(), 1);
}

#[test]
fn copy_keeps_sources_and_avoids_collisions() {
    let td = tempdir().unwrap();
    let out = td.path().join("out");
    fs::create_dir_all(&out).unwrap();
    let inputs = write_inputs(&td.path().join("in"), &["P1|same", "P1|same"]);

    let organizer = Organizer::new(job(&out, Action::Copy, ErrorMode::Stop, 1), FakeReader);
    let summary = organizer
        .run(FileSource::Paths(inputs.clone()), &Collect::default())
        .unwrap();

    assert_eq!(summary.organized, 2);
    assert!(inputs.iter().all(|p| p.exists()));
    assert!(out.join("P1/same.dcm").is_file());
    assert!(out.join("P1/same (1).dcm").is_file());
}

#[test]
fn many_files_many_workers() {
    let td = tempdir().unwrap();
    let out = td.path().join("out");
    fs::create_dir_all(&out).unwrap();
    let contents: Vec<String> = (0..60).map(|i| format!("P{}|{i}", i % 5)).collect();
    let refs: Vec<&str> = contents.iter().map(String::as_str).collect();
    let inputs = write_inputs(&td.path().join("in"), &refs);

    let organizer = Organizer::new(job(&out, Action::Move, ErrorMode::Stop, 8), FakeReader);
    let summary = organizer
        .run(FileSource::Paths(inputs), &Collect::default())
        .unwrap();

    assert_eq!(summary.organized, 60);
    for i in 0..60 {
        assert!(out.join(format!("P{}/{i}.dcm", i % 5)).is_file());
    }
}

#[test]
fn stdin_lines_skip_missing_files() {
    let td = tempdir().unwrap();
    let out = td.path().join("out");
    fs::create_dir_all(&out).unwrap();
    let inputs = write_inputs(&td.path().join("in"), &["P1|1", "P1|2"]);
    let text = format!(
        "{}\r\n{}\r{}\n",
        inputs[0].display(),
        td.path().join("nope.dcm").display(),
        inputs[1].display()
    );

    let organizer = Organizer::new(job(&out, Action::Move, ErrorMode::Stop, 2), FakeReader);
    let summary = organizer
        .run(FileSource::from_reader(Cursor::new(text.into_bytes())), &Collect::default())
        .unwrap();

    assert_eq!(summary.organized, 2);
    assert_eq!(summary.skipped, 1);
}

#[test]
fn file_already_at_destination_is_left_alone() {
    let td = tempdir().unwrap();
    let out = fs::canonicalize(td.path()).unwrap();
    fs::create_dir_all(out.join("P1")).unwrap();
    let placed = out.join("P1/1.dcm");
    fs::write(&placed, "P1|1").unwrap();

    let organizer = Organizer::new(job(&out, Action::Move, ErrorMode::Stop, 1), FakeReader);
    let reporter = Collect::default();
    let summary = organizer
        .run(FileSource::Paths(vec![placed.clone()]), &reporter)
        .unwrap();

    assert_eq!(summary.organized, 0);
    assert_eq!(summary.already_in_place, 1);
    assert!(placed.is_file());
    let ok = reporter.ok.lock().unwrap();
    assert!(matches!(ok[0], FileOutcome::AlreadyInPlace { .. }));
    assert!(ok[0].to_string().starts_with("OK: "));
}

#[test]
fn missing_tag_is_a_pattern_failure() {
    let td = tempdir().unwrap();
    let out = td.path().join("out");
    fs::create_dir_all(&out).unwrap();
    let inputs = write_inputs(&td.path().join("in"), &["P1|"]);

    let organizer = Organizer::new(job(&out, Action::Move, ErrorMode::Stop, 1), FakeReader);
    let err = organizer
        .run(FileSource::Paths(inputs), &Collect::default())
        .unwrap_err();
    assert_eq!(err.kind(), "pattern");
}

#[test]
fn parallel_moves_to_one_name_never_lose_a_file() {
    for round in 0..20 {
        let td = tempdir().unwrap();
        let out = td.path().join("out");
        fs::create_dir_all(&out).unwrap();
        let src_dir = td.path().join("in");
        let inputs = write_inputs(&src_dir, &["P1|same"; 16]);

        let organizer =
            Organizer::new(job(&out, Action::Move, ErrorMode::Continue, 8), FakeReader);
        let summary = organizer
            .run(FileSource::Paths(inputs.clone()), &Collect::default())
            .unwrap();

        let placed = count_files(&out.join("P1"));
        let left = count_files(&src_dir);
        assert_eq!(summary.organized + summary.failed, 16, "round {round}");
        assert_eq!(placed, summary.organized, "round {round}");
        assert_eq!(left, summary.failed, "round {round}");
        assert_eq!(placed + left, 16, "round {round}: files lost");
    }
}

#[test]
fn parallel_stop_mode_starts_nothing_after_failure() {
    let td = tempdir().unwrap();
    let out = td.path().join("out");
    fs::create_dir_all(&out).unwrap();
    let src_dir = td.path().join("in");
    let mut contents = vec!["BAD".to_string()];
    contents.extend((0..40).map(|i| format!("P1|{i}")));
    let refs: Vec<&str> = contents.iter().map(String::as_str).collect();
    let inputs = write_inputs(&src_dir, &refs);

    let organizer = Organizer::new(
        job(&out, Action::Move, ErrorMode::Stop, 4),
        SlowReader(Duration::from_millis(25)),
    );
    let reporter = Collect::default();
    let err = organizer
        .run(FileSource::Paths(inputs.clone()), &reporter)
        .unwrap_err();

    assert_eq!(err.kind(), "source_file");
    assert_eq!(reporter.failed.lock().unwrap().len(), 1);
    assert!(inputs[0].exists());
    let placed = count_files(&out.join("P1"));
    let left = count_files(&src_dir);
    assert_eq!(placed + left, inputs.len(), "every file is either moved or untouched");
    assert_eq!(placed, reporter.ok.lock().unwrap().len());
    assert!(placed < 40, "queued files must not start after the failure");
}
