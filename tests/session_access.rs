//! Integration tests for field access through a session.
//! Tests: field binding, last-used resolution, record reader hand-off.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use fieldindex_core::{
    CallArg, CollectionLayout, ContainerLayout, DetectorId, DiagnosticKind, FieldAccess,
    FieldClass, FieldIndexError, FieldKind, Filter, IndexConfig, RecordLayout, RecordReader,
    Result, Session,
};
use serde_json::{Value, json};
use tempfile::TempDir;

fn write_json(dir: &Path, name: &str, layout: &ContainerLayout) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_vec(layout).unwrap()).unwrap();
    path
}

/// A data file with general and per-detector records, plus a filter file.
fn loaded_session(dir: &TempDir) -> Session {
    let data = ContainerLayout::new()
        .with_collection(
            CollectionLayout::new("calibevent")
                .with_record(RecordLayout::new("calibevent", ["EventNumber", "SeriesNumber"])),
        )
        .with_collection(
            CollectionLayout::new("rqDir")
                .with_record(RecordLayout::new("zip1", ["PTNFchisq", "EventNumber"]))
                .with_record(RecordLayout::new("zip5", ["PTNFchisq"])),
        );
    let cuts = ContainerLayout::new()
        .with_collection(
            CollectionLayout::new("cutInfoDir").with_record(RecordLayout::new("info", ["Version"])),
        )
        .with_collection(
            CollectionLayout::new("cutDir")
                .with_record(RecordLayout::new("cutsGeneral", ["cGoodEv"]))
                .with_record(RecordLayout::new("cutsZip1", ["cChi2"]))
                .with_record(RecordLayout::new("cutsZip5", ["cChi2"])),
        );
    let data_path = write_json(dir.path(), "data.json", &data);
    let cut_path = write_json(dir.path(), "cuts.json", &cuts);

    let mut session = Session::new(IndexConfig::default()).unwrap();
    session.add_data_files([data_path]).unwrap();
    session.add_filter_files([cut_path]).unwrap();
    session
}

/// Records every access it is asked to read.
#[derive(Default)]
struct RecordingReader {
    seen: RefCell<Vec<FieldAccess>>,
}

impl RecordReader for RecordingReader {
    fn read(&self, access: &FieldAccess) -> Result<Vec<Value>> {
        self.seen.borrow_mut().push(access.clone());
        Ok(access
            .location
            .files()
            .iter()
            .map(|file| json!({"file": file, "record": access.location.record()}))
            .collect())
    }
}

#[test]
fn fields_bind_one_class_per_name() {
    let dir = TempDir::new().unwrap();
    let session = loaded_session(&dir);

    let classes: Vec<(String, FieldClass)> = session
        .fields()
        .unwrap()
        .into_iter()
        .map(|handle| (handle.name().to_string(), handle.class()))
        .collect();
    assert_eq!(
        classes,
        [
            ("EventNumber".to_string(), FieldClass::GeneralData),
            ("PTNFchisq".to_string(), FieldClass::DetectorData),
            ("SeriesNumber".to_string(), FieldClass::GeneralData),
            ("cChi2".to_string(), FieldClass::DetectorFilter),
            ("cGoodEv".to_string(), FieldClass::GeneralFilter),
        ]
    );
    let err = session.field("Version").unwrap_err();
    assert!(matches!(err, FieldIndexError::NotFound { .. }));
}

#[test]
fn general_data_picks_up_last_filter() {
    let dir = TempDir::new().unwrap();
    let mut session = loaded_session(&dir);
    session.state_mut().set_last_filter("qualityCut");

    let handle = session.field("EventNumber").unwrap();
    let access = session.access(&handle, Vec::new()).unwrap();
    assert_eq!(access.filter, Some(Filter::from("qualityCut")));
    assert_eq!(access.detector, DetectorId::GENERAL);
    assert_eq!(access.location.collection(), "calibevent");
}

#[test]
fn detector_data_single_valid_detector_without_filter() {
    let dir = TempDir::new().unwrap();
    let mut session = loaded_session(&dir);

    let handle = session.field("PTNFchisq").unwrap();
    let access = session.access(&handle, vec![CallArg::from(1105)]).unwrap();
    assert_eq!(access.detector, DetectorId::new(1105));
    assert_eq!(access.filter, None);
    assert_eq!(access.location.record(), "zip5");
    assert!(access.diagnostics.is_empty());
}

#[test]
fn detector_data_remembers_pair_across_calls() {
    let dir = TempDir::new().unwrap();
    let mut session = loaded_session(&dir);
    let handle = session.field("PTNFchisq").unwrap();

    let first = session
        .access(&handle, vec![1101.into(), "cutA".into()])
        .unwrap();
    let second = session.access(&handle, Vec::new()).unwrap();
    assert_eq!(second.detector, first.detector);
    assert_eq!(second.filter, first.filter);
    assert_eq!(second.filter, Some(Filter::from("cutA")));

    // Another field reuses the same last-used state.
    let cut = session.field("cChi2").unwrap();
    let access = session.access(&cut, Vec::new()).unwrap();
    assert_eq!(access.detector, DetectorId::new(1101));
    assert_eq!(access.kind, FieldKind::Filter);
    assert_eq!(access.filter, None);
}

#[test]
fn detector_filter_without_any_detector_is_surfaced() {
    let dir = TempDir::new().unwrap();
    let mut session = loaded_session(&dir);
    let cut = session.field("cChi2").unwrap();

    let err = session.access(&cut, vec![9999.into()]).unwrap_err();
    assert!(matches!(err, FieldIndexError::MissingDetector { ref field } if field == "cChi2"));

    session.state_mut().set_last_detector(1105).unwrap();
    let access = session.access(&cut, vec![9999.into()]).unwrap();
    assert_eq!(access.detector, DetectorId::new(1105));
    assert_eq!(
        access.diagnostics[0].kind,
        DiagnosticKind::InvalidDetectorFallback
    );
}

#[test]
fn resolved_detector_without_entry_is_not_found() {
    let dir = TempDir::new().unwrap();
    let mut session = loaded_session(&dir);
    let handle = session.field("PTNFchisq").unwrap();

    let err = session.access(&handle, vec![1103.into()]).unwrap_err();
    assert!(matches!(err, FieldIndexError::NotFound { .. }));
    // The detector was still remembered: it is valid, only this field lacks it.
    assert_eq!(session.state().last_detector(), Some(DetectorId::new(1103)));
}

#[test]
fn general_filter_ignores_arguments_and_reads() {
    let dir = TempDir::new().unwrap();
    let mut session = loaded_session(&dir);
    let reader = RecordingReader::default();
    let handle = session.field("cGoodEv").unwrap();

    let values = session
        .read(&handle, vec![1101.into(), json!({"cut": true}).into()], &reader)
        .unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0]["record"], "cutsGeneral");

    let seen = reader.seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].diagnostics[0].kind, DiagnosticKind::IgnoredArguments);
    assert_eq!(session.state().last_detector(), None);
}

#[test]
fn reader_receives_resolved_filter() {
    let dir = TempDir::new().unwrap();
    let mut session = loaded_session(&dir);
    let reader = RecordingReader::default();
    let handle = session.field("PTNFchisq").unwrap();

    session.state_mut().set_last_detector(1101).unwrap();
    session
        .read(&handle, vec![json!(["cGoodEv", "cChi2"]).into()], &reader)
        .unwrap();

    let seen = reader.seen.borrow();
    assert_eq!(seen[0].detector, DetectorId::new(1101));
    assert_eq!(seen[0].filter, Some(Filter::new(json!(["cGoodEv", "cChi2"]))));
    assert_eq!(seen[0].diagnostics[0].kind, DiagnosticKind::AmbiguousArgument);
}

#[test]
fn config_file_drives_detector_set_and_token() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("fieldindex.json");
    std::fs::write(
        &config_path,
        r#"{"valid_detectors": [1, 2, 3], "detector_token": "tower", "detector_base": 0}"#,
    )
    .unwrap();
    let err = IndexConfig::from_json_file(&config_path).unwrap_err();
    assert!(matches!(err, FieldIndexError::Config { .. }));

    std::fs::write(
        &config_path,
        r#"{"valid_detectors": [2, 3], "detector_token": "tower", "detector_base": 0}"#,
    )
    .unwrap();
    let config = IndexConfig::from_json_file(&config_path).unwrap();
    let layout = ContainerLayout::new().with_collection(
        CollectionLayout::new("towers")
            .with_record(RecordLayout::new("tower2", ["Adc"]))
            .with_record(RecordLayout::new("zip3", ["Adc"])),
    );
    let data_path = write_json(dir.path(), "towers.json", &layout);

    let mut session = Session::new(config).unwrap();
    session.add_data_files([&data_path]).unwrap();
    assert_eq!(
        session.index().detectors_of(FieldKind::Data, "Adc").unwrap(),
        [DetectorId::GENERAL, DetectorId::new(2)]
    );
    let handle = session.field("Adc").unwrap();
    let access = session.access(&handle, vec![2.into()]).unwrap();
    assert_eq!(access.location.record(), "tower2");
}
