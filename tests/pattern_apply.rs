use dicom_dictionary_std::tags;
use uuid::Uuid;

use dcm_organize::errors::PatternError;
use dcm_organize::{MapTagStore, Template, apply};

#[test]
fn simple_pattern() {
    let store = MapTagStore::new()
        .with(tags::ACCESSION_NUMBER, "ABC123")
        .with(tags::INSTANCE_NUMBER, "7");
    let file = apply(&store, "{AccessionNumber}/{InstanceNumber}.dcm").unwrap();
    assert_eq!(file, "ABC123/7.dcm");
}

#[test]
fn complex_pattern_with_literals_and_person_name() {
    let store = MapTagStore::new()
        .with(tags::PATIENT_NAME, "Samson^Gert")
        .with(tags::ACCESSION_NUMBER, "ABC123")
        .with(tags::SERIES_NUMBER, "20")
        .with(tags::INSTANCE_NUMBER, "7");
    let pattern = "Patient {PatientName}/Study {AccessionNumber}/Series {SeriesNumber}/Image {InstanceNumber}.dcm";
    let file = apply(&store, pattern).unwrap();
    assert_eq!(file, "Patient Samson Gert/Study ABC123/Series 20/Image 7.dcm");
}

#[test]
fn fallback_uses_first_present_value() {
    let store = MapTagStore::new()
        .with(tags::SOP_INSTANCE_UID, "1.2.3")
        .with(tags::INSTANCE_NUMBER, "10");
    assert_eq!(
        apply(&store, "{InstanceNumber ?? SOPInstanceUID}.dcm").unwrap(),
        "10.dcm"
    );
}

#[test]
fn fallback_used_when_first_is_absent() {
    let store = MapTagStore::new().with(tags::SOP_INSTANCE_UID, "1.2.3");
    assert_eq!(
        apply(&store, "{InstanceNumber ?? SOPInstanceUID}.dcm").unwrap(),
        "1.2.3.dcm"
    );
}

#[test]
fn empty_value_counts_as_absent() {
    let store = MapTagStore::new()
        .with(tags::INSTANCE_NUMBER, "  ")
        .with(tags::SOP_INSTANCE_UID, "1.2.3");
    assert_eq!(
        apply(&store, "{InstanceNumber ?? SOPInstanceUID}.dcm").unwrap(),
        "1.2.3.dcm"
    );
}

#[test]
fn guid_in_file_name() {
    let store = MapTagStore::new().with(tags::SOP_INSTANCE_UID, "1.2.3");
    let file = apply(&store, "{Guid}.dcm").unwrap();
    let id = file.strip_suffix(".dcm").unwrap();
    assert!(Uuid::parse_str(id).is_ok(), "not a uuid: {id}");
}

#[test]
fn guid_is_fresh_per_expansion() {
    let store = MapTagStore::new();
    let template = Template::parse("{Guid}.dcm");
    assert_ne!(template.apply(&store).unwrap(), template.apply(&store).unwrap());
}

#[test]
fn unknown_tag_name_fails() {
    let store = MapTagStore::new().with(tags::SOP_INSTANCE_UID, "1.2.3");
    assert!(matches!(
        apply(&store, "{Banana}.dcm"),
        Err(PatternError::InvalidTag(_))
    ));
}

#[test]
fn constant_as_fallback() {
    let store = MapTagStore::new().with(tags::SOP_INSTANCE_UID, "1.2.3");
    assert_eq!(
        apply(&store, "{InstanceNumber ?? 'Constant'}.dcm").unwrap(),
        "Constant.dcm"
    );
}

#[test]
fn all_alternatives_absent_names_the_expression() {
    let store = MapTagStore::new();
    match apply(&store, "{InstanceNumber ?? SOPInstanceUID}.dcm") {
        Err(PatternError::NotPresent(expr)) => assert_eq!(expr, "InstanceNumber ?? SOPInstanceUID"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn numeric_tag_references() {
    let store = MapTagStore::new().with(tags::ACCESSION_NUMBER, "ACC");
    assert_eq!(apply(&store, "{(0008,0050)}/x.dcm").unwrap(), "ACC/x.dcm");
    assert_eq!(apply(&store, "{00080050}.dcm").unwrap(), "ACC.dcm");
}

#[test]
fn directory_values_are_sanitized() {
    let store = MapTagStore::new()
        .with(tags::PATIENT_NAME, "A/B:C")
        .with(tags::INSTANCE_NUMBER, "1");
    assert_eq!(
        apply(&store, "{PatientName}/{InstanceNumber}.dcm").unwrap(),
        "ABC/1.dcm"
    );
}

#[test]
fn multi_valued_element_uses_first_value() {
    let store = MapTagStore::new()
        .with(tags::IMAGE_TYPE, "ORIGINAL\\PRIMARY")
        .with(tags::INSTANCE_NUMBER, "1");
    assert_eq!(
        apply(&store, "{ImageType}/{InstanceNumber}.dcm").unwrap(),
        "ORIGINAL/1.dcm"
    );
}

#[test]
fn backslash_separators_are_normalized() {
    let store = MapTagStore::new()
        .with(tags::ACCESSION_NUMBER, "ABC123")
        .with(tags::INSTANCE_NUMBER, "7");
    assert_eq!(
        apply(&store, r"{AccessionNumber}\{InstanceNumber}.dcm").unwrap(),
        "ABC123/7.dcm"
    );
}

#[test]
fn lone_quote_is_the_empty_constant() {
    let store = MapTagStore::new().with(tags::SOP_INSTANCE_UID, "1.2.3");
    assert_eq!(
        apply(&store, "x{PatientName ?? '}/{SOPInstanceUID}.dcm").unwrap(),
        "x/1.2.3.dcm"
    );
    assert_eq!(apply(&store, "{''}{SOPInstanceUID}.dcm").unwrap(), "1.2.3.dcm");
}
