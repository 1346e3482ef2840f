mod common;
use common::{kinematic_section_with_recovery, kinetic_section, read_lines, write_source};

use kinescan::section::ingest_file;
use kinescan::{Category, Heuristics, IngestError};
use tempfile::TempDir;

#[test]
fn kinetic_section_round_trip() {
    let tmp = TempDir::new().unwrap();
    let source = write_source(tmp.path(), "P01 CMJ PRE 01.txt", kinetic_section());
    let subject_dir = tmp.path().join("P01");

    let records = ingest_file(&source, &subject_dir, &Heuristics::default()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].category, Category::Kinetic);
    assert_eq!(records[0].frame_count, 1000);
    assert_eq!(records[0].rows, 2);

    let artifact = subject_dir
        .join("Cinetica")
        .join("P01 CMJ PRE 01_Cinetica.txt");
    assert_eq!(records[0].artifact, artifact);

    let lines = read_lines(&artifact);
    assert_eq!(lines[0], "1000");
    assert_eq!(lines[1], ";;;Force Plate #1 - Force;;");
    assert_eq!(lines[2], "Frame;Sub Frame;Time;Fx;Fy;Fz");
    assert_eq!(lines[3], ";;;N;N;N");
    // Row 0: time 0, missing Fy → nan.
    assert_eq!(lines[4], "1;0;0;0.5;nan;9.81");
    // Row 1: time 1/1000.
    assert_eq!(lines[5], "2;0;0.001;-0.25;3;9.81");
    // Summary over the data columns only, label in the time slot.
    assert_eq!(lines[6], ";;MAXIMO;0.5;3;9.81");
    assert_eq!(lines[7], ";;MINIMO;-0.25;3;9.81");
    assert_eq!(lines[8], ";;RANGO;0.75;0;0");
    assert_eq!(lines.len(), 9);
}

#[test]
fn kinematic_section_recovers_the_frame_count() {
    let tmp = TempDir::new().unwrap();
    let source = write_source(
        tmp.path(),
        "P01 SJ POST 02.txt",
        kinematic_section_with_recovery(),
    );
    let subject_dir = tmp.path().join("P01");

    let records = ingest_file(&source, &subject_dir, &Heuristics::default()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].category, Category::Kinematic);
    assert_eq!(records[0].frame_count, 100);

    let lines = read_lines(
        &subject_dir
            .join("Cinematica")
            .join("P01 SJ POST 02_Cinematica.txt"),
    );
    assert_eq!(lines[0], "100");
    // Time axis: 0, 1/100, 2/100.
    assert_eq!(lines[4], "1;0;0;12.5");
    assert_eq!(lines[5], "2;0;0.01;13");
    assert_eq!(lines[6], "3;0;0.02;13.5");
}

#[test]
fn multiple_sections_are_split_by_category_in_source_order() {
    let tmp = TempDir::new().unwrap();
    let mut content = String::new();
    content.push_str(kinetic_section());
    content.push_str(kinematic_section_with_recovery());
    // An unclassifiable trailing section.
    content.push_str("Trajectories\n10\n\t\tP01:RHEE\nFrame\tSub Frame\tX\n\t\tmm\n1\t0\t4.5\n\n");

    let source = write_source(tmp.path(), "P01 CMJ PRE 03.txt", &content);
    let subject_dir = tmp.path().join("P01");
    let records = ingest_file(&source, &subject_dir, &Heuristics::default()).unwrap();

    let categories: Vec<Category> = records.iter().map(|r| r.category).collect();
    assert_eq!(
        categories,
        vec![Category::Kinetic, Category::Kinematic, Category::Unknown]
    );
    assert_eq!(records[2].index, 3);
    assert!(subject_dir
        .join("Desconocida")
        .join("P01 CMJ PRE 03_Desconocida.txt")
        .is_file());
}

#[test]
fn non_numeric_frame_count_without_kinematic_marker_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let source = write_source(
        tmp.path(),
        "P01 CMJ PRE 04.txt",
        "Devices\nnot a number\nrest\nof\nfile\n",
    );
    let err = ingest_file(&source, &tmp.path().join("P01"), &Heuristics::default()).unwrap_err();
    match err {
        IngestError::Format { section, .. } => assert_eq!(section, 1),
        other => panic!("expected a format error, got {other:?}"),
    }
}

#[test]
fn bad_measurement_aborts_the_file_but_keeps_earlier_artifacts() {
    let tmp = TempDir::new().unwrap();
    let mut content = String::from(kinetic_section());
    content.push_str("Devices\n50\n\t\tForce Plate #2\nFrame\tSub Frame\tFz\n\t\tN\n1\t0\tbogus\n\n");

    let source = write_source(tmp.path(), "P01 CMJ PRE 05.txt", &content);
    let subject_dir = tmp.path().join("P01");
    let err = ingest_file(&source, &subject_dir, &Heuristics::default()).unwrap_err();
    match err {
        IngestError::Format { section, .. } => assert_eq!(section, 2),
        other => panic!("expected a format error, got {other:?}"),
    }
    // Section 1 was already written before section 2 failed.
    assert!(subject_dir
        .join("Cinetica")
        .join("P01 CMJ PRE 05_Cinetica.txt")
        .is_file());
}

#[test]
fn empty_file_yields_no_sections() {
    let tmp = TempDir::new().unwrap();
    let source = write_source(tmp.path(), "P01 CMJ PRE 06.txt", "");
    let records =
        ingest_file(&source, &tmp.path().join("P01"), &Heuristics::default()).unwrap();
    assert!(records.is_empty());
}

#[test]
fn section_without_measurements_gets_no_summary() {
    let tmp = TempDir::new().unwrap();
    let source = write_source(
        tmp.path(),
        "P01 CMJ PRE 07.txt",
        "Devices\n100\n\t\tForce Plate #1\nFrame\tSub Frame\tFz\n\t\tN\n\n",
    );
    let subject_dir = tmp.path().join("P01");
    let records = ingest_file(&source, &subject_dir, &Heuristics::default()).unwrap();
    assert_eq!(records[0].rows, 0);

    let lines = read_lines(
        &subject_dir
            .join("Cinetica")
            .join("P01 CMJ PRE 07_Cinetica.txt"),
    );
    // Frame count + three headers, nothing else.
    assert_eq!(lines.len(), 4);
}
