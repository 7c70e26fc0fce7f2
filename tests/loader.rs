use std::collections::BTreeSet;
use std::fs;

use tempfile::tempdir;

use tabsift::config::Config;
use tabsift::data::filter::{filter_records, Criterion, NumberOp};
use tabsift::data::loader::load_file;
use tabsift::data::model::FieldValue;

#[test]
fn loads_a_delimited_upload_end_to_end() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("routes.csv");
    fs::write(&path, "stop;demand\nA;10\nB;4\n").unwrap();

    let table = load_file(&path, &Config::default()).unwrap();
    assert_eq!(table.table_name, "routes");
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows()[0]["stop"], FieldValue::Text("A".into()));
    assert_eq!(table.rows()[0]["demand"], FieldValue::Number(10.0));
}

#[test]
fn loads_a_json_upload_end_to_end() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("executions.json");
    fs::write(
        &path,
        r#"[{ "id": 1, "state": "done" }, { "id": 2, "state": "queued" }]"#,
    )
    .unwrap();

    let table = load_file(&path, &Config::default()).unwrap();
    assert_eq!(table.table_name, "executions");
    assert_eq!(table.rows()[1]["state"], FieldValue::Text("queued".into()));
}

#[test]
fn prefix_routes_an_upload_without_a_mapped_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("instance_plan.dat");
    fs::write(&path, "a,b\n1,2\n").unwrap();

    let config = Config::builder()
        .processor("instance_", "delimited")
        .build()
        .unwrap();

    let table = load_file(&path, &config).unwrap();
    assert_eq!(table.table_name, "instance_plan");
    assert_eq!(table.rows()[0]["b"], FieldValue::Number(2.0));
}

#[test]
fn rejects_an_upload_with_no_registered_processor() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.yaml");
    fs::write(&path, "a: 1\n").unwrap();

    let err = load_file(&path, &Config::default()).unwrap_err();
    assert!(err.to_string().contains("no processor registered"));
}

#[test]
fn loaded_rows_flow_through_the_filter_engine() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stops.csv");
    fs::write(&path, "stop,demand\nnorth,10\nsouth,3\nnorth-2,7\n").unwrap();

    let table = load_file(&path, &Config::default()).unwrap();
    let criteria = vec![Criterion::Number {
        field: "demand".into(),
        op: NumberOp::Gt,
        value: 5.0,
    }];
    let visible = filter_records(table.rows(), "north", &criteria, &BTreeSet::new());

    assert_eq!(visible.len(), 2);
    assert_eq!(visible[0]["stop"], FieldValue::Text("north".into()));
    assert_eq!(visible[1]["stop"], FieldValue::Text("north-2".into()));
}
