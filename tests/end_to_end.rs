use pretty_assertions::assert_eq;
use smelt::{smelt, smelt_json, IdScope, SmeltConfig, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn read(dir: &Path, table: &str) -> String {
    fs::read_to_string(dir.join(format!("{}.csv", table))).unwrap()
}

fn csv_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn flat_object() {
    let dir = TempDir::new().unwrap();
    let text = r#"{"name": "Ada", "age": 36}"#;
    let report = smelt_json(text.as_bytes(), dir.path(), SmeltConfig::default()).unwrap();

    assert!(report.is_complete());
    assert_eq!(csv_files(dir.path()), vec!["root.csv"]);
    assert_eq!(read(dir.path(), "root"), "id,name,age\n1,Ada,36\n");
}

#[test]
fn nested_object_links_parent_to_child() {
    let dir = TempDir::new().unwrap();
    let config = SmeltConfig::default().with_id_scope(IdScope::Global);
    smelt_json(r#"{"user": {"name": "Bo"}}"#.as_bytes(), dir.path(), config).unwrap();

    assert_eq!(read(dir.path(), "root"), "id,user_id\n1,2\n");
    assert_eq!(read(dir.path(), "user"), "id,name\n2,Bo\n");
}

#[test]
fn nested_object_per_table_ids() {
    let dir = TempDir::new().unwrap();
    let text = r#"{"user": {"name": "Bo"}}"#;
    smelt_json(text.as_bytes(), dir.path(), SmeltConfig::default()).unwrap();

    assert_eq!(read(dir.path(), "root"), "id,user_id\n1,1\n");
    assert_eq!(read(dir.path(), "user"), "id,name\n1,Bo\n");
}

#[test]
fn scalar_array() {
    let dir = TempDir::new().unwrap();
    let text = r#"{"tags": ["a", "b"]}"#;
    smelt_json(text.as_bytes(), dir.path(), SmeltConfig::default()).unwrap();

    assert_eq!(read(dir.path(), "root"), "id\n1\n");
    assert_eq!(read(dir.path(), "tags"), "id,root_id,index,value\n1,1,0,a\n2,1,1,b\n");
}

#[test]
fn cells_with_commas_are_quoted() {
    let dir = TempDir::new().unwrap();
    smelt_json(
        r#"{"note": "a,b", "quote": "say \"hi\"", "multi": "x\ny"}"#.as_bytes(),
        dir.path(),
        SmeltConfig::default(),
    )
    .unwrap();

    assert_eq!(
        read(dir.path(), "root"),
        "id,note,quote,multi\n1,\"a,b\",\"say \"hi\"\",\"x\ny\"\n"
    );
}

#[test]
fn order_document() {
    let dir = TempDir::new().unwrap();
    let text = r#"{
        "Order No": 1001,
        "paid": true,
        "customer": {"name": "Ada", "email": null},
        "Line Items": [
            {"sku": "A-1", "qty": 2, "price": 9.5},
            {"sku": "B-2", "qty": 1}
        ],
        "notes": []
    }"#;
    let report = smelt_json(text.as_bytes(), dir.path(), SmeltConfig::default()).unwrap();

    let written: Vec<&str> = report.written.iter().map(|w| w.table.as_str()).collect();
    assert_eq!(written, vec!["root", "customer", "line_items", "notes"]);
    assert_eq!(
        csv_files(dir.path()),
        vec!["customer.csv", "line_items.csv", "notes.csv", "root.csv"]
    );

    assert_eq!(read(dir.path(), "root"), "id,Order No,paid,customer_id\n1,1001,true,1\n");
    assert_eq!(read(dir.path(), "customer"), "id,name,email\n1,Ada,null\n");
    assert_eq!(
        read(dir.path(), "line_items"),
        "id,root_id,sku,qty,price\n1,1,A-1,2,9.5\n2,1,B-2,1,\n"
    );
    assert_eq!(read(dir.path(), "notes"), "id,root_id\n");
}

#[test]
fn punctuation_only_key_writes_dot_csv() {
    let dir = TempDir::new().unwrap();
    let text = r#"{"!!!": {"a": 1}}"#;
    smelt_json(text.as_bytes(), dir.path(), SmeltConfig::default()).unwrap();

    assert_eq!(csv_files(dir.path()), vec![".csv", "root.csv"]);
    assert_eq!(read(dir.path(), "root"), "id,_id\n1,1\n");
    assert_eq!(read(dir.path(), ""), "id,a\n1,1\n");
}

#[test]
fn non_object_root_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let report = smelt_json("[1, 2, 3]".as_bytes(), dir.path(), SmeltConfig::default()).unwrap();

    assert!(report.written.is_empty());
    assert!(csv_files(dir.path()).is_empty());
}

#[test]
fn existing_files_are_truncated() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("root.csv"), "stale content\nmore\nlines\n").unwrap();
    smelt_json(r#"{"a": 1}"#.as_bytes(), dir.path(), SmeltConfig::default()).unwrap();

    assert_eq!(read(dir.path(), "root"), "id,a\n1,1\n");
}

#[test]
fn failed_table_does_not_stop_siblings() {
    let dir = TempDir::new().unwrap();
    // a directory where user.csv should go makes that one file unopenable
    fs::create_dir(dir.path().join("user.csv")).unwrap();

    let root: Value = serde_json::from_str(r#"{"user": {"name": "Bo"}, "tags": ["x"]}"#).unwrap();
    let report = smelt(&root, dir.path(), SmeltConfig::default());

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].table, "user");
    let written: Vec<&str> = report.written.iter().map(|w| w.table.as_str()).collect();
    assert_eq!(written, vec!["root", "tags"]);
    assert_eq!(read(dir.path(), "tags"), "id,root_id,index,value\n1,1,0,x\n");
}

#[test]
fn missing_directory_fails_every_table() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent");
    let root: Value = serde_json::from_str(r#"{"a": {"b": 1}}"#).unwrap();
    let report = smelt(&root, &missing, SmeltConfig::default());

    assert!(report.written.is_empty());
    assert_eq!(report.failed.len(), 2);
}

#[test]
fn reruns_produce_identical_output() {
    let text = r#"{"z": {"y": [{"x": 1}, {"x": 2}]}, "w": ["p", "q"],
                   "v": {"u": {"t": false}}}"#;
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    smelt_json(text.as_bytes(), first.path(), SmeltConfig::default()).unwrap();
    smelt_json(text.as_bytes(), second.path(), SmeltConfig::default()).unwrap();

    let files = csv_files(first.path());
    assert_eq!(files, csv_files(second.path()));
    for file in files {
        let a = fs::read_to_string(first.path().join(&file)).unwrap();
        let b = fs::read_to_string(second.path().join(&file)).unwrap();
        assert_eq!(a, b, "{}", file);
    }
}

#[test]
fn invalid_json_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(smelt_json("{\"a\": ".as_bytes(), dir.path(), SmeltConfig::default()).is_err());
}
