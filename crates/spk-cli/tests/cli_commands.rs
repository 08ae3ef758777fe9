//! Subcommand handlers run against temporary object files.

use std::io::Write;
use std::path::PathBuf;

use spk_cli::id::{id_to, IdArgs};
use spk_cli::walk::{walk_to, RuleSet, WalkArgs};

const WALL_JSON: &str = r#"{
    "speckle_type": "Speckle.Core.Models.Collection",
    "name": "Level 1",
    "@elements": [
        {
            "speckle_type": "Objects.BuiltElements.Wall",
            "displayValue": {"speckle_type": "Objects.Geometry.Mesh"},
            "elements": [{"speckle_type": "Objects.BuiltElements.Window"}]
        }
    ]
}"#;

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

fn walk(file: PathBuf, rules: RuleSet, distinct: bool) -> Vec<String> {
    let mut out = Vec::new();
    let code = walk_to(&WalkArgs { file, rules, distinct }, &mut out).unwrap();
    assert_eq!(code, 0);
    String::from_utf8(out).unwrap().lines().map(str::to_string).collect()
}

#[test]
fn walk_prints_member_paths() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(&dir, "model.json", WALL_JSON);
    assert_eq!(
        walk(file.clone(), RuleSet::Displayable, false),
        vec![
            "/\tSpeckle.Core.Models.Collection",
            "/@elements\tObjects.BuiltElements.Wall",
            "/@elements/elements\tObjects.BuiltElements.Window",
        ]
    );
    assert_eq!(
        walk(file, RuleSet::All, false),
        vec![
            "/\tSpeckle.Core.Models.Collection",
            "/@elements\tObjects.BuiltElements.Wall",
            "/@elements/displayValue\tObjects.Geometry.Mesh",
            "/@elements/elements\tObjects.BuiltElements.Window",
        ]
    );
}

#[test]
fn walk_reads_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(
        &dir,
        "model.yml",
        "speckle_type: Base\nchildren:\n  - speckle_type: A\n  - speckle_type: B\n",
    );
    assert_eq!(walk(file, RuleSet::All, true), vec!["Base", "A", "B"]);
}

#[test]
fn walk_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let args = WalkArgs {
        file: dir.path().join("missing.json"),
        rules: RuleSet::All,
        distinct: false,
    };
    let err = walk_to(&args, &mut Vec::<u8>::new()).unwrap_err();
    assert!(format!("{err:#}").contains("file not found"));
}

#[test]
fn id_is_stable_and_ignores_stored_id() {
    let dir = tempfile::tempdir().unwrap();
    let plain = write_file(&dir, "a.json", r#"{"speckle_type": "Base", "x": 1}"#);
    let with_id = write_file(&dir, "b.json", r#"{"speckle_type": "Base", "x": 1, "id": "stale"}"#);

    let run = |file: PathBuf, verify: bool| {
        let mut out = Vec::new();
        let code = id_to(&IdArgs { file, all: false, verify }, &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    };
    let (code_a, id_a) = run(plain, true);
    let (code_b, id_b) = run(with_id, true);
    assert_eq!(id_a, id_b);
    assert_eq!(id_a.trim().len(), spk_core::digest::OBJECT_ID_LEN);
    assert_eq!(code_a, 0);
    assert_eq!(code_b, 2);
}

#[test]
fn id_all_lists_every_distinct_node() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_file(&dir, "model.json", WALL_JSON);
    let mut out = Vec::new();
    id_to(&IdArgs { file, all: true, verify: false }, &mut out).unwrap();
    let types: Vec<String> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| l.split('\t').nth(1).unwrap().to_string())
        .collect();
    assert_eq!(
        types,
        vec![
            "Speckle.Core.Models.Collection",
            "Objects.BuiltElements.Wall",
            "Objects.Geometry.Mesh",
            "Objects.BuiltElements.Window",
        ]
    );
}
