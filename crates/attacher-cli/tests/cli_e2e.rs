#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn attach_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("attach"));
    cmd.current_dir(dir.path())
        .env_remove("ATTACHER_DEFAULT_ENGINE")
        .env_remove("ATTACHER_MARK_ERRORS")
        .env_remove("RUST_LOG");
    cmd
}

fn init_doc(dir: &TempDir) -> String {
    attach_cmd(dir)
        .args(["init", "part.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote part.json"));
    "part.json".to_string()
}

#[test]
fn engines_lists_builtins() {
    let dir = TempDir::new().unwrap();
    attach_cmd(&dir)
        .arg("engines")
        .assert()
        .success()
        .stdout(predicate::str::contains("AttachEngine3D (default)"))
        .stdout(predicate::str::contains("AttachEnginePoint"));
}

#[test]
fn config_file_changes_default_engine() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("attacher.toml"),
        "default_engine = \"AttachEnginePoint\"\n",
    )
    .unwrap();

    attach_cmd(&dir)
        .arg("engines")
        .assert()
        .success()
        .stdout(predicate::str::contains("AttachEnginePoint (default)"));
}

#[test]
fn init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let doc = init_doc(&dir);
    attach_cmd(&dir)
        .args(["init", &doc])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn show_fresh_document_is_detached() {
    let dir = TempDir::new().unwrap();
    let doc = init_doc(&dir);
    attach_cmd(&dir)
        .args(["show", &doc])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deactivated"))
        .stdout(predicate::str::contains("not attached"))
        .stdout(predicate::str::contains("(hidden)"));
}

#[test]
fn set_attaches_and_writes() {
    let dir = TempDir::new().unwrap();
    let doc = init_doc(&dir);

    attach_cmd(&dir)
        .args([
            "set",
            &doc,
            "--support",
            "Box:Face1",
            "--mode",
            "FlatFace",
            "--write",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("attached"))
        .stdout(predicate::str::contains("(read-only)"))
        .stdout(predicate::str::contains("Saved part.json"));

    attach_cmd(&dir)
        .args(["show", &doc, "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"mode\": \"FlatFace\""))
        .stdout(predicate::str::contains("\"attached\": true"))
        .stdout(predicate::str::contains("Box:Face1"));
}

#[test]
fn set_without_write_leaves_file_alone() {
    let dir = TempDir::new().unwrap();
    let doc = init_doc(&dir);
    let before = fs::read_to_string(dir.path().join(&doc)).unwrap();

    attach_cmd(&dir)
        .args(["set", &doc, "--support", "Box:Vertex1", "--mode", "Translate"])
        .assert()
        .success();

    let after = fs::read_to_string(dir.path().join(&doc)).unwrap();
    assert_eq!(before, after);
}

#[test]
fn unknown_engine_is_rejected() {
    let dir = TempDir::new().unwrap();
    let doc = init_doc(&dir);
    attach_cmd(&dir)
        .args(["set", &doc, "--engine", "NotARealStrategy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Type is not derived from AttachEngine: NotARealStrategy",
        ));
}

#[test]
fn broken_reference_is_reported_not_fatal() {
    let dir = TempDir::new().unwrap();
    let doc = init_doc(&dir);
    attach_cmd(&dir)
        .args(["set", &doc, "--support", "Box:Face7", "--mode", "FlatFace"])
        .assert()
        .success()
        .stdout(predicate::str::contains("error:"))
        .stdout(predicate::str::contains("Face7"));
}

#[test]
fn legacy_document_is_migrated() {
    let dir = TempDir::new().unwrap();
    let doc = init_doc(&dir);
    let path = dir.path().join(&doc);

    // Rewrite the sample into the oldest stored form: a single `Support`
    // link and no mode.
    let mut json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let box_id = json["geometry"]["objects"][0]["id"].clone();
    json["attributes"] = serde_json::json!([
        { "name": "Support", "type": "PropertyLinkSub", "value": { "object": box_id, "sub": "Face1" } }
    ]);
    fs::write(&path, serde_json::to_string_pretty(&json).unwrap()).unwrap();

    attach_cmd(&dir)
        .args(["show", &doc])
        .assert()
        .success()
        .stdout(predicate::str::contains("FlatFace"))
        .stdout(predicate::str::contains("Box:Face1"));
}

#[test]
fn verbose_logs_go_to_stderr() {
    let dir = TempDir::new().unwrap();
    let doc = init_doc(&dir);
    attach_cmd(&dir)
        .args(["-vv", "set", &doc, "--support", "Box:Face1", "--mode", "FlatFace"])
        .assert()
        .success()
        .stderr(predicate::str::contains("attachment applied"))
        .stdout(predicate::str::contains("attachment applied").not());
}
