//! CLI integration tests for the resource-schema binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_fixture(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let model = json!({
        "shapes": {
            "smithy.example#TestService": {
                "type": "service",
                "resources": ["smithy.example#FooResource"]
            },
            "smithy.example#FooResource": {
                "type": "resource",
                "identifiers": { "fooId": "smithy.example#FooId" },
                "read": "smithy.example#GetFoo",
                "update": "smithy.example#UpdateFoo",
                "traits": {
                    "provision#resource": {},
                    "api#documentation": "A Foo resource."
                }
            },
            "smithy.example#GetFoo": {
                "type": "operation",
                "input": "smithy.example#GetFooRequest",
                "output": "smithy.example#GetFooResponse"
            },
            "smithy.example#GetFooRequest": {
                "type": "structure",
                "members": { "fooId": { "target": "smithy.example#FooId" } }
            },
            "smithy.example#GetFooResponse": {
                "type": "structure",
                "members": {
                    "fooId": { "target": "smithy.example#FooId" },
                    "fooValue": { "target": "smithy.example#FooValue" }
                }
            },
            "smithy.example#UpdateFoo": {
                "type": "operation",
                "input": "smithy.example#UpdateFooRequest"
            },
            "smithy.example#UpdateFooRequest": {
                "type": "structure",
                "members": {
                    "fooId": { "target": "smithy.example#FooId" },
                    "fooValue": { "target": "smithy.example#FooValue" }
                }
            },
            "smithy.example#FooId": { "type": "string" },
            "smithy.example#FooValue": { "type": "string" }
        }
    });
    let config = json!({
        "organizationName": "Smithy",
        "service": "smithy.example#TestService"
    });

    let model_path = dir.join("model.json");
    let config_path = dir.join("config.json");
    fs::write(&model_path, serde_json::to_string_pretty(&model).unwrap()).unwrap();
    fs::write(&config_path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    (model_path, config_path)
}

fn cmd() -> Command {
    Command::cargo_bin("resource-schema").unwrap()
}

#[test]
fn convert_writes_one_file_per_resource() {
    let dir = TempDir::new().unwrap();
    let (model, config) = write_fixture(dir.path());
    let out = dir.path().join("schemas");

    cmd()
        .args(["convert", "--model"])
        .arg(&model)
        .arg("--config")
        .arg(&config)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "smithy-testservice-fooresource.json",
        ));

    let schema_path = out.join("smithy-testservice-fooresource.json");
    let content: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&schema_path).unwrap()).unwrap();
    assert_eq!(content["typeName"], "Smithy::TestService::FooResource");
    assert_eq!(content["primaryIdentifier"], json!(["/properties/FooId"]));
}

#[test]
fn convert_prints_to_stdout_without_out_dir() {
    let dir = TempDir::new().unwrap();
    let (model, config) = write_fixture(dir.path());

    cmd()
        .args(["convert", "--model"])
        .arg(&model)
        .arg("--config")
        .arg(&config)
        .arg("--pretty")
        .assert()
        .success()
        .stdout(predicate::str::contains("Smithy::TestService::FooResource"))
        .stdout(predicate::str::contains("\"description\": \"A Foo resource.\""));
}

#[test]
fn properties_prints_derivation_table() {
    let dir = TempDir::new().unwrap();
    let (model, _) = write_fixture(dir.path());

    cmd()
        .args(["properties", "--model"])
        .arg(&model)
        .args(["--resource", "smithy.example#FooResource"])
        .assert()
        .success()
        .stdout(predicate::str::contains("primary identifiers: fooId"))
        .stdout(predicate::str::contains("readOnly"))
        // fooValue is read and updated, so it carries no constraint.
        .stdout(predicate::str::contains("mutable"));
}

#[test]
fn missing_model_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let (_, config) = write_fixture(dir.path());

    cmd()
        .args(["convert", "--model", "/nonexistent/model.json", "--config"])
        .arg(&config)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn missing_organization_is_config_error() {
    let dir = TempDir::new().unwrap();
    let (model, _) = write_fixture(dir.path());
    let config = dir.path().join("bad-config.json");
    fs::write(
        &config,
        r#"{ "service": "smithy.example#TestService" }"#,
    )
    .unwrap();

    cmd()
        .args(["convert", "--model"])
        .arg(&model)
        .arg("--config")
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("organizationName"));
}

#[test]
fn malformed_resource_id_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (model, _) = write_fixture(dir.path());

    cmd()
        .args(["properties", "--model"])
        .arg(&model)
        .args(["--resource", "not-a-shape-id"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid shape id"));
}

#[test]
fn unknown_resource_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (model, _) = write_fixture(dir.path());

    cmd()
        .args(["properties", "--model"])
        .arg(&model)
        .args(["--resource", "smithy.example#Unknown"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found in model"));
}
