use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn kinds_lists_every_kind_with_order_mode() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("netobj-compare"));
    cmd.arg("kinds")
        .assert()
        .success()
        .stdout(predicate::str::contains("application_groups"))
        .stdout(predicate::str::is_match(r"(?m)^tags\s+sorted by name$").expect("regex"))
        .stdout(predicate::str::is_match(r"(?m)^nat_policies\s+device order$").expect("regex"));
}

#[test]
fn kinds_json_reflects_profile_overrides() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("netobj-compare"));
    cmd.arg("kinds")
        .arg("--format")
        .arg("json")
        .arg("--config")
        .arg(fixture("fixtures/profile-unordered.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"label\": \"Security Policies\""))
        .stdout(predicate::str::is_match(
            r#""kind": "security_policies",\s+"label": "Security Policies",\s+"preserve_order": false"#,
        )
        .expect("regex"));
}
