//! End-to-end tests for the `mirror` and `plan` commands.
//!
//! These tests invoke the actual CLI binary against kustomization trees built
//! in temporary directories.

#[allow(dead_code)]
mod common;
use common::list_tree;
use common::prelude::*;

#[test]
fn test_mirror_stages_generator_closure() {
    let fixture = TestFixture::new().with_generator_tree();

    fixture
        .command()
        .arg("mirror")
        .arg("src")
        .arg("--dest")
        .arg("staged")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mirrored 7 file(s)"))
        .stdout(predicate::str::contains("kustomize build"));

    let staged = list_tree(&fixture.join("staged"));
    assert_eq!(staged.len(), 7);
    assert!(staged.contains(&"credentials.local.pub".to_string()));
    assert!(!staged.contains(&"notes.md".to_string()));
    fixture
        .child("staged/setup.json")
        .assert(predicate::str::contains("replicas"));
}

#[test]
fn test_mirror_uses_configured_path_and_build_args() {
    let fixture = TestFixture::new().with_generator_tree().with_file(
        ".kustomize-mirror.yaml",
        "kustomize:\n  paths: [src]\n  buildArgs: [\"--load-restrictor LoadRestrictionsNone\"]\n",
    );

    fixture
        .command()
        .arg("mirror")
        .arg("--dest")
        .arg("out")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "kustomize build --load-restrictor LoadRestrictionsNone",
        ));

    assert!(fixture.join("out/kustomization.yaml").is_file());
}

#[test]
fn test_mirror_quotes_destination_with_spaces() {
    let fixture = TestFixture::new().with_generator_tree();

    fixture
        .command()
        .args(["mirror", "src", "--dest", "my stage"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kustomize build 'my stage'\n"));

    assert!(fixture.join("my stage/kustomization.yaml").is_file());
}

#[test]
fn test_mirror_quiet() {
    let fixture = TestFixture::new().with_generator_tree();

    fixture
        .command()
        .args(["mirror", "src", "--dest", "out", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_mirror_missing_reference_fails() {
    let fixture = TestFixture::new()
        .with_file("src/kustomization.yaml", common::kustomizations::GENERATORS);

    fixture
        .command()
        .args(["mirror", "src", "--dest", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unresolved reference"))
        .stderr(predicate::str::contains("app.env"));
}

#[test]
fn test_mirror_without_kustomization_fails() {
    let fixture = TestFixture::new().with_file("src/README.md", "# nothing\n");

    fixture
        .command()
        .args(["mirror", "src", "--dest", "out"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No kustomization file found"));
}

#[test]
fn test_mirror_requires_dest() {
    let fixture = TestFixture::new().with_generator_tree();

    fixture.command().args(["mirror", "src"]).assert().code(2);
}

#[test]
fn test_plan_lists_mapping_without_writing() {
    let fixture = TestFixture::new().with_generator_tree();
    let before = list_tree(fixture.path());

    fixture
        .command()
        .args(["plan", "src"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRY-RUN] app.env <- "))
        .stdout(predicate::str::contains("[DRY-RUN] eyesonly.txt <- "))
        .stdout(predicate::str::contains("7 file(s)"))
        .stdout(predicate::str::contains("notes.md").not());

    assert_eq!(list_tree(fixture.path()), before);
}

#[test]
fn test_plan_invalid_config_fails() {
    let fixture = TestFixture::new()
        .with_generator_tree()
        .with_file(".kustomize-mirror.yaml", "kustomize:\n  path: src\n");

    fixture
        .command()
        .args(["plan", "src"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration parsing error"))
        .stderr(predicate::str::contains("hint:"));
}
