//! End-to-end tests for the `args` command.

#[allow(dead_code)]
mod common;
use common::prelude::*;

#[test]
fn test_args_without_arguments() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .arg("args")
        .assert()
        .success()
        .stdout("kustomize build\n");
}

#[test]
fn test_args_splits_embedded_whitespace() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["args", "--build-arg", "--foo bar", "--build-arg", "--baz", "barfoo"])
        .assert()
        .success()
        .stdout("kustomize build --foo bar --baz barfoo\n");
}

#[test]
fn test_args_lines() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["args", "--lines", "-a", "--foo bar", "my overlay"])
        .assert()
        .success()
        .stdout("kustomize\nbuild\n--foo\nbar\nmy overlay\n");
}

#[test]
fn test_args_merges_config() {
    let fixture = TestFixture::new().with_file(
        ".kustomize-mirror.yaml",
        r#"
kustomize:
  binary: /opt/bin/kustomize
  paths: [overlays/prod]
  buildArgs:
    - --enable-helm
"#,
    );

    fixture
        .command()
        .args(["args", "-a", "--load-restrictor LoadRestrictionsNone"])
        .assert()
        .success()
        .stdout(
            "/opt/bin/kustomize build --enable-helm --load-restrictor LoadRestrictionsNone overlays/prod\n",
        );
}

#[test]
fn test_args_explicit_config_path() {
    let fixture = TestFixture::new().with_file("conf/render.yaml", "kustomize:\n  paths: [base]\n");

    fixture
        .command()
        .args(["--config", "conf/render.yaml", "args"])
        .assert()
        .success()
        .stdout("kustomize build base\n");
}

#[test]
fn test_args_quotes_tokens_with_spaces() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["args", "-a", "--foo bar", "my overlay"])
        .assert()
        .success()
        .stdout("kustomize build --foo bar 'my overlay'\n");
}
