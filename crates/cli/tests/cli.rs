use assert_cmd::Command;

fn bookstore() -> Command {
    let mut cmd = Command::cargo_bin("bookstore").unwrap();
    cmd.env("BOOKSTORE_CONFIG_DIR", "does-not-exist")
        .env("BOOKSTORE_ENV", "local");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let output = bookstore().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("openapi"));
}

#[test]
fn openapi_prints_every_module_path() {
    let output = bookstore().arg("openapi").output().unwrap();
    assert!(output.status.success());

    let document: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let paths = document["paths"].as_object().unwrap();
    for path in [
        "/healthz",
        "/api/books",
        "/api/books/{isbn}",
        "/api/authors/{id}",
        "/api/reviews/{isbn}",
        "/api/reviews/{isbn}/{review_id}",
    ] {
        assert!(paths.contains_key(path), "missing {path}");
    }
}

#[test]
fn unknown_environment_fails() {
    bookstore()
        .args(["--env", "qa", "openapi"])
        .assert()
        .failure();
}
