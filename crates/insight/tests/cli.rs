//! CLI integration tests for insight commands.
//!
//! These tests focus on exit codes and basic behavioral verification,
//! not specific output formatting which may change.

// Integration tests live outside cfg(test).
#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to create a temp directory for tests.
fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

/// Helper to get an insight command with HOME isolated and no environment overrides.
fn insight(home: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("insight").unwrap();
    cmd.env("HOME", home)
        .env_remove("INSIGHT_SERVICE_URL")
        .env_remove("INSIGHT_TIMEOUT_SECS")
        .env_remove("RUST_LOG")
        .current_dir(home);
    cmd
}

/// Strips ANSI escape sequences from a string.
fn strip_ansi(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            output.push(ch);
        }
    }

    output
}

/// Captured stdout with ANSI codes removed.
fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
    strip_ansi(&String::from_utf8_lossy(&assert.get_output().stdout))
}

mod init {
    use super::*;

    #[test]
    fn creates_config_file() {
        let dir = temp_dir();

        let assert = insight(dir.path()).arg("init").assert().success();

        let contents = fs::read_to_string(dir.path().join(".insight.toml")).unwrap();
        assert!(contents.contains("[service]"));
        assert!(stdout_of(&assert).contains("Configuration written:"));
    }

    #[test]
    fn fails_if_config_exists() {
        let dir = temp_dir();
        let work = dir.path().join("work");
        fs::create_dir(&work).unwrap();
        fs::write(work.join(".insight.toml"), "existing").unwrap();

        insight(dir.path())
            .current_dir(&work)
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn force_overwrites_existing() {
        let dir = temp_dir();
        let work = dir.path().join("work");
        fs::create_dir(&work).unwrap();
        fs::write(work.join(".insight.toml"), "old content").unwrap();

        insight(dir.path())
            .current_dir(&work)
            .args(["init", "--force"])
            .assert()
            .success();

        let contents = fs::read_to_string(work.join(".insight.toml")).unwrap();
        assert!(contents.contains("[relevance]"));
    }
}

mod config {
    use super::*;

    #[test]
    fn shows_defaults() {
        let dir = temp_dir();
        let assert = insight(dir.path()).arg("config").assert().success();
        let stdout = stdout_of(&assert);
        assert!(stdout.contains("url = \"http://localhost:8000\""), "{stdout}");
        assert!(stdout.contains("medium = 0.3"), "{stdout}");
    }

    #[test]
    fn environment_overrides_file() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".insight.toml"),
            "[service]\nurl = \"http://file:1\"\n",
        )
        .unwrap();

        let assert = insight(dir.path())
            .env("INSIGHT_SERVICE_URL", "http://env:2")
            .arg("config")
            .assert()
            .success();
        assert!(stdout_of(&assert).contains("http://env:2"));
    }

    #[test]
    fn invalid_toml_fails() {
        let dir = temp_dir();
        fs::write(dir.path().join(".insight.toml"), "[service\n").unwrap();

        insight(dir.path())
            .arg("config")
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to load configuration"));
    }
}

mod check {
    use super::*;

    #[test]
    fn defaults_have_no_issues() {
        let dir = temp_dir();
        insight(dir.path())
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("No issues found."));
    }

    #[test]
    fn reports_out_of_order_thresholds() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".insight.toml"),
            "[relevance]\nhigh = 0.2\nmedium = 0.3\n",
        )
        .unwrap();

        let assert = insight(dir.path()).arg("check").assert().failure();
        let stdout = stdout_of(&assert);
        assert!(stdout.contains("Warnings (1):"), "{stdout}");
        assert!(stdout.contains("relevance thresholds must descend"), "{stdout}");
    }
}

mod highlight {
    use super::*;

    #[test]
    fn highlights_local_file() {
        let dir = temp_dir();
        fs::write(
            dir.path().join("report.txt"),
            "The quarterly report shows strong growth in Q1.",
        )
        .unwrap();

        let assert = insight(dir.path())
            .args(["highlight", "report.txt", "--query", "growth Q1"])
            .args(["--snippet", "strong growth"])
            .assert()
            .success();
        let raw = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
        assert!(raw.contains("\x1b[1;30;43mstrong growth\x1b[0m"), "{raw}");
        assert!(strip_ansi(&raw).contains("The quarterly report"));
    }

    #[test]
    fn writes_escaped_html() {
        let dir = temp_dir();
        fs::write(
            dir.path().join("page.md"),
            "<script>alert('x')</script> plan & notes",
        )
        .unwrap();

        insight(dir.path())
            .args(["highlight", "page.md", "-q", "plan", "--html", "out.html"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Wrote out.html"));

        let html = fs::read_to_string(dir.path().join("out.html")).unwrap();
        assert!(html.contains("&lt;script&gt;alert(&apos;x&apos;)&lt;/script&gt;"));
        assert!(html.contains("<mark>plan</mark> &amp; notes"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn missing_file_fails() {
        let dir = temp_dir();
        insight(dir.path())
            .args(["highlight", "nope.txt", "-q", "x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to read"));
    }
}

mod search_validation {
    use super::*;

    #[test]
    fn blank_query_is_rejected() {
        let dir = temp_dir();
        fs::write(dir.path().join("a.txt"), "alpha").unwrap();

        insight(dir.path())
            .args(["search", "   ", "a.txt"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("enter a search query"));
    }

    #[test]
    fn no_eligible_documents_is_rejected() {
        let dir = temp_dir();
        fs::write(dir.path().join("data.csv"), "a,b").unwrap();

        insight(dir.path())
            .args(["search", "growth", "data.csv"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("select at least one document"));
    }

    #[test]
    fn missing_path_is_rejected() {
        let dir = temp_dir();
        insight(dir.path())
            .args(["search", "growth", "missing.txt"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("no such file or directory"));
    }

    #[test]
    fn invalid_url_is_rejected() {
        let dir = temp_dir();
        fs::write(dir.path().join("a.txt"), "alpha").unwrap();

        insight(dir.path())
            .args(["search", "growth", "a.txt", "--url", "localhost"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid service URL"));
    }
}

mod service {
    use std::net::TcpListener as StdListener;

    use axum::{
        Json, Router,
        extract::{Multipart, Path as UrlPath},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::{get, post},
    };
    use serde_json::json;
    use tokio::runtime::Runtime;

    use super::*;

    async fn status() -> Json<serde_json::Value> {
        Json(json!({ "files_loaded": 2, "model_loaded": true }))
    }

    async fn search(mut multipart: Multipart) -> Json<serde_json::Value> {
        let mut names = Vec::new();
        while let Some(field) = multipart.next_field().await.unwrap() {
            if field.name() == Some("files") {
                names.push(field.file_name().unwrap_or_default().to_string());
            }
        }
        names.sort();
        let results: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                json!({
                    "filename": name,
                    "content_snippet": "plan of notes",
                    "similarity_score": 0.62 - 0.5 * i as f64,
                    "file_path": name,
                    "confidence_level": "High",
                })
            })
            .collect();
        Json(json!(results))
    }

    async fn file(UrlPath(name): UrlPath<String>) -> Response {
        if name == "notes/plan.txt" {
            Json(json!({ "filename": name, "content": "Read the plan of notes today." }))
                .into_response()
        } else {
            (StatusCode::NOT_FOUND, Json(json!({ "detail": "not found" }))).into_response()
        }
    }

    /// Starts the fake service on a background runtime and returns its base URL.
    fn spawn_service() -> (Runtime, String) {
        let rt = Runtime::new().unwrap();
        let listener = StdListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new()
            .route("/status", get(status))
            .route("/search", post(search))
            .route("/file/:name", get(file));
        rt.spawn(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
        (rt, format!("http://{addr}"))
    }

    /// Writes `notes/plan.txt` and `notes/zeta.md` under `dir`.
    fn write_notes(dir: &Path) {
        let notes = dir.join("notes");
        fs::create_dir(&notes).unwrap();
        fs::write(notes.join("plan.txt"), "Read the plan of notes today.").unwrap();
        fs::write(notes.join("zeta.md"), "unrelated").unwrap();
    }

    #[test]
    fn search_lists_ranked_results() {
        let (_rt, url) = spawn_service();
        let dir = temp_dir();
        write_notes(dir.path());

        let assert = insight(dir.path())
            .args(["search", "plan", "notes", "--url", &url])
            .assert()
            .success();
        let stdout = stdout_of(&assert);
        assert!(stdout.contains("notes/plan.txt"), "{stdout}");
        assert!(stdout.contains("62.0%"), "{stdout}");
        assert!(stdout.contains("High relevance"), "{stdout}");
        assert!(stdout.contains("Minimal relevance"), "{stdout}");
    }

    #[test]
    fn search_json_output() {
        let (_rt, url) = spawn_service();
        let dir = temp_dir();
        write_notes(dir.path());

        let assert = insight(dir.path())
            .args(["search", "plan", "notes", "--json", "-n", "1", "--url", &url])
            .assert()
            .success();
        let value: serde_json::Value =
            serde_json::from_slice(&assert.get_output().stdout).unwrap();
        assert_eq!(value["query"], "plan");
        assert_eq!(value["total_matches"], 2);
        assert_eq!(value["results"].as_array().unwrap().len(), 1);
        assert_eq!(value["results"][0]["tier"], "high");
        assert_eq!(value["results"][0]["rank"], 1);
    }

    #[test]
    fn show_fetches_by_full_identifier_after_not_found() {
        let (_rt, url) = spawn_service();
        let dir = temp_dir();
        write_notes(dir.path());

        let assert = insight(dir.path())
            .args(["search", "plan", "notes", "--show", "1", "--url", &url])
            .args(["--html", "plan.html"])
            .assert()
            .success();
        let stdout = stdout_of(&assert);
        assert!(stdout.contains("Read the plan of notes today."), "{stdout}");

        let html = fs::read_to_string(dir.path().join("plan.html")).unwrap();
        assert!(html.contains("Read the <mark>plan of notes</mark> today."));
        assert!(html.contains("High relevance"));
    }

    #[test]
    fn show_out_of_range_fails() {
        let (_rt, url) = spawn_service();
        let dir = temp_dir();
        write_notes(dir.path());

        insight(dir.path())
            .args(["search", "plan", "notes", "--show", "5", "--url", &url])
            .assert()
            .failure()
            .stderr(predicate::str::contains("no result #5"));
    }

    #[test]
    fn status_reports_service() {
        let (_rt, url) = spawn_service();
        let dir = temp_dir();

        let assert = insight(dir.path())
            .args(["status", "--url", &url])
            .assert()
            .success();
        let stdout = stdout_of(&assert);
        assert!(stdout.contains("Service is up"), "{stdout}");
        assert!(stdout.contains("Files loaded:  2"), "{stdout}");
    }

    #[test]
    fn status_unreachable_fails() {
        let dir = temp_dir();
        let port = StdListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        insight(dir.path())
            .args(["status", "--url", &format!("http://127.0.0.1:{port}")])
            .args(["--timeout", "5"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unavailable"));
    }
}
