use assert_cmd::cargo;
use assert_cmd::Command;
use mockito::Matcher;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command as GitCommand;
use tempfile::{TempDir, tempdir};

// --- Test Setup Helper ---

struct TestRepo {
    temp_dir: TempDir,
}

impl TestRepo {
    /// A plain directory that git will not treat as part of any enclosing repository.
    fn bare_dir() -> Self {
        TestRepo {
            temp_dir: tempdir().expect("failed to create temp dir"),
        }
    }

    fn with_git(self) -> Self {
        self.git(&["init", "--quiet"]);
        self
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    fn stage(&self, file_name: &str, content: &str) {
        let file_path = self.path().join(file_name);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        fs::write(&file_path, content).expect("failed to write file");
        self.git(&["add", file_name]);
    }

    fn commit(&self, message: &str) {
        self.git(&[
            "-c",
            "user.name=Test User",
            "-c",
            "user.email=test@example.com",
            "-c",
            "commit.gpgsign=false",
            "commit",
            "--quiet",
            "-m",
            message,
        ]);
    }

    fn git(&self, args: &[&str]) {
        let output = self
            .git_env(GitCommand::new("git"))
            .args(args)
            .output()
            .unwrap_or_else(|e| panic!("failed to run git {args:?}: {e}"));
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    fn git_env(&self, mut cmd: GitCommand) -> GitCommand {
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env("GIT_CEILING_DIRECTORIES", self.ceiling());
        cmd
    }

    fn ceiling(&self) -> &Path {
        self.path().parent().unwrap_or(self.path())
    }

    /// The binary, pointed at this repo, with no ambient credentials or overrides.
    fn commitdraft(&self) -> Command {
        let mut cmd = cargo::cargo_bin_cmd!();
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env("GIT_CEILING_DIRECTORIES", self.ceiling())
            .env_remove("GITHUB_TOKEN")
            .env_remove("COMMITDRAFT_MODEL")
            .env_remove("COMMITDRAFT_ENDPOINT");
        cmd
    }
}

fn chat_reply(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "model": "meta-llama-3-70b-instruct",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21 }
    })
    .to_string()
}

// --- Tests ---

#[test]
fn debug_prints_prompt_with_file_and_diff() {
    let repo = TestRepo::bare_dir().with_git();
    repo.stage("a.py", "print(1)\n");

    repo.commitdraft()
        .args(["--debug", "add print"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Task description\nadd print\n"))
        .stdout(predicate::str::contains("a.py:\nprint(1)\n"))
        .stdout(predicate::str::contains("# Git diff\n```\ndiff --git a/a.py b/a.py"))
        .stdout(predicate::str::contains("+print(1)\n"));
}

#[test]
fn debug_mode_needs_no_credential_or_network() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", Matcher::Any).expect(0).create();

    let repo = TestRepo::bare_dir().with_git();
    repo.stage("a.py", "print(1)\n");

    repo.commitdraft()
        .args(["--debug", "--endpoint", &server.url(), "add print"])
        .assert()
        .success();

    mock.assert();
}

#[test]
fn files_in_subdirectories_are_read_from_the_index() {
    let repo = TestRepo::bare_dir().with_git();
    repo.stage("src/lib.rs", "pub fn staged() {}\n");
    fs::write(repo.path().join("src/lib.rs"), "pub fn unstaged_edit() {}\n").unwrap();

    repo.commitdraft()
        .args(["--debug", "library"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lib.rs:\npub fn staged() {}\n"))
        .stdout(predicate::str::contains("unstaged_edit").not());
}

#[test]
fn generates_message_from_the_model() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#""temperature":0\.3"#.into()),
            Matcher::Regex(r#"a\.py:\\nprint\(1\)\\n"#.into()),
            Matcher::Regex(r#"\+print\(1\)"#.into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_reply("Add print statement\n\n- Print `1` from `a.py`"))
        .create();

    let repo = TestRepo::bare_dir().with_git();
    repo.stage("a.py", "print(1)\n");

    repo.commitdraft()
        .args(["--endpoint", &server.url(), "add print"])
        .env("GITHUB_TOKEN", "test-token")
        .assert()
        .success()
        .stdout("Add print statement\n\n- Print `1` from `a.py`\n");

    mock.assert();
}

#[test]
fn nothing_staged_fails_before_calling_the_model() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", Matcher::Any).expect(0).create();

    let repo = TestRepo::bare_dir().with_git();

    repo.commitdraft()
        .args(["--endpoint", &server.url(), "--api-key", "k", "anything"])
        .assert()
        .failure()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no staged changes"));

    mock.assert();
}

#[test]
fn outside_a_repository_is_a_tool_failure() {
    let repo = TestRepo::bare_dir();

    repo.commitdraft()
        .args(["--debug", "anything"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("git --no-pager diff --staged"));
}

#[test]
fn missing_token_is_an_authentication_failure() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", Matcher::Any).expect(0).create();

    let repo = TestRepo::bare_dir().with_git();
    repo.stage("a.py", "print(1)\n");

    repo.commitdraft()
        .args(["--endpoint", &server.url(), "add print"])
        .assert()
        .failure()
        .code(5)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("GITHUB_TOKEN"));

    mock.assert();
}

#[test]
fn rejected_token_is_an_authentication_failure() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"code":"unauthorized","message":"Bad credentials"}}"#)
        .create();

    let repo = TestRepo::bare_dir().with_git();
    repo.stage("a.py", "print(1)\n");

    repo.commitdraft()
        .args(["--endpoint", &server.url(), "--api-key", "nope", "add print"])
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("401"))
        .stderr(predicate::str::contains("nope").not());
}

#[test]
fn server_errors_are_service_failures() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/chat/completions")
        .with_status(503)
        .with_body("upstream unavailable")
        .create();

    let repo = TestRepo::bare_dir().with_git();
    repo.stage("a.py", "print(1)\n");

    repo.commitdraft()
        .args(["--endpoint", &server.url(), "--api-key", "k", "add print"])
        .assert()
        .failure()
        .code(6)
        .stderr(predicate::str::contains("503"));
}

#[test]
fn runs_from_a_subdirectory_of_the_work_tree() {
    let repo = TestRepo::bare_dir().with_git();
    repo.stage("sub/x.py", "print(2)\n");
    repo.stage("top.py", "print(0)\n");
    let sub = repo.path().join("sub");

    repo.commitdraft()
        .current_dir(&sub)
        .args(["--debug", "task"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{}:\nprint(2)\n", sub.join("x.py").display())))
        .stdout(predicate::str::contains("sub/sub").not())
        .stdout(predicate::str::contains("top.py").not());
}

#[test]
fn repo_flag_pointing_at_a_subdirectory_scopes_the_changes() {
    let repo = TestRepo::bare_dir().with_git();
    repo.stage("sub/x.py", "print(2)\n");
    repo.stage("top.py", "print(0)\n");

    repo.commitdraft()
        .args(["--repo", "sub", "--debug", "task"])
        .assert()
        .success()
        .stdout(predicate::str::contains("x.py:\nprint(2)\n"))
        .stdout(predicate::str::contains("top.py").not());
}

#[test]
fn subdirectory_with_nothing_staged_is_empty() {
    let repo = TestRepo::bare_dir().with_git();
    fs::create_dir_all(repo.path().join("docs")).unwrap();
    repo.stage("top.py", "print(0)\n");

    repo.commitdraft()
        .current_dir(repo.path().join("docs"))
        .args(["--debug", "task"])
        .assert()
        .failure()
        .code(3);
}

#[test]
fn staged_deletion_fails_before_calling_the_model() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", Matcher::Any).expect(0).create();

    let repo = TestRepo::bare_dir().with_git();
    repo.stage("a.py", "print(1)\n");
    repo.commit("add a.py");
    repo.git(&["rm", "--quiet", "a.py"]);

    repo.commitdraft()
        .args(["--endpoint", &server.url(), "--api-key", "k", "remove a.py"])
        .assert()
        .failure()
        .code(4)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("git show :./a.py"));

    mock.assert();
}
