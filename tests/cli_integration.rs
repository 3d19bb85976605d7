//! CLI integration tests for kanbn
//!
//! These tests drive the binary end to end: board initialisation, the
//! interactive wizard, help routing and the task lifecycle.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance for the kanbn binary, isolated from user config
fn kanbn_cmd(dir: &Path, config_dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("kanbn"));
    cmd.current_dir(dir)
        .env("KANBN_ROOT", dir)
        .env("KANBN_CONFIG_DIR", config_dir)
        .env_remove("KANBN_FORMAT")
        .env_remove("KANBN_VERBOSE");
    cmd
}

struct Fixture {
    dir: TempDir,
    config: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            config: TempDir::new().unwrap(),
        }
    }

    fn cmd(&self) -> assert_cmd::Command {
        kanbn_cmd(self.dir.path(), self.config.path())
    }

    fn path(&self, rel: &str) -> std::path::PathBuf {
        self.dir.path().join(rel)
    }

    fn index(&self) -> String {
        fs::read_to_string(self.path(".kanbn/index.md")).unwrap()
    }
}

/// Create a board with two columns
fn setup_board() -> Fixture {
    let fx = Fixture::new();
    fx.cmd()
        .args(["init", "-n", "Board", "-c", "Todo", "-c", "Done"])
        .assert()
        .success();
    fx
}

// =============================================================================
// Initialisation Tests
// =============================================================================

#[test]
fn test_init_with_flags() {
    let fx = Fixture::new();

    fx.cmd()
        .args([
            "init",
            "-n",
            "test123",
            "-d",
            "Test description",
            "-c",
            "Column 1",
            "-c",
            "Column 2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialised empty kanbn board"));

    assert!(fx.path(".kanbn/tasks").is_dir());
    assert!(fx.path(".kanbn/archive").is_dir());
    assert_eq!(
        fx.index(),
        "# test123\n\nTest description\n\n## Column 1\n\n## Column 2\n"
    );
}

#[test]
fn test_init_alias() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["i", "--name", "Aliased"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialised empty kanbn board"));

    assert!(fx.index().starts_with("# Aliased\n"));
}

#[test]
fn test_init_without_columns_uses_defaults() {
    let fx = Fixture::new();

    fx.cmd().args(["init", "-n", "Defaults"]).assert().success();

    let index = fx.index();
    assert!(index.contains("## Backlog"));
    assert!(index.contains("## Done"));
}

#[test]
fn test_reinit_keeps_existing_board() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["init", "-n", "Existing", "-d", "Kept", "-c", "Test Column"])
        .assert()
        .success();

    fx.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reinitialised existing kanbn board"));

    assert_eq!(fx.index(), "# Existing\n\nKept\n\n## Test Column\n");
}

#[test]
fn test_reinit_keeps_tasks_in_retained_columns() {
    let fx = setup_board();

    fx.cmd().args(["add", "-n", "First task"]).assert().success();
    fx.cmd()
        .args(["init", "-c", "Todo", "-c", "Review"])
        .assert()
        .success();

    let index = fx.index();
    assert!(index.contains("## Todo\n\n- [first-task](tasks/first-task.md)"));
    assert!(index.contains("## Review"));
    assert!(!index.contains("## Done"));
}

#[test]
fn test_init_interactive_from_stdin() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["init", "-i"])
        .write_stdin("Test project name\nn\ny\nTest column name\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialised empty kanbn board"));

    assert_eq!(fx.index(), "# Test project name\n\n## Test column name\n");
}

#[test]
fn test_init_interactive_reprompts_invalid_answers() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["init", "--interactive"])
        .write_stdin("\nBoard\ny\nAbout it\ny\nTodo\ny\nTodo\nDone\nn\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Project name cannot be empty"))
        .stderr(predicate::str::contains("Column name already exists"));

    assert_eq!(fx.index(), "# Board\n\nAbout it\n\n## Todo\n\n## Done\n");
}

#[test]
fn test_init_interactive_interrupted() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["init", "-i"])
        .write_stdin("Half done\n")
        .assert()
        .failure();

    assert!(!fx.path(".kanbn/index.md").exists());
}

// =============================================================================
// Dispatch and Help Tests
// =============================================================================

#[test]
fn test_unknown_command_fails() {
    let fx = Fixture::new();

    fx.cmd()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown command \"frobnicate\""));
}

#[test]
fn test_no_command_fails() {
    let fx = Fixture::new();

    fx.cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown command"));
}

#[test]
fn test_general_help() {
    let fx = Fixture::new();

    fx.cmd()
        .arg("help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: kanbn <command> [options]"))
        .stdout(predicate::str::contains("archive"));
}

#[test]
fn test_help_topic_and_help_flag_agree() {
    let fx = Fixture::new();

    let topic = fx.cmd().args(["help", "add"]).assert().success();
    let flag = fx.cmd().args(["add", "--help"]).assert().success();

    let topic = String::from_utf8(topic.get_output().stdout.clone()).unwrap();
    let flag = String::from_utf8(flag.get_output().stdout.clone()).unwrap();

    assert!(topic.starts_with("Usage: kanbn add|a"));
    assert_eq!(topic, flag);
}

#[test]
fn test_help_flag_does_not_run_command() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["init", "-h", "-n", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: kanbn init|i"));

    assert!(!fx.path(".kanbn").exists());
}

#[test]
fn test_unknown_flags_are_ignored() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["init", "--colour", "blue", "-n", "Lenient"])
        .assert()
        .success();

    assert!(fx.index().starts_with("# Lenient\n"));
}

#[test]
fn test_version() {
    let fx = Fixture::new();

    fx.cmd()
        .arg("v")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("kanbn v"));

    fx.cmd()
        .args(["version", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\":\"kanbn\""));
}

// =============================================================================
// Task Tests
// =============================================================================

#[test]
fn test_add_requires_board() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["add", "-n", "Nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Kanbn has not been initialised"));
}

#[test]
fn test_add_task() {
    let fx = setup_board();

    fx.cmd()
        .args(["add", "-n", "Write docs", "-d", "All of them", "-t", "docs", "-c", "Done"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Added task \"write-docs\" to column \"Done\"",
        ));

    let task = fs::read_to_string(fx.path(".kanbn/tasks/write-docs.md")).unwrap();
    assert!(task.starts_with("---\n"));
    assert!(task.contains("# Write docs"));
    assert!(task.contains("All of them"));
    assert!(task.contains("docs"));
    assert!(fx.index().contains("## Done\n\n- [write-docs](tasks/write-docs.md)"));
}

#[test]
fn test_add_rejects_blank_and_duplicate_names() {
    let fx = setup_board();

    fx.cmd()
        .args(["add", "-n", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task name cannot be blank"));

    fx.cmd().args(["add", "-n", "Once"]).assert().success();
    fx.cmd()
        .args(["add", "-n", "Once"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_add_to_missing_column_fails() {
    let fx = setup_board();

    fx.cmd()
        .args(["add", "-n", "Lost", "-c", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Column \"Nope\" doesn't exist"));
}

#[test]
fn test_add_untracked() {
    let fx = setup_board();

    fx.cmd()
        .args(["add", "-u"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No untracked tasks to add"));

    fs::write(
        fx.path(".kanbn/tasks/stray.md"),
        "---\ncreated: 2024-01-01T00:00:00Z\nupdated: 2024-01-01T00:00:00Z\n---\n\n# Stray\n",
    )
    .unwrap();

    fx.cmd()
        .args(["add", "--untracked"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"stray\""));

    assert!(fx.index().contains("- [stray](tasks/stray.md)"));
}

#[test]
fn test_archive_and_restore() {
    let fx = setup_board();

    fx.cmd()
        .args(["add", "-n", "Ship it", "-c", "Done"])
        .assert()
        .success();

    fx.cmd()
        .args(["archive", "ship-it"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Archived task \"ship-it\""));

    assert!(fx.path(".kanbn/archive/ship-it.md").is_file());
    assert!(!fx.path(".kanbn/tasks/ship-it.md").exists());
    assert!(!fx.index().contains("ship-it"));

    fx.cmd()
        .args(["archive", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ship-it"));

    fx.cmd()
        .args(["restore", "ship-it"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Restored task \"ship-it\" to column \"Done\"",
        ));

    assert!(fx.path(".kanbn/tasks/ship-it.md").is_file());
    assert!(fx.index().contains("## Done\n\n- [ship-it](tasks/ship-it.md)"));

    fx.cmd()
        .args(["archive", "-l"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No archived tasks"));
}

#[test]
fn test_archive_errors() {
    let fx = setup_board();

    fx.cmd()
        .arg("archive")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No task id specified"));

    fx.cmd()
        .args(["archive", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No task with id \"ghost\""));

    fx.cmd()
        .args(["restore", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No archived task with id \"ghost\""));
}

#[test]
fn test_json_format_from_env() {
    let fx = setup_board();

    fx.cmd()
        .env("KANBN_FORMAT", "json")
        .args(["add", "-n", "Json task"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\":\"json-task\""));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let fx = setup_board();

    fx.cmd()
        .env("KANBN_VERBOSE", "1")
        .arg("version")
        .assert()
        .success()
        .stderr(predicate::str::contains("[verbose:dispatch]"));
}

// =============================================================================
// Index Integrity Tests
// =============================================================================

#[test]
fn test_description_headings_do_not_break_the_board() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["init", "-n", "B", "-d", "Intro\n# Goals\n## Notes", "-c", "Todo"])
        .assert()
        .success();

    fx.cmd().args(["add", "-n", "Task"]).assert().success();
    fx.cmd().arg("init").assert().success();

    assert_eq!(
        fx.index(),
        "# B\n\nIntro\n\\# Goals\n\\## Notes\n\n## Todo\n\n- [task](tasks/task.md)\n"
    );
}

#[test]
fn test_init_rejects_blank_column() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["init", "-n", "B", "-c", "", "-c", "Done"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Column name cannot be empty"));

    assert!(!fx.path(".kanbn/index.md").exists());
}

#[test]
fn test_init_rejects_duplicate_column() {
    let fx = setup_board();

    fx.cmd()
        .args(["init", "-c", "A", "-c", "A"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Column name already exists"));

    assert_eq!(fx.index(), "# Board\n\n## Todo\n\n## Done\n");
}

#[test]
fn test_help_in_short_cluster_does_not_run_command() {
    let fx = setup_board();

    fx.cmd()
        .args(["init", "-ih"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: kanbn init|i"))
        .stdout(predicate::str::contains("Reinitialised").not());
}
