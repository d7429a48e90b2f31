use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_snapstats_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("snapstats")
}

fn completion_for(shell: &str) -> assert_cmd::assert::Assert {
    Command::new(get_snapstats_bin())
        .args(["completion", "--shell", shell])
        .assert()
}

#[test]
fn test_completion_help_lists_shells_and_setup() {
    let mut cmd = Command::new(get_snapstats_bin());
    cmd.args(["completion", "--help"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("SUPPORTED SHELLS"))
        .stdout(predicate::str::contains("powershell"))
        .stdout(predicate::str::contains("INSTALLATION"))
        .stdout(predicate::str::contains("~/.zfunc/_snapstats"));
}

#[test]
fn test_bash_completion_knows_analyze_flags() {
    completion_for("bash")
        .success()
        .stdout(predicate::str::contains("complete -F _snapstats"))
        .stdout(predicate::str::contains("--window-ms"))
        .stdout(predicate::str::contains("--timeout-secs"))
        .stdout(predicate::str::contains("--save-sample"));
}

#[test]
fn test_bash_completion_knows_global_file_flags() {
    completion_for("bash")
        .success()
        .stdout(predicate::str::contains("--history-file"))
        .stdout(predicate::str::contains("--settings-file"));
}

#[test]
fn test_zsh_completion_knows_config_and_export() {
    completion_for("zsh")
        .success()
        .stdout(predicate::str::contains("#compdef snapstats"))
        .stdout(predicate::str::contains("--network"))
        .stdout(predicate::str::contains("--as"));
}

#[test]
fn test_fish_completion_knows_subcommands() {
    completion_for("fish")
        .success()
        .stdout(predicate::str::contains("complete -c snapstats"))
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("window-ms"));
}

#[test]
fn test_unknown_shell_is_rejected() {
    completion_for("tcsh")
        .failure()
        .stderr(predicate::str::contains("invalid value 'tcsh'"));
}

#[test]
fn test_shell_flag_is_required() {
    let mut cmd = Command::new(get_snapstats_bin());
    cmd.arg("completion");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--shell <SHELL>"));
}
