//! Smoke tests to verify command module wiring

use assert_cmd::Command;
use predicates::prelude::*;

// === Auth Command Tests ===

#[test]
fn test_auth_login_help() {
    let mut cmd = Command::cargo_bin("spontyctl").unwrap();
    cmd.arg("auth").arg("login").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Sign in with email and password"));
}

#[test]
fn test_auth_signup_help() {
    let mut cmd = Command::cargo_bin("spontyctl").unwrap();
    cmd.arg("auth").arg("signup").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--username"));
}

#[test]
fn test_auth_register_help() {
    let mut cmd = Command::cargo_bin("spontyctl").unwrap();
    cmd.arg("auth").arg("register").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Complete profile registration"));
}

// === Friends Command Tests ===

#[test]
fn test_friends_list_help() {
    let mut cmd = Command::cargo_bin("spontyctl").unwrap();
    cmd.arg("friends").arg("list").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--group"));
}

#[test]
fn test_friends_search_help() {
    let mut cmd = Command::cargo_bin("spontyctl").unwrap();
    cmd.arg("friends").arg("search").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("username prefix"));
}

#[test]
fn test_friends_requests_help() {
    let mut cmd = Command::cargo_bin("spontyctl").unwrap();
    cmd.arg("friends").arg("requests").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--all"));
}

// === Groups Command Tests ===

#[test]
fn test_groups_add_help() {
    let mut cmd = Command::cargo_bin("spontyctl").unwrap();
    cmd.arg("groups").arg("add").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Friend user id to add"));
}

// === Events Command Tests ===

#[test]
fn test_events_create_help() {
    let mut cmd = Command::cargo_bin("spontyctl").unwrap();
    cmd.arg("events").arg("create").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--open-circle"));
}

#[test]
fn test_events_feed_help() {
    let mut cmd = Command::cargo_bin("spontyctl").unwrap();
    cmd.arg("events").arg("feed").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("title substring"));
}

#[test]
fn test_events_show_help() {
    let mut cmd = Command::cargo_bin("spontyctl").unwrap();
    cmd.arg("events").arg("show").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--sent"));
}

#[test]
fn test_events_invite_help() {
    let mut cmd = Command::cargo_bin("spontyctl").unwrap();
    cmd.arg("events").arg("invite").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--friend"))
        .stdout(predicate::str::contains("--group"))
        .stdout(predicate::str::contains("already invited"));
}

// === Inbox Command Tests ===

#[test]
fn test_inbox_list_help() {
    let mut cmd = Command::cargo_bin("spontyctl").unwrap();
    cmd.arg("inbox").arg("list").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("pending invitations"));
}

// === Config Command Tests ===

#[test]
fn test_config_init_help() {
    let mut cmd = Command::cargo_bin("spontyctl").unwrap();
    cmd.arg("config").arg("init").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("anon key"));
}

#[test]
fn test_config_path_runs_without_backend() {
    let mut cmd = Command::cargo_bin("spontyctl").unwrap();
    cmd.arg("config").arg("path");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_then_show_round_trip() {
    let home = tempfile::TempDir::new().unwrap();

    let mut init = Command::cargo_bin("spontyctl").unwrap();
    init.env("HOME", home.path())
        .env_remove("SPONTYUP_URL")
        .env_remove("SPONTYUP_ANON_KEY")
        .arg("config")
        .arg("init")
        .arg("--url")
        .arg("https://demo.supabase.co/")
        .arg("--anon-key")
        .arg("anon-key-value-for-tests");
    init.assert().success();

    let mut show = Command::cargo_bin("spontyctl").unwrap();
    show.env("HOME", home.path())
        .env_remove("SPONTYUP_URL")
        .env_remove("SPONTYUP_ANON_KEY")
        .arg("config")
        .arg("show");
    show.assert()
        .success()
        // trailing slash is normalized away on save
        .stdout(predicate::str::contains("https://demo.supabase.co\n"))
        // the key itself stays redacted
        .stdout(predicate::str::contains("anon-key-value-for-tests").not());
}

// === Completions ===

#[test]
fn test_completions_bash() {
    let mut cmd = Command::cargo_bin("spontyctl").unwrap();
    cmd.arg("completions").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("spontyctl"));
}
