use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn mimic_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("mimic");
    path
}

const EXPORT_TEXT: &str = "\
25/12/23, 10:30 AM - John: Hey!
25/12/23, 10:31 AM - Me: Hi John
25/12/23, 10:32 AM - John: Long time!
How have you been?
25/12/23, 10:33 AM - Me: <Media omitted>
25/12/23, 10:34 AM - Me: pretty good tbh
";

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    fs::write(root.join("chat.txt"), EXPORT_TEXT).unwrap();
    fs::write(root.join("not_a_chat.txt"), "shopping list\nmilk\neggs\n").unwrap();

    let config_content = format!(
        r#"[db]
path = "{}/data/mimic.sqlite"

[owner]
name = "Me"

[completion]
model = "gpt-3.5-turbo"
base_url = "http://127.0.0.1:1/unreachable"
timeout_secs = 2

[context]
window = 10
history_limit = 1000
"#,
        root.display()
    );

    let config_path = config_dir.join("mimic.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_mimic(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = mimic_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        // The reply tests must not pick up a real credential from the
        // environment; individual tests set their own.
        .env_remove("OPENAI_API_KEY")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run mimic binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_init_creates_database() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_mimic(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
    assert!(tmp.path().join("data").join("mimic.sqlite").exists());
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_mimic(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_mimic(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

fn import_fixture(config_path: &Path, tmp: &TempDir) -> (String, String, bool) {
    let file = tmp.path().join("chat.txt");
    run_mimic(
        config_path,
        &["import", file.to_str().unwrap(), "--platform", "whatsapp"],
    )
}

#[test]
fn test_import_inserts_filtered_records() {
    let (tmp, config_path) = setup_test_env();

    run_mimic(&config_path, &["init"]);
    let (stdout, stderr, success) = import_fixture(&config_path, &tmp);
    assert!(success, "import failed: stdout={}, stderr={}", stdout, stderr);
    // 5 headers in the fixture, one is <Media omitted> noise.
    assert!(stdout.contains("messages parsed: 4"), "got: {}", stdout);
    assert!(stdout.contains("owner-authored: 2"), "got: {}", stdout);
    assert!(stdout.contains("inserted: 4"));
    assert!(stdout.contains("ok"));
}

#[test]
fn test_import_dry_run_writes_nothing() {
    let (tmp, config_path) = setup_test_env();

    run_mimic(&config_path, &["init"]);
    let file = tmp.path().join("chat.txt");
    let (stdout, _, success) = run_mimic(
        &config_path,
        &[
            "import",
            file.to_str().unwrap(),
            "--platform",
            "whatsapp",
            "--dry-run",
        ],
    );
    assert!(success);
    assert!(stdout.contains("dry-run"));
    assert!(stdout.contains("messages parsed: 4"));

    let (stats_out, _, _) = run_mimic(&config_path, &["stats"]);
    assert!(stats_out.contains("Messages:   0"), "got: {}", stats_out);
}

#[test]
fn test_import_unrecognized_file_fails() {
    let (tmp, config_path) = setup_test_env();

    run_mimic(&config_path, &["init"]);
    let file = tmp.path().join("not_a_chat.txt");
    let (_, stderr, success) = run_mimic(
        &config_path,
        &["import", file.to_str().unwrap(), "--platform", "whatsapp"],
    );
    assert!(!success, "importing a non-export should fail");
    assert!(
        stderr.contains("no messages found"),
        "should explain the empty import, got: {}",
        stderr
    );
}

#[test]
fn test_import_missing_file_fails() {
    let (_tmp, config_path) = setup_test_env();

    run_mimic(&config_path, &["init"]);
    let (_, stderr, success) =
        run_mimic(&config_path, &["import", "/nonexistent/chat.txt"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read export file"));
}

#[test]
fn test_list_shows_messages() {
    let (tmp, config_path) = setup_test_env();

    run_mimic(&config_path, &["init"]);
    import_fixture(&config_path, &tmp);

    let (stdout, _, success) = run_mimic(&config_path, &["list"]);
    assert!(success);
    assert!(stdout.contains("John"));
    assert!(stdout.contains("Hi John"));
    // Owner messages carry a marker.
    assert!(stdout.contains("Me*"));
}

#[test]
fn test_list_platform_filter() {
    let (tmp, config_path) = setup_test_env();

    run_mimic(&config_path, &["init"]);
    import_fixture(&config_path, &tmp);

    let (stdout, _, success) = run_mimic(&config_path, &["list", "--platform", "telegram"]);
    assert!(success);
    assert!(stdout.contains("No messages stored."));
}

#[test]
fn test_list_conversation_is_chronological() {
    let (tmp, config_path) = setup_test_env();

    run_mimic(&config_path, &["init"]);
    import_fixture(&config_path, &tmp);

    let (stdout, _, success) =
        run_mimic(&config_path, &["list", "--conversation", "whatsapp_main"]);
    assert!(success);
    let hey = stdout.find("Hey!").expect("first message shown");
    let good = stdout.find("pretty good tbh").expect("last message shown");
    assert!(hey < good, "thread view must be oldest first: {}", stdout);
}

#[test]
fn test_stats_breakdown() {
    let (tmp, config_path) = setup_test_env();

    run_mimic(&config_path, &["init"]);
    import_fixture(&config_path, &tmp);

    let (stdout, _, success) = run_mimic(&config_path, &["stats"]);
    assert!(success);
    assert!(stdout.contains("Messages:   4"), "got: {}", stdout);
    assert!(stdout.contains("Platforms:  1"), "got: {}", stdout);
    assert!(stdout.contains("whatsapp"));
}

#[test]
fn test_clear_by_platform_then_all() {
    let (tmp, config_path) = setup_test_env();

    run_mimic(&config_path, &["init"]);
    import_fixture(&config_path, &tmp);

    let (stdout, _, success) = run_mimic(&config_path, &["clear", "--platform", "telegram"]);
    assert!(success);
    assert!(stdout.contains("Deleted 0"));

    let (stdout, _, success) = run_mimic(&config_path, &["clear"]);
    assert!(success);
    assert!(stdout.contains("Deleted 4"));

    let (stats_out, _, _) = run_mimic(&config_path, &["stats"]);
    assert!(stats_out.contains("Messages:   0"));
}

#[test]
fn test_import_twice_is_deterministic() {
    let (tmp, config_path) = setup_test_env();

    run_mimic(&config_path, &["init"]);
    let (out1, _, _) = import_fixture(&config_path, &tmp);
    let (out2, _, _) = import_fixture(&config_path, &tmp);
    // Re-imports are not deduplicated; both passes parse identically.
    assert!(out1.contains("messages parsed: 4"));
    assert!(out2.contains("messages parsed: 4"));

    let (stats_out, _, _) = run_mimic(&config_path, &["stats"]);
    assert!(stats_out.contains("Messages:   8"), "got: {}", stats_out);
}

#[test]
fn test_reply_without_credential_fails() {
    let (tmp, config_path) = setup_test_env();

    run_mimic(&config_path, &["init"]);
    import_fixture(&config_path, &tmp);

    let (_, stderr, success) = run_mimic(&config_path, &["reply", "you around?"]);
    assert!(!success, "reply without a credential should fail");
    assert!(
        stderr.contains("OPENAI_API_KEY"),
        "should name the missing credential, got: {}",
        stderr
    );
}

#[test]
fn test_reply_empty_message_rejected() {
    let (_tmp, config_path) = setup_test_env();

    run_mimic(&config_path, &["init"]);
    let (_, stderr, success) = run_mimic(&config_path, &["reply", "   "]);
    assert!(!success);
    assert!(
        stderr.contains("must not be empty"),
        "got: {}",
        stderr
    );
}

#[test]
fn test_reply_unreachable_service_reports_completion_failure() {
    let (tmp, config_path) = setup_test_env();

    run_mimic(&config_path, &["init"]);
    import_fixture(&config_path, &tmp);

    let binary = mimic_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(["reply", "you around?"])
        .env("OPENAI_API_KEY", "sk-test-not-real")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("completion service failure"),
        "should surface the structured completion failure, got: {}",
        stderr
    );
}

#[test]
fn test_missing_config_fails() {
    let (_tmp, config_path) = setup_test_env();
    let missing = config_path.with_file_name("absent.toml");

    let (_, stderr, success) = run_mimic(&missing, &["init"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));
}

#[test]
fn test_invalid_config_rejected() {
    let (tmp, config_path) = setup_test_env();

    let bad = format!(
        r#"[db]
path = "{}/data/mimic.sqlite"

[owner]
name = "  "
"#,
        tmp.path().display()
    );
    fs::write(&config_path, bad).unwrap();

    let (_, stderr, success) = run_mimic(&config_path, &["init"]);
    assert!(!success);
    assert!(stderr.contains("owner.name"), "got: {}", stderr);
}
