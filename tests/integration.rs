use std::{env, fs, path::PathBuf, process::Command};

fn run_bin(args: &[&str]) -> (bool, String, String) {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_daystat"));

    let output = Command::new(bin)
        .args(args)
        .output()
        .expect("failed to execute command");

    let stdout_str = String::from_utf8(output.stdout).expect("failed to convert stdout to string");
    let stderr_str = String::from_utf8(output.stderr).expect("failed to convert stderr to string");

    (output.status.success(), stdout_str, stderr_str)
}

fn run_ok(args: &[&str]) -> String {
    let (success, stdout_str, stderr_str) = run_bin(args);
    assert!(
        success,
        "failed to run binary with {args:?}\nstdout:\n{stdout_str}\nstderr:\n{stderr_str}\n"
    );
    stdout_str
}

fn test_dir(name: &str) -> PathBuf {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");
    test_dir
}

#[test]
fn summary_workflow() {
    let stdout_str = run_ok(&["summary", "--format", "json"]);
    let summaries: serde_json::Value =
        serde_json::from_str(&stdout_str).expect("failed to parse summaries");
    let summaries = summaries.as_array().expect("summaries must be an array");

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0]["source_name"], "Dados JSON");
    assert_eq!(summaries[0]["zero_days"], 9);
    assert_eq!(summaries[0]["max"]["day"], 16);
    assert_eq!(summaries[0]["min_positive"]["day"], 14);
    assert_eq!(summaries[1]["source_name"], "Dados XML");
    assert_eq!(summaries[1]["max"]["day"], 28);
    assert_eq!(summaries[1]["min_positive"]["day"], 27);

    let stdout_str = run_ok(&["summary"]);
    assert!(stdout_str.contains("Data source: Dados JSON"));
    assert!(stdout_str.contains("R$ 48.924,24 (day 16)"));
    assert!(stdout_str.contains("R$ 373,78 (day 14)"));
    assert!(stdout_str.contains("9 days"));
}

#[test]
fn report_workflow() {
    let test_dir = test_dir("report_workflow");
    let test_dir_str = test_dir
        .to_str()
        .expect("failed to convert test directory to string");

    let stdout_str = run_ok(&["report"]);
    assert!(stdout_str.contains("Daily comparison"));
    assert!(stdout_str.contains("# dados.json"));
    assert!(stdout_str.contains("= dados (2).xml"));

    let html_path = test_dir.join("report.html");
    let html_str = html_path.to_str().expect("failed to convert path to string");
    run_ok(&["report", "--format", "html", "--output", html_str]);
    let html = fs::read_to_string(&html_path).expect("failed to read report");
    assert_eq!(html.matches("class=\"stat-card\"").count(), 2);
    assert!(html.contains("<svg"));

    let config_path = test_dir.join("config.toml");
    let config_contents = String::new()
        + "[currency]\n"
        + "symbol = \"US$\"\n"
        + "decimal_separator = \".\"\n"
        + "thousands_separator = \",\"\n"
        + "\n"
        + "[chart]\n"
        + "backend = \"none\"\n";
    fs::write(&config_path, config_contents).expect("failed to write config file");
    let config_str = config_path.to_str().expect("failed to convert path to string");

    let stdout_str = run_ok(&["--config", config_str, "report", "--format", "html"]);
    assert!(stdout_str.contains("US$ 48,924.24 (day 16)"));
    assert!(stdout_str.contains("<p class=\"error\">"));
    assert!(!stdout_str.contains("<svg"));

    let missing_dir = format!("{test_dir_str}/missing/report.html");
    let (success, _, _) = run_bin(&["report", "--output", &missing_dir]);
    assert!(!success);

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn invalid_config_fails() {
    let test_dir = test_dir("invalid_config_fails");

    let config_path = test_dir.join("config.toml");
    fs::write(&config_path, "[chart]\nwidth = 1\n").expect("failed to write config file");
    let config_str = config_path.to_str().expect("failed to convert path to string");

    let (success, _, stderr_str) = run_bin(&["--config", config_str, "summary"]);
    assert!(!success);
    assert!(stderr_str.contains("failed to validate config"));

    fs::remove_dir_all(&test_dir).ok();
}
