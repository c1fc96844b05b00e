use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn bin() -> String {
    // Cargo sets this for bin targets in integration tests
    env!("CARGO_BIN_EXE_singularis").to_string()
}

/// Runs the CLI with its config directory pointed at `home` so a user's
/// own config never leaks into the test.
fn run(home: &Path, args: &[&str]) -> Output {
    Command::new(bin())
        .args(args)
        .env("SINGULARIS_CONFIG_DIR", home)
        .env("NO_COLOR", "1")
        .env_remove("OPENAI_API_KEY")
        .env_remove("SINGULARIS_DEBUG")
        .output()
        .expect("run")
}

fn stdout(o: &Output) -> String {
    String::from_utf8_lossy(&o.stdout).to_string()
}

fn assert_success(o: &Output) {
    assert!(
        o.status.success(),
        "stdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&o.stdout),
        String::from_utf8_lossy(&o.stderr)
    );
}

const GUARD: &str = "import \"q\";\ncontract Guard {\n  enforce explainabilityThreshold(0.9);\n}\n";

#[test]
fn cli_compile_writes_default_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("guard.sp");
    fs::write(&input, GUARD).unwrap();

    let output = run(dir.path(), &["compile", input.to_str().unwrap()]);
    assert_success(&output);

    let bytecode = fs::read_to_string(dir.path().join("guard.spb")).expect("guard.spb exists");
    assert!(bytecode.contains("CONTRACT_BEGIN Guard"));
    assert!(bytecode.contains("  ENFORCE explainabilityThreshold 0.9"));
    assert!(bytecode.ends_with("HALT\n"));
}

#[test]
fn cli_compile_to_stdout_with_header_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("guard.sp");
    fs::write(&input, GUARD).unwrap();
    fs::write(dir.path().join("config.toml"), "[compiler]\nheader = true\n").unwrap();

    let output = run(dir.path(), &["compile", input.to_str().unwrap(), "--stdout"]);
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.starts_with("; SINGULARIS PRIME bytecode\n; compiled "), "{}", text);
    assert!(text.contains("IMPORT \"q\""));
    assert!(!dir.path().join("guard.spb").exists());
}

#[test]
fn cli_parse_json_lists_declarations() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("guard.sp");
    fs::write(&input, GUARD).unwrap();

    let output = run(dir.path(), &["--json", "parse", input.to_str().unwrap()]);
    assert_success(&output);
    let v: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    let decls = v["declarations"].as_array().unwrap();
    assert_eq!(decls.len(), 2);
    assert_eq!(decls[1]["type"], "ContractDeclaration");
    assert_eq!(decls[1]["body"][0]["type"], "EnforceStatement");
}

#[test]
fn cli_tokens_prints_keywords() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("guard.sp");
    fs::write(&input, GUARD).unwrap();

    let output = run(dir.path(), &["tokens", input.to_str().unwrap()]);
    assert_success(&output);
    assert!(stdout(&output).contains("Keyword(contract)"));
}

#[test]
fn cli_circuit_counts_sum_to_shots() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bell.json");
    fs::write(
        &input,
        r#"{"qubits": 2, "gates": [{"gate": "H", "qubits": [0]}, {"gate": "CNOT", "qubits": [0, 1]}]}"#,
    )
    .unwrap();

    let output = run(dir.path(), &["--json", "circuit", input.to_str().unwrap(), "--shots", "256", "--seed", "7"]);
    assert_success(&output);
    let v: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    let total: u64 = v["counts"].as_object().unwrap().values().map(|c| c.as_u64().unwrap()).sum();
    assert_eq!(total, 256);
    assert_eq!(v["shots"], 256);
}

#[test]
fn cli_circuit_respects_configured_qubit_cap() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("wide.json");
    fs::write(&input, r#"{"qubits": 5, "gates": []}"#).unwrap();
    fs::write(dir.path().join("config.toml"), "[simulation]\nmax_qubits = 4\n").unwrap();

    let output = run(dir.path(), &["circuit", input.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("limit is 4"));
}

#[test]
fn cli_glyph_prints_messages() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("hello.glyph");
    fs::write(&input, "🌌 1\n🌀 0\n✨ hello from glyph\n").unwrap();

    let output = run(dir.path(), &["glyph", input.to_str().unwrap(), "--shots", "10", "--seed", "1"]);
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.contains("hello from glyph"));
    assert!(text.contains("10 shots"));
}

#[test]
fn cli_glyph_error_names_line() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.glyph");
    fs::write(&input, "🌌 1\n🌀 4\n").unwrap();

    let output = run(dir.path(), &["glyph", input.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Glyph Error (line 2)"));
}

#[test]
fn cli_glyph_messages_only_program_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.glyph");
    fs::write(&input, "✨ hello\n✨ world\n").unwrap();

    let output = run(dir.path(), &["glyph", input.to_str().unwrap()]);
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.contains("hello") && text.contains("world"));
    assert!(!text.contains("shots"));

    let output = run(dir.path(), &["--json", "glyph", input.to_str().unwrap()]);
    assert_success(&output);
    let v: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    assert!(v["result"].is_null());
    assert_eq!(v["messages"], serde_json::json!(["hello", "world"]));
}

#[test]
fn cli_glyph_pretty_error_is_reported_once() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.glyph");
    fs::write(&input, "🌌 1\n🌀 4\n").unwrap();

    let output = run(dir.path(), &["--pretty-errors", "glyph", input.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bad.glyph:2:1"), "{}", stderr);
    assert_eq!(stderr.matches("error:").count(), 1, "{}", stderr);
}

#[test]
fn cli_qudit_measure_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(
        dir.path(),
        &["--json", "qudit", "--dimension", "4", "--transform", "fourier", "--transform", "shift:1", "--measure", "--seed", "3"],
    );
    assert_success(&output);
    let v: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    let level = v["measured"].as_u64().unwrap() as usize;
    assert!(level < 4);
    assert_eq!(v["probabilities"][level], 1.0);
}

#[test]
fn cli_magnetism_is_reproducible_with_seed() {
    let dir = tempfile::tempdir().unwrap();
    let args = ["--json", "magnetism", "--lattice", "chain", "--width", "6", "--steps", "10", "--field", "0,0,1", "--seed", "5"];
    let a = run(dir.path(), &args);
    let b = run(dir.path(), &args);
    assert_success(&a);
    assert_eq!(a.stdout, b.stdout);
    let v: serde_json::Value = serde_json::from_str(&stdout(&a)).expect("json");
    assert_eq!(v["sites"], 6);
    assert_eq!(v["times"].as_array().unwrap().len(), 11);
}

#[test]
fn cli_ai_explain_falls_back_offline() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("guard.sp");
    fs::write(&input, GUARD).unwrap();

    let output = run(dir.path(), &["--json", "ai", "explain", input.to_str().unwrap()]);
    assert_success(&output);
    let v: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    assert_eq!(v["source"]["kind"], "heuristic");
    assert!(v["summary"].as_str().unwrap().contains("1 contract"));
}

#[test]
fn cli_ai_list_shows_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["ai", "list"]);
    assert_success(&output);
    assert!(stdout(&output).contains("heuristic (fallback)"));
}

#[test]
fn cli_missing_file_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["compile", dir.path().join("nope.sp").to_str().unwrap()]);
    assert!(!output.status.success());
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("error:") && err.contains("nope.sp"), "{}", err);
}

#[test]
fn cli_malformed_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("broken.toml");
    fs::write(&cfg, "[simulation\nshots = ").unwrap();
    let output = run(dir.path(), &["--config", cfg.to_str().unwrap(), "ai", "list"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Config Error"));
}
