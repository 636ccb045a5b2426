use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn scratch_dir(tag: &str) -> PathBuf {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("prism-cli-{tag}-{}-{ts}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn prism(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_prism"))
        .args(args)
        .current_dir(scratch_dir("run"))
        .env_remove("RUST_LOG")
        .env_remove("PRISM_LOG_LEVEL")
        .env("NO_COLOR", "1")
        .output()
        .expect("spawn prism")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn resolve_reports_the_chosen_overload_as_json() {
    let out = prism(&["--json", "resolve", "max", "float", "int"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let report: serde_json::Value = serde_json::from_str(&stdout(&out)).expect("json output");
    assert_eq!(report["ok"], true);
    assert_eq!(report["resolved"]["ret"], "float");
    assert_eq!(report["resolved"]["params"][1], "float");
    assert_eq!(report["resolved"]["conversions"][1]["into_param"]["component"], "IntToFloat");
}

#[test]
fn failed_resolution_exits_nonzero_with_the_bad_argument() {
    let out = prism(&["resolve", "dot", "float3", "Texture2D<float4>"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("argument 2"), "stderr: {}", stderr(&out));
}

#[test]
fn method_calls_take_a_receiver_and_template() {
    let out = prism(&[
        "resolve",
        "Load",
        "uint",
        "--on",
        "ByteAddressBuffer",
        "--template",
        "float2",
    ]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).starts_with("ByteAddressBuffer.Load(uint) -> float2"));
}

#[test]
fn convert_distinguishes_implicit_and_explicit() {
    let implicit = prism(&["convert", "float2", "float4"]);
    assert!(!implicit.status.success());

    let explicit = prism(&["convert", "float2", "float4", "--explicit"]);
    assert!(explicit.status.success(), "stderr: {}", stderr(&explicit));
    assert!(stdout(&explicit).contains("Extend"));
}

#[test]
fn combine_keeps_min_precision() {
    let out = prism(&["combine", "min16float", "int"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out).trim(), "min16float + int = min16float");
}

#[test]
fn classify_reports_matrix_dimensions() {
    let out = prism(&["--json", "classify", "float3x4"]);
    let report: serde_json::Value = serde_json::from_str(&stdout(&out)).expect("json output");
    assert_eq!(report["shape"], "matrix");
    assert_eq!(report["rows"], 3);
    assert_eq!(report["cols"], 4);
    assert_eq!(report["total_elements"], 12);
}

#[test]
fn signatures_lists_every_overload_once() {
    let out = prism(&["--json", "signatures", "mul"]);
    let lines: Vec<serde_json::Value> = serde_json::from_str(&stdout(&out)).expect("json output");
    assert_eq!(lines.len(), 9);

    let out = prism(&["signatures", "Sample", "--on", "Texture2D<float4>"]);
    assert_eq!(stdout(&out).lines().count(), 2);
}

#[test]
fn config_file_supplies_options_and_struct_types() {
    let dir = scratch_dir("config");
    let path = dir.join("prism.toml");
    std::fs::write(
        &path,
        "[session]\nenable_16bit_types = true\n\n[types]\ndeclarations = \"struct Light { float3 dir; float intensity; };\"\n",
    )
    .expect("write config");
    let config = path.to_str().expect("utf-8 temp path");

    let out = prism(&["--config", config, "convert", "Light", "float4", "--explicit"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("Flat"));

    let out = prism(&["--config", config, "classify", "half"]);
    assert!(stdout(&out).contains("float16"), "stdout: {}", stdout(&out));
}

#[test]
fn bad_config_is_a_diagnostic() {
    let dir = scratch_dir("badconfig");
    let path = dir.join("prism.toml");
    std::fs::write(&path, "[session]\nlang_version = 2019\n").expect("write config");
    let out = prism(&["--config", path.to_str().expect("utf-8 temp path"), "classify", "float"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("prism::config"), "stderr: {}", stderr(&out));
}
