use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "discsim-rs-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn run_shop(args: &[&str]) -> Output {
    let output = Command::new(env!("CARGO_BIN_EXE_shop"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("run shop");
    assert!(
        output.status.success(),
        "shop failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

fn run_json(args: &[&str]) -> Value {
    let output = run_shop(args);
    serde_json::from_slice(&output.stdout).expect("parse stdout json")
}

#[test]
fn shop_prints_one_block_per_facility() {
    let output = run_shop(&["7", "--customers", "5"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(lines[0], "Facility 0: Shopping");
    assert_eq!(lines[1], "  served         : 5");
    assert!(lines[2].starts_with("  wait_time_total: "));
    assert!(lines[3].starts_with("  work_time_total: "));
    assert!(
        stdout.lines().any(|l| l.starts_with("done @ ")),
        "missing summary line: {stdout}"
    );
}

#[test]
fn same_seed_gives_identical_json() {
    let a = run_json(&["42", "--customers", "30", "--json"]);
    let b = run_json(&["42", "--customers", "30", "--json"]);
    assert_eq!(a, b);
    assert_eq!(a["seed"].as_u64(), Some(42));
    assert_eq!(a["summary"]["customers"].as_u64(), Some(30));
    assert_eq!(a["summary"]["finished"].as_u64(), Some(30));

    let c = run_json(&["43", "--customers", "30", "--json"]);
    assert_ne!(a["final_time"], c["final_time"]);
}

#[test]
fn scenario_file_drives_facilities_and_end_time() {
    let dir = unique_temp_dir("scenario");
    let path = dir.join("scenario.json");
    fs::write(
        &path,
        r#"
{
    "seed": 3,
    "facilities": [
        { "id": 1, "name": "Door", "capacity": 1,
          "distribution": { "kind": "uniform", "low": 1.0, "high": 1.0 } },
        { "id": 2, "name": "Till", "capacity": 1,
          "distribution": { "kind": "exponential", "rate": 2.0 } }
    ],
    "customers": {
        "count": 4,
        "interarrival": { "kind": "uniform", "low": 0.5, "high": 0.5 },
        "linger": 0.0
    }
}
        "#,
    )
    .expect("write scenario");

    let v = run_json(&["--scenario", path.to_str().unwrap(), "--json"]);
    let facilities = v["facilities"].as_array().expect("facilities array");
    assert_eq!(facilities.len(), 2);
    assert_eq!(facilities[0]["name"].as_str(), Some("Door"));
    assert_eq!(facilities[0]["served"].as_u64(), Some(4));
    // 到达间隔 0.5、服务 1.0：第 k 个顾客等待 0.5 * k
    assert_eq!(facilities[0]["wait_time_total"].as_f64(), Some(3.0));
    assert_eq!(facilities[0]["work_time_total"].as_f64(), Some(4.0));
    assert_eq!(facilities[1]["served"].as_u64(), Some(4));
    assert_eq!(v["seed"].as_u64(), Some(3));

    let short = run_json(&[
        "--scenario",
        path.to_str().unwrap(),
        "--end-time",
        "1.2",
        "--json",
    ]);
    // 越过结束时间的第一个事件仍被执行：最晚是 t=1.5 的到达
    let final_time = short["final_time"].as_f64().expect("final_time");
    assert!(final_time > 1.2 && final_time <= 1.5);
    assert!(short["summary"]["finished"].as_u64().expect("finished") < 4);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn invalid_scenario_fails_with_configuration_error() {
    let dir = unique_temp_dir("bad-scenario");
    let path = dir.join("bad.json");
    fs::write(
        &path,
        r#"{ "facilities": [ { "id": 0, "name": "x", "capacity": 1,
            "distribution": { "kind": "uniform", "low": 2.0, "high": 1.0 } } ] }"#,
    )
    .expect("write scenario");

    let output = Command::new(env!("CARGO_BIN_EXE_shop"))
        .args(["--scenario", path.to_str().unwrap()])
        .output()
        .expect("run shop");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid distribution"), "stderr={stderr}");

    let _ = fs::remove_dir_all(&dir);
}
