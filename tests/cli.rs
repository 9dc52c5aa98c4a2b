//! Exit status and output of the `asmap_node_diff` binary.
use std::path::Path;
use std::process::Command;

fn binary() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_asmap_node_diff"));
    cmd.env("RUST_LOG", "off");
    cmd
}

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn missing_input_exits_with_status_1() {
    let dir = tempfile::tempdir().unwrap();
    let asmap = write(dir.path(), "asmap.txt", "::/0 AS1\n");
    let missing = dir.path().join("missing.json");

    let output = binary()
        .arg(&missing)
        .arg(&asmap)
        .arg(&asmap)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(missing.to_str().unwrap()), "{}", stderr);
    assert!(stderr.contains("doesn't exist"), "{}", stderr);
    assert!(output.stdout.is_empty());
}

#[test]
fn directory_input_exits_with_status_1() {
    let dir = tempfile::tempdir().unwrap();
    let nodes = write(dir.path(), "nodes.json", "[]");

    let output = binary()
        .arg(&nodes)
        .arg(dir.path())
        .arg(dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("isn't a file"));
}

#[test]
fn unsupported_asmap_exits_with_status_1() {
    let dir = tempfile::tempdir().unwrap();
    let nodes = write(dir.path(), "nodes.json", "[]");
    let asmap = write(dir.path(), "asmap.txt", "this is not an asmap\n");

    let output = binary().args([&nodes, &asmap, &asmap]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unsupported asmap format"));
}

#[test]
fn report_with_verbose_changes() {
    let dir = tempfile::tempdir().unwrap();
    let nodes = write(
        dir.path(),
        "nodes.json",
        r#"[
            {"time": 1700000000, "services": 1, "address": "1.1.1.1", "port": 8333, "network": "ipv4"},
            {"time": 1699990000, "services": 1, "address": "8.8.8.8", "port": 8333, "network": "ipv4"},
            {"time": 1700000000, "services": 1, "address": "zzzz.onion", "port": 8333, "network": "onion"}
        ]"#,
    );
    let prev = write(dir.path(), "prev.txt", "1.1.1.0/24 AS13335\n8.8.8.0/24 AS15169\n");
    let cur = write(dir.path(), "cur.txt", "1.1.1.0/24 AS13335\n");

    let output = binary()
        .args([&nodes, &prev, &cur])
        .args(["--reference-time", "1700000000", "--verbose"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout,
        "horizon=all, total=2, changed=1, share=50.0%\n\
         horizon=last week, total=2, changed=1, share=50.0%\n\
         horizon=last day, total=2, changed=1, share=50.0%\n\
         horizon=last hour, total=1, changed=0, share=0.0%\n\
         changed: 8.8.8.8 AS15169 -> unknown\n"
    );
}

#[test]
fn custom_horizons() {
    let dir = tempfile::tempdir().unwrap();
    let nodes = write(
        dir.path(),
        "nodes.json",
        r#"[{"time": 1700000000, "address": "1.1.1.1", "port": 8333, "network": "ipv4"}]"#,
    );
    let asmap = write(dir.path(), "asmap.txt", "1.1.1.0/24 AS13335\n");

    let output = binary()
        .args([&nodes, &asmap, &asmap])
        .args(["--reference-time", "1700100000"])
        .args(["--horizon", "last month=30d", "--horizon", "last minute=1m"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "horizon=last month, total=1, changed=0, share=0.0%\nhorizon=last minute, total=0\n"
    );

    let output = binary()
        .args([&nodes, &asmap, &asmap])
        .args(["--horizon", "broken"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}
