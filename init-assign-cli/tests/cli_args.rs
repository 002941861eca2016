use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

const SHAPES: &str = "class Shape:\n    def __init__(self, name, sides: int = 3):\n        pass\n\n\nclass Busy:\n    def __init__(self, value):\n        print(value)\n";

const FILLED_SHAPE: &str =
    "class Shape:\n    def __init__(self, name, sides: int = 3):\n        self.name = name\n        self.sides = sides\n        pass\n";

fn init_assign() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_init-assign"));
    command.env_remove("INIT_ASSIGN_CONFIG").env_remove("RUST_LOG");
    command
}

fn python_file(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("shapes.py");
    fs::write(&path, content).expect("failed to write fixture");
    path
}

#[test]
fn help_lists_subcommands() {
    init_assign()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("at-line"))
        .stdout(predicate::str::contains("signature"));
}

#[test]
fn test_signature_argument() {
    init_assign()
        .args(["signature", "self, a, b: int, c=1, *args, **kwargs"])
        .assert()
        .code(0)
        .stdout("self.a = a\nself.b = b\nself.c = c\n");
}

#[test]
fn test_signature_stdin_input() {
    let mut child = init_assign()
        .arg("signature")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn signature");

    {
        let stdin = child.stdin.as_mut().expect("failed to get stdin");
        stdin
            .write_all(b"\n    cls,\n    da=\"1=(2,3=){#[:}]\",  # note\n    ea=(2, 3),\n")
            .expect("failed to write to stdin");
    }
    drop(child.stdin.take());

    let output = child.wait_with_output().expect("failed to wait on child");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "cls.da = da\ncls.ea = ea\n"
    );
}

#[test]
fn test_signature_json_lists_parameters() {
    let output = init_assign()
        .args(["signature", "--format", "json", "self, a: int = 1, *rest"])
        .output()
        .expect("failed to run signature");
    assert_eq!(output.status.code(), Some(0));

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout was not JSON");
    let kinds: Vec<&str> = json["parameters"]
        .as_array()
        .expect("parameters array")
        .iter()
        .filter_map(|parameter| parameter["kind"].as_str())
        .collect();
    assert_eq!(kinds, vec!["receiver", "ordinary", "variadic_positional"]);
    assert_eq!(json["parameters"][1]["has_annotation"], true);
    assert_eq!(json["parameters"][1]["has_default"], true);
    assert_eq!(json["statements"][0]["attribute"], "a");
}

#[test]
fn test_signature_with_extra_receiver() {
    init_assign()
        .args(["signature", "--receiver", "this", "this, a"])
        .assert()
        .success()
        .stdout("this.a = a\n");
}

#[test]
fn test_unterminated_signature_exits_with_parse_failure() {
    init_assign()
        .args(["signature", "self, a=(1, 2"])
        .assert()
        .code(2)
        .stdout("")
        .stderr(predicate::str::contains("unterminated nesting"));
}

#[test]
fn test_generate_dry_run_reports_without_writing() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = python_file(&dir, SHAPES);

    init_assign()
        .arg("generate")
        .arg(&path)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Shape (line 2): generated 2 assignment(s)"))
        .stdout(predicate::str::contains("self.sides = sides"))
        .stdout(predicate::str::contains(
            "Busy (line 7): skipped, body already has statements",
        ));

    assert_eq!(fs::read_to_string(&path).expect("read back"), SHAPES);
}

#[test]
fn test_generate_write_updates_file() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = python_file(&dir, SHAPES);

    init_assign()
        .args(["generate", "--write"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("(written)"));

    let rewritten = fs::read_to_string(&path).expect("read back");
    assert!(rewritten.starts_with(FILLED_SHAPE), "{}", rewritten);
    assert!(rewritten.ends_with("    def __init__(self, value):\n        print(value)\n"));
}

#[test]
fn test_generate_force_fills_non_trivial_body() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = python_file(&dir, SHAPES);

    init_assign()
        .args(["generate", "--write", "--force"])
        .arg(&path)
        .assert()
        .success();

    let rewritten = fs::read_to_string(&path).expect("read back");
    assert!(rewritten.contains("        self.value = value\n        print(value)\n"));
}

#[test]
fn test_generate_json_format() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = python_file(&dir, SHAPES);

    let output = init_assign()
        .args(["generate", "--format", "json"])
        .arg(&path)
        .output()
        .expect("failed to run generate");
    assert_eq!(output.status.code(), Some(0));

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout was not JSON");
    assert_eq!(json[0]["changed"], true);
    assert_eq!(json[0]["written"], false);
    assert_eq!(json[0]["reports"][1]["outcome"], "skipped");
    assert_eq!(json[0]["reports"][1]["skip"]["reason"], "non_trivial_body");
}

#[test]
fn test_generate_missing_file_is_a_hard_error() {
    let dir = TempDir::new().expect("failed to create temp dir");

    init_assign()
        .arg("generate")
        .arg(dir.path().join("absent.py"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("absent.py"));
}

#[test]
fn test_generate_uses_config_file_from_env() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = python_file(&dir, SHAPES);
    let config = dir.path().join("init-assign.json");
    fs::write(&config, r#"{"body_policy": "always"}"#).expect("failed to write config");

    init_assign()
        .env("INIT_ASSIGN_CONFIG", &config)
        .args(["generate", "--write"])
        .arg(&path)
        .assert()
        .success();

    let rewritten = fs::read_to_string(&path).expect("read back");
    assert!(rewritten.contains("self.value = value"));
}

#[test]
fn test_invalid_config_is_a_hard_error() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = python_file(&dir, SHAPES);
    let config = dir.path().join("bad.json");
    fs::write(&config, r#"{"unknown_setting": 1}"#).expect("failed to write config");

    init_assign()
        .arg("--config")
        .arg(&config)
        .arg("generate")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_at_line_prints_statements() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = python_file(&dir, SHAPES);

    init_assign()
        .arg("at-line")
        .arg(&path)
        .args(["--line", "3"])
        .assert()
        .code(0)
        .stdout("self.name = name\nself.sides = sides\n");

    assert_eq!(fs::read_to_string(&path).expect("read back"), SHAPES);
}

#[test]
fn test_at_line_write() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = python_file(&dir, SHAPES);

    init_assign()
        .arg("at-line")
        .arg(&path)
        .args(["--line", "8", "--write"])
        .assert()
        .success();

    let rewritten = fs::read_to_string(&path).expect("read back");
    assert!(rewritten.ends_with(
        "    def __init__(self, value):\n        self.value = value\n        print(value)\n"
    ));
}

#[test]
fn test_at_line_outside_initializer() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = python_file(&dir, SHAPES);

    init_assign()
        .arg("at-line")
        .arg(&path)
        .args(["--line", "1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not inside an __init__"));
}

#[test]
fn test_at_line_unterminated_signature() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = python_file(&dir, "class Broken:\n    def __init__(self, a='x):\n        pass\n");

    init_assign()
        .arg("at-line")
        .arg(&path)
        .args(["--line", "3"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Broken.__init__"));
}

#[test]
fn test_generate_with_broken_initializer_exits_with_parse_failure() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let source = "class Broken:\n    def __init__(self, a=(1:\n        pass\n\n\nclass Fine:\n    def __init__(self, b):\n        pass\n";
    let path = python_file(&dir, source);

    init_assign()
        .args(["generate", "--write"])
        .arg(&path)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Broken (line 2): failed"))
        .stdout(predicate::str::contains("Fine (line 7): generated 1 assignment(s)"));

    let rewritten = fs::read_to_string(&path).expect("read back");
    assert!(rewritten.contains("def __init__(self, a=(1:\n        pass\n"));
    assert!(rewritten.ends_with("def __init__(self, b):\n        self.b = b\n        pass\n"));
}
