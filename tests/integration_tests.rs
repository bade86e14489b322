use std::fs;
use std::path::PathBuf;
use std::process::Command;

use assert_cmd::prelude::*;

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("weft-test-{}-{name}", std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

const SEVEN_WSA: &str = "\
    push 3
    push 4
    addition
    output_number
    end_program
";

#[test]
fn runs_without_arguments() {
    let mut cmd = Command::cargo_bin("weft").unwrap();
    cmd.assert().success();
}

#[test]
fn runs_assembly_and_prints_seven() {
    let path = scratch_file("seven.wsa", SEVEN_WSA);
    let mut cmd = Command::cargo_bin("weft").unwrap();
    cmd.args(["run", "--minimal"]).arg(&path);
    cmd.assert().success().stdout("7");
    fs::remove_file(path).unwrap();
}

#[test]
fn compiled_binary_runs_identically() {
    let src = scratch_file("seven-roundtrip.wsa", SEVEN_WSA);
    let out = scratch_file("seven-roundtrip.ws", "");

    let mut compile = Command::cargo_bin("weft").unwrap();
    compile.arg("compile").arg(&src).arg(&out);
    compile.assert().success();

    let binary = fs::read_to_string(&out).unwrap();
    assert!(binary.chars().all(|c| matches!(c, '\t' | '\n' | ' ')));

    let mut run = Command::cargo_bin("weft").unwrap();
    run.args(["run", "--minimal"]).arg(&out);
    run.assert().success().stdout("7");

    fs::remove_file(src).unwrap();
    fs::remove_file(out).unwrap();
}

#[test]
fn translate_rewrites_between_dialects() {
    let src = scratch_file(
        "terse.wsa",
        "     push 3\n     push 4\n     add\n     oint\n     exit\n",
    );
    let out = scratch_file("translated.wsa", "");

    let mut translate = Command::cargo_bin("weft").unwrap();
    translate
        .arg("translate")
        .arg(&src)
        .arg(&out)
        .args(["--from", "v1", "--to", "v2"]);
    translate.assert().success();

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("output_number"));

    let mut run = Command::cargo_bin("weft").unwrap();
    run.args(["run", "--minimal"]).arg(&out);
    run.assert().success().stdout("7");

    fs::remove_file(src).unwrap();
    fs::remove_file(out).unwrap();
}

#[test]
fn check_rejects_an_unmarked_label() {
    let path = scratch_file("broken.wsa", "    jump_always nowhere\n    end_program\n");
    let mut cmd = Command::cargo_bin("weft").unwrap();
    cmd.arg("check").arg(&path);
    cmd.assert().failure();
    fs::remove_file(path).unwrap();
}

#[test]
fn check_reports_syntax_errors_with_line_numbers() {
    let path = scratch_file("syntax.wsa", "    push 1\n    frobnicate\n");
    let mut cmd = Command::cargo_bin("weft").unwrap();
    cmd.arg("check").arg(&path);
    let assert = cmd.assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("Line 2"));
    fs::remove_file(path).unwrap();
}
