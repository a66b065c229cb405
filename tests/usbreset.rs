//! Exit codes and messages of the `usbreset` binary.

use std::process::{Command, Output};

fn usbreset(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_usbreset"))
        .args(args)
        .output()
        .expect("failed to run usbreset")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn no_arguments_fails() {
    let output = usbreset(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn two_arguments_fail() {
    let output = usbreset(&["/dev/bus/usb/001/002", "/dev/bus/usb/001/003"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn missing_device_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("002");

    let output = usbreset(&[missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error opening device"));
}

#[test]
fn non_usb_device_rejects_reset() {
    let output = usbreset(&["/dev/null"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error in ioctl"));
    assert!(output.stdout.is_empty());
}

#[test]
fn help_exits_cleanly() {
    let output = usbreset(&["--help"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage"));
}
