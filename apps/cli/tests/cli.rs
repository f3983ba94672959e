//! Process-level tests for the flasher binary: exit codes and the startup
//! firmware check.

use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

use tempfile::TempDir;

fn flasher() -> Command {
    Command::new(env!("CARGO_BIN_EXE_zmk-flash"))
}

#[test]
fn test_no_firmware_exits_one_without_entering_menu() {
    let workdir = TempDir::new().unwrap();

    let output = flasher()
        .current_dir(workdir.path())
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no firmware files found"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Choose what to flash:"));
}

#[test]
fn test_menu_quit_exits_zero() {
    let workdir = TempDir::new().unwrap();
    fs::write(workdir.path().join("KB_LEFT.uf2"), b"UF2").unwrap();

    let mut child = flasher()
        .current_dir(workdir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    // Only the left half is present, so the quit entry is 2
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"2\n")
        .unwrap();

    let output = child.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("LEFT: KB_LEFT.uf2"));
    assert!(stdout.contains("Goodbye."));
}

#[cfg(unix)]
#[test]
fn test_interrupt_exits_zero() {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;
    use std::time::Duration;

    let workdir = TempDir::new().unwrap();
    fs::write(workdir.path().join("KB_LEFT.uf2"), b"UF2").unwrap();

    // Stdin stays open and silent, parking the process at the menu prompt
    let mut child = flasher()
        .current_dir(workdir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    // Give the process time to install its interrupt handler
    std::thread::sleep(Duration::from_millis(300));
    kill(Pid::from_raw(child.id() as i32), Signal::SIGINT).unwrap();

    let status = child.wait().unwrap();
    assert_eq!(status.code(), Some(0));
}
