//! ZMK Firmware Flasher - interactive CLI for UF2 bootloader flashing.
//!
//! Scans the working directory for firmware images, then drives a menu loop:
//! pick a side, put the keyboard into bootloader mode, and the tool copies
//! the image onto the drive that appears.

mod menu;

use std::io;
use std::process::ExitCode;

use clap::Parser;

use zmk_flash_core::{firmware, platform};

use crate::menu::{Flasher, PollConfig, error_chain};

/// ZMK firmware flasher.
///
/// Takes no arguments; firmware images are picked up from the current
/// directory and all interaction happens through the menu.
#[derive(Parser)]
#[command(name = "zmk-flash")]
#[command(about = "Flash ZMK firmware to a keyboard in UF2 bootloader mode", long_about = None)]
#[command(version)]
struct Cli {}

fn main() -> ExitCode {
    Cli::parse();
    install_interrupt_handler();
    print_banner();

    let dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("Error: cannot determine working directory: {err}");
            return ExitCode::FAILURE;
        }
    };

    let set = match firmware::locate_firmware(&dir) {
        Ok(set) => set,
        Err(err) => {
            eprintln!("Error: {}", error_chain(&err));
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = set.ensure_available() {
        eprintln!("Error: {}", error_chain(&err));
        eprintln!("Download the firmware images from the release page");
        eprintln!("and place them in the same directory as this tool.");
        return ExitCode::FAILURE;
    }

    println!("Found firmware files:");
    for (role, path) in set.available() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        println!("  {}: {}", role.to_string().to_uppercase(), name);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut flasher = Flasher::new(
        stdin.lock(),
        stdout.lock(),
        set,
        platform::host_mount_roots(),
        PollConfig::default(),
    );

    match flasher.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_banner() {
    println!("{}", "=".repeat(60));
    println!("ZMK Firmware Flasher");
    println!("{}", "=".repeat(60));
    println!();
}

/// Ctrl-C exits with status 0: interruption is an ordinary way to leave the
/// menu, and no resource is held across orchestrator states.
#[cfg(unix)]
fn install_interrupt_handler() {
    use nix::sys::signal::{SigHandler, Signal, signal};

    extern "C" fn on_interrupt(_: i32) {
        // Only async-signal-safe calls are allowed here
        unsafe { nix::libc::_exit(0) }
    }

    unsafe {
        let _ = signal(Signal::SIGINT, SigHandler::Handler(on_interrupt));
    }
}

/// Same contract on Windows: the default console handler would otherwise
/// terminate with `STATUS_CONTROL_C_EXIT`, a nonzero status.
#[cfg(windows)]
fn install_interrupt_handler() {
    let _ = ctrlc::set_handler(|| std::process::exit(0));
}

#[cfg(all(not(unix), not(windows)))]
fn install_interrupt_handler() {}
