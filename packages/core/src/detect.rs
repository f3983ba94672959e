//! Bootloader drive detection.
//!
//! A keyboard in bootloader mode enumerates as a mass-storage drive carrying
//! an `INFO_UF2.TXT` file at its top level. Detection is a fresh filesystem
//! scan on every call: mount state changes outside the process (the user
//! double-taps the BOOT button, the OS mounts the drive), so there is nothing
//! to cache.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crate::error::{DriveTimeoutSnafu, Result};

/// Marker file the UF2 bootloader places at the drive root.
pub const MARKER_FILE: &str = "INFO_UF2.TXT";

/// Scans the given roots for drives that look like a keyboard in bootloader
/// mode.
///
/// For each root that exists, lists its immediate subdirectories and keeps
/// those containing [`MARKER_FILE`], in discovery order. Roots that are
/// missing and directories that cannot be listed (permission denied,
/// transient I/O) are skipped; the polling caller re-observes on the next
/// attempt.
pub fn find_bootloader_drives(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut drives = Vec::new();

    for root in roots {
        let Ok(entries) = std::fs::read_dir(root) else {
            continue;
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() && path.join(MARKER_FILE).is_file() {
                drives.push(path);
            }
        }
    }

    drives
}

/// Polls for a bootloader drive, bounded at `attempts` scans spaced
/// `interval` apart.
///
/// `on_attempt` is invoked with the 1-based attempt number before each scan,
/// letting the caller render progress. Returns the first drive found, or
/// [`Error::DriveTimeout`](crate::Error::DriveTimeout) once the bound is
/// exhausted.
pub fn wait_for_drive(
    roots: &[PathBuf],
    attempts: u32,
    interval: Duration,
    mut on_attempt: impl FnMut(u32),
) -> Result<PathBuf> {
    for attempt in 1..=attempts {
        on_attempt(attempt);

        if let Some(drive) = find_bootloader_drives(roots).into_iter().next() {
            return Ok(drive);
        }

        if attempt < attempts {
            thread::sleep(interval);
        }
    }

    DriveTimeoutSnafu { attempts }.fail()
}
