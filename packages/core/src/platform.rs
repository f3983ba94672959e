//! Platform mount root resolution.
//!
//! Removable drives surface at different filesystem locations per operating
//! system. This module maps an OS identifier to the ordered list of roots
//! worth scanning for a keyboard in bootloader mode.
//!
//! Resolution is a pure function over an explicit identifier (the values of
//! [`std::env::consts::OS`]) rather than implicit host inspection, so it can
//! be tested without mocking the platform.

use std::path::PathBuf;

/// Standard mount roots checked on Linux, in scan order.
const LINUX_MOUNT_ROOTS: [&str; 3] = ["/media", "/mnt", "/run/media"];

/// Returns the ordered candidate mount roots for the given OS identifier.
///
/// Unrecognized identifiers yield an empty list; drive detection then finds
/// nothing, which the caller surfaces as "drive not found".
pub fn mount_roots(os: &str) -> Vec<PathBuf> {
    match os {
        "macos" => vec![PathBuf::from("/Volumes")],
        "linux" => LINUX_MOUNT_ROOTS.iter().map(PathBuf::from).collect(),
        "windows" => ('A'..='Z').map(|l| PathBuf::from(format!("{l}:\\"))).collect(),
        _ => Vec::new(),
    }
}

/// Returns the candidate mount roots for the running host.
pub fn host_mount_roots() -> Vec<PathBuf> {
    mount_roots(std::env::consts::OS)
}
