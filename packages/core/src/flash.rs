//! Firmware copy operation.
//!
//! Flashing a UF2 bootloader is a plain file copy: the bootloader watches its
//! mass-storage drive and consumes any UF2 image written to it. The image
//! keeps its original filename and its metadata (permission bits and
//! timestamps) on the drive.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{IoResultExt, Result};

/// Copies `firmware` to the root of `drive` under its original filename.
///
/// Permission bits are carried over by the copy; modification and access
/// timestamps are restored on the destination afterwards. Returns the
/// destination path.
pub fn flash_firmware(firmware: &Path, drive: &Path) -> Result<PathBuf> {
    let name = firmware
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no filename"))
        .copy_context(firmware, drive)?;
    let target = drive.join(name);

    fs::copy(firmware, &target).copy_context(firmware, &target)?;
    preserve_timestamps(firmware, &target).copy_context(firmware, &target)?;

    Ok(target)
}

/// Restores the source's modification and access times on the target.
///
/// Timestamps the platform cannot report are left at whatever the copy
/// produced.
fn preserve_timestamps(source: &Path, target: &Path) -> io::Result<()> {
    let metadata = fs::metadata(source)?;

    let mut times = fs::FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }

    fs::File::options()
        .write(true)
        .open(target)?
        .set_times(times)
}
