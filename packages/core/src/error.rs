//! Unified error types for the zmk-flash-core library.
//!
//! Uses SNAFU for context-rich error handling, especially useful when the same
//! underlying error type (like `std::io::Error`) appears in different contexts.

use snafu::{ResultExt, Snafu};
use std::path::PathBuf;

/// Result type alias using the library's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for all core library operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// No firmware files present in the scan directory at startup.
    #[snafu(display("no firmware files found in {}", dir.display()))]
    NoFirmwareFound { dir: PathBuf },

    /// The firmware scan directory could not be read.
    #[snafu(display("failed to read firmware directory {}", dir.display()))]
    FirmwareScan {
        dir: PathBuf,
        source: std::io::Error,
    },

    /// No bootloader drive appeared within the polling bound.
    #[snafu(display("no bootloader drive found after {attempts} attempts"))]
    DriveTimeout { attempts: u32 },

    /// Copying a firmware image onto the bootloader drive failed.
    #[snafu(display("failed to copy {} to {}", from.display(), to.display()))]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

/// Extension trait for adding context to io::Error results.
pub trait IoResultExt<T> {
    /// Add context for firmware directory scan errors.
    fn firmware_scan_context(self, dir: impl Into<PathBuf>) -> Result<T>;

    /// Add context for firmware copy errors.
    fn copy_context(self, from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::result::Result<T, std::io::Error> {
    fn firmware_scan_context(self, dir: impl Into<PathBuf>) -> Result<T> {
        self.context(FirmwareScanSnafu { dir: dir.into() })
    }

    fn copy_context(self, from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Result<T> {
        self.context(CopySnafu {
            from: from.into(),
            to: to.into(),
        })
    }
}
