//! zmk-flash-core: Core library for ZMK keyboard firmware flashing.
//!
//! This library provides the decision logic for flashing UF2 firmware images
//! onto a split keyboard that enumerates as a mass-storage drive while in
//! bootloader mode. Console interaction lives in the CLI crate; everything
//! here is plain filesystem work.
//!
//! # Modules
//!
//! - [`platform`]: Mount roots to scan per operating system
//! - [`detect`]: Bootloader drive detection and bounded polling
//! - [`firmware`]: Firmware image discovery by naming convention
//! - [`flash`]: The copy operation itself
//! - [`error`]: Error types
//!
//! # Example
//!
//! ```no_run
//! use zmk_flash_core::{detect, firmware, flash, platform};
//! use std::time::Duration;
//!
//! # fn main() -> zmk_flash_core::Result<()> {
//! // Resolve firmware images from the working directory
//! let set = firmware::locate_firmware(std::path::Path::new("."))?;
//! set.ensure_available()?;
//!
//! // Wait for a keyboard in bootloader mode, then flash the left half
//! if let Some(image) = set.get(firmware::Role::Left) {
//!     let roots = platform::host_mount_roots();
//!     let drive = detect::wait_for_drive(&roots, 30, Duration::from_secs(1), |_| {})?;
//!     flash::flash_firmware(image, &drive)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod detect;
pub mod error;
pub mod firmware;
pub mod flash;
pub mod platform;

// Re-export commonly used types
pub use detect::{MARKER_FILE, find_bootloader_drives, wait_for_drive};
pub use error::{Error, Result};
pub use firmware::{FirmwareSet, Role, locate_firmware};
pub use flash::flash_firmware;
pub use platform::{host_mount_roots, mount_roots};
