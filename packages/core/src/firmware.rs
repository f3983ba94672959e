//! Firmware image location.
//!
//! ZMK release artifacts for a split keyboard follow a naming convention: the
//! image for each half carries `LEFT` or `RIGHT` in its filename, and a
//! settings-reset image carries `RESET`, all with the `.uf2` extension. This
//! module scans a directory once at startup and resolves one image per role.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{IoResultExt, NoFirmwareFoundSnafu, Result};

/// Extension of UF2 firmware images.
pub const UF2_EXTENSION: &str = ".uf2";

/// Logical role of a firmware image, in recommended flashing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Settings-reset image, flashed to clear stored state.
    Reset,
    /// Left half of the keyboard.
    Left,
    /// Right half of the keyboard.
    Right,
}

/// All roles in menu order.
pub const ROLES: [Role; 3] = [Role::Reset, Role::Left, Role::Right];

impl Role {
    /// Filename substrings identifying this role, checked in order.
    ///
    /// The uppercase variant is tried first, matching release artifact
    /// conventions; the lowercase variant is the fallback.
    pub fn name_variants(&self) -> [&'static str; 2] {
        match self {
            Role::Reset => ["RESET", "reset"],
            Role::Left => ["LEFT", "left"],
            Role::Right => ["RIGHT", "right"],
        }
    }

    /// Returns true for the left/right keyboard halves.
    pub fn is_half(&self) -> bool {
        matches!(self, Role::Left | Role::Right)
    }

    /// Menu description shown to the user.
    pub fn menu_label(&self) -> &'static str {
        match self {
            Role::Reset => "Reset settings (recommended first)",
            Role::Left => "Left side (flash second)",
            Role::Right => "Right side (flash first)",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Reset => "reset",
            Role::Left => "left",
            Role::Right => "right",
        };
        write!(f, "{name}")
    }
}

/// Firmware images resolved for one run, one optional path per role.
///
/// Populated once by [`locate_firmware`] and immutable afterwards; the drive
/// may come and go between flashes, the firmware inventory does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareSet {
    dir: PathBuf,
    reset: Option<PathBuf>,
    left: Option<PathBuf>,
    right: Option<PathBuf>,
}

impl FirmwareSet {
    /// Returns the image path for a role, if one was found.
    pub fn get(&self, role: Role) -> Option<&Path> {
        match role {
            Role::Reset => self.reset.as_deref(),
            Role::Left => self.left.as_deref(),
            Role::Right => self.right.as_deref(),
        }
    }

    /// Roles with an available image, in menu order.
    pub fn available(&self) -> Vec<(Role, &Path)> {
        ROLES
            .iter()
            .filter_map(|&role| self.get(role).map(|path| (role, path)))
            .collect()
    }

    /// Returns true if no role resolved to an image.
    pub fn is_empty(&self) -> bool {
        self.reset.is_none() && self.left.is_none() && self.right.is_none()
    }

    /// Fails with [`Error::NoFirmwareFound`](crate::Error::NoFirmwareFound)
    /// when the set is empty.
    pub fn ensure_available(&self) -> Result<()> {
        if self.is_empty() {
            return NoFirmwareFoundSnafu { dir: self.dir.clone() }.fail();
        }
        Ok(())
    }

    /// The directory this set was resolved from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Scans `dir` for firmware images and resolves one per role.
///
/// For each role the uppercase name variant is tried before the lowercase
/// one; the first variant with any match wins. When several files match the
/// same variant, the lexicographically smallest filename is kept, so
/// resolution does not depend on directory listing order. File contents are
/// not inspected.
pub fn locate_firmware(dir: &Path) -> Result<FirmwareSet> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .firmware_scan_context(dir)?
        .flatten()
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();

    let resolve = |role: Role| -> Option<PathBuf> {
        role.name_variants()
            .iter()
            .find_map(|variant| {
                names
                    .iter()
                    .find(|name| name.contains(variant) && name.ends_with(UF2_EXTENSION))
            })
            .map(|name| dir.join(name))
    };

    Ok(FirmwareSet {
        dir: dir.to_path_buf(),
        reset: resolve(Role::Reset),
        left: resolve(Role::Left),
        right: resolve(Role::Right),
    })
}
