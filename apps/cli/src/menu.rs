//! Interactive flashing menu.
//!
//! The orchestrator cycles through three states: selecting an action,
//! waiting for the bootloader drive, and copying the image. Every failure
//! past startup returns control to the menu; nothing is held across states,
//! so there is no cleanup path.
//!
//! Input and output are generic so the state machine can be driven from
//! tests without console I/O.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use zmk_flash_core::firmware::{FirmwareSet, Role};
use zmk_flash_core::{Error, detect, flash};

/// Timing for the drive poll and the post-copy settle pause.
///
/// Tests shrink these so runs complete in milliseconds; production uses
/// [`PollConfig::default`].
pub struct PollConfig {
    /// Number of detection scans before giving up.
    pub attempts: u32,
    /// Delay between scans.
    pub interval: Duration,
    /// Pause after a successful copy while the keyboard reboots.
    pub settle: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            attempts: 30,
            interval: Duration::from_secs(1),
            settle: Duration::from_secs(3),
        }
    }
}

/// The interactive flash orchestrator.
pub struct Flasher<R, W> {
    input: R,
    output: W,
    firmware: FirmwareSet,
    roots: Vec<PathBuf>,
    poll: PollConfig,
}

impl<R: BufRead, W: Write> Flasher<R, W> {
    pub fn new(
        input: R,
        output: W,
        firmware: FirmwareSet,
        roots: Vec<PathBuf>,
        poll: PollConfig,
    ) -> Self {
        Self {
            input,
            output,
            firmware,
            roots,
            poll,
        }
    }

    /// Runs the menu loop until the user quits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            let options: Vec<(Role, PathBuf)> = self
                .firmware
                .available()
                .into_iter()
                .map(|(role, path)| (role, path.to_path_buf()))
                .collect();
            let quit_choice = options.len() + 1;

            writeln!(self.output)?;
            writeln!(self.output, "Choose what to flash:")?;
            for (i, (role, _)) in options.iter().enumerate() {
                writeln!(self.output, "  {}. {}", i + 1, role.menu_label())?;
            }
            writeln!(self.output, "  {}. Exit", quit_choice)?;
            write!(self.output, "\nEnter your choice (1-{}): ", quit_choice)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                // End of input behaves like quit
                writeln!(self.output, "Goodbye.")?;
                return Ok(());
            }

            let Some(choice) = parse_choice(&line, quit_choice) else {
                writeln!(self.output, "Invalid choice.")?;
                continue;
            };
            if choice == quit_choice {
                writeln!(self.output, "Goodbye.")?;
                return Ok(());
            }

            let (role, image) = options[choice - 1].clone();

            let Some(drive) = self.wait_for_drive()? else {
                writeln!(self.output, "Please try again or flash manually.")?;
                continue;
            };

            self.copy(role, &image, &drive)?;
        }
    }

    /// Polls for the bootloader drive, rendering progress to stderr.
    ///
    /// Returns `None` on timeout; the caller falls back to the menu.
    fn wait_for_drive(&mut self) -> io::Result<Option<PathBuf>> {
        writeln!(self.output, "Waiting for keyboard in bootloader mode...")?;
        writeln!(
            self.output,
            "Press the BOOT button twice quickly on your keyboard."
        )?;
        self.output.flush()?;

        let bar = ProgressBar::new(u64::from(self.poll.attempts));
        if let Ok(style) =
            ProgressStyle::with_template("{spinner:.green} searching [{bar:30.cyan/blue}] {pos}/{len}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }

        let found = detect::wait_for_drive(
            &self.roots,
            self.poll.attempts,
            self.poll.interval,
            |attempt| bar.set_position(u64::from(attempt)),
        );

        match found {
            Ok(drive) => {
                bar.finish_and_clear();
                writeln!(self.output, "Found keyboard drive: {}", drive.display())?;
                Ok(Some(drive))
            }
            Err(err) => {
                bar.abandon();
                writeln!(self.output, "{err}")?;
                Ok(None)
            }
        }
    }

    /// Copies the image and reports the outcome. Copy failures are surfaced
    /// and send the user back to the menu; there is no automatic retry.
    fn copy(&mut self, role: Role, image: &Path, drive: &Path) -> io::Result<()> {
        let name = image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| image.display().to_string());
        writeln!(self.output, "Copying {} to {}", name, drive.display())?;
        self.output.flush()?;

        match flash::flash_firmware(image, drive) {
            Ok(_) => {
                writeln!(self.output, "Firmware copied successfully.")?;
                writeln!(self.output, "Waiting for keyboard to reboot...")?;
                self.output.flush()?;
                thread::sleep(self.poll.settle);
                writeln!(self.output, "Flashing completed.")?;
                if role.is_half() {
                    writeln!(self.output, "Remember to flash the other side too.")?;
                }
            }
            Err(err) => {
                writeln!(self.output, "Error flashing firmware: {}", error_chain(&err))?;
            }
        }

        Ok(())
    }
}

/// Parses a 1-based menu selection; `None` for non-numeric or out-of-range
/// input.
fn parse_choice(line: &str, count: usize) -> Option<usize> {
    let choice = line.trim().parse::<usize>().ok()?;
    (1..=count).contains(&choice).then_some(choice)
}

/// Renders an error with its underlying causes on one line.
pub fn error_chain(err: &Error) -> String {
    use std::error::Error as _;

    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;
    use zmk_flash_core::{MARKER_FILE, locate_firmware};

    fn fast_poll(attempts: u32) -> PollConfig {
        PollConfig {
            attempts,
            interval: Duration::from_millis(1),
            settle: Duration::ZERO,
        }
    }

    fn run_flasher(
        script: &str,
        firmware: FirmwareSet,
        roots: Vec<PathBuf>,
        poll: PollConfig,
    ) -> String {
        let mut output = Vec::new();
        let mut flasher = Flasher::new(Cursor::new(script), &mut output, firmware, roots, poll);
        flasher.run().unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("1\n", 3), Some(1));
        assert_eq!(parse_choice("  3  \n", 3), Some(3));
        assert_eq!(parse_choice("0\n", 3), None);
        assert_eq!(parse_choice("4\n", 3), None);
        assert_eq!(parse_choice("two\n", 3), None);
        assert_eq!(parse_choice("\n", 3), None);
        assert_eq!(parse_choice("-1\n", 3), None);
    }

    #[test]
    fn test_menu_lists_only_available_roles() {
        let workdir = TempDir::new().unwrap();
        fs::write(workdir.path().join("KB_LEFT.uf2"), b"UF2").unwrap();
        let set = locate_firmware(workdir.path()).unwrap();

        let output = run_flasher("2\n", set, vec![], fast_poll(1));
        assert!(output.contains("1. Left side (flash second)"));
        assert!(output.contains("2. Exit"));
        assert!(!output.contains("Reset settings"));
        assert!(!output.contains("Right side"));
        assert!(output.contains("Goodbye."));
    }

    #[test]
    fn test_invalid_input_reprompts_without_detection() {
        let workdir = TempDir::new().unwrap();
        fs::write(workdir.path().join("KB_LEFT.uf2"), b"UF2").unwrap();
        let set = locate_firmware(workdir.path()).unwrap();

        let output = run_flasher("abc\n9\n2\n", set, vec![], fast_poll(1));
        assert_eq!(output.matches("Invalid choice.").count(), 2);
        assert!(!output.contains("Waiting for keyboard"));
        assert!(!output.contains("Copying"));
        // Re-prompted after each rejection, then quit
        assert_eq!(output.matches("Choose what to flash:").count(), 3);
    }

    #[test]
    fn test_end_of_input_quits_cleanly() {
        let workdir = TempDir::new().unwrap();
        fs::write(workdir.path().join("KB_RESET.uf2"), b"UF2").unwrap();
        let set = locate_firmware(workdir.path()).unwrap();

        let output = run_flasher("", set, vec![], fast_poll(1));
        assert!(output.contains("Goodbye."));
    }

    #[test]
    fn test_timeout_returns_to_menu() {
        let workdir = TempDir::new().unwrap();
        fs::write(workdir.path().join("KB_RESET.uf2"), b"UF2").unwrap();
        let set = locate_firmware(workdir.path()).unwrap();

        let empty_root = TempDir::new().unwrap();
        let output = run_flasher(
            "1\n2\n",
            set,
            vec![empty_root.path().to_path_buf()],
            fast_poll(2),
        );

        assert!(output.contains("no bootloader drive found after 2 attempts"));
        assert!(output.contains("Please try again or flash manually."));
        assert!(!output.contains("Copying"));
        // Back at the menu after the timeout
        assert_eq!(output.matches("Choose what to flash:").count(), 2);
    }

    #[test]
    fn test_flash_left_end_to_end() {
        let workdir = TempDir::new().unwrap();
        fs::write(workdir.path().join("KB_LEFT.uf2"), b"left image").unwrap();
        fs::write(workdir.path().join("KB_RESET.uf2"), b"reset image").unwrap();
        let set = locate_firmware(workdir.path()).unwrap();

        let root = TempDir::new().unwrap();
        let base = root.path().to_path_buf();
        let spawner = base.clone();
        let handle = thread::spawn(move || {
            // Drive shows up a few polling attempts in
            thread::sleep(Duration::from_millis(50));
            let drive = spawner.join("NICENANO");
            fs::create_dir(&drive).unwrap();
            fs::write(drive.join(MARKER_FILE), "UF2 Bootloader\n").unwrap();
            drive
        });

        // Menu order is reset, left, quit; "2" selects the left half
        let output = run_flasher(
            "2\n3\n",
            set,
            vec![base],
            PollConfig {
                attempts: 30,
                interval: Duration::from_millis(10),
                settle: Duration::ZERO,
            },
        );
        let drive = handle.join().unwrap();

        assert_eq!(fs::read(drive.join("KB_LEFT.uf2")).unwrap(), b"left image");
        // Exactly one copy landed next to the marker
        assert_eq!(fs::read_dir(&drive).unwrap().count(), 2);
        assert!(output.contains("Found keyboard drive:"));
        assert!(output.contains("Flashing completed."));
        assert!(output.contains("Remember to flash the other side too."));
    }

    #[test]
    fn test_reset_flash_omits_other_side_advice() {
        let workdir = TempDir::new().unwrap();
        fs::write(workdir.path().join("KB_RESET.uf2"), b"reset image").unwrap();
        let set = locate_firmware(workdir.path()).unwrap();

        let root = TempDir::new().unwrap();
        let drive = root.path().join("NICENANO");
        fs::create_dir(&drive).unwrap();
        fs::write(drive.join(MARKER_FILE), "UF2 Bootloader\n").unwrap();

        let output = run_flasher(
            "1\n2\n",
            set,
            vec![root.path().to_path_buf()],
            fast_poll(3),
        );

        assert!(drive.join("KB_RESET.uf2").is_file());
        assert!(output.contains("Flashing completed."));
        assert!(!output.contains("Remember to flash the other side too."));
    }

    #[test]
    fn test_copy_failure_returns_to_menu() {
        let workdir = TempDir::new().unwrap();
        fs::write(workdir.path().join("KB_LEFT.uf2"), b"UF2").unwrap();
        let set = locate_firmware(workdir.path()).unwrap();

        let root = TempDir::new().unwrap();
        let drive = root.path().join("NICENANO");
        fs::create_dir(&drive).unwrap();
        fs::write(drive.join(MARKER_FILE), "UF2 Bootloader\n").unwrap();
        // A directory squatting on the target path makes the copy fail
        fs::create_dir(drive.join("KB_LEFT.uf2")).unwrap();

        let output = run_flasher(
            "1\n2\n",
            set,
            vec![root.path().to_path_buf()],
            fast_poll(3),
        );

        assert!(output.contains("Error flashing firmware:"));
        assert!(!output.contains("Flashing completed."));
        assert_eq!(output.matches("Choose what to flash:").count(), 2);
    }
}
