//! Opening a URL with the platform's default handler

use crate::RandpageError;
use std::process::Command;

/// Hands a URL to whatever should display it
pub trait Launcher {
    /// Returns once the launch command has finished. Success only means the
    /// command ran; it says nothing about whether the viewer loaded the URL.
    fn launch(&self, url: &str) -> Result<(), RandpageError>;
}

impl<L: Launcher + ?Sized> Launcher for &L {
    fn launch(&self, url: &str) -> Result<(), RandpageError> {
        (**self).launch(url)
    }
}

/// Launches URLs with `open`, `start` or `xdg-open`, depending on the platform
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl SystemLauncher {
    fn command(url: &str) -> Command {
        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        } else if cfg!(target_os = "windows") {
            // The empty string is the window title `start` would otherwise
            // take from the first quoted argument
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", ""]).arg(url);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
    }
}

impl Launcher for SystemLauncher {
    fn launch(&self, url: &str) -> Result<(), RandpageError> {
        let status = Self::command(url)
            .status()
            .map_err(|e| RandpageError::Launch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(RandpageError::Launch {
                url: url.to_string(),
                reason: status.to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_carries_url() {
        let url = "http://127.0.0.1:8080/a.pdf#page=2";
        let cmd = SystemLauncher::command(url);
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args.last().map(|a| a.to_str()), Some(Some(url)));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_command_linux_uses_xdg_open() {
        let cmd = SystemLauncher::command("http://localhost/");
        assert_eq!(cmd.get_program(), "xdg-open");
    }
}
