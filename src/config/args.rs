//! CLI argument parsing using clap

use clap::Parser;
use std::fmt;
use std::path::PathBuf;

/// jokeworker - logs a joke every few seconds
///
/// Runs as a tray icon by default, as a console app with --console,
/// or under the Service Control Manager with --service.
#[derive(Parser, Debug)]
#[command(name = "jokeworker")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Run attached to a console window
    #[arg(long)]
    pub console: bool,

    /// Run as a Windows service (used by the Service Control Manager)
    #[arg(long)]
    pub service: bool,

    /// Configuration file (default: searched next to the executable, then ProgramData)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose output (can be repeated for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode - only show errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Log output to file (overrides the configured log file)
    #[arg(long)]
    pub log: Option<PathBuf>,
}

/// Process run mode, chosen once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Interactive console app
    Console,
    /// Managed Windows service
    Service,
    /// System tray icon (default)
    Tray,
}

impl RunMode {
    /// Pick the run mode from the two mode flags. Console wins when both are set.
    pub fn select(console: bool, service: bool) -> Self {
        if console {
            RunMode::Console
        } else if service {
            RunMode::Service
        } else {
            RunMode::Tray
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Console => write!(f, "Console"),
            RunMode::Service => write!(f, "Service"),
            RunMode::Tray => write!(f, "TrayIcon"),
        }
    }
}

impl Args {
    /// Run mode selected by the command line
    pub fn run_mode(&self) -> RunMode {
        RunMode::select(self.console, self.service)
    }

    /// Log level override from verbose/quiet flags, if any was given
    pub fn log_level(&self) -> Option<tracing::Level> {
        if self.quiet {
            Some(tracing::Level::ERROR)
        } else {
            match self.verbose {
                0 => None,
                1 => Some(tracing::Level::DEBUG),
                _ => Some(tracing::Level::TRACE),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("jokeworker").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_console_flag_wins() {
        assert_eq!(parse(&["--console"]).run_mode(), RunMode::Console);
        assert_eq!(parse(&["--console", "--service"]).run_mode(), RunMode::Console);
        assert_eq!(parse(&["--service", "--console"]).run_mode(), RunMode::Console);
        assert_eq!(parse(&["-v", "--console", "--quiet"]).run_mode(), RunMode::Console);
    }

    #[test]
    fn test_service_without_console() {
        assert_eq!(parse(&["--service"]).run_mode(), RunMode::Service);
        assert_eq!(
            parse(&["--service", "--config", "jokeworker.toml"]).run_mode(),
            RunMode::Service
        );
    }

    #[test]
    fn test_tray_is_default() {
        assert_eq!(parse(&[]).run_mode(), RunMode::Tray);
        assert_eq!(parse(&["-vv", "--log", "out.log"]).run_mode(), RunMode::Tray);
    }

    #[test]
    fn test_select_truth_table() {
        assert_eq!(RunMode::select(true, true), RunMode::Console);
        assert_eq!(RunMode::select(true, false), RunMode::Console);
        assert_eq!(RunMode::select(false, true), RunMode::Service);
        assert_eq!(RunMode::select(false, false), RunMode::Tray);
    }

    #[test]
    fn test_log_level_flags() {
        assert_eq!(parse(&[]).log_level(), None);
        assert_eq!(parse(&["-v"]).log_level(), Some(tracing::Level::DEBUG));
        assert_eq!(parse(&["-vvv"]).log_level(), Some(tracing::Level::TRACE));
        assert_eq!(parse(&["-q", "-v"]).log_level(), Some(tracing::Level::ERROR));
    }
}
