//! Command-line interface definitions for overlayctl.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use logging::LogArgs;

/// Command-line interface for the `overlayctl` binary.
#[derive(Parser, Debug)]
#[command(
    name = "overlayctl",
    about = "Drive the overlay service against a headless display",
    version
)]
pub struct Cli {
    /// Logging controls shared across overlay binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// Headless display and settings.
    #[command(flatten)]
    pub display: DisplayArgs,

    /// What to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a RON list of steps and print each reply as a JSON line.
    Run {
        /// Path to the script file.
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,
    },
    /// Show an overlay, drag it, let it snap right, then close it.
    Demo,
}

/// Display geometry for the headless platform.
///
/// When no geometry flag is given the display reports no metrics and the
/// service falls back to the configured fallback display.
#[derive(Args, Debug, Clone, Default)]
pub struct DisplayArgs {
    /// Display width in px.
    #[arg(long, global = true, value_name = "PX")]
    pub display_width: Option<i32>,

    /// Display height in px.
    #[arg(long, global = true, value_name = "PX")]
    pub display_height: Option<i32>,

    /// Pixels per dp.
    #[arg(long, global = true, value_name = "RATIO")]
    pub density: Option<f32>,

    /// Settings file (RON). Defaults to `$OVERLAY_SETTINGS`, then
    /// `~/.config/overlay/settings.ron`.
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,
}

impl DisplayArgs {
    /// True when any geometry flag was supplied.
    pub fn has_geometry(&self) -> bool {
        self.display_width.is_some() || self.display_height.is_some() || self.density.is_some()
    }
}
