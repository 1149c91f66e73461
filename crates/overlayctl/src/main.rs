#![warn(missing_docs)]

//! Entry point for the `overlayctl` binary.

mod cli;
mod error;
mod script;

use std::{fs, io, process};

use clap::Parser;
use config::Settings;
use overlay_server::{Server, headless::HeadlessPlatform};
use overlay_winops::DisplayMetrics;
use tracing::{error, info, warn};

use crate::{
    cli::{Cli, Commands, DisplayArgs},
    error::Result,
};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and run the chosen command.
fn run() -> Result<()> {
    let Cli {
        log,
        display,
        command,
    } = Cli::parse();
    logging::init(&log);

    let settings = Settings::resolve(display.settings.as_deref())?;
    let steps = match command {
        Commands::Run { script } => script::parse(&fs::read_to_string(&script)?)?,
        Commands::Demo => script::demo(),
    };

    let hp = HeadlessPlatform::new(metrics_for(&display, &settings));
    let (server, mut host_rx) = Server::spawn(hp.platform(), settings)?;
    info!(steps = steps.len(), "running script");
    let stdout = io::stdout();
    let failures = script::run(&server.handle(), &mut host_rx, &steps, &mut stdout.lock())?;
    server.shutdown();
    if failures > 0 {
        warn!(failures, "some calls failed");
    }
    Ok(())
}

/// Display metrics for the headless platform, or `None` to exercise the
/// fallback display. Missing axes come from the fallback.
fn metrics_for(display: &DisplayArgs, settings: &Settings) -> Option<DisplayMetrics> {
    if !display.has_geometry() {
        return None;
    }
    let fb = &settings.fallback_display;
    let mut m = DisplayMetrics::fallback(fb, settings.status_bar_height_dp);
    m.width_px = display.display_width.unwrap_or(fb.width_px);
    m.height_px = display.display_height.unwrap_or(fb.height_px);
    if let Some(density) = display.density {
        m.density = density;
        m.status_bar_px = m.dp_to_px(settings.status_bar_height_dp);
    }
    Some(m)
}
