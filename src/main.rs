// Entry point: loads config, applies command-line overrides, and either runs
// the TUI or renders headlessly and prints a JSON report.

mod action;
mod app;
mod components;
mod config;
mod engine;
mod headless;
mod logging;
mod theme;
mod tui;
mod ui;

use clap::{Parser, ValueEnum};
use tracing::warn;

use crate::config::Config;
use crate::engine::driver::ClockDriver;
use crate::engine::modes::Family;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FamilyArg {
    Geometric,
    Elemental,
}

impl From<FamilyArg> for Family {
    fn from(arg: FamilyArg) -> Self {
        match arg {
            FamilyArg::Geometric => Family::Geometric,
            FamilyArg::Elemental => Family::Elemental,
        }
    }
}

#[derive(Parser)]
#[command(name = "radiolume", about = "Audio-reactive visualizer for internet radio")]
struct Cli {
    /// Mode family to start in.
    #[arg(long, value_enum)]
    family: Option<FamilyArg>,

    /// Mode index within the family (0-7).
    #[arg(long)]
    mode: Option<usize>,

    /// Color theme: dark or light.
    #[arg(long)]
    theme: Option<String>,

    /// Render offscreen and print a JSON report instead of opening the TUI.
    #[arg(long)]
    headless: bool,

    /// Frames to render in headless mode.
    #[arg(long, default_value_t = 300)]
    frames: u64,

    /// Headless raster width in pixels.
    #[arg(long, default_value_t = 320)]
    width: u32,

    /// Headless raster height in pixels.
    #[arg(long, default_value_t = 180)]
    height: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load();
    let log_dir = loaded.as_ref().ok().and_then(|c| c.general.log_dir.clone());
    let _log_guard = logging::init(log_dir.as_deref())?;
    let mut config = match loaded {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "failed to read config, using defaults");
            Config::default()
        }
    };

    if let Some(family) = cli.family {
        config.visualizer.family = family.into();
    }
    if let Some(mode) = cli.mode {
        config.visualizer.mode = mode;
    }
    if let Some(theme) = cli.theme {
        config.visualizer.theme = theme;
    }

    if cli.headless {
        let mut driver = ClockDriver::new(config.general.frame_rate, cli.frames);
        let report = headless::run(
            config.visualizer.engine_options(),
            cli.width.max(1),
            cli.height.max(1),
            &mut driver,
        );
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut app = app::App::new(config)?;
    app.run().await?;

    Ok(())
}
