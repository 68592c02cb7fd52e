//! armrig terminal demo: an articulated arm rendered as ASCII art.
//!
//! Select a part with c/b/t/1/2/p, nudge it with the arrow keys, press s to
//! fire the projectile and click anywhere to pick. Q/ESC quits.

use anyhow::{Context, Result};
use armrig_core::{App, Settings};
use armrig_terminal::{attach_meshes, logger, TerminalApp};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "armrig-terminal")]
#[command(about = "Interactive robotic-arm rig in the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding the rig's OBJ meshes (Base2.obj, Top.obj, ...)
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,

    /// Target frames per second
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,

    /// Projectile progress per second (a full flight takes 1/RATE seconds)
    #[arg(long, value_name = "RATE")]
    launch_rate: Option<f32>,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logger(cli.verbose, cli.quiet).init();

    let mut settings = Settings::default();
    if let Some(rate) = cli.launch_rate {
        anyhow::ensure!(rate > 0.0, "launch rate must be positive, got {}", rate);
        settings.launch_rate = rate;
    }

    let mut app = App::new(settings).context("failed to build the rig")?;
    let library = attach_meshes(&mut app, cli.assets.as_deref());

    let mut terminal = TerminalApp::new(app, library, cli.fps)
        .context("failed to query the terminal size")?;
    terminal.run().context("terminal session failed")?;

    Ok(())
}
