//! Entry point for the `chronyconf` binary.
//! Loads settings, reads `chrony.conf` and prints the requested directives.

use anyhow::Context;
use chronyconf::cli::{Args, run};
use chronyconf::logging;
use chronyconf::settings::Settings;
use clap::Parser;
use tracing::debug;

fn main() -> anyhow::Result<()> {
    logging::init();
    let args = Args::parse();
    let settings = Settings::load(&args).context("failed to load settings")?;
    debug!(conf = %settings.conf_path.display(), "reading chrony configuration");
    let stdout = std::io::stdout();
    run(&args, &settings, &mut stdout.lock())?;
    Ok(())
}
