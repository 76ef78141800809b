use std::{fs::File, path::Path, sync::Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use life_widget::{
    app::{App, Options},
    config::{Args, Settings},
};

fn init_logging(path: Option<&Path>) -> Result<()> {
    // The terminal is in raw mode while the widget runs, so logs only go to a file.
    let Some(path) = path else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let settings = Settings::from(&args);
    tracing::info!(?settings, "starting");

    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    App::new(Options {
        output: &mut stdout,
        settings,
    })
    .run()
}
