//! rsurf CLI: render an algebraic surface script to PNG.
//!
//! Usage:
//!   rsurf [OPTIONS] <INPUT|-> [OUTPUT|-]
//!
//! `-` reads the scene from stdin or writes the PNG to stdout. Exit codes:
//! 0 success, 255 bad arguments or configuration, 254 scene load failure,
//! 253 render failure, 252 output failure.

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;

use rsurf_common::config::AppConfig;
use rsurf_common::error::Stage;
use rsurf_common::logging::init_logging;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "rsurf",
    about = "Render real algebraic surfaces from .jsurf scripts to PNG",
    version
)]
pub struct Cli {
    /// Scene script, or `-` to read it from stdin
    #[arg(value_name = "INPUT")]
    pub input: String,

    /// Output PNG, or `-` for stdout (takes precedence over --output)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<String>,

    /// Width and height of the square image in pixels [default: 512]
    #[arg(short, long, value_name = "N", allow_hyphen_values = true)]
    pub size: Option<String>,

    /// Anti-aliasing quality, 0 (fast) to 3 (best) [default: 1]
    #[arg(short, long, value_name = "0..3", allow_hyphen_values = true)]
    pub quality: Option<String>,

    /// Output PNG, or `-` for stdout
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output_option: Option<String>,

    /// Show the image in a window instead of writing it, when a display is available
    #[arg(long)]
    pub gui: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => Stage::Config.exit_code(),
            };
            err.print().ok();
            return ExitCode::from(code);
        }
    };

    let (config, config_error): (AppConfig, Option<anyhow::Error>) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_logging(&config.logging, cli.verbose);

    if let Some(e) = config_error {
        tracing::warn!(error = %e, "Ignoring config file, using built-in defaults");
    }

    let mut display = rsurf_display::platform_display();
    match commands::render::run(&cli, &config.defaults, display.as_mut()) {
        Ok(delivery) => {
            tracing::debug!(?delivery, "Done");
            display.run_until_closed();
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("rsurf: {} error: {err}", err.stage().name());
            ExitCode::from(err.exit_code())
        }
    }
}
