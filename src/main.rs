//! # editor-report entry point
//!
//! With a subcommand the binary runs as a command-line tool:
//!
//! ```bash
//! editor-report report --file export.xlsx --editor "Jane Smith"
//! editor-report submissions --file export.xlsx --year 2022
//! ```
//!
//! Without one it opens the report window.

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // CLI output goes to stdout

mod cli;

use anyhow::Result;
use clap::Parser as _;
use editor_report::{config, gui};

fn main() -> Result<()> {
    // Set RUST_LOG=debug to see query details
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("editor_report=info"))
        .init();

    let cli = cli::Cli::parse();
    let config_dir = config::resolve_config_dir(cli.config_dir);

    if let Some(command) = cli.command {
        return cli::run_command(command, &config_dir);
    }

    gui::run(config_dir).map_err(|e| anyhow::anyhow!("Report window failed: {e}"))
}
