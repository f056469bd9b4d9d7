use clap::Parser;
use dcp_prune::{cli::Cli, config, run_command};
use std::env;
use std::process;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> dcp_prune::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    let project = match cli.project {
        Some(dir) => dir,
        None => env::current_dir()?,
    };

    // Load configuration
    let config = config::load_config(Some(&project), cli.config.as_deref())?;
    log::debug!(
        "Loaded config for {} (enabled: {}, mode: {})",
        project.display(),
        config.enabled,
        config.mode.as_str()
    );

    run_command(cli.command, config, &project, cli.config.as_deref())
}
