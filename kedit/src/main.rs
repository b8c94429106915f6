use std::{io, process};

use clap::Parser;
use console::style;
use kedit::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    if let Err(err) = kedit::run(cli, &mut stdout.lock()) {
        eprintln!("{} {err:#}", style("Error:").red().bold().for_stderr());
        process::exit(1);
    }
}
