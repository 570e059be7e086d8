use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use traced_service::lifecycle::{startup, Overrides};

#[derive(Parser, Debug)]
#[command(name = "traced-service", version)]
#[command(about = "User lookup service with OpenTelemetry traces and metrics", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Trace exporter: stdout | jaeger
    #[arg(long)]
    trace: Option<String>,

    /// Listener bind address, e.g. 0.0.0.0:8080
    #[arg(long)]
    bind: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let overrides = Overrides {
        config_path: cli.config,
        trace: cli.trace,
        bind_address: cli.bind,
    };

    match startup::run(overrides) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("traced-service: {e}");
            ExitCode::FAILURE
        }
    }
}
