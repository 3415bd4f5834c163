mod app;
mod cli;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gradient_inference::config::Config;
use gradient_inference::consts::LOG_ENV;

use app::CommandContext;
use cli::Cli;

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("gradient_inference=debug,gradient=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = Config::load();
    let cli = cli.with_config(&config);

    let ctx = CommandContext {
        cli: &cli,
        config: &config,
        use_color: cli.use_color(),
    };

    match app::run(&ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
