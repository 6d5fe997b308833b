mod api;
mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod model;
mod ui;
mod util;

use std::io;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use api::LinearClient;
use cli::Cli;
use commands::Context;
use config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Only the working directory's .env; parent directories are not searched.
    let dotenv = dotenvy::from_path(Path::new(".env"));
    logging::init(cli.verbose);
    if dotenv.is_ok() {
        debug!("loaded .env");
    }

    // Fail on a missing key before anything touches the network.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", anyhow::Error::from(e));
            return ExitCode::FAILURE;
        }
    };
    let settings = config::load_settings();

    let client = match LinearClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {:#}", anyhow::Error::from(e));
            return ExitCode::FAILURE;
        }
    };

    let ctx = Context {
        transport: &client,
        defaults: &settings.defaults,
        width: ui::terminal_width(),
        color: ui::color_enabled(),
    };
    let code = commands::execute(&cli.command, &ctx, &mut io::stdout(), &mut io::stderr()).await;
    ExitCode::from(code)
}
