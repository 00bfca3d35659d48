use clap::Parser;

use minecraftimg::cli::{self, Args, Command};
use minecraftimg::config::Config;
use minecraftimg::submission::API_URL_ENV;

/// Load .env file and set up logging.
///
/// Does not override existing environment variables, so `RUST_LOG` and
/// `MINECRAFTIMG_API_URL` may come from either place.
fn load_env() {
    // dotenv::dotenv() returns Err if .env doesn't exist, which is fine
    let _ = dotenv::dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if std::env::var(API_URL_ENV).is_err() {
        log::debug!("{} not set; using config file or default endpoint", API_URL_ENV);
    }
}

fn main() {
    load_env();

    let args = Args::parse();

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match &args.command {
        Some(Command::Convert { image }) => cli::run_convert(&args, &config, image),
        Some(Command::Config { action }) => cli::handle_config_action(action.clone(), &args, &config),
        None => cli::run_interactive(&args, &config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
