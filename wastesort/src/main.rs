mod app;
mod config;
mod error;
mod options;
mod prompts;
mod style;
mod term;
mod toml_parser;

use app::App;
use error::AppError;
use options::Options;
use config::Config;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_env("WASTESORT_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_app() -> Result<(), AppError> {
    let options = Options::load(std::env::args())?;
    let config: Config = options.try_into()?;

    App::new(config)?.run()
}

fn main() {
    init_logging();

    if let Err(e) = run_app() { 
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    }
}
