use clap::Parser;
use skypost::cli::Config;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    env_logger::Builder::new()
        .filter_level(config.verbosity().log_level_filter())
        .init();

    match skypost::cli::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            skypost::cli::report(&err);
            ExitCode::from(skypost::cli::exit_status(&err))
        }
    }
}
