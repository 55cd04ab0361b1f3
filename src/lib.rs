pub mod cli;
pub mod commands;
pub mod logging;
pub mod models;
pub mod services;

use clap::Parser;

/// Parse the command line, set up logging and run the requested command
pub fn run() -> Result<(), String> {
    let args = cli::Args::parse();
    logging::init_logging(args.log_json);

    cli::execute(args)
}
