#![forbid(unsafe_code)]

//! `drp`: command-line entry point for the date-range picker engine.

use clap::Parser;

mod cli_app;

fn main() {
    let args = cli_app::Cli::parse();
    if let Err(e) = cli_app::run(&args) {
        eprintln!("drp: {e}");
        std::process::exit(e.exit_code());
    }
}
