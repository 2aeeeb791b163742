use clap::Parser;
use docx_review::cli::{self, CliArguments};

/// The main entry point.
///
/// No error escapes: hard errors print to stderr and exit 1; per-operation
/// failures surface through the processing report and map to the same exit
/// code inside [`cli::run`].
fn main() {
    // Start logging
    let _ = {
        use log::LevelFilter::*;
        env_logger::builder()
            .filter_module("docx_review", Warn)
            .parse_default_env()
            .try_init()
    };

    let args = CliArguments::parse();
    match cli::run(&args) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        },
    }
}
