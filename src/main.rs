use std::process;

use recompose::cli;

fn main() {
    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .init();

    let args = cli::parse();

    if let Err(e) = cli::commands::dispatch(args) {
        eprintln!("recompose: {e:#}");
        process::exit(1);
    }
}
