pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::DEFAULT_COMPOSE_VERSION;

/// Recompose — turn `docker run` invocations into compose manifests.
#[derive(Parser, Debug)]
#[command(name = "recompose", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a `docker run` invocation into a compose document.
    Convert {
        /// Compose format version to emit.
        #[arg(long, value_name = "VERSION", default_value = DEFAULT_COMPOSE_VERSION)]
        compose_version: String,

        /// Fail on flags the converter does not recognize instead of
        /// dropping them with a warning.
        #[arg(long)]
        strict: bool,

        /// Emit a JSON envelope {"output": "<yaml>"} instead of raw YAML.
        #[arg(long)]
        json: bool,

        /// Write the document to a file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// The `docker run` invocation, with or without the `docker run`
        /// prefix. Everything after `--` is taken verbatim.
        #[arg(last = true, required = true)]
        invocation: Vec<String>,
    },
}

/// Parse CLI arguments. Called from `main`.
pub fn parse() -> Cli {
    Cli::parse()
}
