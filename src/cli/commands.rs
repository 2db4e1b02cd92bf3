use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::{Cli, Command};
use crate::core::{Compiler, FlagRegistry};

/// Success envelope matching the HTTP boundary contract
/// (`{"command": ...}` in, `{"output": ...}` out).
#[derive(Debug, Serialize)]
struct Response {
    output: String,
}

/// Dispatch a parsed CLI command to the appropriate handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Convert {
            compose_version,
            strict,
            json,
            output,
            invocation,
        } => cmd_convert(&compose_version, strict, json, output, &invocation),
    }
}

// ─── convert ────────────────────────────────────────────────────────────────

fn cmd_convert(
    compose_version: &str,
    strict: bool,
    json: bool,
    output: Option<PathBuf>,
    invocation: &[String],
) -> Result<()> {
    let command = invocation.join(" ");

    let registry = FlagRegistry::new();
    let mut compiler =
        Compiler::new(&registry, &command).context("failed to parse docker command")?;
    compiler.set_version(compose_version);
    compiler.set_strict(strict);

    let yaml = compiler
        .compile()
        .context("failed to convert docker command")?;

    let text = if json {
        let body = serde_json::to_string(&Response { output: yaml })
            .context("failed to encode JSON response")?;
        format!("{body}\n")
    } else {
        yaml
    };

    match output {
        Some(path) => write_output(&path, &text),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

/// Write the document to a file, creating parent directories if needed.
fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
