// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! loadee CLI - load a YAML or JSON file and print its value

use clap::Parser;
use loadee_core::{Error, LoadedValue, Loader, LoaderConfig, VERSION};
use owo_colors::OwoColorize;
use serde_json::Value;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "loadee",
    about = "Load YAML and JSON files",
    long_about = "Load YAML and JSON files and print them as JSON.\n\n\
                  Script modules (.js, .mjs, .cjs) need a module host supplied by an \
                  embedding application; this binary ships none, so loading one fails \
                  with JS_LOAD_ERROR.",
    version = VERSION,
    author = "Pegasus Heavy Industries"
)]
struct Cli {
    /// File to load (path or file: URL)
    file: String,

    /// Directory relative paths are resolved against
    #[arg(short = 'b', long = "base-dir")]
    base_dir: Option<PathBuf>,

    /// Use the blocking loader
    #[arg(long)]
    sync: bool,

    /// JSON argument passed to an exported function (repeatable)
    #[arg(short = 'a', long = "arg", value_parser = parse_json)]
    args: Vec<Value>,

    /// Print compact JSON
    #[arg(short = 'c', long)]
    compact: bool,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

fn parse_json(text: &str) -> Result<Value, String> {
    serde_json::from_str(text).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging, RUST_LOG wins over --verbose
    let default_filter = if cli.verbose {
        "loadee=debug,loadee_core=debug"
    } else {
        "loadee=warn,loadee_core=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = LoaderConfig::from_env();
    if let Some(dir) = cli.base_dir.clone() {
        config.base_dir = Some(dir);
    }
    let loader = Loader::from_config(&config);
    tracing::debug!("{:?}", loader);

    let loaded = if cli.sync {
        loader.load_file_sync(cli.file.as_str(), &cli.args)
    } else {
        loader.load_file(cli.file.as_str(), &cli.args).await
    };

    match loaded {
        Ok(value) => print_value(value, cli.compact).await?,
        Err(e) => {
            report(&e);
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn print_value(value: LoadedValue, compact: bool) -> anyhow::Result<()> {
    // Only the blocking loader hands back pending values
    let value = if value.is_deferred() {
        value.settle().await?
    } else {
        value
    };

    match value {
        LoadedValue::Data(data) if compact => println!("{}", serde_json::to_string(&data)?),
        LoadedValue::Data(data) => println!("{}", serde_json::to_string_pretty(&data)?),
        LoadedValue::Invokable(_) => println!("{}", "[Function]".cyan()),
        LoadedValue::Deferred(_) => println!("{}", "[Deferred]".cyan()),
    }
    Ok(())
}

fn report(err: &Error) {
    match err.kind() {
        Some(kind) => eprintln!(
            "{} [{}]: {}",
            "Error".red().bold(),
            kind.code().yellow(),
            err
        ),
        None => eprintln!("{}: {}", "Error".red().bold(), err),
    }
}
