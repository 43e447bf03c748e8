use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use escaper_codegen::{builtin_escapers, load_escapers, run, GeneratorConfig};
use tracing::error;

/// Generates the escaping-directive helpers used by the template runtime
#[derive(Parser, Debug)]
#[command(name = "escaper-codegen")]
struct Args {
    /// JavaScript source that uses the generated helpers (repeatable)
    #[arg(long = "input")]
    inputs: Vec<PathBuf>,

    /// File receiving the inputs followed by the generated helpers
    #[arg(long)]
    output: Option<PathBuf>,

    /// Glob naming functions available where the output runs, e.g. `goog.*` (repeatable)
    #[arg(long = "js-defined")]
    js_defined: Vec<String>,

    /// JSON file of escaper definitions; the built-in registry when omitted
    #[arg(long)]
    escapers: Option<PathBuf>,

    /// Increase logging verbosity (-v INFO, -vv DEBUG, -vvv TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = GeneratorConfig {
        inputs: args.inputs,
        output: args.output,
        js_defined: args.js_defined,
    };

    let loaded;
    let escapers = match &args.escapers {
        Some(path) => match load_escapers(path) {
            Ok(escapers) => {
                loaded = escapers;
                &loaded[..]
            }
            Err(e) => {
                error!(code = e.code(), "{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => builtin_escapers(),
    };

    match run(&config, escapers) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.code(), "{}", e);
            ExitCode::FAILURE
        }
    }
}
