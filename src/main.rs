use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod convert;
mod util;

use convert::BuildError;

/// Convert an Obsidian-flavored Markdown note into a self-contained HTML page
#[derive(Parser)]
#[command(name = "obsidian-html", version, about)]
struct ConvertArgs {
    /// The note to convert
    input: PathBuf,

    /// Where to write the page (defaults to the input path with an .html extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// The path to the configuration file (defaults to obsidian-html.yaml next to the input)
    #[arg(short = 'c', long = "config")]
    config_file: Option<PathBuf>,

    /// Watch the note and everything it embeds, reconverting on change
    #[arg(short, long, default_value = "false")]
    watch: bool,

    /// Log what the converter is doing
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = ConvertArgs::parse();

    let filter = if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match commands::convert::run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<BuildError>() {
                Some(e @ BuildError::InputNotFound(_)) => eprintln!("Error: {}", e),
                _ => eprintln!("An error occurred: {}", err),
            }
            ExitCode::FAILURE
        }
    }
}
