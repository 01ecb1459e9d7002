#![deny(missing_docs)]

//! # OAS Query CLI
//!
//! Command Line Interface for the OpenAPI query decoding engine.
//!
//! Supported Commands:
//! - `decode`: Decodes a query string against a parameter declaration file.
//! - `inspect`: Prints the decoding plan built from a declaration file.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod decode;
mod error;
mod inspect;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI query parameter decoder")]
struct Cli {
    /// Log engine decisions to stderr (same as `RUST_LOG=debug`).
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a query string into typed parameters.
    Decode(decode::DecodeArgs),
    /// Print the per-parameter decoding plans.
    Inspect(inspect::InspectArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = match &cli.command {
        Commands::Decode(args) => decode::execute(args)?,
        Commands::Inspect(args) => inspect::execute(args)?,
    };
    println!("{}", output);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_decode_args() {
        let cli = Cli::try_parse_from([
            "oas-query",
            "decode",
            "--params",
            "p.yaml",
            "--query",
            "a=1",
            "--pair",
            "b=2",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Decode(args) => {
                assert_eq!(args.query, "a=1");
                assert_eq!(args.pairs, vec![("b".to_string(), "2".to_string())]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
