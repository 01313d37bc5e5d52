//! Streams CLI - validate and render Activity Streams documents.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{render, types, validate};

#[derive(Parser)]
#[command(name = "streams")]
#[command(about = "Activity Streams document validation and rendering CLI")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered object types
    Types {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replay a JSON document through the schema checks
    Validate {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Object type to validate against (default: the document's objectType)
        #[arg(long = "type")]
        object_type: Option<String>,
        /// Skip property checks
        #[arg(long)]
        lenient: bool,
        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the normalized document
    Render {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Object type to render as (default: the document's objectType)
        #[arg(long = "type")]
        object_type: Option<String>,
        /// Indent the output
        #[arg(long)]
        pretty: bool,
        /// Skip property checks
        #[arg(long)]
        lenient: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Types { json } => types::run(json),
        Commands::Validate {
            input,
            object_type,
            lenient,
            json,
        } => validate::run(input, object_type, lenient, json),
        Commands::Render {
            input,
            object_type,
            pretty,
            lenient,
        } => render::run(input, object_type, pretty, lenient),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
