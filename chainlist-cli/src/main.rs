use anyhow::Result;
use chainlist_cli::commands::{self, pack::PackOptions};
use chainlist_cli::SortOrder;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "chainlist")]
#[command(about = "Chainlist - pack, unpack and inspect list dumps", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack lines or a JSON array into a dump
    Pack {
        /// Input file, `-` for stdin
        #[arg(short, long)]
        input: String,

        /// Output dump file
        #[arg(short, long)]
        output: String,

        /// Input is a JSON array instead of one element per line
        #[arg(long)]
        json: bool,

        /// Sort elements before dumping
        #[arg(long, value_enum)]
        sort: Option<SortOrder>,

        /// Dump at most N bytes of every element
        #[arg(long, value_name = "N")]
        fixed_width: Option<usize>,

        /// JSON file with list configuration
        #[arg(long)]
        config: Option<String>,
    },

    /// Restore a dump and print its elements as JSON
    Unpack {
        /// Input dump file, `-` for stdin
        #[arg(short, long)]
        input: String,

        /// Output JSON file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show header fields and validate a dump
    Inspect {
        /// Input dump file, `-` for stdin
        #[arg(short, long)]
        input: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::Pack {
            input,
            output,
            json,
            sort,
            fixed_width,
            config,
        } => {
            let options = PackOptions {
                json,
                sort,
                fixed_width,
                config,
            };
            commands::pack::execute(&input, &output, &options)
        }

        Commands::Unpack { input, output } => commands::unpack::execute(&input, output.as_deref()),

        Commands::Inspect { input } => commands::inspect::execute(&input),
    }
}
