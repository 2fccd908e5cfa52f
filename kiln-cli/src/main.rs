use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kiln", version, about = "Kiln block template CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a template and print its block context.
    Inspect {
        /// Path to the template file
        input: PathBuf,
        /// Keep whitespace-only text nodes
        #[arg(long)]
        keep_whitespace: bool,
    },
    /// Mount a template with data and print the resulting HTML.
    Render {
        /// Path to the template file
        input: PathBuf,
        /// Data values in slot order (`null`, `true`, `false`, numbers, strings)
        #[arg(long, num_args = 1..)]
        data: Vec<String>,
        /// Keep whitespace-only text nodes
        #[arg(long)]
        keep_whitespace: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env().init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Inspect {
            input,
            keep_whitespace,
        } => print!("{}", kiln_cli::inspect_cmd(&input, keep_whitespace)?),
        Commands::Render {
            input,
            data,
            keep_whitespace,
        } => println!("{}", kiln_cli::render_cmd(&input, &data, keep_whitespace)?),
    }
    Ok(())
}
