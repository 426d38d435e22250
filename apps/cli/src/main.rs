//! schemadoc CLI: publish JSON Schema documents into a documentation site.
//!
//! Converts the configured schema files and folders into Markdown pages
//! under the docs root and prints the generated navigation entry.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
