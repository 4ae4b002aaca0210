use clap::{Parser, Subcommand};

use crate::{solve::SolveArgs, tours::ToursArgs};

mod instances;
mod parsers;
mod report_table;
mod solve;
mod tours;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Routes the fleet of an instance over its tour catalog
    Solve {
        #[command(flatten)]
        args: SolveArgs,
    },
    /// Builds the tour catalog of an instance and writes it to a file
    #[command(visible_alias = "t")]
    Tours {
        #[command(flatten)]
        args: ToursArgs,
    },
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Some(Commands::Solve { args }) => solve::run(args)?,
        Some(Commands::Tours { args }) => tours::run(args)?,
        None => {}
    }

    Ok(())
}
