mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{nodes, set, show, NodesArgs, SetArgs, ShowArgs};
use tracing_subscriber::EnvFilter;

/// jsongraph CLI - inspect and edit JSON documents node by node
#[derive(Parser, Debug)]
#[command(name = "jsongraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the graph nodes of a document
    Nodes(NodesArgs),

    /// Show the editable fields of one node
    Show(ShowArgs),

    /// Edit the value or fields at a path
    Set(SetArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Nodes(args) => nodes(args),
        Command::Show(args) => show(args),
        Command::Set(args) => set(args),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
