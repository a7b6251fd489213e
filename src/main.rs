use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use irfold::fold::DumpGate;
use irfold::report::{render_levels, render_regions};
use irfold::{create_service, discover_settings, LineIndex};
use tower_lsp::Server;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "irfold", version)]
#[command(about = "Fold compiler IR dumps in logs, keeping errors visible", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the language server on stdio (default)
    Serve,
    /// Print the fold level of every line
    Levels(InspectArgs),
    /// Print every foldable region and its label
    Regions(InspectArgs),
}

#[derive(clap::Args)]
struct InspectArgs {
    /// Log file to inspect
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Leading lines searched for a dump header
    #[arg(long, value_name = "N")]
    scan_limit: Option<usize>,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    // stdout carries the protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("irfold=info")),
        )
        .init();

    match Args::parse().command {
        None | Some(Command::Serve) => {
            serve().await;
            Ok(())
        }
        Some(Command::Levels(args)) => inspect(&args, render_levels),
        Some(Command::Regions(args)) => inspect(&args, render_regions),
    }
}

async fn serve() {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = create_service();
    Server::new(stdin, stdout, socket).serve(service).await;
}

fn inspect(
    args: &InspectArgs,
    render: fn(&DumpGate<PathBuf>, &PathBuf, &LineIndex) -> String,
) -> io::Result<()> {
    let scan_limit = match args.scan_limit {
        Some(limit) => limit,
        None => discover_settings(&std::env::current_dir()?).0.gate.scan_limit,
    };
    let doc = LineIndex::read(&args.path)?;
    let gate = DumpGate::new(scan_limit);

    print!("{}", render(&gate, &args.path, &doc));
    Ok(())
}
