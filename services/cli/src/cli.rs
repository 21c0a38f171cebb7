use crate::infra::bootstrap;
use crate::score::{run_batch, run_score, run_strategies, BatchArgs, ScoreArgs};
use clap::{Parser, Subcommand};
use repo_scorer::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "repo-scorer",
    about = "Score software repositories from their popularity, collaboration and recency metrics",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Score a single repository snapshot given on the command line
    Score(ScoreArgs),
    /// Score every row of a CSV file, preserving input order
    Batch(BatchArgs),
    /// List the registered scoring strategy versions
    Strategies,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let service = bootstrap()?;

    match cli.command {
        Command::Score(args) => run_score(&service, args),
        Command::Batch(args) => run_batch(&service, args),
        Command::Strategies => run_strategies(&service),
    }
}
