use clap::Parser;
use gpc_knowledge::cli::query::QueryCommand;
use gpc_knowledge::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Search(args) => cli::query::run(QueryCommand::Search(args)).await,
        Command::CaseStudies(args) => cli::query::run(QueryCommand::CaseStudies(args)).await,
        Command::Creator(args) => cli::query::run(QueryCommand::Creator(args)).await,
        Command::Context(args) => cli::query::run(QueryCommand::Context(args)).await,
    }
}
