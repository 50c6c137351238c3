//! CLI module for GPC Knowledge
//!
//! Subcommands:
//! - `serve`: HTTP API exposing the knowledge tools
//! - `search`, `case-studies`, `creator`, `context`: one query against the
//!   live providers, printed as text or JSON

pub mod query;
pub mod serve;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// GPC Knowledge - enhanced semantic search over the course knowledge base
#[derive(Parser)]
#[command(name = "gpc-knowledge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve,

    /// Search the knowledge base
    Search(SearchArgs),

    /// Find case studies and revenue stories
    CaseStudies(CaseStudiesArgs),

    /// Find content from one creator
    Creator(CreatorArgs),

    /// Search with extra context, dropping weak matches
    Context(ContextArgs),
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    pub query: String,

    /// Exact-match category filter, e.g. "Coaching Calls"
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct CaseStudiesArgs {
    pub query: String,

    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct CreatorArgs {
    pub creator: String,

    pub query: String,

    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct ContextArgs {
    pub query: String,

    /// Extra context appended to the query
    #[arg(long)]
    pub context: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "gpc-knowledge",
            "search",
            "find winning products",
            "--category",
            "Books",
            "--format",
            "json",
        ])
        .unwrap();

        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.query, "find winning products");
                assert_eq!(args.category.as_deref(), Some("Books"));
                assert!(args.limit.is_none());
                assert!(matches!(args.format, OutputFormat::Json));
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_parse_creator() {
        let cli = Cli::try_parse_from(["gpc-knowledge", "creator", "Ethan Hayes", "ads", "--limit", "2"])
            .unwrap();

        match cli.command {
            Command::Creator(args) => {
                assert_eq!(args.creator, "Ethan Hayes");
                assert_eq!(args.query, "ads");
                assert_eq!(args.limit, Some(2));
                assert!(matches!(args.format, OutputFormat::Text));
            }
            _ => panic!("expected creator command"),
        }
    }

    #[test]
    fn test_parse_case_studies_and_context() {
        assert!(matches!(
            Cli::try_parse_from(["gpc-knowledge", "case-studies", "first sale"])
                .unwrap()
                .command,
            Command::CaseStudies(_)
        ));
        assert!(matches!(
            Cli::try_parse_from(["gpc-knowledge", "context", "ads", "--context", "beginner"])
                .unwrap()
                .command,
            Command::Context(_)
        ));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
