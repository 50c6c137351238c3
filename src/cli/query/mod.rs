//! One-shot query commands against the live providers

use std::fmt::Write as _;

use crate::config::AppConfig;
use crate::domain::knowledge_base::{SearchRequest, SearchResult};
use crate::infrastructure::observability::init_tracing;
use crate::infrastructure::services::KnowledgeSearchService;

use super::{CaseStudiesArgs, ContextArgs, CreatorArgs, OutputFormat, SearchArgs};

/// A query command with its arguments
#[derive(Debug, Clone)]
pub enum QueryCommand {
    Search(SearchArgs),
    CaseStudies(CaseStudiesArgs),
    Creator(CreatorArgs),
    Context(ContextArgs),
}

impl QueryCommand {
    fn format(&self) -> OutputFormat {
        match self {
            Self::Search(a) => a.format,
            Self::CaseStudies(a) => a.format,
            Self::Creator(a) => a.format,
            Self::Context(a) => a.format,
        }
    }
}

/// Run one query and print the results to stdout
///
/// Upstream failures surface as an error exit rather than an empty list.
pub async fn run(command: QueryCommand) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config.logging, &config.observability.tracing);

    let service = crate::create_knowledge_service(&config)?;
    let results = execute(&service, &command).await?;

    print!("{}", render(&results, command.format())?);

    Ok(())
}

async fn execute(
    service: &KnowledgeSearchService,
    command: &QueryCommand,
) -> anyhow::Result<Vec<SearchResult>> {
    let results = match command {
        QueryCommand::Search(args) => {
            let mut request = SearchRequest::new(args.query.clone())
                .with_category(args.category.clone().filter(|c| !c.is_empty()));

            if let Some(limit) = requested_limit(args.limit) {
                request = request.with_limit(limit);
            }

            service.try_search(&request).await?
        }
        QueryCommand::CaseStudies(args) => {
            service
                .try_search_case_studies(&args.query, requested_limit(args.limit))
                .await?
        }
        QueryCommand::Creator(args) => {
            service
                .try_search_by_creator(&args.creator, &args.query, requested_limit(args.limit))
                .await?
        }
        QueryCommand::Context(args) => {
            service
                .try_search_with_context(
                    &args.query,
                    args.context.as_deref(),
                    args.category.as_deref(),
                    requested_limit(args.limit),
                )
                .await?
        }
    };

    Ok(results)
}

/// `--limit 0` means the command's default, as in the tool API
fn requested_limit(limit: Option<usize>) -> Option<usize> {
    limit.filter(|l| *l > 0)
}

fn render(results: &[SearchResult], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(results)?)),
        OutputFormat::Text => Ok(render_text(results)),
    }
}

fn render_text(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No results\n".to_string();
    }

    let mut out = String::new();

    for (i, result) in results.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} [{}] {}%",
            i + 1,
            result.title,
            result.category,
            result.relevance_percent()
        );

        if let Some(creator) = &result.creator {
            let _ = writeln!(out, "   by {}", creator);
        }

        if let Some(url) = &result.video_url {
            let _ = writeln!(out, "   {}", url);
        }
    }

    out
}
