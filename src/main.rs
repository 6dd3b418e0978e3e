//! codeindex CLI — the ambient operator surface over the `Orchestrator`.

mod cli;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use cli::Commands;
use codeindex::application::use_cases::Progress;
use codeindex::connector::{AstSplitter, DuckdbVectorStore, FallbackSplitter, JsonSnapshotStore, MockEmbedder};
use codeindex::domain::{ExtensionAllowlist, IgnorePatternSet, SearchQuery};
use codeindex::{IndexerConfig, Orchestrator};

#[derive(Parser)]
#[command(name = "codeindex")]
#[command(author, version, about = "AST-aware codebase indexing and semantic search", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn ignore_file(codebase_root: &Path) -> PathBuf {
    codebase_root.join(".codeindex").join("ignore.json")
}

async fn load_ignore_patterns(codebase_root: &Path) -> Result<IgnorePatternSet> {
    let path = ignore_file(codebase_root);
    match tokio::fs::read_to_string(&path).await {
        Ok(raw) => {
            let patterns: Vec<String> = serde_json::from_str(&raw)
                .with_context(|| format!("corrupt ignore patterns at {path:?}"))?;
            Ok(IgnorePatternSet::from_patterns(&patterns)?)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(IgnorePatternSet::new()),
        Err(e) => Err(e.into()),
    }
}

async fn save_ignore_patterns(codebase_root: &Path, patterns: &[String]) -> Result<()> {
    let path = ignore_file(codebase_root);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let serialized = serde_json::to_vec_pretty(patterns)?;
    tokio::fs::write(&path, serialized).await?;
    Ok(())
}

fn progress_bar(label: &'static str) -> Arc<dyn Fn(Progress) + Send + Sync> {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template(&format!("{{spinner}} {label} [{{bar:40}}] {{pos}}/{{len}} {{msg}}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    Arc::new(move |p: Progress| {
        bar.set_length(p.total);
        bar.set_position(p.current);
        if p.current >= p.total {
            bar.finish_and_clear();
        }
    })
}

async fn orchestrator(codebase_root: &Path) -> Result<Orchestrator> {
    let ignores = load_ignore_patterns(codebase_root).await?;
    let data_dir = codebase_root.join(".codeindex");
    tokio::fs::create_dir_all(&data_dir).await?;
    let vector_store = Arc::new(DuckdbVectorStore::new(&data_dir.join("vectors.duckdb"))?);

    Ok(Orchestrator::new(
        Arc::new(AstSplitter::new()),
        Arc::new(FallbackSplitter::new()),
        Arc::new(MockEmbedder::new()),
        vector_store,
        Arc::new(JsonSnapshotStore::new()),
        IndexerConfig::from_env(),
        ignores,
        ExtensionAllowlist::default(),
    )?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let cancel = CancellationToken::new();

    match cli.command {
        Commands::Index { path } => {
            let root = PathBuf::from(&path);
            let orch = orchestrator(&root).await?;
            let summary = orch
                .index(&root, Some(progress_bar("indexing")), &cancel)
                .await?;
            println!(
                "indexed {} files, {} chunks ({} skipped), status={:?}",
                summary.files_indexed, summary.chunks_indexed, summary.files_skipped, summary.status
            );
        }

        Commands::Reindex { path } => {
            let root = PathBuf::from(&path);
            let orch = orchestrator(&root).await?;
            let summary = orch
                .reindex_by_change(&root, Some(progress_bar("reindexing")), &cancel)
                .await?;
            println!(
                "added {}, modified {}, removed {}",
                summary.added, summary.modified, summary.removed
            );
        }

        Commands::Search {
            path,
            query,
            limit,
            min_score,
            language,
        } => {
            let root = PathBuf::from(&path);
            let orch = orchestrator(&root).await?;

            let mut search_query = SearchQuery::new(&query).with_limit(limit);
            if let Some(score) = min_score {
                search_query = search_query.with_min_score(score);
            }
            if let Some(langs) = language {
                search_query = search_query.with_languages(langs);
            }

            let results = orch.search(&root, &search_query).await?;
            if results.is_empty() {
                println!("No results found.");
            } else {
                for (i, result) in results.iter().enumerate() {
                    println!("{}. {}", i + 1, result.display_line());
                    let preview: String = result
                        .content()
                        .lines()
                        .take(3)
                        .map(|l| format!("   | {l}"))
                        .collect::<Vec<_>>()
                        .join("\n");
                    println!("{preview}\n");
                }
            }
        }

        Commands::Clear { path } => {
            let root = PathBuf::from(&path);
            let orch = orchestrator(&root).await?;
            orch.clear(&root).await?;
            println!("cleared index for {path}");
        }

        Commands::HasIndex { path } => {
            let root = PathBuf::from(&path);
            let orch = orchestrator(&root).await?;
            println!("{}", orch.has_index(&root).await?);
        }

        Commands::Ignore { path, patterns } => {
            let root = PathBuf::from(&path);
            save_ignore_patterns(&root, &patterns).await?;
            println!("saved {} ignore pattern(s) for {path}", patterns.len());
        }
    }

    Ok(())
}
