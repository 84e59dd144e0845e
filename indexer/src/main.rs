use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use search_core::persist::{load_snapshot, save_snapshot, SnapshotPaths};
use search_core::{Catalog, CourseDraft, EngineConfig, SearchEngine};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and query course catalog snapshots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a catalog snapshot from JSON/JSONL course files or a directory of them
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Output snapshot directory
        #[arg(long)]
        output: String,
    },
    /// Search a snapshot offline and print hits, spelling suggestions and term stats
    Query {
        /// Snapshot directory
        #[arg(long)]
        catalog: String,
        #[arg(long)]
        keyword: String,
        /// Engine config (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output } => build_catalog(&input, &output).map(|_| ()),
        Commands::Query { catalog, keyword, config } => {
            let config = match config {
                Some(path) => EngineConfig::from_json_file(path)?,
                None => EngineConfig::default(),
            };
            let report = query_catalog(&catalog, &keyword, config)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

fn collect_inputs(input_path: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    }
    files
}

/// Read every input file, assign ids and write the snapshot. Returns the
/// number of courses written.
fn build_catalog(input: &str, output: &str) -> Result<usize> {
    let catalog = Catalog::new();
    for file in collect_inputs(Path::new(input)) {
        let drafts = if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file)?
        } else {
            read_json(&file)?
        };
        let skipped = drafts.iter().filter(|d| d.title.trim().is_empty()).count();
        if skipped > 0 {
            tracing::warn!(file = %file.display(), skipped, "courses without a title skipped");
        }
        catalog.insert_many(drafts.into_iter().filter(|d| !d.title.trim().is_empty()));
        tracing::debug!(file = %file.display(), total = catalog.len(), "ingested file");
    }

    let courses = catalog.snapshot();
    let index = search_core::InvertedIndex::from_courses(&courses);
    tracing::info!(num_courses = courses.len(), num_terms = index.num_terms(), "ingested courses");

    save_snapshot(&SnapshotPaths::new(output), &courses)?;
    tracing::info!(output, "catalog build complete");
    Ok(courses.len())
}

fn read_jsonl(file: &Path) -> Result<Vec<CourseDraft>> {
    let reader = BufReader::new(File::open(file)?);
    let mut drafts = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let draft: CourseDraft = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}", file.display(), lineno + 1))?;
        drafts.push(draft);
    }
    Ok(drafts)
}

fn read_json(file: &Path) -> Result<Vec<CourseDraft>> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    let drafts = match json {
        serde_json::Value::Array(arr) => arr
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<CourseDraft>, _>>()?,
        serde_json::Value::Object(_) => vec![serde_json::from_value(json)?],
        _ => Vec::new(),
    };
    Ok(drafts)
}

#[derive(Serialize)]
struct QueryReport {
    keyword: String,
    hits: Vec<QueryHit>,
    spelling: Vec<String>,
    /// Courses containing the keyword as a token.
    document_frequency: usize,
    vocabulary_size: usize,
}

#[derive(Serialize)]
struct QueryHit {
    id: u64,
    title: String,
    platform: String,
    score: f64,
    occurrences: u32,
}

fn query_catalog(dir: &str, keyword: &str, config: EngineConfig) -> Result<QueryReport> {
    let catalog = load_snapshot(&SnapshotPaths::new(dir))?;
    let engine = SearchEngine::new(Arc::new(catalog), config);
    let hits = engine
        .search(keyword)?
        .into_iter()
        .map(|h| QueryHit {
            id: h.course.id,
            title: h.course.title,
            platform: h.course.platform,
            score: h.score,
            occurrences: h.occurrences,
        })
        .collect::<Vec<_>>();
    let spelling = if hits.is_empty() { engine.spellcheck(keyword) } else { Vec::new() };
    Ok(QueryReport {
        keyword: keyword.to_string(),
        hits,
        spelling,
        document_frequency: engine.inverted_index().df(keyword),
        vocabulary_size: engine.vocabulary().len(),
    })
}
