use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;
use sfxsort_core::RuleBasedClassifier;
use sfxsort_library::{CategoryTree, Library, LibraryClassifier, ManualOverrides, PipelineConfig};

/// Sort a sound-effects library by file and folder names
#[derive(Parser, Debug)]
#[command(name = "sfxsort")]
#[command(about = "Classify sound-effects files from their names", long_about = None)]
struct Args {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan a library root and classify every audio file
    Scan {
        /// Library root directory
        root: PathBuf,

        /// Manual override JSON file (defaults to the one in the root)
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Pipeline config JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Neighbours taking part in the similarity vote
        #[arg(long)]
        top_k: Option<usize>,

        /// Minimum neighbour similarity
        #[arg(long)]
        min_similarity: Option<f32>,

        /// Minimum centroid similarity
        #[arg(long)]
        min_centroid_similarity: Option<f32>,

        /// Labelled items needed before the similarity pass runs
        #[arg(long)]
        min_corpus_size: Option<usize>,

        /// Print the category tree instead of the items
        #[arg(long)]
        tree: bool,
    },

    /// Classify literal paths with the naming rules only
    Infer {
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[derive(Serialize)]
struct InferOutput<'a> {
    path: &'a str,
    tier1: String,
    tier2: String,
    confidence: f64,
    category: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries JSON, logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Scan {
            root,
            overrides,
            config,
            top_k,
            min_similarity,
            min_centroid_similarity,
            min_corpus_size,
            tree,
        } => {
            let mut config = match config {
                Some(path) => PipelineConfig::load(&path)?,
                None => PipelineConfig::default(),
            };
            if let Some(top_k) = top_k {
                config.similarity.top_k = top_k;
            }
            if let Some(min_similarity) = min_similarity {
                config.similarity.min_similarity = min_similarity;
            }
            if let Some(min_centroid_similarity) = min_centroid_similarity {
                config.similarity.min_centroid_similarity = min_centroid_similarity;
            }
            if let Some(min_corpus_size) = min_corpus_size {
                config.min_corpus_size = min_corpus_size;
            }

            let overrides = match overrides {
                Some(path) => ManualOverrides::load(&path)?,
                None => ManualOverrides::load_from_root(&root)?,
            };

            info!("Starting sfxsort v{}", env!("CARGO_PKG_VERSION"));
            info!("Library root: {:?}", root);
            info!("Manual overrides: {}", overrides.len());

            let classifier = LibraryClassifier::new(config)?;
            let cancel = AtomicBool::new(false);
            let items = classifier.scan(&root, &overrides, &cancel, |p| {
                debug!(phase = ?p.phase, done = p.done, total = p.total, "scan progress");
            })?;
            let library = Library::new(items);
            info!("Classified {} items", library.len());

            let stdout = io::stdout();
            let mut out = stdout.lock();
            if tree {
                print_tree(&mut out, &library.tree())?;
            } else {
                for item in library.items() {
                    writeln!(out, "{}", serde_json::to_string(&item)?)?;
                }
            }
        }
        Command::Infer { paths } => {
            let rules = RuleBasedClassifier::new();
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for path in &paths {
                let c = rules.infer(path);
                let output = InferOutput {
                    path,
                    category: c.category(),
                    tier1: c.tier1,
                    tier2: c.tier2,
                    confidence: c.confidence,
                };
                writeln!(out, "{}", serde_json::to_string(&output)?)?;
            }
        }
    }

    Ok(())
}

fn print_tree(out: &mut impl Write, tree: &CategoryTree) -> io::Result<()> {
    for (depth, node) in tree.flatten() {
        writeln!(out, "{}{} ({})", "  ".repeat(depth), node.name, node.count)?;
    }
    Ok(())
}
