use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;

use gstx::extract::{collect_labels, collect_stats, dump_json, dump_xml};
use gstx::tree::{GstBuilder, GstConfig, TreeStore};
use gstx::utils::{read_corpus_dir, read_corpus_files, CorpusDocument};
use gstx::{output, GstError};

#[derive(Parser)]
#[command(name = "gstx")]
#[command(about = "Generalized suffix tree engine over text corpora")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Corpus selection shared by every subcommand
#[derive(Args)]
struct CorpusArgs {
    /// Files to index (one document per file), or a single directory
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Document numbers ending each type context, e.g. 2,5,9
    #[arg(long, value_delimiter = ',')]
    contexts: Vec<u32>,

    /// Replay duplicated document prefixes character by character instead
    /// of fast-forwarding (the tree is identical either way)
    #[arg(long)]
    no_fast_forward: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a pattern occurs in any indexed document
    Query {
        pattern: String,

        #[command(flatten)]
        corpus: CorpusArgs,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Stream the tree as nested node records
    Dump {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: DumpFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show per-label statistics, most frequent first
    Stats {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Number of labels to show
        #[arg(long, default_value_t = 25)]
        top: usize,
    },
    /// List the distinct edge labels
    Labels {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DumpFormat {
    Json,
    Xml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            pattern,
            corpus,
            no_color,
        } => {
            let tree = build_from_args(&corpus)?;
            let found = tree.find_pattern(&pattern, tree.root());
            output::print_query_result(&pattern, found, !no_color)?;
            if !found {
                std::process::exit(1);
            }
        }
        Commands::Dump {
            corpus,
            format,
            output,
        } => {
            let tree = build_from_args(&corpus)?;
            match output {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    write_dump(&tree, format, std::io::BufWriter::new(file))?;
                }
                None => {
                    let stdout = std::io::stdout();
                    write_dump(&tree, format, stdout.lock())?;
                }
            }
        }
        Commands::Stats { corpus, top } => {
            let tree = build_from_args(&corpus)?;
            let records = collect_stats(&tree)?;
            println!(
                "{} documents, {} nodes, {} characters",
                tree.document_count(),
                tree.node_count(),
                tree.text_len()
            );
            println!();
            output::print_stats_table(&records, top)?;
        }
        Commands::Labels { corpus } => {
            let tree = build_from_args(&corpus)?;
            let labels = collect_labels(&tree)?;
            output::print_labels(&labels)?;
        }
    }

    Ok(())
}

fn write_dump<W: Write>(tree: &TreeStore, format: DumpFormat, out: W) -> Result<(), GstError> {
    match format {
        DumpFormat::Json => dump_json(tree, out),
        DumpFormat::Xml => dump_xml(tree, out),
    }
}

fn load_documents(inputs: &[PathBuf]) -> Result<Vec<CorpusDocument>> {
    if inputs.len() == 1 && inputs[0].is_dir() {
        read_corpus_dir(&inputs[0])
    } else {
        read_corpus_files(inputs)
    }
}

fn build_from_args(args: &CorpusArgs) -> Result<TreeStore> {
    let documents = load_documents(&args.inputs)?;
    anyhow::ensure!(!documents.is_empty(), "No readable documents found");

    let capacity: usize = documents
        .iter()
        .map(|d| d.content.chars().count() + 1)
        .sum();
    let config = GstConfig {
        fast_forward: !args.no_fast_forward,
        capacity_hint: capacity,
        ..Default::default()
    };

    let mut builder = GstBuilder::new(&config);
    if !args.contexts.is_empty() {
        builder = builder.with_type_contexts(&args.contexts)?;
    }

    #[cfg(feature = "progress")]
    let bar = {
        let bar = indicatif::ProgressBar::new(documents.len() as u64);
        let style = indicatif::ProgressStyle::with_template("{bar:40} {pos}/{len} documents")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar());
        bar.set_style(style);
        bar
    };

    for document in &documents {
        builder
            .add_document(&document.content)
            .with_context(|| format!("Failed to index {}", document.path.display()))?;
        #[cfg(feature = "progress")]
        bar.inc(1);
    }
    #[cfg(feature = "progress")]
    bar.finish_and_clear();

    Ok(builder.finish()?)
}
