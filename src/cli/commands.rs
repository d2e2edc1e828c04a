//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

use crate::index::DEFAULT_TOP_K;

#[derive(Parser)]
#[command(name = "fitrag")]
#[command(about = "FitRAG personal health assistant backed by a vector knowledge base")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask the assistant a question
    Ask {
        /// The question to answer
        question: String,
        /// Name the answer should address (overrides the configured user)
        #[arg(long)]
        name: Option<String>,
        /// Free-text profile of the person asking
        #[arg(long)]
        profile: Option<String>,
        /// Number of knowledge chunks to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
        /// Show the source chunks behind the answer
        #[arg(long)]
        show_sources: bool,
    },
    /// Retrieve matching knowledge chunks without generating an answer
    Search {
        /// The query text
        question: String,
        /// Maximum number of chunks to return
        #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
    /// Ingest a folder of .txt files into the knowledge index
    Ingest {
        /// Folder containing .txt files
        folder: PathBuf,
        /// Numeric media-type tag used in chunk IDs
        #[arg(long)]
        media_type: Option<u32>,
        /// Upsert each file as a single record instead of chunking it
        #[arg(long)]
        whole_file: bool,
        /// Namespace to write the records into
        #[arg(long)]
        namespace: Option<String>,
        /// First chunk ID to process, e.g. id-1/6/118; earlier chunks are skipped
        #[arg(long)]
        resume_from: Option<String>,
        /// Strip special characters from each file before chunking
        #[arg(long)]
        clean: bool,
        /// Skip sparse vectors and upsert dense-only records
        #[arg(long)]
        dense_only: bool,
    },
    /// Create the knowledge index if it does not exist
    Init,
    /// Show current configuration
    Config,
}
