//! CLI command handlers
//!
//! This module contains all the command handlers for the `FitRAG` CLI

use std::path::PathBuf;

use tracing::info;

use crate::cli::output::print_config;
use crate::cli::output::print_info;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::cli::output::truncate_str;
use crate::index::PineconeIndex;
use crate::ingest::IngestOptions;
use crate::ingest::Ingestor;
use crate::rag::AskRequest;
use crate::rag::Assistant;
use crate::rag::QueryOutcome;
use crate::rag::NO_CONTEXT_MESSAGE;
use crate::AppConfig;
use crate::Result;

/// Handle the ask command
pub async fn handle_ask(
    config: &AppConfig,
    question: String,
    name: Option<String>,
    profile: Option<String>,
    top_k: Option<usize>,
    show_sources: bool,
) -> Result<()> {
    println!("🤖 FitRAG Assistant");
    println!("===================");
    println!();
    println!("Question: {question}");
    println!();

    println!("⏳ Connecting to services...");
    let assistant = Assistant::new(config).await?;

    let request = AskRequest {
        question,
        user_name: name,
        user_profile: profile,
        top_k,
    };

    if show_sources {
        // Diagnostic mode: surface real errors and the retrieved chunks
        match assistant.ask_with_options(request).await? {
            QueryOutcome::Answered(response) => {
                print_answer(&response.answer);
                println!("📚 Sources ({} chunks):", response.sources.len());
                for (idx, source) in response.sources.iter().enumerate() {
                    println!(
                        "  {}. {} | Score: {:.3}",
                        idx + 1,
                        source.id,
                        source.score
                    );
                    println!("     \"{}\"", truncate_str(source.text(), 100));
                }
            }
            QueryOutcome::NoMatches => {
                print_warning(NO_CONTEXT_MESSAGE);
            }
        }
    } else {
        let answer = assistant.process_request(request).await;
        print_answer(&answer);
    }

    Ok(())
}

fn print_answer(answer: &str) {
    println!();
    println!("📝 Answer:");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{answer}");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
}

/// Handle the search command
pub async fn handle_search(config: &AppConfig, question: String, top_k: usize) -> Result<()> {
    println!("🔍 FitRAG Search");
    println!("================");
    println!();
    println!("Query: {question}");
    println!();

    let assistant = Assistant::new(config).await?;
    let results = assistant.search(&question, top_k).await?;

    if results.is_empty() {
        print_warning("No matching chunks found");
        return Ok(());
    }

    print_success(&format!("Found {} chunks:", results.len()));
    println!();
    for (idx, chunk) in results.iter().enumerate() {
        println!("{}. {} | Score: {:.3}", idx + 1, chunk.id, chunk.score);
        println!("   {}", truncate_str(chunk.text(), 150));
        if let Some(filename) = &chunk.metadata.filename {
            println!("   File: {filename}");
        }
        println!();
    }

    Ok(())
}

/// Handle the ingest command
pub async fn handle_ingest(
    config: &AppConfig,
    folder: PathBuf,
    media_type: Option<u32>,
    whole_file: bool,
    namespace: Option<String>,
    resume_from: Option<String>,
    clean: bool,
    dense_only: bool,
) -> Result<()> {
    println!("📥 FitRAG Ingest");
    println!("================");
    println!();

    if !folder.is_dir() {
        return Err(crate::FitRagError::InvalidArgument(format!(
            "not a directory: {}",
            folder.display()
        )));
    }

    let options = IngestOptions {
        media_type: media_type.unwrap_or_else(|| config.media_type()),
        whole_file,
        namespace,
        resume_from,
        clean,
        use_sparse: !dense_only,
    };

    print_info(&format!(
        "Folder: {} (media type {}{}{})",
        folder.display(),
        options.media_type,
        if options.whole_file {
            ", whole files"
        } else {
            ", chunked"
        },
        if options.use_sparse {
            ", dense + sparse"
        } else {
            ", dense only"
        },
    ));
    if let Some(resume_id) = &options.resume_from {
        print_info(&format!("Resuming from {resume_id}"));
    }
    println!();

    println!("⏳ Connecting to services...");
    let ingestor = Ingestor::new(config).await?;
    let stats = ingestor.ingest_folder(&folder, &options).await?;

    println!();
    println!("📊 Ingestion Summary:");
    println!(
        "  Files: {} seen, {} ingested, {} skipped",
        stats.files_seen, stats.files_ingested, stats.files_skipped
    );
    println!(
        "  Chunks: {} upserted, {} skipped, {} failed",
        stats.chunks_upserted, stats.chunks_skipped, stats.chunks_failed
    );
    println!();

    if stats.chunks_failed > 0 {
        print_warning(&format!(
            "{} chunks failed; re-run with --resume-from to fill the gaps",
            stats.chunks_failed
        ));
    } else {
        print_success("Ingestion complete");
    }

    Ok(())
}

/// Handle the init command
pub async fn handle_init(config: &AppConfig) -> Result<()> {
    println!("🏗️  FitRAG Init");
    println!("===============");
    println!();

    let created = PineconeIndex::ensure_index(config).await?;
    if created {
        print_success(&format!("Created index '{}'", config.index_name()));
    } else {
        print_info(&format!("Index '{}' already exists", config.index_name()));
    }

    let description = PineconeIndex::describe_index(config).await?;
    info!("Index host resolved to {}", description.host);
    println!();
    println!("  Host: {}", description.host);
    println!(
        "  Dimension: {} ({})",
        description.dimension, description.metric
    );
    println!(
        "  Status: {}{}",
        description.status.state,
        if description.status.ready {
            " (ready)"
        } else {
            " (not ready yet)"
        }
    );

    Ok(())
}

/// Handle the config command
pub fn handle_config(config: &AppConfig) {
    print_config(config);
}
