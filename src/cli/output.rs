//! CLI output formatting utilities
//!
//! This module provides consistent output formatting for the `FitRAG` CLI

use crate::AppConfig;

/// Safely truncate a string at character boundary (not byte boundary)
///
/// This prevents panics when truncating strings with multi-byte UTF-8
/// characters (emojis, etc.)
///
/// # Arguments
/// * `s` - The string to truncate
/// * `max_chars` - Maximum number of characters (not bytes)
///
/// # Returns
/// Truncated string with "..." suffix if truncated, otherwise the original string
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Mask an API key for display, keeping just enough to recognize it
#[must_use]
pub fn mask_key(key: &str) -> String {
    if key.is_empty() {
        return "(not set)".to_string();
    }
    if key.chars().count() <= 8 {
        return "***".to_string();
    }
    let head: String = key.chars().take(4).collect();
    let tail: String = key.chars().skip(key.chars().count() - 4).collect();
    format!("{head}...{tail}")
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("ℹ️  {message}");
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("✅ {message}");
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("⚠️  {message}");
}

/// Print an error message
pub fn print_error(message: &str) {
    println!("❌ {message}");
}

/// Print the active configuration with credentials masked
pub fn print_config(config: &AppConfig) {
    println!("📋 FitRAG Configuration:");
    println!();

    println!("🧠 Embeddings:");
    println!("  Endpoint: {}", config.embeddings_endpoint());
    println!("  Model: {}", config.embedding_model());
    println!("  Dimension: {}", config.embedding_dimension());
    println!("  API key: {}", mask_key(config.embeddings_api_key()));
    println!();

    println!("🗂️  Index:");
    println!("  Name: {}", config.index_name());
    println!("  Control plane: {}", config.control_plane_endpoint());
    println!(
        "  Serverless: {} / {}",
        config.index_cloud(),
        config.index_region()
    );
    println!("  Metric: {}", config.index_metric());
    println!("  Sparse model: {}", config.sparse_model());
    println!("  API key: {}", mask_key(config.index_api_key()));
    println!();

    println!("🤖 LLM:");
    println!("  Endpoint: {}", config.llm_endpoint());
    println!("  Model: {}", config.llm_model());
    match config.llm_temperature() {
        Some(temperature) => println!("  Temperature: {temperature}"),
        None => println!("  Temperature: (model default)"),
    }
    match config.llm_max_output_tokens() {
        Some(max_tokens) => println!("  Max output tokens: {max_tokens}"),
        None => println!("  Max output tokens: (model default)"),
    }
    println!("  API key: {}", mask_key(config.llm_api_key()));
    println!();

    println!("💬 Assistant:");
    println!("  User name: {}", config.user_name());
    if config.user_profile().is_empty() {
        println!("  User profile: (not set)");
    } else {
        println!("  User profile: {}", truncate_str(config.user_profile(), 60));
    }
    println!("  Top K: {}", config.top_k());
    println!();

    println!("📥 Ingest:");
    println!("  Media type: {}", config.media_type());
    println!(
        "  Chunk words: min {}, max {}, overlap {}",
        config.min_chunk_words(),
        config.max_chunk_words(),
        config.overlap_words()
    );
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.log_level());
    println!("  Backtrace: {}", config.backtrace_enabled());
}
