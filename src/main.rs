use clap::Parser;
use fitrag::cli::handle_ask;
use fitrag::cli::handle_config;
use fitrag::cli::handle_ingest;
use fitrag::cli::handle_init;
use fitrag::cli::handle_search;
use fitrag::cli::Cli;
use fitrag::cli::Commands;
use fitrag::config::AppConfig;
use fitrag::Result;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    if cli.verbose {
        fitrag::logging::init_logging_with_level("debug")?;
    } else {
        fitrag::logging::init_logging_with_config(Some(&config))?;
    }
    info!("Configuration loaded successfully");

    // Execute the requested command
    match cli.command {
        Commands::Ask {
            question,
            name,
            profile,
            top_k,
            show_sources,
        } => {
            handle_ask(&config, question, name, profile, top_k, show_sources).await?;
        }
        Commands::Search { question, top_k } => {
            handle_search(&config, question, top_k).await?;
        }
        Commands::Ingest {
            folder,
            media_type,
            whole_file,
            namespace,
            resume_from,
            clean,
            dense_only,
        } => {
            handle_ingest(
                &config,
                folder,
                media_type,
                whole_file,
                namespace,
                resume_from,
                clean,
                dense_only,
            )
            .await?;
        }
        Commands::Init => {
            handle_init(&config).await?;
        }
        Commands::Config => {
            handle_config(&config);
        }
    }

    Ok(())
}
