use anyhow::Result;
use clap::{Parser, Subcommand};
use noter_common::{logger, AppConfig, Storage};
use noter_database::NoteDatabase;
use noter_embedder::embedder_from_config;
use noter_searcher::searcher_from_storage;
use noter_summarizer::{summarizer_from_config, BatchSummarizer};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "noter")]
#[command(about = "Semantic note indexing, search and summarization", long_about = None)]
struct Cli {
    /// Notes root directory (overrides NOTER_NOTES_DIR)
    #[arg(long, global = true)]
    notes_dir: Option<PathBuf>,

    /// Cache directory (overrides NOTER_CACHE_DIR)
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build or update the vector index
    Index,

    /// Find notes similar to a file
    Similar {
        /// Query file
        file: PathBuf,

        /// Number of similar notes to retrieve
        #[arg(long, default_value_t = 5)]
        n: usize,
    },

    /// Full-text search across all notes
    Search {
        /// Query text or pattern
        query: String,

        /// Treat the query as a regex
        #[arg(long)]
        regex: bool,
    },

    /// Summarize a note file
    Summarize {
        /// File to summarize
        file: PathBuf,
    },

    /// Summarize every note, warming the summary cache
    SummarizeAll {
        /// Fan out over a worker pool
        #[arg(long)]
        parallel: bool,
    },

    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // AppConfig::from_env loads .env; CLI flags override afterwards
    let mut config = AppConfig::from_env()?;
    if let Some(dir) = cli.notes_dir {
        config.notes_dir = Some(dir);
    }
    if let Some(dir) = cli.cache_dir {
        config.cache_dir = Some(dir);
    }

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server_host = host;
            }
            if let Some(port) = port {
                config.server_port = port;
            }

            logger::setup_logging(&config.log_dir, &config.log_level)?;
            tracing::info!("Noter starting...");
            tracing::info!("  Bind: {}", config.server_bind_address());

            println!("Server listening on http://{}", config.server_bind_address());
            noter_server::start_server(config)?;
        }
        command => {
            logger::setup_console_logging(&config.log_level)?;
            run_command(command, &config)?;
        }
    }

    Ok(())
}

fn run_command(command: Commands, config: &AppConfig) -> Result<()> {
    let storage = Storage::from_config(config)?;

    match command {
        Commands::Index => {
            let embedder = embedder_from_config(config)?;
            let mut database = NoteDatabase::new(storage, embedder)?;
            database.build_or_update_index()?;
            println!("Indexed {} notes", database.document_count());
        }
        Commands::Similar { file, n } => {
            let embedder = embedder_from_config(config)?;
            let mut database = NoteDatabase::new(storage, embedder)?;
            if database.document_count() == 0 {
                println!("Index is empty; run `noter index` first");
                return Ok(());
            }

            let results = database.find_similar_to_file(&file, n)?;
            if results.is_empty() {
                println!("No similar notes found");
            }
            for (path, similarity) in results {
                println!("{:.3}  {}", similarity, path);
            }
        }
        Commands::Search { query, regex } => {
            let searcher = searcher_from_storage(&storage);
            let results = if regex {
                searcher.regex_search(&query)?
            } else {
                searcher.text_search(&query)?
            };
            for path in results {
                println!("{}", path);
            }
        }
        Commands::Summarize { file } => {
            let summarizer = summarizer_from_config(config, &storage)?;
            let summary = summarizer.summarize_file(&file, None)?;
            println!("{}", summary);
        }
        Commands::SummarizeAll { parallel } => {
            let summarizer = summarizer_from_config(config, &storage)?;
            let batch = BatchSummarizer::new(&summarizer, &storage);
            if parallel {
                batch.parallel_summarize_all_notes()?;
            } else {
                batch.summarize_all_notes()?;
            }
        }
        Commands::Serve { .. } => unreachable!("handled in main"),
    }

    Ok(())
}
