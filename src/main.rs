use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transcript_batch::batch::{BatchProcessor, TranscriptRequest};
use transcript_batch::cli::{Cli, Commands};
use transcript_batch::config::Config;
use transcript_batch::fetcher::YoutubeTranscriptFetcher;
use transcript_batch::{output, server};

fn init_tracing(verbose: bool, json_logs: bool) {
    let default_filter = if verbose {
        "transcript_batch=debug,tower_http=debug"
    } else {
        "transcript_batch=info,tower_http=info"
    };

    // Logs go to stderr so `fetch` output stays clean on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    let config = Config::load().await?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let fetcher = YoutubeTranscriptFetcher::new(&config.youtube)?;
            let processor = Arc::new(BatchProcessor::new(Arc::new(fetcher)));
            let static_dir = cli.static_dir.unwrap_or(config.server.static_dir);

            tracing::info!("Serving static files from {}", static_dir.display());
            let router = server::create_router(processor, &static_dir);
            server::serve(router, cli.port).await?;
        }
        Commands::Fetch { urls, output, format } => {
            let fetcher = YoutubeTranscriptFetcher::new(&config.youtube)?;
            let processor = BatchProcessor::new(Arc::new(fetcher));

            let response = processor
                .process_request(TranscriptRequest::from_urls(urls))
                .await;

            match output {
                Some(path) => {
                    output::save_to_file(&response, &path, &format).await?;
                    println!("Results saved to: {}", path.display());
                }
                None => {
                    output::print_to_console(&response, &format)?;
                }
            }
        }
        Commands::Config { show, init } => {
            if init {
                let path = Config::default().save().await?;
                println!("Default configuration written to: {}", path.display());
            } else if show {
                config.display();
            } else {
                println!("Configuration is read from:");
                println!("  {}", Config::config_path()?.display());
                println!("Run with --init to write the defaults there, or --show to print them.");
            }
        }
    }

    Ok(())
}
