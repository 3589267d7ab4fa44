// en2ja - English/Japanese translation with a local translation memory
// Author: kelexine (https://github.com/kelexine)

use anyhow::{Context, Result};
use clap::Parser;
use en2ja::backend::GoogleTranslateClient;
use en2ja::cli::{Args, Command};
use en2ja::config::AppConfig;
use en2ja::error::TranslateError;
use en2ja::memory::{TranslationMemory, TranslationResult};
use en2ja::models::Language;
use en2ja::server::create_router;
use en2ja::translator::Translator;
use en2ja::utils::logging;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{debug, info, warn};

type CliTranslator = Translator<Option<GoogleTranslateClient>>;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let config = AppConfig::load_from(args.config.as_deref())?;

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    debug!("Starting en2ja v{}", env!("CARGO_PKG_VERSION"));

    if args.command == Command::Config {
        let rendered = toml::to_string_pretty(&config.redacted())
            .context("Failed to render configuration")?;
        print!("{}", rendered);
        return Ok(());
    }

    // Phase 3: Load the translation memory
    let memory = Arc::new(TranslationMemory::from_config(&config.memory));

    // Phase 4: Build the backend; without an API key only memory hits work
    let backend = build_backend(&config)?;
    let translator = Arc::new(Translator::from_config(backend, memory, &config.translation));

    match args.command {
        Command::Translate { from, to, texts } => {
            let source = language_or(from.as_deref(), config.translation.default_source_language)?;
            let target = language_or(to.as_deref(), config.translation.default_target_language)?;
            run_translate(&translator, &texts, source, target).await?;
        }
        Command::Auto { to, text } => {
            let target: Language = to.parse()?;
            let result = translator.auto_translate(&text, target).await?;
            print_result(&result);
        }
        Command::Stats => {
            let stats = translator.memory().stats();
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Clear => {
            translator.memory().clear();
            println!("Translation memory cleared");
        }
        Command::Evict => {
            let removed = translator.memory().evict_expired();
            println!("Removed {} expired translations", removed);
        }
        Command::Serve => serve(config, translator).await?,
        Command::Config => {}
    }

    Ok(())
}

fn build_backend(config: &AppConfig) -> Result<Option<GoogleTranslateClient>> {
    match GoogleTranslateClient::new(&config.translation) {
        Ok(client) => Ok(Some(client)),
        Err(TranslateError::NotConfigured(reason)) => {
            warn!("Translation backend unavailable: {}", reason);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn language_or(code: Option<&str>, default: Language) -> Result<Language> {
    match code {
        Some(code) => Ok(code.parse()?),
        None => Ok(default),
    }
}

async fn run_translate(
    translator: &CliTranslator,
    texts: &[String],
    source: Language,
    target: Language,
) -> Result<()> {
    if let [text] = texts {
        let result = translator.translate(text, source, target).await?;
        print_result(&result);
    } else {
        let results = translator.batch_translate(texts, source, target).await?;
        for result in &results {
            print_result(result);
        }
    }
    Ok(())
}

fn print_result(result: &TranslationResult) {
    if result.from_cache {
        info!("Served from translation memory (confidence {:.2})", result.confidence);
    }
    println!("{}", result.translated_text);
}

async fn serve(config: AppConfig, translator: Arc<CliTranslator>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = create_router(config, translator)?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
