//! Word2Vec Server - autocomplete and similarity queries over HTTP

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum_helpers::server::{bind_listener, create_production_app, create_router, health_router};
use clap::Parser;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_word2vec::{VocabularyIndexBuilder, Word2Vec, Word2VecService, handlers};
use eyre::WrapErr;
use tracing::info;

mod config;
mod lifecycle;
mod openapi;

use config::Config;
use lifecycle::PidFile;

#[derive(Parser)]
#[command(name = "w2v_server")]
#[command(about = "Serve autocomplete and similarity queries from a word2vec model")]
struct Cli {
    /// Path to the TOML config file
    config: PathBuf,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    init_tracing(&config.environment);

    let model = Word2Vec::load(&config.model_file, config.model_format)
        .wrap_err("Failed to load word2vec model")?;

    let index = match &config.vocabulary_file {
        Some(path) => VocabularyIndexBuilder::from_path(path)?,
        None => VocabularyIndexBuilder::build(model.words())?,
    };
    info!("Vocabulary index ready with {} terms", index.len());

    let service = Word2VecService::new(index, Arc::new(model));

    let pid_file = config
        .pid_file
        .as_deref()
        .map(PidFile::create)
        .transpose()
        .wrap_err("Failed to write PID file")?;

    let listener = bind_listener(&config.server).await?;

    if let Some(run_as) = config.run_as() {
        lifecycle::drop_privileges(&run_as)?;
    }

    let router = create_router::<openapi::ApiDoc>(handlers::router(service))?;
    let app = router.merge(health_router(config.app));

    info!("Starting word2vec server (30s shutdown timeout)");

    create_production_app(listener, app, Duration::from_secs(30), async move {
        if let Some(pid_file) = pid_file {
            pid_file.remove();
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Word2vec server shutdown complete");
    Ok(())
}
