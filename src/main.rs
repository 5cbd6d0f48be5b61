use anyhow::Context;
use std::future::IntoFuture;
use std::sync::Arc;
use supportbot::{
    AppState, EmbeddingProvider, GeminiClient, GeminiEmbedder, GeminiTransport, KnowledgeDocument,
    LLMClient, QueryService, SupportBotConfig,
    api::routes::build_app,
    cli::{Cli, Commands, check::run_check, output::Output},
    utils::toml_config::LogFormat,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine; the environment may already carry the key
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    let loaded = if cli.uses_default_config() {
        SupportBotConfig::load_or_default(&cli.config)
    } else {
        SupportBotConfig::load(&cli.config)
    };
    let config = loaded.inspect_err(|e| output.error(&e.to_string())).with_context(|| {
        format!("failed to load configuration from {}", cli.config.display())
    })?;

    match cli.command.clone().unwrap_or(Commands::Serve) {
        Commands::Check => {
            let report = run_check(&config)
                .await
                .inspect_err(|e| output.error(&e.to_string()))?;
            report.print(&output);
            Ok(())
        }
        Commands::Serve => serve(&cli, config, &output).await,
    }
}

fn init_tracing(config: &SupportBotConfig, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.server.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.server.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn serve(cli: &Cli, config: SupportBotConfig, output: &Output) -> anyhow::Result<()> {
    init_tracing(&config, cli.verbose);
    output.banner();

    // Both checks run before binding so a broken setup never accepts traffic
    config
        .validate()
        .inspect_err(|e| output.error(&e.to_string()))
        .context("invalid configuration")?;
    let document = KnowledgeDocument::load(&config.knowledge.path)
        .await
        .inspect_err(|e| output.error(&e.to_string()))
        .context("failed to load knowledge base")?;

    let transport = GeminiTransport::from_config(&config)?;
    let embedder = Arc::new(GeminiEmbedder::from_config(transport.clone(), &config));
    let generator = Arc::new(GeminiClient::from_config(transport, &config));
    tracing::info!(
        embedding_model = embedder.model_name(),
        generation_model = generator.model_name(),
        "Model provider configured"
    );

    let query_service = Arc::new(QueryService::from_config(&config, embedder, generator)?);
    let config = Arc::new(config);
    let app = build_app(AppState::new(config.clone(), query_service.clone()));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server listening");
    output.success(&format!("Listening on http://{}", addr));
    output.info("Building knowledge index; queries return 503 until it is ready");

    let ingest = tokio::spawn(async move { query_service.build_index(&document).await });

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();
    let mut server = std::pin::pin!(server);

    tokio::select! {
        result = &mut server => {
            result.context("server error")?;
            return Ok(());
        }
        joined = ingest => match joined {
            Ok(Ok(summary)) => output.success(&format!(
                "Knowledge index ready: {} chunks in {} ms",
                summary.chunks,
                summary.elapsed.as_millis()
            )),
            Ok(Err(e)) => {
                output.error(&format!("Knowledge ingestion failed: {}", e));
                return Err(anyhow::Error::new(e).context("knowledge ingestion failed"));
            }
            Err(e) => return Err(anyhow::anyhow!("ingestion task panicked: {}", e)),
        },
    }

    server.await.context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
