//! WordWeave game server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use wordweave::config::Config;
use wordweave::coordinator::SessionCoordinator;
use wordweave::gateway::{AppState, create_router_with_state};
use wordweave::learning::{AssociationStore, SnapshotWriter};
use wordweave::scoring::RankingEngine;
use wordweave::vectors::EmbeddingIndex;
use wordweave::vocabulary::Vocabulary;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
__        __            _ _        __
\ \      / /__  _ __ __| | |  __ _\ \    __ ___   _____
 \ \ /\ / / _ \| '__/ _` | | /  _ \ \ /\ / / _ \ \ / / _ \
  \ V  V / (_) | | | (_| | |/  __/\ V  V /  __/\ V /  __/
   \_/\_/ \___/|_|  \__,_|_|\___|  \_/\_/ \___| \_/ \___|

        GUESS. RANK. LEARN.
                                        AGPL-3.0
"#
    );

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        data_dir = %config.data_dir.display(),
        "WordWeave starting"
    );

    std::fs::create_dir_all(&config.data_dir)?;

    let vocabulary_path = config.vocabulary_path();
    let vocabulary = Arc::new(Vocabulary::load(&vocabulary_path)?);

    let index = EmbeddingIndex::load_or_unavailable(
        config.vector_model_path.as_deref(),
        &vocabulary,
        config.vector_index_config(),
    );

    let learning_path = config.learning_path();
    let (writer, writer_handle) = SnapshotWriter::spawn(learning_path.clone());
    let associations = Arc::new(
        AssociationStore::load(&learning_path, config.learning_config())?.with_writer(writer),
    );

    let engine = Arc::new(RankingEngine::new(
        Arc::clone(&vocabulary),
        Arc::new(index),
        Arc::clone(&associations),
        config.ranking_config(),
    )?);

    let coordinator = Arc::new(SessionCoordinator::new(
        engine,
        config.coordinator_config(),
    ));
    let reaper = coordinator.start_reaper();

    let app = create_router_with_state(AppState::new(Arc::clone(&coordinator)));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    coordinator.shutdown();
    reaper.abort();

    tracing::info!("Saving learning data...");
    if let Err(e) = associations.flush().await {
        tracing::error!("Failed to save learning data: {}", e);
    }
    drop(coordinator);
    drop(associations);
    if tokio::time::timeout(Duration::from_secs(5), writer_handle)
        .await
        .is_err()
    {
        tracing::warn!("Snapshot writer did not stop in time");
    }

    tracing::info!("Saving vocabulary counters...");
    if let Err(e) = vocabulary.save(&vocabulary_path) {
        tracing::error!("Failed to save vocabulary: {}", e);
    }

    tracing::info!("WordWeave shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("WORDWEAVE_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8000);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("failed to build client");

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
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
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
