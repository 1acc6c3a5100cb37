//! API server lifecycle: bind, spawn, graceful shutdown.

use std::net::SocketAddr;

use tokio::sync::oneshot;

use crate::api::router::api_router;
use crate::api::types::AppState;

/// Handle to a running API server.
pub struct ApiServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    /// Shut down the server gracefully. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }
}

/// Bind the listener, mount the router and spawn the server in a
/// background task. Returns a handle carrying the bound address and the
/// shutdown channel.
pub async fn start(state: AppState, bind: SocketAddr) -> Result<ApiServer, std::io::Error> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "API server binding");

    let app = api_router(state);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }
        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::ledger::MemoryLedger;
    use crate::models::FacilityDirectory;
    use crate::ranking::HospitalRanker;
    use crate::reasoning::ReasoningReranker;
    use crate::scoring::{HeuristicOccupancyModel, HeuristicSuitabilityModel};
    use crate::shelter::{ShelterService, WeightedVulnerabilityModel};
    use crate::store::MemoryStore;
    use crate::surplus::SurplusPlanner;
    use crate::telemetry::SyntheticTelemetryProvider;

    fn test_state() -> AppState {
        let store = Arc::new(MemoryStore::new());
        let ranker = Arc::new(HospitalRanker::new(
            Arc::new(FacilityDirectory::load(None).unwrap()),
            Arc::new(SyntheticTelemetryProvider::with_seed(1)),
            Arc::new(HeuristicOccupancyModel),
            Arc::new(HeuristicSuitabilityModel),
            store.clone(),
            ReasoningReranker::new(None, Duration::from_secs(5)),
        ));
        let shelter = Arc::new(ShelterService::new(
            Arc::new(WeightedVulnerabilityModel),
            Arc::new(MemoryLedger::new()),
        ));
        let surplus = Arc::new(SurplusPlanner::new(None, store.clone(), Duration::from_secs(5)));
        AppState::new(ranker, shelter, surplus, store)
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let bind: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let mut server = start(test_state(), bind).await.expect("server should start");
        assert!(server.addr.port() > 0);

        let url = format!("http://{}/health", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        server.shutdown();
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let bind: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let mut server = start(test_state(), bind).await.expect("server should start");
        server.shutdown();
        server.shutdown();
    }
}
