use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use aidrelay::api::{self, AppState};
use aidrelay::config::{self, Config};
use aidrelay::ledger::MemoryLedger;
use aidrelay::models::FacilityDirectory;
use aidrelay::ranking::HospitalRanker;
use aidrelay::reasoning::{HttpReasoningClient, ReasoningBackend, ReasoningReranker};
use aidrelay::scoring::{HeuristicOccupancyModel, HeuristicSuitabilityModel};
use aidrelay::shelter::{ShelterService, WeightedVulnerabilityModel};
use aidrelay::store::MemoryStore;
use aidrelay::surplus::{self, SurplusPlanner};
use aidrelay::telemetry::SyntheticTelemetryProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = Config::from_env()?;

    let directory = Arc::new(FacilityDirectory::load(config.facility_data.as_deref())?);
    tracing::info!(facilities = directory.len(), "Facility reference data loaded");

    let telemetry = Arc::new(match config.telemetry_seed {
        Some(seed) => SyntheticTelemetryProvider::with_seed(seed),
        None => SyntheticTelemetryProvider::new(),
    });

    let backend: Option<Arc<dyn ReasoningBackend>> = match &config.reasoning_url {
        Some(url) => {
            let client =
                HttpReasoningClient::new(url, &config.reasoning_model, config.reasoning_timeout_secs)?;
            tracing::info!(url = %url, model = %config.reasoning_model, "Reasoning service configured");
            Some(Arc::new(client))
        }
        None => {
            tracing::warn!("No reasoning service configured; rankings will be model-only");
            None
        }
    };
    let timeout = Duration::from_secs(config.reasoning_timeout_secs);

    let store = Arc::new(MemoryStore::new());
    surplus::seed_sample_data(store.as_ref())?;

    let ranker = Arc::new(HospitalRanker::new(
        directory,
        telemetry,
        Arc::new(HeuristicOccupancyModel),
        Arc::new(HeuristicSuitabilityModel),
        store.clone(),
        ReasoningReranker::new(backend.clone(), timeout),
    ));
    let shelter = Arc::new(ShelterService::new(
        Arc::new(WeightedVulnerabilityModel),
        Arc::new(MemoryLedger::new()),
    ));
    let surplus = Arc::new(SurplusPlanner::new(backend, store.clone(), timeout));

    let state = AppState::new(ranker, shelter, surplus, store);
    let mut server = api::start(state, config.bind).await?;
    tracing::info!(addr = %server.addr, "Ready");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    server.shutdown();
    Ok(())
}
