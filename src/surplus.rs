//! Food-surplus distribution planning.
//!
//! A single-shot reasoning pass over the inventory, demand, logistics and
//! storage collections. The output is weakly structured prose split on a
//! `SUMMARY:` marker; impact metrics are computed heuristically from the
//! inventory items the plan mentions. When the backend is unavailable the
//! planner falls back to a deterministic perishability-to-urgency match
//! and tags the result as degraded.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::reasoning::ReasoningBackend;
use crate::store::{KvStore, StoreError};

pub const SURPLUS_INVENTORY: &str = "surplus_inventory";
pub const SURPLUS_DEMAND: &str = "surplus_demand";
pub const SURPLUS_LOGISTICS: &str = "surplus_logistics";
pub const SURPLUS_STORAGE: &str = "surplus_storage";

/// Emission factor for avoided food waste, kg CO2e per kg.
const EMISSIONS_PER_KG: f64 = 2.5;
/// Embedded water per kg of food, liters.
const WATER_LITERS_PER_KG: f64 = 1000.0;
/// Rough serving heuristic, kg of food per person reached.
const KG_PER_PERSON: f64 = 4.0;

#[derive(Debug, thiserror::Error)]
pub enum SurplusError {
    #[error("invalid plan request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// `POST /surplus/plan` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanRequest {
    /// Unstructured situation report to plan against.
    pub raw_report: String,
    /// "hunger_relief", "farmer_support", "environment" or "all".
    #[serde(default = "default_focus")]
    pub priority_focus: String,
}

fn default_focus() -> String {
    "all".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImpactMetrics {
    pub food_saved_kg: f64,
    pub people_served: u64,
    pub economic_value: f64,
    pub emissions_avoided_kg_co2e: f64,
    pub water_saved_liters: f64,
}

/// `POST /surplus/plan` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurplusPlan {
    pub allocation_plan: String,
    pub summary: String,
    pub estimated_impact: ImpactMetrics,
    /// True when the plan came from the deterministic fallback.
    pub degraded: bool,
    pub generated_at: String,
}

const PLAN_SYSTEM_MESSAGE: &str = "You are an expert supply chain logistics coordinator. \
Your goal is to minimize food waste and hunger by optimally matching food surplus to \
communities in need.";

pub struct SurplusPlanner {
    backend: Option<Arc<dyn ReasoningBackend>>,
    store: Arc<dyn KvStore>,
    timeout: Duration,
}

impl SurplusPlanner {
    pub fn new(
        backend: Option<Arc<dyn ReasoningBackend>>,
        store: Arc<dyn KvStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            backend,
            store,
            timeout,
        }
    }

    pub fn inventory(&self) -> Result<Vec<Value>, SurplusError> {
        Ok(self.store.list(SURPLUS_INVENTORY)?)
    }

    pub fn demand(&self) -> Result<Vec<Value>, SurplusError> {
        Ok(self.store.list(SURPLUS_DEMAND)?)
    }

    pub async fn plan(&self, request: PlanRequest) -> Result<SurplusPlan, SurplusError> {
        if request.raw_report.trim().is_empty() {
            return Err(SurplusError::InvalidRequest(
                "raw_report must not be empty".to_string(),
            ));
        }

        let inventory = self.store.list(SURPLUS_INVENTORY)?;
        let demand = self.store.list(SURPLUS_DEMAND)?;
        let logistics = self.store.list(SURPLUS_LOGISTICS)?;
        let storage = self.store.list(SURPLUS_STORAGE)?;

        let Some(backend) = &self.backend else {
            return Ok(fallback_plan(&inventory, &demand, "reasoning service not configured"));
        };

        let prompt = build_plan_prompt(&request, &inventory, &demand, &logistics, &storage);
        let raw = match tokio::time::timeout(
            self.timeout,
            backend.complete(PLAN_SYSTEM_MESSAGE, &prompt),
        )
        .await
        {
            Err(_elapsed) => {
                tracing::warn!(timeout_secs = self.timeout.as_secs(), "Surplus planning timed out");
                return Ok(fallback_plan(&inventory, &demand, "planning request timed out"));
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Surplus planning backend unavailable");
                return Ok(fallback_plan(&inventory, &demand, &e.to_string()));
            }
            Ok(Ok(text)) => text,
        };

        let (plan_text, summary) = split_on_summary(&raw);
        let impact = estimate_impact(&plan_text, &inventory);

        Ok(SurplusPlan {
            allocation_plan: plan_text,
            summary,
            estimated_impact: impact,
            degraded: false,
            generated_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}

fn build_plan_prompt(
    request: &PlanRequest,
    inventory: &[Value],
    demand: &[Value],
    logistics: &[Value],
    storage: &[Value],
) -> String {
    let pretty = |v: &[Value]| serde_json::to_string_pretty(v).unwrap_or_else(|_| "[]".to_string());
    format!(
        r#"Create an optimal food allocation plan based on this report:
{report}

Priority focus: {focus}

## SURPLUS INVENTORY
{inventory}

## DEMAND SIGNALS
{demand}

## AVAILABLE LOGISTICS
{logistics}

## STORAGE OPTIONS
{storage}

Consider these factors in strict priority order:
1. URGENCY: address critical hunger situations first
2. PERISHABILITY: highly perishable goods go immediately to the nearest need
3. PROXIMITY: minimize transport distance
4. ECONOMIC IMPACT: support struggling farmers without compromising hunger relief
5. ENVIRONMENTAL EFFICIENCY: minimize emissions and resource waste

Write the allocation plan as numbered steps naming the inventory items
being moved, then end with a section starting with "SUMMARY:" that gives a
short human-readable overview."#,
        report = request.raw_report,
        focus = request.priority_focus,
        inventory = pretty(inventory),
        demand = pretty(demand),
        logistics = pretty(logistics),
        storage = pretty(storage),
    )
}

/// Split the response on the first `SUMMARY:` marker (either casing).
fn split_on_summary(raw: &str) -> (String, String) {
    for marker in ["SUMMARY:", "Summary:"] {
        if let Some(pos) = raw.find(marker) {
            let plan = raw[..pos].trim().to_string();
            let summary = raw[pos..].trim().to_string();
            return (plan, summary);
        }
    }
    (
        raw.trim().to_string(),
        "Summary not explicitly provided, but a plan was generated.".to_string(),
    )
}

/// Sum impact over the inventory items the plan text actually mentions.
fn estimate_impact(plan_text: &str, inventory: &[Value]) -> ImpactMetrics {
    let mut impact = ImpactMetrics::default();
    for item in inventory {
        let Some(name) = item.get("item").and_then(Value::as_str) else {
            continue;
        };
        if !plan_text.to_lowercase().contains(&name.to_lowercase()) {
            continue;
        }
        let kg = item.get("quantity_kg").and_then(Value::as_f64).unwrap_or(0.0);
        let price = item.get("price_per_kg").and_then(Value::as_f64).unwrap_or(0.0);
        impact.food_saved_kg += kg;
        impact.economic_value += kg * price;
    }
    impact.people_served = (impact.food_saved_kg / KG_PER_PERSON).round() as u64;
    impact.emissions_avoided_kg_co2e = (impact.food_saved_kg * EMISSIONS_PER_KG * 100.0).round() / 100.0;
    impact.water_saved_liters = impact.food_saved_kg * WATER_LITERS_PER_KG;
    impact
}

fn perishability_rank(item: &Value) -> u8 {
    match item.get("perishability").and_then(Value::as_str) {
        Some("very_high") => 0,
        Some("high") => 1,
        Some("medium") => 2,
        Some("low") => 3,
        _ => 4,
    }
}

fn urgency_rank(demand: &Value) -> u8 {
    match demand.get("urgency").and_then(Value::as_str) {
        Some("high") => 0,
        Some("medium") => 1,
        Some("low") => 2,
        _ => 3,
    }
}

/// Deterministic degraded plan: most perishable surplus to the most urgent
/// demand, both in stable listing order within equal rank.
fn fallback_plan(inventory: &[Value], demand: &[Value], note: &str) -> SurplusPlan {
    let mut surplus: Vec<&Value> = inventory.iter().collect();
    surplus.sort_by_key(|i| perishability_rank(i));
    let mut needs: Vec<&Value> = demand.iter().collect();
    needs.sort_by_key(|d| urgency_rank(d));

    let mut lines = Vec::new();
    for (idx, item) in surplus.iter().enumerate() {
        let item_name = item.get("item").and_then(Value::as_str).unwrap_or("surplus lot");
        let from = item.get("location").and_then(Value::as_str).unwrap_or("unknown origin");
        let target = needs.get(idx % needs.len().max(1));
        let to = target
            .and_then(|d| d.get("location"))
            .and_then(Value::as_str)
            .unwrap_or("nearest community kitchen");
        lines.push(format!("{}. Move {item_name} from {from} to {to}.", idx + 1));
    }
    if lines.is_empty() {
        lines.push("1. No surplus inventory currently listed; no moves planned.".to_string());
    }
    let plan_text = lines.join("\n");
    let impact = estimate_impact(&plan_text, inventory);

    SurplusPlan {
        allocation_plan: plan_text,
        summary: format!(
            "SUMMARY: Deterministic fallback plan ({note}). Perishable surplus \
             matched to the most urgent demand in listing order."
        ),
        estimated_impact: impact,
        degraded: true,
        generated_at: chrono::Utc::now().to_rfc3339(),
    }
}

/// Seed demonstration inventory and demand collections so the planner has
/// data to work with before any management writes arrive.
pub fn seed_sample_data(store: &dyn KvStore) -> Result<(), StoreError> {
    let inventory = [
        serde_json::json!({"item": "Tomatoes", "location": "Farm Co. (Chennai)",
            "quantity_kg": 200.0, "perishability": "high", "price_per_kg": 15.0}),
        serde_json::json!({"item": "Potatoes", "location": "Warehouse A (Chennai)",
            "quantity_kg": 500.0, "perishability": "low", "price_per_kg": 20.0}),
        serde_json::json!({"item": "Fresh Fish", "location": "Fishery Port (Chennai)",
            "quantity_kg": 100.0, "perishability": "very_high", "price_per_kg": 120.0}),
    ];
    for (idx, doc) in inventory.iter().enumerate() {
        store.put(SURPLUS_INVENTORY, &format!("inv-{}", idx + 1), doc.clone())?;
    }

    let demand = [
        serde_json::json!({"location": "Downtown Kitchen (Chennai)", "needs": ["Fresh produce"],
            "urgency": "high", "capacity_kg": 300.0, "population_served": 200}),
        serde_json::json!({"location": "Northside Shelter (Chennai)", "needs": ["Any food"],
            "urgency": "medium", "capacity_kg": 500.0, "population_served": 150}),
    ];
    for (idx, doc) in demand.iter().enumerate() {
        store.put(SURPLUS_DEMAND, &format!("dem-{}", idx + 1), doc.clone())?;
    }

    store.put(
        SURPLUS_LOGISTICS,
        "veh-1",
        serde_json::json!({"vehicle_type": "Refrigerated Truck", "capacity_kg": 1000.0,
            "location": "Chennai Central", "status": "available"}),
    )?;
    store.put(
        SURPLUS_STORAGE,
        "sto-1",
        serde_json::json!({"location": "Cold Storage A (Chennai)", "capacity_kg": 2000.0,
            "available_kg": 800.0, "temperature": "2C"}),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reasoning::MockReasoningBackend;
    use crate::store::MemoryStore;

    fn boxed(backend: MockReasoningBackend) -> Arc<dyn ReasoningBackend> {
        Arc::new(backend)
    }

    /// Backend that never answers within any reasonable deadline.
    struct StalledBackend;

    #[async_trait::async_trait]
    impl ReasoningBackend for StalledBackend {
        async fn complete(
            &self,
            _system: &str,
            _prompt: &str,
        ) -> Result<String, crate::reasoning::ReasoningError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(String::new())
        }

        fn model(&self) -> &str {
            "stalled"
        }
    }

    fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        seed_sample_data(store.as_ref()).unwrap();
        store
    }

    fn planner(backend: Option<MockReasoningBackend>) -> SurplusPlanner {
        SurplusPlanner::new(backend.map(boxed), seeded_store(), Duration::from_secs(5))
    }

    fn request() -> PlanRequest {
        PlanRequest {
            raw_report: "Monsoon flooding has displaced families near the coast.".into(),
            priority_focus: "all".into(),
        }
    }

    #[tokio::test]
    async fn plan_splits_on_summary_marker() {
        let backend = MockReasoningBackend::with_response(
            "1. Move Tomatoes to Downtown Kitchen.\n2. Move Fresh Fish to Downtown Kitchen.\n\
             SUMMARY: Perishables go downtown first.",
        );
        let plan = planner(Some(backend)).plan(request()).await.unwrap();
        assert!(!plan.degraded);
        assert!(plan.allocation_plan.contains("Tomatoes"));
        assert!(!plan.allocation_plan.contains("SUMMARY:"));
        assert!(plan.summary.starts_with("SUMMARY:"));
    }

    #[tokio::test]
    async fn impact_counts_only_mentioned_items() {
        let backend = MockReasoningBackend::with_response(
            "1. Move Tomatoes to Downtown Kitchen.\nSUMMARY: done",
        );
        let plan = planner(Some(backend)).plan(request()).await.unwrap();
        // Tomatoes only: 200 kg at 15/kg.
        assert_eq!(plan.estimated_impact.food_saved_kg, 200.0);
        assert_eq!(plan.estimated_impact.economic_value, 3000.0);
        assert_eq!(plan.estimated_impact.emissions_avoided_kg_co2e, 500.0);
        assert_eq!(plan.estimated_impact.water_saved_liters, 200_000.0);
        assert_eq!(plan.estimated_impact.people_served, 50);
    }

    #[tokio::test]
    async fn missing_summary_gets_placeholder() {
        let backend = MockReasoningBackend::with_response("1. Move Potatoes north.");
        let plan = planner(Some(backend)).plan(request()).await.unwrap();
        assert!(plan.summary.contains("not explicitly provided"));
        assert_eq!(plan.allocation_plan, "1. Move Potatoes north.");
    }

    #[tokio::test]
    async fn unreachable_backend_yields_degraded_plan() {
        let plan = planner(Some(MockReasoningBackend::unreachable()))
            .plan(request())
            .await
            .unwrap();
        assert!(plan.degraded);
        // Most perishable first: fish, then tomatoes, then potatoes.
        let first = plan.allocation_plan.lines().next().unwrap();
        assert!(first.contains("Fresh Fish"));
        assert!(first.contains("Downtown Kitchen"));
        assert!(plan.summary.contains("fallback"));
    }

    #[tokio::test]
    async fn stalled_backend_hits_deadline_and_yields_degraded_plan() {
        let planner = SurplusPlanner::new(
            Some(Arc::new(StalledBackend)),
            seeded_store(),
            Duration::from_millis(20),
        );
        let plan = planner.plan(request()).await.unwrap();
        assert!(plan.degraded);
        assert!(plan.summary.contains("planning request timed out"));
        // Deadline fallback matches perishables to urgency like every other
        // degraded path.
        assert!(plan.allocation_plan.lines().next().unwrap().contains("Fresh Fish"));
    }

    #[tokio::test]
    async fn no_backend_yields_degraded_plan() {
        let plan = planner(None).plan(request()).await.unwrap();
        assert!(plan.degraded);
        assert!(plan.summary.contains("not configured"));
    }

    #[tokio::test]
    async fn empty_report_rejected() {
        let err = planner(None)
            .plan(PlanRequest {
                raw_report: "   ".into(),
                priority_focus: "all".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SurplusError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn fallback_with_empty_store_still_produces_plan() {
        let planner = SurplusPlanner::new(
            None,
            Arc::new(MemoryStore::new()),
            Duration::from_secs(5),
        );
        let plan = planner.plan(request()).await.unwrap();
        assert!(plan.degraded);
        assert!(plan.allocation_plan.contains("No surplus inventory"));
        assert_eq!(plan.estimated_impact.food_saved_kg, 0.0);
    }

    #[test]
    fn summary_split_accepts_lowercase_marker() {
        let (plan, summary) = split_on_summary("steps here\nSummary: short overview");
        assert_eq!(plan, "steps here");
        assert!(summary.starts_with("Summary:"));
    }
}
