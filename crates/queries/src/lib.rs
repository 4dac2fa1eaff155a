// crates/queries/src/lib.rs

use std::time::Duration;

use contavoz_core::{ContavozError, ContavozResult, Intent, QueryAction, QueryOutcome};
use parking_lot::RwLock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub mod backend_error;
pub mod handlers;
pub mod params;
pub mod phrase;

/// Friendly reply for an empty result set.
pub const NO_DATA_MESSAGE: &str = "Nenhum dado encontrado";
/// Generic reply for transport, status and decode failures.
pub const FETCH_ERROR_MESSAGE: &str = "Erro ao buscar dados";

/// Backend connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL all query paths are appended to. Must end with a slash.
    pub base_url: String,
    pub timeout_s: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/v1/".to_string(),
            timeout_s: 10,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct DispatchMetrics {
    pub executed: u64,
    pub answered: u64,
    pub failed: u64,
}

/// Maps each query action to its endpoint handler. The mapping is closed
/// over [`QueryAction`], so dispatch is total: an unknown action cannot be
/// represented, let alone reach this point.
pub struct QueryDispatcher {
    config: BackendConfig,
    client: Client,
    metrics: RwLock<DispatchMetrics>,
}

impl QueryDispatcher {
    pub fn new(config: BackendConfig) -> ContavozResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_s))
            .build()
            .map_err(|e| ContavozError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            client,
            metrics: RwLock::new(DispatchMetrics::default()),
        })
    }

    /// Run the handler for the intent's action and return its outcome
    /// unchanged. Exactly one backend GET is issued per invocation.
    pub async fn dispatch(&self, intent: &Intent) -> QueryOutcome {
        debug!(action = intent.action.wire_name(), "dispatching query");

        let outcome = match intent.action {
            QueryAction::BranchTotalOverTimespan => {
                handlers::branch_total_over_timespan(self, intent).await
            }
            QueryAction::TopBranchByType => handlers::top_branch_by_type(self, intent).await,
            QueryAction::DetailedTransactions => {
                handlers::detailed_transactions(self, intent).await
            }
            QueryAction::BranchComparison => handlers::branch_comparison(self, intent).await,
            QueryAction::OverallTotalByType => {
                handlers::overall_total_by_type(self, intent).await
            }
        };

        {
            let mut metrics = self.metrics.write();
            metrics.executed += 1;
            if outcome.error {
                metrics.failed += 1;
            } else {
                metrics.answered += 1;
            }
        }

        info!(
            action = intent.action.wire_name(),
            error = outcome.error,
            "query dispatched"
        );

        outcome
    }

    pub fn metrics(&self) -> DispatchMetrics {
        self.metrics.read().clone()
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }
}
