// crates/queries/src/handlers.rs

use contavoz_core::{Intent, QueryOutcome, TransactionKind};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

use crate::backend_error::{self, ErrorBody};
use crate::params::QueryParams;
use crate::phrase::{format_currency, month_name};
use crate::{QueryDispatcher, FETCH_ERROR_MESSAGE, NO_DATA_MESSAGE};

/// Fixed backend paths, one per query action.
pub mod paths {
    pub const BRANCH: &str = "transactions/branch";
    pub const BRANCH_TOP: &str = "transactions/branch/top";
    pub const DETAILED: &str = "transactions/detailed";
    pub const COMPARISON: &str = "transactions/comparison";
    pub const PERIOD: &str = "transactions/period";
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchTimespanTotal {
    pub transaction_type: String,
    pub start_date: String,
    pub end_date: String,
    pub branch: String,
    pub total: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopBranch {
    pub branch: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedTransaction {
    pub transaction_type: String,
    pub date: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchAmount {
    pub branch: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchComparison {
    pub top_branches: Vec<BranchAmount>,
    pub difference: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotal {
    pub transaction_type: String,
    pub start_date: String,
    pub end_date: String,
    pub total: f64,
}

/// Total of one transaction type for one branch over a timespan.
pub(crate) async fn branch_total_over_timespan(
    dispatcher: &QueryDispatcher,
    intent: &Intent,
) -> QueryOutcome {
    let params = QueryParams::from_intent(intent, None);
    let data: BranchTimespanTotal =
        match fetch_json(dispatcher, paths::BRANCH, &params, intent.kind).await {
            Ok(data) => data,
            Err(outcome) => return outcome,
        };

    QueryOutcome::answer(format!(
        "{} de {} a {} da {} é {}",
        data.transaction_type,
        month_name(&data.start_date).unwrap_or(data.start_date.as_str()),
        month_name(&data.end_date).unwrap_or(data.end_date.as_str()),
        data.branch,
        format_currency(data.total, intent.kind),
    ))
}

/// Branch with the highest total for one transaction type.
pub(crate) async fn top_branch_by_type(
    dispatcher: &QueryDispatcher,
    intent: &Intent,
) -> QueryOutcome {
    let params = QueryParams::new().kind(intent.kind);
    let data: TopBranch = match fetch_json(dispatcher, paths::BRANCH_TOP, &params, intent.kind)
        .await
    {
        Ok(data) => data,
        Err(outcome) => return outcome,
    };

    QueryOutcome::answer(format!(
        "A filial com maior movimentação de {} é a {} com {}",
        kind_label(intent.kind),
        data.branch,
        format_currency(data.amount, intent.kind),
    ))
}

/// Line-by-line listing of a branch's transactions over a period.
pub(crate) async fn detailed_transactions(
    dispatcher: &QueryDispatcher,
    intent: &Intent,
) -> QueryOutcome {
    let params = QueryParams::new()
        .branch(intent.branch.as_deref())
        .period(&intent.period);
    let data: Vec<DetailedTransaction> =
        match fetch_json(dispatcher, paths::DETAILED, &params, intent.kind).await {
            Ok(data) => data,
            Err(outcome) => return outcome,
        };

    if data.is_empty() {
        return QueryOutcome::failure(NO_DATA_MESSAGE);
    }

    let lines = data
        .iter()
        .map(|record| {
            format!(
                "{} em {} no valor de {}",
                record.transaction_type,
                month_name(&record.date).unwrap_or(record.date.as_str()),
                format_currency(record.amount, None),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    QueryOutcome::answer(format!(
        "As transações detalhadas da {} são:\n{}",
        intent.branch.as_deref().unwrap_or("filial"),
        lines,
    ))
}

/// Per-branch totals for one transaction type, with the difference between
/// branches. A single active branch gets its own phrasing without a
/// difference clause.
pub(crate) async fn branch_comparison(
    dispatcher: &QueryDispatcher,
    intent: &Intent,
) -> QueryOutcome {
    let params = QueryParams::new().kind(intent.kind).period(&intent.period);
    let data: BranchComparison =
        match fetch_json(dispatcher, paths::COMPARISON, &params, intent.kind).await {
            Ok(data) => data,
            Err(outcome) => return outcome,
        };

    match data.top_branches.as_slice() {
        [] => QueryOutcome::failure(NO_DATA_MESSAGE),
        [only] => QueryOutcome::answer(format!(
            "Apenas a {} teve movimentação de {} nesse período, com {}",
            only.branch,
            kind_plural(intent.kind),
            format_currency(only.amount, intent.kind),
        )),
        branches => {
            let totals = branches
                .iter()
                .map(|entry| {
                    format!(
                        "{} teve {}",
                        entry.branch,
                        format_currency(entry.amount, intent.kind)
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");

            QueryOutcome::answer(format!(
                "{} e a diferença entre as filiais é de {}",
                totals,
                format_currency(data.difference, None),
            ))
        }
    }
}

/// Overall total of one transaction type across all branches.
pub(crate) async fn overall_total_by_type(
    dispatcher: &QueryDispatcher,
    intent: &Intent,
) -> QueryOutcome {
    let params = QueryParams::new().kind(intent.kind).period(&intent.period);
    let data: PeriodTotal = match fetch_json(dispatcher, paths::PERIOD, &params, intent.kind).await
    {
        Ok(data) => data,
        Err(outcome) => return outcome,
    };

    QueryOutcome::answer(format!(
        "{} de {} a {} é {}",
        data.transaction_type,
        month_name(&data.start_date).unwrap_or(data.start_date.as_str()),
        month_name(&data.end_date).unwrap_or(data.end_date.as_str()),
        format_currency(data.total, intent.kind),
    ))
}

fn kind_label(kind: Option<TransactionKind>) -> &'static str {
    kind.map(|k| k.label()).unwrap_or("transações")
}

fn kind_plural(kind: Option<TransactionKind>) -> &'static str {
    kind.map(|k| k.plural()).unwrap_or("transações")
}

/// Shared request contract: one GET per invocation; 204 means no data,
/// other non-2xx statuses carry an optional machine-readable error code,
/// transport and decode failures degrade to the generic message.
async fn fetch_json<T: DeserializeOwned>(
    dispatcher: &QueryDispatcher,
    path: &str,
    params: &QueryParams,
    kind: Option<TransactionKind>,
) -> Result<T, QueryOutcome> {
    let url = dispatcher.endpoint(path);

    let response = match dispatcher
        .client()
        .get(&url)
        .query(params.pairs())
        .send()
        .await
    {
        Ok(response) => response,
        Err(err) => {
            warn!(%err, path, "backend request failed");
            return Err(QueryOutcome::failure(FETCH_ERROR_MESSAGE));
        }
    };

    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return Err(QueryOutcome::failure(NO_DATA_MESSAGE));
    }
    if !status.is_success() {
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => backend_error::resolve(&body.error, kind),
            Err(_) => FETCH_ERROR_MESSAGE.to_string(),
        };
        warn!(%status, path, "backend rejected query");
        return Err(QueryOutcome::failure(message));
    }

    match response.json::<T>().await {
        Ok(data) => Ok(data),
        Err(err) => {
            warn!(%err, path, "failed to decode backend response");
            Err(QueryOutcome::failure(FETCH_ERROR_MESSAGE))
        }
    }
}
