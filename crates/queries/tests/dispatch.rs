// crates/queries/tests/dispatch.rs
//
// Drives the dispatcher against a local mock backend and checks that each
// action issues exactly one GET to its fixed path, and that responses are
// phrased the way the assistant speaks them.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::{get, MethodRouter};
use axum::{Json, Router};
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use contavoz_core::{Intent, Period, QueryAction, TransactionKind};
use contavoz_queries::{BackendConfig, QueryDispatcher, FETCH_ERROR_MESSAGE, NO_DATA_MESSAGE};

#[derive(Clone, Default)]
struct Recorder {
    hits: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    fn record(&self, uri: &Uri) {
        let entry = match uri.query() {
            Some(query) => format!("{}?{}", uri.path(), query),
            None => uri.path().to_string(),
        };
        self.hits.lock().push(entry);
    }

    fn hits(&self) -> Vec<String> {
        self.hits.lock().clone()
    }
}

fn canned(recorder: Recorder, status: StatusCode, body: Option<Value>) -> MethodRouter {
    get(move |uri: Uri| {
        let recorder = recorder.clone();
        let body = body.clone();
        async move {
            recorder.record(&uri);
            match body {
                Some(value) => (status, Json(value)).into_response(),
                None => status.into_response(),
            }
        }
    })
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock backend");
    let addr = listener.local_addr().expect("mock backend address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock backend serves");
    });
    addr
}

fn dispatcher_for(addr: SocketAddr) -> QueryDispatcher {
    QueryDispatcher::new(BackendConfig {
        base_url: format!("http://{addr}/v1/"),
        timeout_s: 2,
    })
    .expect("dispatcher builds")
}

fn intent(action: QueryAction) -> Intent {
    Intent {
        action,
        kind: Some(TransactionKind::Entrada),
        branch: Some("Matriz".to_string()),
        period: Period {
            start: NaiveDate::from_ymd_opt(2025, 1, 1),
            end: NaiveDate::from_ymd_opt(2025, 3, 31),
        },
    }
}

#[tokio::test]
async fn every_action_hits_its_fixed_path_exactly_once() {
    let cases = [
        (QueryAction::BranchTotalOverTimespan, "/v1/transactions/branch"),
        (QueryAction::TopBranchByType, "/v1/transactions/branch/top"),
        (QueryAction::DetailedTransactions, "/v1/transactions/detailed"),
        (QueryAction::BranchComparison, "/v1/transactions/comparison"),
        (QueryAction::OverallTotalByType, "/v1/transactions/period"),
    ];

    for (action, path) in cases {
        let recorder = Recorder::default();
        let router = Router::new()
            .route(
                "/v1/transactions/branch",
                canned(recorder.clone(), StatusCode::NO_CONTENT, None),
            )
            .route(
                "/v1/transactions/branch/top",
                canned(recorder.clone(), StatusCode::NO_CONTENT, None),
            )
            .route(
                "/v1/transactions/detailed",
                canned(recorder.clone(), StatusCode::NO_CONTENT, None),
            )
            .route(
                "/v1/transactions/comparison",
                canned(recorder.clone(), StatusCode::NO_CONTENT, None),
            )
            .route(
                "/v1/transactions/period",
                canned(recorder.clone(), StatusCode::NO_CONTENT, None),
            );
        let addr = serve(router).await;

        let dispatcher = dispatcher_for(addr);
        let outcome = dispatcher.dispatch(&intent(action)).await;

        let metrics = dispatcher.metrics();
        assert_eq!(metrics.executed, 1);
        assert_eq!(metrics.failed, 1);

        let hits = recorder.hits();
        assert_eq!(hits.len(), 1, "{action:?} must issue exactly one request");
        let hit_path = hits[0].split('?').next().unwrap_or_default();
        assert_eq!(hit_path, path, "{action:?} hit the wrong path");
        assert!(outcome.error);
        assert_eq!(outcome.message, NO_DATA_MESSAGE);
    }
}

#[tokio::test]
async fn branch_total_phrases_period_branch_and_amount() {
    let recorder = Recorder::default();
    let router = Router::new().route(
        "/v1/transactions/branch",
        canned(
            recorder.clone(),
            StatusCode::OK,
            Some(json!({
                "transactionType": "Entrada",
                "startDate": "2025-01-01",
                "endDate": "2025-03-31",
                "branch": "Matriz",
                "total": 1500.5,
            })),
        ),
    );
    let addr = serve(router).await;

    let outcome = dispatcher_for(addr)
        .dispatch(&intent(QueryAction::BranchTotalOverTimespan))
        .await;

    assert!(!outcome.error);
    assert_eq!(
        outcome.message,
        "Entrada de janeiro a março da Matriz é 1500 reais e 50 centavos de entradas"
    );

    let hits = recorder.hits();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].contains("type=ENTRADA"));
    assert!(hits[0].contains("startDate=2025-01-01"));
    assert!(hits[0].contains("endDate=2025-03-31"));
    assert!(!hits[0].contains("null"));
}

#[tokio::test]
async fn top_branch_queries_only_the_type() {
    let recorder = Recorder::default();
    let router = Router::new().route(
        "/v1/transactions/branch/top",
        canned(
            recorder.clone(),
            StatusCode::OK,
            Some(json!({"branch": "Matriz", "amount": 250.0})),
        ),
    );
    let addr = serve(router).await;

    let outcome = dispatcher_for(addr)
        .dispatch(&intent(QueryAction::TopBranchByType))
        .await;

    assert!(!outcome.error);
    assert_eq!(
        outcome.message,
        "A filial com maior movimentação de entrada é a Matriz com 250 reais de entradas"
    );
    assert_eq!(recorder.hits(), ["/v1/transactions/branch/top?type=ENTRADA"]);
}

#[tokio::test]
async fn detailed_transactions_render_one_line_per_record() {
    let recorder = Recorder::default();
    let router = Router::new().route(
        "/v1/transactions/detailed",
        canned(
            recorder.clone(),
            StatusCode::OK,
            Some(json!([
                {"transactionType": "Entrada", "date": "2025-01-15", "amount": 100.0},
                {"transactionType": "Despesa", "date": "2025-02-20", "amount": 40.25},
            ])),
        ),
    );
    let addr = serve(router).await;

    let mut detailed = intent(QueryAction::DetailedTransactions);
    detailed.kind = None;
    let outcome = dispatcher_for(addr).dispatch(&detailed).await;

    assert!(!outcome.error);
    let lines: Vec<&str> = outcome.message.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "As transações detalhadas da Matriz são:");
    assert_eq!(lines[1], "Entrada em janeiro no valor de 100 reais");
    assert_eq!(lines[2], "Despesa em fevereiro no valor de 40 reais e 25 centavos");

    // No type constraint for this endpoint.
    let hits = recorder.hits();
    assert!(!hits[0].contains("type="));
}

#[tokio::test]
async fn comparison_with_one_branch_skips_the_difference_clause() {
    let router = Router::new().route(
        "/v1/transactions/comparison",
        canned(
            Recorder::default(),
            StatusCode::OK,
            Some(json!({
                "topBranches": [{"branch": "Matriz", "amount": 100.0}],
                "difference": 0.0,
            })),
        ),
    );
    let addr = serve(router).await;

    let outcome = dispatcher_for(addr)
        .dispatch(&intent(QueryAction::BranchComparison))
        .await;

    assert!(!outcome.error);
    assert_eq!(
        outcome.message,
        "Apenas a Matriz teve movimentação de entradas nesse período, com 100 reais de entradas"
    );
    assert!(!outcome.message.contains("diferença"));
}

#[tokio::test]
async fn comparison_with_two_branches_appends_the_difference() {
    let router = Router::new().route(
        "/v1/transactions/comparison",
        canned(
            Recorder::default(),
            StatusCode::OK,
            Some(json!({
                "topBranches": [
                    {"branch": "Matriz", "amount": 300.0},
                    {"branch": "Filial Rio de Janeiro", "amount": 250.0},
                ],
                "difference": 50.0,
            })),
        ),
    );
    let addr = serve(router).await;

    let outcome = dispatcher_for(addr)
        .dispatch(&intent(QueryAction::BranchComparison))
        .await;

    assert!(!outcome.error);
    assert_eq!(
        outcome.message,
        "Matriz teve 300 reais de entradas, Filial Rio de Janeiro teve 250 reais de entradas \
         e a diferença entre as filiais é de 50 reais"
    );
}

#[tokio::test]
async fn overall_total_phrases_type_and_period() {
    let router = Router::new().route(
        "/v1/transactions/period",
        canned(
            Recorder::default(),
            StatusCode::OK,
            Some(json!({
                "transactionType": "Lucro",
                "startDate": "2025-05-01",
                "endDate": "2025-05-31",
                "total": 980.0,
            })),
        ),
    );
    let addr = serve(router).await;

    let mut total = intent(QueryAction::OverallTotalByType);
    total.kind = Some(TransactionKind::Lucro);
    let outcome = dispatcher_for(addr).dispatch(&total).await;

    assert!(!outcome.error);
    assert_eq!(outcome.message, "Lucro de maio a maio é 980 reais de lucros");
}

#[tokio::test]
async fn recognized_error_code_maps_to_its_localized_message() {
    let router = Router::new().route(
        "/v1/transactions/period",
        canned(
            Recorder::default(),
            StatusCode::BAD_REQUEST,
            Some(json!({"error": "INVALID_PERIOD"})),
        ),
    );
    let addr = serve(router).await;

    let outcome = dispatcher_for(addr)
        .dispatch(&intent(QueryAction::OverallTotalByType))
        .await;

    assert!(outcome.error);
    assert_eq!(outcome.message, "O Período informado é inválido");
}

#[tokio::test]
async fn unrecognized_error_code_falls_back_to_generic_message() {
    let router = Router::new().route(
        "/v1/transactions/period",
        canned(
            Recorder::default(),
            StatusCode::BAD_REQUEST,
            Some(json!({"error": "SOMETHING_NEW"})),
        ),
    );
    let addr = serve(router).await;

    let outcome = dispatcher_for(addr)
        .dispatch(&intent(QueryAction::OverallTotalByType))
        .await;

    assert!(outcome.error);
    assert_eq!(outcome.message, FETCH_ERROR_MESSAGE);
}

#[tokio::test]
async fn error_status_without_a_code_degrades_gracefully() {
    let router = Router::new().route(
        "/v1/transactions/branch",
        canned(Recorder::default(), StatusCode::INTERNAL_SERVER_ERROR, None),
    );
    let addr = serve(router).await;

    let outcome = dispatcher_for(addr)
        .dispatch(&intent(QueryAction::BranchTotalOverTimespan))
        .await;

    assert!(outcome.error);
    assert_eq!(outcome.message, FETCH_ERROR_MESSAGE);
}

#[tokio::test]
async fn unreachable_backend_degrades_gracefully() {
    // Nothing listens on this address.
    let outcome = dispatcher_for("127.0.0.1:1".parse().expect("addr"))
        .dispatch(&intent(QueryAction::TopBranchByType))
        .await;

    assert!(outcome.error);
    assert_eq!(outcome.message, FETCH_ERROR_MESSAGE);
}

#[tokio::test]
async fn absent_intent_fields_never_reach_the_wire() {
    let recorder = Recorder::default();
    let router = Router::new().route(
        "/v1/transactions/branch",
        canned(recorder.clone(), StatusCode::NO_CONTENT, None),
    );
    let addr = serve(router).await;

    let sparse = Intent {
        action: QueryAction::BranchTotalOverTimespan,
        kind: None,
        branch: None,
        period: Period {
            start: NaiveDate::from_ymd_opt(2025, 1, 1),
            end: None,
        },
    };
    dispatcher_for(addr).dispatch(&sparse).await;

    assert_eq!(
        recorder.hits(),
        ["/v1/transactions/branch?startDate=2025-01-01"]
    );
}
