// crates/queries/src/backend_error.rs

use contavoz_core::TransactionKind;
use serde::Deserialize;
use tracing::warn;

use crate::FETCH_ERROR_MESSAGE;

/// Error payload the backend attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Machine-readable error codes the backend is known to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorCode {
    EntityNotFound,
    NoTransactionsFound,
    InvalidPeriod,
    ApiFieldsInvalid,
    InvalidTransactionType,
    InsufficientBranchesForComparison,
}

impl BackendErrorCode {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ENTITY_NOT_FOUND" => Some(Self::EntityNotFound),
            "NO_TRANSACTIONS_FOUND" => Some(Self::NoTransactionsFound),
            "INVALID_PERIOD" => Some(Self::InvalidPeriod),
            "API_FIELDS_INVALID" => Some(Self::ApiFieldsInvalid),
            "INVALID_TRANSACTION_TYPE" => Some(Self::InvalidTransactionType),
            "INSUFFICIENT_BRANCHES_FOR_COMPARISON" => Some(Self::InsufficientBranchesForComparison),
            _ => None,
        }
    }

    /// Localized message for this code, parameterized by the query's
    /// transaction type where the phrasing mentions it.
    pub fn message(&self, kind: Option<TransactionKind>) -> String {
        match self {
            Self::EntityNotFound => match kind {
                Some(kind) => format!("Nenhum {} encontrado", kind.label()),
                None => "Nenhum dado encontrado".to_string(),
            },
            Self::NoTransactionsFound => match kind {
                Some(kind) => {
                    format!("Nenhuma transação encontrada para o tipo {}", kind.label())
                }
                None => "Nenhuma transação encontrada".to_string(),
            },
            Self::InvalidPeriod => "O Período informado é inválido".to_string(),
            Self::ApiFieldsInvalid => "Ocorreu um erro ao processar os campos".to_string(),
            Self::InvalidTransactionType => "Tipo de transação inválido".to_string(),
            Self::InsufficientBranchesForComparison => {
                "Número insuficiente de filiais para comparação".to_string()
            }
        }
    }
}

/// Resolve a raw backend code into a spoken message. Unrecognized codes log
/// a warning and degrade to the generic fetch-error message.
pub fn resolve(code: &str, kind: Option<TransactionKind>) -> String {
    match BackendErrorCode::from_code(code) {
        Some(known) => known.message(kind),
        None => {
            warn!(code, "unrecognized backend error code");
            FETCH_ERROR_MESSAGE.to_string()
        }
    }
}
