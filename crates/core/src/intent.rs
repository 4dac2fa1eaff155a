// crates/core/src/intent.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One transcribed user query, as delivered by the transcript source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Utterance {
    pub id: Uuid,
    pub text: String,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
        }
    }
}

/// The closed set of query actions the language model is instructed to
/// produce. Serde renames carry the exact wire strings, so an unrecognized
/// action fails extraction and can never reach dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryAction {
    #[serde(rename = "consultar_somatorio_transacao_por_filial_tipo_e_intervalo")]
    BranchTotalOverTimespan,
    #[serde(rename = "consultar_filial_maior_transacao_somatorio_tipo_e_intervalo")]
    TopBranchByType,
    #[serde(rename = "consultar_transacoes_detalhadas_por_filial_e_periodo")]
    DetailedTransactions,
    #[serde(rename = "consultar_comparativo_entre_filiais_por_tipo_e_periodo")]
    BranchComparison,
    #[serde(rename = "consultar_total_geral_por_tipo_e_periodo")]
    OverallTotalByType,
}

impl QueryAction {
    pub const ALL: [QueryAction; 5] = [
        QueryAction::BranchTotalOverTimespan,
        QueryAction::TopBranchByType,
        QueryAction::DetailedTransactions,
        QueryAction::BranchComparison,
        QueryAction::OverallTotalByType,
    ];

    pub fn wire_name(&self) -> &'static str {
        match self {
            QueryAction::BranchTotalOverTimespan => {
                "consultar_somatorio_transacao_por_filial_tipo_e_intervalo"
            }
            QueryAction::TopBranchByType => {
                "consultar_filial_maior_transacao_somatorio_tipo_e_intervalo"
            }
            QueryAction::DetailedTransactions => {
                "consultar_transacoes_detalhadas_por_filial_e_periodo"
            }
            QueryAction::BranchComparison => {
                "consultar_comparativo_entre_filiais_por_tipo_e_periodo"
            }
            QueryAction::OverallTotalByType => "consultar_total_geral_por_tipo_e_periodo",
        }
    }
}

/// Transaction type as the extraction prompt defines it. "faturamento" is a
/// synonym the prompt normalizes to "entrada"; the alias covers models that
/// skip the normalization step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[serde(alias = "faturamento")]
    Entrada,
    Despesa,
    Lucro,
}

impl TransactionKind {
    /// Spoken singular label.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Entrada => "entrada",
            TransactionKind::Despesa => "despesa",
            TransactionKind::Lucro => "lucro",
        }
    }

    /// Spoken plural label.
    pub fn plural(&self) -> &'static str {
        match self {
            TransactionKind::Entrada => "entradas",
            TransactionKind::Despesa => "despesas",
            TransactionKind::Lucro => "lucros",
        }
    }

    /// Value the backend expects in the `type` query parameter.
    pub fn query_value(&self) -> &'static str {
        match self {
            TransactionKind::Entrada => "ENTRADA",
            TransactionKind::Despesa => "DESPESA",
            TransactionKind::Lucro => "LUCRO",
        }
    }
}

/// Date range a query is scoped to. Either bound may be absent, meaning
/// unconstrained on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl Period {
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Structured representation of one spoken request, produced by the
/// language-model extraction. Immutable once built; consumed by exactly one
/// endpoint handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub action: QueryAction,
    pub kind: Option<TransactionKind>,
    pub branch: Option<String>,
    pub period: Period,
}
