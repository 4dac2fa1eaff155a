// crates/queries/src/params.rs

use contavoz_core::{Intent, Period, TransactionKind};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Query-string parameters for one backend call. Absent intent fields never
/// produce a pair, so the backend never sees a literal "null".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// All fields an intent can contribute: `type`, `branch`, `startDate`,
    /// `endDate`. `forced_kind` overrides the intent's transaction type for
    /// handlers that only ever query one type.
    pub fn from_intent(intent: &Intent, forced_kind: Option<TransactionKind>) -> Self {
        Self::new()
            .kind(forced_kind.or(intent.kind))
            .branch(intent.branch.as_deref())
            .period(&intent.period)
    }

    pub fn kind(mut self, kind: Option<TransactionKind>) -> Self {
        if let Some(kind) = kind {
            self.pairs.push(("type", kind.query_value().to_string()));
        }
        self
    }

    pub fn branch(mut self, branch: Option<&str>) -> Self {
        if let Some(branch) = branch {
            self.pairs.push(("branch", branch.to_string()));
        }
        self
    }

    pub fn period(mut self, period: &Period) -> Self {
        if let Some(start) = period.start {
            self.pairs
                .push(("startDate", start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = period.end {
            self.pairs
                .push(("endDate", end.format(DATE_FORMAT).to_string()));
        }
        self
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
