// crates/nlu/src/lib.rs

use chrono::{Datelike, Local, NaiveDate};
use contavoz_core::{ContavozError, ContavozResult, Intent, Period, QueryAction, TransactionKind, Utterance};
use parking_lot::RwLock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub mod azure;
pub mod prompt;

use azure::AzureOpenAiClient;
use prompt::PromptBuilder;

/// Language-model configuration for intent extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Azure OpenAI resource endpoint. Must end with a slash.
    pub endpoint: String,
    pub deployment: String,
    pub api_version: String,
    pub api_key_env: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub timeout_s: u64,
    /// Branch names the prompt offers to the model. Empty keeps the
    /// deployment defaults.
    #[serde(default)]
    pub branches: Vec<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://example.openai.azure.com/".to_string(),
            deployment: "gpt-4o-mini".to_string(),
            api_version: "2024-02-15-preview".to_string(),
            api_key_env: "AZURE_OPENAI_API_KEY".to_string(),
            max_tokens: 500,
            temperature: 0.7,
            timeout_s: 10,
            branches: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ExtractionMetrics {
    pub requests: u64,
    pub llm_failures: u64,
    pub parse_failures: u64,
}

/// Turns a transcript into a structured [`Intent`] via one language-model
/// call. Anything the model returns that does not parse into the closed
/// intent shape is an extraction failure; the dispatch layer never sees it.
pub struct IntentExtractor {
    client: AzureOpenAiClient,
    prompt_builder: PromptBuilder,
    metrics: RwLock<ExtractionMetrics>,
}

impl IntentExtractor {
    pub fn new(config: LlmConfig) -> ContavozResult<Self> {
        let prompt_builder = PromptBuilder::with_branches(config.branches.clone());
        let client = AzureOpenAiClient::new(config)?;

        Ok(Self {
            client,
            prompt_builder,
            metrics: RwLock::new(ExtractionMetrics::default()),
        })
    }

    pub async fn extract(&self, utterance: &Utterance) -> ContavozResult<Intent> {
        self.metrics.write().requests += 1;

        let user_prompt = self.prompt_builder.build_user_prompt(&utterance.text);
        let content = match self
            .client
            .complete(self.prompt_builder.system_prompt(), &user_prompt)
            .await
        {
            Ok(content) => content,
            Err(err) => {
                self.metrics.write().llm_failures += 1;
                return Err(err);
            }
        };

        match parse_intent(&content) {
            Ok(intent) => {
                debug!(
                    utterance_id = %utterance.id,
                    action = intent.action.wire_name(),
                    "intent extracted"
                );
                Ok(intent)
            }
            Err(err) => {
                self.metrics.write().parse_failures += 1;
                warn!(utterance_id = %utterance.id, %err, "intent extraction failed");
                Err(err)
            }
        }
    }

    pub fn metrics(&self) -> ExtractionMetrics {
        self.metrics.read().clone()
    }
}

/// Raw shape the model is instructed to emit.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIntentPayload {
    acao: QueryAction,
    #[serde(default)]
    tipo: Option<TransactionKind>,
    #[serde(default)]
    mes_inicio: Option<u32>,
    #[serde(default)]
    mes_fim: Option<u32>,
    #[serde(default)]
    filial: Option<String>,
}

/// Parse a model reply into an [`Intent`], resolving month numbers against
/// the current year.
pub fn parse_intent(content: &str) -> ContavozResult<Intent> {
    parse_intent_with_year(content, Local::now().year())
}

/// Same as [`parse_intent`] with an explicit year, so date resolution is
/// deterministic under test.
pub fn parse_intent_with_year(content: &str, year: i32) -> ContavozResult<Intent> {
    let cleaned = strip_code_fences(content);
    if cleaned.is_empty() {
        return Err(ContavozError::Extraction(
            "model returned an empty reply".to_string(),
        ));
    }

    let payload: RawIntentPayload = serde_json::from_str(&cleaned)
        .map_err(|e| ContavozError::Extraction(format!("model reply is not a valid intent: {e}")))?;

    let period = Period {
        start: payload
            .mes_inicio
            .map(|month| month_start(year, month))
            .transpose()?,
        end: payload
            .mes_fim
            .map(|month| month_end(year, month))
            .transpose()?,
    };

    Ok(Intent {
        action: payload.acao,
        kind: payload.tipo,
        branch: payload.filial,
        period,
    })
}

fn strip_code_fences(content: &str) -> String {
    let fences = Regex::new(r"```(?:json)?").unwrap();
    fences.replace_all(content.trim(), "").trim().to_string()
}

fn month_start(year: i32, month: u32) -> ContavozResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ContavozError::Extraction(format!("month out of range: {month}")))
}

fn month_end(year: i32, month: u32) -> ContavozResult<NaiveDate> {
    if !(1..=12).contains(&month) {
        return Err(ContavozError::Extraction(format!(
            "month out of range: {month}"
        )));
    }

    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };

    first_of_next
        .and_then(|date| date.pred_opt())
        .ok_or_else(|| ContavozError::Extraction(format!("month out of range: {month}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_plain_payload() {
        let intent = parse_intent_with_year(
            r#"{"acao": "consultar_total_geral_por_tipo_e_periodo", "tipo": "entrada", "mesInicio": 1, "mesFim": 3, "filial": null}"#,
            2025,
        )
        .unwrap();

        assert_eq!(intent.action, QueryAction::OverallTotalByType);
        assert_eq!(intent.kind, Some(TransactionKind::Entrada));
        assert_eq!(intent.branch, None);
        assert_eq!(intent.period.start, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(intent.period.end, NaiveDate::from_ymd_opt(2025, 3, 31));
    }

    #[test]
    fn strips_markdown_fences_before_parsing() {
        let reply = "```json\n{\"acao\": \"consultar_filial_maior_transacao_somatorio_tipo_e_intervalo\", \"tipo\": \"despesa\", \"mesInicio\": null, \"mesFim\": null, \"filial\": null}\n```";
        let intent = parse_intent_with_year(reply, 2025).unwrap();

        assert_eq!(intent.action, QueryAction::TopBranchByType);
        assert_eq!(intent.kind, Some(TransactionKind::Despesa));
        assert!(intent.period.is_unbounded());
    }

    #[test]
    fn month_bounds_cover_february_and_december() {
        let intent = parse_intent_with_year(
            r#"{"acao": "consultar_total_geral_por_tipo_e_periodo", "tipo": "lucro", "mesInicio": 2, "mesFim": 12, "filial": null}"#,
            2025,
        )
        .unwrap();

        assert_eq!(intent.period.start, NaiveDate::from_ymd_opt(2025, 2, 1));
        assert_eq!(intent.period.end, NaiveDate::from_ymd_opt(2025, 12, 31));
    }

    #[test]
    fn single_month_bound_leaves_the_other_open() {
        let intent = parse_intent_with_year(
            r#"{"acao": "consultar_total_geral_por_tipo_e_periodo", "tipo": "lucro", "mesInicio": 5, "mesFim": null, "filial": null}"#,
            2025,
        )
        .unwrap();

        assert_eq!(intent.period.start, NaiveDate::from_ymd_opt(2025, 5, 1));
        assert_eq!(intent.period.end, None);
    }

    #[test]
    fn unknown_action_is_an_extraction_failure() {
        let result = parse_intent_with_year(
            r#"{"acao": "consultar_cotacao_do_dolar", "tipo": null, "mesInicio": null, "mesFim": null, "filial": null}"#,
            2025,
        );
        assert!(matches!(result, Err(ContavozError::Extraction(_))));
    }

    #[test]
    fn missing_action_is_an_extraction_failure() {
        let result = parse_intent_with_year(r#"{"tipo": "entrada"}"#, 2025);
        assert!(matches!(result, Err(ContavozError::Extraction(_))));
    }

    #[test]
    fn out_of_range_month_is_an_extraction_failure() {
        let result = parse_intent_with_year(
            r#"{"acao": "consultar_total_geral_por_tipo_e_periodo", "tipo": null, "mesInicio": 13, "mesFim": null, "filial": null}"#,
            2025,
        );
        assert!(matches!(result, Err(ContavozError::Extraction(_))));

        let zero = parse_intent_with_year(
            r#"{"acao": "consultar_total_geral_por_tipo_e_periodo", "tipo": null, "mesInicio": null, "mesFim": 0, "filial": null}"#,
            2025,
        );
        assert!(matches!(zero, Err(ContavozError::Extraction(_))));
    }

    #[test]
    fn non_json_reply_is_an_extraction_failure() {
        let result = parse_intent_with_year("desculpe, não entendi a pergunta", 2025);
        assert!(matches!(result, Err(ContavozError::Extraction(_))));

        let empty = parse_intent_with_year("```json\n```", 2025);
        assert!(matches!(empty, Err(ContavozError::Extraction(_))));
    }
}
