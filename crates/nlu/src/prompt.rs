// crates/nlu/src/prompt.rs

const DEFAULT_BRANCHES: [&str; 3] = ["Matriz", "Filial São Paulo", "Filial Rio de Janeiro"];

/// Builds the extraction messages sent to the language model. The user
/// prompt spells out the action keys, the transaction-type normalization,
/// the month-range rules and the branches the deployment knows about.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    branches: Vec<String>,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            branches: DEFAULT_BRANCHES.iter().map(|b| b.to_string()).collect(),
        }
    }

    pub fn with_branches(branches: Vec<String>) -> Self {
        if branches.is_empty() {
            return Self::new();
        }
        Self { branches }
    }

    pub fn system_prompt(&self) -> &'static str {
        "Você é um assistente que responde apenas com JSON válido, sem explicações."
    }

    pub fn build_user_prompt(&self, frase: &str) -> String {
        let branch_list = self
            .branches
            .iter()
            .map(|b| format!("\"{b}\""))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"A partir da frase abaixo, identifique:

- A ação que o sistema deve executar (chave "acao").
- O tipo da transação (chave "tipo") com os possíveis valores: "entrada", "despesa" ou "lucro".
- O mês de início (chave "mesInicio", número de 1 a 12).
- O mês de fim (chave "mesFim", número de 1 a 12).
- A filial envolvida, as opções de filiais disponíveis estarão detalhadas abaixo na seção ("Regras para filial").
- A ação nunca deve ser null.

Regras para determinar "acao":
- Se mencionar uma filial que se encaixe nas opções de filiais descritas abaixo, um intervalo de tempo e o tipo de transação, retorne: "consultar_somatorio_transacao_por_filial_tipo_e_intervalo"
- Se perguntar qual filial teve maior movimentação, responda com: "consultar_filial_maior_transacao_somatorio_tipo_e_intervalo"
- Se mencionar uma filial que se encaixe nas opções de filiais descritas abaixo, um intervalo de tempo, (considere usar essa função APENAS e SOMENTE se NÃO for citada um tipo), retorne: "consultar_transacoes_detalhadas_por_filial_e_periodo"
- Se quiser comparar valores entre filiais por tipo, retorne: "consultar_comparativo_entre_filiais_por_tipo_e_periodo"
- Se quiser o total geral de um tipo (considere usar essa função APENAS e SOMENTE se NÃO for citada uma filial), use: "consultar_total_geral_por_tipo_e_periodo"

Regras para "tipo":
- "entrada" → entrada
- "despesa" → despesa
- "lucro" → lucro
- "faturamento" → entrada

Regras para "mesInicio" e "mesFim":
- Se só um mês for citado, use o mesmo em ambos
- Se for intervalo (ex: "janeiro a março"), converta corretamente
- Se nenhum for citado, use null

Regra para "filial":
- Existem {branch_count} filiais: {branch_list}, utilize apenas essas opções ao montar o JSON
- Se a filial não for mencionada, use null

Retorne apenas um JSON neste formato:

{{
    "acao": "consultar_somatorio_transacao_por_filial_tipo_e_intervalo",
    "tipo": "entrada",
    "mesInicio": 1,
    "mesFim": 3,
    "filial": "Matriz"
}}

Frase: "{frase}""#,
            branch_count = self.branches.len(),
            branch_list = branch_list,
            frase = frase.trim(),
        )
    }
}
