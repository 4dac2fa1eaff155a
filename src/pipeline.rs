// src/pipeline.rs

use std::sync::atomic::{AtomicBool, Ordering};

use contavoz_core::Utterance;
use contavoz_nlu::IntentExtractor;
use contavoz_queries::QueryDispatcher;
use parking_lot::RwLock;
use tracing::{info, warn};

/// Spoken when the language model returns nothing the assistant can act on.
pub const UNRECOGNIZED_REPLY: &str = "Operação não reconhecida, tente novamente.";

#[derive(Debug, Default, Clone)]
pub struct PipelineMetrics {
    pub utterances: u64,
    pub answered: u64,
    pub unrecognized: u64,
    pub ignored_busy: u64,
}

/// Per-utterance flow: transcript -> intent extraction -> query dispatch ->
/// spoken reply. One utterance in flight at a time; a new one arriving
/// mid-flight is ignored, matching the capture UI's behavior of suppressing
/// input while processing.
pub struct QueryPipeline {
    extractor: IntentExtractor,
    dispatcher: QueryDispatcher,
    busy: AtomicBool,
    metrics: RwLock<PipelineMetrics>,
}

impl QueryPipeline {
    pub fn new(extractor: IntentExtractor, dispatcher: QueryDispatcher) -> Self {
        Self {
            extractor,
            dispatcher,
            busy: AtomicBool::new(false),
            metrics: RwLock::new(PipelineMetrics::default()),
        }
    }

    /// Process one utterance to a spoken reply. Returns `None` when the
    /// pipeline is already busy with a previous utterance.
    pub async fn process(&self, utterance: Utterance) -> Option<String> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            self.metrics.write().ignored_busy += 1;
            warn!(utterance_id = %utterance.id, "utterance ignored, another query is in flight");
            return None;
        }

        let reply = self.handle(&utterance).await;
        self.busy.store(false, Ordering::SeqCst);
        Some(reply)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn metrics(&self) -> PipelineMetrics {
        self.metrics.read().clone()
    }

    async fn handle(&self, utterance: &Utterance) -> String {
        self.metrics.write().utterances += 1;
        info!(utterance_id = %utterance.id, text = %utterance.text, "processing utterance");

        let intent = match self.extractor.extract(utterance).await {
            Ok(intent) => intent,
            Err(err) => {
                warn!(utterance_id = %utterance.id, %err, "intent extraction failed");
                self.metrics.write().unrecognized += 1;
                return UNRECOGNIZED_REPLY.to_string();
            }
        };

        let outcome = self.dispatcher.dispatch(&intent).await;
        if !outcome.error {
            self.metrics.write().answered += 1;
        }

        outcome.message
    }
}
