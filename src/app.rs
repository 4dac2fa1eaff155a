// src/app.rs

use std::sync::Arc;

use contavoz_config::ContavozConfig;
use contavoz_core::ContavozResult;
use contavoz_nlu::IntentExtractor;
use contavoz_queries::QueryDispatcher;
use contavoz_voice::{ConsoleSink, ConsoleSource, ScriptedSource, SpeechSink, TranscriptSource};
use tokio::signal;
use tracing::info;

use crate::pipeline::QueryPipeline;

pub struct ContavozApp {
    config: ContavozConfig,
    pipeline: Arc<QueryPipeline>,
}

impl ContavozApp {
    pub fn new(config: ContavozConfig) -> ContavozResult<Self> {
        info!("Initializing Contavoz components...");

        let extractor = IntentExtractor::new(config.llm.clone())?;
        let dispatcher = QueryDispatcher::new(config.backend.clone())?;
        let pipeline = Arc::new(QueryPipeline::new(extractor, dispatcher));

        Ok(Self { config, pipeline })
    }

    pub async fn run(&mut self) -> ContavozResult<()> {
        info!("Starting Contavoz assistant...");

        let mut source: Box<dyn TranscriptSource> =
            if self.config.voice.scripted_transcripts.is_empty() {
                Box::new(ConsoleSource::new())
            } else {
                info!(
                    transcripts = self.config.voice.scripted_transcripts.len(),
                    "running scripted session"
                );
                Box::new(ScriptedSource::new(
                    self.config.voice.scripted_transcripts.clone(),
                ))
            };
        let mut sink = ConsoleSink::new(self.config.voice.voice.clone());

        tokio::select! {
            result = self.run_session(source.as_mut(), &mut sink) => result?,
            _ = signal::ctrl_c() => {
                info!("Received shutdown signal");
            }
        }

        let metrics = self.pipeline.metrics();
        info!(
            utterances = metrics.utterances,
            answered = metrics.answered,
            unrecognized = metrics.unrecognized,
            ignored_busy = metrics.ignored_busy,
            "Session finished"
        );

        Ok(())
    }

    async fn run_session(
        &self,
        source: &mut dyn TranscriptSource,
        sink: &mut dyn SpeechSink,
    ) -> ContavozResult<()> {
        if self.config.voice.enabled {
            sink.speak(&self.config.voice.greeting).await?;
        }

        while let Some(utterance) = source.next_transcript().await? {
            if let Some(reply) = self.pipeline.process(utterance).await {
                sink.speak(&reply).await?;
            }
        }

        Ok(())
    }
}
