// crates/voice/src/lib.rs
//
// Seams the assistant consumes speech through. Real speech-to-text and
// text-to-speech SDK integration lives outside this repository; the console
// implementations keep the assistant runnable and testable without it.

use std::collections::VecDeque;

use async_trait::async_trait;
use contavoz_core::{ContavozResult, Utterance};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    pub enabled: bool,
    pub voice: String,
    pub greeting: String,
    /// When non-empty the session is driven by this list instead of the
    /// console, one utterance per entry.
    #[serde(default)]
    pub scripted_transcripts: Vec<String>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            voice: "pt-BR-FranciscaNeural".to_string(),
            greeting: "Faça sua consulta".to_string(),
            scripted_transcripts: Vec::new(),
        }
    }
}

/// Where transcribed user queries come from.
#[async_trait]
pub trait TranscriptSource: Send {
    /// Next utterance, or `None` when the session is over.
    async fn next_transcript(&mut self) -> ContavozResult<Option<Utterance>>;
}

/// Where spoken replies go.
#[async_trait]
pub trait SpeechSink: Send {
    async fn speak(&mut self, message: &str) -> ContavozResult<()>;
}

/// Reads utterances from stdin, one per line. Blank lines are skipped.
pub struct ConsoleSource {
    lines: Lines<BufReader<Stdin>>,
}

impl ConsoleSource {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for ConsoleSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptSource for ConsoleSource {
    async fn next_transcript(&mut self) -> ContavozResult<Option<Utterance>> {
        loop {
            match self.lines.next_line().await? {
                Some(line) => {
                    let text = line.trim();
                    if text.is_empty() {
                        continue;
                    }
                    return Ok(Some(Utterance::new(text)));
                }
                None => return Ok(None),
            }
        }
    }
}

/// Prints replies to stdout in place of a synthesizer.
pub struct ConsoleSink {
    voice: String,
}

impl ConsoleSink {
    pub fn new(voice: impl Into<String>) -> Self {
        Self {
            voice: voice.into(),
        }
    }
}

#[async_trait]
impl SpeechSink for ConsoleSink {
    async fn speak(&mut self, message: &str) -> ContavozResult<()> {
        info!(voice = %self.voice, "speaking reply");
        println!("{message}");
        Ok(())
    }
}

/// Yields a fixed list of transcripts in order, then ends the session.
pub struct ScriptedSource {
    queue: VecDeque<String>,
}

impl ScriptedSource {
    pub fn new(transcripts: Vec<String>) -> Self {
        Self {
            queue: transcripts.into(),
        }
    }
}

#[async_trait]
impl TranscriptSource for ScriptedSource {
    async fn next_transcript(&mut self) -> ContavozResult<Option<Utterance>> {
        Ok(self.queue.pop_front().map(Utterance::new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_source_yields_in_order_then_ends() {
        let mut source = ScriptedSource::new(vec![
            "qual o total de entradas?".to_string(),
            "compare as filiais".to_string(),
        ]);

        let first = source.next_transcript().await.unwrap().unwrap();
        assert_eq!(first.text, "qual o total de entradas?");

        let second = source.next_transcript().await.unwrap().unwrap();
        assert_eq!(second.text, "compare as filiais");
        assert_ne!(first.id, second.id);

        assert!(source.next_transcript().await.unwrap().is_none());
    }
}
