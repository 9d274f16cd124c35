//! Pipeline Tests
//!
//! Full request orchestration against stub collaborators: matching paths,
//! degradation on collaborator failure, segment protection across a
//! translator that rewrites everything it is allowed to touch, and
//! fire-and-forget logging.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

use crate::collaborators::expander::NoopExpander;
use crate::collaborators::logger::NoopLogger;
use crate::collaborators::traits::{ChatLogger, TermExpander, Translator};
use crate::error::AppError;
use crate::knowledge::KnowledgeStore;
use crate::models::ChatRequest;
use crate::pipeline::{ChatPipeline, FALLBACK_REPLY_DE};

const TEST_KNOWLEDGE: &str = r#"[
    {
        "id": "preis",
        "patterns": ["preis anfragen", "preisliste anfordern"],
        "subject": ["preis", "preisliste"],
        "answer": "Unsere Preisliste finden Sie im Shop."
    },
    {
        "id": "modell",
        "patterns": ["welches modell passt"],
        "subject": ["modell"],
        "answer": "Der CPM-200 schafft 200 mm Breite. Fragen gern an info@klarbot.example senden."
    }
]"#;

/// Passes text through untouched in every language.
struct EchoTranslator;

#[async_trait]
impl Translator for EchoTranslator {
    async fn translate(&self, text: &str, _target_lang: &str) -> Result<String, AppError> {
        Ok(text.to_string())
    }
}

/// Uppercases every word it is allowed to touch; placeholder tokens pass
/// through verbatim, as the translator contract requires.
struct ManglingTranslator;

#[async_trait]
impl Translator for ManglingTranslator {
    async fn translate(&self, text: &str, _target_lang: &str) -> Result<String, AppError> {
        let mangled = text
            .split(' ')
            .map(|word| {
                if word.contains("__") {
                    word.to_string()
                } else {
                    word.to_uppercase()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        Ok(mangled)
    }
}

struct FailingTranslator;

#[async_trait]
impl Translator for FailingTranslator {
    async fn translate(&self, _text: &str, _target_lang: &str) -> Result<String, AppError> {
        Err(AppError::Collaborator("translator down".to_string()))
    }
}

struct StaticExpander(Vec<String>);

#[async_trait]
impl TermExpander for StaticExpander {
    async fn expand(&self, _text: &str, _max_terms: usize) -> Result<Vec<String>, AppError> {
        Ok(self.0.clone())
    }
}

struct FailingExpander;

#[async_trait]
impl TermExpander for FailingExpander {
    async fn expand(&self, _text: &str, _max_terms: usize) -> Result<Vec<String>, AppError> {
        Err(AppError::Collaborator("expander down".to_string()))
    }
}

struct ChannelLogger(mpsc::UnboundedSender<(String, String)>);

#[async_trait]
impl ChatLogger for ChannelLogger {
    async fn log(&self, question: &str, reply: &str) -> Result<(), AppError> {
        let _ = self.0.send((question.to_string(), reply.to_string()));
        Ok(())
    }
}

struct FailingLogger;

#[async_trait]
impl ChatLogger for FailingLogger {
    async fn log(&self, _question: &str, _reply: &str) -> Result<(), AppError> {
        Err(AppError::Collaborator("form rejected the submission".to_string()))
    }
}

/// Builds a pipeline over a temp knowledge resource. The file handle is
/// returned so it outlives the store's lazy load.
fn pipeline_with(
    translator: Arc<dyn Translator>,
    expander: Arc<dyn TermExpander>,
    logger: Arc<dyn ChatLogger>,
) -> (ChatPipeline, NamedTempFile) {
    let mut file = NamedTempFile::new().expect("temp knowledge file");
    file.write_all(TEST_KNOWLEDGE.as_bytes())
        .expect("write knowledge");

    let store = Arc::new(KnowledgeStore::new(file.path()));
    let lexicon = Arc::new(crate::brain::FilterLexicon::new());

    (
        ChatPipeline::new(store, lexicon, translator, expander, logger),
        file,
    )
}

fn german(message: &str) -> ChatRequest {
    ChatRequest::german(message)
}

fn request(message: &str, language: &str) -> ChatRequest {
    ChatRequest {
        message: message.to_string(),
        language: language.to_string(),
    }
}

#[tokio::test]
async fn test_exact_match_german_path() {
    let (pipeline, _file) = pipeline_with(
        Arc::new(EchoTranslator),
        Arc::new(NoopExpander),
        Arc::new(NoopLogger),
    );

    let reply = pipeline
        .handle(german("Preis anfragen"))
        .await
        .expect("request should succeed");

    assert_eq!(reply.reply, "Unsere Preisliste finden Sie im Shop.");
}

#[tokio::test]
async fn test_stopword_question_falls_back() {
    let (pipeline, _file) = pipeline_with(
        Arc::new(EchoTranslator),
        Arc::new(NoopExpander),
        Arc::new(NoopLogger),
    );

    let reply = pipeline
        .handle(german("ich möchte bitte"))
        .await
        .expect("request should succeed");

    assert_eq!(reply.reply, FALLBACK_REPLY_DE);
}

#[tokio::test]
async fn test_whitespace_message_falls_back_without_translation() {
    // A failing translator proves the fallback path never touches the wire
    let (pipeline, _file) = pipeline_with(
        Arc::new(FailingTranslator),
        Arc::new(NoopExpander),
        Arc::new(NoopLogger),
    );

    let reply = pipeline
        .handle(german("   "))
        .await
        .expect("request should succeed");

    assert_eq!(reply.reply, FALLBACK_REPLY_DE);
}

#[tokio::test]
async fn test_empty_message_is_a_contract_violation() {
    let (pipeline, _file) = pipeline_with(
        Arc::new(EchoTranslator),
        Arc::new(NoopExpander),
        Arc::new(NoopLogger),
    );

    let result = pipeline.handle(german("")).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_protected_segments_survive_a_mangling_translator() {
    let (pipeline, _file) = pipeline_with(
        Arc::new(ManglingTranslator),
        Arc::new(NoopExpander),
        Arc::new(NoopLogger),
    );

    let reply = pipeline
        .handle(request("Welches Modell passt?", "en"))
        .await
        .expect("request should succeed");

    // The translator shouted at everything it saw...
    assert!(reply.reply.contains("BREITE"));
    // ...but the product code and address survive byte-identically
    assert!(reply.reply.contains("CPM-200"));
    assert!(reply.reply.contains("info@klarbot.example"));
    // and no placeholder token leaks into the reply
    assert!(!reply.reply.contains("__TERM_"));
    assert!(!reply.reply.contains("__SEG_"));
}

#[tokio::test]
async fn test_translation_failure_degrades_to_german_answer() {
    let (pipeline, _file) = pipeline_with(
        Arc::new(FailingTranslator),
        Arc::new(NoopExpander),
        Arc::new(NoopLogger),
    );

    let reply = pipeline
        .handle(request("Preis anfragen", "en"))
        .await
        .expect("request should succeed");

    assert_eq!(reply.reply, "Unsere Preisliste finden Sie im Shop.");
}

#[tokio::test]
async fn test_expander_rescues_unmatched_question() {
    let (pipeline, _file) = pipeline_with(
        Arc::new(EchoTranslator),
        Arc::new(StaticExpander(vec!["Preisliste".to_string()])),
        Arc::new(NoopLogger),
    );

    let reply = pipeline
        .handle(german("Was verlangt ihr dafür?"))
        .await
        .expect("request should succeed");

    assert_eq!(reply.reply, "Unsere Preisliste finden Sie im Shop.");
}

#[tokio::test]
async fn test_expansion_failure_degrades_to_fallback() {
    let (pipeline, _file) = pipeline_with(
        Arc::new(EchoTranslator),
        Arc::new(FailingExpander),
        Arc::new(NoopLogger),
    );

    let reply = pipeline
        .handle(german("Was verlangt ihr dafür?"))
        .await
        .expect("request should succeed");

    assert_eq!(reply.reply, FALLBACK_REPLY_DE);
}

#[tokio::test]
async fn test_logger_receives_question_and_reply() {
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let (pipeline, _file) = pipeline_with(
        Arc::new(EchoTranslator),
        Arc::new(NoopExpander),
        Arc::new(ChannelLogger(sender)),
    );

    pipeline
        .handle(german("Preis anfragen"))
        .await
        .expect("request should succeed");

    let (question, reply) = timeout(Duration::from_secs(2), receiver.recv())
        .await
        .expect("log should arrive")
        .expect("channel open");

    assert_eq!(question, "Preis anfragen");
    assert_eq!(reply, "Unsere Preisliste finden Sie im Shop.");
}

#[tokio::test]
async fn test_logger_failure_never_blocks_the_reply() {
    let (pipeline, _file) = pipeline_with(
        Arc::new(EchoTranslator),
        Arc::new(NoopExpander),
        Arc::new(FailingLogger),
    );

    let reply = pipeline
        .handle(german("Preis anfragen"))
        .await
        .expect("request should succeed");

    assert_eq!(reply.reply, "Unsere Preisliste finden Sie im Shop.");
}
