//! Request Orchestrator.
//!
//! Sequences the brain and the external collaborators for one incoming
//! question: mask, translate to German, match, answer, translate back, log.
//! Collaborator failures degrade (original text, empty expansion, dropped
//! log entry); the caller never sees a raw error from an external service.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::brain::lexicon::FilterLexicon;
use crate::brain::matcher::KnowledgeMatcher;
use crate::brain::protect::SegmentProtector;
use crate::collaborators::traits::{ChatLogger, TermExpander, Translator};
use crate::error::AppError;
use crate::knowledge::KnowledgeStore;
use crate::models::{ChatReply, ChatRequest};

/// Terms requested from the expander for the last-resort tier
const MAX_EXPANSION_TERMS: usize = 5;

/// Fixed German reply when no knowledge entry matches
pub const FALLBACK_REPLY_DE: &str = "Entschuldigung, das habe ich nicht verstanden. \
    Bitte stellen Sie eine klare Frage oder senden Sie uns eine E-Mail an \
    <a href='mailto:info@klarbot.example'>info@klarbot.example</a>.";

/// Orchestrates one question through the matching core and the collaborators.
pub struct ChatPipeline {
    store: Arc<KnowledgeStore>,
    matcher: KnowledgeMatcher,
    protector: SegmentProtector,
    translator: Arc<dyn Translator>,
    expander: Arc<dyn TermExpander>,
    logger: Arc<dyn ChatLogger>,
}

impl ChatPipeline {
    pub fn new(
        store: Arc<KnowledgeStore>,
        lexicon: Arc<FilterLexicon>,
        translator: Arc<dyn Translator>,
        expander: Arc<dyn TermExpander>,
        logger: Arc<dyn ChatLogger>,
    ) -> Self {
        Self {
            store,
            matcher: KnowledgeMatcher::new(Arc::clone(&lexicon)),
            protector: SegmentProtector::new(lexicon),
            translator,
            expander,
            logger,
        }
    }

    /// Process one question and produce a reply.
    ///
    /// The only error paths left here are contract violations (empty
    /// message) and a knowledge table that failed to load; everything a
    /// collaborator can break degrades into a usable reply.
    #[instrument(skip(self, request), fields(request_id = %Uuid::new_v4()))]
    pub async fn handle(&self, request: ChatRequest) -> Result<ChatReply, AppError> {
        request.validate()?;

        let language = {
            let lang = request.language.trim().to_lowercase();
            if lang.is_empty() {
                "de".to_string()
            } else {
                lang
            }
        };

        // A whitespace-only question cannot match anything; skip straight
        // to the fallback instead of bothering the translator.
        let answer_de = if request.message.trim().is_empty() {
            FALLBACK_REPLY_DE.to_string()
        } else {
            let german = self.translate_protected(&request.message, "de").await;
            self.answer_for(&german).await?
        };

        let reply = if language == "de" {
            answer_de
        } else {
            self.translate_protected(&answer_de, &language).await
        };

        self.spawn_log(request.message, reply.clone());

        Ok(ChatReply { reply })
    }

    /// Match the German question against the knowledge table, consulting the
    /// expander only when every deterministic tier came up empty.
    async fn answer_for(&self, german: &str) -> Result<String, AppError> {
        let entries = self.store.load()?;
        let mut result = self.matcher.find(entries, german);

        if !result.is_match() {
            let terms = match self.expander.expand(german, MAX_EXPANSION_TERMS).await {
                Ok(terms) => terms,
                Err(e) => {
                    warn!(error = %e, "term expansion failed, matching with base keywords only");
                    Vec::new()
                }
            };

            if !terms.is_empty() {
                result = self.matcher.find_expanded(entries, german, &terms);
            }
        }

        match result.entry {
            Some(entry) => {
                info!(
                    entry = %entry.id,
                    strategy = %result.strategy,
                    score = result.score,
                    "knowledge entry matched"
                );
                Ok(entry.answer.clone())
            }
            None => {
                info!("no knowledge entry matched, using fallback reply");
                Ok(FALLBACK_REPLY_DE.to_string())
            }
        }
    }

    /// Translate with protected segments masked; degrade to the original
    /// text when the collaborator fails. Restoring the mask afterwards is
    /// what keeps product codes and addresses byte-identical in the reply.
    async fn translate_protected(&self, text: &str, target_lang: &str) -> String {
        let (masked, map) = self.protector.protect(text);

        let translated = match self.translator.translate(&masked, target_lang).await {
            Ok(t) => t,
            Err(e) => {
                warn!(
                    error = %e,
                    target = target_lang,
                    "translation failed, passing original text through"
                );
                masked
            }
        };

        self.protector.restore(&translated, &map)
    }

    /// Fire-and-forget log delivery off the request path.
    fn spawn_log(&self, question: String, reply: String) {
        let logger = Arc::clone(&self.logger);
        tokio::spawn(async move {
            if let Err(e) = logger.log(&question, &reply).await {
                warn!(error = %e, "chat log delivery failed");
            }
        });
    }
}
