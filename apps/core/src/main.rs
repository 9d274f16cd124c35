// KlarBot Backend Entry Point
// "The Brain" - deterministic knowledge matching around external collaborators

mod brain;
mod collaborators;
mod error;
mod knowledge;
mod models;
mod pipeline;

#[cfg(test)]
mod tests;

use std::env;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use brain::lexicon::FilterLexicon;
use collaborators::expander::{HttpTermExpander, NoopExpander};
use collaborators::logger::{FormLogger, NoopLogger};
use collaborators::traits::{ChatLogger, TermExpander};
use collaborators::translator::HttpTranslator;
use knowledge::KnowledgeStore;
use models::ChatRequest;
use pipeline::ChatPipeline;

const DEFAULT_KNOWLEDGE_PATH: &str = "knowledge.json";
const DEFAULT_TRANSLATE_URL: &str = "http://localhost:5000/translate";
const DEFAULT_EXPAND_MODEL: &str = "meta-llama/Llama-3.1-8B-Instruct";

fn build_pipeline() -> anyhow::Result<ChatPipeline> {
    let lexicon = Arc::new(FilterLexicon::new());

    let knowledge_path =
        env::var("KNOWLEDGE_PATH").unwrap_or_else(|_| DEFAULT_KNOWLEDGE_PATH.to_string());
    let store = Arc::new(KnowledgeStore::new(&knowledge_path));
    store
        .load()
        .with_context(|| format!("refusing to serve without knowledge resource {}", knowledge_path))?;

    let translate_url =
        env::var("TRANSLATE_API_URL").unwrap_or_else(|_| DEFAULT_TRANSLATE_URL.to_string());
    let translator = Arc::new(HttpTranslator::new(&translate_url)?);

    let expander: Arc<dyn TermExpander> = match env::var("EXPAND_API_URL") {
        Ok(url) => {
            let model =
                env::var("EXPAND_MODEL").unwrap_or_else(|_| DEFAULT_EXPAND_MODEL.to_string());
            let api_key = env::var("EXPAND_API_KEY").ok();
            Arc::new(HttpTermExpander::new(&url, &model, api_key)?)
        }
        Err(_) => {
            info!("EXPAND_API_URL not set, term expansion disabled");
            Arc::new(NoopExpander)
        }
    };

    let logger: Arc<dyn ChatLogger> = match env::var("LOG_FORM_URL") {
        Ok(url) => Arc::new(FormLogger::new(&url)?),
        Err(_) => {
            info!("LOG_FORM_URL not set, question logging disabled");
            Arc::new(NoopLogger)
        }
    };

    Ok(ChatPipeline::new(
        store, lexicon, translator, expander, logger,
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let pipeline = build_pipeline()?;

    info!("klarbot core ready, reading one request per line from stdin");

    // Line protocol: one ChatRequest JSON object in, one ChatReply JSON
    // object out. A plain text line is accepted as a bare German request so
    // manual smoke tests stay cheap. The host HTTP layer plugs in above
    // this boundary.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request = serde_json::from_str::<ChatRequest>(line)
            .unwrap_or_else(|_| ChatRequest::german(line));

        match pipeline.handle(request).await {
            Ok(reply) => {
                let mut out = serde_json::to_string(&reply)?;
                out.push('\n');
                stdout.write_all(out.as_bytes()).await?;
                stdout.flush().await?;
            }
            Err(e) => error!(error = %e, "request rejected"),
        }
    }

    info!("stdin closed, shutting down");
    Ok(())
}
