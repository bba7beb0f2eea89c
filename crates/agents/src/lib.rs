pub mod backend;

use std::sync::Arc;
use std::time::{Duration, Instant};

use raahi_core::{
    normalize_language_code, session_or_default, IntentClassifier,
    LanguagePackRegistry, ResponseEnvelope,
};
use raahi_observability::AppMetrics;
use tracing::{error, info, instrument, warn};

pub use backend::{
    BackendError, BackendReply, BackendRequest, ConversationBackend, HttpConversationBackend,
};

pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote-first chat: ask the conversational backend, fall back to the
/// keyword classifier and language packs when it cannot answer in time.
pub struct ChatDispatcher<B>
where
    B: ConversationBackend,
{
    backend: Arc<B>,
    registry: Arc<LanguagePackRegistry>,
    classifier: Arc<IntentClassifier>,
    timeout: Duration,
    metrics: Arc<AppMetrics>,
}

impl<B> Clone for ChatDispatcher<B>
where
    B: ConversationBackend,
{
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            registry: Arc::clone(&self.registry),
            classifier: Arc::clone(&self.classifier),
            timeout: self.timeout,
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl<B> ChatDispatcher<B>
where
    B: ConversationBackend,
{
    pub fn new(
        backend: Arc<B>,
        registry: Arc<LanguagePackRegistry>,
        classifier: Arc<IntentClassifier>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            backend,
            registry,
            classifier,
            timeout: DEFAULT_BACKEND_TIMEOUT,
            metrics,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn registry(&self) -> &LanguagePackRegistry {
        &self.registry
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    pub fn metrics(&self) -> &AppMetrics {
        &self.metrics
    }

    /// Always produces an envelope with non-empty text. Backend failures are
    /// logged and absorbed here.
    #[instrument(skip(self, message), fields(message_len = message.len()))]
    pub async fn handle(
        &self,
        message: &str,
        language: Option<&str>,
        session_id: Option<&str>,
    ) -> ResponseEnvelope {
        let started = Instant::now();
        self.metrics.inc_request();

        let language = normalize_language_code(language);
        let session_id = session_or_default(session_id);

        let envelope = match self.ask_backend(message, &language).await {
            Ok(reply) => match reply.usable_text() {
                Some(text) => {
                    self.metrics.inc_remote();
                    let reply_language = reply
                        .language
                        .as_deref()
                        .filter(|code| !code.trim().is_empty())
                        .map(|code| normalize_language_code(Some(code)))
                        .unwrap_or_else(|| language.clone());
                    ResponseEnvelope::remote(
                        text.to_string(),
                        reply_language,
                        session_id,
                        reply.processing_mode.clone(),
                    )
                }
                None => {
                    warn!(session_id = %session_id, "backend declined, answering locally");
                    self.fallback(message, &language, session_id, BackendError::Rejected.kind())
                }
            },
            Err(BackendError::Decode(reason)) => {
                error!(session_id = %session_id, %reason, "backend payload could not be decoded");
                self.metrics.inc_error();
                ResponseEnvelope::error(language, session_id)
            }
            Err(err) => {
                warn!(session_id = %session_id, error = %err, "backend unavailable, answering locally");
                self.fallback(message, &language, session_id, err.kind())
            }
        };

        self.metrics.observe_latency(started.elapsed());
        info!(
            session_id = %envelope.session_id,
            language = %envelope.language,
            intent = ?envelope.intent,
            mode = envelope.processing_mode.as_str(),
            "chat handled"
        );

        envelope
    }

    async fn ask_backend(&self, message: &str, language: &str) -> Result<BackendReply, BackendError> {
        // The backend future is dropped on timeout, which aborts the request.
        match tokio::time::timeout(self.timeout, self.backend.send(message, language)).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Unavailable(format!(
                "no reply within {} ms",
                self.timeout.as_millis()
            ))),
        }
    }

    fn fallback(
        &self,
        message: &str,
        language: &str,
        session_id: String,
        reason: &'static str,
    ) -> ResponseEnvelope {
        self.metrics.inc_fallback(reason);
        let intent = self.classifier.classify(message);
        let resolution = self.registry.resolve_with_source(intent, language);
        ResponseEnvelope::fallback(resolution.text, resolution.language, session_id, intent)
    }
}
