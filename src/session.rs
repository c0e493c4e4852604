use crate::auth::Principal;
use crate::bus::{Event, EventBus, NoticeLevel};
use crate::error::{Error, Result};
use crate::language::Language;
use crate::message::{Draft, Message};
use crate::store::MessageStore;
use crate::translate::Translator;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// Observable session state: `Translating` while at least one send is
/// waiting on translation resolution, `Idle` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Translating,
}

/// One bilingual conversation: the authenticated user's language paired with
/// the partner's, plus the message log.
///
/// Created when the user enters the chat and dropped when they leave;
/// the session itself is never persisted. Sends may run concurrently, and
/// messages are appended in the order their translations resolve, not the
/// order they were submitted: the store's append order is the ground truth
/// for display order.
pub struct ChatSession {
    id: String,
    user: Principal,
    user_language: Language,
    partner_language: Language,
    store: Arc<dyn MessageStore>,
    translator: Arc<dyn Translator>,
    bus: Arc<EventBus>,
    in_flight: AtomicUsize,
    resolve_timeout: Duration,
}

/// Keeps the in-flight count honest on every exit path out of `send`.
struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ChatSession {
    /// Resolution slower than this falls back to the original text rather
    /// than stalling the send forever.
    pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(
        user: Principal,
        partner_language: Language,
        store: Arc<dyn MessageStore>,
        translator: Arc<dyn Translator>,
        bus: Arc<EventBus>,
    ) -> Self {
        let id = format!("ses_{}", Uuid::new_v4().simple());
        let user_language = user.preferred_language;
        info!(
            "Session {} opened for {} ({} -> {})",
            id, user.email, user_language, partner_language
        );

        Self {
            id,
            user,
            user_language,
            partner_language,
            store,
            translator,
            bus,
            in_flight: AtomicUsize::new(0),
            resolve_timeout: Self::DEFAULT_RESOLVE_TIMEOUT,
        }
    }

    pub fn with_resolve_timeout(mut self, timeout: Duration) -> Self {
        self.resolve_timeout = timeout;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user(&self) -> &Principal {
        &self.user
    }

    pub fn user_language(&self) -> Language {
        self.user_language
    }

    pub fn partner_language(&self) -> Language {
        self.partner_language
    }

    pub fn state(&self) -> SessionState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            SessionState::Translating
        } else {
            SessionState::Idle
        }
    }

    /// Compose and send one message: validate, translate into the partner's
    /// language, append to the store, notify subscribers.
    ///
    /// Empty or whitespace-only text is rejected before anything else
    /// happens. If the translation provider fails, the error is returned and
    /// nothing is appended; the session is back to idle either way. If
    /// resolution exceeds the timeout, the message is stored with the
    /// original text standing in for the translation.
    pub async fn send(&self, raw_text: &str) -> Result<Message> {
        let text = raw_text.trim();
        if text.is_empty() {
            return Err(Error::EmptyMessage);
        }

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlightGuard(&self.in_flight);

        let resolution = tokio::time::timeout(
            self.resolve_timeout,
            self.translator
                .resolve(text, self.user_language, self.partner_language),
        )
        .await;

        let translated_text = match resolution {
            Ok(Ok(translated)) => translated,
            Ok(Err(e)) => {
                warn!(
                    "Session {}: {} provider failed: {}",
                    self.id,
                    self.translator.name(),
                    e
                );
                self.bus.publish(Event::Notice {
                    level: NoticeLevel::Error,
                    message: format!("Message could not be translated: {}", e),
                });
                return Err(e);
            }
            Err(_elapsed) => {
                // Fallback-to-original-text policy: better an untranslated
                // message than a send stuck in Translating.
                warn!(
                    "Session {}: translation timed out after {:?}, keeping original text",
                    self.id, self.resolve_timeout
                );
                text.to_string()
            }
        };

        let draft = Draft::new(
            self.user.id.clone(),
            text,
            self.user_language,
            translated_text,
        );
        let stored = self.store.append(draft).await?;

        self.bus.publish(Event::MessageAppended(stored.clone()));
        Ok(stored)
    }

    /// The full message log in display order.
    pub async fn messages(&self) -> Result<Vec<Message>> {
        self.store.list().await
    }
}
