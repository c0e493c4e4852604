use crate::error::{Error, Result};
use crate::language::Language;
use crate::message::{Draft, Message};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    ConnectOptions, Row, SqlitePool,
};
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

/// An ordered, append-only log of chat messages.
///
/// Append assigns a unique, strictly increasing id; list returns messages in
/// append order. There are no update or delete operations: a message, once
/// appended, is permanent for the lifetime of the log. The contract is the
/// same whether the log lives in memory or behind a durable backend, so the
/// two are interchangeable.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append a draft at the tail, assigning the next id. Id assignment and
    /// the append itself are a single atomic step: no two messages ever
    /// share an id.
    async fn append(&self, draft: Draft) -> Result<Message>;

    /// All messages in append order. The returned vector is a snapshot;
    /// mutating it does not affect the log. Two calls with no intervening
    /// append return equal sequences.
    async fn list(&self) -> Result<Vec<Message>>;
}

/// In-memory message log. The default backend: the session holds its
/// messages only for its own lifetime, nothing survives teardown.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    next_id: i64,
    messages: Vec<Message>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn append(&self, draft: Draft) -> Result<Message> {
        // The lock makes id assignment and the push one atomic step.
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let message = draft.into_message(inner.next_id);
        inner.messages.push(message.clone());
        Ok(message)
    }

    async fn list(&self) -> Result<Vec<Message>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.messages.clone())
    }
}

/// SQLite-backed message log, for deployments that want the history to
/// survive a restart.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) a database file and initialize the schema.
    pub async fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();

        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| Error::Storage(format!("Failed to create db directory: {}", e)))?;
            }
        }

        let db_url = format!("sqlite://{}", db_path.to_string_lossy());
        let options = SqliteConnectOptions::from_str(&db_url)?
            .create_if_missing(true)
            .log_statements(tracing::log::LevelFilter::Trace);

        let pool = SqlitePool::connect_with(options).await?;

        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }

    /// Transient in-memory database, used by tests. Pinned to a single
    /// connection so every query sees the same database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                sender_id TEXT NOT NULL,
                original_text TEXT NOT NULL,
                original_language TEXT NOT NULL,
                translated_text TEXT NOT NULL,
                created_at DATETIME NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl MessageStore for SqliteStore {
    async fn append(&self, draft: Draft) -> Result<Message> {
        let result = sqlx::query(
            r#"
            INSERT INTO messages (sender_id, original_text, original_language, translated_text, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&draft.sender_id)
        .bind(&draft.original_text)
        .bind(draft.original_language.tag())
        .bind(&draft.translated_text)
        .bind(draft.created_at)
        .execute(&self.pool)
        .await?;

        Ok(draft.into_message(result.last_insert_rowid()))
    }

    async fn list(&self) -> Result<Vec<Message>> {
        // Ordered by id, not timestamp: display order is creation order and
        // must stay correct even with clock skew between writers.
        let rows = sqlx::query(
            r#"
            SELECT id, sender_id, original_text, original_language, translated_text, created_at
            FROM messages
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in rows {
            let tag: String = row.try_get("original_language")?;
            messages.push(Message {
                id: row.try_get("id")?,
                sender_id: row.try_get("sender_id")?,
                original_text: row.try_get("original_text")?,
                original_language: Language::parse(&tag)?,
                translated_text: row.try_get("translated_text")?,
                created_at: row.try_get("created_at")?,
            });
        }

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn draft(text: &str) -> Draft {
        Draft::new("user-1", text, Language::English, format!("{} (es)", text))
    }

    #[tokio::test]
    async fn memory_append_assigns_strictly_increasing_ids() {
        let store = MemoryStore::new();
        let a = store.append(draft("one")).await.unwrap();
        let b = store.append(draft("two")).await.unwrap();
        let c = store.append(draft("three")).await.unwrap();
        assert!(a.id < b.id && b.id < c.id);
    }

    #[tokio::test]
    async fn memory_list_preserves_append_order() {
        let store = MemoryStore::new();
        for text in ["first", "second", "third"] {
            store.append(draft(text)).await.unwrap();
        }
        let texts: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.original_text)
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn memory_reads_are_idempotent() {
        let store = MemoryStore::new();
        store.append(draft("hello")).await.unwrap();
        let first = store.list().await.unwrap();
        let second = store.list().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn memory_snapshot_does_not_alias_the_log() {
        let store = MemoryStore::new();
        store.append(draft("hello")).await.unwrap();
        let mut snapshot = store.list().await.unwrap();
        snapshot.clear();
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn memory_concurrent_appends_never_share_an_id() {
        let store = Arc::new(MemoryStore::new());
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.append(draft(&format!("msg {}", i))).await.unwrap().id
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 32);
    }

    #[tokio::test]
    async fn sqlite_round_trips_messages_in_append_order() {
        let store = SqliteStore::in_memory().await.unwrap();
        let a = store
            .append(Draft::new("user-1", "Hello", Language::English, "Hola"))
            .await
            .unwrap();
        let b = store
            .append(Draft::new(
                "partner-1",
                "¿Cómo estás?",
                Language::Spanish,
                "How are you?",
            ))
            .await
            .unwrap();
        assert!(a.id < b.id);

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].original_text, "Hello");
        assert_eq!(listed[0].original_language, Language::English);
        assert_eq!(listed[1].translated_text, "How are you?");
        assert_eq!(listed[1].original_language, Language::Spanish);
    }
}
