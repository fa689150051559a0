//! File-backed JSON database: one document holding products, orders, logs,
//! and admin sessions.
//!
//! The read-modify-write cycle is not atomic and carries no locking;
//! concurrent writers can race and one write can be lost. That is an accepted
//! limitation of this storage model.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Order, Product};
use crate::Result;

/// Log reads return at most this many of the newest entries.
pub const LOG_READ_LIMIT: usize = 100;

/// Sessions expire this long after login; expiry forces re-login.
pub const SESSION_TTL_HOURS: i64 = 24;

/// A minted admin session, keyed in the document by its opaque token.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub expires: DateTime<Utc>,
}

impl Session {
    /// Mint a fresh session: returns the opaque token and the record.
    pub fn mint(username: &str) -> (String, Self) {
        let token = Uuid::new_v4().to_string();
        let session = Self {
            username: username.to_string(),
            expires: Utc::now() + Duration::hours(SESSION_TTL_HOURS),
        };
        (token, session)
    }

    pub fn is_expired(&self) -> bool {
        self.expires < Utc::now()
    }
}

/// Append-only audit record for every mutating action.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub details: serde_json::Value,
}

/// The entire database document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub logs: Vec<LogEntry>,
    pub sessions: HashMap<String, Session>,
}

impl Document {
    pub fn append_log(&mut self, action: &str, details: serde_json::Value) {
        self.logs.push(LogEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            action: action.to_string(),
            details,
        });
    }

    /// The most recent [`LOG_READ_LIMIT`] entries, oldest first.
    pub fn recent_logs(&self) -> &[LogEntry] {
        let start = self.logs.len().saturating_sub(LOG_READ_LIMIT);
        &self.logs[start..]
    }
}

#[derive(Clone, Debug)]
pub struct FileDb {
    path: PathBuf,
}

impl FileDb {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unparseable files read as the empty document.
    pub async fn read(&self) -> Document {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!(path = %self.path.display(), error = %e, "database unreadable, starting empty");
                Document::default()
            }),
            Err(_) => Document::default(),
        }
    }

    pub async fn write(&self, doc: &Document) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(doc)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }

    /// Append one audit entry in its own read-modify-write cycle. Failures
    /// are logged and swallowed so auditing never fails a request.
    pub async fn log(&self, action: &str, details: serde_json::Value) {
        let mut doc = self.read().await;
        doc.append_log(action, details);
        if let Err(e) = self.write(&doc).await {
            tracing::warn!(error = %e, action, "failed to append audit log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let db = FileDb::open(dir.path().join("database.json"));
        let doc = db.read().await;
        assert!(doc.products.is_empty());
        assert!(doc.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();
        let doc = FileDb::open(&path).read().await;
        assert!(doc.orders.is_empty());
    }

    #[tokio::test]
    async fn test_write_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let db = FileDb::open(dir.path().join("database.json"));
        let mut doc = Document::default();
        doc.append_log("order_created", serde_json::json!({ "id": "o1" }));
        db.write(&doc).await.unwrap();
        let back = db.read().await;
        assert_eq!(back.logs.len(), 1);
        assert_eq!(back.logs[0].action, "order_created");
    }

    #[test]
    fn test_recent_logs_caps_at_limit() {
        let mut doc = Document::default();
        for i in 0..150 {
            doc.append_log("tick", serde_json::json!({ "i": i }));
        }
        let recent = doc.recent_logs();
        assert_eq!(recent.len(), LOG_READ_LIMIT);
        assert_eq!(recent[0].details["i"], 50);
    }

    #[test]
    fn test_session_expiry() {
        let (token, session) = Session::mint("admin");
        assert!(!token.is_empty());
        assert!(!session.is_expired());
        let stale = Session { username: "admin".into(), expires: Utc::now() - Duration::hours(1) };
        assert!(stale.is_expired());
    }
}
