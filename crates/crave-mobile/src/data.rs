//! Data access layer for the mobile app.

#[cfg(target_os = "android")]
use std::path::PathBuf;
use std::sync::Arc;

use crave_core::db::{CravingRepository, Database, SqliteCravingRepository};
use crave_core::models::{Craving, CravingId};
use crave_core::{Error, Result};
use tokio::sync::Mutex;

const DEFAULT_CRAVINGS_LIMIT: usize = 500;

/// Thin async wrapper around `crave-core` repository APIs.
#[derive(Clone)]
pub struct MobileCravingStore {
    db: Arc<Mutex<Database>>,
}

impl MobileCravingStore {
    /// Open the default local mobile database path.
    #[cfg(target_os = "android")]
    pub fn open_default() -> Result<Self> {
        let db_path = default_db_path();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(db_path)?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    /// Open an in-memory database for tests.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    /// Fetch the current snapshot of cravings, newest first.
    pub async fn list_cravings(&self) -> Result<Vec<Craving>> {
        let db = self.db.lock().await;
        let repo = SqliteCravingRepository::new(db.connection());
        repo.list(DEFAULT_CRAVINGS_LIMIT, 0)
    }

    /// Log a new craving.
    ///
    /// The description is stored exactly as typed; only whitespace-only
    /// input is rejected. The 300-character cap belongs to the input
    /// widget, not to this layer.
    pub async fn log_craving(
        &self,
        description: &str,
        intensity: f64,
        resistance: f64,
        emotions: Vec<String>,
    ) -> Result<Craving> {
        validate_description(description)?;
        let craving = Craving::new(description, intensity, resistance, emotions);

        let db = self.db.lock().await;
        let repo = SqliteCravingRepository::new(db.connection());
        repo.create(&craving)?;
        Ok(craving)
    }

    /// Soft archive a craving.
    pub async fn archive_craving(&self, id: &CravingId) -> Result<()> {
        let db = self.db.lock().await;
        let repo = SqliteCravingRepository::new(db.connection());
        repo.archive(id)
    }
}

fn validate_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(Error::InvalidInput(
            "Craving description cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Build a mobile-friendly local DB path.
#[cfg(target_os = "android")]
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::data_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("crave")
        .join("crave-mobile.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn log_list_archive_roundtrip() {
        let store = MobileCravingStore::open_in_memory().unwrap();

        let logged = store
            .log_craving("Coffee craving", 8.0, 3.0, vec!["Tired".to_string()])
            .await
            .unwrap();
        assert_eq!(logged.description, "Coffee craving");
        assert_eq!(logged.emotions, vec!["tired".to_string()]);

        let cravings = store.list_cravings().await.unwrap();
        assert_eq!(cravings.len(), 1);
        assert_eq!(cravings[0].id, logged.id);

        store.archive_craving(&logged.id).await.unwrap();
        let cravings = store.list_cravings().await.unwrap();
        assert!(cravings.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn log_rejects_empty_description() {
        let store = MobileCravingStore::open_in_memory().unwrap();
        let err = store
            .log_craving("   ", 5.0, 5.0, Vec::new())
            .await
            .unwrap_err();

        match err {
            Error::InvalidInput(msg) => assert!(msg.contains("cannot be empty")),
            other => panic!("expected invalid input error, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn log_preserves_description_as_typed() {
        let store = MobileCravingStore::open_in_memory().unwrap();

        let logged = store
            .log_craving("  salted caramel  ", 6.0, 6.0, Vec::new())
            .await
            .unwrap();
        assert_eq!(logged.description, "  salted caramel  ");
    }
}
