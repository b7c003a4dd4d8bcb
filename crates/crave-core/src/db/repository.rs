//! Craving repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT/OFFSET

use crate::error::{Error, Result};
use crate::models::{normalize_emotions, Craving, CravingId};
use rusqlite::{params, Connection};

/// Trait for craving storage operations
pub trait CravingRepository {
    /// Persist a new craving record
    fn create(&self, craving: &Craving) -> Result<()>;

    /// Get a craving by ID
    fn get(&self, id: &CravingId) -> Result<Option<Craving>>;

    /// List cravings (excluding archived), newest first
    fn list(&self, limit: usize, offset: usize) -> Result<Vec<Craving>>;

    /// Soft archive a craving
    fn archive(&self, id: &CravingId) -> Result<()>;
}

/// `SQLite` implementation of `CravingRepository`
pub struct SqliteCravingRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteCravingRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a craving from a database row
    fn parse_craving(row: &rusqlite::Row<'_>) -> rusqlite::Result<Craving> {
        let id: String = row.get(0)?;
        let emotions_json: String = row.get(4)?;
        Ok(Craving {
            id: id.parse().unwrap_or_default(),
            description: row.get(1)?,
            intensity: row.get(2)?,
            resistance: row.get(3)?,
            emotions: parse_emotions(&emotions_json),
            logged_at: row.get(5)?,
            is_archived: row.get::<_, i32>(6)? != 0,
        })
    }
}

/// Decode the emotions column; a malformed value degrades to "no emotions"
/// rather than failing the whole fetch.
fn parse_emotions(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(emotions) => normalize_emotions(emotions),
        Err(error) => {
            tracing::debug!("Ignoring malformed emotions column: {}", error);
            Vec::new()
        }
    }
}

impl CravingRepository for SqliteCravingRepository<'_> {
    fn create(&self, craving: &Craving) -> Result<()> {
        let emotions_json = serde_json::to_string(&craving.emotions)?;

        self.conn.execute(
            "INSERT INTO cravings (id, description, intensity, resistance, emotions, logged_at, is_archived)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                craving.id.as_str(),
                craving.description,
                craving.intensity,
                craving.resistance,
                emotions_json,
                craving.logged_at,
                i32::from(craving.is_archived)
            ],
        )?;

        Ok(())
    }

    fn get(&self, id: &CravingId) -> Result<Option<Craving>> {
        let result = self.conn.query_row(
            "SELECT id, description, intensity, resistance, emotions, logged_at, is_archived
             FROM cravings WHERE id = ? AND is_archived = 0",
            params![id.as_str()],
            Self::parse_craving,
        );

        match result {
            Ok(craving) => Ok(Some(craving)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, limit: usize, offset: usize) -> Result<Vec<Craving>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, description, intensity, resistance, emotions, logged_at, is_archived
             FROM cravings
             WHERE is_archived = 0
             ORDER BY logged_at DESC
             LIMIT ? OFFSET ?",
        )?;

        let cravings = stmt
            .query_map(params![limit as i64, offset as i64], Self::parse_craving)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(cravings)
    }

    fn archive(&self, id: &CravingId) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE cravings SET is_archived = 1 WHERE id = ? AND is_archived = 0",
            params![id.as_str()],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use pretty_assertions::assert_eq;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let db = setup();
        let repo = SqliteCravingRepository::new(db.connection());

        let craving = Craving::new("Coffee craving", 8.0, 3.0, vec!["tired".to_string()]);
        repo.create(&craving).unwrap();

        let fetched = repo.get(&craving.id).unwrap().unwrap();
        assert_eq!(fetched, craving);
    }

    #[test]
    fn test_emotions_roundtrip() {
        let db = setup();
        let repo = SqliteCravingRepository::new(db.connection());

        let craving = Craving::new(
            "Sugar",
            5.0,
            5.0,
            vec!["Hungry".to_string(), "bored".to_string()],
        );
        repo.create(&craving).unwrap();

        let fetched = repo.get(&craving.id).unwrap().unwrap();
        assert_eq!(
            fetched.emotions,
            vec!["hungry".to_string(), "bored".to_string()]
        );
    }

    #[test]
    fn test_list_newest_first() {
        let db = setup();
        let repo = SqliteCravingRepository::new(db.connection());

        let mut older = Craving::new("Older", 5.0, 5.0, Vec::new());
        older.logged_at = 1_000;
        let mut newer = Craving::new("Newer", 5.0, 5.0, Vec::new());
        newer.logged_at = 2_000;

        repo.create(&older).unwrap();
        repo.create(&newer).unwrap();

        let cravings = repo.list(10, 0).unwrap();
        assert_eq!(cravings.len(), 2);
        assert_eq!(cravings[0].description, "Newer");
        assert_eq!(cravings[1].description, "Older");
    }

    #[test]
    fn test_list_respects_limit_and_offset() {
        let db = setup();
        let repo = SqliteCravingRepository::new(db.connection());

        for index in 0..5 {
            let mut craving = Craving::new(format!("Craving {index}"), 5.0, 5.0, Vec::new());
            craving.logged_at = i64::from(index);
            repo.create(&craving).unwrap();
        }

        let page = repo.list(2, 1).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].description, "Craving 3");
        assert_eq!(page[1].description, "Craving 2");
    }

    #[test]
    fn test_archive() {
        let db = setup();
        let repo = SqliteCravingRepository::new(db.connection());

        let craving = Craving::new("To archive", 5.0, 5.0, Vec::new());
        repo.create(&craving).unwrap();
        repo.archive(&craving.id).unwrap();

        // Should not find the archived craving
        let fetched = repo.get(&craving.id).unwrap();
        assert!(fetched.is_none());

        // Should not appear in the list
        let cravings = repo.list(10, 0).unwrap();
        assert!(cravings.is_empty());
    }

    #[test]
    fn test_archive_missing_or_already_archived() {
        let db = setup();
        let repo = SqliteCravingRepository::new(db.connection());

        let err = repo.archive(&CravingId::new()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let craving = Craving::new("Twice", 5.0, 5.0, Vec::new());
        repo.create(&craving).unwrap();
        repo.archive(&craving.id).unwrap();

        let err = repo.archive(&craving.id).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_malformed_emotions_degrade_to_empty() {
        let db = setup();
        let repo = SqliteCravingRepository::new(db.connection());

        db.connection()
            .execute(
                "INSERT INTO cravings (id, description, intensity, resistance, emotions, logged_at, is_archived)
                 VALUES (?, 'Bad row', 5.0, 5.0, 'not json', 0, 0)",
                params![CravingId::new().as_str()],
            )
            .unwrap();

        let cravings = repo.list(10, 0).unwrap();
        assert_eq!(cravings.len(), 1);
        assert!(cravings[0].emotions.is_empty());
    }
}
