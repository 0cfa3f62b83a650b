use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{ArtifactError, ArtifactStore, CompiledArtifact};
use crate::compiler::StrategyKind;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS compiled_artifacts (
        identifier TEXT PRIMARY KEY,
        reference TEXT NOT NULL,
        strategy TEXT NOT NULL,
        size_bytes INTEGER NOT NULL,
        compiled_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_compiled_artifacts_compiled_at
        ON compiled_artifacts(compiled_at);
"#;

/// SQLite-backed artifact store
pub struct SqliteArtifactStore {
    conn: Mutex<Connection>,
}

impl SqliteArtifactStore {
    /// Open (or create) the database file and its tables
    pub fn new(path: &Path) -> Result<Self, ArtifactError> {
        let conn = Connection::open(path).map_err(|e| ArtifactError::Database(e.to_string()))?;
        Self::init(conn)
    }

    /// In-memory store for tests
    pub fn in_memory() -> Result<Self, ArtifactError> {
        let conn =
            Connection::open_in_memory().map_err(|e| ArtifactError::Database(e.to_string()))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, ArtifactError> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| ArtifactError::Database(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, ArtifactError> {
        self.conn
            .lock()
            .map_err(|_| ArtifactError::Database("connection lock poisoned".to_string()))
    }

    fn row_to_artifact(row: &Row<'_>) -> rusqlite::Result<(String, String, String, i64, String)> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
    }

    fn decode(
        (identifier, reference, strategy, size_bytes, compiled_at): (
            String,
            String,
            String,
            i64,
            String,
        ),
    ) -> Result<CompiledArtifact, ArtifactError> {
        let strategy: StrategyKind = strategy.parse().map_err(ArtifactError::Database)?;
        let compiled_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&compiled_at)
            .map_err(|e| ArtifactError::Database(format!("Invalid timestamp: {}", e)))?
            .into();

        Ok(CompiledArtifact {
            identifier,
            reference,
            strategy,
            size_bytes: size_bytes.max(0) as u64,
            compiled_at,
        })
    }
}

impl ArtifactStore for SqliteArtifactStore {
    fn record(&self, artifact: &CompiledArtifact) -> Result<(), ArtifactError> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO compiled_artifacts (identifier, reference, strategy, size_bytes, compiled_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(identifier) DO UPDATE SET
                reference = excluded.reference,
                strategy = excluded.strategy,
                size_bytes = excluded.size_bytes,
                compiled_at = excluded.compiled_at",
            params![
                artifact.identifier,
                artifact.reference,
                artifact.strategy.as_str(),
                artifact.size_bytes as i64,
                artifact
                    .compiled_at
                    .to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )
        .map_err(|e| ArtifactError::Database(e.to_string()))?;

        Ok(())
    }

    fn get(&self, identifier: &str) -> Result<Option<CompiledArtifact>, ArtifactError> {
        let conn = self.conn()?;

        let row = conn
            .query_row(
                "SELECT identifier, reference, strategy, size_bytes, compiled_at
                 FROM compiled_artifacts WHERE identifier = ?1",
                params![identifier],
                Self::row_to_artifact,
            )
            .optional()
            .map_err(|e| ArtifactError::Database(e.to_string()))?;

        row.map(Self::decode).transpose()
    }

    fn list(&self, limit: i64, offset: i64) -> Result<Vec<CompiledArtifact>, ArtifactError> {
        let conn = self.conn()?;

        let mut stmt = conn
            .prepare(
                "SELECT identifier, reference, strategy, size_bytes, compiled_at
                 FROM compiled_artifacts
                 ORDER BY compiled_at DESC, identifier ASC
                 LIMIT ?1 OFFSET ?2",
            )
            .map_err(|e| ArtifactError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![limit, offset], Self::row_to_artifact)
            .map_err(|e| ArtifactError::Database(e.to_string()))?;

        let mut artifacts = Vec::new();
        for row in rows {
            let row = row.map_err(|e| ArtifactError::Database(e.to_string()))?;
            artifacts.push(Self::decode(row)?);
        }
        Ok(artifacts)
    }

    fn count(&self) -> Result<i64, ArtifactError> {
        let conn = self.conn()?;
        conn.query_row("SELECT COUNT(*) FROM compiled_artifacts", [], |row| {
            row.get(0)
        })
        .map_err(|e| ArtifactError::Database(e.to_string()))
    }
}
