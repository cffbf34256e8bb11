//! SQLite-backed character storage.
//!
//! One row per remote id holding the serialized record, plus an owners table
//! so the command layer can list a user's characters without decoding every row.

use async_trait::async_trait;
use sheetsync_domain::{Character, RemoteId, UserId};
use sqlx::{Row, SqlitePool};

use crate::infrastructure::ports::{CharacterRepo, RepoError};

const SCHEMA: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS characters (
        remote_id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        sheet_type TEXT,
        record_json TEXT NOT NULL,
        last_synced TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS character_owners (
        remote_id TEXT NOT NULL REFERENCES characters(remote_id),
        user_id INTEGER NOT NULL,
        PRIMARY KEY (remote_id, user_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_characters_name ON characters (upper(name))",
    "CREATE INDEX IF NOT EXISTS idx_characters_type ON characters (sheet_type)",
    "CREATE INDEX IF NOT EXISTS idx_owners_user ON character_owners (user_id)",
];

/// SQLite implementation of the character cache.
pub struct SqliteCharacterRepo {
    pool: SqlitePool,
}

impl SqliteCharacterRepo {
    pub async fn new(db_path: &str) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("connect", e))?;

        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(|e| RepoError::database("schema", e))?;
        }

        Ok(Self { pool })
    }

    fn encode(character: &Character) -> Result<String, RepoError> {
        serde_json::to_string(character).map_err(RepoError::serialization)
    }

    fn decode(json: &str) -> Result<Character, RepoError> {
        serde_json::from_str(json).map_err(RepoError::serialization)
    }

    fn decode_rows(rows: Vec<sqlx::sqlite::SqliteRow>) -> Result<Vec<Character>, RepoError> {
        rows.iter()
            .map(|row| Self::decode(&row.get::<String, _>("record_json")))
            .collect()
    }

    async fn write_owners(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        character: &Character,
    ) -> Result<(), RepoError> {
        for owner in character.owners() {
            sqlx::query(
                "INSERT OR IGNORE INTO character_owners (remote_id, user_id) VALUES (?, ?)",
            )
            .bind(character.remote_id().as_str())
            .bind(owner.get() as i64)
            .execute(&mut **tx)
            .await
            .map_err(|e| RepoError::database("write_owners", e))?;
        }
        Ok(())
    }
}

#[async_trait]
impl CharacterRepo for SqliteCharacterRepo {
    async fn exists(&self, id: &RemoteId) -> Result<bool, RepoError> {
        let row = sqlx::query("SELECT 1 FROM characters WHERE remote_id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("exists", e))?;
        Ok(row.is_some())
    }

    async fn insert(&self, character: &Character) -> Result<(), RepoError> {
        let json = Self::encode(character)?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("insert", e))?;

        sqlx::query(
            r#"
            INSERT INTO characters (remote_id, name, sheet_type, record_json, last_synced)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(character.remote_id().as_str())
        .bind(character.name())
        .bind(character.sheet_type().map(|t| t.as_str()))
        .bind(json)
        .bind(character.last_updated().map(|t| t.to_rfc3339()))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            let duplicate = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if duplicate {
                RepoError::constraint(format!(
                    "character {} already exists",
                    character.remote_id()
                ))
            } else {
                RepoError::database("insert", e)
            }
        })?;

        Self::write_owners(&mut tx, character).await?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("insert", e))
    }

    async fn get(&self, id: &RemoteId) -> Result<Option<Character>, RepoError> {
        let row = sqlx::query("SELECT record_json FROM characters WHERE remote_id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get", e))?;

        match row {
            Some(row) => {
                let json: String = row.get("record_json");
                Ok(Some(Self::decode(&json)?))
            }
            None => Ok(None),
        }
    }

    async fn update(&self, character: &Character) -> Result<(), RepoError> {
        let json = Self::encode(character)?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("update", e))?;

        let result = sqlx::query(
            r#"
            UPDATE characters
            SET name = ?, sheet_type = ?, record_json = ?, last_synced = ?
            WHERE remote_id = ?
            "#,
        )
        .bind(character.name())
        .bind(character.sheet_type().map(|t| t.as_str()))
        .bind(json)
        .bind(character.last_updated().map(|t| t.to_rfc3339()))
        .bind(character.remote_id().as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("update", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Character", character.remote_id()));
        }

        Self::write_owners(&mut tx, character).await?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("update", e))
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Character>, RepoError> {
        let rows = sqlx::query(
            "SELECT record_json FROM characters WHERE upper(name) = upper(?) ORDER BY remote_id",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("find_by_name", e))?;

        Self::decode_rows(rows)
    }

    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Character>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT c.record_json FROM characters c
            JOIN character_owners o ON o.remote_id = c.remote_id
            WHERE o.user_id = ?
            ORDER BY c.name
            "#,
        )
        .bind(owner.get() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_for_owner", e))?;

        Self::decode_rows(rows)
    }
}
