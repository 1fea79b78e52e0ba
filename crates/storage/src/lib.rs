use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use parking_lot::RwLock;
use sqlx::{Row, SqlitePool};
use tiptrip_core::GeoPoint;
use tracing::debug;

/// Source of a user's current coordinates. `Ok(None)` means the user is unknown or
/// has no registered location.
pub trait UserLocationProvider: Send + Sync {
    async fn get_coordinates(&self, user_id: i64) -> Result<Option<GeoPoint>>;
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    locations: Arc<RwLock<HashMap<i64, GeoPoint>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_location(&self, user_id: i64, location: GeoPoint) {
        self.locations.write().insert(user_id, location);
    }

    pub fn clear_location(&self, user_id: i64) -> bool {
        self.locations.write().remove(&user_id).is_some()
    }
}

impl UserLocationProvider for MemoryStore {
    async fn get_coordinates(&self, user_id: i64) -> Result<Option<GeoPoint>> {
        Ok(self.locations.read().get(&user_id).copied())
    }
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .with_context(|| format!("failed connecting to sqlite at {}", database_url))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
              id INTEGER PRIMARY KEY,
              latitude REAL,
              longitude REAL,
              updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn upsert_location(&self, user_id: i64, location: GeoPoint) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, latitude, longitude, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
              latitude=excluded.latitude,
              longitude=excluded.longitude,
              updated_at=excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed storing location for user {}", user_id))?;

        Ok(())
    }
}

impl UserLocationProvider for SqliteStore {
    async fn get_coordinates(&self, user_id: i64) -> Result<Option<GeoPoint>> {
        let row = sqlx::query(
            r#"
            SELECT latitude, longitude
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            debug!(user_id, "user not found");
            return Ok(None);
        };

        let latitude: Option<f64> = row.get("latitude");
        let longitude: Option<f64> = row.get("longitude");
        Ok(latitude.zip(longitude).map(|(lat, lon)| GeoPoint::new(lat, lon)))
    }
}

#[derive(Clone)]
pub enum Store {
    Memory(MemoryStore),
    Sqlite(SqliteStore),
}

impl Store {
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    pub async fn sqlite(database_url: &str) -> Result<Self> {
        let sqlite = SqliteStore::connect(database_url).await?;
        Ok(Self::Sqlite(sqlite))
    }

    pub async fn upsert_location(&self, user_id: i64, location: GeoPoint) -> Result<()> {
        match self {
            Store::Memory(store) => {
                store.set_location(user_id, location);
                Ok(())
            }
            Store::Sqlite(store) => store.upsert_location(user_id, location).await,
        }
    }
}

impl UserLocationProvider for Store {
    async fn get_coordinates(&self, user_id: i64) -> Result<Option<GeoPoint>> {
        match self {
            Store::Memory(store) => store.get_coordinates(user_id).await,
            Store::Sqlite(store) => store.get_coordinates(user_id).await,
        }
    }
}
