//! Event Repository Implementation
//!
//! PostgreSQL implementation of the EventRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::domain::{Event, EventRepository, NewEvent};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: i64,
    owner_id: i64,
    title: String,
    description: String,
    date: NaiveDate,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            description: row.description,
            date: row.date,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL event repository implementation.
#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, AppError> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, owner_id, title, description, date, image_url, created_at, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Event::from))
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Event>, AppError> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, owner_id, title, description, date, image_url, created_at, updated_at
            FROM events
            WHERE owner_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn create(&self, event: NewEvent) -> Result<Event, AppError> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (id, owner_id, title, description, date, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner_id, title, description, date, image_url, created_at, updated_at
            "#,
        )
        .bind(event.id)
        .bind(event.owner_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        // owner_id is never part of the SET list.
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            UPDATE events
            SET title = $2, description = $3, date = $4, image_url = $5, updated_at = $6
            WHERE id = $1
            RETURNING id, owner_id, title, description, date, image_url, created_at, updated_at
            "#,
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.image_url)
        .bind(event.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Event::from)
            .ok_or_else(|| AppError::NotFound(format!("Event {}", event.id)))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
