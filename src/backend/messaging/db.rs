//! Message storage
//!
//! `MessageStore` keeps chat messages. Conversations are read in both
//! directions and ordered by timestamp, oldest first.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::store::StoreError;
use crate::shared::messaging::{ChatMessage, MessageType};

/// Storage for chat messages
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist a new message
    async fn insert(&self, message: ChatMessage) -> Result<ChatMessage, StoreError>;

    /// All messages exchanged between `a` and `b`, ascending by timestamp
    async fn between(&self, a: Uuid, b: Uuid) -> Result<Vec<ChatMessage>, StoreError>;

    /// Delete the listed messages that `participant` sent or received.
    /// Returns how many were removed.
    async fn delete_many(&self, ids: &[Uuid], participant: Uuid) -> Result<u64, StoreError>;
}

/// Message store held in process memory
#[derive(Debug, Default)]
pub struct MemoryMessageStore {
    messages: RwLock<Vec<ChatMessage>>,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn insert(&self, message: ChatMessage) -> Result<ChatMessage, StoreError> {
        self.messages.write().await.push(message.clone());
        Ok(message)
    }

    async fn between(&self, a: Uuid, b: Uuid) -> Result<Vec<ChatMessage>, StoreError> {
        let mut conversation: Vec<ChatMessage> = self
            .messages
            .read()
            .await
            .iter()
            .filter(|m| m.is_between(a, b))
            .cloned()
            .collect();
        // stable sort keeps insertion order for equal timestamps
        conversation.sort_by_key(|m| m.timestamp);
        Ok(conversation)
    }

    async fn delete_many(&self, ids: &[Uuid], participant: Uuid) -> Result<u64, StoreError> {
        let mut messages = self.messages.write().await;
        let before = messages.len();
        messages.retain(|m| !(ids.contains(&m.id) && m.involves(participant)));
        Ok((before - messages.len()) as u64)
    }
}

/// Message store backed by the `messages` table
#[derive(Debug, Clone)]
pub struct PgMessageStore {
    pool: PgPool,
}

impl PgMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_message(row: &sqlx::postgres::PgRow) -> Result<ChatMessage, StoreError> {
    let kind: String = row.try_get("message_type")?;
    let message_type = MessageType::from_str(&kind).ok_or_else(|| {
        StoreError::Database(sqlx::Error::Decode(
            format!("unknown message type {kind:?}").into(),
        ))
    })?;

    Ok(ChatMessage {
        id: row.try_get("id")?,
        sender_id: row.try_get("sender_id")?,
        recipient_id: row.try_get("recipient_id")?,
        message_type,
        message: row.try_get("message")?,
        image_url: row.try_get("image_url")?,
        timestamp: row.try_get("created_at")?,
    })
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn insert(&self, message: ChatMessage) -> Result<ChatMessage, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, sender_id, recipient_id, message_type, message, image_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(message.id)
        .bind(message.sender_id)
        .bind(message.recipient_id)
        .bind(message.message_type.as_str())
        .bind(&message.message)
        .bind(&message.image_url)
        .bind(message.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(message)
    }

    async fn between(&self, a: Uuid, b: Uuid) -> Result<Vec<ChatMessage>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, sender_id, recipient_id, message_type, message, image_url, created_at
            FROM messages
            WHERE (sender_id = $1 AND recipient_id = $2)
               OR (sender_id = $2 AND recipient_id = $1)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_message).collect()
    }

    async fn delete_many(&self, ids: &[Uuid], participant: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM messages
            WHERE id = ANY($1)
              AND (sender_id = $2 OR recipient_id = $2)
            "#,
        )
        .bind(ids.to_vec())
        .bind(participant)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
