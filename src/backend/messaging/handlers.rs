/**
 * Messaging HTTP Handlers
 *
 * - `POST /messages` - multipart message send, with optional image file
 * - `GET /messages/{senderId}/{recipientId}` - conversation in both directions
 * - `POST /deleteMessages` - bulk delete by id
 *
 * Messages carry no relationship logic: any two registered users may
 * exchange them.
 */

use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};
use bytes::Bytes;
use std::collections::HashMap;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::middleware::AuthenticatedUser;
use crate::backend::server::state::AppState;
use crate::shared::messaging::{
    ChatMessage, DeleteMessagesRequest, DeleteMessagesResponse, MessageType, MessageView,
    SenderSummary,
};
use crate::shared::SharedError;

/// Fields collected from the multipart form
#[derive(Debug, Default)]
struct MessageForm {
    sender_id: Option<Uuid>,
    recipient_id: Option<Uuid>,
    message_type: Option<MessageType>,
    message_text: Option<String>,
    image: Option<(String, Bytes)>,
}

fn bad_request(message: impl Into<String>) -> BackendError {
    BackendError::handler(StatusCode::BAD_REQUEST, message)
}

fn parse_uuid(field: &str, value: &str) -> Result<Uuid, BackendError> {
    Uuid::parse_str(value.trim())
        .map_err(|_| SharedError::validation(field, "must be a valid id").into())
}

async fn read_form(mut multipart: Multipart) -> Result<MessageForm, BackendError> {
    let mut form = MessageForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "imageFile" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("Failed to read image: {}", e)))?;
                if !data.is_empty() {
                    form.image = Some((file_name, data));
                }
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| bad_request(format!("Failed to read field {}: {}", name, e)))?;
                match name.as_str() {
                    "senderId" => form.sender_id = Some(parse_uuid("senderId", &value)?),
                    "recipientId" | "recepientId" => {
                        form.recipient_id = Some(parse_uuid("recipientId", &value)?)
                    }
                    "messageType" => {
                        let kind = MessageType::from_str(&value).ok_or_else(|| {
                            SharedError::validation("messageType", "must be text or image")
                        })?;
                        form.message_type = Some(kind);
                    }
                    "messageText" => form.message_text = Some(value),
                    other => tracing::debug!("Ignoring multipart field {}", other),
                }
            }
        }
    }

    Ok(form)
}

/// Send a message
///
/// The caller must be the sender. For image messages the uploaded file is
/// saved first and its public path stored on the message.
pub async fn send_message(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    multipart: Multipart,
) -> Result<Json<ChatMessage>, BackendError> {
    let form = read_form(multipart).await?;

    let sender_id = form
        .sender_id
        .ok_or_else(|| SharedError::validation("senderId", "is required"))?;
    let recipient_id = form
        .recipient_id
        .ok_or_else(|| SharedError::validation("recipientId", "is required"))?;
    auth.ensure_is(sender_id)?;

    if app_state.users.find_by_id(recipient_id).await?.is_none() {
        return Err(BackendError::handler(StatusCode::NOT_FOUND, "Recipient not found"));
    }

    let message = match form.message_type.unwrap_or_default() {
        MessageType::Text => {
            let text = form.message_text.unwrap_or_default();
            if text.trim().is_empty() {
                return Err(SharedError::validation("messageText", "cannot be empty").into());
            }
            ChatMessage::text(sender_id, recipient_id, text)
        }
        MessageType::Image => {
            let (file_name, data) = form
                .image
                .ok_or_else(|| bad_request("Image message requires an imageFile"))?;
            let image_url = app_state.uploads.save(&file_name, data).await.map_err(|e| {
                tracing::error!("Failed to store upload {}: {}", file_name, e);
                e
            })?;
            let caption = form.message_text.filter(|t| !t.trim().is_empty());
            ChatMessage::image(sender_id, recipient_id, image_url, caption)
        }
    };

    let image_url = message.image_url.clone();
    let stored = match app_state.messages.insert(message).await {
        Ok(stored) => stored,
        Err(e) => {
            // Nothing references the attachment once the insert fails.
            if let Some(path) = image_url {
                if let Err(remove_err) = app_state.uploads.remove(&path).await {
                    tracing::warn!(%path, error = %remove_err, "Failed to remove orphaned upload");
                }
            }
            return Err(e.into());
        }
    };
    tracing::info!(
        message_id = %stored.id,
        %sender_id,
        %recipient_id,
        kind = stored.message_type.as_str(),
        "Message sent"
    );
    Ok(Json(stored))
}

/// List the conversation between two users, oldest first
///
/// The sender of each message is populated with `{id, name}`.
pub async fn get_messages(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path((sender_id, recipient_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<MessageView>>, BackendError> {
    auth.ensure_one_of(sender_id, recipient_id)?;

    let messages = app_state.messages.between(sender_id, recipient_id).await?;

    let names: HashMap<Uuid, String> = app_state
        .users
        .find_many(&[sender_id, recipient_id])
        .await?
        .into_iter()
        .map(|user| (user.id, user.name))
        .collect();

    let views = messages
        .into_iter()
        .map(|message| MessageView {
            id: message.id,
            sender: SenderSummary {
                id: message.sender_id,
                name: names.get(&message.sender_id).cloned().unwrap_or_default(),
            },
            recipient_id: message.recipient_id,
            message_type: message.message_type,
            message: message.message,
            image_url: message.image_url,
            timestamp: message.timestamp,
        })
        .collect();

    Ok(Json(views))
}

/// Delete messages by id
///
/// Only messages the caller sent or received are removed.
pub async fn delete_messages(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    payload: Result<Json<DeleteMessagesRequest>, JsonRejection>,
) -> Result<Json<DeleteMessagesResponse>, BackendError> {
    let Json(request) = payload.map_err(|_| bad_request("invalid messages"))?;
    if request.messages.is_empty() {
        return Err(bad_request("invalid messages"));
    }

    let deleted = app_state
        .messages
        .delete_many(&request.messages, auth.user_id)
        .await?;
    tracing::info!(user_id = %auth.user_id, requested = request.messages.len(), deleted, "Messages deleted");

    Ok(Json(DeleteMessagesResponse {
        message: "Messages deleted successfully".to_string(),
        deleted,
    }))
}
