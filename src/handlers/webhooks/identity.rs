use std::sync::Arc;

use axum::body::Bytes;
use axum::http::HeaderMap;
use axum::{extract::State, response::IntoResponse};
use chrono::Utc;
use diesel::{ExpressionMethods, QueryDsl};
use diesel_async::RunQueryDsl;
use serde_derive::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    domain::user::{UserInsertable, UserProfileChangeset},
    dto::responses::response_data::http_resp,
    errors::code_error::{CodeError, HandlerResponse, code_err},
    init::state::ServerState,
    schema::users,
    util::time::now::tokio_now,
};

#[derive(Deserialize)]
struct WebhookEvent {
    #[serde(rename = "type")]
    event_type: String,
    data: serde_json::Value,
}

#[derive(Deserialize)]
struct EmailAddress {
    email_address: String,
}

#[derive(Deserialize)]
struct UserEventData {
    id: String,
    #[serde(default)]
    email_addresses: Vec<EmailAddress>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
}

impl UserEventData {
    fn primary_email(&self) -> Option<&str> {
        self.email_addresses.first().map(|e| e.email_address.as_str())
    }

    fn display_name(&self) -> Option<String> {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();

        if name.is_empty() { None } else { Some(name) }
    }
}

#[derive(Deserialize)]
struct EmailVerification {
    status: String,
}

#[derive(Deserialize)]
struct LinkedIdentity {
    id: String,
}

#[derive(Deserialize)]
struct EmailEventData {
    #[serde(default)]
    verification: Option<EmailVerification>,
    #[serde(default)]
    linked_to: Vec<LinkedIdentity>,
}

/// Identity-provider webhook: keeps the local `users` table in sync.
/// The raw body participates in signature verification, so this handler
/// takes `Bytes` and parses JSON only after the signature holds up.
pub async fn identity_webhook(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    body: Bytes,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let (msg_id, timestamp, signature) = match (
        headers.get("svix-id").and_then(|v| v.to_str().ok()),
        headers.get("svix-timestamp").and_then(|v| v.to_str().ok()),
        headers.get("svix-signature").and_then(|v| v.to_str().ok()),
    ) {
        (Some(id), Some(ts), Some(sig)) => (id, ts, sig),
        _ => return Err(CodeError::WEBHOOK_HEADERS_MISSING.into()),
    };

    state
        .webhook_verifier()
        .verify(msg_id, timestamp, signature, &body, Utc::now())
        .map_err(|e| code_err(CodeError::WEBHOOK_SIGNATURE_INVALID, e))?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| code_err(CodeError::WEBHOOK_PAYLOAD_INVALID, e))?;

    info!(event_type = %event.event_type, msg_id = %msg_id, "Identity webhook received");

    let mut conn = state
        .get_conn()
        .await
        .map_err(|e| code_err(CodeError::POOL_ERROR, e))?;

    match event.event_type.as_str() {
        "user.created" => {
            let data: UserEventData = serde_json::from_value(event.data)
                .map_err(|e| code_err(CodeError::WEBHOOK_PAYLOAD_INVALID, e))?;

            let email = data
                .primary_email()
                .ok_or_else(|| {
                    code_err(
                        CodeError::WEBHOOK_PAYLOAD_INVALID,
                        "user.created without a primary email",
                    )
                })?
                .to_string();

            let user_name = data
                .display_name()
                .unwrap_or_else(|| email.split('@').next().unwrap_or("unknown").to_string());

            diesel::insert_into(users::table)
                .values(UserInsertable::new(
                    &data.id,
                    &user_name,
                    &email,
                    data.image_url.as_deref(),
                ))
                .on_conflict(users::user_identity_id)
                .do_nothing()
                .execute(&mut conn)
                .await
                .map_err(|e| code_err(CodeError::DB_INSERTION_ERROR, e))?;

            info!(identity_user_id = %data.id, "Created local user from webhook");
        }
        "user.updated" => {
            let data: UserEventData = serde_json::from_value(event.data)
                .map_err(|e| code_err(CodeError::WEBHOOK_PAYLOAD_INVALID, e))?;

            // An empty profile name on update leaves the stored name alone.
            if let Some(user_name) = data.display_name() {
                diesel::update(users::table.filter(users::user_identity_id.eq(&data.id)))
                    .set(UserProfileChangeset {
                        user_name: &user_name,
                        user_avatar_url: data.image_url.as_deref(),
                        user_updated_at: Utc::now(),
                    })
                    .execute(&mut conn)
                    .await
                    .map_err(|e| code_err(CodeError::DB_UPDATE_ERROR, e))?;
            }

            info!(identity_user_id = %data.id, "Updated local user from webhook");
        }
        "user.deleted" => {
            let data: UserEventData = serde_json::from_value(event.data)
                .map_err(|e| code_err(CodeError::WEBHOOK_PAYLOAD_INVALID, e))?;

            let local_user_id: Option<Uuid> = users::table
                .filter(users::user_identity_id.eq(&data.id))
                .select(users::user_id)
                .first::<Uuid>(&mut conn)
                .await
                .map(Some)
                .or_else(|e| match e {
                    diesel::result::Error::NotFound => Ok(None),
                    e => Err(code_err(CodeError::DB_QUERY_ERROR, e)),
                })?;

            // Cascades take the posts, comments, and likes along.
            diesel::delete(users::table.filter(users::user_identity_id.eq(&data.id)))
                .execute(&mut conn)
                .await
                .map_err(|e| code_err(CodeError::DB_DELETION_ERROR, e))?;

            if let Some(user_id) = local_user_id {
                let removed = state.remove_sessions_for_user(user_id).await;
                info!(
                    identity_user_id = %data.id,
                    removed_sessions = removed,
                    "Deleted local user from webhook"
                );
            }
        }
        "email.created" => {
            let data: EmailEventData = serde_json::from_value(event.data)
                .map_err(|e| code_err(CodeError::WEBHOOK_PAYLOAD_INVALID, e))?;

            let is_verified = data
                .verification
                .map(|v| v.status == "verified")
                .unwrap_or(false);

            if is_verified && let Some(linked) = data.linked_to.first() {
                let updated: Vec<Uuid> =
                    diesel::update(users::table.filter(users::user_identity_id.eq(&linked.id)))
                        .set((
                            users::user_is_verified.eq(true),
                            users::user_updated_at.eq(Utc::now()),
                        ))
                        .returning(users::user_id)
                        .get_results(&mut conn)
                        .await
                        .map_err(|e| code_err(CodeError::DB_UPDATE_ERROR, e))?;

                for user_id in updated {
                    state
                        .refresh_sessions_for_user(user_id, None, Some(true))
                        .await;
                }

                info!(identity_user_id = %linked.id, "Marked user verified from email webhook");
            }
        }
        other => {
            // Unknown events are acknowledged so the provider stops retrying.
            error!(event_type = %other, "Ignoring unhandled identity webhook event");
        }
    }

    drop(conn);

    Ok(http_resp((), (), start))
}
