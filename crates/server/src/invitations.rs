//! Invitation API endpoints.
//!
//! Sending writes the record first and mails second; a mailer failure is
//! surfaced in `emailSent`, never as an error status.

use api_types::invitation::{InvitationNew, InvitationResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::Invitation;
use uuid::Uuid;

use crate::ServerError;
use crate::server::{AuthUser, ServerState};

pub async fn send(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<InvitationNew>,
) -> Result<(StatusCode, Json<InvitationResponse>), ServerError> {
    let invitation = state
        .engine
        .send_invitation(&user.0, group_id, &payload.email, Utc::now())
        .await?;

    let subject = format!("{} invited you to share expenses", invitation.inviter_name);
    let html = format!(
        "<p>{} invited you to join their expense group.</p>\
         <p>Open the app and enter the group's invite code to accept.</p>",
        invitation.inviter_name
    );
    let email_sent = state.mailer.send(&invitation.email, &subject, &html).await;

    Ok((
        StatusCode::CREATED,
        Json(InvitationResponse {
            id: invitation.id,
            email: invitation.email,
            status: invitation.status,
            email_sent,
        }),
    ))
}

pub async fn pending(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<Vec<Invitation>>, ServerError> {
    let invitations = state.engine.pending_invitations(&user.0, group_id).await?;
    Ok(Json(invitations))
}

pub async fn revoke(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.revoke_invitation(&user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
