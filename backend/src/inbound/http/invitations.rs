//! Invitation handlers.
//!
//! ```text
//! POST /invite {"project_id":42,"receiver_email":"bob@x.com"}
//! GET /invitations
//! POST /invite/accept {"project_id":42,"receiver_email":"bob@x.com"}
//! POST /invite/reject {"project_id":42,"receiver_email":"bob@x.com"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Email, Error, Invitation, InvitationDecision, InvitationKey, ProjectId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::current_user::CurrentUser;
use crate::inbound::http::error::EndpointMessage;
use crate::inbound::http::state::HttpState;

/// Body shared by invite, accept, and reject.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct InvitationRequest {
    /// Project the invitation refers to.
    pub project_id: ProjectId,
    /// Invited user.
    #[schema(example = "bob@example.com")]
    pub receiver_email: String,
}

impl TryFrom<InvitationRequest> for InvitationKey {
    type Error = Error;

    fn try_from(value: InvitationRequest) -> Result<Self, Self::Error> {
        let receiver_email = Email::new(&value.receiver_email)
            .map_err(|err| Error::invalid_request(format!("receiver_email: {err}")))?;
        Ok(Self {
            project_id: value.project_id,
            receiver_email,
        })
    }
}

fn text(body: &'static str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(body)
}

/// Invite a user to a project.
#[utoipa::path(
    post,
    path = "/invite",
    request_body = InvitationRequest,
    responses(
        (status = 200, description = "Invitation created as pending", body = String, content_type = "text/plain"),
        (status = 400, description = "Malformed body", body = String, content_type = "text/plain"),
        (status = 404, description = "Project or user not found", body = String, content_type = "text/plain"),
        (status = 409, description = "Invitation already exists", body = String, content_type = "text/plain"),
        (status = 500, description = "Persistence failure", body = String, content_type = "text/plain")
    ),
    tags = ["invitations"],
    operation_id = "inviteUser"
)]
#[post("/invite")]
pub async fn invite_user(
    state: web::Data<HttpState>,
    payload: web::Json<InvitationRequest>,
) -> ApiResult<HttpResponse> {
    let key = InvitationKey::try_from(payload.into_inner())?;
    state
        .invitations
        .invite(key)
        .await
        .or_internal("Error while sending invitation")?;
    Ok(text("Invitation request record successfully inserted in database"))
}

/// Pending invitations addressed to the caller.
#[utoipa::path(
    get,
    path = "/invitations",
    responses(
        (status = 200, description = "Pending invitations", body = [Invitation]),
        (status = 401, description = "Login required", body = String, content_type = "text/plain"),
        (status = 500, description = "Persistence failure", body = String, content_type = "text/plain")
    ),
    tags = ["invitations"],
    operation_id = "userInvitations"
)]
#[get("/invitations")]
pub async fn user_invitations(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<Vec<Invitation>>> {
    let invitations = state
        .invitations
        .invitations_for(user.email())
        .await
        .or_internal("Error retrieving user invitations")?;
    Ok(web::Json(invitations))
}

async fn decide(
    state: &HttpState,
    payload: InvitationRequest,
    decision: InvitationDecision,
    failure: &'static str,
) -> ApiResult<()> {
    let key = InvitationKey::try_from(payload)?;
    state
        .invitations
        .decide(key, decision)
        .await
        .or_internal(failure)
}

/// Accept a pending invitation; the receiver joins the team.
#[utoipa::path(
    post,
    path = "/invite/accept",
    request_body = InvitationRequest,
    responses(
        (status = 200, description = "Invitation accepted", body = String, content_type = "text/plain"),
        (status = 400, description = "Malformed body", body = String, content_type = "text/plain"),
        (status = 404, description = "Invitation not found", body = String, content_type = "text/plain"),
        (status = 409, description = "Invitation is no longer pending", body = String, content_type = "text/plain"),
        (status = 500, description = "Persistence failure", body = String, content_type = "text/plain")
    ),
    tags = ["invitations"],
    operation_id = "acceptInvite"
)]
#[post("/invite/accept")]
pub async fn accept_invite(
    state: web::Data<HttpState>,
    payload: web::Json<InvitationRequest>,
) -> ApiResult<HttpResponse> {
    decide(
        &state,
        payload.into_inner(),
        InvitationDecision::Accept,
        "Error while accepting invitation",
    )
    .await?;
    Ok(text("Request successfully accepted"))
}

/// Reject a pending invitation.
#[utoipa::path(
    post,
    path = "/invite/reject",
    request_body = InvitationRequest,
    responses(
        (status = 200, description = "Invitation rejected", body = String, content_type = "text/plain"),
        (status = 400, description = "Malformed body", body = String, content_type = "text/plain"),
        (status = 404, description = "Invitation not found", body = String, content_type = "text/plain"),
        (status = 409, description = "Invitation is no longer pending", body = String, content_type = "text/plain"),
        (status = 500, description = "Persistence failure", body = String, content_type = "text/plain")
    ),
    tags = ["invitations"],
    operation_id = "rejectInvite"
)]
#[post("/invite/reject")]
pub async fn reject_invite(
    state: web::Data<HttpState>,
    payload: web::Json<InvitationRequest>,
) -> ApiResult<HttpResponse> {
    decide(
        &state,
        payload.into_inner(),
        InvitationDecision::Reject,
        "Error while rejecting invitation",
    )
    .await?;
    Ok(text("Request successfully rejected"))
}
