//! Project handlers: creation, listings, teams, and member matching.
//!
//! ```text
//! POST /project {"name":"Engine","description":"gears","required_skills":["rust"]}
//! GET /projects
//! POST /team {"project_id":42}
//! POST /eligible {"project_id":42,"skills":["rust"]}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, ProjectDetails, ProjectDraft, ProjectId, ProjectTeam, UserDetails};
use crate::inbound::http::ApiResult;
use crate::inbound::http::current_user::CurrentUser;
use crate::inbound::http::error::EndpointMessage;
use crate::inbound::http::state::HttpState;

/// Project creation body.
///
/// Clients may send a full project document; `project_id`, `manager_email`,
/// and `created_at` are ignored because the server assigns them.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateProjectRequest {
    /// Project name.
    #[schema(example = "Analytical Engine")]
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Skills the project is looking for.
    #[serde(default)]
    pub required_skills: Vec<String>,
}

/// Body of `POST /team`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TeamRequest {
    /// Project whose team is listed.
    pub project_id: ProjectId,
}

/// Body of `POST /eligible`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct EligibleRequest {
    /// Project looking for members.
    pub project_id: ProjectId,
    /// Skills to match; any overlap qualifies.
    pub skills: Vec<String>,
}

/// Create a project managed by the caller.
#[utoipa::path(
    post,
    path = "/project",
    request_body = CreateProjectRequest,
    responses(
        (status = 200, description = "Project created", body = String, content_type = "text/plain"),
        (status = 400, description = "Malformed body", body = String, content_type = "text/plain"),
        (status = 401, description = "Login required", body = String, content_type = "text/plain"),
        (status = 500, description = "Persistence failure", body = String, content_type = "text/plain")
    ),
    tags = ["projects"],
    operation_id = "createProject"
)]
#[post("/project")]
pub async fn create_project(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<CreateProjectRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let draft = ProjectDraft::try_new(&request.name, &request.description, &request.required_skills)
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    state
        .projects
        .create_project(user.email(), draft)
        .await
        .or_internal("Error while creating project")?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Project creation details successfully inserted in database"))
}

/// Projects the caller manages or has joined, newest first.
#[utoipa::path(
    get,
    path = "/projects",
    responses(
        (status = 200, description = "Caller projects", body = [ProjectDetails]),
        (status = 401, description = "Login required", body = String, content_type = "text/plain"),
        (status = 500, description = "Persistence failure", body = String, content_type = "text/plain")
    ),
    tags = ["projects"],
    operation_id = "userProjects"
)]
#[get("/projects")]
pub async fn user_projects(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<Vec<ProjectDetails>>> {
    let projects = state
        .projects
        .user_projects(user.email())
        .await
        .or_internal("Error retrieving all user projects data")?;
    Ok(web::Json(projects))
}

/// Names of the members of a project team.
#[utoipa::path(
    post,
    path = "/team",
    request_body = TeamRequest,
    responses(
        (status = 200, description = "Team members", body = ProjectTeam),
        (status = 400, description = "Malformed body", body = String, content_type = "text/plain"),
        (status = 500, description = "Persistence failure", body = String, content_type = "text/plain")
    ),
    tags = ["projects"],
    operation_id = "teamMembers"
)]
#[post("/team")]
pub async fn team_members(
    state: web::Data<HttpState>,
    payload: web::Json<TeamRequest>,
) -> ApiResult<web::Json<ProjectTeam>> {
    let team = state
        .projects
        .team(payload.project_id)
        .await
        .or_internal("Error while extracting team members")?;
    Ok(web::Json(team))
}

/// Users with at least one requested skill who are not yet on the team.
#[utoipa::path(
    post,
    path = "/eligible",
    request_body = EligibleRequest,
    responses(
        (status = 200, description = "Candidate members ordered by email", body = [UserDetails]),
        (status = 400, description = "Malformed body", body = String, content_type = "text/plain"),
        (status = 500, description = "Persistence failure", body = String, content_type = "text/plain")
    ),
    tags = ["projects"],
    operation_id = "eligibleMembers"
)]
#[post("/eligible")]
pub async fn eligible_members(
    state: web::Data<HttpState>,
    payload: web::Json<EligibleRequest>,
) -> ApiResult<web::Json<Vec<UserDetails>>> {
    let EligibleRequest { project_id, skills } = payload.into_inner();
    let members = state
        .projects
        .eligible_members(project_id, skills)
        .await
        .or_internal("Error extracting members with required skills")?;
    Ok(web::Json(members))
}
