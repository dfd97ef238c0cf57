//! Complaints API handlers.
//!
//! ```text
//! POST /api/v1/complaints            JSON or multipart/form-data
//! GET  /api/v1/complaints            every record, admin only
//! GET  /api/v1/complaints/my         the caller's own records
//! PUT  /api/v1/complaints/{id}       {"status":"InProgress"}
//! ```
//!
//! Creation accepts two payload shapes on one path: a JSON body for
//! complaints without an attachment and a multipart form with an `image`
//! part for complaints with one. A content-type guard picks the handler.

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use actix_web::{HttpResponse, get, guard::GuardContext, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{ComplaintListFilter, CreateComplaintRequest};
use crate::domain::{AttachmentUpload, ComplaintWithOwner, Error, Identity};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// JSON creation body for `POST /api/v1/complaints`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateComplaintBody {
    /// Requested category.
    pub category: String,
    /// Free-text description, 10 to 1000 characters.
    pub description: String,
    /// Requested priority; defaults to Medium when omitted.
    pub priority: Option<String>,
}

/// Multipart creation form for `POST /api/v1/complaints`.
#[derive(Debug, MultipartForm)]
pub struct CreateComplaintForm {
    /// Requested category.
    pub category: Text<String>,
    /// Free-text description, 10 to 1000 characters.
    pub description: Text<String>,
    /// Requested priority; defaults to Medium when omitted.
    pub priority: Option<Text<String>>,
    /// Optional image attachment.
    pub image: Option<TempFile>,
}

/// Status update body for `PUT /api/v1/complaints/{id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusBody {
    /// Target status.
    pub status: String,
}

/// Listing filters for `GET /api/v1/complaints`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListComplaintsQuery {
    /// Restrict to complaints in this status.
    pub status: Option<String>,
    /// Restrict to complaints in this category.
    pub category: Option<String>,
}

/// Owner fields joined onto every complaint payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerBody {
    /// Owner's user identifier.
    pub id: i64,
    /// Owner's display name.
    pub name: String,
    /// Owner's email address.
    pub email: String,
}

/// Complaint payload returned by every complaint endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintBody {
    /// Store-assigned identifier.
    pub id: i64,
    /// Identifier of the creating identity.
    pub owner_id: i64,
    /// Fault category.
    pub category: String,
    /// Free-text description.
    pub description: String,
    /// Urgency.
    pub priority: String,
    /// Workflow status.
    pub status: String,
    /// Stored attachment reference, when one was supplied.
    pub attachment_ref: Option<String>,
    /// Creation instant.
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    /// Last status change instant.
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
    /// Minimal identity fields of the owner.
    pub owner: OwnerBody,
}

/// Filters echoed back by the admin listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFiltersBody {
    /// Status filter, when one was requested.
    pub status: Option<String>,
    /// Category filter, when one was requested.
    pub category: Option<String>,
}

/// Listing payload: records newest first plus their count.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintListBody {
    /// Matching complaints, newest first.
    pub complaints: Vec<ComplaintBody>,
    /// Number of matching complaints.
    pub count: usize,
    /// Applied filters, echoed on the admin listing only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<AppliedFiltersBody>,
}

impl From<ComplaintWithOwner> for ComplaintBody {
    fn from(row: ComplaintWithOwner) -> Self {
        Self {
            id: row.complaint.id,
            owner_id: row.complaint.owner_id,
            category: row.complaint.category.as_str().to_owned(),
            description: row.complaint.description.to_string(),
            priority: row.complaint.priority.as_str().to_owned(),
            status: row.complaint.status.as_str().to_owned(),
            attachment_ref: row.complaint.attachment_ref,
            created_at: row.complaint.created_at,
            updated_at: row.complaint.updated_at,
            owner: OwnerBody {
                id: row.owner.id,
                name: row.owner.name,
                email: row.owner.email,
            },
        }
    }
}

fn list_body(rows: Vec<ComplaintWithOwner>, filters: Option<AppliedFiltersBody>) -> ComplaintListBody {
    let complaints: Vec<ComplaintBody> = rows.into_iter().map(ComplaintBody::from).collect();
    let count = complaints.len();
    ComplaintListBody {
        complaints,
        count,
        filters,
    }
}

/// Resolve the session's user id to a full identity.
///
/// A session whose account no longer exists counts as unauthenticated, not
/// as a missing resource.
async fn resolve_identity(state: &HttpState, session: &SessionContext) -> Result<Identity, Error> {
    let user_id = session.require_user_id()?;
    state
        .identities
        .resolve(user_id)
        .await?
        .ok_or_else(|| Error::unauthorized("login required"))
}

/// Route guard selecting the multipart creation handler.
fn multipart_content_type(ctx: &GuardContext<'_>) -> bool {
    ctx.head()
        .headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim_start().starts_with("multipart/form-data"))
}

async fn upload_from_part(image: TempFile) -> Result<AttachmentUpload, Error> {
    // Absent metadata becomes an empty string, which the format check
    // rejects with the same error a wrong format gets.
    let file_name = image.file_name.unwrap_or_default();
    let content_type = image
        .content_type
        .map(|mime| mime.to_string())
        .unwrap_or_default();
    // The spooled part can be megabytes; keep the read off the executor.
    let bytes = tokio::fs::read(image.file.path())
        .await
        .map_err(|err| Error::internal(format!("failed to read uploaded part: {err}")))?;
    Ok(AttachmentUpload {
        file_name,
        content_type,
        bytes,
    })
}

/// Create a complaint from a JSON body.
///
/// Documented once for both payload shapes; the multipart variant shares the
/// path and adds the attachment-specific failure statuses.
#[utoipa::path(
    post,
    path = "/api/v1/complaints",
    request_body = CreateComplaintBody,
    responses(
        (status = 201, description = "Complaint created", body = ComplaintBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 413, description = "Attachment too large", body = ErrorSchema),
        (status = 415, description = "Unsupported attachment format", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["complaints"],
    operation_id = "createComplaint",
    security(("SessionCookie" = []))
)]
#[post("/complaints")]
pub async fn create_complaint(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateComplaintBody>,
) -> ApiResult<HttpResponse> {
    let caller = resolve_identity(&state, &session).await?;
    let payload = payload.into_inner();

    let created = state
        .complaints
        .create(
            &caller,
            CreateComplaintRequest {
                category: payload.category,
                description: payload.description,
                priority: payload.priority,
            },
            None,
        )
        .await?;
    Ok(HttpResponse::Created().json(ComplaintBody::from(created)))
}

/// Create a complaint from a multipart form with an optional image.
#[post("/complaints", guard = "multipart_content_type")]
pub async fn create_complaint_multipart(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: MultipartForm<CreateComplaintForm>,
) -> ApiResult<HttpResponse> {
    let caller = resolve_identity(&state, &session).await?;
    let form = form.into_inner();
    let attachment = match form.image {
        Some(part) => Some(upload_from_part(part).await?),
        None => None,
    };

    let created = state
        .complaints
        .create(
            &caller,
            CreateComplaintRequest {
                category: form.category.into_inner(),
                description: form.description.into_inner(),
                priority: form.priority.map(Text::into_inner),
            },
            attachment,
        )
        .await?;
    Ok(HttpResponse::Created().json(ComplaintBody::from(created)))
}

/// List every complaint, with optional filters. Admin only.
#[utoipa::path(
    get,
    path = "/api/v1/complaints",
    params(ListComplaintsQuery),
    responses(
        (status = 200, description = "Complaints", body = ComplaintListBody),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["complaints"],
    operation_id = "listComplaints",
    security(("SessionCookie" = []))
)]
#[get("/complaints")]
pub async fn list_complaints(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListComplaintsQuery>,
) -> ApiResult<web::Json<ComplaintListBody>> {
    let caller = resolve_identity(&state, &session).await?;
    let query = query.into_inner();
    let filters = AppliedFiltersBody {
        status: query.status.clone(),
        category: query.category.clone(),
    };

    let rows = state
        .complaints_query
        .list_all(
            &caller,
            ComplaintListFilter {
                status: query.status,
                category: query.category,
            },
        )
        .await?;
    Ok(web::Json(list_body(rows, Some(filters))))
}

/// List the caller's own complaints, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/complaints/my",
    responses(
        (status = 200, description = "The caller's complaints", body = ComplaintListBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["complaints"],
    operation_id = "listMyComplaints",
    security(("SessionCookie" = []))
)]
#[get("/complaints/my")]
pub async fn list_my_complaints(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ComplaintListBody>> {
    let caller = resolve_identity(&state, &session).await?;
    let rows = state.complaints_query.list_mine(&caller).await?;
    Ok(web::Json(list_body(rows, None)))
}

/// Update a complaint's status.
#[utoipa::path(
    put,
    path = "/api/v1/complaints/{id}",
    params(("id" = i64, Path, description = "Complaint identifier")),
    request_body = UpdateStatusBody,
    responses(
        (status = 200, description = "Complaint updated", body = ComplaintBody),
        (status = 400, description = "Invalid status", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Complaint not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["complaints"],
    operation_id = "updateComplaintStatus",
    security(("SessionCookie" = []))
)]
#[put("/complaints/{id}")]
pub async fn update_complaint_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<UpdateStatusBody>,
) -> ApiResult<web::Json<ComplaintBody>> {
    let caller = resolve_identity(&state, &session).await?;

    let updated = state
        .complaints
        .update_status(&caller, path.into_inner(), &payload.status)
        .await?;
    Ok(web::Json(ComplaintBody::from(updated)))
}

#[cfg(test)]
#[path = "complaints_tests.rs"]
mod tests;
