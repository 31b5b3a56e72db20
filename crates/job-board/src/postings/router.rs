use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use super::domain::{ApplicationId, CommentId, MemberId, PostId};
use super::forms::{ApplicationForm, CommentForm, DecisionForm, ModifyPostForm, RegisterPostForm};
use super::repository::{
    JobPostRepository, MemberDirectory, NotificationPublisher, RepositoryError,
};
use super::service::{JobPostService, JobPostServiceError};

/// Header carrying the authenticated username, set by the fronting auth layer.
pub const ACTOR_HEADER: &str = "x-username";

type Shared<R, M, N> = Arc<JobPostService<R, M, N>>;

/// Router builder exposing the posting lifecycle over HTTP.
pub fn job_post_router<R, M, N>(service: Shared<R, M, N>) -> Router
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/job-posts",
            post(create_post_handler::<R, M, N>).get(list_posts_handler::<R, M, N>),
        )
        .route(
            "/api/v1/job-posts/:id",
            get(get_post_handler::<R, M, N>)
                .put(modify_post_handler::<R, M, N>)
                .delete(delete_post_handler::<R, M, N>),
        )
        .route(
            "/api/v1/admin/job-posts/:id",
            axum::routing::delete(admin_delete_post_handler::<R, M, N>),
        )
        .route(
            "/api/v1/job-posts/:id/interest",
            post(express_interest_handler::<R, M, N>)
                .delete(withdraw_interest_handler::<R, M, N>),
        )
        .route(
            "/api/v1/job-posts/:id/deadline",
            post(deadline_handler::<R, M, N>),
        )
        .route(
            "/api/v1/job-posts/:id/applications",
            post(apply_handler::<R, M, N>).get(list_applications_handler::<R, M, N>),
        )
        .route(
            "/api/v1/job-posts/:id/applications/:application_id",
            put(decide_application_handler::<R, M, N>)
                .delete(cancel_application_handler::<R, M, N>),
        )
        .route(
            "/api/v1/job-posts/:id/comments",
            post(write_comment_handler::<R, M, N>).get(list_comments_handler::<R, M, N>),
        )
        .route(
            "/api/v1/job-posts/:id/comments/:comment_id",
            put(modify_comment_handler::<R, M, N>).delete(delete_comment_handler::<R, M, N>),
        )
        .route(
            "/api/v1/members/:member/job-posts",
            get(member_posts_handler::<R, M, N>),
        )
        .route(
            "/api/v1/members/:member/interests",
            get(member_interests_handler::<R, M, N>),
        )
        .with_state(service)
}

impl IntoResponse for JobPostServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            JobPostServiceError::MemberNotFound(_)
            | JobPostServiceError::PostNotFound(_)
            | JobPostServiceError::ApplicationNotFound(_)
            | JobPostServiceError::CommentNotFound(_) => StatusCode::NOT_FOUND,
            JobPostServiceError::NotAllowed(_) => StatusCode::FORBIDDEN,
            JobPostServiceError::InvalidForm(_) => StatusCode::UNPROCESSABLE_ENTITY,
            JobPostServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            JobPostServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

fn actor(headers: &HeaderMap) -> Option<String> {
    headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn unauthenticated() -> Response {
    let payload = json!({ "error": format!("missing {ACTOR_HEADER} header") });
    (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
}

fn respond<T: Serialize>(status: StatusCode, result: Result<T, JobPostServiceError>) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(err) => err.into_response(),
    }
}

fn respond_empty(result: Result<(), JobPostServiceError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_post_handler<R, M, N>(
    State(service): State<Shared<R, M, N>>,
    headers: HeaderMap,
    Json(form): Json<RegisterPostForm>,
) -> Response
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(actor) = actor(&headers) else {
        return unauthenticated();
    };
    let result = service
        .write_post(&actor, form)
        .map(|id| json!({ "id": id }));
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn list_posts_handler<R, M, N>(State(service): State<Shared<R, M, N>>) -> Response
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    respond(StatusCode::OK, service.find_all())
}

/// Each read of a posting counts as a view.
pub(crate) async fn get_post_handler<R, M, N>(
    State(service): State<Shared<R, M, N>>,
    Path(id): Path<u64>,
) -> Response
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    let id = PostId(id);
    let result = service
        .increase_view_count(id)
        .and_then(|()| service.find_by_id(id));
    respond(StatusCode::OK, result)
}

pub(crate) async fn modify_post_handler<R, M, N>(
    State(service): State<Shared<R, M, N>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(form): Json<ModifyPostForm>,
) -> Response
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(actor) = actor(&headers) else {
        return unauthenticated();
    };
    respond_empty(service.modify_post(&actor, PostId(id), form))
}

pub(crate) async fn delete_post_handler<R, M, N>(
    State(service): State<Shared<R, M, N>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(actor) = actor(&headers) else {
        return unauthenticated();
    };
    respond_empty(service.delete_post(&actor, PostId(id)))
}

pub(crate) async fn admin_delete_post_handler<R, M, N>(
    State(service): State<Shared<R, M, N>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(actor) = actor(&headers) else {
        return unauthenticated();
    };
    respond_empty(service.delete_job_post(&actor, PostId(id)))
}

pub(crate) async fn express_interest_handler<R, M, N>(
    State(service): State<Shared<R, M, N>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(actor) = actor(&headers) else {
        return unauthenticated();
    };
    respond_empty(service.express_interest(&actor, PostId(id)))
}

pub(crate) async fn withdraw_interest_handler<R, M, N>(
    State(service): State<Shared<R, M, N>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(actor) = actor(&headers) else {
        return unauthenticated();
    };
    respond_empty(service.withdraw_interest(&actor, PostId(id)))
}

pub(crate) async fn deadline_handler<R, M, N>(
    State(service): State<Shared<R, M, N>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(actor) = actor(&headers) else {
        return unauthenticated();
    };
    let result = service
        .close_deadline_applications(&actor, PostId(id))
        .map(|removed| json!({ "removed": removed }));
    respond(StatusCode::OK, result)
}

pub(crate) async fn apply_handler<R, M, N>(
    State(service): State<Shared<R, M, N>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(form): Json<ApplicationForm>,
) -> Response
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(actor) = actor(&headers) else {
        return unauthenticated();
    };
    let result = service
        .apply(&actor, PostId(id), form)
        .map(|application_id| json!({ "id": application_id }));
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn list_applications_handler<R, M, N>(
    State(service): State<Shared<R, M, N>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(actor) = actor(&headers) else {
        return unauthenticated();
    };
    respond(StatusCode::OK, service.find_applications(&actor, PostId(id)))
}

pub(crate) async fn decide_application_handler<R, M, N>(
    State(service): State<Shared<R, M, N>>,
    headers: HeaderMap,
    Path((id, application_id)): Path<(u64, u64)>,
    Json(form): Json<DecisionForm>,
) -> Response
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(actor) = actor(&headers) else {
        return unauthenticated();
    };
    let result = service
        .decide_application(&actor, PostId(id), ApplicationId(application_id), form.approve)
        .map(|status| json!({ "status": status.label() }));
    respond(StatusCode::OK, result)
}

pub(crate) async fn cancel_application_handler<R, M, N>(
    State(service): State<Shared<R, M, N>>,
    headers: HeaderMap,
    Path((id, application_id)): Path<(u64, u64)>,
) -> Response
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(actor) = actor(&headers) else {
        return unauthenticated();
    };
    respond_empty(service.cancel_application(&actor, PostId(id), ApplicationId(application_id)))
}

pub(crate) async fn write_comment_handler<R, M, N>(
    State(service): State<Shared<R, M, N>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(form): Json<CommentForm>,
) -> Response
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(actor) = actor(&headers) else {
        return unauthenticated();
    };
    let result = service
        .write_comment(&actor, PostId(id), form)
        .map(|comment_id| json!({ "id": comment_id }));
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn list_comments_handler<R, M, N>(
    State(service): State<Shared<R, M, N>>,
    Path(id): Path<u64>,
) -> Response
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    respond(StatusCode::OK, service.find_comments(PostId(id)))
}

pub(crate) async fn modify_comment_handler<R, M, N>(
    State(service): State<Shared<R, M, N>>,
    headers: HeaderMap,
    Path((id, comment_id)): Path<(u64, u64)>,
    Json(form): Json<CommentForm>,
) -> Response
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(actor) = actor(&headers) else {
        return unauthenticated();
    };
    respond_empty(service.modify_comment(&actor, PostId(id), CommentId(comment_id), form))
}

pub(crate) async fn delete_comment_handler<R, M, N>(
    State(service): State<Shared<R, M, N>>,
    headers: HeaderMap,
    Path((id, comment_id)): Path<(u64, u64)>,
) -> Response
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(actor) = actor(&headers) else {
        return unauthenticated();
    };
    respond_empty(service.delete_comment(&actor, PostId(id), CommentId(comment_id)))
}

pub(crate) async fn member_posts_handler<R, M, N>(
    State(service): State<Shared<R, M, N>>,
    Path(username): Path<String>,
) -> Response
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    respond(StatusCode::OK, service.find_by_username(&username))
}

pub(crate) async fn member_interests_handler<R, M, N>(
    State(service): State<Shared<R, M, N>>,
    Path(member_id): Path<u64>,
) -> Response
where
    R: JobPostRepository + 'static,
    M: MemberDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    respond(
        StatusCode::OK,
        service.find_by_interest_and_member(MemberId(member_id)),
    )
}
