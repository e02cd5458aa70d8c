use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    auth::{AuthError, Identity, bearer_token},
    domain::{ActivityView, NewActivity, Transition},
    validation::{RequestInput, RequestValidator},
    web::{ApiError, ApiResult, AppState},
};

pub async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn archive_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<ActivityView>> {
    apply_transition(&state, &id, &headers, Transition::Archive).await
}

pub async fn complete_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<ActivityView>> {
    apply_transition(&state, &id, &headers, Transition::Complete).await
}

pub async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<ActivityView>> {
    apply_transition(&state, &id, &headers, Transition::Delete).await
}

pub async fn get_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<ActivityView>> {
    let (identity, request) =
        authorize(&state, &state.validators.lookup, &headers, Some(id.as_str()))?;
    let id = request.object_id("id")?;
    let view = state.activities.get(identity.user_id(), &id).await?;
    Ok(Json(view))
}

pub async fn list_activities(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<ActivityView>>> {
    let identity = authenticate(&state, bearer_token(&headers)?)?;
    let views = state.activities.list(identity.user_id()).await?;
    Ok(Json(views))
}

pub async fn create_activity(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<ActivityView>)> {
    let (identity, _) = authorize(&state, &state.validators.create, &headers, None)?;
    let draft: NewActivity = serde_json::from_slice(&body)
        .map_err(|err| ApiError::MalformedBody(format!("invalid activity payload: {err}")))?;
    let view = state.activities.create(identity.user_id(), draft).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn apply_transition(
    state: &AppState,
    raw_id: &str,
    headers: &HeaderMap,
    transition: Transition,
) -> ApiResult<Json<ActivityView>> {
    let (identity, request) =
        authorize(state, &state.validators.transition, headers, Some(raw_id))?;
    let id = request.object_id("id")?;
    let user_id = identity.user_id();

    let view = match transition {
        Transition::Complete => state.activities.complete(user_id, &id).await?,
        Transition::Archive => state.activities.archive(user_id, &id).await?,
        Transition::Delete => state.activities.delete(user_id, &id).await?,
    };
    Ok(Json(view))
}

/// Runs the request pipeline: bearer presence, request validation, then
/// token verification.
fn authorize<'a>(
    state: &AppState,
    validator: &RequestValidator,
    headers: &'a HeaderMap,
    id: Option<&'a str>,
) -> ApiResult<(Identity, RequestInput<'a>)> {
    let token = bearer_token(headers)?;

    let mut request = RequestInput::new(headers);
    if let Some(id) = id {
        request = request.with_param("id", id);
    }
    let request = validator.validate(request)?;

    let identity = authenticate(state, token)?;
    Ok((identity, request))
}

fn authenticate(state: &AppState, token: &str) -> ApiResult<Identity> {
    state.tokens.verify(token).map_err(|err| {
        if let AuthError::InvalidToken(reason) = &err {
            debug!(?reason, "bearer token rejected");
        }
        ApiError::from(err)
    })
}
