use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use validator::Validate;

use crate::{
    dto::case_dto::CaseJsonRequest,
    error::{Error, Result},
    AppState,
};

#[axum::debug_handler]
pub async fn case_json(State(state): State<AppState>, body: Bytes) -> Result<impl IntoResponse> {
    let service = state.case_service.as_ref().ok_or(Error::MissingCredential)?;

    let payload = CaseJsonRequest::from_body(&body);
    payload.validate()?;

    let record = service.run(&payload.into_mode()).await?;
    Ok((StatusCode::OK, Json(record.into_body())))
}

pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        Json(json!({ "error": "Method Not Allowed" })),
    )
}
