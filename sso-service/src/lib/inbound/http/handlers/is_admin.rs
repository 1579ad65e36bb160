use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::models::AccountId;
use crate::inbound::http::router::AppState;

pub async fn is_admin(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<IsAdminResponseData>, ApiError> {
    let user_id = user_id
        .parse::<i64>()
        .map(AccountId)
        .map_err(|e| ApiError::BadRequest(format!("Invalid user ID: {}", e)))?;

    state
        .auth_service
        .is_admin(user_id)
        .await
        .map_err(ApiError::from)
        .map(|is_admin| ApiSuccess::new(StatusCode::OK, IsAdminResponseData { is_admin }))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IsAdminResponseData {
    pub is_admin: bool,
}
