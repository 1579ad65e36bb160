use std::str::FromStr;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use email_address::EmailAddress;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequestBody>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    EmailAddress::from_str(&body.email)
        .map_err(|e| ApiError::UnprocessableEntity(format!("Invalid email: {}", e)))?;

    state
        .auth_service
        .register(&body.email, &body.password)
        .await
        .map_err(ApiError::from)
        .map(|account_id| {
            ApiSuccess::new(
                StatusCode::CREATED,
                RegisterResponseData {
                    user_id: account_id.0,
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub user_id: i64,
}
