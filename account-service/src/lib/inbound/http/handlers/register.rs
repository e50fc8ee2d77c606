use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::RegisterCommand;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    let Json(body) = payload?;

    state
        .account_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|issued| {
            ApiSuccess::new(
                StatusCode::OK,
                RegisterResponseData {
                    msg: "Registered Successfully".to_string(),
                    token: issued.token,
                },
            )
        })
}

/// HTTP request body for registration (raw JSON)
///
/// Absent fields deserialize as empty strings so they are reported as
/// validation errors alongside the others.
#[derive(Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ApiError> {
        RegisterCommand::parse(self.name, self.email, self.password).map_err(ApiError::from)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub msg: String,
    pub token: String,
}
