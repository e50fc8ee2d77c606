use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::Identity;
use crate::account::models::User;
use crate::inbound::http::router::AppState;

/// Profile of the authenticated caller, read fresh from the store.
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<ApiSuccess<CurrentUserResponseData>, ApiError> {
    state
        .account_service
        .get_user(&identity.user_id)
        .await
        .map_err(ApiError::from)
        .map(|user| {
            ApiSuccess::new(
                StatusCode::OK,
                CurrentUserResponseData {
                    user: (&user).into(),
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUserResponseData {
    pub user: UserData,
}

/// Public view of an account; the password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub followers: Vec<String>,
    pub followings: Vec<String>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.to_string(),
            email: user.email.to_string(),
            followers: user.followers.iter().map(ToString::to_string).collect(),
            followings: user.followings.iter().map(ToString::to_string).collect(),
        }
    }
}
