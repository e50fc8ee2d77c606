use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::account::models::Identity;

/// Echo the identity the gate resolved from the caller's token.
pub async fn identity(
    Extension(identity): Extension<Identity>,
) -> ApiSuccess<IdentityResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        IdentityResponseData {
            identity: (&identity).into(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityResponseData {
    pub identity: IdentityData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityData {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&Identity> for IdentityData {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.user_id.to_string(),
            name: identity.name.clone(),
            email: identity.email.clone(),
        }
    }
}
