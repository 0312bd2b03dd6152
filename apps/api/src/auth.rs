//! Identity extraction.
//!
//! Authentication itself is owned by the fronting identity provider; by the
//! time a request reaches this service the proxy has verified the session and
//! stamped the caller's external id and email onto the request headers. The
//! extractor only enforces presence.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// The authenticated caller, as asserted by the auth proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub external_id: String,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for UserIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let external_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or(AppError::Unauthorized)?
            .to_string();

        let email = parts
            .headers
            .get(USER_EMAIL_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        Ok(UserIdentity { external_id, email })
    }
}
