use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::auth::{extract_bearer_token, AuthError, AuthService, UserSession};

/// Extractor gating every authenticated handler: pulls the bearer token from
/// the `Authorization` header and validates it, rejecting with 401 otherwise.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserSession);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AuthService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .ok_or(AuthError::MissingAuthHeader)?;

        let token = extract_bearer_token(auth_header)?;
        let session = AuthService::from_ref(state).authenticate(token)?;

        Ok(CurrentUser(session))
    }
}
