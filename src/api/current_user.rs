//! Current user service
//!
//! Get the current user from the request based on the `X-User-Id` header
//!
//! Whoever sits in front of the API has authenticated the user already, the
//! header is trusted as is

use axum::extract::FromRequestParts;
use axum::http::HeaderName;
use axum::http::request::Parts;

use crate::api::Error;
use crate::notes::UserId;

/// Header carrying the ID of the user making the request
pub static USER_ID_HEADER: HeaderName = HeaderName::from_static("x-user-id");

/// Current user service
#[derive(Clone, Copy, Debug)]
pub struct CurrentUser {
    /// ID of the user, every note operation is scoped to it
    pub id: UserId,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(&USER_ID_HEADER)
            .ok_or_else(|| Error::unauthorized("Missing user identity"))?;

        let id = header
            .to_str()
            .ok()
            .and_then(|value| value.trim().parse::<UserId>().ok())
            .ok_or_else(|| Error::bad_request("Invalid user identity"))?;

        Ok(Self { id })
    }
}
