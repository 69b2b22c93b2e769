use std::future::{ready, Ready};

use actix_web::{
    dev::Payload, error::ErrorUnauthorized, Error, FromRequest, HttpMessage, HttpRequest,
};

use crate::middleware::auth::{bearer_claims, Claims};

/// The caller identity behind a request.
///
/// Claims placed by `AuthMiddleware` are used when present. Routes outside
/// the middleware fall back to the bearer header, so `Option<AuthenticatedUser>`
/// works as an optional-auth extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
}

impl From<&Claims> for AuthenticatedUser {
    fn from(claims: &Claims) -> Self {
        AuthenticatedUser {
            user_id: claims.user_id.clone(),
            email: claims.sub.clone(),
        }
    }
}

impl AuthenticatedUser {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(claims) = req.extensions().get::<Claims>() {
            return ready(Ok(AuthenticatedUser::from(claims)));
        }

        match bearer_claims(req.headers()) {
            Some(claims) => ready(Ok(AuthenticatedUser::from(&claims))),
            None => ready(Err(ErrorUnauthorized("User not authenticated"))),
        }
    }
}
