use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::{HeaderMap, AUTHORIZATION},
    Error, HttpMessage,
};
use chrono::{Duration, Utc};
use futures::future::{ready, LocalBoxFuture, Ready};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

const TOKEN_LIFETIME_HOURS: i64 = 24;
const DEV_SECRET: &str = "default_secret";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,     // subject (email)
    pub exp: usize,      // expiration time
    pub iat: usize,      // issued at
    pub user_id: String,
}

fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        warn!("JWT_SECRET not set, using the development secret");
        DEV_SECRET.to_string()
    })
}

pub fn generate_token(email: &str, user_id: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();

    let claims = Claims {
        sub: email.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp() as usize,
        user_id: user_id.to_string(),
    };

    let header = Header::new(Algorithm::HS256);
    encode(&header, &claims, &EncodingKey::from_secret(jwt_secret().as_bytes()))
}

pub fn decode_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp", "iat", "sub", "user_id"]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret().as_bytes()),
        &validation,
    )
    .map(|token_data| token_data.claims)
}

/// Claims from an `Authorization: Bearer <jwt>` header, if present and valid.
pub fn bearer_claims(headers: &HeaderMap) -> Option<Claims> {
    let auth_str = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?;

    match decode_token(token) {
        Ok(claims) => Some(claims),
        Err(err) => {
            debug!("Error decoding token: {:?}", err);
            None
        }
    }
}

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !req.headers().contains_key(AUTHORIZATION) {
            return Box::pin(ready(Err(ErrorUnauthorized("No authorization header"))));
        }

        match bearer_claims(req.headers()) {
            Some(claims) => {
                req.extensions_mut().insert(claims);
                Box::pin(self.service.call(req))
            }
            None => Box::pin(ready(Err(ErrorUnauthorized("Invalid token")))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::HeaderValue;

    #[test]
    fn issued_token_round_trips() {
        let token = generate_token("ada@example.com", "64b7f0c2a1b2c3d4e5f60718").unwrap();
        let claims = decode_token(&token).unwrap();

        assert_eq!(claims.sub, "ada@example.com");
        assert_eq!(claims.user_id, "64b7f0c2a1b2c3d4e5f60718");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn bearer_claims_requires_valid_bearer_token() {
        let token = generate_token("ada@example.com", "user-1").unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        assert_eq!(bearer_claims(&headers).map(|c| c.user_id), Some("user-1".to_string()));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer not-a-jwt"));
        assert!(bearer_claims(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_str(&token).unwrap());
        assert!(bearer_claims(&headers).is_none());

        assert!(bearer_claims(&HeaderMap::new()).is_none());
    }
}
