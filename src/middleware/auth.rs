use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{dto::auth::Claims, error::AppError, session::{CurrentUser, Session}, state::AppState};

/// Client-held id of an anonymous cart.
pub const GUEST_ID_HEADER: &str = "x-guest-id";

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: String,
    pub email: String,
    pub display_name: String,
}

impl AuthUser {
    pub fn current_user(&self) -> CurrentUser {
        CurrentUser {
            id: self.user_id,
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

pub fn ensure_role(user: &AuthUser, role: &str) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, "admin")
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match bearer_user(&parts.headers, &state.config.jwt_secret)? {
            Some(user) => Ok(user),
            None => Err(AppError::Unauthorized("Missing Authorization header".into())),
        }
    }
}

/// Optional account plus optional guest cart id. A present but invalid
/// token is rejected rather than silently downgraded to a guest.
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let current_user = bearer_user(&parts.headers, &state.config.jwt_secret)?
            .map(|user| user.current_user());

        let guest_id = match parts.headers.get(GUEST_ID_HEADER) {
            Some(value) => {
                let raw = value
                    .to_str()
                    .map_err(|_| AppError::BadRequest("Invalid x-guest-id header".into()))?;
                Some(
                    Uuid::parse_str(raw.trim())
                        .map_err(|_| AppError::BadRequest("x-guest-id must be a UUID".into()))?,
                )
            }
            None => None,
        };

        Ok(Session {
            current_user,
            guest_id,
        })
    }
}

fn bearer_user(headers: &HeaderMap, secret: &str) -> Result<Option<AuthUser>, AppError> {
    let Some(auth_header) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?
        .trim();

    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    let user_id = Uuid::parse_str(&decoded.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user id in token".into()))?;

    Ok(Some(AuthUser {
        user_id,
        role: decoded.claims.role,
        email: decoded.claims.email,
        display_name: decoded.claims.name,
    }))
}
