//! Authentication middleware
//!
//! JWT authentication and role-based access control middleware

use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use shared::UserRole;

use crate::error::{AppError, ErrorResponse};

/// Authenticated user information extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: uuid::Uuid,
    pub role: UserRole,
}

impl AuthUser {
    /// Guard for admin-only operations
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(AppError::InsufficientPermissions)
        }
    }
}

/// Authentication middleware that validates JWT tokens
///
/// Extracts the bearer token from the Authorization header and decodes it
/// inline to avoid state dependency issues.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    // Extract Authorization header
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    // Get JWT secret from environment (fallback for middleware without state)
    let jwt_secret = std::env::var("WBM__JWT__SECRET")
        .or_else(|_| std::env::var("WBM_JWT_SECRET"))
        .unwrap_or_else(|_| "development-secret-key".to_string());

    let claims = match decode_jwt(token, &jwt_secret) {
        Ok(claims) => claims,
        Err(msg) => {
            return unauthorized_response(&msg);
        }
    };

    let user_id = match uuid::Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => return unauthorized_response("Invalid user ID in token"),
    };

    let role = match UserRole::parse(&claims.role) {
        Some(role) => role,
        None => return unauthorized_response("Invalid role in token"),
    };

    // Create AuthUser and insert into request extensions
    let auth_user = AuthUser { user_id, role };

    request.extensions_mut().insert(auth_user);

    next.run(request).await
}

/// JWT claims structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Claims {
    sub: String,
    role: String,
    exp: i64,
    iat: i64,
}

/// Decode and validate JWT token
fn decode_jwt(token: &str, secret: &str) -> Result<Claims, String> {
    use jsonwebtoken::{decode, DecodingKey, Validation};

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}

/// Create unauthorized response
fn unauthorized_response(message: &str) -> Response {
    let error = ErrorResponse {
        error: crate::error::ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            field: None,
        },
    };

    (StatusCode::UNAUTHORIZED, Json(error)).into_response()
}

/// Extractor for authenticated user
/// Use this in handlers to get the current user
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                let error = ErrorResponse {
                    error: crate::error::ErrorDetail {
                        code: "UNAUTHORIZED".to_string(),
                        message: "Authentication required".to_string(),
                        field: None,
                    },
                };
                (StatusCode::UNAUTHORIZED, Json(error))
            })
    }
}
