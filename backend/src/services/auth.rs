//! Authentication service for user registration, login, and token management

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use shared::{validate_email, validate_employee_id, User, UserRole};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

/// Input for registering a staff account
#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub employee_id: Option<String>,
}

/// Response after successful registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub role: UserRole,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// User row from the database
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    employee_id: Option<String>,
    is_active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl UserRow {
    fn role(&self) -> AppResult<UserRole> {
        UserRole::parse(&self.role)
            .ok_or_else(|| AppError::Internal(format!("Unknown role: {}", self.role)))
    }

    fn into_user(self) -> AppResult<User> {
        let role = self.role()?;
        Ok(User {
            id: self.id,
            username: self.username,
            email: self.email,
            role,
            employee_id: self.employee_id,
            is_active: self.is_active,
            created_at: self.created_at,
        })
    }
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            refresh_token_expiry: config.jwt.refresh_token_expiry,
        }
    }

    /// Register a staff account.
    ///
    /// The very first account becomes the admin; everyone after that starts
    /// as an employee (admins promote via staff management if needed).
    pub async fn register(&self, input: RegisterInput) -> AppResult<RegisterResponse> {
        if input.username.trim().is_empty() {
            return Err(AppError::Validation {
                field: "username".to_string(),
                message: "Username cannot be empty".to_string(),
            });
        }

        validate_email(&input.email).map_err(|msg| AppError::Validation {
            field: "email".to_string(),
            message: msg.to_string(),
        })?;

        if input.password.len() < 8 {
            return Err(AppError::Validation {
                field: "password".to_string(),
                message: "Password must be at least 8 characters".to_string(),
            });
        }

        if let Some(employee_id) = &input.employee_id {
            validate_employee_id(employee_id).map_err(|msg| AppError::Validation {
                field: "employee_id".to_string(),
                message: msg.to_string(),
            })?;
        }

        // Check if username already exists
        let username_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(&input.username)
        .fetch_one(&self.db)
        .await?;

        if username_taken {
            return Err(AppError::DuplicateEntry("username".to_string()));
        }

        // Hash password
        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        // First account bootstraps as admin
        let user_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
                .fetch_one(&self.db)
                .await?;
        let role = if user_count == 0 {
            UserRole::Admin
        } else {
            UserRole::Employee
        };

        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (username, email, password_hash, role, employee_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&input.username)
        .bind(&input.email)
        .bind(&password_hash)
        .bind(role.as_str())
        .bind(&input.employee_id)
        .fetch_one(&self.db)
        .await?;

        let tokens = self.generate_tokens(user_id, role)?;
        self.store_refresh_token(user_id, &tokens.refresh_token)
            .await?;

        Ok(RegisterResponse {
            user_id,
            role,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
        })
    }

    /// Authenticate with username and password
    pub async fn login(&self, username: &str, password: &str) -> AppResult<AuthTokens> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, role, employee_id, is_active, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AppError::InvalidCredentials);
        }

        let valid = verify(password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let role = user.role()?;

        // Update last login
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(user.id)
            .execute(&self.db)
            .await?;

        let tokens = self.generate_tokens(user.id, role)?;
        self.store_refresh_token(user.id, &tokens.refresh_token)
            .await?;

        Ok(tokens)
    }

    /// Rotate a refresh token into a fresh token pair
    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthTokens> {
        let token_hash = Self::hash_token(refresh_token);

        let record = sqlx::query_as::<_, (Uuid, String)>(
            r#"
            SELECT rt.user_id, u.role
            FROM refresh_tokens rt
            JOIN users u ON u.id = rt.user_id
            WHERE rt.token_hash = $1
              AND rt.expires_at > NOW()
              AND rt.revoked_at IS NULL
              AND u.is_active = true
            "#,
        )
        .bind(&token_hash)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidToken)?;

        let (user_id, role) = record;
        let role = UserRole::parse(&role)
            .ok_or_else(|| AppError::Internal(format!("Unknown role: {}", role)))?;

        // Revoke old refresh token
        sqlx::query("UPDATE refresh_tokens SET revoked_at = NOW() WHERE token_hash = $1")
            .bind(&token_hash)
            .execute(&self.db)
            .await?;

        let tokens = self.generate_tokens(user_id, role)?;
        self.store_refresh_token(user_id, &tokens.refresh_token)
            .await?;

        Ok(tokens)
    }

    /// Get a user's profile
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, role, employee_id, is_active, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        user.into_user()
    }

    /// List staff accounts (admin view)
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, role, employee_id, is_active, created_at
            FROM users
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    /// Validate access token and return claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(token_data.claims)
    }

    /// Generate access and refresh tokens
    fn generate_tokens(&self, user_id: Uuid, role: UserRole) -> AppResult<AuthTokens> {
        let now = Utc::now();
        let access_exp = now + Duration::seconds(self.access_token_expiry);

        let access_claims = Claims {
            sub: user_id.to_string(),
            role: role.as_str().to_string(),
            exp: access_exp.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &access_claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        // Refresh token (opaque random token)
        let refresh_token = Uuid::new_v4().to_string();

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    /// Store refresh token in database
    async fn store_refresh_token(&self, user_id: Uuid, token: &str) -> AppResult<()> {
        let token_hash = Self::hash_token(token);
        let expires_at = Utc::now() + Duration::seconds(self.refresh_token_expiry);

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(&token_hash)
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Hash a token for storage
    fn hash_token(token: &str) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        format!("{:x}", hasher.finish())
    }
}
