/// User endpoints
///
/// Registration and login are public. Every other operation requires a
/// bearer token and is restricted to the account owner: user records are
/// private, so no handler ever exposes another account or a password hash.
///
/// # Endpoints
///
/// - `POST /api/users` - Register a new user
/// - `POST /api/users/login` - Login and get a token
/// - `GET /api/users` - List users visible to the caller
/// - `GET /api/users/:id` - Get a user
/// - `PATCH /api/users/:id` - Update a user
/// - `DELETE /api/users/:id` - Delete a user

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::MessageResponse,
    validation,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use fiscus_shared::{
    auth::{
        extract::AuthContext,
        jwt::{self, Claims},
        ownership, password,
    },
    models::user::{CreateUser, PublicUser, UpdateUser, User},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(custom(function = crate::validation::not_blank, message = "Name is required"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,

    /// Plaintext password, hashed before storage
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Created user, without the password hash
    pub user: PublicUser,

    /// Bearer token for the new account (24h)
    pub token: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Human-readable confirmation
    pub message: String,

    /// Bearer token (24h)
    pub token: String,

    /// Authenticated user, without the password hash
    pub user: PublicUser,
}

/// Update request; absent fields stay unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New display name
    #[validate(custom(function = crate::validation::not_blank, message = "Name cannot be empty"))]
    pub name: Option<String>,

    /// New email address
    #[validate(email(message = "Must be a valid email address"))]
    pub email: Option<String>,

    /// New password, hashed before storage
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
}

/// Registers a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/users
/// Content-Type: application/json
///
/// {
///   "name": "Jane Doe",
///   "email": "jane@example.com",
///   "password": "secret1"
/// }
/// ```
///
/// # Response
///
/// `201 Created` with the new user and a bearer token:
///
/// ```json
/// {
///   "user": { "id": "uuid", "name": "Jane Doe", "email": "jane@example.com" },
///   "token": "eyJ..."
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already in use
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    validation::validate(&req)?;

    // Pre-check for duplicates; the unique index backstops concurrent inserts
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already in use".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    let claims = Claims::new(user.id, user.email.clone());
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: user.into(),
            token,
        }),
    ))
}

/// Authenticates a user and returns a bearer token
///
/// # Endpoint
///
/// ```text
/// POST /api/users/login
/// Content-Type: application/json
///
/// {
///   "email": "jane@example.com",
///   "password": "secret1"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "message": "Login successful",
///   "token": "eyJ...",
///   "user": { "id": "uuid", "name": "Jane Doe", "email": "jane@example.com" }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    validation::validate(&req)?;

    // Same error for unknown email and wrong password
    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let claims = Claims::new(user.id, user.email.clone());
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: user.into(),
    }))
}

/// Lists the users visible to the caller
///
/// User records are private, so the list only ever contains the caller's
/// own account.
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<PublicUser>>> {
    let users = User::find_by_id(&state.db, auth.user_id)
        .await?
        .map(|user| vec![user.into()])
        .unwrap_or_default();

    Ok(Json(users))
}

/// Gets a single user by ID
///
/// # Errors
///
/// - `403 Forbidden`: Caller asked for someone else's account
/// - `404 Not Found`: No such user
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PublicUser>> {
    ownership::require_self(&auth, id)
        .map_err(|_| ApiError::Forbidden("Not authorized to view this user".to_string()))?;

    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

/// Partially updates a user
///
/// Only the fields present in the request change; a new password is hashed
/// before it reaches the store.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `403 Forbidden`: Caller tried to update someone else's account
/// - `404 Not Found`: No such user
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<PublicUser>> {
    validation::validate(&req)?;

    ownership::require_self(&auth, id)
        .map_err(|_| ApiError::Forbidden("Not authorized to update this user".to_string()))?;

    let password_hash = match req.password.as_deref() {
        Some(password) => Some(password::hash_password(password)?),
        None => None,
    };

    let updated = User::update(
        &state.db,
        id,
        UpdateUser {
            name: req.name,
            email: req.email,
            password_hash,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(updated.into()))
}

/// Deletes a user account
///
/// Budgets owned by the account are not cascade-deleted.
///
/// # Errors
///
/// - `403 Forbidden`: Caller tried to delete someone else's account
/// - `404 Not Found`: No such user
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    ownership::require_self(&auth, id)
        .map_err(|_| ApiError::Forbidden("Not authorized to delete this user".to_string()))?;

    let deleted = User::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = %id, "user deleted");

    Ok(Json(MessageResponse {
        message: "User deleted".to_string(),
    }))
}
