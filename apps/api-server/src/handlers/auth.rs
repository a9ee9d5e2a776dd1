//! Authentication handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::User;
use quill_core::error::DomainError;
use quill_shared::ApiResponse;
use quill_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest};

use super::views;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 6;

fn issue_token(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = state.tokens.generate_token(user.id, &user.username)?;

    Ok(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds(),
        user: views::user(user, true),
    })
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Validate input
    let username = req.username.trim().to_string();
    if username.is_empty() {
        return Err(AppError::bad_request("username is required"));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    let email = req
        .email
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty());
    if email.as_deref().is_some_and(|email| !email.contains('@')) {
        return Err(AppError::bad_request("invalid email address"));
    }

    // Check if user already exists
    if state.users.find_by_username(&username).await?.is_some() {
        return Err(DomainError::Conflict("username already taken".to_string()).into());
    }
    if let Some(email) = &email {
        if state.users.find_by_email(email).await?.is_some() {
            return Err(DomainError::Conflict("email already registered".to_string()).into());
        }
    }

    let password_hash = state.passwords.hash(&req.password)?;
    let user = state
        .users
        .save(User::new(username, email, password_hash, req.display_name))
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok(HttpResponse::Created().json(ApiResponse::ok(issue_token(&state, &user)?)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(AppError::bad_request("username and password are required"));
    }

    let invalid = || AppError::Unauthorized("invalid credentials".to_string());

    let user = state
        .users
        .find_by_username(username)
        .await?
        .ok_or_else(invalid)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        tracing::debug!(username = %user.username, "Password mismatch");
        return Err(invalid());
    }

    Ok(HttpResponse::Ok().json(ApiResponse::ok(issue_token(&state, &user)?)))
}
