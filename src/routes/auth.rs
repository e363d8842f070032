//! Defines the route handlers for registering a user account and logging in.

use std::str::FromStr;

use axum::{Json, extract::State};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::create_access_token,
    models::{NewUser, PasswordHash, Role, ValidatedPassword},
    stores::UserStore,
};

/// The data for creating a new user account.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterData {
    /// The email address for the new account.
    pub email: String,
    /// The plaintext password for the new account.
    pub password: String,
    /// The user's given name.
    pub first_name: String,
    /// The user's family name.
    pub last_name: String,
}

/// The credentials a user logs in with.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogInData {
    /// Email entered during log-in.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
}

/// The response to a successful registration or log-in.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The email address of the authenticated user.
    pub username: String,
    /// The bearer token to present on protected routes.
    pub token: String,
}

/// A route handler for registering a new user account.
///
/// The response carries an access token so that a fresh account can start making
/// requests without a separate log-in.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The email address is not valid.
/// - The password is considered too weak.
/// - The email address is already registered.
pub async fn register(
    State(mut state): State<AppState>,
    Json(user_data): Json<RegisterData>,
) -> Result<Json<AuthResponse>, Error> {
    let email = EmailAddress::from_str(&user_data.email)
        .map_err(|_| Error::InvalidEmail(user_data.email.clone()))?;
    let password = ValidatedPassword::new(&user_data.password)?;
    let password_hash = PasswordHash::new(password, PasswordHash::DEFAULT_COST)?;

    let user = state.user_store.create(NewUser {
        email,
        password_hash,
        first_name: user_data.first_name,
        last_name: user_data.last_name,
        role: Role::User,
    })?;

    let token = create_access_token(user.id(), state.encoding_key(), state.access_token_duration)?;

    Ok(Json(AuthResponse {
        username: user.email().to_string(),
        token,
    }))
}

/// A route handler for logging in a user.
///
/// Unknown emails and wrong passwords produce the same response so that the API does
/// not reveal which email addresses are registered.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The email does not belong to a registered user.
/// - The password is not correct.
/// - An internal error occurred while verifying the password.
pub async fn log_in(
    State(state): State<AppState>,
    Json(user_data): Json<LogInData>,
) -> Result<Json<AuthResponse>, Error> {
    let email = EmailAddress::from_str(&user_data.email).map_err(|_| Error::InvalidCredentials)?;

    let user = state
        .user_store
        .get_by_email(&email)
        .map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            error => error,
        })?;

    let password_is_correct = user
        .password_hash()
        .verify(&user_data.password)
        .map_err(|error| {
            tracing::error!("An error occurred while verifying a password: {error}");
            Error::HashingError(error.to_string())
        })?;

    if !password_is_correct {
        return Err(Error::InvalidCredentials);
    }

    let token = create_access_token(user.id(), state.encoding_key(), state.access_token_duration)?;

    Ok(Json(AuthResponse {
        username: user.email().to_string(),
        token,
    }))
}
