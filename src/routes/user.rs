//! Defines the route handlers for viewing and managing the calling user's account.

use std::str::FromStr;

use axum::{Extension, Json, extract::State, http::StatusCode};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    models::{PasswordHash, User, UserID, ValidatedPassword},
    stores::UserStore,
};

/// The data for updating the calling user's profile.
///
/// Fields left out of the request keep their current value.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProfileData {
    /// A new email address for the account.
    pub email: Option<String>,
    /// A new given name.
    pub first_name: Option<String>,
    /// A new family name.
    pub last_name: Option<String>,
}

/// The data for changing the calling user's password.
#[derive(Debug, Serialize, Deserialize)]
pub struct PasswordData {
    /// The password the account currently uses.
    pub old_password: String,
    /// The password to replace it with.
    pub new_password: String,
    /// The new password entered a second time.
    pub confirm_password: String,
}

/// A route handler for getting the calling user's profile.
///
/// The response is the [User] without its password hash.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the current thread.
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<User>, Error> {
    state.user_store.get(user_id).map(Json)
}

/// A route handler for updating the calling user's email address and display names.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the current thread.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The new email address is not valid.
/// - The new email address belongs to another account.
/// - An unexpected error occurred with the database.
pub async fn update_profile(
    State(mut state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    Json(data): Json<ProfileData>,
) -> Result<Json<User>, Error> {
    let user = state.user_store.get(user_id)?;

    let email = match data.email {
        Some(raw_email) => EmailAddress::from_str(&raw_email)
            .map_err(|_| Error::InvalidEmail(raw_email.clone()))?,
        None => user.email().clone(),
    };
    let first_name = data.first_name.as_deref().unwrap_or(user.first_name());
    let last_name = data.last_name.as_deref().unwrap_or(user.last_name());

    let updated_user = user.with_details(email, first_name, last_name);
    state.user_store.update(&updated_user)?;

    Ok(Json(updated_user))
}

/// A route handler for changing the calling user's password.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the current thread.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The old password is not correct.
/// - The new password and its confirmation do not match.
/// - The new password is considered too weak.
/// - An internal error occurred while verifying or hashing a password.
pub async fn change_password(
    State(mut state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    Json(data): Json<PasswordData>,
) -> Result<StatusCode, Error> {
    let user = state.user_store.get(user_id)?;

    let old_password_is_correct = user
        .password_hash()
        .verify(&data.old_password)
        .map_err(|error| {
            tracing::error!("An error occurred while verifying a password: {error}");
            Error::HashingError(error.to_string())
        })?;

    if !old_password_is_correct {
        return Err(Error::IncorrectPassword);
    }

    if data.new_password != data.confirm_password {
        return Err(Error::PasswordMismatch);
    }

    let new_password = ValidatedPassword::new(&data.new_password)?;
    let password_hash = PasswordHash::new(new_password, PasswordHash::DEFAULT_COST)?;

    state.user_store.update_password(user_id, password_hash)?;

    Ok(StatusCode::NO_CONTENT)
}

/// A route handler for deleting the calling user's account.
///
/// The user's transactions are removed along with the account.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the current thread.
///
/// # Errors
///
/// This function will return an error if the account no longer exists or an unexpected
/// error occurred with the database.
pub async fn delete_account(
    State(mut state): State<AppState>,
    Extension(user_id): Extension<UserID>,
) -> Result<StatusCode, Error> {
    state.user_store.delete(user_id)?;

    Ok(StatusCode::NO_CONTENT)
}
