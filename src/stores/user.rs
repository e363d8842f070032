//! Defines the user store trait.

use email_address::EmailAddress;

use crate::{
    Error,
    models::{NewUser, PasswordHash, User, UserID},
};

/// Handles the creation and retrieval of users.
pub trait UserStore {
    /// Create a new user in the store.
    fn create(&mut self, new_user: NewUser) -> Result<User, Error>;

    /// Retrieve a user from the store by their database ID.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Retrieve a user from the store by their email address.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error>;

    /// Overwrite the email address and display names of the stored user that has the
    /// same ID as `user`.
    fn update(&mut self, user: &User) -> Result<(), Error>;

    /// Replace the password hash of the user with the given ID.
    fn update_password(&mut self, id: UserID, password_hash: PasswordHash) -> Result<(), Error>;

    /// Remove a user from the store along with all of their transactions.
    fn delete(&mut self, id: UserID) -> Result<(), Error>;
}
