//! Implements a SQLite backed user store.

use std::sync::{Arc, Mutex};

use email_address::EmailAddress;
use rusqlite::Connection;

use crate::{
    Error,
    db::MapRow,
    models::{NewUser, PasswordHash, User, UserID},
    stores::UserStore,
};

/// Stores user accounts in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create a new user in the database.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DuplicateEmail] if the email address is already registered,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, new_user: NewUser) -> Result<User, Error> {
        let user = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "INSERT INTO user (email, first_name, last_name, password_hash, role)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING id, email, first_name, last_name, password_hash, role",
            )?
            .query_row(
                (
                    new_user.email.to_string(),
                    &new_user.first_name,
                    &new_user.last_name,
                    new_user.password_hash.to_string(),
                    new_user.role.to_string(),
                ),
                User::map_row,
            )?;

        Ok(user)
    }

    /// Get the user with the specified `id` from the database.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid user,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: UserID) -> Result<User, Error> {
        let user = self
            .connection
            .lock()
            .unwrap()
            .prepare("SELECT id, email, first_name, last_name, password_hash, role FROM user WHERE id = :id")?
            .query_row(&[(":id", &id.as_i64())], User::map_row)?;

        Ok(user)
    }

    /// Get the user with the specified `email` from the database.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `email` does not refer to a valid user,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error> {
        let user = self
            .connection
            .lock()
            .unwrap()
            .prepare("SELECT id, email, first_name, last_name, password_hash, role FROM user WHERE email = :email")?
            .query_row(&[(":email", &email.to_string())], User::map_row)?;

        Ok(user)
    }

    /// Overwrite the stored email and name of the user that has the same ID as `user`.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if no user has the given ID,
    /// - [Error::DuplicateEmail] if the new email address belongs to another user,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&mut self, user: &User) -> Result<(), Error> {
        let rows_affected = self.connection.lock().unwrap().execute(
            "UPDATE user SET email = ?1, first_name = ?2, last_name = ?3 WHERE id = ?4",
            (
                user.email().to_string(),
                user.first_name(),
                user.last_name(),
                user.id().as_i64(),
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    /// Replace the password hash of the user with the specified `id`.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid user,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update_password(&mut self, id: UserID, password_hash: PasswordHash) -> Result<(), Error> {
        let rows_affected = self.connection.lock().unwrap().execute(
            "UPDATE user SET password_hash = ?1 WHERE id = ?2",
            (password_hash.to_string(), id.as_i64()),
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    /// Remove a user from the database.
    ///
    /// The user's transactions are removed along with the account.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid user,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: UserID) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM user WHERE id = ?1", (id.as_i64(),))?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}
