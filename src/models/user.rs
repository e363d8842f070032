//! This file defines a user of the application and its supporting types.

use std::{fmt::Display, str::FromStr};

use email_address::EmailAddress;
use rusqlite::{Connection, Row, types::Type};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::PasswordHash,
};

/// A newtype wrapper for integer user IDs.
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The access level of a user account.
///
/// Stored as text in the database and sent as text over the wire, e.g. "ADMIN".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    User,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        };

        write!(f, "{label}")
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        match string.to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            _ => Err(Error::InvalidRole(string.to_owned())),
        }
    }
}

/// The details needed to insert a user into the application database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    /// The email address to register the account under.
    pub email: EmailAddress,
    /// The hash of the account's password.
    pub password_hash: PasswordHash,
    /// The user's given name.
    pub first_name: String,
    /// The user's family name.
    pub last_name: String,
    /// The access level of the account.
    pub role: Role,
}

/// A user of the application.
///
/// Each user owns their transactions exclusively. Deleting a user deletes their
/// transactions with them.
///
/// The password hash is never serialized, so a `User` can be returned from a route
/// handler as a profile view without leaking credentials.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    id: UserID,
    email: EmailAddress,
    first_name: String,
    last_name: String,
    #[serde(skip_serializing)]
    password_hash: PasswordHash,
    role: Role,
}

impl User {
    /// The user's ID in the database.
    pub fn id(&self) -> UserID {
        self.id
    }

    /// The email address associated with the user.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The user's given name.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// The user's family name.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// The user's password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// The user's access level.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Create a copy of this user with a new email address and display names.
    ///
    /// Used by the profile update route, which persists the result with
    /// `UserStore::update`.
    pub fn with_details(&self, email: EmailAddress, first_name: &str, last_name: &str) -> Self {
        Self {
            email,
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            ..self.clone()
        }
    }
}

impl CreateTable for User {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                    id INTEGER PRIMARY KEY,
                    email TEXT UNIQUE NOT NULL,
                    first_name TEXT NOT NULL,
                    last_name TEXT NOT NULL,
                    password_hash TEXT NOT NULL,
                    role TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for User {
    type ReturnType = Self;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
        let raw_email: String = row.get(offset + 1)?;
        let email = EmailAddress::from_str(&raw_email).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(offset + 1, Type::Text, Box::new(error))
        })?;

        let raw_password_hash: String = row.get(offset + 4)?;
        let raw_role: String = row.get(offset + 5)?;
        let role = raw_role.parse().map_err(|error: Error| {
            rusqlite::Error::FromSqlConversionFailure(offset + 5, Type::Text, Box::new(error))
        })?;

        Ok(Self {
            id: UserID::new(row.get(offset)?),
            email,
            first_name: row.get(offset + 2)?,
            last_name: row.get(offset + 3)?,
            password_hash: PasswordHash::new_unchecked(&raw_password_hash),
            role,
        })
    }
}

#[cfg(test)]
mod role_tests {
    use crate::{Error, models::Role};

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("USER".parse::<Role>(), Ok(Role::User));
    }

    #[test]
    fn parse_rejects_unknown_role() {
        let result = "superuser".parse::<Role>();

        assert!(matches!(result, Err(Error::InvalidRole(_))));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for role in [Role::Admin, Role::User] {
            let got = role.to_string().parse::<Role>().unwrap();

            assert_eq!(got, role, "want {role:?}, got {got:?}");
        }
    }
}
