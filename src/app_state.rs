//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use jsonwebtoken::{DecodingKey, EncodingKey};
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime, UtcOffset};

use crate::{
    Error,
    auth::DEFAULT_ACCESS_TOKEN_DURATION,
    db::initialize,
    stores::{SQLiteTransactionStore, SQLiteUserStore},
    timezone::get_local_offset,
};

/// The keys used for signing and verifying access tokens.
#[derive(Clone)]
struct JwtKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtKeys {
    fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    jwt_keys: JwtKeys,

    /// The duration for which access tokens are valid.
    pub access_token_duration: Duration,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The store for user accounts.
    pub user_store: SQLiteUserStore,

    /// The store for transactions.
    pub transaction_store: SQLiteTransactionStore,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain
    /// models. `jwt_secret` signs access tokens and must stay stable across restarts for
    /// issued tokens to keep working. `local_timezone` should be a valid, canonical
    /// timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        jwt_secret: &str,
        local_timezone: &str,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            jwt_keys: JwtKeys::new(jwt_secret),
            access_token_duration: DEFAULT_ACCESS_TOKEN_DURATION,
            local_timezone: local_timezone.to_owned(),
            user_store: SQLiteUserStore::new(connection.clone()),
            transaction_store: SQLiteTransactionStore::new(connection),
        })
    }

    /// The encoding key for signing access tokens.
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.jwt_keys.encoding_key
    }

    /// The decoding key for verifying access tokens.
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.jwt_keys.decoding_key
    }

    /// The current date in the configured timezone.
    ///
    /// Falls back to UTC when the timezone name cannot be resolved.
    pub fn today(&self) -> Date {
        let offset = get_local_offset(&self.local_timezone).unwrap_or_else(|| {
            tracing::warn!(
                "Could not resolve timezone '{}'. Falling back to UTC.",
                self.local_timezone
            );
            UtcOffset::UTC
        });

        OffsetDateTime::now_utc().to_offset(offset).date()
    }
}
