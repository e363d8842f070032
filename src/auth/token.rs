//! Defines the claims encoded into access tokens and the functions that issue and verify
//! the tokens themselves.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, models::UserID};

/// How long an access token stays valid after being issued.
pub const DEFAULT_ACCESS_TOKEN_DURATION: Duration = Duration::minutes(15);

/// The claims encoded into an access token.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the authenticated user.
    pub sub: i64,
    /// When the token was issued, as a unix timestamp.
    pub iat: i64,
    /// When the token expires, as a unix timestamp.
    pub exp: i64,
}

/// Issue a signed access token for `user_id` that expires after `duration`.
///
/// # Errors
///
/// This function will return an [Error::TokenCreation] if the claims could not be signed.
pub fn create_access_token(
    user_id: UserID,
    encoding_key: &EncodingKey,
    duration: Duration,
) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user_id.as_i64(),
        iat: now.unix_timestamp(),
        exp: (now + duration).unix_timestamp(),
    };

    encode(&Header::default(), &claims, encoding_key).map_err(|error| {
        tracing::error!("Error signing access token: {error}");
        Error::TokenCreation
    })
}

/// Verify the signature and expiry of `token` and extract the authenticated user's ID.
///
/// # Errors
///
/// This function will return an [Error::InvalidToken] if the token is malformed, carries
/// a bad signature, or has expired.
pub fn decode_access_token(token: &str, decoding_key: &DecodingKey) -> Result<UserID, Error> {
    decode::<Claims>(token, decoding_key, &Validation::default())
        .map(|token_data| UserID::new(token_data.claims.sub))
        .map_err(|_| Error::InvalidToken)
}

#[cfg(test)]
mod token_tests {
    use jsonwebtoken::{DecodingKey, EncodingKey};
    use time::Duration;

    use crate::{Error, models::UserID};

    use super::{DEFAULT_ACCESS_TOKEN_DURATION, create_access_token, decode_access_token};

    fn get_keys(secret: &str) -> (EncodingKey, DecodingKey) {
        (
            EncodingKey::from_secret(secret.as_bytes()),
            DecodingKey::from_secret(secret.as_bytes()),
        )
    }

    #[test]
    fn decode_returns_user_id_from_valid_token() {
        let (encoding_key, decoding_key) = get_keys("foobar");
        let user_id = UserID::new(42);

        let token =
            create_access_token(user_id, &encoding_key, DEFAULT_ACCESS_TOKEN_DURATION).unwrap();
        let got = decode_access_token(&token, &decoding_key).unwrap();

        assert_eq!(got, user_id);
    }

    #[test]
    fn decode_rejects_expired_token() {
        let (encoding_key, decoding_key) = get_keys("foobar");

        // Two minutes in the past puts the expiry outside the default validation leeway.
        let token =
            create_access_token(UserID::new(42), &encoding_key, Duration::minutes(-2)).unwrap();
        let got = decode_access_token(&token, &decoding_key);

        assert_eq!(got, Err(Error::InvalidToken));
    }

    #[test]
    fn decode_rejects_token_signed_with_another_key() {
        let (encoding_key, _) = get_keys("foobar");
        let (_, other_decoding_key) = get_keys("bizbaz");

        let token =
            create_access_token(UserID::new(42), &encoding_key, DEFAULT_ACCESS_TOKEN_DURATION)
                .unwrap();
        let got = decode_access_token(&token, &other_decoding_key);

        assert_eq!(got, Err(Error::InvalidToken));
    }

    #[test]
    fn decode_rejects_malformed_token() {
        let (_, decoding_key) = get_keys("foobar");

        let got = decode_access_token("definitely.not.atoken", &decoding_key);

        assert_eq!(got, Err(Error::InvalidToken));
    }
}
