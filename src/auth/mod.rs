//! Token based authentication for the API.
//!
//! Defines the claims carried by an access token, helpers for issuing and verifying
//! tokens, and the middleware that guards the protected routes.

mod middleware;
mod token;

pub use middleware::auth_guard;
pub use token::{
    Claims, DEFAULT_ACCESS_TOKEN_DURATION, create_access_token, decode_access_token,
};
