//! Authentication middleware that validates bearer tokens on the protected routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{AppState, Error, auth::decode_access_token};

/// Middleware function that checks for a valid bearer token in the Authorization header.
/// The user ID is placed into the request and the request executed normally if the token
/// is valid, otherwise a 401 JSON error is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id):
/// Extension<UserID>` to receive the user ID.
pub async fn auth_guard(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return Error::MissingToken.into_response();
    };

    match decode_access_token(bearer.token(), state.decoding_key()) {
        Ok(user_id) => {
            request.extensions_mut().insert(user_id);

            next.run(request).await
        }
        Err(error) => error.into_response(),
    }
}
