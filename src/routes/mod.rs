//! Defines the API routes and maps them to their handler functions.

use axum::{
    Json, Router, middleware,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::json;

use crate::{AppState, auth::auth_guard, endpoints};

mod auth;
mod transaction;
mod user;

/// Return a router with all the routes for the application.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::REGISTER, post(auth::register))
        .route(endpoints::LOG_IN, post(auth::log_in));

    let protected_routes = Router::new()
        .route(endpoints::TRANSACTIONS, get(transaction::get_all_transactions))
        .route(endpoints::TRANSACTIONS, post(transaction::create_transaction))
        .route(endpoints::TRANSACTION, get(transaction::get_transaction))
        .route(endpoints::TRANSACTION, put(transaction::update_transaction))
        .route(
            endpoints::TRANSACTION,
            axum::routing::delete(transaction::delete_transaction),
        )
        .route(
            endpoints::TRANSACTIONS_FILTER,
            post(transaction::filter_transactions),
        )
        .route(endpoints::TRANSACTIONS_SUMMARY, get(transaction::get_summary))
        .route(endpoints::MONTHLY_TOTAL, get(transaction::get_monthly_total))
        .route(
            endpoints::EXPENSE_TOTAL_BY_CATEGORY,
            get(transaction::get_expense_total_by_category),
        )
        .route(endpoints::USER_PROFILE, get(user::get_profile))
        .route(endpoints::USER_PROFILE, put(user::update_profile))
        .route(endpoints::USER_PROFILE, axum::routing::delete(user::delete_account))
        .route(endpoints::USER_PASSWORD, put(user::change_password))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_coffee() -> Response {
    (
        StatusCode::IM_A_TEAPOT,
        Json(json!({"error": "I'm a teapot"})),
    )
        .into_response()
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "resource not found"})),
    )
        .into_response()
}
