//! Defines the route handlers for creating, retrieving, updating, deleting and
//! aggregating a user's transactions.
//!
//! Every handler in this module sits behind [crate::auth::auth_guard], which inserts the
//! authenticated [UserID] into the request extensions. Handlers only ever operate on
//! that user's transactions. Requests for another user's transaction get a 404 response
//! rather than a 403 so the API does not reveal which IDs exist.

use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    models::{
        Category, DatabaseID, PaymentMethod, Transaction, TransactionBuilder, TransactionType,
        UserID,
    },
    reports::{self, MonthlyTotal, TransactionSummary},
    stores::{TransactionFilter, TransactionStore},
};

/// The data for creating a transaction or replacing the fields of an existing one.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionData {
    /// The amount of money spent or earned.
    pub amount: Decimal,
    /// When the transaction happened. Defaults to today if omitted.
    pub date: Option<Date>,
    /// A text description of what the transaction was for.
    pub description: String,
    /// Whether the transaction is an income or an expense.
    pub transaction_type: TransactionType,
    /// The spending category. Defaults to `OTHER` if omitted.
    pub category: Option<Category>,
    /// How the transaction was paid for. Defaults to `OTHER` if omitted.
    pub payment_method: Option<PaymentMethod>,
}

impl TransactionData {
    /// Validate the request data and produce a builder owned by `user_id`.
    fn into_builder(self, user_id: UserID, today: Date) -> Result<TransactionBuilder, Error> {
        let mut builder = Transaction::build(self.amount, self.transaction_type, user_id, today)?
            .description(&self.description)?;

        if let Some(date) = self.date {
            builder = builder.date(date)?;
        }

        if let Some(category) = self.category {
            builder = builder.category(category);
        }

        if let Some(payment_method) = self.payment_method {
            builder = builder.payment_method(payment_method);
        }

        Ok(builder)
    }
}

/// The optional criteria for filtering the calling user's transactions.
///
/// The owner is taken from the access token, not the request body, so a filter can
/// never select another user's transactions.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FilterData {
    /// Include only transactions of this type.
    pub transaction_type: Option<TransactionType>,
    /// Include only transactions filed under this category.
    pub category: Option<Category>,
    /// Include only transactions paid with this method.
    pub payment_method: Option<PaymentMethod>,
    /// Include only transactions dated on or after this date.
    pub date_from: Option<Date>,
    /// Include only transactions dated on or before this date.
    pub date_to: Option<Date>,
    /// Include only transactions of at least this amount.
    pub min_amount: Option<Decimal>,
    /// Include only transactions of at most this amount.
    pub max_amount: Option<Decimal>,
}

/// A route handler for creating a new transaction.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the current thread.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The amount is outside the allowed range.
/// - The date is in the future.
/// - The description is blank or too long.
/// - An unexpected error occurred with the database.
pub async fn create_transaction(
    State(mut state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    Json(data): Json<TransactionData>,
) -> Result<impl IntoResponse, Error> {
    let builder = data.into_builder(user_id, state.today())?;

    state
        .transaction_store
        .create(builder)
        .map(|transaction| (StatusCode::CREATED, Json(transaction)))
}

/// A route handler for getting all of the transactions owned by the calling user.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the current thread.
pub async fn get_all_transactions(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Transaction>>, Error> {
    state.transaction_store.get_by_user(user_id).map(Json)
}

/// A route handler for getting a transaction by its database ID.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the current thread.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - There is no transaction with the given ID that is owned by the calling user.
/// - An unexpected error occurred with the database.
pub async fn get_transaction(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<Json<Transaction>, Error> {
    let transaction = state.transaction_store.get(transaction_id)?;

    if transaction.user_id() != user_id {
        // Respond with 404 not found so that unauthorized users cannot know whether
        // another user's resource exists.
        return Err(Error::NotFound);
    }

    Ok(Json(transaction))
}

/// A route handler for replacing the fields of an existing transaction.
///
/// The request data goes through the same validation as a new transaction.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the current thread.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - There is no transaction with the given ID that is owned by the calling user.
/// - The replacement fields fail validation.
/// - An unexpected error occurred with the database.
pub async fn update_transaction(
    State(mut state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<DatabaseID>,
    Json(data): Json<TransactionData>,
) -> Result<Json<Transaction>, Error> {
    let existing = state.transaction_store.get(transaction_id)?;

    if existing.user_id() != user_id {
        // Respond with 404 not found so that unauthorized users cannot know whether
        // another user's resource exists.
        return Err(Error::NotFound);
    }

    let updated = data
        .into_builder(user_id, state.today())?
        .finalize(transaction_id);
    state.transaction_store.update(&updated)?;

    Ok(Json(updated))
}

/// A route handler for deleting a transaction by its database ID.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the current thread.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - There is no transaction with the given ID that is owned by the calling user.
/// - An unexpected error occurred with the database.
pub async fn delete_transaction(
    State(mut state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<StatusCode, Error> {
    let transaction = state.transaction_store.get(transaction_id)?;

    if transaction.user_id() != user_id {
        // Respond with 404 not found so that unauthorized users cannot know whether
        // another user's resource exists.
        return Err(Error::NotFound);
    }

    state.transaction_store.delete(transaction_id)?;

    Ok(StatusCode::NO_CONTENT)
}

/// A route handler for getting the calling user's transactions that match a set of
/// filter criteria.
///
/// Criteria left out of the request place no constraint. See [FilterData] for the
/// available criteria.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the current thread.
pub async fn filter_transactions(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    Json(criteria): Json<FilterData>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let filter = TransactionFilter {
        user_id,
        transaction_type: criteria.transaction_type,
        category: criteria.category,
        payment_method: criteria.payment_method,
        date_from: criteria.date_from,
        date_to: criteria.date_to,
        min_amount: criteria.min_amount,
        max_amount: criteria.max_amount,
    };

    state.transaction_store.get_filtered(&filter).map(Json)
}

/// A route handler for summarizing the calling user's transactions.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the current thread.
pub async fn get_summary(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<TransactionSummary>, Error> {
    let transactions = state.transaction_store.get_by_user(user_id)?;

    Ok(Json(reports::summarize(&transactions)))
}

/// A route handler for totalling the calling user's transactions of the given type by
/// calendar month.
///
/// The transaction type comes from the URL path and is matched case-insensitively, so
/// `/api/transactions/monthly-total/income` and `/api/transactions/monthly-total/INCOME`
/// produce the same report.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the current thread.
///
/// # Errors
///
/// This function will return an error if the path parameter is not a valid transaction
/// type.
pub async fn get_monthly_total(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_type): Path<String>,
) -> Result<Json<Vec<MonthlyTotal>>, Error> {
    let transaction_type = transaction_type.parse::<TransactionType>()?;
    let transactions = state.transaction_store.get_by_user(user_id)?;

    Ok(Json(reports::monthly_total_by_type(
        &transactions,
        transaction_type,
    )))
}

/// A route handler for totalling the calling user's expenses by category.
///
/// Categories without a matching expense are left out of the response.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the current thread.
pub async fn get_expense_total_by_category(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<HashMap<Category, Decimal>>, Error> {
    let transactions = state.transaction_store.get_by_user(user_id)?;

    Ok(Json(reports::expense_total_by_category(&transactions)))
}

#[cfg(test)]
mod transaction_route_tests {
    use std::str::FromStr;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use email_address::EmailAddress;
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use time::{Date, OffsetDateTime, macros::date};

    use crate::{
        AppState, build_router,
        auth::create_access_token,
        endpoints,
        models::{
            Category, NewUser, PasswordHash, PaymentMethod, Role, Transaction, TransactionType,
            User, UserID,
        },
        stores::{TransactionStore, UserStore},
    };

    fn get_test_state() -> AppState {
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory.");

        AppState::new(db_connection, "notasecret", "Etc/UTC")
            .expect("Could not create app state.")
    }

    fn get_test_server(state: AppState) -> TestServer {
        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    fn create_user(state: &AppState, email: &str) -> (User, String) {
        let user = state
            .user_store
            .clone()
            .create(NewUser {
                email: EmailAddress::from_str(email).unwrap(),
                password_hash: PasswordHash::new_unchecked("notarealhash"),
                first_name: "Ada".to_owned(),
                last_name: "Lovelace".to_owned(),
                role: Role::User,
            })
            .expect("Could not create test user.");

        let token =
            create_access_token(user.id(), state.encoding_key(), state.access_token_duration)
                .expect("Could not create access token.");

        (user, token)
    }

    fn insert_transaction(
        state: &AppState,
        user_id: UserID,
        amount: Decimal,
        date: Date,
        transaction_type: TransactionType,
        category: Category,
        payment_method: PaymentMethod,
    ) -> Transaction {
        let builder = Transaction::build(amount, transaction_type, user_id, state.today())
            .unwrap()
            .date(date)
            .unwrap()
            .description("seeded transaction")
            .unwrap()
            .category(category)
            .payment_method(payment_method);

        state
            .transaction_store
            .clone()
            .create(builder)
            .expect("Could not insert test transaction.")
    }

    fn insert_worked_example(state: &AppState, user_id: UserID) {
        insert_transaction(
            state,
            user_id,
            dec!(12.50),
            date!(2025 - 03 - 05),
            TransactionType::Expense,
            Category::Food,
            PaymentMethod::Card,
        );
        insert_transaction(
            state,
            user_id,
            dec!(1000.00),
            date!(2025 - 03 - 01),
            TransactionType::Income,
            Category::Rent,
            PaymentMethod::BankTransfer,
        );
        insert_transaction(
            state,
            user_id,
            dec!(7.50),
            date!(2025 - 04 - 02),
            TransactionType::Expense,
            Category::Food,
            PaymentMethod::Cash,
        );
    }

    #[tokio::test]
    async fn create_transaction_returns_created_row() {
        let state = get_test_state();
        let (user, token) = create_user(&state, "ada@example.com");
        let server = get_test_server(state);

        let response = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(token)
            .json(&json!({
                "amount": "12.50",
                "date": "2025-03-05",
                "description": "Friday bakery run",
                "transaction_type": "EXPENSE",
                "category": "FOOD",
                "payment_method": "CARD",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let transaction = response.json::<Transaction>();
        assert_eq!(transaction.amount(), dec!(12.50));
        assert_eq!(transaction.date(), date!(2025 - 03 - 05));
        assert_eq!(transaction.description(), "Friday bakery run");
        assert_eq!(transaction.transaction_type(), TransactionType::Expense);
        assert_eq!(transaction.category(), Category::Food);
        assert_eq!(transaction.payment_method(), PaymentMethod::Card);
        assert_eq!(transaction.user_id(), user.id());
    }

    #[tokio::test]
    async fn create_transaction_defaults_omitted_fields() {
        let state = get_test_state();
        let (_, token) = create_user(&state, "ada@example.com");
        let server = get_test_server(state);

        let response = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(token)
            .json(&json!({
                "amount": "3.20",
                "description": "Morning coffee",
                "transaction_type": "EXPENSE",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let transaction = response.json::<Transaction>();
        assert_eq!(transaction.date(), OffsetDateTime::now_utc().date());
        assert_eq!(transaction.category(), Category::Other);
        assert_eq!(transaction.payment_method(), PaymentMethod::Other);
    }

    #[tokio::test]
    async fn create_transaction_fails_with_future_date() {
        let state = get_test_state();
        let (_, token) = create_user(&state, "ada@example.com");
        let tomorrow = state.today() + time::Duration::days(1);
        let server = get_test_server(state);

        let response = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(token)
            .json(&json!({
                "amount": "3.20",
                "date": tomorrow,
                "description": "Time travel",
                "transaction_type": "EXPENSE",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_transaction_fails_with_out_of_range_amount() {
        let state = get_test_state();
        let (_, token) = create_user(&state, "ada@example.com");
        let server = get_test_server(state);

        let test_cases = ["0.00", "-1.00", "1000000.01"];

        for amount in test_cases {
            let response = server
                .post(endpoints::TRANSACTIONS)
                .authorization_bearer(token.clone())
                .json(&json!({
                    "amount": amount,
                    "description": "Too much or too little",
                    "transaction_type": "EXPENSE",
                }))
                .await;

            assert_eq!(
                response.status_code(),
                StatusCode::BAD_REQUEST,
                "want 400 for amount {}, got {}",
                amount,
                response.status_code()
            );
        }
    }

    #[tokio::test]
    async fn create_transaction_fails_with_blank_description() {
        let state = get_test_state();
        let (_, token) = create_user(&state, "ada@example.com");
        let server = get_test_server(state);

        let response = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(token)
            .json(&json!({
                "amount": "3.20",
                "description": "   ",
                "transaction_type": "EXPENSE",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_transaction_fails_without_token() {
        let state = get_test_state();
        create_user(&state, "ada@example.com");
        let server = get_test_server(state);

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "amount": "3.20",
                "description": "Morning coffee",
                "transaction_type": "EXPENSE",
            }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn get_transaction_returns_own_transaction() {
        let state = get_test_state();
        let (user, token) = create_user(&state, "ada@example.com");
        let want = insert_transaction(
            &state,
            user.id(),
            dec!(12.50),
            date!(2025 - 03 - 05),
            TransactionType::Expense,
            Category::Food,
            PaymentMethod::Card,
        );
        let server = get_test_server(state);

        let response = server
            .get(&endpoints::format_endpoint(endpoints::TRANSACTION, want.id()))
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Transaction>(), want);
    }

    #[tokio::test]
    async fn get_transaction_fails_with_missing_id() {
        let state = get_test_state();
        let (_, token) = create_user(&state, "ada@example.com");
        let server = get_test_server(state);

        let response = server
            .get(&endpoints::format_endpoint(endpoints::TRANSACTION, 1337))
            .authorization_bearer(token)
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_transaction_hides_other_users_transaction() {
        let state = get_test_state();
        let (owner, _) = create_user(&state, "ada@example.com");
        let (_, intruder_token) = create_user(&state, "eve@example.com");
        let transaction = insert_transaction(
            &state,
            owner.id(),
            dec!(12.50),
            date!(2025 - 03 - 05),
            TransactionType::Expense,
            Category::Food,
            PaymentMethod::Card,
        );
        let server = get_test_server(state);

        let response = server
            .get(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                transaction.id(),
            ))
            .authorization_bearer(intruder_token)
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_all_transactions_returns_only_own_transactions() {
        let state = get_test_state();
        let (owner, token) = create_user(&state, "ada@example.com");
        let (other, _) = create_user(&state, "eve@example.com");
        let want = insert_transaction(
            &state,
            owner.id(),
            dec!(12.50),
            date!(2025 - 03 - 05),
            TransactionType::Expense,
            Category::Food,
            PaymentMethod::Card,
        );
        insert_transaction(
            &state,
            other.id(),
            dec!(55.00),
            date!(2025 - 03 - 06),
            TransactionType::Expense,
            Category::Shopping,
            PaymentMethod::Cash,
        );
        let server = get_test_server(state);

        let response = server
            .get(endpoints::TRANSACTIONS)
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Transaction>>(), vec![want]);
    }

    #[tokio::test]
    async fn update_transaction_replaces_fields() {
        let state = get_test_state();
        let (user, token) = create_user(&state, "ada@example.com");
        let original = insert_transaction(
            &state,
            user.id(),
            dec!(12.50),
            date!(2025 - 03 - 05),
            TransactionType::Expense,
            Category::Food,
            PaymentMethod::Card,
        );
        let server = get_test_server(state);

        let response = server
            .put(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                original.id(),
            ))
            .authorization_bearer(token.clone())
            .json(&json!({
                "amount": "15.00",
                "date": "2025-03-06",
                "description": "Saturday bakery run",
                "transaction_type": "EXPENSE",
                "category": "FOOD",
                "payment_method": "CASH",
            }))
            .await;

        response.assert_status_ok();
        let updated = response.json::<Transaction>();
        assert_eq!(updated.id(), original.id());
        assert_eq!(updated.amount(), dec!(15.00));
        assert_eq!(updated.date(), date!(2025 - 03 - 06));
        assert_eq!(updated.description(), "Saturday bakery run");
        assert_eq!(updated.payment_method(), PaymentMethod::Cash);

        let stored = server
            .get(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                original.id(),
            ))
            .authorization_bearer(token)
            .await
            .json::<Transaction>();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn update_transaction_revalidates_fields() {
        let state = get_test_state();
        let (user, token) = create_user(&state, "ada@example.com");
        let original = insert_transaction(
            &state,
            user.id(),
            dec!(12.50),
            date!(2025 - 03 - 05),
            TransactionType::Expense,
            Category::Food,
            PaymentMethod::Card,
        );
        let server = get_test_server(state);

        let response = server
            .put(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                original.id(),
            ))
            .authorization_bearer(token)
            .json(&json!({
                "amount": "0.00",
                "description": "Nothing happened",
                "transaction_type": "EXPENSE",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_transaction_hides_other_users_transaction() {
        let state = get_test_state();
        let (owner, owner_token) = create_user(&state, "ada@example.com");
        let (_, intruder_token) = create_user(&state, "eve@example.com");
        let transaction = insert_transaction(
            &state,
            owner.id(),
            dec!(12.50),
            date!(2025 - 03 - 05),
            TransactionType::Expense,
            Category::Food,
            PaymentMethod::Card,
        );
        let server = get_test_server(state);

        let response = server
            .put(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                transaction.id(),
            ))
            .authorization_bearer(intruder_token)
            .json(&json!({
                "amount": "9999.00",
                "description": "Hijacked",
                "transaction_type": "EXPENSE",
            }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);

        let stored = server
            .get(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                transaction.id(),
            ))
            .authorization_bearer(owner_token)
            .await
            .json::<Transaction>();
        assert_eq!(stored, transaction);
    }

    #[tokio::test]
    async fn delete_transaction_removes_row() {
        let state = get_test_state();
        let (user, token) = create_user(&state, "ada@example.com");
        let transaction = insert_transaction(
            &state,
            user.id(),
            dec!(12.50),
            date!(2025 - 03 - 05),
            TransactionType::Expense,
            Category::Food,
            PaymentMethod::Card,
        );
        let server = get_test_server(state);
        let endpoint = endpoints::format_endpoint(endpoints::TRANSACTION, transaction.id());

        let response = server
            .delete(&endpoint)
            .authorization_bearer(token.clone())
            .await;

        response.assert_status(StatusCode::NO_CONTENT);
        server
            .get(&endpoint)
            .authorization_bearer(token)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_transaction_hides_other_users_transaction() {
        let state = get_test_state();
        let (owner, owner_token) = create_user(&state, "ada@example.com");
        let (_, intruder_token) = create_user(&state, "eve@example.com");
        let transaction = insert_transaction(
            &state,
            owner.id(),
            dec!(12.50),
            date!(2025 - 03 - 05),
            TransactionType::Expense,
            Category::Food,
            PaymentMethod::Card,
        );
        let server = get_test_server(state);
        let endpoint = endpoints::format_endpoint(endpoints::TRANSACTION, transaction.id());

        let response = server
            .delete(&endpoint)
            .authorization_bearer(intruder_token)
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        server
            .get(&endpoint)
            .authorization_bearer(owner_token)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn filter_transactions_with_no_criteria_returns_all_own_transactions() {
        let state = get_test_state();
        let (user, token) = create_user(&state, "ada@example.com");
        let (other, _) = create_user(&state, "eve@example.com");
        insert_worked_example(&state, user.id());
        insert_transaction(
            &state,
            other.id(),
            dec!(55.00),
            date!(2025 - 03 - 06),
            TransactionType::Expense,
            Category::Shopping,
            PaymentMethod::Cash,
        );
        let server = get_test_server(state);

        let response = server
            .post(endpoints::TRANSACTIONS_FILTER)
            .authorization_bearer(token)
            .json(&json!({}))
            .await;

        response.assert_status_ok();
        let transactions = response.json::<Vec<Transaction>>();
        assert_eq!(transactions.len(), 3);
        assert!(
            transactions
                .iter()
                .all(|transaction| transaction.user_id() == user.id())
        );
    }

    #[tokio::test]
    async fn filter_transactions_applies_criteria_together() {
        let state = get_test_state();
        let (user, token) = create_user(&state, "ada@example.com");
        insert_worked_example(&state, user.id());
        let server = get_test_server(state);

        let response = server
            .post(endpoints::TRANSACTIONS_FILTER)
            .authorization_bearer(token)
            .json(&json!({
                "transaction_type": "EXPENSE",
                "category": "FOOD",
                "date_from": "2025-03-01",
                "date_to": "2025-03-31",
            }))
            .await;

        response.assert_status_ok();
        let transactions = response.json::<Vec<Transaction>>();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount(), dec!(12.50));
        assert_eq!(transactions[0].date(), date!(2025 - 03 - 05));
    }

    #[tokio::test]
    async fn filter_transactions_compares_amounts_numerically() {
        let state = get_test_state();
        let (user, token) = create_user(&state, "ada@example.com");
        insert_transaction(
            &state,
            user.id(),
            dec!(9.50),
            date!(2025 - 03 - 05),
            TransactionType::Expense,
            Category::Food,
            PaymentMethod::Card,
        );
        insert_transaction(
            &state,
            user.id(),
            dec!(100.00),
            date!(2025 - 03 - 06),
            TransactionType::Expense,
            Category::Shopping,
            PaymentMethod::Card,
        );
        let server = get_test_server(state);

        let response = server
            .post(endpoints::TRANSACTIONS_FILTER)
            .authorization_bearer(token)
            .json(&json!({"min_amount": "10.00"}))
            .await;

        response.assert_status_ok();
        let transactions = response.json::<Vec<Transaction>>();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount(), dec!(100.00));
    }

    #[tokio::test]
    async fn filter_transactions_with_crossed_range_returns_nothing() {
        let state = get_test_state();
        let (user, token) = create_user(&state, "ada@example.com");
        insert_worked_example(&state, user.id());
        let server = get_test_server(state);

        let response = server
            .post(endpoints::TRANSACTIONS_FILTER)
            .authorization_bearer(token)
            .json(&json!({
                "date_from": "2025-04-01",
                "date_to": "2025-03-01",
            }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Transaction>>(), vec![]);
    }

    #[tokio::test]
    async fn get_summary_totals_each_transaction_type() {
        let state = get_test_state();
        let (user, token) = create_user(&state, "ada@example.com");
        insert_worked_example(&state, user.id());
        let server = get_test_server(state);

        let response = server
            .get(endpoints::TRANSACTIONS_SUMMARY)
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "total_income": "1000.00",
            "total_expense": "20.00",
            "balance": "980.00",
            "total_transactions": 3,
        }));
    }

    #[tokio::test]
    async fn get_summary_of_no_transactions_is_all_zeros() {
        let state = get_test_state();
        let (_, token) = create_user(&state, "ada@example.com");
        let server = get_test_server(state);

        let response = server
            .get(endpoints::TRANSACTIONS_SUMMARY)
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "total_income": "0",
            "total_expense": "0",
            "balance": "0",
            "total_transactions": 0,
        }));
    }

    #[tokio::test]
    async fn get_monthly_total_lists_all_twelve_months() {
        let state = get_test_state();
        let (user, token) = create_user(&state, "ada@example.com");
        insert_worked_example(&state, user.id());
        let server = get_test_server(state);

        let response = server
            .get(&endpoints::format_endpoint(
                endpoints::MONTHLY_TOTAL,
                "EXPENSE",
            ))
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();
        let months = response.json::<Vec<serde_json::Value>>();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0]["month"], "January");
        assert_eq!(months[2], json!({"month": "March", "total": "12.50"}));
        assert_eq!(months[3], json!({"month": "April", "total": "7.50"}));
        assert_eq!(months[11]["month"], "December");
    }

    #[tokio::test]
    async fn get_monthly_total_accepts_lowercase_type() {
        let state = get_test_state();
        let (user, token) = create_user(&state, "ada@example.com");
        insert_worked_example(&state, user.id());
        let server = get_test_server(state);

        let response = server
            .get(&endpoints::format_endpoint(
                endpoints::MONTHLY_TOTAL,
                "income",
            ))
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();
        let months = response.json::<Vec<serde_json::Value>>();
        assert_eq!(months[2], json!({"month": "March", "total": "1000.00"}));
    }

    #[tokio::test]
    async fn get_monthly_total_fails_with_unknown_type() {
        let state = get_test_state();
        let (_, token) = create_user(&state, "ada@example.com");
        let server = get_test_server(state);

        let response = server
            .get(&endpoints::format_endpoint(
                endpoints::MONTHLY_TOTAL,
                "bogus",
            ))
            .authorization_bearer(token)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_expense_total_by_category_skips_empty_categories() {
        let state = get_test_state();
        let (user, token) = create_user(&state, "ada@example.com");
        insert_worked_example(&state, user.id());
        let server = get_test_server(state);

        let response = server
            .get(endpoints::EXPENSE_TOTAL_BY_CATEGORY)
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({"FOOD": "20.00"}));
    }
}
