//! Defines the transaction store trait and the filter criteria it accepts.

use rust_decimal::Decimal;
use time::Date;

use crate::{
    Error,
    models::{
        Category, DatabaseID, PaymentMethod, Transaction, TransactionBuilder, TransactionType,
        UserID,
    },
};

/// Handles the creation and retrieval of transactions.
pub trait TransactionStore {
    /// Create a new transaction in the store from a validated builder.
    fn create(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error>;

    /// Retrieve a transaction from the store by its database ID.
    fn get(&self, id: DatabaseID) -> Result<Transaction, Error>;

    /// Retrieve all transactions owned by `user_id`, in storage order.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error>;

    /// Retrieve the transactions matching `filter`, in storage order.
    fn get_filtered(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, Error>;

    /// Overwrite the stored transaction that has the same ID as `transaction`.
    fn update(&mut self, transaction: &Transaction) -> Result<(), Error>;

    /// Remove a transaction from the store.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error>;
}

/// Criteria for selecting a subset of a user's transactions.
///
/// Each criterion that is set must hold for a transaction to be selected; a criterion
/// left as `None` places no constraint. The owner is not optional: a filter always
/// selects from a single user's transactions, and the owner test leads the query that
/// [TransactionStore::get_filtered] compiles from the criteria.
///
/// Range bounds are inclusive and may be set one-sided. Bounds that cross (a minimum
/// above the maximum, or a start date after the end date) select nothing; this is not
/// an error.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFilter {
    /// The user whose transactions are searched.
    pub user_id: UserID,
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

impl TransactionFilter {
    /// Create a filter that selects all transactions owned by `user_id`.
    pub fn new(user_id: UserID) -> Self {
        Self {
            user_id,
            transaction_type: None,
            category: None,
            payment_method: None,
            date_from: None,
            date_to: None,
            min_amount: None,
            max_amount: None,
        }
    }
}
