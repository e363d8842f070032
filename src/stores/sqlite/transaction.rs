//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, params_from_iter, types::Value};

use crate::{
    Error,
    db::MapRow,
    models::{DatabaseID, Transaction, TransactionBuilder, UserID},
    stores::{TransactionFilter, TransactionStore},
};

/// Stores transactions in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new transaction store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidUser] if the builder's user ID does not refer to a valid user,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();

        let transaction = connection
            .prepare(
                "INSERT INTO \"transaction\" (amount, date, description, transaction_type, category, payment_method, user_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING id, amount, date, description, transaction_type, category, payment_method, user_id",
            )?
            .query_row(
                (
                    builder.amount.to_string(),
                    builder.date,
                    &builder.description,
                    builder.transaction_type.to_string(),
                    builder.category.to_string(),
                    builder.payment_method.to_string(),
                    builder.user_id.as_i64(),
                ),
                Transaction::map_row,
            )
            .map_err(|error| match error {
                // The client tried to add a transaction for a nonexistent user.
                rusqlite::Error::SqliteFailure(error, Some(_))
                    if error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
                {
                    Error::InvalidUser
                }
                error => error.into(),
            })?;

        Ok(transaction)
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: DatabaseID) -> Result<Transaction, Error> {
        let transaction = self.connection.lock().unwrap()
                .prepare("SELECT id, amount, date, description, transaction_type, category, payment_method, user_id FROM \"transaction\" WHERE id = :id")?
                .query_row(&[(":id", &id)], Transaction::map_row)?;

        Ok(transaction)
    }

    /// Retrieve the transactions in the database that belong to `user_id`.
    ///
    /// An empty vector is returned if the specified user has no transactions.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, amount, date, description, transaction_type, category, payment_method, user_id FROM \"transaction\" WHERE user_id = :user_id")?
            .query_map(&[(":user_id", &user_id.as_i64())], Transaction::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }

    /// Query for the transactions that match `filter`.
    ///
    /// The filter compiles to a single conjunctive WHERE clause. The owner clause always
    /// comes first; each present criterion appends one equality or one-sided range test.
    /// Amount bounds compare numerically by casting the stored text through REAL on both
    /// sides.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    fn get_filtered(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, Error> {
        let mut where_clause_parts = vec!["user_id = ?1".to_string()];
        let mut query_parameters = vec![Value::Integer(filter.user_id.as_i64())];

        if let Some(transaction_type) = filter.transaction_type {
            where_clause_parts.push(format!(
                "transaction_type = ?{}",
                query_parameters.len() + 1
            ));
            query_parameters.push(Value::Text(transaction_type.to_string()));
        }

        if let Some(category) = filter.category {
            where_clause_parts.push(format!("category = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(category.to_string()));
        }

        if let Some(payment_method) = filter.payment_method {
            where_clause_parts.push(format!("payment_method = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(payment_method.to_string()));
        }

        if let Some(date_from) = filter.date_from {
            where_clause_parts.push(format!("date >= ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(date_from.to_string()));
        }

        if let Some(date_to) = filter.date_to {
            where_clause_parts.push(format!("date <= ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(date_to.to_string()));
        }

        if let Some(min_amount) = filter.min_amount {
            where_clause_parts.push(format!(
                "CAST(amount AS REAL) >= CAST(?{} AS REAL)",
                query_parameters.len() + 1
            ));
            query_parameters.push(Value::Text(min_amount.to_string()));
        }

        if let Some(max_amount) = filter.max_amount {
            where_clause_parts.push(format!(
                "CAST(amount AS REAL) <= CAST(?{} AS REAL)",
                query_parameters.len() + 1
            ));
            query_parameters.push(Value::Text(max_amount.to_string()));
        }

        let query_string = format!(
            "SELECT id, amount, date, description, transaction_type, category, payment_method, user_id FROM \"transaction\" WHERE {}",
            where_clause_parts.join(" AND ")
        );
        let params = params_from_iter(query_parameters.iter());

        self.connection
            .lock()
            .unwrap()
            .prepare(&query_string)?
            .query_map(params, Transaction::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }

    /// Overwrite the stored transaction that has the same ID as `transaction`.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if no transaction has the given ID,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&mut self, transaction: &Transaction) -> Result<(), Error> {
        let rows_affected = self.connection.lock().unwrap().execute(
            "UPDATE \"transaction\"
             SET amount = ?1, date = ?2, description = ?3, transaction_type = ?4, category = ?5, payment_method = ?6
             WHERE id = ?7",
            (
                transaction.amount().to_string(),
                transaction.date(),
                transaction.description(),
                transaction.transaction_type().to_string(),
                transaction.category().to_string(),
                transaction.payment_method().to_string(),
                transaction.id(),
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    /// Remove a transaction from the database.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM \"transaction\" WHERE id = ?1", (id,))?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}
