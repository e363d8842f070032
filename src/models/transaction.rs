//! This file defines the type `Transaction`, the core type of the application, along with
//! the fixed enumerations it is classified by and the builder that validates new
//! transactions before they reach the database.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, UserID},
};

/// The smallest amount a transaction may record.
pub const MIN_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// The largest amount a transaction may record.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 2);

/// The maximum length of a transaction description in grapheme clusters.
pub const MAX_DESCRIPTION_LENGTH: usize = 100;

/// Whether a transaction records money earned or money spent.
///
/// Stored as text in the database and sent as text over the wire, e.g. "INCOME".
/// Parsing is case-insensitive so route handlers can accept "income" and "INCOME" alike.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        };

        write!(f, "{label}")
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        match string.to_ascii_uppercase().as_str() {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            _ => Err(Error::InvalidTransactionType(string.to_owned())),
        }
    }
}

/// The fixed set of spending categories a transaction can be filed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Food,
    Transport,
    Rent,
    Salary,
    Entertainment,
    Health,
    Utilities,
    Shopping,
    Travel,
    Education,
    Other,
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Category::Food => "FOOD",
            Category::Transport => "TRANSPORT",
            Category::Rent => "RENT",
            Category::Salary => "SALARY",
            Category::Entertainment => "ENTERTAINMENT",
            Category::Health => "HEALTH",
            Category::Utilities => "UTILITIES",
            Category::Shopping => "SHOPPING",
            Category::Travel => "TRAVEL",
            Category::Education => "EDUCATION",
            Category::Other => "OTHER",
        };

        write!(f, "{label}")
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        match string.to_ascii_uppercase().as_str() {
            "FOOD" => Ok(Category::Food),
            "TRANSPORT" => Ok(Category::Transport),
            "RENT" => Ok(Category::Rent),
            "SALARY" => Ok(Category::Salary),
            "ENTERTAINMENT" => Ok(Category::Entertainment),
            "HEALTH" => Ok(Category::Health),
            "UTILITIES" => Ok(Category::Utilities),
            "SHOPPING" => Ok(Category::Shopping),
            "TRAVEL" => Ok(Category::Travel),
            "EDUCATION" => Ok(Category::Education),
            "OTHER" => Ok(Category::Other),
            _ => Err(Error::InvalidCategory(string.to_owned())),
        }
    }
}

/// How a transaction was paid for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    Other,
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Card => "CARD",
            PaymentMethod::BankTransfer => "BANK_TRANSFER",
            PaymentMethod::Other => "OTHER",
        };

        write!(f, "{label}")
    }
}

impl FromStr for PaymentMethod {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        match string.to_ascii_uppercase().as_str() {
            "CASH" => Ok(PaymentMethod::Cash),
            "CARD" => Ok(PaymentMethod::Card),
            "BANK_TRANSFER" => Ok(PaymentMethod::BankTransfer),
            "OTHER" => Ok(PaymentMethod::Other),
            _ => Err(Error::InvalidPaymentMethod(string.to_owned())),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build]. Amounts use exact decimal
/// arithmetic so that report totals never drift the way binary floats do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: DatabaseID,
    amount: Decimal,
    date: Date,
    description: String,
    transaction_type: TransactionType,
    category: Category,
    payment_method: PaymentMethod,
    user_id: UserID,
}

impl Transaction {
    /// Start building a new transaction.
    ///
    /// Shortcut for [TransactionBuilder::new] for discoverability.
    ///
    /// `today` anchors the future-date check and should come from
    /// [crate::AppState::today] so it respects the configured timezone.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::AmountOutOfRange] if `amount` is not within
    /// [MIN_AMOUNT] and [MAX_AMOUNT] (inclusive).
    ///
    /// # Examples
    /// ```
    /// use rust_decimal::Decimal;
    /// use time::macros::date;
    ///
    /// use budgetflow::models::{Category, Transaction, TransactionType, UserID};
    ///
    /// let builder = Transaction::build(
    ///     Decimal::new(1250, 2),
    ///     TransactionType::Expense,
    ///     UserID::new(1),
    ///     date!(2025 - 03 - 06),
    /// )
    /// .unwrap()
    /// .date(date!(2025 - 03 - 05))
    /// .unwrap()
    /// .description("Friday bakery run")
    /// .unwrap()
    /// .category(Category::Food);
    /// ```
    pub fn build(
        amount: Decimal,
        transaction_type: TransactionType,
        user_id: UserID,
        today: Date,
    ) -> Result<TransactionBuilder, Error> {
        TransactionBuilder::new(amount, transaction_type, user_id, today)
    }

    /// The ID of the transaction.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The amount of money spent or earned in this transaction.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// When the transaction happened.
    pub fn date(&self) -> Date {
        self.date
    }

    /// A text description of what the transaction was for.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether this transaction is an income or an expense.
    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// The spending category the transaction is filed under.
    pub fn category(&self) -> Category {
        self.category
    }

    /// How the transaction was paid for.
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// The ID of the user that owns this transaction.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }
}

impl CreateTable for Transaction {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY,
                    amount TEXT NOT NULL,
                    date TEXT NOT NULL,
                    description TEXT NOT NULL,
                    transaction_type TEXT NOT NULL,
                    category TEXT NOT NULL,
                    payment_method TEXT NOT NULL,
                    user_id INTEGER NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for Transaction {
    type ReturnType = Self;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
        let raw_amount: String = row.get(offset + 1)?;
        let amount = raw_amount.parse::<Decimal>().map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(offset + 1, Type::Text, Box::new(error))
        })?;

        let raw_type: String = row.get(offset + 4)?;
        let transaction_type = raw_type.parse().map_err(|error: Error| {
            rusqlite::Error::FromSqlConversionFailure(offset + 4, Type::Text, Box::new(error))
        })?;

        let raw_category: String = row.get(offset + 5)?;
        let category = raw_category.parse().map_err(|error: Error| {
            rusqlite::Error::FromSqlConversionFailure(offset + 5, Type::Text, Box::new(error))
        })?;

        let raw_payment_method: String = row.get(offset + 6)?;
        let payment_method = raw_payment_method.parse().map_err(|error: Error| {
            rusqlite::Error::FromSqlConversionFailure(offset + 6, Type::Text, Box::new(error))
        })?;

        Ok(Self {
            id: row.get(offset)?,
            amount,
            date: row.get(offset + 2)?,
            description: row.get(offset + 3)?,
            transaction_type,
            category,
            payment_method,
            user_id: UserID::new(row.get(offset + 7)?),
        })
    }
}

/// Builder for creating a new [Transaction].
///
/// The setters validate as they go, so a builder that exists holds only values that are
/// safe to persist. The date defaults to `today`, the category and payment method default
/// to their `Other` variants, and the description defaults to an empty string (route
/// handlers always overwrite it from the request).
///
/// Finalize the builder with [crate::stores::TransactionStore::create] to insert a new
/// row, or with [TransactionBuilder::finalize] to attach an existing row ID for an
/// update.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    pub(crate) amount: Decimal,
    pub(crate) date: Date,
    pub(crate) description: String,
    pub(crate) transaction_type: TransactionType,
    pub(crate) category: Category,
    pub(crate) payment_method: PaymentMethod,
    pub(crate) user_id: UserID,
    today: Date,
}

impl TransactionBuilder {
    /// Create a builder for a new transaction.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::AmountOutOfRange] if `amount` is not within
    /// [MIN_AMOUNT] and [MAX_AMOUNT] (inclusive).
    pub fn new(
        amount: Decimal,
        transaction_type: TransactionType,
        user_id: UserID,
        today: Date,
    ) -> Result<Self, Error> {
        if amount < MIN_AMOUNT || amount > MAX_AMOUNT {
            return Err(Error::AmountOutOfRange(amount));
        }

        Ok(Self {
            amount,
            date: today,
            description: String::new(),
            transaction_type,
            category: Category::Other,
            payment_method: PaymentMethod::Other,
            user_id,
            today,
        })
    }

    /// Set the date for the transaction.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::FutureDate] if `date` is later than the
    /// `today` the builder was created with.
    pub fn date(mut self, date: Date) -> Result<Self, Error> {
        if date > self.today {
            return Err(Error::FutureDate(date));
        }

        self.date = date;
        Ok(self)
    }

    /// Set the description for the transaction.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyDescription] if `description` contains
    /// only whitespace, or an [Error::DescriptionTooLong] if it is longer than
    /// [MAX_DESCRIPTION_LENGTH] grapheme clusters.
    pub fn description(mut self, description: &str) -> Result<Self, Error> {
        if description.trim().is_empty() {
            return Err(Error::EmptyDescription);
        }

        if description.graphemes(true).count() > MAX_DESCRIPTION_LENGTH {
            return Err(Error::DescriptionTooLong);
        }

        self.description = description.to_owned();
        Ok(self)
    }

    /// Set the spending category for the transaction.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the payment method for the transaction.
    pub fn payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = payment_method;
        self
    }

    /// Turn the builder into a [Transaction] with the given row ID.
    ///
    /// Used when revalidating an update to an existing row. New transactions should
    /// instead be passed to [crate::stores::TransactionStore::create], which lets the
    /// database assign the ID.
    pub fn finalize(self, id: DatabaseID) -> Transaction {
        Transaction {
            id,
            amount: self.amount,
            date: self.date,
            description: self.description,
            transaction_type: self.transaction_type,
            category: self.category,
            payment_method: self.payment_method,
            user_id: self.user_id,
        }
    }
}
