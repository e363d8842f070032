//! This module defines the domain data types.

pub use password::{PasswordHash, ValidatedPassword};
pub use transaction::{
    Category, MAX_AMOUNT, MAX_DESCRIPTION_LENGTH, MIN_AMOUNT, PaymentMethod, Transaction,
    TransactionBuilder, TransactionType,
};
pub use user::{NewUser, Role, User, UserID};

mod password;
mod transaction;
mod user;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;
