//! Pure aggregation over a user's transactions.
//!
//! These functions back the report endpoints. Each one makes a single pass over a slice
//! of transactions that the caller has already fetched for the owning user, so ownership
//! is settled before any arithmetic happens. Totals use exact decimal arithmetic.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Category, Transaction, TransactionType};

/// Full English month names in calendar order.
const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Totals for a user's transaction history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionSummary {
    /// The sum of all income amounts.
    pub total_income: Decimal,
    /// The sum of all expense amounts.
    pub total_expense: Decimal,
    /// Total income minus total expense. May be negative.
    pub balance: Decimal,
    /// How many transactions were summarized, counting both types.
    pub total_transactions: usize,
}

/// The total for a single calendar month in a [monthly report](monthly_total_by_type).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// The full English month name, e.g. "March".
    pub month: &'static str,
    /// The sum of the matching transaction amounts in this month.
    pub total: Decimal,
}

/// Total up a user's incomes and expenses.
///
/// The balance is income minus expense and may be negative. An empty slice gives all
/// zeros.
pub fn summarize(transactions: &[Transaction]) -> TransactionSummary {
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;

    for transaction in transactions {
        match transaction.transaction_type() {
            TransactionType::Income => total_income += transaction.amount(),
            TransactionType::Expense => total_expense += transaction.amount(),
        }
    }

    TransactionSummary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        total_transactions: transactions.len(),
    }
}

/// Total up the transactions of the given type for each calendar month.
///
/// Transactions group by month regardless of year, so a March 2024 expense and a March
/// 2025 expense land in the same bucket. The result always holds exactly twelve entries
/// in calendar order, with zero totals for months that saw no matching transactions.
pub fn monthly_total_by_type(
    transactions: &[Transaction],
    transaction_type: TransactionType,
) -> Vec<MonthlyTotal> {
    let mut totals = [Decimal::ZERO; 12];

    for transaction in transactions {
        if transaction.transaction_type() == transaction_type {
            totals[transaction.date().month() as usize - 1] += transaction.amount();
        }
    }

    totals
        .into_iter()
        .zip(MONTH_NAMES)
        .map(|(total, month)| MonthlyTotal { month, total })
        .collect()
}

/// Total up a user's expenses per spending category.
///
/// Income transactions are ignored. The map is sparse: categories without at least one
/// expense do not appear, so it never contains a zero total.
pub fn expense_total_by_category(transactions: &[Transaction]) -> HashMap<Category, Decimal> {
    let mut totals = HashMap::new();

    for transaction in transactions {
        if transaction.transaction_type() == TransactionType::Expense {
            *totals.entry(transaction.category()).or_insert(Decimal::ZERO) +=
                transaction.amount();
        }
    }

    totals
}
