use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use clap::Parser;
use email_address::EmailAddress;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Date, Duration, OffsetDateTime};

use budgetflow::{
    db::initialize,
    models::{
        Category, NewUser, PasswordHash, PaymentMethod, Role, Transaction, TransactionType, UserID,
    },
    stores::{SQLiteTransactionStore, SQLiteUserStore, TransactionStore, UserStore},
};

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "anunguessablekindofpassword7";

/// A utility for creating a demo database for the BudgetFlow REST API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let connection = Connection::open(output_path)?;
    initialize(&connection)?;
    let connection = Arc::new(Mutex::new(connection));

    println!("Creating demo user...");
    let user = SQLiteUserStore::new(connection.clone()).create(NewUser {
        email: EmailAddress::from_str(DEMO_EMAIL)?,
        password_hash: PasswordHash::from_raw_password(DEMO_PASSWORD, PasswordHash::DEFAULT_COST)?,
        first_name: "Demo".to_owned(),
        last_name: "User".to_owned(),
        role: Role::User,
    })?;

    println!("Creating sample transactions...");
    let mut transaction_store = SQLiteTransactionStore::new(connection);
    let today = OffsetDateTime::now_utc().date();

    for (amount, days_ago, description, transaction_type, category, payment_method) in
        sample_transactions()
    {
        let builder = Transaction::build(amount, transaction_type, user.id(), today)?
            .date(today - Duration::days(days_ago))?
            .description(description)?
            .category(category)
            .payment_method(payment_method);

        transaction_store.create(builder)?;
    }

    print_summary(user.id(), today);

    Ok(())
}

type SampleTransaction = (
    Decimal,
    i64,
    &'static str,
    TransactionType,
    Category,
    PaymentMethod,
);

fn sample_transactions() -> Vec<SampleTransaction> {
    vec![
        (
            Decimal::new(320_000, 2),
            28,
            "Monthly salary",
            TransactionType::Income,
            Category::Salary,
            PaymentMethod::BankTransfer,
        ),
        (
            Decimal::new(145_000, 2),
            27,
            "Rent for the flat",
            TransactionType::Expense,
            Category::Rent,
            PaymentMethod::BankTransfer,
        ),
        (
            Decimal::new(8_450, 2),
            21,
            "Weekly groceries",
            TransactionType::Expense,
            Category::Food,
            PaymentMethod::Card,
        ),
        (
            Decimal::new(2_750, 2),
            14,
            "Bus pass top up",
            TransactionType::Expense,
            Category::Transport,
            PaymentMethod::Card,
        ),
        (
            Decimal::new(6_200, 2),
            10,
            "Power and internet",
            TransactionType::Expense,
            Category::Utilities,
            PaymentMethod::BankTransfer,
        ),
        (
            Decimal::new(3_600, 2),
            6,
            "Dinner and a movie",
            TransactionType::Expense,
            Category::Entertainment,
            PaymentMethod::Cash,
        ),
        (
            Decimal::new(15_000, 2),
            3,
            "Sold the old bike",
            TransactionType::Income,
            Category::Other,
            PaymentMethod::Cash,
        ),
    ]
}

fn print_summary(user_id: UserID, today: Date) {
    println!("Success!");
    println!();
    println!("Demo user (ID {user_id}): {DEMO_EMAIL}");
    println!("Password: {DEMO_PASSWORD}");
    println!("Transactions dated relative to {today}.");
}
