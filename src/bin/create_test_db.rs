use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use moneysaver::{ExpenseStore, MonthlyLimit, NewExpense, SQLiteExpenseStore, initialize_db};

/// A utility for creating a test database for the MoneySaver server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Sample expenses as (platform, amount in paise, days ago).
const SAMPLE_EXPENSES: [(&str, i64, i64); 10] = [
    ("Swiggy", 45_000, 0),
    ("Uber", 28_050, 1),
    ("Netflix", 64_900, 2),
    ("Electricity Board", 180_000, 3),
    ("Amazon", 249_999, 5),
    ("Zomato", 32_000, 6),
    ("Gym membership", 150_000, 8),
    ("Apollo Pharmacy", 76_025, 10),
    ("Coursera", 399_900, 12),
    ("Corner Store", 12_000, 13),
];

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
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let store = SQLiteExpenseStore::new(Arc::new(Mutex::new(conn)));
    store.set_limit(MonthlyLimit::new(Decimal::new(30_000, 0))?)?;

    println!("Creating sample expenses...");

    let today = OffsetDateTime::now_utc().date();

    for (platform, paise, days_ago) in SAMPLE_EXPENSES {
        let expense = NewExpense::new(
            platform,
            None,
            Decimal::new(paise, 2),
            today - Duration::days(days_ago),
        )?;
        store.create_expense(expense)?;
    }

    println!("Success!");

    Ok(())
}
