use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, macros::date};

use spender_ledger::{
    create_spender, initialize_db,
    stores::{SQLiteTransactionStore, TransactionStore},
    transaction::TransactionBody,
};

/// A utility for creating a test database for the REST API server of spender_ledger.
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
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test spenders...");
    let spenders = [
        create_spender("Alice", "alice@example.com", &conn)?,
        create_spender("Bob", "bob@example.com", &conn)?,
    ];

    println!("Creating test transactions...");
    let store = SQLiteTransactionStore::new(Arc::new(Mutex::new(conn)));
    let start_date = date!(2024 - 01 - 01);
    let categories = ["food", "transport", "shopping", "rent"];

    for (i, &spender_id) in spenders.iter().enumerate() {
        store.insert(&salary(start_date, spender_id))?;

        for day in 0..30_i64 {
            let category = categories[(day as usize + i) % categories.len()];
            store.insert(&TransactionBody {
                date: start_date + Duration::days(day),
                amount: 5.0 + (day * 3 % 40) as f64,
                category: category.to_owned(),
                transaction_type: "expense".to_owned(),
                spender_id,
                note: String::new(),
                image_url: String::new(),
            })?;
        }
    }

    println!("Success!");

    Ok(())
}

fn salary(date: Date, spender_id: i64) -> TransactionBody {
    TransactionBody {
        date,
        amount: 3000.0,
        category: "salary".to_owned(),
        transaction_type: "income".to_owned(),
        spender_id,
        note: "monthly pay".to_owned(),
        image_url: String::new(),
    }
}
