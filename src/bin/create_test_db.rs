use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::macros::date;

use so_no_rs::{
    NewTransaction, PasswordHash, PersonName, TransactionKind, ValidatedPassword, create_person,
    create_transaction, initialize_db, set_edit_password,
};

/// A utility for creating a demo database for the Sổ Nợ server.
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

    println!("Setting the edit password to \"test\"...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    set_edit_password(password_hash, &conn)?;

    println!("Adding people and transactions...");

    let ann = create_person(PersonName::new("Ann")?, &conn)?;
    let bao = create_person(PersonName::new("Bao")?, &conn)?;

    let transactions = [
        NewTransaction::new(ann.id, 50_000.0, TransactionKind::Debt, date!(2025 - 03 - 01))
            .description("Phở"),
        NewTransaction::new(bao.id, 150_000.0, TransactionKind::Debt, date!(2025 - 03 - 02))
            .description("Tiền xăng"),
        NewTransaction::new(bao.id, 30_000.0, TransactionKind::Payment, date!(2025 - 03 - 05))
            .description("Trả tiền cà phê"),
    ];

    for transaction in transactions {
        create_transaction(transaction, &conn)?;
    }

    println!("Success!");

    Ok(())
}
