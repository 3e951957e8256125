//! Debts and payments recorded against people.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;

pub use create::create_transaction_endpoint;
pub use db::{
    create_transaction, create_transaction_table, delete_transaction, get_transaction,
    get_transactions, update_transaction,
};
pub use delete::delete_transaction_endpoint;
pub use domain::{
    NewTransaction, Transaction, TransactionId, TransactionKind, TransactionUpdate,
    validate_amount,
};
pub use edit::{get_edit_transaction_page, update_transaction_endpoint};
pub use form::{TransactionFormData, TransactionFormDefaults, kind_badge, transaction_form_fields};
