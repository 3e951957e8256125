//! Core transaction domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, person::PersonId};

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// Whether a transaction adds to or pays off a person's debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money lent to the person. Increases their total.
    Debt,
    /// Money paid back by the person. Decreases their total.
    Payment,
}

impl TransactionKind {
    /// The value stored in the database and sent in forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Debt => "debt",
            TransactionKind::Payment => "payment",
        }
    }

    /// The name shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Debt => "Debt",
            TransactionKind::Payment => "Payment",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debt" => Ok(TransactionKind::Debt),
            "payment" => Ok(TransactionKind::Payment),
            other => Err(Error::InvalidTransactionKind(other.to_owned())),
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dated debt or payment against a person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub person_id: PersonId,
    /// Always zero or more, [Transaction::kind] gives the direction.
    pub amount: f64,
    pub kind: TransactionKind,
    pub description: String,
    pub date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The fields needed to create a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub person_id: PersonId,
    pub amount: f64,
    pub kind: TransactionKind,
    #[serde(default)]
    pub description: String,
    pub date: Date,
}

impl NewTransaction {
    /// Create a transaction with an empty description.
    pub fn new(person_id: PersonId, amount: f64, kind: TransactionKind, date: Date) -> Self {
        Self {
            person_id,
            amount,
            kind,
            description: String::new(),
            date,
        }
    }

    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }
}

/// A partial update to a transaction. Fields left as `None` are not changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionUpdate {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub kind: Option<TransactionKind>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<Date>,
}

/// Check that `amount` can be stored as a transaction amount.
///
/// # Errors
/// Returns [Error::InvalidAmount] if `amount` is negative, NaN or infinite.
pub fn validate_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount(amount))
    }
}
