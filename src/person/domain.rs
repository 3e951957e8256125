//! Core person domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use unicode_segmentation::UnicodeSegmentation;

use crate::Error;

/// A validated, non-empty name for a person.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Create a person's name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyPersonName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyPersonName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a person's name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }

    /// The first user-perceived character of the name in upper case, used
    /// for the avatar next to the name.
    pub fn initial(&self) -> String {
        self.0
            .graphemes(true)
            .next()
            .map(str::to_uppercase)
            .unwrap_or_default()
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for PersonName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PersonName::new(s)
    }
}

impl TryFrom<String> for PersonName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PersonName::new(&value)
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

impl Display for PersonName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a person.
pub type PersonId = i64;

/// Someone who owes money or has paid it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// The ID of the person.
    pub id: PersonId,
    /// The person's display name.
    pub name: PersonName,
    /// Debts minus payments over all of this person's transactions.
    pub total_debt: f64,
    /// When the total debt last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
    /// When the person was added.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the person's row last changed, including renames.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Form data for creating and renaming a person.
#[derive(Debug, Serialize, Deserialize)]
pub struct PersonFormData {
    /// The name as typed, before trimming.
    pub name: String,
}
