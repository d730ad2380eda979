use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors that can occur when constructing an [`AccountName`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountNameError {
    #[error("account name must not be empty")]
    Empty,
}

/// Name of an account on the ledger.
///
/// The only rule enforced here is that the name is non-empty. Anything else
/// (length limits, allowed characters) is left to the account store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountName(String);

impl AccountName {
    pub fn new(name: impl Into<String>) -> Result<Self, AccountNameError> {
        let name = name.into();
        if name.is_empty() {
            return Err(AccountNameError::Empty);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AccountName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for AccountName {
    type Err = AccountNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AccountName {
    type Error = AccountNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountName> for String {
    fn from(value: AccountName) -> Self {
        value.0
    }
}

/// The subset of a ledger account record the directory cares about.
///
/// Real account records carry dozens of unrelated fields (balances, keys,
/// voting data); those are ignored when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    #[serde(default)]
    pub name: String,
    /// Raw JSON metadata string published by the account owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_metadata: Option<String>,
}

impl AccountRecord {
    pub fn new(name: impl Into<String>, json_metadata: Option<String>) -> Self {
        Self {
            name: name.into(),
            json_metadata,
        }
    }

    /// Metadata string, treating an empty string the same as a missing field.
    pub fn metadata(&self) -> Option<&str> {
        self.json_metadata.as_deref().filter(|raw| !raw.is_empty())
    }
}
