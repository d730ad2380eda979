use async_trait::async_trait;
use hive_nodes_types::{AccountName, AccountRecord};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by an account store backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("account store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

/// Lookup capability over ledger accounts.
///
/// Implementations return one record per account that exists; unknown names
/// are simply absent from the result.
#[async_trait]
pub trait LedgerAccountStore: Send + Sync {
    async fn get_accounts(&self, names: &[AccountName]) -> Result<Vec<AccountRecord>, StoreError>;
}

/// In-memory account store.
#[derive(Clone, Default)]
pub struct StaticAccountStore {
    records: Arc<RwLock<HashMap<AccountName, AccountRecord>>>,
    failure: Arc<RwLock<Option<String>>>,
}

impl StaticAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `json_metadata` for `name`, replacing any existing record.
    pub fn insert(&self, name: AccountName, json_metadata: Option<String>) {
        let record = AccountRecord::new(name.as_str(), json_metadata);
        self.records.write().insert(name, record);
    }

    pub fn remove(&self, name: &AccountName) -> Option<AccountRecord> {
        self.records.write().remove(name)
    }

    /// Make every subsequent lookup fail with `message` until cleared.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write() = Some(message.into());
    }

    pub fn clear_failure(&self) {
        *self.failure.write() = None;
    }
}

#[async_trait]
impl LedgerAccountStore for StaticAccountStore {
    async fn get_accounts(&self, names: &[AccountName]) -> Result<Vec<AccountRecord>, StoreError> {
        if let Some(message) = self.failure.read().clone() {
            return Err(StoreError::Backend(message));
        }

        let records = self.records.read();
        Ok(names
            .iter()
            .filter_map(|name| records.get(name).cloned())
            .collect())
    }
}
