//! Directory resolver implementation

use crate::errors::*;
use crate::metadata::parse_directory;
use crate::store::LedgerAccountStore;
use hive_nodes_types::{AccountName, NodeDirectory};
use std::sync::Arc;
use tracing::info;

/// Directory resolver
///
/// Resolves an account name to the node directory it publishes:
/// 1. Fetch the account record from the ledger store
/// 2. Check the metadata field is present
/// 3. Parse it as JSON
/// 4. Validate the `nodes` array
/// 5. Normalize `failing_nodes` (defaulting to empty)
///
/// The resolver holds no state of its own; clones share the same store.
#[derive(Clone)]
pub struct DirectoryResolver {
    store: Arc<dyn LedgerAccountStore>,
}

impl DirectoryResolver {
    /// Create a resolver over the given account store
    pub fn new(store: Arc<dyn LedgerAccountStore>) -> Self {
        Self { store }
    }

    /// Resolve the directory published by `account`
    pub async fn resolve(&self, account: &AccountName) -> Result<NodeDirectory> {
        info!(account = %account, "Fetching account metadata");

        let records = self
            .store
            .get_accounts(std::slice::from_ref(account))
            .await
            .map_err(|err| DirectoryError::StoreUnavailable {
                account: account.to_string(),
                message: err.to_string(),
            })?;

        let record = records
            .into_iter()
            .next()
            .ok_or_else(|| DirectoryError::AccountNotFound {
                account: account.to_string(),
            })?;

        let directory = parse_directory(account, record.metadata())?;

        info!(
            account = %account,
            nodes = directory.nodes.len(),
            failing_nodes = directory.failing_nodes.len(),
            "Found nodes in account metadata"
        );

        Ok(directory)
    }

    /// Resolve several accounts concurrently, returning results in input order
    pub async fn resolve_many(
        &self,
        accounts: &[AccountName],
    ) -> Vec<(AccountName, Result<NodeDirectory>)> {
        let lookups = accounts.iter().map(|account| async move {
            (account.clone(), self.resolve(account).await)
        });

        futures::future::join_all(lookups).await
    }
}

impl std::fmt::Debug for DirectoryResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StaticAccountStore;

    fn name(raw: &str) -> AccountName {
        AccountName::new(raw).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_published_directory() {
        let store = Arc::new(StaticAccountStore::new());
        store.insert(
            name("flowerengine"),
            Some(
                r#"{"nodes":["https://a/","https://b/"],"failing_nodes":{"https://c/":"timeout"}}"#
                    .into(),
            ),
        );
        let resolver = DirectoryResolver::new(store);

        let directory = resolver.resolve(&name("flowerengine")).await.unwrap();
        assert_eq!(directory.nodes, vec!["https://a/", "https://b/"]);
        assert_eq!(directory.failure_reason("https://c/"), Some("timeout"));
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let resolver = DirectoryResolver::new(Arc::new(StaticAccountStore::new()));

        let err = resolver.resolve(&name("ghost")).await.unwrap_err();
        assert_eq!(err.kind(), DirectoryErrorKind::AccountNotFound);
        assert_eq!(err.account(), "ghost");
    }

    #[tokio::test]
    async fn test_store_failure_is_store_unavailable() {
        let store = Arc::new(StaticAccountStore::new());
        store.insert(name("flowerengine"), Some(r#"{"nodes":[]}"#.into()));
        store.fail_with("connection reset by peer");
        let resolver = DirectoryResolver::new(store);

        let err = resolver.resolve(&name("flowerengine")).await.unwrap_err();
        assert_eq!(err.kind(), DirectoryErrorKind::StoreUnavailable);
        assert!(err.to_string().contains("connection reset by peer"));
    }

    #[tokio::test]
    async fn test_account_without_metadata() {
        let store = Arc::new(StaticAccountStore::new());
        store.insert(name("blank"), None);
        let resolver = DirectoryResolver::new(store);

        let err = resolver.resolve(&name("blank")).await.unwrap_err();
        assert_eq!(err.kind(), DirectoryErrorKind::MetadataMissing);
    }
}
