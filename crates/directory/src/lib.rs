//! Node Directory Resolution
//!
//! Reads the node directory an account publishes in its JSON metadata:
//! - Fetches the account record through a [`LedgerAccountStore`]
//! - Validates the `nodes` array and the optional `failing_nodes` map
//! - Returns a normalized [`NodeDirectory`](hive_nodes_types::NodeDirectory)

pub mod errors;
pub mod metadata;
pub mod resolver;
pub mod store;

pub use errors::*;
pub use metadata::*;
pub use resolver::*;
pub use store::*;
