//! Parsing and validation of the directory published in account metadata.

use crate::errors::*;
use hive_nodes_types::{AccountName, NodeDirectory};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Key holding the ordered list of usable nodes.
pub const NODES_FIELD: &str = "nodes";
/// Key holding the optional `endpoint -> reason` map of degraded nodes.
pub const FAILING_NODES_FIELD: &str = "failing_nodes";

/// Parsed account metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataDocument(Value);

impl MetadataDocument {
    /// Parse a raw metadata string. Any well-formed JSON is accepted here;
    /// shape checks happen when the fields are read.
    pub fn parse(account: &AccountName, raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map(Self)
            .map_err(|err| DirectoryError::MetadataMalformed {
                account: account.to_string(),
                message: err.to_string(),
            })
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// The `nodes` array in source order. Entries are not validated as URLs.
    pub fn nodes(&self, account: &AccountName) -> Result<Vec<String>> {
        match self.0.get(NODES_FIELD) {
            Some(Value::Array(entries)) => Ok(entries.iter().map(entry_text).collect()),
            _ => Err(DirectoryError::NodesFieldInvalid {
                account: account.to_string(),
            }),
        }
    }

    /// The `failing_nodes` map. Anything other than a JSON object reads as
    /// empty so bad supplementary data never blocks node discovery.
    pub fn failing_nodes(&self, account: &AccountName) -> BTreeMap<String, String> {
        match self.0.get(FAILING_NODES_FIELD) {
            None | Some(Value::Null) => BTreeMap::new(),
            Some(Value::Object(entries)) => entries
                .iter()
                .map(|(node, reason)| (node.clone(), entry_text(reason)))
                .collect(),
            Some(other) => {
                warn!(
                    account = %account,
                    found = json_type(other),
                    "Ignoring failing_nodes in account metadata: expected an object"
                );
                BTreeMap::new()
            }
        }
    }

    pub fn into_directory(self, account: &AccountName) -> Result<NodeDirectory> {
        let nodes = self.nodes(account)?;
        let failing_nodes = self.failing_nodes(account);
        Ok(NodeDirectory::new(nodes, failing_nodes))
    }
}

/// Validate raw account metadata and normalize it into a [`NodeDirectory`].
///
/// `raw` is the account's metadata field; `None` and `""` both mean the
/// account published nothing.
pub fn parse_directory(account: &AccountName, raw: Option<&str>) -> Result<NodeDirectory> {
    let raw = raw
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| DirectoryError::MetadataMissing {
            account: account.to_string(),
        })?;

    let document = MetadataDocument::parse(account, raw)?;
    debug!(account = %account, "Parsed account JSON metadata");

    document.into_directory(account)
}

// Strings are taken verbatim; other JSON values keep their JSON text.
fn entry_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
