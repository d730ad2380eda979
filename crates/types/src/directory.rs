use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Normalized node directory published by an account.
///
/// `nodes` keeps the order of the source document; callers may treat the
/// position as a preference ranking. `failing_nodes` maps a degraded endpoint
/// to the reason it was flagged and is always present, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDirectory {
    pub nodes: Vec<String>,
    #[serde(default)]
    pub failing_nodes: BTreeMap<String, String>,
}

impl NodeDirectory {
    pub fn new(nodes: Vec<String>, failing_nodes: BTreeMap<String, String>) -> Self {
        Self {
            nodes,
            failing_nodes,
        }
    }

    /// True when the directory lists no usable nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_failing(&self, node: &str) -> bool {
        self.failing_nodes.contains_key(node)
    }

    /// Reason a node was flagged as failing, if it was.
    pub fn failure_reason(&self, node: &str) -> Option<&str> {
        self.failing_nodes.get(node).map(String::as_str)
    }
}
