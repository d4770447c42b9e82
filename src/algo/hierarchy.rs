//! Builds the pruned Category → Genre → Language tree from aggregated
//! leaf buckets.
//!
//! Values live only on terminal nodes; ancestor totals are derived at read
//! time. Children keep first-seen insertion order — the layered renderer
//! downstream relies on it being stable.

use indexmap::IndexMap;
use serde::Serialize;

use crate::algo::aggregate::LeafKey;

/// Path terminator: marks "assign the value to the node built so far"
/// instead of naming another tree level.
pub const END_TOKEN: &str = "end";

/// One node of the aggregation tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub name: String,
    pub children: Vec<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl Node {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            children: Vec::new(),
            value: None,
        }
    }

    /// Effective total: own leaf value plus all descendants. Never stored.
    pub fn total(&self) -> f64 {
        self.value.unwrap_or(0.0) + self.children.iter().map(Node::total).sum::<f64>()
    }

    /// True when the subtree holds no positive leaf value.
    fn is_empty_branch(&self) -> bool {
        self.children.is_empty() && self.value.unwrap_or(0.0) <= 0.0
    }
}

/// Render aggregated buckets as `Category|Genre|Language|end` path
/// sequences, preserving bucket order.
pub fn leaf_sequences(buckets: &IndexMap<LeafKey, f64>) -> Vec<(String, f64)> {
    buckets
        .iter()
        .map(|(key, &sum)| {
            let path = format!(
                "{}|{}|{}|{END_TOKEN}",
                key.category.as_str(),
                key.genre,
                key.language
            );
            (path, sum)
        })
        .collect()
}

/// Build the tree from path sequences, then prune empty branches.
///
/// Insertion walks each `|`-separated path, creating a child by exact name
/// when absent. Child lookup is a linear name scan — fine at fixed depth 3;
/// an indexed map-of-maps would replace it if the fan-out ever grew.
pub fn build_tree(sequences: &[(String, f64)]) -> Node {
    let mut root = Node::new("root");
    for (path, size) in sequences {
        let mut node = &mut root;
        for part in path.split('|') {
            if part == END_TOKEN {
                node.value = Some(node.value.unwrap_or(0.0) + size);
                break;
            }
            let pos = node.children.iter().position(|c| c.name == part);
            let idx = match pos {
                Some(i) => i,
                None => {
                    node.children.push(Node::new(part));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[idx];
        }
    }
    prune_empty_branches(&mut root);
    root
}

/// Bottom-up removal of nodes whose entire subtree has no positive leaf.
/// A single pass suffices because children are pruned before the parent
/// decides to keep them.
fn prune_empty_branches(node: &mut Node) {
    node.children.retain_mut(|child| {
        prune_empty_branches(child);
        !child.is_empty_branch()
    });
}
