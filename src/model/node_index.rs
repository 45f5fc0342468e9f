use std::collections::HashMap;

use super::{Model, NodeId};
use crate::point::alias::NODE_PREFIX;
use crate::point::{pad2, split_prefix_number};

/// Lookup from normalized node names to nodes of one loaded model.
///
/// Built once after the model finishes loading and never mutated
/// afterwards. When two nodes normalize to the same key the first one
/// visited keeps it.
#[derive(Debug, Default)]
pub struct NodeIndex {
    keys: HashMap<String, NodeId>,
}

impl NodeIndex {
    /// Indexes every named node of `model`.
    ///
    /// Each node is registered under its raw name and its uppercase name.
    /// Nodes whose uppercase name starts with `<letters><digits>`, usually
    /// followed by a separator and a descriptive suffix (`LI4_HEGU`), are also
    /// registered under the compact, padded and `PT_`-padded forms of that
    /// leading id. `PT_` names never match that shape and are only reachable
    /// by their full name.
    #[must_use]
    pub fn build(model: &Model) -> Self {
        let mut index = Self::default();
        for (id, node) in model.iter() {
            if node.name.is_empty() {
                continue;
            }
            index.insert(&node.name, id);

            let upper = node.name.to_uppercase();
            index.insert(&upper, id);

            if let Some((prefix, num, _)) = split_prefix_number(&upper) {
                let padded = format!("{prefix}{}", pad2(num));
                index.insert(&format!("{prefix}{num}"), id);
                index.insert(&padded, id);
                index.insert(&format!("{NODE_PREFIX}{padded}"), id);
            }
        }
        tracing::debug!(keys = index.len(), nodes = model.len(), "node index built");
        index
    }

    /// Returns the node registered under `name`, if any.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.keys.get(name).copied()
    }

    /// Returns the first of `candidates` present in the index, with its node.
    pub fn first_match<'a, I>(&self, candidates: I) -> Option<(&'a str, NodeId)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        candidates
            .into_iter()
            .find_map(|name| self.lookup(name).map(|node| (name, node)))
    }

    /// Number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn insert(&mut self, key: &str, node: NodeId) {
        self.keys.entry(key.to_owned()).or_insert(node);
    }
}
