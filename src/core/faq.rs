//! FAQ decision tree for the help widget.
//!
//! Nodes come from configuration. A node's follow-ups are the questions offered
//! after its answer; nodes that are nobody's follow-up are the entry points.
//! The tree holds no per-user state: the caller passes the node it is on.

use crate::{
    config::store::FaqNodeConfig,
    errors::{Error, Result},
};
use std::collections::{HashMap, HashSet};

/// One question and its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqNode {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub follow_ups: Vec<String>,
}

impl From<FaqNodeConfig> for FaqNode {
    fn from(value: FaqNodeConfig) -> Self {
        Self {
            id: value.id,
            question: value.question,
            answer: value.answer,
            follow_ups: value.follow_ups,
        }
    }
}

/// Validated FAQ tree.
#[derive(Debug, Clone, Default)]
pub struct FaqTree {
    nodes: Vec<FaqNode>,
    index: HashMap<String, usize>,
}

impl FaqTree {
    /// Builds a tree, rejecting duplicate IDs and dangling follow-ups.
    ///
    /// # Errors
    /// [`Error::Config`] describing the first problem found.
    pub fn new(nodes: Vec<FaqNode>) -> Result<Self> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), position).is_some() {
                return Err(Error::Config {
                    message: format!("Duplicate FAQ id '{}'", node.id),
                });
            }
        }

        for node in &nodes {
            if let Some(missing) = node.follow_ups.iter().find(|id| !index.contains_key(*id)) {
                return Err(Error::Config {
                    message: format!("FAQ '{}' points to unknown follow-up '{missing}'", node.id),
                });
            }
        }

        Ok(Self { nodes, index })
    }

    /// Builds a tree from configuration entries.
    ///
    /// # Errors
    /// See [`FaqTree::new`].
    pub fn from_config(entries: &[FaqNodeConfig]) -> Result<Self> {
        Self::new(entries.iter().cloned().map(FaqNode::from).collect())
    }

    /// Whether any content is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node by ID.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&FaqNode> {
        self.index.get(id).map(|&position| &self.nodes[position])
    }

    /// Every node, in configuration order.
    #[must_use]
    pub fn nodes(&self) -> &[FaqNode] {
        &self.nodes
    }

    /// Entry points: questions no other node lists as a follow-up.
    #[must_use]
    pub fn roots(&self) -> Vec<&FaqNode> {
        let referenced: HashSet<&str> = self
            .nodes
            .iter()
            .flat_map(|node| node.follow_ups.iter().map(String::as_str))
            .collect();

        self.nodes
            .iter()
            .filter(|node| !referenced.contains(node.id.as_str()))
            .collect()
    }

    /// Questions offered after answering `id`. Unknown IDs have none.
    #[must_use]
    pub fn follow_ups(&self, id: &str) -> Vec<&FaqNode> {
        self.node(id)
            .map(|node| {
                node.follow_ups
                    .iter()
                    .filter_map(|child| self.node(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Case-insensitive lookup by ID or question text, for free-form input.
    #[must_use]
    pub fn find(&self, input: &str) -> Option<&FaqNode> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.node(input.trim()).or_else(|| {
            self.nodes
                .iter()
                .find(|node| node.question.to_lowercase().contains(&needle))
        })
    }
}
