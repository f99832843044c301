//! Node set descriptors
//!
//! A node set contributes a family of node templates at once, each with its
//! own category path. Categories missing along those paths are created on
//! insertion rather than rejected.

use serde::{Deserialize, Serialize};

use crate::types::{NodeTemplate, NodeType};

/// One node produced by a node set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSetEntry {
    /// Id of the node within its set
    pub factory_id: String,
    /// Display name
    pub name: String,
    /// Identifier of the factory that creates the node
    pub factory: String,
    /// Category path the node is shown under
    #[serde(default)]
    pub category_path: String,
    /// Id of the sibling the node follows
    #[serde(default)]
    pub after_id: String,
    #[serde(default)]
    pub node_type: NodeType,
}

impl NodeSetEntry {
    pub fn new(
        factory_id: impl Into<String>,
        name: impl Into<String>,
        factory: impl Into<String>,
        category_path: impl Into<String>,
    ) -> Self {
        Self {
            factory_id: factory_id.into(),
            name: name.into(),
            factory: factory.into(),
            category_path: category_path.into(),
            after_id: String::new(),
            node_type: NodeType::default(),
        }
    }

    /// Set the id of the sibling this node follows
    pub fn after(mut self, after_id: impl Into<String>) -> Self {
        self.after_id = after_id.into();
        self
    }
}

/// A set of dynamically contributed node templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSetContribution {
    /// Id of the node set
    pub id: String,
    /// Identifier of the contributing plugin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_id: Option<String>,
    /// Icon given to categories created for this set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_category_icon: Option<String>,
    /// Whether all nodes of the set are expert nodes
    #[serde(default)]
    pub expert: bool,
    /// Nodes in the set
    #[serde(default)]
    pub entries: Vec<NodeSetEntry>,
}

impl NodeSetContribution {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            plugin_id: None,
            default_category_icon: None,
            expert: false,
            entries: Vec::new(),
        }
    }

    /// Add a node to the set
    pub fn with_entry(mut self, entry: NodeSetEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Set the contributing plugin
    pub fn with_plugin(mut self, plugin_id: impl Into<String>) -> Self {
        self.plugin_id = Some(plugin_id.into());
        self
    }

    /// Set the icon for created categories
    pub fn with_category_icon(mut self, icon: impl Into<String>) -> Self {
        self.default_category_icon = Some(icon.into());
        self
    }

    /// Node templates for every entry, in declaration order
    pub fn templates(&self) -> Vec<NodeTemplate> {
        self.entries
            .iter()
            .map(|entry| NodeTemplate {
                id: format!("{}.{}", self.id, entry.factory_id),
                name: entry.name.clone(),
                after_id: entry.after_id.clone(),
                factory: entry.factory.clone(),
                category_path: entry.category_path.clone(),
                node_type: entry.node_type,
                expert: self.expert,
                plugin_id: self.plugin_id.clone(),
                icon: None,
            })
            .collect()
    }
}
