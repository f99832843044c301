//! Serializable view of the ordered repository tree
//!
//! A snapshot is what a tree view renders: every container's children in
//! display order, with unresolved after declarations flagged.

use serde::{Deserialize, Serialize};

use crate::container::Container;
use crate::error::Result;
use crate::ordering::Orderable;
use crate::types::RepositoryObject;

/// One entry of the ordered tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotNode {
    pub id: String,
    pub name: String,
    /// `category`, `node` or `meta_node`
    pub kind: String,
    /// Factory identifier for node templates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory: Option<String>,
    /// The after id of this entry could not be resolved
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub problem: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SnapshotNode>,
}

/// Ordered tree of the whole repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSnapshot {
    pub children: Vec<SnapshotNode>,
}

impl TreeSnapshot {
    /// Capture the ordered tree below a container
    pub fn capture(container: &Container) -> Result<Self> {
        Ok(Self {
            children: capture_children(container)?,
        })
    }

    /// Ids in depth-first display order, with nesting depth
    pub fn walk(&self) -> Vec<(usize, &str)> {
        let mut out = Vec::new();
        let mut stack: Vec<(usize, &SnapshotNode)> =
            self.children.iter().rev().map(|n| (0, n)).collect();
        while let Some((depth, node)) = stack.pop() {
            out.push((depth, node.id.as_str()));
            stack.extend(node.children.iter().rev().map(|c| (depth + 1, c)));
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn capture_children(container: &Container) -> Result<Vec<SnapshotNode>> {
    let ordered = container.children()?;
    let mut nodes = Vec::with_capacity(ordered.items.len());
    for object in &ordered.items {
        let problem = ordered
            .problems
            .iter()
            .any(|p| std::ptr::eq(*p, *object));
        let (factory, children) = match object {
            RepositoryObject::Category(category) => (None, capture_children(&category.children)?),
            RepositoryObject::Node(node) => (Some(node.factory.clone()), Vec::new()),
            RepositoryObject::MetaNode(_) => (None, Vec::new()),
        };
        nodes.push(SnapshotNode {
            id: object.id().to_string(),
            name: object.name().to_string(),
            kind: object.kind_label().to_string(),
            factory,
            problem,
            children,
        });
    }
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, NodeTemplate};

    fn sample() -> Container {
        let mut io = Category::new("io", "IO");
        io.children.add_child(NodeTemplate::new("writer", "Writer", "io.Writer"));
        io.children.add_child(NodeTemplate::new("reader", "Reader", "io.Reader"));

        let mut root = Container::new();
        root.add_child(Category::new("misc", "Misc").after("gone"));
        root.add_child(io);
        root
    }

    #[test]
    fn test_capture_order_and_problems() {
        let snapshot = TreeSnapshot::capture(&sample()).unwrap();

        assert_eq!(
            snapshot.walk(),
            vec![(0, "io"), (1, "reader"), (1, "writer"), (0, "misc")]
        );
        assert!(!snapshot.children[0].problem);
        assert!(snapshot.children[1].problem);
        assert_eq!(
            snapshot.children[0].children[0].factory.as_deref(),
            Some("io.Reader")
        );
    }

    #[test]
    fn test_json_shape() {
        let snapshot = TreeSnapshot::capture(&sample()).unwrap();
        let json = snapshot.to_json().unwrap();

        assert!(json.contains("\"kind\":\"category\""));
        assert!(json.contains("\"problem\":true"));
        // Leaves carry no children array
        assert!(!json.contains("\"children\":[]"));

        let parsed: TreeSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
