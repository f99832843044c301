//! Core types for the node repository
//!
//! These types define the objects shown in the repository tree:
//! categories (which hold children) and node templates (leaves).

use serde::{Deserialize, Serialize};

use crate::container::Container;
use crate::ordering::{ItemKind, Orderable};

/// Unique identifier of a repository object within its container
pub type ObjectId = String;

/// Name given to categories contributed without one
pub const MISSING_NAME: &str = "!name is missing!";

/// Root path of the repository tree
pub const ROOT_PATH: &str = "/";

/// Kind of node a template creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Reads data into a workflow
    Source,
    /// Writes data out of a workflow
    Sink,
    /// Trains a model
    Learner,
    /// Applies a model
    Predictor,
    /// Transforms data
    Manipulator,
    /// Displays data
    Visualizer,
    /// Wraps a nested workflow
    Meta,
    /// Anything else
    #[default]
    Other,
}

/// A repository category, usually contributed by a plugin
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Level id, unique among its siblings
    pub id: ObjectId,
    /// Display name
    pub name: String,
    /// Id of the sibling category this one follows
    #[serde(default)]
    pub after_id: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Path of the parent category (slash separated, `/` for the root)
    #[serde(default = "default_path")]
    pub path: String,
    /// Identifier of the contributing plugin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_id: Option<String>,
    /// Icon location, resolved by the host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Nested categories and templates
    #[serde(skip)]
    pub children: Container,
}

fn default_path() -> String {
    ROOT_PATH.to_string()
}

impl Category {
    /// Create a category at the repository root
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            name: if name.is_empty() {
                MISSING_NAME.to_string()
            } else {
                name
            },
            after_id: String::new(),
            description: String::new(),
            path: default_path(),
            plugin_id: None,
            icon: None,
            children: Container::new(),
        }
    }

    /// Set the id of the category this one follows
    pub fn after(mut self, after_id: impl Into<String>) -> Self {
        self.after_id = after_id.into();
        self
    }

    /// Set the parent path
    pub fn at_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the contributing plugin
    pub fn with_plugin(mut self, plugin_id: impl Into<String>) -> Self {
        self.plugin_id = Some(plugin_id.into());
        self
    }

    /// Set the icon location
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Full path of this category, including its own id
    pub fn full_path(&self) -> String {
        join_path(&self.path, &self.id)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Id: {} Name: {} After-id: {}",
            self.id, self.name, self.after_id
        )
    }
}

/// Template for creating a node, a leaf of the repository tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTemplate {
    /// Unique id
    pub id: ObjectId,
    /// Display name
    pub name: String,
    /// Id of the sibling template this one follows
    #[serde(default)]
    pub after_id: String,
    /// Identifier of the factory that creates the node
    pub factory: String,
    /// Category path the template is shown under
    #[serde(default = "default_path")]
    pub category_path: String,
    /// Kind of node
    #[serde(default)]
    pub node_type: NodeType,
    /// Only shown in expert mode
    #[serde(default)]
    pub expert: bool,
    /// Identifier of the contributing plugin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_id: Option<String>,
    /// Icon location, resolved by the host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl NodeTemplate {
    /// Create a template at the repository root
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        factory: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            after_id: String::new(),
            factory: factory.into(),
            category_path: default_path(),
            node_type: NodeType::default(),
            expert: false,
            plugin_id: None,
            icon: None,
        }
    }

    /// Set the id of the template this one follows
    pub fn after(mut self, after_id: impl Into<String>) -> Self {
        self.after_id = after_id.into();
        self
    }

    /// Set the category path
    pub fn in_category(mut self, path: impl Into<String>) -> Self {
        self.category_path = path.into();
        self
    }

    /// Set the node type
    pub fn of_type(mut self, node_type: NodeType) -> Self {
        self.node_type = node_type;
        self
    }

    /// Mark as expert node
    pub fn expert(mut self) -> Self {
        self.expert = true;
        self
    }

    /// Set the contributing plugin
    pub fn with_plugin(mut self, plugin_id: impl Into<String>) -> Self {
        self.plugin_id = Some(plugin_id.into());
        self
    }
}

/// Template for a predefined nested workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaNodeTemplate {
    /// Unique id
    pub id: ObjectId,
    /// Display name
    pub name: String,
    /// Id of the sibling template this one follows
    #[serde(default)]
    pub after_id: String,
    /// Category path the template is shown under
    #[serde(default = "default_path")]
    pub category_path: String,
    /// Workflow directory inside the contributing plugin
    pub workflow_dir: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub expert: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl MetaNodeTemplate {
    /// Create a meta node template at the repository root
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        workflow_dir: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            after_id: String::new(),
            category_path: default_path(),
            workflow_dir: workflow_dir.into(),
            description: String::new(),
            expert: false,
            plugin_id: None,
            icon: None,
        }
    }

    /// Set the id of the template this one follows
    pub fn after(mut self, after_id: impl Into<String>) -> Self {
        self.after_id = after_id.into();
        self
    }

    /// Set the category path
    pub fn in_category(mut self, path: impl Into<String>) -> Self {
        self.category_path = path.into();
        self
    }
}

/// Any object that can live in a repository container
#[derive(Debug, Clone)]
pub enum RepositoryObject {
    Category(Category),
    Node(NodeTemplate),
    MetaNode(MetaNodeTemplate),
}

impl RepositoryObject {
    /// The category, if this object is one
    pub fn as_category(&self) -> Option<&Category> {
        match self {
            Self::Category(category) => Some(category),
            _ => None,
        }
    }

    /// Mutable access to the category, if this object is one
    pub fn as_category_mut(&mut self) -> Option<&mut Category> {
        match self {
            Self::Category(category) => Some(category),
            _ => None,
        }
    }

    /// The node template, if this object is one
    pub fn as_node(&self) -> Option<&NodeTemplate> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Child container of a category
    pub fn container(&self) -> Option<&Container> {
        self.as_category().map(|c| &c.children)
    }

    /// Mutable child container of a category
    pub fn container_mut(&mut self) -> Option<&mut Container> {
        self.as_category_mut().map(|c| &mut c.children)
    }

    /// Set the parent path of this object and of everything below it
    pub fn relocate(&mut self, parent_path: &str) {
        match self {
            Self::Category(category) => {
                category.path = parent_path.to_string();
                let own_path = category.full_path();
                for child in category.children.raw_children_mut() {
                    child.relocate(&own_path);
                }
            }
            Self::Node(node) => node.category_path = parent_path.to_string(),
            Self::MetaNode(meta) => meta.category_path = parent_path.to_string(),
        }
    }

    /// Short label for logs and snapshots
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Category(_) => "category",
            Self::Node(_) => "node",
            Self::MetaNode(_) => "meta_node",
        }
    }
}

impl Orderable for RepositoryObject {
    fn id(&self) -> &str {
        match self {
            Self::Category(c) => &c.id,
            Self::Node(n) => &n.id,
            Self::MetaNode(m) => &m.id,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Category(c) => &c.name,
            Self::Node(n) => &n.name,
            Self::MetaNode(m) => &m.name,
        }
    }

    fn after_id(&self) -> &str {
        match self {
            Self::Category(c) => &c.after_id,
            Self::Node(n) => &n.after_id,
            Self::MetaNode(m) => &m.after_id,
        }
    }

    fn kind(&self) -> ItemKind {
        match self {
            Self::Category(_) => ItemKind::Category,
            Self::Node(_) | Self::MetaNode(_) => ItemKind::Leaf,
        }
    }
}

impl From<Category> for RepositoryObject {
    fn from(category: Category) -> Self {
        Self::Category(category)
    }
}

impl From<NodeTemplate> for RepositoryObject {
    fn from(node: NodeTemplate) -> Self {
        Self::Node(node)
    }
}

impl From<MetaNodeTemplate> for RepositoryObject {
    fn from(meta: MetaNodeTemplate) -> Self {
        Self::MetaNode(meta)
    }
}

/// Split a category path into its segments, ignoring empty ones
pub fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').map(str::trim).filter(|s| !s.is_empty())
}

/// Append a segment to a category path
pub fn join_path(parent: &str, segment: &str) -> String {
    let parent = parent.trim_end_matches('/');
    if parent.is_empty() {
        format!("/{}", segment)
    } else {
        format!("{}/{}", parent, segment)
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::*;

    #[test]
    fn test_category_defaults() {
        let category = Category::new("io", "IO");
        assert_eq!(category.path, "/");
        assert!(category.after_id.is_empty());
        assert!(category.children.is_empty());
        assert_eq!(category.full_path(), "/io");
    }

    #[test]
    fn test_category_missing_name() {
        let category = Category::new("io", "");
        assert_eq!(category.name, MISSING_NAME);
    }

    #[test]
    fn test_category_display() {
        let category = Category::new("io", "IO").after("data");
        assert_eq!(category.to_string(), "Id: io Name: IO After-id: data");
    }

    #[test]
    fn test_full_path_nested() {
        let category = Category::new("read", "Read").at_path("/io");
        assert_eq!(category.full_path(), "/io/read");
    }

    #[test]
    fn test_path_segments() {
        let segments: Vec<_> = path_segments("/io//read/ ").collect();
        assert_eq!(segments, vec!["io", "read"]);
        assert_eq!(path_segments("/").count(), 0);
        assert_eq!(path_segments("").count(), 0);
    }

    #[test]
    fn test_object_kinds() {
        let cat: RepositoryObject = Category::new("c", "C").into();
        let node: RepositoryObject = NodeTemplate::new("n", "N", "f.N").into();
        let meta: RepositoryObject = MetaNodeTemplate::new("m", "M", "wf/m").into();

        assert_eq!(cat.kind(), ItemKind::Category);
        assert_eq!(node.kind(), ItemKind::Leaf);
        assert_eq!(meta.kind(), ItemKind::Leaf);
        assert!(cat.container().is_some());
        assert!(node.container().is_none());
    }

    #[test]
    fn test_siblings_compare_by_name() {
        let a: RepositoryObject = NodeTemplate::new("2", "Apply", "f").into();
        let b: RepositoryObject = NodeTemplate::new("1", "Bin", "f").into();
        assert_eq!(a.compare_order(&b), Ordering::Less);
    }

    #[test]
    fn test_node_template_serialization() {
        let node = NodeTemplate::new("reader", "CSV Reader", "io.CsvReaderFactory")
            .in_category("/io/read")
            .of_type(NodeType::Source);

        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("categoryPath")); // camelCase
        assert!(json.contains("\"source\""));

        let parsed: NodeTemplate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, node);
    }

    #[test]
    fn test_relocate_rewrites_descendants() {
        let mut read = Category::new("read", "Read").at_path("/io");
        read.children
            .add_child(NodeTemplate::new("csv", "CSV", "io.Csv").in_category("/io/read"));
        let mut io = Category::new("io", "IO");
        io.children.add_child(read);

        let mut object = RepositoryObject::from(io);
        object.relocate("/tools");

        let io = object.as_category().unwrap();
        assert_eq!(io.path, "/tools");
        let read = io.children.category("read").unwrap();
        assert_eq!(read.path, "/tools/io");
        let csv = read.children.raw_children()[0].as_node().unwrap();
        assert_eq!(csv.category_path, "/tools/io/read");
    }
}
