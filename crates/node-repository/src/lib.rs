//! Node Repository - categories and node templates for a workflow node palette
//!
//! This crate models the tree of categories and node templates that a
//! workflow editor shows in its node repository. It supports:
//!
//! - After-relationship ordering of siblings with a deterministic fallback
//! - Path-based insertion of contributed categories and templates
//! - Node sets that create missing categories on the fly
//! - Diagnostics for after declarations that could not be resolved
//! - Serializable snapshots of the ordered tree
//!
//! # Architecture
//!
//! - `ordering`: the after-relationship forest and `order` function
//! - `Container`: owned children of the root or a category
//! - `Repository`: caller-owned root, no global registry
//! - `RepositoryBuilder`: collects contributions and reports skipped ones
//!
//! # Example
//!
//! ```ignore
//! use node_repository::{Category, NodeTemplate, RepositoryBuilder};
//!
//! let report = RepositoryBuilder::new()
//!     .category(Category::new("io", "IO"))
//!     .node(NodeTemplate::new("csv", "CSV Reader", "io.Csv").in_category("/io"))
//!     .build();
//!
//! let tree = report.repository.snapshot()?;
//! ```

pub mod builder;
pub mod config;
pub mod container;
pub mod descriptor;
pub mod error;
pub mod ordering;
pub mod repository;
pub mod snapshot;
pub mod types;
pub mod validation;

// Re-export key types
pub use builder::{BuildReport, RepositoryBuilder, SkippedContribution};
pub use config::RepositoryConfig;
pub use container::{ChildLookup, Container};
pub use descriptor::{NodeSetContribution, NodeSetEntry};
pub use error::{RepositoryError, Result};
pub use ordering::{order, order_group, ItemKind, OrderedItems, Orderable, OrderingForest};
pub use repository::Repository;
pub use snapshot::{SnapshotNode, TreeSnapshot};
pub use types::{Category, MetaNodeTemplate, NodeTemplate, NodeType, RepositoryObject};
pub use validation::{validate_repository, OrderingIssue};
