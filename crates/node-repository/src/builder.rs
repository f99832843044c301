//! Fluent builder for node repositories
//!
//! Collects contributions in any order and inserts them in one go. A
//! contribution that cannot be inserted is logged and skipped; it does not
//! abort the build.

use crate::config::RepositoryConfig;
use crate::descriptor::NodeSetContribution;
use crate::error::RepositoryError;
use crate::repository::Repository;
use crate::types::{Category, MetaNodeTemplate, NodeTemplate};

/// A contribution left out of the built repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedContribution {
    /// Id of the contribution
    pub id: String,
    /// `category`, `node`, `meta_node` or `node_set`
    pub kind: &'static str,
    /// Why it was skipped
    pub reason: String,
}

/// Result of [`RepositoryBuilder::build`]
#[derive(Debug)]
pub struct BuildReport {
    pub repository: Repository,
    pub skipped: Vec<SkippedContribution>,
}

impl BuildReport {
    /// Whether every contribution was inserted
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Fluent builder for constructing a repository from contributions
///
/// # Example
///
/// ```ignore
/// let report = RepositoryBuilder::new()
///     .category(Category::new("io", "IO"))
///     .category(Category::new("read", "Read").at_path("/io"))
///     .node(NodeTemplate::new("csv", "CSV Reader", "io.Csv").in_category("/io/read"))
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct RepositoryBuilder {
    config: RepositoryConfig,
    categories: Vec<Category>,
    nodes: Vec<NodeTemplate>,
    meta_nodes: Vec<MetaNodeTemplate>,
    node_sets: Vec<NodeSetContribution>,
}

impl RepositoryBuilder {
    /// Create a builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given settings for the built repository
    pub fn with_config(mut self, config: RepositoryConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a category contribution
    pub fn category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    /// Add a node template contribution
    pub fn node(mut self, template: NodeTemplate) -> Self {
        self.nodes.push(template);
        self
    }

    /// Add a meta node template contribution
    pub fn meta_node(mut self, template: MetaNodeTemplate) -> Self {
        self.meta_nodes.push(template);
        self
    }

    /// Add a node set contribution
    pub fn node_set(mut self, set: NodeSetContribution) -> Self {
        self.node_sets.push(set);
        self
    }

    /// Insert everything: categories, then node sets, nodes and meta nodes.
    ///
    /// Categories whose parent is contributed later are retried until no
    /// further category can be placed.
    pub fn build(self) -> BuildReport {
        let mut repository = Repository::with_config(self.config);
        let mut skipped = Vec::new();

        let mut pending = self.categories;
        loop {
            let before = pending.len();
            let mut deferred = Vec::new();
            for category in pending {
                let id = category.id.clone();
                match repository.add_category(category.clone()) {
                    Ok(true) => {}
                    Ok(false) => skipped.push(skip(&id, "category", "duplicate id")),
                    Err(RepositoryError::PathSegmentNotFound { .. }) => deferred.push(category),
                    Err(err) => skipped.push(skip(&id, "category", err)),
                }
            }
            if deferred.is_empty() || deferred.len() == before {
                for category in deferred {
                    let err = RepositoryError::missing_segment(
                        first_missing(&repository, &category.path),
                        category.path.clone(),
                    );
                    skipped.push(skip(&category.id, "category", err));
                }
                break;
            }
            pending = deferred;
        }

        for set in &self.node_sets {
            if let Err(err) = repository.add_node_set(set) {
                skipped.push(skip(&set.id, "node_set", err));
            }
        }

        for template in self.nodes {
            let id = template.id.clone();
            match repository.add_node(template) {
                Ok(true) => {}
                Ok(false) => skipped.push(skip(&id, "node", "duplicate id")),
                Err(err) => skipped.push(skip(&id, "node", err)),
            }
        }

        for template in self.meta_nodes {
            let id = template.id.clone();
            match repository.add_meta_node(template) {
                Ok(true) => {}
                Ok(false) => skipped.push(skip(&id, "meta_node", "duplicate id")),
                Err(err) => skipped.push(skip(&id, "meta_node", err)),
            }
        }

        for entry in &skipped {
            log::warn!("Skipped {} '{}': {}", entry.kind, entry.id, entry.reason);
        }

        if let Err(err) = repository.report_problems() {
            log::warn!("Could not check after declarations: {}", err);
        }

        BuildReport {
            repository,
            skipped,
        }
    }
}

fn skip(id: &str, kind: &'static str, reason: impl ToString) -> SkippedContribution {
    SkippedContribution {
        id: id.to_string(),
        kind,
        reason: reason.to_string(),
    }
}

/// First segment of `path` that does not resolve, for error reporting
fn first_missing(repository: &Repository, path: &str) -> String {
    match repository.container_at(path) {
        Err(RepositoryError::PathSegmentNotFound { segment, .. }) => segment,
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::NodeSetEntry;

    #[test]
    fn test_build_in_declaration_order() {
        let report = RepositoryBuilder::new()
            .category(Category::new("io", "IO"))
            .category(Category::new("read", "Read").at_path("/io"))
            .node(NodeTemplate::new("csv", "CSV Reader", "io.Csv").in_category("/io/read"))
            .build();

        assert!(report.is_complete());
        assert!(report
            .repository
            .find_template_by_factory("io.Csv")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_child_category_before_parent() {
        let report = RepositoryBuilder::new()
            .category(Category::new("deep", "Deep").at_path("/io/read"))
            .category(Category::new("read", "Read").at_path("/io"))
            .category(Category::new("io", "IO"))
            .build();

        assert!(report.is_complete(), "skipped: {:?}", report.skipped);
        assert!(report.repository.container_at("/io/read/deep").is_ok());
    }

    #[test]
    fn test_unresolvable_category_skipped() {
        let report = RepositoryBuilder::new()
            .category(Category::new("io", "IO"))
            .category(Category::new("orphan", "Orphan").at_path("/io/missing"))
            .build();

        assert_eq!(report.skipped.len(), 1);
        let skipped = &report.skipped[0];
        assert_eq!(skipped.id, "orphan");
        assert_eq!(skipped.kind, "category");
        assert!(skipped.reason.contains("'missing'"));
    }

    #[test]
    fn test_duplicates_and_bad_paths_skipped() {
        let report = RepositoryBuilder::new()
            .category(Category::new("io", "IO"))
            .category(Category::new("io", "IO twice"))
            .node(NodeTemplate::new("a", "A", "f.A").in_category("/io"))
            .node(NodeTemplate::new("a", "A", "f.A").in_category("/io"))
            .node(NodeTemplate::new("b", "B", "f.B").in_category("/nowhere"))
            .meta_node(MetaNodeTemplate::new("m", "M", "wf/m").in_category("/nowhere"))
            .build();

        let kinds: Vec<_> = report.skipped.iter().map(|s| (s.kind, s.id.as_str())).collect();
        assert_eq!(
            kinds,
            vec![("category", "io"), ("node", "a"), ("node", "b"), ("meta_node", "m")]
        );
        assert_eq!(report.repository.container_at("/io").unwrap().len(), 1);
    }

    #[test]
    fn test_node_sets_after_categories() {
        let report = RepositoryBuilder::new()
            .node_set(NodeSetContribution::new("stats").with_entry(NodeSetEntry::new(
                "mean",
                "Mean",
                "stats.Mean",
                "/analytics/stats",
            )))
            .category(Category::new("analytics", "Analytics").with_icon("icons/a.png"))
            .build();

        assert!(report.is_complete());
        let analytics = report.repository.root().category("analytics").unwrap();
        // The contributed category is kept, not replaced by a generated one
        assert_eq!(analytics.icon.as_deref(), Some("icons/a.png"));
        assert!(analytics.children.category("stats").is_some());
    }

    #[test]
    fn test_config_is_applied() {
        let config = RepositoryConfig {
            sort_children: false,
            warn_on_problems: false,
        };
        let report = RepositoryBuilder::new().with_config(config.clone()).build();
        assert_eq!(report.repository.config(), &config);
        assert!(!report.repository.root().sort_children());
    }
}
