//! Diagnostics for after declarations
//!
//! Ordering never fails on a bad after id; the item just lands in the problem
//! set. This module explains why each problem item could not be placed.

use std::collections::{HashMap, HashSet};

use crate::container::Container;
use crate::error::Result;
use crate::ordering::{ItemKind, Orderable};
use crate::repository::Repository;
use crate::types::{join_path, RepositoryObject, ROOT_PATH};

/// Why an item's after id could not be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderingIssue {
    /// The item names itself
    SelfReference { path: String, id: String },
    /// No sibling of the same kind has the named id
    MissingTarget {
        path: String,
        id: String,
        after_id: String,
    },
    /// The item is part of an after cycle
    Cycle {
        path: String,
        id: String,
        after_id: String,
    },
    /// The named sibling exists but could not be placed itself
    Blocked {
        path: String,
        id: String,
        after_id: String,
    },
}

impl OrderingIssue {
    /// Id of the offending item
    pub fn id(&self) -> &str {
        match self {
            Self::SelfReference { id, .. }
            | Self::MissingTarget { id, .. }
            | Self::Cycle { id, .. }
            | Self::Blocked { id, .. } => id,
        }
    }

    /// Path of the container holding the item
    pub fn path(&self) -> &str {
        match self {
            Self::SelfReference { path, .. }
            | Self::MissingTarget { path, .. }
            | Self::Cycle { path, .. }
            | Self::Blocked { path, .. } => path,
        }
    }
}

impl std::fmt::Display for OrderingIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelfReference { path, id } => {
                write!(f, "'{}' in '{}' is declared after itself", id, path)
            }
            Self::MissingTarget { path, id, after_id } => write!(
                f,
                "'{}' in '{}' is declared after unknown '{}'",
                id, path, after_id
            ),
            Self::Cycle { path, id, after_id } => write!(
                f,
                "'{}' in '{}' is declared after '{}', which forms a cycle",
                id, path, after_id
            ),
            Self::Blocked { path, id, after_id } => write!(
                f,
                "'{}' in '{}' is declared after '{}', which could not be placed",
                id, path, after_id
            ),
        }
    }
}

impl std::error::Error for OrderingIssue {}

/// Explain every unresolved after declaration in the repository
///
/// Returns all issues found (not just the first), parents before children.
pub fn validate_repository(repository: &Repository) -> Result<Vec<OrderingIssue>> {
    let mut issues = Vec::new();
    validate_container(repository.root(), ROOT_PATH, &mut issues)?;
    Ok(issues)
}

/// Explain the unresolved after declarations below one container
pub fn validate_container(
    container: &Container,
    path: &str,
    issues: &mut Vec<OrderingIssue>,
) -> Result<()> {
    let ordered = container.children()?;
    let siblings = container.raw_children();

    for problem in &ordered.problems {
        issues.push(classify(problem, siblings, path));
    }

    for category in siblings.iter().filter_map(RepositoryObject::as_category) {
        validate_container(&category.children, &join_path(path, &category.id), issues)?;
    }
    Ok(())
}

fn classify(item: &RepositoryObject, siblings: &[RepositoryObject], path: &str) -> OrderingIssue {
    let path = path.to_string();
    let id = item.id().to_string();
    let after_id = item.after_id().to_string();

    if after_id == id {
        return OrderingIssue::SelfReference { path, id };
    }

    let group: HashMap<&str, &str> = siblings
        .iter()
        .filter(|s| s.kind() == item.kind())
        .map(|s| (s.id(), s.after_id()))
        .collect();

    if !group.contains_key(after_id.as_str()) {
        return OrderingIssue::MissingTarget { path, id, after_id };
    }

    if leads_back(item.id(), &group) {
        OrderingIssue::Cycle { path, id, after_id }
    } else {
        OrderingIssue::Blocked { path, id, after_id }
    }
}

/// Follow after ids from `start` and report whether the chain returns to it
fn leads_back(start: &str, group: &HashMap<&str, &str>) -> bool {
    let mut seen = HashSet::new();
    let mut current = start;
    while let Some(&next) = group.get(current) {
        if next == start {
            return true;
        }
        if !seen.insert(next) {
            return false;
        }
        current = next;
    }
    false
}

/// Number of unresolved items per group in one container
pub fn count_by_kind(container: &Container) -> Result<HashMap<ItemKind, usize>> {
    let mut counts = HashMap::new();
    for problem in container.children()?.problems {
        *counts.entry(problem.kind()).or_insert(0) += 1;
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, NodeTemplate};

    fn node(id: &str, after: &str) -> NodeTemplate {
        NodeTemplate::new(id, id, format!("factory.{}", id)).after(after)
    }

    #[test]
    fn test_valid_repository() {
        let mut repository = Repository::new();
        repository.add_category(Category::new("a", "A")).unwrap();
        repository.add_category(Category::new("b", "B").after("a")).unwrap();
        repository.add_node(node("n", "")).unwrap();

        let issues = validate_repository(&repository).unwrap();
        assert!(issues.is_empty(), "Expected no issues, got: {:?}", issues);
    }

    #[test]
    fn test_classifies_each_issue() {
        let mut repository = Repository::new();
        repository.add_node(node("self", "self")).unwrap();
        repository.add_node(node("lost", "gone")).unwrap();
        repository.add_node(node("x", "y")).unwrap();
        repository.add_node(node("y", "x")).unwrap();
        repository.add_node(node("tail", "x")).unwrap();

        let issues = validate_repository(&repository).unwrap();
        assert_eq!(issues.len(), 5);

        let find = |id: &str| issues.iter().find(|i| i.id() == id).unwrap().clone();
        assert!(matches!(find("self"), OrderingIssue::SelfReference { .. }));
        assert!(matches!(find("lost"), OrderingIssue::MissingTarget { .. }));
        assert!(matches!(find("x"), OrderingIssue::Cycle { .. }));
        assert!(matches!(find("y"), OrderingIssue::Cycle { .. }));
        assert!(matches!(find("tail"), OrderingIssue::Blocked { .. }));
    }

    #[test]
    fn test_cross_group_target_is_missing() {
        let mut repository = Repository::new();
        repository.add_category(Category::new("io", "IO")).unwrap();
        repository.add_node(node("reader", "io")).unwrap();

        let issues = validate_repository(&repository).unwrap();
        assert!(matches!(issues[0], OrderingIssue::MissingTarget { .. }));
    }

    #[test]
    fn test_nested_paths() {
        let mut repository = Repository::new();
        repository.add_category(Category::new("io", "IO")).unwrap();
        repository
            .add_category(Category::new("bad", "Bad").at_path("/io").after("nope"))
            .unwrap();

        let issues = validate_repository(&repository).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path(), "/io");
        assert_eq!(
            issues[0].to_string(),
            "'bad' in '/io' is declared after unknown 'nope'"
        );
    }

    #[test]
    fn test_count_by_kind() {
        let mut container = Container::new();
        container.add_child(Category::new("c", "C").after("c"));
        container.add_child(node("a", "missing"));
        container.add_child(node("b", "missing"));

        let counts = count_by_kind(&container).unwrap();
        assert_eq!(counts.get(&ItemKind::Category), Some(&1));
        assert_eq!(counts.get(&ItemKind::Leaf), Some(&2));
    }
}
