//! Node repository root
//!
//! The repository owns the top-level container and inserts contributed
//! categories and templates at their declared paths. It is an ordinary
//! value owned by the caller; wrap it in a lock if several threads mutate it.
//!
//! # Usage
//!
//! ```ignore
//! use node_repository::{Category, NodeTemplate, Repository};
//!
//! let mut repository = Repository::new();
//! repository.add_category(Category::new("io", "IO"))?;
//! repository.add_node(NodeTemplate::new("csv", "CSV Reader", "io.Csv").in_category("/io"))?;
//!
//! let snapshot = repository.snapshot()?;
//! ```

use crate::config::RepositoryConfig;
use crate::container::{ChildLookup, Container};
use crate::descriptor::NodeSetContribution;
use crate::error::{RepositoryError, Result};
use crate::ordering::{ItemKind, OrderedItems, Orderable};
use crate::snapshot::TreeSnapshot;
use crate::types::{
    join_path, path_segments, Category, MetaNodeTemplate, NodeTemplate, RepositoryObject, ROOT_PATH,
};
use crate::validation::validate_repository;

/// Root of the node repository tree
#[derive(Debug, Clone)]
pub struct Repository {
    root: Container,
    config: RepositoryConfig,
}

impl Repository {
    /// Create an empty repository with default settings
    pub fn new() -> Self {
        Self::with_config(RepositoryConfig::default())
    }

    /// Create an empty repository with the given settings
    pub fn with_config(config: RepositoryConfig) -> Self {
        let mut root = Container::new();
        root.set_sort_children(config.sort_children);
        Self { root, config }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// The top-level container
    pub fn root(&self) -> &Container {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Container {
        &mut self.root
    }

    /// Top-level children in display order
    pub fn children(&self) -> Result<OrderedItems<&RepositoryObject>> {
        self.root.children()
    }

    /// Insert a category below its `path`.
    ///
    /// Every segment of the path must already exist. Returns `false` if the
    /// parent already holds a category with the same id.
    pub fn add_category(&mut self, mut category: Category) -> Result<bool> {
        category.children.set_sort_children(self.config.sort_children);
        let path = category.path.clone();
        let parent = self.container_at_mut(&path)?;
        let id = category.id.clone();
        let added = parent.add_child(category);
        if added {
            log::debug!("Added category '{}' under '{}'", id, path);
        }
        Ok(added)
    }

    /// Insert a node template below its `category_path`
    pub fn add_node(&mut self, template: NodeTemplate) -> Result<bool> {
        let path = template.category_path.clone();
        let parent = self.container_at_mut(&path)?;
        Ok(parent.add_child(template))
    }

    /// Insert a meta node template below its `category_path`
    pub fn add_meta_node(&mut self, template: MetaNodeTemplate) -> Result<bool> {
        let path = template.category_path.clone();
        let parent = self.container_at_mut(&path)?;
        Ok(parent.add_child(template))
    }

    /// Insert every template of a node set.
    ///
    /// Categories missing along a template's path are created with the
    /// segment as id and name. Returns the templates that were added.
    pub fn add_node_set(&mut self, set: &NodeSetContribution) -> Result<Vec<NodeTemplate>> {
        let mut added = Vec::new();
        for template in set.templates() {
            let sort = self.config.sort_children;
            let parent = ensure_path(
                &mut self.root,
                &template.category_path,
                sort,
                |segment, parent_path| {
                    let mut category = Category::new(segment, segment).at_path(parent_path);
                    category.plugin_id = set.plugin_id.clone();
                    category.icon = set.default_category_icon.clone();
                    category
                },
            )?;
            if parent.add_child(template.clone()) {
                added.push(template);
            }
        }
        log::debug!(
            "Node set '{}' contributed {} of {} templates",
            set.id,
            added.len(),
            set.entries.len()
        );
        Ok(added)
    }

    /// Move an object (found anywhere in the tree) below another category path.
    ///
    /// Paths of the moved object and everything below it are rewritten. On
    /// error the tree is left unchanged.
    pub fn move_object(&mut self, id: &str, target_path: &str) -> Result<()> {
        let source_path = self
            .root
            .locate(id, ROOT_PATH)
            .ok_or_else(|| RepositoryError::ChildNotFound(id.to_string()))?;
        let kind = self
            .container_at(&source_path)?
            .raw_children()
            .iter()
            .find(|c| c.id() == id)
            .map(|c| c.kind())
            .ok_or_else(|| RepositoryError::ChildNotFound(id.to_string()))?;
        let target = normalize_path(target_path);

        if kind == ItemKind::Category {
            let own_path = join_path(&source_path, id);
            if target == own_path || target.starts_with(&format!("{}/", own_path)) {
                return Err(RepositoryError::invalid_child(format!(
                    "can't move '{}' into itself",
                    id
                )));
            }
        }

        if self
            .container_at(&target)?
            .raw_children()
            .iter()
            .any(|c| c.id() == id && c.kind() == kind)
        {
            return Err(RepositoryError::invalid_child(format!(
                "'{}' already exists in '{}'",
                id, target
            )));
        }

        let mut object = self
            .root
            .remove_recursive(id)
            .ok_or_else(|| RepositoryError::ChildNotFound(id.to_string()))?;
        match self.container_at_mut(&target) {
            Ok(container) => {
                object.relocate(&target);
                container.add_child(object);
            }
            Err(err) => {
                self.container_at_mut(&source_path)?.add_child(object);
                return Err(err);
            }
        }
        log::debug!("Moved '{}' from '{}' to '{}'", id, source_path, target);
        Ok(())
    }

    /// Find an object by id; `/` or blank ids refer to the root
    pub fn child_by_id(&self, id: &str, recursive: bool) -> Option<ChildLookup<'_>> {
        self.root.child_by_id(id, recursive)
    }

    /// Find the node template created by the given factory
    pub fn find_template_by_factory(&self, factory: &str) -> Result<Option<&NodeTemplate>> {
        self.root.find_template_by_factory(factory)
    }

    /// Categories anywhere in the tree whose after id could not be resolved
    pub fn problem_categories(&self) -> Result<Vec<&Category>> {
        self.root.problem_categories()
    }

    /// Log every unresolved after declaration and return how many there are
    pub fn report_problems(&self) -> Result<usize> {
        let issues = validate_repository(self)?;
        if self.config.warn_on_problems {
            for issue in &issues {
                log::warn!("{}", issue);
            }
        }
        Ok(issues.len())
    }

    /// Ordered, serializable view of the whole tree
    pub fn snapshot(&self) -> Result<TreeSnapshot> {
        TreeSnapshot::capture(&self.root)
    }

    /// Container for a category path
    pub fn container_at(&self, path: &str) -> Result<&Container> {
        let mut container = &self.root;
        for segment in path_segments(path) {
            container = match container.category(segment) {
                Some(category) => &category.children,
                None => return Err(segment_error(container, segment, path)),
            };
        }
        Ok(container)
    }

    /// Mutable container for a category path; every segment must exist
    pub fn container_at_mut(&mut self, path: &str) -> Result<&mut Container> {
        let mut container = &mut self.root;
        for segment in path_segments(path) {
            if container.category(segment).is_none() {
                return Err(segment_error(container, segment, path));
            }
            container = &mut container
                .category_mut(segment)
                .ok_or_else(|| RepositoryError::missing_segment(segment, path))?
                .children;
        }
        Ok(container)
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk a path below `root`, creating missing categories with `make`.
///
/// `make` receives the missing segment and the path of its parent.
fn ensure_path<'a, F>(
    root: &'a mut Container,
    path: &str,
    sort_children: bool,
    make: F,
) -> Result<&'a mut Container>
where
    F: Fn(&str, String) -> Category,
{
    let mut container = root;
    let mut parent_path = ROOT_PATH.to_string();
    for segment in path_segments(path) {
        if container.category(segment).is_none() {
            let mut category = make(segment, parent_path.clone());
            category.children.set_sort_children(sort_children);
            log::debug!("Creating missing category '{}' under '{}'", segment, parent_path);
            container.add_child(category);
        }
        parent_path = join_path(&parent_path, segment);
        container = &mut container
            .category_mut(segment)
            .ok_or_else(|| RepositoryError::missing_segment(segment, path))?
            .children;
    }
    Ok(container)
}

fn segment_error(container: &Container, segment: &str, path: &str) -> RepositoryError {
    if container.contains(segment) {
        RepositoryError::NotACategory {
            segment: segment.to_string(),
            path: path.to_string(),
        }
    } else {
        RepositoryError::missing_segment(segment, path)
    }
}

fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path_segments(path).collect();
    format!("/{}", segments.join("/"))
}
