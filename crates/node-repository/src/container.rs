//! Child management for repository containers
//!
//! A `Container` owns the children of the repository root or of a category.
//! Children are stored in insertion order; the ordered view is computed on
//! every call to [`Container::children`] and never cached.

use crate::error::{RepositoryError, Result};
use crate::ordering::{order, OrderedItems, Orderable};
use crate::types::{join_path, Category, NodeTemplate, RepositoryObject};

/// Outcome of looking up an id in a container
#[derive(Debug, Clone, Copy)]
pub enum ChildLookup<'a> {
    /// The id referred to the container itself (`/` or blank)
    This,
    /// A child, possibly nested
    Child(&'a RepositoryObject),
}

/// Ordered list of repository objects owned by the root or a category
#[derive(Debug, Clone)]
pub struct Container {
    children: Vec<RepositoryObject>,
    sort_children: bool,
}

impl Container {
    /// Create an empty container that sorts its children
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            sort_children: true,
        }
    }

    /// Whether children are ordered by after-relationship and name.
    ///
    /// When disabled, `children()` returns insertion order.
    pub fn sort_children(&self) -> bool {
        self.sort_children
    }

    /// Enable or disable sorting of children
    pub fn set_sort_children(&mut self, sort: bool) {
        self.sort_children = sort;
    }

    /// Add a child.
    ///
    /// Returns `false` if a child with the same id and kind is already present.
    pub fn add_child(&mut self, child: impl Into<RepositoryObject>) -> bool {
        let child = child.into();
        if self.position(&child).is_some() {
            return false;
        }
        self.children.push(child);
        true
    }

    /// Add every object of an iterator, skipping ones already present
    pub fn add_all_children<I, T>(&mut self, children: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<RepositoryObject>,
    {
        for child in children {
            self.add_child(child);
        }
    }

    /// Insert a child directly after the child with id `anchor` (insertion order)
    pub fn add_child_after(&mut self, child: impl Into<RepositoryObject>, anchor: &str) -> bool {
        self.insert_relative(child.into(), anchor, 1)
    }

    /// Insert a child directly before the child with id `anchor` (insertion order)
    pub fn add_child_before(&mut self, child: impl Into<RepositoryObject>, anchor: &str) -> bool {
        self.insert_relative(child.into(), anchor, 0)
    }

    fn insert_relative(&mut self, child: RepositoryObject, anchor: &str, offset: usize) -> bool {
        if self.position(&child).is_some() {
            return false;
        }
        match self.children.iter().position(|c| c.id() == anchor) {
            Some(index) => {
                self.children.insert(index + offset, child);
                true
            }
            None => false,
        }
    }

    /// Remove and return the child with the given id
    pub fn remove_child(&mut self, id: &str) -> Result<RepositoryObject> {
        let index = self
            .children
            .iter()
            .position(|c| c.id() == id)
            .ok_or_else(|| RepositoryError::ChildNotFound(id.to_string()))?;
        Ok(self.children.remove(index))
    }

    /// Remove all children
    pub fn remove_all_children(&mut self) {
        self.children.clear();
    }

    /// Whether a direct child has the given id
    pub fn contains(&self, id: &str) -> bool {
        self.children.iter().any(|c| c.id() == id)
    }

    /// Whether there are any children
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Children in insertion order
    pub fn raw_children(&self) -> &[RepositoryObject] {
        &self.children
    }

    pub(crate) fn raw_children_mut(&mut self) -> &mut [RepositoryObject] {
        &mut self.children
    }

    /// Children in display order, with the unresolved ones reported separately.
    ///
    /// Categories come first, ordered by their after-relationship, then all
    /// templates. Fails only if two siblings of the same kind share an id.
    pub fn children(&self) -> Result<OrderedItems<&RepositoryObject>> {
        if !self.sort_children {
            return Ok(OrderedItems {
                items: self.children.iter().collect(),
                problems: Vec::new(),
            });
        }
        order(self.children.iter().collect())
    }

    /// Find an object by id.
    ///
    /// `"/"` and blank ids refer to this container. With `recursive`, nested
    /// categories are searched depth-first in insertion order.
    pub fn child_by_id(&self, id: &str, recursive: bool) -> Option<ChildLookup<'_>> {
        if id == "/" || id.trim().is_empty() {
            return Some(ChildLookup::This);
        }
        self.find(id, recursive).map(ChildLookup::Child)
    }

    fn find(&self, id: &str, recursive: bool) -> Option<&RepositoryObject> {
        for child in &self.children {
            if child.id() == id {
                return Some(child);
            }
            if recursive {
                if let Some(found) = child.container().and_then(|c| c.find(id, true)) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Direct child category by id
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.children
            .iter()
            .filter_map(RepositoryObject::as_category)
            .find(|c| c.id == id)
    }

    /// Mutable direct child category by id
    pub fn category_mut(&mut self, id: &str) -> Option<&mut Category> {
        self.children
            .iter_mut()
            .filter_map(RepositoryObject::as_category_mut)
            .find(|c| c.id == id)
    }

    /// Path of the container holding `id`, relative to this container at `path`.
    ///
    /// Uses the same search order as `child_by_id`.
    pub fn locate(&self, id: &str, path: &str) -> Option<String> {
        for child in &self.children {
            if child.id() == id {
                return Some(path.to_string());
            }
            if let Some(found) = child
                .as_category()
                .and_then(|c| c.children.locate(id, &join_path(path, &c.id)))
            {
                return Some(found);
            }
        }
        None
    }

    /// Remove an object anywhere below this container.
    ///
    /// Uses the same search order as `child_by_id`.
    pub fn remove_recursive(&mut self, id: &str) -> Option<RepositoryObject> {
        for index in 0..self.children.len() {
            if self.children[index].id() == id {
                return Some(self.children.remove(index));
            }
            let nested = self.children[index]
                .container_mut()
                .and_then(|c| c.remove_recursive(id));
            if nested.is_some() {
                return nested;
            }
        }
        None
    }

    /// Find the node template created by the given factory.
    ///
    /// Searches depth-first in display order.
    pub fn find_template_by_factory(&self, factory: &str) -> Result<Option<&NodeTemplate>> {
        for child in self.children()?.items {
            match child {
                RepositoryObject::Node(node) if node.factory == factory => {
                    return Ok(Some(node));
                }
                RepositoryObject::Category(category) => {
                    if let Some(node) = category.children.find_template_by_factory(factory)? {
                        return Ok(Some(node));
                    }
                }
                _ => {}
            }
        }
        Ok(None)
    }

    /// Categories below this container whose after id could not be resolved
    pub fn problem_categories(&self) -> Result<Vec<&Category>> {
        let mut problems = Vec::new();
        self.append_problem_categories(&mut problems)?;
        Ok(problems)
    }

    fn append_problem_categories<'a>(&'a self, problems: &mut Vec<&'a Category>) -> Result<()> {
        let ordered = self.children()?;
        problems.extend(
            ordered
                .problems
                .into_iter()
                .filter_map(RepositoryObject::as_category),
        );
        for category in self.children.iter().filter_map(RepositoryObject::as_category) {
            category.children.append_problem_categories(problems)?;
        }
        Ok(())
    }

    fn position(&self, child: &RepositoryObject) -> Option<usize> {
        self.children
            .iter()
            .position(|c| c.id() == child.id() && c.kind() == child.kind())
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}
