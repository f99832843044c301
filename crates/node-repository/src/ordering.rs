//! After-relationship ordering for repository children
//!
//! Every item may name the identifier of a sibling it should follow
//! (its "after" id). The items are arranged into a forest rooted at a
//! synthetic node with the empty identifier: an item becomes a child of the
//! item it names, or of the root when it names nothing. Children of a node
//! are sorted among themselves, and a depth-first pre-order walk of the
//! forest gives the final order.
//!
//! Items whose after id cannot be reached from the root (missing target,
//! self reference, cycles) end up in the problem set. They are still part of
//! the output, sorted and appended after the resolved items of their group.
//!
//! Categories and leaves are ordered independently; categories come first.
//!
//! # Example
//!
//! ```ignore
//! use node_repository::ordering::order;
//!
//! let ordered = order(items)?;
//! for problem in &ordered.problems {
//!     log::warn!("unresolved after id: {}", problem.after_id());
//! }
//! ```

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::error::{RepositoryError, Result};

/// Identifier of the synthetic root ("no predecessor")
pub const ROOT_ID: &str = "";

/// The two independently ordered item groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Category-like items, placed first
    Category,
    /// Leaf items (node templates), placed after all categories
    Leaf,
}

/// An item that can be arranged by after-relationship
pub trait Orderable {
    /// Unique identifier within the ordering group
    fn id(&self) -> &str;

    /// Display name, the default sort key
    fn name(&self) -> &str;

    /// Identifier of the item this one should follow; empty for none
    fn after_id(&self) -> &str;

    /// Which group this item is ordered in
    fn kind(&self) -> ItemKind {
        ItemKind::Leaf
    }

    /// Comparison used between siblings and within the problem set.
    ///
    /// Defaults to the display name, with the identifier as tie-break so
    /// that the result never depends on input order.
    fn compare_order(&self, other: &Self) -> Ordering {
        self.name()
            .cmp(other.name())
            .then_with(|| self.id().cmp(other.id()))
    }
}

impl<T: Orderable + ?Sized> Orderable for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn after_id(&self) -> &str {
        (**self).after_id()
    }

    fn kind(&self) -> ItemKind {
        (**self).kind()
    }

    fn compare_order(&self, other: &Self) -> Ordering {
        (**self).compare_order(*other)
    }
}

/// Result of ordering a set of items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedItems<T> {
    /// All input items in their final order
    pub items: Vec<T>,
    /// Items whose after id could not be resolved.
    ///
    /// These are also contained in `items`; they are repeated here so the
    /// caller can report misconfigured declarations.
    pub problems: Vec<T>,
}

impl<T> OrderedItems<T> {
    /// An empty result
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            problems: Vec::new(),
        }
    }

    /// Whether any after id was left unresolved
    pub fn has_problems(&self) -> bool {
        !self.problems.is_empty()
    }
}

/// A node of the after-relationship forest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingNode {
    /// Index into the ordered slice, `None` for the synthetic root
    pub item: Option<usize>,
    /// Arena indices of the child nodes, sorted
    pub children: Vec<usize>,
}

/// Arena-backed after-relationship forest over one slice of items
///
/// Node 0 is always the synthetic root.
#[derive(Debug, Clone)]
pub struct OrderingForest {
    nodes: Vec<OrderingNode>,
    unresolved: Vec<usize>,
}

impl OrderingForest {
    /// Build the forest for a slice of items.
    ///
    /// Fails only if two items share an identifier.
    pub fn build<T: Orderable>(items: &[T]) -> Result<Self> {
        check_unique_ids(items)?;

        // Pending items keyed by the id they want to follow, in input order.
        let mut pending: HashMap<&str, Vec<usize>> = HashMap::new();
        for (index, item) in items.iter().enumerate() {
            pending.entry(item.after_id()).or_default().push(index);
        }

        let mut nodes = vec![OrderingNode {
            item: None,
            children: Vec::new(),
        }];
        let mut attached = vec![false; items.len()];
        let mut stack = vec![0usize];

        while let Some(node) = stack.pop() {
            let node_id = match nodes[node].item {
                Some(index) => items[index].id(),
                None => ROOT_ID,
            };
            let Some(mut successors) = pending.remove(node_id) else {
                continue;
            };
            successors.sort_by(|&a, &b| items[a].compare_order(&items[b]));

            let mut children = Vec::with_capacity(successors.len());
            for index in successors {
                attached[index] = true;
                children.push(nodes.len());
                nodes.push(OrderingNode {
                    item: Some(index),
                    children: Vec::new(),
                });
            }
            stack.extend(children.iter().copied());
            nodes[node].children = children;
        }

        let mut unresolved: Vec<usize> = (0..items.len()).filter(|&i| !attached[i]).collect();
        unresolved.sort_by(|&a, &b| items[a].compare_order(&items[b]));

        log::trace!(
            "Built ordering forest: {} items, {} unresolved",
            items.len(),
            unresolved.len()
        );

        Ok(Self { nodes, unresolved })
    }

    /// All nodes of the forest, root first
    pub fn nodes(&self) -> &[OrderingNode] {
        &self.nodes
    }

    /// The synthetic root node
    pub fn root(&self) -> &OrderingNode {
        &self.nodes[0]
    }

    /// Indices of items that could not be placed in the forest, sorted
    pub fn unresolved(&self) -> &[usize] {
        &self.unresolved
    }

    /// Item indices in depth-first pre-order; the root contributes nothing
    pub fn pre_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len().saturating_sub(1));
        let mut stack: Vec<usize> = self.root().children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            let entry = &self.nodes[node];
            if let Some(index) = entry.item {
                order.push(index);
            }
            stack.extend(entry.children.iter().rev().copied());
        }
        order
    }

    /// Full order of item indices: resolved pre-order, then the problem set
    pub fn flatten(&self) -> Vec<usize> {
        let mut order = self.pre_order();
        order.extend(self.unresolved.iter().copied());
        order
    }
}

/// Order items, categories first, then leaves.
///
/// Each group is ordered independently by [`order_group`].
pub fn order<T: Orderable + Clone>(items: Vec<T>) -> Result<OrderedItems<T>> {
    let (categories, leaves): (Vec<T>, Vec<T>) = items
        .into_iter()
        .partition(|item| item.kind() == ItemKind::Category);

    let mut result = order_group(categories)?;
    let leaves = order_group(leaves)?;
    result.items.extend(leaves.items);
    result.problems.extend(leaves.problems);
    Ok(result)
}

/// Order a single group of items without splitting by kind
pub fn order_group<T: Orderable + Clone>(items: Vec<T>) -> Result<OrderedItems<T>> {
    if items.is_empty() {
        return Ok(OrderedItems::empty());
    }

    let forest = OrderingForest::build(&items)?;
    let problems = forest
        .unresolved()
        .iter()
        .map(|&index| items[index].clone())
        .collect();

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let ordered = forest
        .flatten()
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect();

    Ok(OrderedItems {
        items: ordered,
        problems,
    })
}

fn check_unique_ids<T: Orderable>(items: &[T]) -> Result<()> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id()) {
            return Err(RepositoryError::DuplicateId(item.id().to_string()));
        }
    }
    Ok(())
}
