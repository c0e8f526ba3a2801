//! Arena-backed binary story tree
//!
//! Nodes live in a flat `Vec` and refer to each other by index, so `parent`,
//! `left` and `right` are O(1) lookups. Subtrees are moved in by value when
//! attached, which rules out sharing and cycles.

use std::sync::atomic::{AtomicU64, Ordering};

use super::StoryNode;
use crate::error::{Error, Result};

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to one node of one [`StoryTree`].
///
/// Positions are only meaningful for the tree that produced them. Once a tree
/// is attached under another tree its old positions are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    tree: u64,
    index: usize,
}

#[derive(Debug)]
struct Slot {
    node: StoryNode,
    parent: Option<usize>,
    left: Option<usize>,
    right: Option<usize>,
}

impl Slot {
    fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Binary tree of [`StoryNode`] values
#[derive(Debug)]
pub struct StoryTree {
    id: u64,
    slots: Vec<Slot>,
    root: Option<usize>,
}

impl Default for StoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl StoryTree {
    /// Create a tree with no root
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed),
            slots: Vec::new(),
            root: None,
        }
    }

    /// Create a single-node tree
    #[must_use]
    pub fn leaf(node: StoryNode) -> Self {
        let mut tree = Self::new();
        tree.slots.push(Slot {
            node,
            parent: None,
            left: None,
            right: None,
        });
        tree.root = Some(0);
        tree
    }

    /// Install `node` as the root of an empty tree.
    pub fn add_root(&mut self, node: StoryNode) -> Result<Position> {
        if self.root.is_some() {
            return Err(Error::InvalidState("tree already has a root".to_string()));
        }
        let index = self.slots.len();
        self.slots.push(Slot {
            node,
            parent: None,
            left: None,
            right: None,
        });
        self.root = Some(index);
        Ok(self.position(index))
    }

    /// Make the roots of `left` and `right` the children of `target`.
    ///
    /// An empty subtree leaves that side without a child. Both subtrees are
    /// consumed.
    pub fn attach(&mut self, target: Position, left: StoryTree, right: StoryTree) -> Result<()> {
        let index = self.index_of(target).ok_or_else(|| {
            Error::InvalidState(format!("{target:?} does not belong to this tree"))
        })?;
        if !self.slots[index].is_leaf() {
            return Err(Error::InvalidState(format!(
                "{target:?} already has children"
            )));
        }

        let left_root = self.graft(left, index);
        let right_root = self.graft(right, index);

        let slot = &mut self.slots[index];
        slot.left = left_root;
        slot.right = right_root;
        Ok(())
    }

    /// Move every slot of `subtree` into this arena, re-basing its links.
    fn graft(&mut self, subtree: StoryTree, parent: usize) -> Option<usize> {
        let root = subtree.root?;
        let offset = self.slots.len();
        self.slots.extend(subtree.slots.into_iter().map(|mut slot| {
            slot.parent = slot.parent.map(|i| i + offset);
            slot.left = slot.left.map(|i| i + offset);
            slot.right = slot.right.map(|i| i + offset);
            slot
        }));
        let new_root = root + offset;
        self.slots[new_root].parent = Some(parent);
        Some(new_root)
    }

    // ==================== In-place building ====================
    //
    // Builders that assemble a tree bottom-up in one arena. Children are
    // linked by index, so no slot is ever copied.

    /// Append an unlinked node and return its index.
    pub(crate) fn push_detached(&mut self, node: StoryNode) -> usize {
        let index = self.slots.len();
        self.slots.push(Slot {
            node,
            parent: None,
            left: None,
            right: None,
        });
        index
    }

    /// Link detached subtrees under `parent`. All indices come from
    /// [`Self::push_detached`] on this tree.
    pub(crate) fn link(&mut self, parent: usize, left: Option<usize>, right: Option<usize>) {
        for child in left.into_iter().chain(right) {
            self.slots[child].parent = Some(parent);
        }
        let slot = &mut self.slots[parent];
        slot.left = left;
        slot.right = right;
    }

    /// Finish in-place building with `root` at the top.
    pub(crate) fn set_root(&mut self, root: usize) {
        self.root = Some(root);
    }

    /// Node behind a position handed out by this tree.
    pub(crate) fn own_node(&self, position: Position) -> &StoryNode {
        debug_assert_eq!(position.tree, self.id);
        &self.slots[position.index].node
    }

    fn position(&self, index: usize) -> Position {
        Position {
            tree: self.id,
            index,
        }
    }

    fn index_of(&self, position: Position) -> Option<usize> {
        (position.tree == self.id && position.index < self.slots.len()).then_some(position.index)
    }

    fn slot(&self, position: Position) -> Result<&Slot> {
        self.index_of(position)
            .map(|i| &self.slots[i])
            .ok_or_else(|| Error::NoSuchPosition(format!("{position:?} is not part of this tree")))
    }

    pub fn root(&self) -> Result<Position> {
        self.root
            .map(|i| self.position(i))
            .ok_or_else(|| Error::NoSuchPosition("tree is empty".to_string()))
    }

    pub fn parent(&self, position: Position) -> Result<Position> {
        self.slot(position)?
            .parent
            .map(|i| self.position(i))
            .ok_or_else(|| Error::NoSuchPosition("the root has no parent".to_string()))
    }

    pub fn left(&self, position: Position) -> Result<Position> {
        self.slot(position)?
            .left
            .map(|i| self.position(i))
            .ok_or_else(|| Error::NoSuchPosition("node has no left child".to_string()))
    }

    pub fn right(&self, position: Position) -> Result<Position> {
        self.slot(position)?
            .right
            .map(|i| self.position(i))
            .ok_or_else(|| Error::NoSuchPosition("node has no right child".to_string()))
    }

    /// True only for this tree's root. Foreign positions answer `false`.
    #[must_use]
    pub fn is_root(&self, position: Position) -> bool {
        self.index_of(position).is_some_and(|i| self.root == Some(i))
    }

    /// True if the node has no children (an ending). Foreign positions answer `false`.
    #[must_use]
    pub fn is_external(&self, position: Position) -> bool {
        self.index_of(position)
            .is_some_and(|i| self.slots[i].is_leaf())
    }

    pub fn node(&self, position: Position) -> Result<&StoryNode> {
        self.slot(position).map(|slot| &slot.node)
    }

    #[must_use]
    pub fn get(&self, position: Position) -> Option<&StoryNode> {
        self.index_of(position).map(|i| &self.slots[i].node)
    }

    /// Number of nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of endings (leaf nodes)
    #[must_use]
    pub fn endings(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_leaf()).count()
    }

    /// Number of levels; 0 for an empty tree, 1 for a lone root.
    #[must_use]
    pub fn height(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut deepest = 0;
        let mut pending = vec![(root, 1)];
        while let Some((index, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            let slot = &self.slots[index];
            pending.extend(slot.left.into_iter().chain(slot.right).map(|child| (child, depth + 1)));
        }
        deepest
    }

    /// Iterate positions root first, left subtree before right.
    #[must_use]
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            pending: self.root.into_iter().collect(),
        }
    }
}

/// Pre-order walk over a [`StoryTree`], see [`StoryTree::preorder`]
pub struct Preorder<'a> {
    tree: &'a StoryTree,
    pending: Vec<usize>,
}

impl Iterator for Preorder<'_> {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.pending.pop()?;
        let slot = &self.tree.slots[index];
        self.pending.extend(slot.right);
        self.pending.extend(slot.left);
        Some(self.tree.position(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fork(text: &str, left: StoryTree, right: StoryTree) -> StoryTree {
        let mut tree = StoryTree::new();
        let root = tree
            .add_root(StoryNode::new(text, Some("L".into()), Some("R".into())))
            .unwrap();
        tree.attach(root, left, right).unwrap();
        tree
    }

    #[test]
    fn test_empty_tree() {
        let tree = StoryTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
        assert!(matches!(tree.root(), Err(Error::NoSuchPosition(_))));
    }

    #[test]
    fn test_add_root_twice_fails() {
        let mut tree = StoryTree::new();
        tree.add_root(StoryNode::ending("one")).unwrap();
        let err = tree.add_root(StoryNode::ending("two")).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_attach_links_both_directions() {
        let tree = fork(
            "start",
            StoryTree::leaf(StoryNode::ending("left")),
            StoryTree::leaf(StoryNode::ending("right")),
        );
        let root = tree.root().unwrap();
        let left = tree.left(root).unwrap();
        let right = tree.right(root).unwrap();

        assert_eq!(tree.node(left).unwrap().text(), "left");
        assert_eq!(tree.node(right).unwrap().text(), "right");
        assert_eq!(tree.parent(left).unwrap(), root);
        assert_eq!(tree.parent(right).unwrap(), root);
        assert!(tree.is_root(root));
        assert!(!tree.is_root(left));
        assert!(!tree.is_external(root));
        assert!(tree.is_external(left));
        assert_eq!(tree.endings(), 2);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_attach_twice_fails() {
        let mut tree = fork(
            "start",
            StoryTree::leaf(StoryNode::ending("a")),
            StoryTree::leaf(StoryNode::ending("b")),
        );
        let root = tree.root().unwrap();
        let err = tree
            .attach(root, StoryTree::leaf(StoryNode::ending("c")), StoryTree::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_attach_rejects_foreign_position() {
        let other = StoryTree::leaf(StoryNode::ending("elsewhere"));
        let foreign = other.root().unwrap();

        let mut tree = StoryTree::leaf(StoryNode::ending("here"));
        let err = tree
            .attach(foreign, StoryTree::new(), StoryTree::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
        assert!(!tree.is_root(foreign));
        assert!(!tree.is_external(foreign));
    }

    #[test]
    fn test_one_sided_attach() {
        let tree = fork("start", StoryTree::new(), StoryTree::leaf(StoryNode::ending("right")));
        let root = tree.root().unwrap();
        assert!(matches!(tree.left(root), Err(Error::NoSuchPosition(_))));
        assert!(tree.right(root).is_ok());
        assert!(!tree.is_external(root));
    }

    #[test]
    fn test_parent_of_root_and_child_of_leaf() {
        let tree = StoryTree::leaf(StoryNode::ending("only"));
        let root = tree.root().unwrap();
        assert!(matches!(tree.parent(root), Err(Error::NoSuchPosition(_))));
        assert!(matches!(tree.left(root), Err(Error::NoSuchPosition(_))));
        assert!(matches!(tree.right(root), Err(Error::NoSuchPosition(_))));
    }

    #[test]
    fn test_in_place_building() {
        let mut tree = StoryTree::new();
        let a = tree.push_detached(StoryNode::ending("a"));
        let b = tree.push_detached(StoryNode::ending("b"));
        let inner = tree.push_detached(StoryNode::new("inner", Some("L".into()), None));
        tree.link(inner, Some(a), None);
        let top = tree.push_detached(StoryNode::new("top", Some("L".into()), Some("R".into())));
        tree.link(top, Some(inner), Some(b));
        tree.set_root(top);

        let root = tree.root().unwrap();
        assert_eq!(tree.own_node(root).text(), "top");
        let inner = tree.left(root).unwrap();
        assert_eq!(tree.parent(inner).unwrap(), root);
        assert!(tree.right(inner).is_err());
        assert_eq!(tree.node(tree.left(inner).unwrap()).unwrap().text(), "a");
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.endings(), 2);
        assert_eq!(tree.height(), 3);
    }

    #[test]
    fn test_nested_graft_rebases_links() {
        let inner = fork(
            "inner",
            StoryTree::leaf(StoryNode::ending("a")),
            StoryTree::leaf(StoryNode::ending("b")),
        );
        let tree = fork("outer", StoryTree::leaf(StoryNode::ending("c")), inner);
        let root = tree.root().unwrap();
        let inner = tree.right(root).unwrap();
        let b = tree.right(inner).unwrap();

        assert_eq!(tree.node(inner).unwrap().text(), "inner");
        assert_eq!(tree.node(b).unwrap().text(), "b");
        assert_eq!(tree.parent(b).unwrap(), inner);
        assert_eq!(tree.parent(inner).unwrap(), root);
        assert_eq!(tree.height(), 3);

        let texts: Vec<_> = tree
            .preorder()
            .map(|p| tree.node(p).unwrap().text().to_string())
            .collect();
        assert_eq!(texts, ["outer", "c", "inner", "a", "b"]);
    }
}
