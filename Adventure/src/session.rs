//! Interactive walk through a story tree
//!
//! A [`NavigationSession`] owns the reader's position. The tree itself is
//! shared and never changes, so several sessions can play the same story.

use std::sync::Arc;

use crate::error::{Error, IllegalMove, Result};
use crate::story::{Position, StoryNode, StoryTree};

/// One of the two branches of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn refusal(self) -> IllegalMove {
        match self {
            Side::Left => IllegalMove::NoLeftChoice,
            Side::Right => IllegalMove::NoRightChoice,
        }
    }
}

/// A choice the current node offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice<'a> {
    pub side: Side,
    pub label: &'a str,
}

/// Current position in a shared [`StoryTree`]
#[derive(Debug, Clone)]
pub struct NavigationSession {
    tree: Arc<StoryTree>,
    position: Position,
}

impl NavigationSession {
    /// Start a session at the root of `tree`.
    ///
    /// # Errors
    /// Returns [`Error::NoSuchPosition`] if the tree is empty.
    pub fn new(tree: Arc<StoryTree>) -> Result<Self> {
        let position = tree.root()?;
        Ok(Self { tree, position })
    }

    #[must_use]
    pub fn tree(&self) -> &Arc<StoryTree> {
        &self.tree
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// The node being read
    #[must_use]
    pub fn current(&self) -> &StoryNode {
        // The position is only ever set from this tree's own handles.
        self.tree.own_node(self.position)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        self.current().text()
    }

    /// Target of `side`, if that choice is labelled and leads somewhere
    fn target(&self, side: Side) -> Option<Position> {
        let node = self.current();
        let (label, child) = match side {
            Side::Left => (node.left_choice(), self.tree.left(self.position)),
            Side::Right => (node.right_choice(), self.tree.right(self.position)),
        };
        label.and(child.ok())
    }

    /// Label of `side` if it can be chosen, otherwise `None`
    #[must_use]
    pub fn choice(&self, side: Side) -> Option<&str> {
        self.target(side)?;
        match side {
            Side::Left => self.current().left_choice(),
            Side::Right => self.current().right_choice(),
        }
    }

    #[must_use]
    pub fn left_choice(&self) -> Option<&str> {
        self.choice(Side::Left)
    }

    #[must_use]
    pub fn right_choice(&self) -> Option<&str> {
        self.choice(Side::Right)
    }

    /// All choices on offer, left first
    #[must_use]
    pub fn choices(&self) -> Vec<Choice<'_>> {
        [Side::Left, Side::Right]
            .into_iter()
            .filter_map(|side| self.choice(side).map(|label| Choice { side, label }))
            .collect()
    }

    #[must_use]
    pub fn can_choose(&self, side: Side) -> bool {
        self.target(side).is_some()
    }

    #[must_use]
    pub fn is_at_root(&self) -> bool {
        self.tree.is_root(self.position)
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        !self.is_at_root()
    }

    /// Whether the current node is an ending
    #[must_use]
    pub fn is_at_ending(&self) -> bool {
        self.tree.is_external(self.position)
    }

    /// Follow a choice. The position is unchanged on error.
    pub fn choose(&mut self, side: Side) -> Result<&StoryNode> {
        let target = self
            .target(side)
            .ok_or_else(|| Error::IllegalMove(side.refusal()))?;
        tracing::trace!("Choosing {side:?}: {:?} -> {:?}", self.position, target);
        self.position = target;
        Ok(self.current())
    }

    pub fn choose_left(&mut self) -> Result<&StoryNode> {
        self.choose(Side::Left)
    }

    pub fn choose_right(&mut self) -> Result<&StoryNode> {
        self.choose(Side::Right)
    }

    /// Step back to the parent node.
    ///
    /// # Errors
    /// Returns [`IllegalMove::AtRoot`] at the start of the story.
    pub fn go_back(&mut self) -> Result<&StoryNode> {
        let parent = self
            .tree
            .parent(self.position)
            .map_err(|_| Error::IllegalMove(IllegalMove::AtRoot))?;
        tracing::trace!("Going back: {:?} -> {:?}", self.position, parent);
        self.position = parent;
        Ok(self.current())
    }

    /// Return to the start of the story
    pub fn reset(&mut self) -> &StoryNode {
        if let Ok(root) = self.tree.root() {
            self.position = root;
        }
        tracing::trace!("Reset to {:?}", self.position);
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoryTreeParser;

    fn session(lines: &[&str]) -> NavigationSession {
        let tree = StoryTreeParser::new().parse(lines).unwrap();
        NavigationSession::new(Arc::new(tree)).unwrap()
    }

    #[rustfmt::skip]
    fn three_nodes() -> NavigationSession {
        session(&[
            "Left end.", "null", "null", "end",
            "Right end.", "null", "null", "end",
            "Start.", "Go left", "Go right", "mid",
        ])
    }

    #[test]
    fn test_empty_tree_has_no_session() {
        let err = NavigationSession::new(Arc::new(StoryTree::new())).unwrap_err();
        assert!(matches!(err, Error::NoSuchPosition(_)));
    }

    #[test]
    fn test_starts_at_root() {
        let session = three_nodes();
        assert_eq!(session.text(), "Start.");
        assert!(session.is_at_root());
        assert!(!session.can_go_back());
        assert!(!session.is_at_ending());
        assert_eq!(
            session.choices(),
            [
                Choice {
                    side: Side::Left,
                    label: "Go left"
                },
                Choice {
                    side: Side::Right,
                    label: "Go right"
                },
            ]
        );
    }

    #[test]
    fn test_choose_and_go_back() {
        let mut session = three_nodes();
        let start = session.position();

        assert_eq!(session.choose_right().unwrap().text(), "Right end.");
        assert!(session.is_at_ending());
        assert!(session.choices().is_empty());

        session.go_back().unwrap();
        assert_eq!(session.position(), start);

        session.choose_left().unwrap();
        assert_eq!(session.text(), "Left end.");
        assert_eq!(session.go_back().unwrap().text(), "Start.");
    }

    #[test]
    fn test_go_back_at_root_is_illegal() {
        let mut session = three_nodes();
        let err = session.go_back().unwrap_err();
        assert!(matches!(err, Error::IllegalMove(IllegalMove::AtRoot)));
        assert!(session.is_at_root());
    }

    #[test]
    fn test_no_moves_past_an_ending() {
        let mut session = three_nodes();
        session.choose_left().unwrap();
        let here = session.position();
        assert!(matches!(
            session.choose_left(),
            Err(Error::IllegalMove(IllegalMove::NoLeftChoice))
        ));
        assert!(matches!(
            session.choose_right(),
            Err(Error::IllegalMove(IllegalMove::NoRightChoice))
        ));
        assert_eq!(session.position(), here);
    }

    #[test]
    fn test_reset_from_anywhere() {
        let mut session = three_nodes();
        session.choose_right().unwrap();
        assert_eq!(session.reset().text(), "Start.");
        assert!(session.is_at_root());
        assert_eq!(session.reset().text(), "Start.");
    }

    #[test]
    #[rustfmt::skip]
    fn test_null_label_is_never_offered() {
        let mut session = session(&[
            "Hidden.", "null", "null", "end",
            "Shown.", "null", "null", "end",
            "Start.", "null", "Onward", "mid",
        ]);
        assert_eq!(session.left_choice(), None);
        assert_eq!(session.right_choice(), Some("Onward"));
        assert!(!session.can_choose(Side::Left));
        assert!(matches!(
            session.choose_left(),
            Err(Error::IllegalMove(IllegalMove::NoLeftChoice))
        ));
        assert_eq!(session.choose_right().unwrap().text(), "Shown.");
    }

    #[test]
    #[rustfmt::skip]
    fn test_label_without_subtree_is_not_offered() {
        let mut session = session(&[
            "Empty",
            "Shown.", "null", "null", "end",
            "Start.", "Nowhere", "Onward", "mid",
        ]);
        assert_eq!(session.current().left_choice(), Some("Nowhere"));
        assert_eq!(session.left_choice(), None);
        assert!(session.choose_left().is_err());
        assert!(session.choose_right().is_ok());
    }

    #[test]
    fn test_sessions_share_one_tree() {
        let first = three_nodes();
        let mut second = first.clone();
        second.choose_left().unwrap();
        assert!(Arc::ptr_eq(first.tree(), second.tree()));
        assert!(first.is_at_root());
        assert!(!second.is_at_root());
    }

    #[test]
    fn test_sessions_share_one_tree_independent_cursors() {
        let first = three_nodes();
        let mut second = NavigationSession::new(Arc::clone(first.tree())).unwrap();
        second.choose_right().unwrap();
        assert_eq!(first.current().text(), "Start.");
        assert_eq!(second.current().text(), "Right end.");
        assert_eq!(second.reset().text(), "Start.");
    }
}
