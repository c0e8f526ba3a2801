//! Export functionality for story trees
//!
//! [`write_lines`] is the inverse of the parser: it emits the post-order line
//! format. [`StoryOutline`] is a nested copy of a tree used for JSON output
//! and for comparing tree shapes.

use serde::{Deserialize, Serialize};

use super::token::{self, Token};
use super::{Position, StoryNode, StoryTree};
use crate::error::{Error, Result};

/// Deepest tree [`to_json`] will export.
///
/// Nested JSON is written and read recursively; `serde_json` refuses to read
/// documents nested past 128 levels.
pub const MAX_JSON_DEPTH: usize = 100;

/// Owned, nested view of a tree: a node and its optional children
///
/// Conversion to and from [`StoryTree`] and dropping are iterative. Cloning,
/// comparing and serializing recurse, so keep outlines to
/// [`MAX_JSON_DEPTH`] levels for those.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryOutline {
    #[serde(flatten)]
    pub node: StoryNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<StoryOutline>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<StoryOutline>>,
}

impl Drop for StoryOutline {
    fn drop(&mut self) {
        let mut pending: Vec<Box<StoryOutline>> =
            self.left.take().into_iter().chain(self.right.take()).collect();
        while let Some(mut outline) = pending.pop() {
            pending.extend(outline.left.take());
            pending.extend(outline.right.take());
        }
    }
}

/// Work item of the post-order walks below
enum Step<T> {
    Visit(T),
    Missing,
    Build(T),
}

impl StoryOutline {
    /// An outline node with no children
    #[must_use]
    pub fn ending(node: StoryNode) -> Self {
        Self {
            node,
            left: None,
            right: None,
        }
    }

    #[must_use]
    pub fn branch(
        node: StoryNode,
        left: Option<StoryOutline>,
        right: Option<StoryOutline>,
    ) -> Self {
        Self {
            node,
            left: left.map(Box::new),
            right: right.map(Box::new),
        }
    }

    /// Copy a tree into outline form; `None` for an empty tree
    #[must_use]
    pub fn from_tree(tree: &StoryTree) -> Option<Self> {
        let root = tree.root().ok()?;
        let mut steps = vec![Step::Visit(root)];
        let mut built: Vec<Option<Self>> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(position) => {
                    steps.push(Step::Build(position));
                    for child in [tree.right(position), tree.left(position)] {
                        steps.push(child.map_or(Step::Missing, Step::Visit));
                    }
                }
                Step::Missing => built.push(None),
                Step::Build(position) => {
                    let right = built.pop().flatten();
                    let left = built.pop().flatten();
                    let node = tree.get(position).cloned().unwrap_or_default();
                    built.push(Some(Self::branch(node, left, right)));
                }
            }
        }
        built.pop().flatten()
    }

    /// Build a tree with the same shape and contents
    #[must_use]
    pub fn into_tree(mut self) -> StoryTree {
        let mut tree = StoryTree::new();
        let mut steps = vec![Step::Visit(self.take_parts())];
        let mut built: Vec<Option<usize>> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Visit((node, left, right)) => {
                    steps.push(Step::Build((node, None, None)));
                    for child in [right, left] {
                        steps.push(child.map_or(Step::Missing, |mut outline| {
                            Step::Visit(outline.take_parts())
                        }));
                    }
                }
                Step::Missing => built.push(None),
                Step::Build((node, ..)) => {
                    let right = built.pop().flatten();
                    let left = built.pop().flatten();
                    let index = tree.push_detached(node);
                    tree.link(index, left, right);
                    built.push(Some(index));
                }
            }
        }
        if let Some(root) = built.pop().flatten() {
            tree.set_root(root);
        }
        tree
    }

    /// Move the fields out, leaving an empty outline behind to drop.
    fn take_parts(&mut self) -> (StoryNode, Option<Box<Self>>, Option<Box<Self>>) {
        (
            std::mem::take(&mut self.node),
            self.left.take(),
            self.right.take(),
        )
    }
}

/// Serialize a tree to the story line format.
///
/// Children are written before their parent. A missing child of an internal
/// node becomes an `Empty` line; an absent label becomes `null`.
///
/// # Errors
/// Returns [`Error::ReservedToken`] or [`Error::MultilineValue`] when a value
/// would not read back as written.
pub fn write_lines(tree: &StoryTree) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut steps: Vec<Step<Position>> = tree.root().into_iter().map(Step::Visit).collect();

    while let Some(step) = steps.pop() {
        match step {
            Step::Visit(position) if tree.is_external(position) => {
                write_frame(tree.node(position)?, token::END, &mut lines)?;
            }
            Step::Visit(position) => {
                steps.push(Step::Build(position));
                for child in [tree.right(position), tree.left(position)] {
                    steps.push(child.map_or(Step::Missing, Step::Visit));
                }
            }
            Step::Missing => lines.push(token::EMPTY.to_string()),
            Step::Build(position) => write_frame(tree.node(position)?, token::MID, &mut lines)?,
        }
    }
    Ok(lines)
}

/// [`write_lines`] joined with `\n`, ending in a newline
pub fn write_string(tree: &StoryTree) -> Result<String> {
    let mut out = write_lines(tree)?.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    Ok(out)
}

fn write_frame(node: &StoryNode, terminator: &str, lines: &mut Vec<String>) -> Result<()> {
    lines.push(checked_text(node.text())?.to_string());
    lines.push(checked_label(node.left_choice(), "left choice")?.to_string());
    lines.push(checked_label(node.right_choice(), "right choice")?.to_string());
    for item in node.items() {
        lines.push(checked_item(item)?.to_string());
    }
    lines.push(terminator.to_string());
    Ok(())
}

fn single_line<'a>(value: &'a str, context: &'static str) -> Result<&'a str> {
    if value.contains(['\n', '\r']) {
        return Err(Error::MultilineValue { context });
    }
    Ok(value)
}

fn reserved(value: &str, context: &'static str) -> Error {
    Error::ReservedToken {
        token: value.to_string(),
        context,
    }
}

/// Any story line reads back as text except `Empty`.
fn checked_text(text: &str) -> Result<&str> {
    let text = single_line(text, "story text")?;
    if Token::classify(text) == Token::Empty {
        return Err(reserved(text, "story text"));
    }
    Ok(text)
}

fn checked_label<'a>(label: Option<&'a str>, context: &'static str) -> Result<&'a str> {
    let Some(label) = label else {
        return Ok(token::NULL);
    };
    let label = single_line(label, context)?;
    match Token::classify(label) {
        token if token.is_terminator() || token == Token::Null => Err(reserved(label, context)),
        _ => Ok(label),
    }
}

fn checked_item(item: &str) -> Result<&str> {
    let item = single_line(item, "item")?;
    match Token::classify(item) {
        token if token.is_terminator() || token == Token::None => Err(reserved(item, "item")),
        _ => Ok(item),
    }
}

/// Pretty-printed JSON of the tree's outline (`null` for an empty tree)
///
/// # Errors
/// Returns [`Error::TooDeep`] for trees more than [`MAX_JSON_DEPTH`] levels
/// deep. [`write_lines`] has no depth limit.
pub fn to_json(tree: &StoryTree) -> Result<String> {
    let height = tree.height();
    if height > MAX_JSON_DEPTH {
        return Err(Error::TooDeep {
            height,
            limit: MAX_JSON_DEPTH,
        });
    }
    Ok(serde_json::to_string_pretty(&StoryOutline::from_tree(tree))?)
}
