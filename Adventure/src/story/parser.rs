//! Stack-machine parser for the story line format
//!
//! A story file is a post-order dump of a binary tree. Each frame is a story
//! line, up to two choice labels, optional item lines, and a terminator:
//!
//! ```text
//! Left end.        <- frame 1: a leaf
//! null
//! null
//! end
//! Right end.       <- frame 2: a leaf
//! null
//! null
//! end
//! Start.           <- frame 3: pops frame 2 (right), then frame 1 (left)
//! Go left
//! Go right
//! mid
//! ```
//!
//! A lone `Empty` line is a complete frame standing in for a missing subtree.

use super::token::Token;
use super::{StoryNode, StoryTree};
use crate::config::ParseOptions;
use crate::error::{Error, Result};

const BOM: char = '\u{feff}';

/// Builds a [`StoryTree`] from story lines
#[derive(Debug, Clone, Default)]
pub struct StoryTreeParser {
    options: ParseOptions,
}

/// Stack entry: a finished subtree in the shared arena, or an `Empty`
/// placeholder
#[derive(Debug, Clone, Copy)]
enum Operand {
    Placeholder,
    Subtree { root: usize, size: usize },
}

impl Operand {
    fn root(self) -> Option<usize> {
        match self {
            Operand::Placeholder => None,
            Operand::Subtree { root, .. } => Some(root),
        }
    }

    fn size(self) -> usize {
        match self {
            Operand::Placeholder => 0,
            Operand::Subtree { size, .. } => size,
        }
    }
}

enum Terminator {
    End,
    Mid,
}

/// Fields collected between a story line and its terminator
struct Frame {
    text: String,
    labels: [Option<String>; 2],
    labels_seen: usize,
    items: Vec<String>,
}

impl Frame {
    fn new(text: String) -> Self {
        Self {
            text,
            labels: [None, None],
            labels_seen: 0,
            items: Vec::new(),
        }
    }

    fn push(&mut self, token: Token<'_>) {
        if self.labels_seen < self.labels.len() {
            self.labels[self.labels_seen] = match token {
                Token::Null => None,
                other => Some(other.as_str().to_string()),
            };
            self.labels_seen += 1;
        } else if token != Token::None {
            self.items.push(token.as_str().to_string());
        }
    }

    fn into_node(self) -> StoryNode {
        let [left, right] = self.labels;
        StoryNode::new(self.text, left, right).with_items(self.items)
    }
}

/// Pop the right operand, then the left one. Leaves the stack alone if it
/// holds fewer than two entries.
fn pop_pair(stack: &mut Vec<Operand>) -> Option<(Operand, Operand)> {
    if stack.len() < 2 {
        return None;
    }
    let right = stack.pop()?;
    let left = stack.pop()?;
    Some((left, right))
}

impl StoryTreeParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a whole story held in memory. Lines end at `\n` or `\r\n`.
    pub fn parse_str(&self, text: &str) -> Result<StoryTree> {
        self.parse(text.lines())
    }

    /// Parse a sequence of lines into a single tree.
    ///
    /// # Errors
    /// - [`Error::TruncatedInput`] if the lines run out inside a frame, or
    ///   only an `Empty` placeholder is left at the end
    /// - [`Error::MissingOperands`] if a `mid` frame finds fewer than two
    ///   subtrees on the stack
    /// - [`Error::MalformedTree`] if the stack does not end with exactly one
    ///   entry
    /// - [`Error::UnlabeledBranch`] in strict mode, for an internal node
    ///   without choice labels
    pub fn parse<I, S>(&self, lines: I) -> Result<StoryTree>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lines = lines.into_iter().enumerate().map(|(i, line)| (i + 1, line));
        // Every frame lands in this one arena; the stack holds indices into it.
        let mut tree = StoryTree::new();
        let mut stack: Vec<Operand> = Vec::new();
        let mut frame = 0;
        let mut last_line = 0;

        while let Some((line_no, line)) = lines.next() {
            last_line = line_no;
            frame += 1;

            let text = match Token::classify(self.normalize(line.as_ref(), line_no)) {
                Token::Empty => {
                    tracing::debug!("Frame {frame} (line {line_no}): empty placeholder");
                    stack.push(Operand::Placeholder);
                    continue;
                }
                token => token.as_str().to_string(),
            };

            let mut fields = Frame::new(text);
            let terminator = loop {
                let Some((line_no, line)) = lines.next() else {
                    return Err(Error::TruncatedInput {
                        line: last_line,
                        frame,
                    });
                };
                last_line = line_no;
                match Token::classify(self.normalize(line.as_ref(), line_no)) {
                    token if !token.is_terminator() => fields.push(token),
                    Token::End => break Terminator::End,
                    _ => break Terminator::Mid,
                }
            };

            let node = fields.into_node();
            let operand = match terminator {
                Terminator::End => {
                    tracing::debug!("Frame {frame} (line {last_line}): ending {:?}", node.text());
                    Operand::Subtree {
                        root: tree.push_detached(node),
                        size: 1,
                    }
                }
                Terminator::Mid => self.join(node, &mut tree, &mut stack, last_line, frame)?,
            };
            stack.push(operand);
        }

        if stack.len() != 1 {
            return Err(Error::MalformedTree {
                line: last_line,
                frame,
                remaining: stack.len(),
            });
        }
        match stack.pop() {
            Some(Operand::Subtree { root, .. }) => {
                tree.set_root(root);
                tracing::info!(
                    "Parsed story: {} nodes, {} endings from {last_line} lines",
                    tree.len(),
                    tree.endings()
                );
                Ok(tree)
            }
            _ => Err(Error::TruncatedInput {
                line: last_line,
                frame,
            }),
        }
    }

    /// Link the node of a `mid` frame over the top two stack entries.
    fn join(
        &self,
        node: StoryNode,
        tree: &mut StoryTree,
        stack: &mut Vec<Operand>,
        line: usize,
        frame: usize,
    ) -> Result<Operand> {
        let available = stack.len();
        let (left, right) = pop_pair(stack).ok_or(Error::MissingOperands {
            line,
            frame,
            available,
        })?;
        tracing::debug!(
            "Frame {frame} (line {line}): branch {:?} takes {} left / {} right nodes",
            node.text(),
            left.size(),
            right.size()
        );

        let size = 1 + left.size() + right.size();
        let (left, right) = (left.root(), right.root());
        let has_children = left.is_some() || right.is_some();
        if has_children && !node.has_choices() {
            if self.options.strict_branches {
                return Err(Error::UnlabeledBranch { line, frame });
            }
            tracing::warn!("Frame {frame} (line {line}): branch has children but no choices");
        }
        if node.left_choice().is_some() && left.is_none() {
            tracing::warn!("Frame {frame} (line {line}): left choice has no subtree");
        }
        if node.right_choice().is_some() && right.is_none() {
            tracing::warn!("Frame {frame} (line {line}): right choice has no subtree");
        }

        let root = tree.push_detached(node);
        tree.link(root, left, right);
        Ok(Operand::Subtree { root, size })
    }

    fn normalize<'l>(&self, line: &'l str, line_no: usize) -> &'l str {
        let line = if line_no == 1 && self.options.strip_bom {
            line.trim_start_matches(BOM)
        } else {
            line
        };
        if self.options.trim_trailing_whitespace {
            line.trim_end()
        } else {
            line
        }
    }
}
