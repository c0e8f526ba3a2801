//! Story format handling
//!
//! This module provides the story tree types, the line-format parser and its
//! inverse writer.
//!
//! # Overview
//!
//! A story file is a flat list of lines encoding a binary tree in post-order:
//! - Each frame is a story line, two choice labels (`null` = no such choice),
//!   optional item lines, and a terminator
//! - `end` closes a leaf (an ending)
//! - `mid` closes a branch and adopts the two previous subtrees
//! - `Empty` stands in for a missing subtree
//!
//! # Usage
//!
//! ```no_run
//! use adventure::story::load_story_file;
//!
//! let tree = load_story_file("stories/cave.txt")?;
//! let root = tree.root()?;
//! println!("{}", tree.node(root)?.text());
//! # Ok::<(), adventure::Error>(())
//! ```

mod node;
mod parser;
mod tree;
pub mod export;
pub mod token;

use std::io::BufRead;
use std::path::Path;

pub use export::{MAX_JSON_DEPTH, StoryOutline, to_json, write_lines, write_string};
pub use node::StoryNode;
pub use parser::StoryTreeParser;
pub use tree::{Position, Preorder, StoryTree};

use crate::config::ParseOptions;
use crate::error::Result;

/// Parse a story held in memory with default options
pub fn load_story_str(text: &str) -> Result<StoryTree> {
    StoryTreeParser::new().parse_str(text)
}

/// Read all lines from `reader`, then parse them
///
/// # Errors
/// Returns an error if reading fails or the lines are not a valid story.
pub fn load_story_reader<R: BufRead>(reader: R, options: &ParseOptions) -> Result<StoryTree> {
    let lines = reader.lines().collect::<std::io::Result<Vec<_>>>()?;
    StoryTreeParser::with_options(options.clone()).parse(lines)
}

/// Parse a story file with default options
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid story.
pub fn load_story_file<P: AsRef<Path>>(path: P) -> Result<StoryTree> {
    load_story_file_with(path, &ParseOptions::default())
}

/// Parse a story file
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid story.
pub fn load_story_file_with<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<StoryTree> {
    let path = path.as_ref();
    tracing::info!("Loading story from {}", path.display());
    let file = std::fs::File::open(path)?;
    load_story_reader(std::io::BufReader::new(file), options)
}
