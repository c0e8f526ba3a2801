//! CLI command for validating a story file

use std::fmt;
use std::path::Path;

use adventure::story::load_story_file_with;
use adventure::{ParseOptions, StoryTree};

/// Size report for a parsed story
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub nodes: usize,
    pub endings: usize,
    pub height: usize,
}

impl Summary {
    pub fn of(tree: &StoryTree) -> Self {
        Self {
            nodes: tree.len(),
            endings: tree.endings(),
            height: tree.height(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes, {} endings, {} levels deep",
            self.nodes, self.endings, self.height
        )
    }
}

pub fn execute(source: &Path, options: &ParseOptions) -> anyhow::Result<()> {
    let tree = load_story_file_with(source, options)?;
    println!("{}: OK ({})", source.display(), Summary::of(&tree));
    Ok(())
}
