//! # Adventure
//!
//! A story-tree engine for binary choose-your-own-adventure stories.
//!
//! ## Components
//!
//! - **Story nodes and trees** - narrative text with up to two choices,
//!   stored in an arena-backed binary tree
//! - **Parser** - rebuilds a tree from the post-order line format with a
//!   stack machine
//! - **Export** - writes the line format back out, or JSON
//! - **Navigation** - a session that walks a shared tree
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use adventure::prelude::*;
//!
//! let tree = StoryTreeParser::new().parse([
//!     "You found the treasure.", "null", "null", "end",
//!     "The troll eats you.", "null", "null", "end",
//!     "A fork in the cave.", "Go left", "Go right", "mid",
//! ])?;
//!
//! let mut session = NavigationSession::new(Arc::new(tree))?;
//! assert_eq!(session.left_choice(), Some("Go left"));
//!
//! session.choose_right()?;
//! assert!(session.is_at_ending());
//! assert_eq!(session.reset().text(), "A fork in the cave.");
//! # Ok::<(), adventure::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod session;
pub mod story;

// Re-exports for convenience
pub use config::{AdventureConfig, ParseOptions};
pub use error::{Error, IllegalMove, Result};
pub use session::{Choice, NavigationSession, Side};
pub use story::{Position, StoryNode, StoryOutline, StoryTree, StoryTreeParser};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{AdventureConfig, ParseOptions};
    pub use crate::error::{Error, Result};
    pub use crate::session::{NavigationSession, Side};
    pub use crate::story::{
        Position, StoryNode, StoryOutline, StoryTree, StoryTreeParser, load_story_file,
        load_story_str,
    };
}
