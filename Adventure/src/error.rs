//! Error types for `Adventure`

use thiserror::Error;

/// The error type for `Adventure` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error while reading a story source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Parse Errors ====================
    /// The line stream ended while a frame was still open.
    #[error("truncated story: input ended inside frame {frame} (last line read: {line})")]
    TruncatedInput {
        /// 1-based number of the last line consumed (0 if none).
        line: usize,
        /// 1-based index of the incomplete frame.
        frame: usize,
    },

    /// A `mid` frame found fewer than two subtrees to attach.
    #[error("frame {frame} (line {line}) needs two subtrees to attach, found {available}")]
    MissingOperands {
        /// 1-based line number of the `mid` terminator.
        line: usize,
        /// 1-based index of the frame.
        frame: usize,
        /// Number of subtrees on the stack when the frame closed.
        available: usize,
    },

    /// The stack did not hold exactly one tree after the last frame.
    #[error("malformed story: {remaining} trees left after frame {frame} (line {line})")]
    MalformedTree {
        /// 1-based number of the last line read (0 for empty input).
        line: usize,
        /// Number of frames read.
        frame: usize,
        /// Number of stack entries left over.
        remaining: usize,
    },

    /// An internal node offers no choices (only raised in strict mode).
    #[error("frame {frame} (line {line}) has children but no choice labels")]
    UnlabeledBranch {
        /// 1-based line number of the `mid` terminator.
        line: usize,
        /// 1-based index of the frame.
        frame: usize,
    },

    // ==================== Tree Errors ====================
    /// Structural misuse of a tree (second root, re-attach, foreign position).
    #[error("invalid tree state: {0}")]
    InvalidState(String),

    /// The requested relative does not exist.
    #[error("no such position: {0}")]
    NoSuchPosition(String),

    // ==================== Navigation Errors ====================
    /// A navigation command the current node cannot honour.
    #[error("illegal move: {0}")]
    IllegalMove(#[from] IllegalMove),

    // ==================== Export Errors ====================
    /// A node value would be read back as a control token.
    #[error("cannot write {context} {token:?}: it is a reserved token")]
    ReservedToken {
        /// The offending value.
        token: String,
        /// Which field held it (`story text`, `left choice`, ...).
        context: &'static str,
    },

    /// A node value spans more than one line.
    #[error("cannot write {context}: value contains a line break")]
    MultilineValue {
        /// Which field held it.
        context: &'static str,
    },

    /// The tree nests deeper than nested JSON output allows.
    #[error("story is {height} levels deep, JSON export supports at most {limit}")]
    TooDeep {
        /// Height of the tree.
        height: usize,
        /// Deepest tree that can be exported.
        limit: usize,
    },

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ==================== Config Errors ====================
    /// The configuration file is not valid TOML for [`crate::AdventureConfig`].
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
}

/// Why a [`crate::NavigationSession`] refused a move.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMove {
    /// The current node offers no left choice.
    #[error("no left choice here")]
    NoLeftChoice,
    /// The current node offers no right choice.
    #[error("no right choice here")]
    NoRightChoice,
    /// `go_back` at the start of the story.
    #[error("already at the start of the story")]
    AtRoot,
}

/// Result type alias for `Adventure` operations.
pub type Result<T> = std::result::Result<T, Error>;
