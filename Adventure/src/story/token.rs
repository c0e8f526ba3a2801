//! Control tokens of the story line format
//!
//! The format reuses plain lines as control words. They are classified here
//! once, so the rest of the crate matches on [`Token`] instead of strings.

/// Closes a leaf frame
pub const END: &str = "end";
/// Closes a frame that takes two subtrees from the stack
pub const MID: &str = "mid";
/// Placeholder for a missing subtree
pub const EMPTY: &str = "Empty";
/// An absent choice label
pub const NULL: &str = "null";
/// Filler line in the item section
pub const NONE: &str = "none";

/// One classified line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    End,
    Mid,
    Empty,
    Null,
    None,
    Text(&'a str),
}

impl<'a> Token<'a> {
    #[must_use]
    pub fn classify(line: &'a str) -> Self {
        match line {
            END => Token::End,
            MID => Token::Mid,
            EMPTY => Token::Empty,
            NULL => Token::Null,
            NONE => Token::None,
            other => Token::Text(other),
        }
    }

    /// The line this token was read from
    #[must_use]
    pub fn as_str(self) -> &'a str {
        match self {
            Token::End => END,
            Token::Mid => MID,
            Token::Empty => EMPTY,
            Token::Null => NULL,
            Token::None => NONE,
            Token::Text(s) => s,
        }
    }

    /// `end` or `mid`
    #[must_use]
    pub fn is_terminator(self) -> bool {
        matches!(self, Token::End | Token::Mid)
    }
}
