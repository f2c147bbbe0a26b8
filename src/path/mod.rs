//! Path types: Segment, Path, and the `a.b[0].c` string syntax.
//!
//! A [`Path`] is an ordered sequence of [`Segment`]s locating a node in a
//! value tree relative to its root. Paths are cheap to clone, ordered, and
//! hashable so they can key error sets and UI-state maps deterministically.
//!
//! Paths are **positional**: after a structural array mutation (insert,
//! remove, move), previously computed paths into that array may point at a
//! different element and must be recomputed.

pub mod tokenizer;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use self::tokenizer::{tokenize, Token};

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// One step in a path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    /// Object key (`user`, `max_value`).
    Key(String),
    /// Array index (`[0]`).
    Index(usize),
}

impl Segment {
    /// Create a key segment.
    pub fn key(key: impl Into<String>) -> Self {
        Segment::Key(key.into())
    }

    /// Create an index segment.
    pub fn index(index: usize) -> Self {
        Segment::Index(index)
    }

    /// The key, if this segment is one.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(k) => Some(k),
            Segment::Index(_) => None,
        }
    }

    /// The index, if this segment is one.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Key(_) => None,
            Segment::Index(i) => Some(*i),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_owned())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

// ---------------------------------------------------------------------------
// Path
// ---------------------------------------------------------------------------

/// An ordered key/index sequence locating a node in the value tree.
///
/// The root of the tree is the empty path.
///
/// # Examples
///
/// ```
/// use kvform::path::Path;
///
/// let path: Path = "user.addresses[0].street".parse().unwrap();
/// assert_eq!(path.len(), 4);
/// assert_eq!(path.to_string(), "user.addresses[0].street");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The empty path, addressing the root of the value tree.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from an iterator of segments.
    pub fn from_segments(segments: impl IntoIterator<Item = Segment>) -> Self {
        Self {
            segments: segments.into_iter().collect(),
        }
    }

    /// Whether this is the root (empty) path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path has no segments. Alias of [`Path::is_root`].
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The segments as a slice.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Append a segment in place.
    pub fn push(&mut self, segment: impl Into<Segment>) {
        self.segments.push(segment.into());
    }

    /// Return a new path with `segment` appended.
    pub fn join(&self, segment: impl Into<Segment>) -> Path {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Path { segments }
    }

    /// The last segment, if any.
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// The parent path (everything but the last segment).
    ///
    /// Returns `None` for the root path.
    pub fn parent(&self) -> Option<Path> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Path {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Whether `self` starts with every segment of `prefix`.
    ///
    /// Every path starts with the root path. A path starts with itself.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }
}

impl FromStr for Path {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    if is_bare_key(key) {
                        write!(f, "{key}")?;
                    } else {
                        write!(f, "\"{key}\"")?;
                    }
                }
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl<S: Into<Segment>> FromIterator<S> for Path {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Path {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Whether a key can be written without quotes.
fn is_bare_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Error produced when a path string fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathParseError {
    /// A token appeared where the grammar does not allow it.
    #[error("unexpected token `{0}` in path")]
    UnexpectedToken(String),
    /// The path ended in the middle of a segment (e.g. a trailing `.` or `[`).
    #[error("path ended unexpectedly")]
    UnexpectedEnd,
    /// An array index did not fit in `usize`.
    #[error("array index `{0}` out of range")]
    IndexOutOfRange(String),
}

/// Parse a path string like `user.addresses[0].street` or `"odd key".x`.
///
/// Grammar: a path is a sequence of key segments separated by `.`, with any
/// number of `[n]` index segments attached after a key (or at the very start
/// for a root-level array). The empty string parses to the root path.
fn parse(input: &str) -> Result<Path, PathParseError> {
    if input.is_empty() {
        return Ok(Path::root());
    }

    let tokens = tokenize(input);
    let mut segments = Vec::new();
    // Whether the next token may open a new key segment (start of input or
    // just after a dot).
    let mut expect_key = true;
    let mut iter = tokens.into_iter().peekable();

    while let Some((token, text)) = iter.next() {
        match token {
            Token::Ident if expect_key => {
                segments.push(Segment::Key(text));
                expect_key = false;
            }
            Token::QuotedKey if expect_key => {
                // Strip the surrounding quotes.
                segments.push(Segment::Key(text[1..text.len() - 1].to_owned()));
                expect_key = false;
            }
            Token::BracketOpen => {
                let (index_token, index_text) =
                    iter.next().ok_or(PathParseError::UnexpectedEnd)?;
                if index_token != Token::Integer {
                    return Err(PathParseError::UnexpectedToken(index_text));
                }
                let index: usize = index_text
                    .parse()
                    .map_err(|_| PathParseError::IndexOutOfRange(index_text))?;
                match iter.next() {
                    Some((Token::BracketClose, _)) => {}
                    Some((_, text)) => {
                        return Err(PathParseError::UnexpectedToken(text));
                    }
                    None => return Err(PathParseError::UnexpectedEnd),
                }
                segments.push(Segment::Index(index));
                expect_key = false;
            }
            Token::Dot if !expect_key => {
                expect_key = true;
            }
            _ => return Err(PathParseError::UnexpectedToken(text)),
        }
    }

    if expect_key {
        // Trailing dot.
        return Err(PathParseError::UnexpectedEnd);
    }

    Ok(Path { segments })
}

// ===========================================================================
// Tests
// ===========================================================================
