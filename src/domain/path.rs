//! Dot-separated addresses into the item tree
//!
//! A [`Path`] is parsed once from text like `"user.tags.0"` (or the bracket
//! spelling `"user.tags[0]"`) and then used for every access. Paths are never
//! empty: a parsed path always has at least one segment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::PathError;

/// Segment of a path
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    /// Object property access: `.name`
    Key(String),
    /// Array index access: `.0` or `[0]`
    Index(usize),
}

impl PathSegment {
    /// Classify a textual segment. Canonical digit-only text (`0`, `12`,
    /// never `012`) is an index; anything else stays a key.
    fn from_text(text: &str) -> Self {
        let canonical = text == "0" || !text.starts_with('0');
        if canonical && text.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = text.parse::<usize>() {
                return PathSegment::Index(index);
            }
        }
        PathSegment::Key(text.to_string())
    }

    /// True for [`PathSegment::Index`]
    pub fn is_index(&self) -> bool {
        matches!(self, PathSegment::Index(_))
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Immutable, validated location inside an item
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// Parse a dot-separated path. Bracket indices (`items[0]`) are accepted too.
    pub fn parse(s: &str) -> Result<Self, PathError> {
        if s.is_empty() {
            return Err(PathError::Empty);
        }

        let mut segments = Vec::new();
        let mut current = String::new();
        let mut prev: Option<char> = None;
        let mut chars = s.chars().peekable();

        while let Some(ch) = chars.next() {
            if prev == Some(']') && ch != '.' && ch != '[' {
                return Err(PathError::MissingSeparator {
                    path: s.to_string(),
                    position: segments.len(),
                });
            }
            match ch {
                '.' => {
                    if current.is_empty() && prev != Some(']') {
                        return Err(PathError::EmptySegment {
                            path: s.to_string(),
                            position: segments.len(),
                        });
                    }
                    if !current.is_empty() {
                        segments.push(PathSegment::from_text(&current));
                        current.clear();
                    }
                    if chars.peek().map_or(true, |next| *next == '[') {
                        return Err(PathError::EmptySegment {
                            path: s.to_string(),
                            position: segments.len(),
                        });
                    }
                }
                '[' => {
                    if !current.is_empty() {
                        segments.push(PathSegment::from_text(&current));
                        current.clear();
                    }
                    let mut index = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == ']' {
                            closed = true;
                            break;
                        }
                        index.push(c);
                    }
                    if !closed {
                        return Err(PathError::UnclosedBracket { path: s.to_string() });
                    }
                    let parsed = index.trim().parse::<usize>().map_err(|_| PathError::InvalidIndex {
                        path: s.to_string(),
                        index: index.clone(),
                    })?;
                    segments.push(PathSegment::Index(parsed));
                    prev = Some(']');
                    continue;
                }
                _ => current.push(ch),
            }
            prev = Some(ch);
        }

        if !current.is_empty() {
            segments.push(PathSegment::from_text(&current));
        }

        Ok(Self { segments })
    }

    /// Single-key path
    pub fn key(name: &str) -> Self {
        Self {
            segments: vec![PathSegment::Key(name.to_string())],
        }
    }

    /// Append a property segment
    pub fn push_key(&self, name: &str) -> Self {
        let mut new = self.clone();
        new.segments.push(PathSegment::Key(name.to_string()));
        new
    }

    /// Append an index segment
    pub fn push_index(&self, index: usize) -> Self {
        let mut new = self.clone();
        new.segments.push(PathSegment::Index(index));
        new
    }

    /// Path without its last segment, `None` for single-segment paths
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() < 2 {
            return None;
        }
        let mut new = self.clone();
        new.segments.pop();
        Some(new)
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when `self` addresses `other` or one of its ancestors
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.segments.starts_with(&self.segments)
    }

    /// True when a write to one path can change the value read at the other
    pub fn overlaps(&self, other: &Path) -> bool {
        self.is_prefix_of(other) || other.is_prefix_of(self)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Path {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Path {
    type Error = PathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.to_string()
    }
}
