//! Nested-path addressing inside a stored [`Value`].
//!
//! Paths use dot notation with optional bracket segments:
//!
//! | Path | Segments |
//! |------|----------|
//! | `fizz.buzz` | `fizz`, `buzz` |
//! | `todo[0]` | `todo`, `0` |
//! | `todo.0.title` | `todo`, `0`, `title` |
//! | `a["b.c"]` | `a`, `b.c` |
//!
//! A numeric segment indexes into an array and is an ordinary key inside a
//! map. Path operations work on whole values in memory; backends never see
//! them.

use std::fmt;
use std::str::FromStr;

use crate::error::{StoreError, StoreResult};
use crate::value::Value;

/// A parsed nested path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    raw: String,
    segments: Vec<String>,
}

impl Path {
    /// Parse a path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] for an empty path, an empty
    /// segment (`a..b`, `.a`, `a.`), empty or unbalanced brackets.
    pub fn parse(raw: &str) -> StoreResult<Self> {
        let invalid = |reason: &str| StoreError::InvalidPath {
            path: raw.to_owned(),
            reason: reason.to_owned(),
        };

        if raw.is_empty() {
            return Err(invalid("path must not be empty"));
        }

        let mut segments = Vec::new();
        let mut current = String::new();
        let mut after_bracket = false;
        let mut chars = raw.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if current.is_empty() && !after_bracket {
                        return Err(invalid("empty segment"));
                    }
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                    if chars.peek().is_none() {
                        return Err(invalid("trailing `.`"));
                    }
                    after_bracket = false;
                },
                '[' => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                    let mut inner = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == ']' {
                            closed = true;
                            break;
                        }
                        inner.push(c);
                    }
                    if !closed {
                        return Err(invalid("unclosed `[`"));
                    }
                    let inner = unquote(&inner);
                    if inner.is_empty() {
                        return Err(invalid("empty brackets"));
                    }
                    segments.push(inner.to_owned());
                    if !matches!(chars.peek(), None | Some('.' | '[')) {
                        return Err(invalid("expected `.` or `[` after `]`"));
                    }
                    after_bracket = true;
                },
                ']' => return Err(invalid("unmatched `]`")),
                _ => current.push(c),
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }

        Ok(Self {
            raw: raw.to_owned(),
            segments,
        })
    }

    /// The path as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Resolve the path, or `None` if any segment is missing.
    #[must_use]
    pub fn get<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        self.segments
            .iter()
            .try_fold(root, |node, segment| child(node, segment))
    }

    /// Whether the path resolves. A `Null` leaf counts as present.
    #[must_use]
    pub fn contains(&self, root: &Value) -> bool {
        self.get(root).is_some()
    }

    /// Write `value` at the path, creating intermediate maps as needed.
    ///
    /// Scalars standing where a container is needed (including the root)
    /// are replaced by an empty map. Array segments must be an index no
    /// greater than the array length; writing at the length appends.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] if a segment addresses an array
    /// with a non-numeric or out-of-range index.
    pub fn set(&self, root: &mut Value, value: Value) -> StoreResult<()> {
        let Some((last, parents)) = self.segments.split_last() else {
            return Err(self.invalid("path has no segments"));
        };

        if !root.is_container() {
            *root = Value::empty_map();
        }
        let mut node = root;
        for segment in parents {
            let next = self.slot(node, segment)?;
            if !next.is_container() {
                *next = Value::empty_map();
            }
            node = next;
        }
        *self.slot(node, last)? = value;
        Ok(())
    }

    /// Remove the addressed property.
    ///
    /// A removed array element leaves `Null` in its slot; later elements keep
    /// their indices. Returns `true` if something was removed.
    pub fn remove(&self, root: &mut Value) -> bool {
        let Some((last, parents)) = self.segments.split_last() else {
            return false;
        };

        let mut node = root;
        for segment in parents {
            match child_mut(node, segment) {
                Some(next) => node = next,
                None => return false,
            }
        }
        match node {
            Value::Map(map) => map.remove(last).is_some(),
            Value::Array(items) => match last.parse::<usize>() {
                Ok(index) => match items.get_mut(index) {
                    Some(slot) => {
                        *slot = Value::Null;
                        true
                    },
                    None => false,
                },
                _ => false,
            },
            _ => false,
        }
    }

    fn slot<'v>(&self, node: &'v mut Value, segment: &str) -> StoreResult<&'v mut Value> {
        match node {
            Value::Map(map) => Ok(map.entry(segment.to_owned()).or_insert(Value::Null)),
            Value::Array(items) => {
                let index: usize = segment
                    .parse()
                    .map_err(|_| self.invalid(&format!("`{segment}` is not an array index")))?;
                if index == items.len() {
                    items.push(Value::Null);
                }
                let len = items.len();
                items
                    .get_mut(index)
                    .ok_or_else(|| self.invalid(&format!("index {index} is out of bounds ({len})")))
            },
            _ => Err(self.invalid(&format!("cannot descend into a scalar at `{segment}`"))),
        }
    }

    fn invalid(&self, reason: &str) -> StoreError {
        StoreError::InvalidPath {
            path: self.raw.clone(),
            reason: reason.to_owned(),
        }
    }
}

fn child<'v>(node: &'v Value, segment: &str) -> Option<&'v Value> {
    match node {
        Value::Map(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn child_mut<'v>(node: &'v mut Value, segment: &str) -> Option<&'v mut Value> {
    match node {
        Value::Map(map) => map.get_mut(segment),
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|i| items.get_mut(i)),
        _ => None,
    }
}

fn unquote(inner: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(stripped) = inner
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return stripped;
        }
    }
    inner
}

impl FromStr for Path {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
