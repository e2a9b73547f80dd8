//! # Structural Paths
//!
//! Addressing of values inside a JSON document.
//!
//! A path is a sequence of object keys and array indices starting at the
//! root. It renders as `$` followed by one bracketed segment per step:
//!
//! ```text
//! ["customer", 0, "name"]  →  $["customer"][0]["name"]
//! []                       →  $
//! ```
//!
//! [`resolve`] walks every segment but the last and hands back the slot the
//! last segment names, so callers can read and replace it in one step.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// One step of a path: an object key or an array index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(index) => write!(f, "[{}]", index),
            // Serializing a str cannot fail
            PathSegment::Key(key) => write!(
                f,
                "[{}]",
                serde_json::to_string(key).unwrap_or_else(|_| format!("\"{}\"", key))
            ),
        }
    }
}

/// Location of a value inside a document, starting at the root
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuralPath(Vec<PathSegment>);

impl StructuralPath {
    /// Create path from segments
    #[must_use]
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }

    /// Empty path (root)
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Extend with an object key
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.0.push(PathSegment::Key(key.into()));
        self
    }

    /// Extend with an array index
    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.0.push(PathSegment::Index(index));
        self
    }

    /// Child path one segment deeper
    #[must_use]
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty (root)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get parent path (if not root)
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0
            .split_last()
            .map(|(_, init)| Self(init.to_vec()))
    }

    /// Get last segment (if not root)
    #[must_use]
    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }
}

impl From<Vec<PathSegment>> for StructuralPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl FromIterator<PathSegment> for StructuralPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Display for StructuralPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathParseError {
    #[error("path must start with '$'")]
    MissingRoot,

    #[error("expected '[' at offset {0}")]
    ExpectedBracket(usize),

    #[error("unterminated segment starting at offset {0}")]
    Unterminated(usize),

    #[error("invalid segment at offset {offset}: {reason}")]
    InvalidSegment { offset: usize, reason: String },
}

impl FromStr for StructuralPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut rest = trimmed
            .strip_prefix('$')
            .ok_or(PathParseError::MissingRoot)?;
        let mut offset = trimmed.len() - rest.len();
        let mut segments = Vec::new();

        while !rest.is_empty() {
            let body = rest
                .strip_prefix('[')
                .ok_or(PathParseError::ExpectedBracket(offset))?;

            let (segment, consumed) = if body.starts_with('"') {
                parse_key(body, offset)?
            } else {
                parse_index(body, offset)?
            };

            segments.push(segment);
            // '[' + segment body + ']'
            rest = &body[consumed + 1..];
            offset += consumed + 2;
        }

        Ok(Self(segments))
    }
}

/// Parse `"…"]`, returning the key and the byte length up to the closing bracket
fn parse_key(body: &str, offset: usize) -> Result<(PathSegment, usize), PathParseError> {
    let mut escaped = false;
    let mut close = None;

    for (i, c) in body.char_indices().skip(1) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => {
                close = Some(i);
                break;
            }
            _ => {}
        }
    }

    let close = close.ok_or(PathParseError::Unterminated(offset))?;
    let key: String =
        serde_json::from_str(&body[..=close]).map_err(|e| PathParseError::InvalidSegment {
            offset,
            reason: e.to_string(),
        })?;

    if !body[close + 1..].starts_with(']') {
        return Err(PathParseError::Unterminated(offset));
    }

    Ok((PathSegment::Key(key), close + 1))
}

/// Parse `digits]`, returning the index and the byte length up to the closing bracket
fn parse_index(body: &str, offset: usize) -> Result<(PathSegment, usize), PathParseError> {
    let close = body.find(']').ok_or(PathParseError::Unterminated(offset))?;
    let digits = &body[..close];

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PathParseError::InvalidSegment {
            offset,
            reason: format!("expected index or quoted key, found {:?}", digits),
        });
    }

    let index = digits
        .parse::<usize>()
        .map_err(|e| PathParseError::InvalidSegment {
            offset,
            reason: e.to_string(),
        })?;

    Ok((PathSegment::Index(index), close))
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Invalid path {path}: {reason}")]
    InvalidPath { path: String, reason: String },
}

impl ResolveError {
    fn invalid(path: &StructuralPath, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::debug!(%path, %reason, "path did not resolve");
        ResolveError::InvalidPath {
            path: path.to_string(),
            reason,
        }
    }
}

/// Writable location addressed by a path
///
/// `Field` may name a key that does not exist yet and `Element` may sit one
/// past the end of its array; writing either creates the value.
#[derive(Debug)]
pub enum Slot<'a> {
    /// Empty path: the root itself, no parent
    Root(&'a mut Value),

    /// Member of an object
    Field {
        map: &'a mut Map<String, Value>,
        key: String,
    },

    /// Element of an array
    Element {
        items: &'a mut Vec<Value>,
        index: usize,
    },
}

impl<'a> Slot<'a> {
    /// Final path segment, `None` for the root
    pub fn key(&self) -> Option<PathSegment> {
        match self {
            Slot::Root(_) => None,
            Slot::Field { key, .. } => Some(PathSegment::Key(key.clone())),
            Slot::Element { index, .. } => Some(PathSegment::Index(*index)),
        }
    }

    /// Value currently held by the slot
    pub fn current(&self) -> Option<&Value> {
        match self {
            Slot::Root(value) => Some(&**value),
            Slot::Field { map, key } => map.get(key.as_str()),
            Slot::Element { items, index } => items.get(*index),
        }
    }

    pub fn current_mut(&mut self) -> Option<&mut Value> {
        match self {
            Slot::Root(value) => Some(&mut **value),
            Slot::Field { map, key } => map.get_mut(key.as_str()),
            Slot::Element { items, index } => items.get_mut(*index),
        }
    }

    /// Write `value` into the slot, returning what it held before
    pub fn replace(self, value: Value) -> Option<Value> {
        match self {
            Slot::Root(root) => Some(std::mem::replace(root, value)),
            Slot::Field { map, key } => map.insert(key, value),
            Slot::Element { items, index } => match items.get_mut(index) {
                Some(existing) => Some(std::mem::replace(existing, value)),
                None => {
                    items.push(value);
                    None
                }
            },
        }
    }
}

/// Key under which an object stores a segment
fn member_key(segment: &PathSegment) -> String {
    match segment {
        PathSegment::Key(key) => key.clone(),
        PathSegment::Index(index) => index.to_string(),
    }
}

fn step<'v>(value: &'v Value, segment: &PathSegment) -> Option<&'v Value> {
    match value {
        Value::Object(map) => map.get(member_key(segment).as_str()),
        Value::Array(items) => match segment {
            PathSegment::Index(index) => items.get(*index),
            PathSegment::Key(_) => None,
        },
        _ => None,
    }
}

fn step_mut<'v>(value: &'v mut Value, segment: &PathSegment) -> Option<&'v mut Value> {
    match value {
        Value::Object(map) => map.get_mut(member_key(segment).as_str()),
        Value::Array(items) => match segment {
            PathSegment::Index(index) => items.get_mut(*index),
            PathSegment::Key(_) => None,
        },
        _ => None,
    }
}

/// Read the value at `path`, if every segment exists
pub fn lookup<'v>(root: &'v Value, path: &StructuralPath) -> Option<&'v Value> {
    path.segments()
        .iter()
        .try_fold(root, |value, segment| step(value, segment))
}

/// Locate the slot addressed by `path`
///
/// Every segment but the last must exist. The last segment must fit its
/// container: any key on an object, an index up to the length on an array.
/// Nothing is created on the way down.
pub fn resolve<'a>(root: &'a mut Value, path: &StructuralPath) -> Result<Slot<'a>, ResolveError> {
    let Some((last, init)) = path.segments().split_last() else {
        return Ok(Slot::Root(root));
    };

    let mut parent = root;
    for (depth, segment) in init.iter().enumerate() {
        parent = step_mut(parent, segment).ok_or_else(|| {
            let prefix: StructuralPath = init[..=depth].iter().cloned().collect();
            ResolveError::invalid(path, format!("{} does not exist", prefix))
        })?;
    }

    match parent {
        Value::Object(map) => Ok(Slot::Field {
            map,
            key: member_key(last),
        }),
        Value::Array(items) => match last {
            PathSegment::Index(index) if *index > items.len() => Err(ResolveError::invalid(
                path,
                format!("index {} is out of bounds for length {}", index, items.len()),
            )),
            PathSegment::Index(index) => Ok(Slot::Element {
                items,
                index: *index,
            }),
            PathSegment::Key(key) => Err(ResolveError::invalid(
                path,
                format!("key {:?} does not address an array element", key),
            )),
        },
        _ => Err(ResolveError::invalid(path, "parent is not a container")),
    }
}
