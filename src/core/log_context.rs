//! Persistent field context bound to derived loggers
//!
//! `LoggerContext` is an append-only chain of field groups. Deriving a child
//! context allocates one node that points at its parent; the parent is never
//! touched, so any number of siblings can share a common prefix.

use super::field::Field;
use std::sync::Arc;

#[derive(Debug)]
struct ContextNode {
    fields: Vec<Field>,
    parent: Option<Arc<ContextNode>>,
}

/// Fields attached to every record of a logger and its descendants
///
/// # Example
///
/// ```
/// use field_logger::{Field, LoggerContext};
///
/// let root = LoggerContext::new().with_fields([Field::string("service", "api")]);
/// let child = root.with_fields([Field::int("request", 7)]);
///
/// assert_eq!(root.len(), 1);
/// let keys: Vec<_> = child.iter().map(|f| f.key.as_str()).collect();
/// assert_eq!(keys, ["service", "request"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoggerContext {
    head: Option<Arc<ContextNode>>,
    len: usize,
}

impl LoggerContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new context with `fields` appended after the existing ones
    #[must_use]
    pub fn with_fields<I>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = Field>,
    {
        let fields: Vec<Field> = fields.into_iter().collect();
        if fields.is_empty() {
            return self.clone();
        }
        let len = self.len + fields.len();
        Self {
            head: Some(Arc::new(ContextNode {
                fields,
                parent: self.head.clone(),
            })),
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bound fields, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Field> + '_ {
        let mut nodes = Vec::new();
        let mut current = self.head.as_deref();
        while let Some(node) = current {
            nodes.push(node);
            current = node.parent.as_deref();
        }
        nodes.into_iter().rev().flat_map(|node| node.fields.iter())
    }
}
