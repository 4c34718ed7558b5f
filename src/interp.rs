//! Generic interpreter over descriptor trees.
//!
//! Callers supply a partial handler table; the rest of the tags fall back to
//! defaults (identity for leaves and n-ary composites, passthrough for
//! wrappers). The two tables merge into one total table at construction, so
//! traversal never asks "is there an override" per node.
//!
//! Composite handlers receive a continuation bound to the interpreter's own
//! dispatch. Recursion re-enters that dispatch on every child, so a tag
//! change at any depth needs no special casing.

use serde_json::Value;
use tracing::trace;

use crate::error::Result;
use crate::node::Node;
use crate::tag::Tag;

/// The continuation handed to handlers: interpret one child descriptor.
pub type Next<'a> = &'a dyn Fn(&Value) -> Result<Value>;

/// A node handler. Leaf handlers ignore the continuation.
pub type Handler = Box<dyn Fn(Next<'_>, &Node<'_>) -> Result<Value>>;

/// Partial handler table: any subset of tags may be supplied, at most one
/// handler per tag.
pub struct Overrides {
    table: [Option<Handler>; Tag::COUNT],
}

impl Overrides {
    pub fn new() -> Self {
        Overrides {
            table: std::array::from_fn(|_| None),
        }
    }

    /// Register a handler for `tag`, replacing any earlier registration.
    pub fn on(
        mut self,
        tag: Tag,
        handler: impl Fn(Next<'_>, &Node<'_>) -> Result<Value> + 'static,
    ) -> Self {
        self.table[tag as usize] = Some(Box::new(handler));
        self
    }
}

impl Default for Overrides {
    fn default() -> Self {
        Overrides::new()
    }
}

/// The interpreter proper: one total handler table, fixed at construction.
pub struct Interp {
    table: [Handler; Tag::COUNT],
}

impl Interp {
    /// Merge `overrides` over the default table.
    pub fn new(overrides: Overrides) -> Self {
        let mut overrides = overrides;
        let table = std::array::from_fn(|ix| {
            overrides.table[ix]
                .take()
                .unwrap_or_else(|| default_handler(Tag::ALL[ix]))
        });
        Interp { table }
    }

    /// Interpret one descriptor tree, bubbling the handler results up.
    pub fn run(&self, schema: &Value) -> Result<Value> {
        let node = Node::parse(schema)?;
        trace!(tag = node.tag().kind(), "dispatch");
        let next = |sub: &Value| self.run(sub);
        (self.table[node.tag() as usize])(&next, &node)
    }
}

/// Identity for leaves, literals, and n-ary composites (the continuation is
/// ignored, children are left untouched); passthrough for wrappers.
fn default_handler(tag: Tag) -> Handler {
    if tag.is_wrapper() {
        Box::new(|next, node| next(node.inner()?))
    } else {
        Box::new(|_, node| Ok(node.raw().clone()))
    }
}
