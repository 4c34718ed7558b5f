//! The closed set of node kinds, and the registry mapping them to the wire
//! discriminators used by descriptor producers.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Node kind. Every descriptor the walker accepts classifies to exactly one
/// of these; a discriminator outside this set is a fatal classification
/// failure, never a silent skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Null,
    Undefined,
    Boolean,
    Bigint,
    String,
    Number,
    Unknown,
    Literal,
    Optional,
    Readonly,
    Array,
    Record,
    Tuple,
    Object,
    Union,
    Intersection,
    Disjoint,
}

/// Reverse side of the registry: wire kind string to tag.
static KIND_TO_TAG: Lazy<HashMap<&'static str, Tag>> =
    Lazy::new(|| Tag::ALL.iter().map(|t| (t.kind(), *t)).collect());

impl Tag {
    /// Every tag, in declaration order. `Tag::ALL[t as usize] == t` holds,
    /// which lets handler tables index by discriminant.
    pub const ALL: [Tag; 17] = [
        Tag::Null,
        Tag::Undefined,
        Tag::Boolean,
        Tag::Bigint,
        Tag::String,
        Tag::Number,
        Tag::Unknown,
        Tag::Literal,
        Tag::Optional,
        Tag::Readonly,
        Tag::Array,
        Tag::Record,
        Tag::Tuple,
        Tag::Object,
        Tag::Union,
        Tag::Intersection,
        Tag::Disjoint,
    ];

    pub const COUNT: usize = Tag::ALL.len();

    /// The wire discriminator for this tag.
    pub fn kind(self) -> &'static str {
        match self {
            Tag::Null => "null",
            Tag::Undefined => "undefined",
            Tag::Boolean => "boolean",
            Tag::Bigint => "bigint",
            Tag::String => "string",
            Tag::Number => "number",
            Tag::Unknown => "unknown",
            Tag::Literal => "literal",
            Tag::Optional => "optional",
            Tag::Readonly => "readonly",
            Tag::Array => "array",
            Tag::Record => "record",
            Tag::Tuple => "tuple",
            Tag::Object => "object",
            Tag::Union => "union",
            Tag::Intersection => "intersection",
            Tag::Disjoint => "disjoint",
        }
    }

    /// Look a wire discriminator up in the registry.
    pub fn from_kind(kind: &str) -> Option<Tag> {
        KIND_TO_TAG.get(kind).copied()
    }

    /// Childless nodes.
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            Tag::Null
                | Tag::Undefined
                | Tag::Boolean
                | Tag::Bigint
                | Tag::String
                | Tag::Number
                | Tag::Unknown
        )
    }

    /// Exactly one inner node.
    pub fn is_wrapper(self) -> bool {
        matches!(self, Tag::Optional | Tag::Readonly)
    }

    /// One or more child nodes.
    pub fn is_composite(self) -> bool {
        matches!(
            self,
            Tag::Array
                | Tag::Record
                | Tag::Tuple
                | Tag::Object
                | Tag::Union
                | Tag::Intersection
                | Tag::Disjoint
        )
    }
}
