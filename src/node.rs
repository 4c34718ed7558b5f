//! Shallow classifier: one descriptor level in, a typed payload view out.
//!
//! `Node::parse` reads the `kind` discriminator, validates the payload shape
//! for that tag, and borrows the children without descending into them.
//! Children stay raw `Value`s until a continuation interprets them, so the
//! cost of classification is one level deep regardless of tree size.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::tag::Tag;

/// Classify a descriptor by its `kind` discriminator alone.
///
/// Pure and deterministic: the same descriptor always yields the same tag.
pub fn classify(node: &Value) -> Result<Tag> {
    let kind = node
        .as_object()
        .and_then(|m| m.get("kind"))
        .and_then(Value::as_str)
        .ok_or_else(|| Error::shape("a descriptor object with a string `kind`", node))?;
    Tag::from_kind(kind).ok_or_else(|| Error::UnknownKind {
        kind: kind.to_string(),
        node: node.clone(),
    })
}

/// One classified level of a descriptor tree.
#[derive(Debug, Clone)]
pub struct Node<'a> {
    raw: &'a Value,
    tag: Tag,
    payload: Payload<'a>,
}

#[derive(Debug, Clone, Copy)]
enum Payload<'a> {
    /// Leaves.
    None,
    /// The scalar carried by a `literal` node.
    Literal(&'a Value),
    /// `optional` / `readonly`.
    Inner(&'a Value),
    /// `array`.
    Element(&'a Value),
    /// `record`.
    Entry { key: &'a Value, value: &'a Value },
    /// `tuple`.
    Items(&'a [Value]),
    /// `object`.
    Shape(&'a Map<String, Value>),
    /// `union`.
    Members(&'a [Value]),
    /// `intersection`.
    Sides { left: &'a Value, right: &'a Value },
    /// `disjoint`.
    Tagged {
        discriminator: &'a str,
        members: &'a [Value],
    },
}

impl<'a> Node<'a> {
    /// Classify `raw` and extract its children for this level.
    ///
    /// Shape problems surface here, not downstream: a handler that receives
    /// a `Node` can trust that the payload matched its tag.
    pub fn parse(raw: &'a Value) -> Result<Self> {
        let tag = classify(raw)?;
        let obj = raw
            .as_object()
            .ok_or_else(|| Error::shape("a descriptor object", raw))?;

        let payload = match tag {
            Tag::Null
            | Tag::Undefined
            | Tag::Boolean
            | Tag::Bigint
            | Tag::String
            | Tag::Number
            | Tag::Unknown => Payload::None,

            Tag::Literal => {
                let value = child(obj, raw, "value", "a literal with a `value`")?;
                if !is_scalar(value) {
                    return Err(Error::unsupported("non-primitive literal value", raw));
                }
                Payload::Literal(value)
            }

            Tag::Optional | Tag::Readonly => {
                Payload::Inner(child(obj, raw, "inner", "a wrapper with an `inner` node")?)
            }

            Tag::Array => Payload::Element(child(
                obj,
                raw,
                "element",
                "an array with an `element` node",
            )?),

            Tag::Record => Payload::Entry {
                key: child(obj, raw, "key", "a record with a `key` node")?,
                value: child(obj, raw, "value", "a record with a `value` node")?,
            },

            Tag::Tuple => Payload::Items(child_list(
                obj,
                raw,
                "items",
                "a tuple with an `items` list",
            )?),

            Tag::Object => {
                let shape = child(obj, raw, "shape", "an object with a `shape` map")?
                    .as_object()
                    .ok_or_else(|| Error::shape("an object with a `shape` map", raw))?;
                Payload::Shape(shape)
            }

            Tag::Union => {
                let members =
                    child_list(obj, raw, "members", "a union with a `members` list")?;
                if members.len() < 2 {
                    return Err(Error::shape("a union with at least two members", raw));
                }
                Payload::Members(members)
            }

            Tag::Intersection => Payload::Sides {
                left: child(obj, raw, "left", "an intersection with a `left` node")?,
                right: child(obj, raw, "right", "an intersection with a `right` node")?,
            },

            Tag::Disjoint => {
                let discriminator = obj
                    .get("discriminator")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        Error::shape("a disjoint with a string `discriminator`", raw)
                    })?;
                let members =
                    child_list(obj, raw, "members", "a disjoint with a `members` list")?;
                for member in members {
                    if !carries_discriminant(member, discriminator) {
                        return Err(Error::shape(
                            format!(
                                "disjoint members that are objects carrying `{discriminator}` as a literal"
                            ),
                            raw,
                        ));
                    }
                }
                Payload::Tagged {
                    discriminator,
                    members,
                }
            }
        };

        Ok(Node { raw, tag, payload })
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// The descriptor this node was parsed from.
    pub fn raw(&self) -> &'a Value {
        self.raw
    }

    /// The scalar of a `literal` node.
    pub fn literal_value(&self) -> Result<&'a Value> {
        match self.payload {
            Payload::Literal(value) => Ok(value),
            _ => Err(self.wrong_shape("a literal node")),
        }
    }

    /// The inner node of `optional` / `readonly`.
    pub fn inner(&self) -> Result<&'a Value> {
        match self.payload {
            Payload::Inner(inner) => Ok(inner),
            _ => Err(self.wrong_shape("a wrapper node")),
        }
    }

    /// The element node of an `array`.
    pub fn element(&self) -> Result<&'a Value> {
        match self.payload {
            Payload::Element(element) => Ok(element),
            _ => Err(self.wrong_shape("an array node")),
        }
    }

    /// The ordered item nodes of a `tuple`.
    pub fn items(&self) -> Result<&'a [Value]> {
        match self.payload {
            Payload::Items(items) => Ok(items),
            _ => Err(self.wrong_shape("a tuple node")),
        }
    }

    /// The ordered member nodes of a `union` or `disjoint`.
    pub fn members(&self) -> Result<&'a [Value]> {
        match self.payload {
            Payload::Members(members) | Payload::Tagged { members, .. } => Ok(members),
            _ => Err(self.wrong_shape("a union or disjoint node")),
        }
    }

    /// Property name to node mapping of an `object`, in insertion order.
    pub fn shape(&self) -> Result<&'a Map<String, Value>> {
        match self.payload {
            Payload::Shape(shape) => Ok(shape),
            _ => Err(self.wrong_shape("an object node")),
        }
    }

    /// Left and right of an `intersection`.
    pub fn sides(&self) -> Result<(&'a Value, &'a Value)> {
        match self.payload {
            Payload::Sides { left, right } => Ok((left, right)),
            _ => Err(self.wrong_shape("an intersection node")),
        }
    }

    /// Key node and value node of a `record`.
    pub fn entry(&self) -> Result<(&'a Value, &'a Value)> {
        match self.payload {
            Payload::Entry { key, value } => Ok((key, value)),
            _ => Err(self.wrong_shape("a record node")),
        }
    }

    /// The discriminator property name of a `disjoint`.
    pub fn discriminator(&self) -> Result<&'a str> {
        match self.payload {
            Payload::Tagged { discriminator, .. } => Ok(discriminator),
            _ => Err(self.wrong_shape("a disjoint node")),
        }
    }

    /// Refinement checks of a `string` / `number` / `bigint` node.
    /// Absent means unrefined.
    pub fn checks(&self) -> Result<&'a [Value]> {
        match self.raw.get("checks") {
            None => Ok(&[]),
            Some(Value::Array(list)) => Ok(list),
            Some(_) => Err(Error::shape("a `checks` list", self.raw)),
        }
    }

    fn wrong_shape(&self, expected: &str) -> Error {
        Error::shape(format!("{expected}, got `{}`", self.tag.kind()), self.raw)
    }
}

fn child<'a>(
    obj: &'a Map<String, Value>,
    raw: &Value,
    key: &str,
    expected: &'static str,
) -> Result<&'a Value> {
    obj.get(key).ok_or_else(|| Error::shape(expected, raw))
}

fn child_list<'a>(
    obj: &'a Map<String, Value>,
    raw: &Value,
    key: &str,
    expected: &'static str,
) -> Result<&'a [Value]> {
    child(obj, raw, key, expected)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| Error::shape(expected, raw))
}

fn is_scalar(value: &Value) -> bool {
    matches!(
        value,
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
    )
}

/// A disjoint member must be an object whose shape holds the discriminator
/// property as a literal.
fn carries_discriminant(member: &Value, discriminator: &str) -> bool {
    if !matches!(classify(member), Ok(Tag::Object)) {
        return false;
    }
    member
        .get("shape")
        .and_then(Value::as_object)
        .and_then(|shape| shape.get(discriminator))
        .is_some_and(|prop| matches!(classify(prop), Ok(Tag::Literal)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classify_is_deterministic() {
        let node = json!({"kind": "string"});
        for _ in 0..3 {
            assert_eq!(classify(&node).unwrap(), Tag::String);
        }
    }

    #[test]
    fn classify_rejects_unknown_kinds() {
        let node = json!({"kind": "nullable", "inner": {"kind": "string"}});
        match classify(&node) {
            Err(Error::UnknownKind { kind, .. }) => assert_eq!(kind, "nullable"),
            other => panic!("expected UnknownKind, got {other:?}"),
        }
    }

    #[test]
    fn classify_requires_a_discriminator() {
        assert!(matches!(
            classify(&json!({"element": {"kind": "string"}})),
            Err(Error::ShapeMismatch { .. })
        ));
        assert!(matches!(
            classify(&json!("string")),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn parse_validates_payload_shape() {
        assert!(matches!(
            Node::parse(&json!({"kind": "array"})),
            Err(Error::ShapeMismatch { .. })
        ));
        assert!(matches!(
            Node::parse(&json!({"kind": "tuple", "items": 3})),
            Err(Error::ShapeMismatch { .. })
        ));
        assert!(matches!(
            Node::parse(&json!({"kind": "object", "shape": []})),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn unions_need_two_members() {
        let node = json!({"kind": "union", "members": [{"kind": "string"}]});
        assert!(matches!(
            Node::parse(&node),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn literal_values_must_be_scalars() {
        let node = json!({"kind": "literal", "value": {"nested": true}});
        assert!(matches!(
            Node::parse(&node),
            Err(Error::UnsupportedInput { .. })
        ));
        let node = json!({"kind": "literal", "value": [1, 2]});
        assert!(matches!(
            Node::parse(&node),
            Err(Error::UnsupportedInput { .. })
        ));
    }

    #[test]
    fn disjoint_members_must_carry_the_discriminant() {
        let good = json!({
            "kind": "disjoint",
            "discriminator": "tag",
            "members": [
                {"kind": "object", "shape": {"tag": {"kind": "literal", "value": "a"}}},
                {"kind": "object", "shape": {"tag": {"kind": "literal", "value": "b"}}},
            ],
        });
        assert!(Node::parse(&good).is_ok());

        let missing = json!({
            "kind": "disjoint",
            "discriminator": "tag",
            "members": [
                {"kind": "object", "shape": {"other": {"kind": "literal", "value": "a"}}},
            ],
        });
        assert!(matches!(
            Node::parse(&missing),
            Err(Error::ShapeMismatch { .. })
        ));

        let not_object = json!({
            "kind": "disjoint",
            "discriminator": "tag",
            "members": [{"kind": "string"}],
        });
        assert!(matches!(
            Node::parse(&not_object),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn accessors_reject_mismatched_tags() {
        let node = json!({"kind": "array", "element": {"kind": "string"}});
        let node = Node::parse(&node).unwrap();
        assert!(node.element().is_ok());
        assert!(matches!(node.shape(), Err(Error::ShapeMismatch { .. })));
        assert!(matches!(node.inner(), Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn object_shape_preserves_insertion_order() {
        let node = json!({"kind": "object", "shape": {
            "zz": {"kind": "string"},
            "aa": {"kind": "number"},
        }});
        let node = Node::parse(&node).unwrap();
        let names: Vec<&String> = node.shape().unwrap().keys().collect();
        assert_eq!(names, ["zz", "aa"]);
    }
}
