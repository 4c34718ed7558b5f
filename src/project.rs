//! Interchange-schema projector: walk a descriptor bottom-up and emit an
//! open interchange document (`type`, `const`, `items`, `properties`,
//! `required`, `additionalProperties`, `anyOf`, `allOf`, `oneOf`, `format`,
//! numeric range keywords).

use indexmap::IndexMap;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::checks::{BigintCheck, IpVersion, NumberCheck, StringCheck, parse_checks};
use crate::error::{Error, Result};
use crate::interp::{Interp, Next, Overrides};
use crate::node::{Node, classify};
use crate::tag::Tag;

/// Project a descriptor into an interchange-schema document.
///
/// Either a fully formed document comes back, or the first unsupported node
/// anywhere in the tree fails the call. There is no partial output.
pub fn to_interchange(schema: &Value) -> Result<Value> {
    debug!("project to interchange schema");
    interp().run(schema)
}

fn interp() -> Interp {
    let ov = Overrides::new()
        .on(Tag::Null, |_, _| Ok(json!({"type": "null"})))
        .on(Tag::Undefined, |_, _| Ok(json!({"type": "null"})))
        .on(Tag::Boolean, |_, _| Ok(json!({"type": "boolean"})))
        .on(Tag::String, from_string)
        .on(Tag::Number, from_number)
        .on(Tag::Bigint, from_bigint)
        .on(Tag::Literal, from_literal)
        .on(Tag::Unknown, |_, node| {
            Err(Error::unsupported(
                "no interchange representation for `unknown`",
                node.raw(),
            ))
        })
        // Wrappers contribute nothing to the document itself; their effect
        // is visible only through the parent object's `required` list.
        .on(Tag::Optional, |next, node| next(node.inner()?))
        .on(Tag::Readonly, |next, node| next(node.inner()?))
        .on(Tag::Array, from_array)
        .on(Tag::Tuple, from_tuple)
        .on(Tag::Record, from_record)
        .on(Tag::Object, from_object)
        .on(Tag::Union, from_union)
        .on(Tag::Intersection, from_intersection)
        .on(Tag::Disjoint, from_disjoint);
    Interp::new(ov)
}

// ------------------------------ scalars ---------------------------------- //

fn from_string(_: Next<'_>, node: &Node<'_>) -> Result<Value> {
    let checks: Vec<StringCheck> = parse_checks(node.raw(), node.checks()?)?;
    if checks.iter().any(|c| matches!(c, StringCheck::Pattern { .. })) {
        return Err(Error::Unimplemented("string pattern constraints"));
    }

    let mut doc = Map::new();
    doc.insert("type".into(), json!("string"));
    if let Some(format) = format_of(&checks) {
        doc.insert("format".into(), json!(format));
    }
    for check in &checks {
        match check {
            StringCheck::Min { value } => {
                doc.insert("minLength".into(), json!(value));
            }
            StringCheck::Max { value } => {
                doc.insert("maxLength".into(), json!(value));
            }
            _ => {}
        }
    }
    Ok(Value::Object(doc))
}

/// First matching check wins; at most one format is ever emitted.
fn format_of(checks: &[StringCheck]) -> Option<&'static str> {
    let has = |p: fn(&StringCheck) -> bool| checks.iter().any(p);
    if has(|c| matches!(c, StringCheck::Email)) {
        return Some("email");
    }
    if has(|c| matches!(c, StringCheck::Url)) {
        return Some("uri");
    }
    if has(|c| matches!(c, StringCheck::Uuid)) {
        return Some("uuid");
    }
    if has(|c| matches!(c, StringCheck::Datetime)) {
        return Some("date-time");
    }
    if has(|c| matches!(c, StringCheck::Date)) {
        return Some("date");
    }
    if has(|c| matches!(c, StringCheck::Time)) {
        return Some("time");
    }
    if has(|c| matches!(c, StringCheck::Duration)) {
        return Some("duration");
    }
    checks.iter().find_map(|c| match c {
        StringCheck::Ip { version } => Some(match version {
            Some(IpVersion::V6) => "ipv6",
            _ => "ipv4",
        }),
        _ => None,
    })
}

fn from_number(_: Next<'_>, node: &Node<'_>) -> Result<Value> {
    let checks: Vec<NumberCheck> = parse_checks(node.raw(), node.checks()?)?;
    let integer = checks.iter().any(|c| matches!(c, NumberCheck::Int));

    let mut doc = Map::new();
    doc.insert("type".into(), json!(if integer { "integer" } else { "number" }));
    for check in &checks {
        match check {
            NumberCheck::Min { value, inclusive } => {
                let key = if *inclusive { "minimum" } else { "exclusiveMinimum" };
                doc.insert(key.into(), number_value(*value));
            }
            NumberCheck::Max { value, inclusive } => {
                let key = if *inclusive { "maximum" } else { "exclusiveMaximum" };
                doc.insert(key.into(), number_value(*value));
            }
            NumberCheck::MultipleOf { value } => {
                doc.insert("multipleOf".into(), number_value(*value));
            }
            NumberCheck::Int => {}
        }
    }
    Ok(Value::Object(doc))
}

fn from_bigint(_: Next<'_>, node: &Node<'_>) -> Result<Value> {
    let checks: Vec<BigintCheck> = parse_checks(node.raw(), node.checks()?)?;

    let mut doc = Map::new();
    doc.insert("type".into(), json!("integer"));
    for check in &checks {
        match check {
            BigintCheck::Min { value, inclusive } => {
                let key = if *inclusive { "minimum" } else { "exclusiveMinimum" };
                doc.insert(key.into(), json!(value));
            }
            BigintCheck::Max { value, inclusive } => {
                let key = if *inclusive { "maximum" } else { "exclusiveMaximum" };
                doc.insert(key.into(), json!(value));
            }
            BigintCheck::MultipleOf { value } => {
                doc.insert("multipleOf".into(), json!(value));
            }
        }
    }
    Ok(Value::Object(doc))
}

fn from_literal(_: Next<'_>, node: &Node<'_>) -> Result<Value> {
    let value = node.literal_value()?;
    let type_name = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        _ => return Err(Error::unsupported("non-primitive literal value", node.raw())),
    };
    Ok(json!({"type": type_name, "const": value}))
}

/// Prefer emitting integers when the bound is mathematically one.
fn number_value(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

// ----------------------------- composites -------------------------------- //

fn from_array(next: Next<'_>, node: &Node<'_>) -> Result<Value> {
    Ok(json!({"type": "array", "items": next(node.element()?)?}))
}

fn from_tuple(next: Next<'_>, node: &Node<'_>) -> Result<Value> {
    // Fixed-length list of schemas, one per position.
    let items: Vec<Value> = node.items()?.iter().map(next).collect::<Result<_>>()?;
    Ok(json!({"type": "array", "items": items}))
}

fn from_record(next: Next<'_>, node: &Node<'_>) -> Result<Value> {
    // The key schema is not reflected in the output, only the value schema.
    let (_key, value) = node.entry()?;
    Ok(json!({"type": "object", "additionalProperties": next(value)?}))
}

fn from_object(next: Next<'_>, node: &Node<'_>) -> Result<Value> {
    let mut properties = IndexMap::<String, Value>::new();
    let mut required = Vec::<String>::new();
    for (name, prop) in node.shape()? {
        // Required-ness looks at the property's top-level tag only. A
        // `readonly(optional(..))` property therefore still counts as
        // required.
        if !matches!(classify(prop)?, Tag::Optional) {
            required.push(name.clone());
        }
        properties.insert(name.clone(), next(prop)?);
    }
    Ok(json!({"type": "object", "properties": properties, "required": required}))
}

fn from_union(next: Next<'_>, node: &Node<'_>) -> Result<Value> {
    let members: Vec<Value> = node.members()?.iter().map(next).collect::<Result<_>>()?;
    Ok(json!({"anyOf": members}))
}

fn from_intersection(next: Next<'_>, node: &Node<'_>) -> Result<Value> {
    let (left, right) = node.sides()?;
    Ok(json!({"allOf": [next(left)?, next(right)?]}))
}

fn from_disjoint(next: Next<'_>, node: &Node<'_>) -> Result<Value> {
    // Each member is an ordinary object projection; the discriminator
    // property's const and required status flow through that path.
    let members: Vec<Value> = node.members()?.iter().map(next).collect::<Result<_>>()?;
    Ok(json!({"oneOf": members}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl;
    use pretty_assertions::assert_eq;

    fn v(schema: impl Into<Value>) -> Value {
        schema.into()
    }

    fn project(schema: impl Into<Value>) -> Value {
        to_interchange(&schema.into()).unwrap()
    }

    #[test]
    fn primitive_projections() {
        assert_eq!(project(dsl::string()), json!({"type": "string"}));
        assert_eq!(project(dsl::number()), json!({"type": "number"}));
        assert_eq!(project(dsl::boolean()), json!({"type": "boolean"}));
        assert_eq!(project(dsl::null()), json!({"type": "null"}));
        assert_eq!(project(dsl::undefined()), json!({"type": "null"}));
    }

    #[test]
    fn literal_projections() {
        assert_eq!(
            project(dsl::literal(123)),
            json!({"type": "number", "const": 123})
        );
        assert_eq!(
            project(dsl::literal("hey")),
            json!({"type": "string", "const": "hey"})
        );
        assert_eq!(
            project(dsl::literal(false)),
            json!({"type": "boolean", "const": false})
        );
        assert_eq!(
            project(dsl::literal(Value::Null)),
            json!({"type": "null", "const": null})
        );
    }

    #[test]
    fn array_and_tuple_items_differ_in_shape() {
        assert_eq!(
            project(dsl::array(dsl::string())),
            json!({"type": "array", "items": {"type": "string"}})
        );
        assert_eq!(
            project(dsl::tuple([v(dsl::string())])),
            json!({"type": "array", "items": [{"type": "string"}]})
        );
    }

    #[test]
    fn record_projects_only_the_value_schema() {
        assert_eq!(
            project(dsl::record(dsl::string(), dsl::number())),
            json!({"type": "object", "additionalProperties": {"type": "number"}})
        );
    }

    #[test]
    fn object_required_excludes_optional_properties() {
        let schema = dsl::object([
            ("abc", v(dsl::string())),
            ("def", v(dsl::optional(dsl::string()))),
        ]);
        assert_eq!(
            project(schema),
            json!({
                "type": "object",
                "properties": {
                    "abc": {"type": "string"},
                    "def": {"type": "string"},
                },
                "required": ["abc"],
            })
        );
    }

    #[test]
    fn required_looks_at_the_top_level_tag_only() {
        let schema = dsl::object([
            ("a", v(dsl::readonly(dsl::optional(dsl::string())))),
            ("b", v(dsl::optional(dsl::readonly(dsl::string())))),
        ]);
        let doc = project(schema);
        // `a` is wrapped readonly-first, so its top-level tag is not
        // `optional` and it stays required.
        assert_eq!(doc["required"], json!(["a"]));
        assert_eq!(doc["properties"]["a"], json!({"type": "string"}));
        assert_eq!(doc["properties"]["b"], json!({"type": "string"}));
    }

    #[test]
    fn union_projects_to_any_of_in_order() {
        let schema = dsl::union([v(dsl::string()), v(dsl::number()), v(dsl::null())]);
        assert_eq!(
            project(schema),
            json!({"anyOf": [{"type": "string"}, {"type": "number"}, {"type": "null"}]})
        );
    }

    #[test]
    fn intersection_constructor_and_combinator_agree() {
        let obj_a = || dsl::object([("a", v(dsl::string()))]);
        let obj_b = || dsl::object([("b", v(dsl::number()))]);

        let constructed = project(dsl::intersection(obj_a(), obj_b()));
        let combined = project(obj_a().and(obj_b()));

        let expected = json!({"allOf": [
            {"type": "object", "properties": {"a": {"type": "string"}}, "required": ["a"]},
            {"type": "object", "properties": {"b": {"type": "number"}}, "required": ["b"]},
        ]});
        assert_eq!(constructed, expected);
        assert_eq!(combined, expected);
    }

    #[test]
    fn disjoint_projects_to_one_of() {
        let schema = dsl::disjoint(
            "tag",
            [
                v(dsl::object([
                    ("tag", v(dsl::literal("circle"))),
                    ("radius", v(dsl::number())),
                ])),
                v(dsl::object([
                    ("tag", v(dsl::literal("square"))),
                    ("side", v(dsl::optional(dsl::number()))),
                ])),
            ],
        );
        assert_eq!(
            project(schema),
            json!({"oneOf": [
                {
                    "type": "object",
                    "properties": {
                        "tag": {"type": "string", "const": "circle"},
                        "radius": {"type": "number"},
                    },
                    "required": ["tag", "radius"],
                },
                {
                    "type": "object",
                    "properties": {
                        "tag": {"type": "string", "const": "square"},
                        "side": {"type": "number"},
                    },
                    "required": ["tag"],
                },
            ]})
        );
    }

    #[test]
    fn string_format_priority_is_first_match_wins() {
        // Email outranks everything else present.
        let schema = dsl::string().uuid().email().min(1);
        assert_eq!(
            project(schema),
            json!({"type": "string", "format": "email", "minLength": 1})
        );

        // Url renders as uri.
        assert_eq!(
            project(dsl::string().url()),
            json!({"type": "string", "format": "uri"})
        );
    }

    #[test]
    fn ip_format_defaults_to_v4() {
        assert_eq!(
            project(dsl::string().ip(None)),
            json!({"type": "string", "format": "ipv4"})
        );
        assert_eq!(
            project(dsl::string().ip(Some(IpVersion::V6))),
            json!({"type": "string", "format": "ipv6"})
        );
    }

    #[test]
    fn string_length_bounds() {
        assert_eq!(
            project(dsl::string().min(3).max(9)),
            json!({"type": "string", "minLength": 3, "maxLength": 9})
        );
    }

    #[test]
    fn string_pattern_is_explicitly_unimplemented() {
        let err = to_interchange(&v(dsl::string().pattern("^a+$"))).unwrap_err();
        assert!(matches!(err, Error::Unimplemented(_)), "{err:?}");
    }

    #[test]
    fn number_integer_detection() {
        assert_eq!(project(dsl::number().int()), json!({"type": "integer"}));
        assert_eq!(project(dsl::number()), json!({"type": "number"}));
    }

    #[test]
    fn numeric_bounds_respect_inclusivity() {
        assert_eq!(
            project(dsl::number().gt(0.0).lt(10.0)),
            json!({"type": "number", "exclusiveMinimum": 0, "exclusiveMaximum": 10})
        );
        assert_eq!(
            project(dsl::number().min(0.5).max(9.5)),
            json!({"type": "number", "minimum": 0.5, "maximum": 9.5})
        );
        assert_eq!(
            project(dsl::number().int().multiple_of(4.0)),
            json!({"type": "integer", "multipleOf": 4})
        );
    }

    #[test]
    fn bigint_always_projects_to_integer() {
        assert_eq!(project(dsl::bigint()), json!({"type": "integer"}));
        assert_eq!(
            project(dsl::bigint().gt(0).max(1_000_000_000_000_i64)),
            json!({"type": "integer", "exclusiveMinimum": 0, "maximum": 1_000_000_000_000_i64})
        );
    }

    #[test]
    fn wrappers_are_transparent() {
        assert_eq!(
            project(dsl::optional(dsl::string())),
            json!({"type": "string"})
        );
        assert_eq!(
            project(dsl::readonly(dsl::array(dsl::boolean()))),
            json!({"type": "array", "items": {"type": "boolean"}})
        );
    }

    #[test]
    fn unknown_has_no_projection() {
        let err = to_interchange(&v(dsl::unknown())).unwrap_err();
        assert!(matches!(err, Error::UnsupportedInput { .. }), "{err:?}");
    }

    #[test]
    fn unknown_kind_fails_before_any_output() {
        let schema = json!({"kind": "union", "members": [
            {"kind": "string"},
            {"kind": "promise", "inner": {"kind": "string"}},
        ]});
        assert!(matches!(
            to_interchange(&schema),
            Err(Error::UnknownKind { kind, .. }) if kind == "promise"
        ));
    }

    #[test]
    fn deep_composition_round_trip() {
        let schema = dsl::object([
            ("id", v(dsl::string().uuid())),
            ("score", v(dsl::number().int().min(0.0).max(100.0))),
            ("aliases", v(dsl::record(dsl::string(), dsl::string()))),
            (
                "payload",
                v(dsl::union([
                    v(dsl::tuple([v(dsl::literal(1)), v(dsl::boolean())])),
                    v(dsl::null()),
                ])),
            ),
            ("note", v(dsl::optional(dsl::string()))),
        ]);
        assert_eq!(
            project(schema),
            json!({
                "type": "object",
                "properties": {
                    "id": {"type": "string", "format": "uuid"},
                    "score": {"type": "integer", "minimum": 0, "maximum": 100},
                    "aliases": {"type": "object", "additionalProperties": {"type": "string"}},
                    "payload": {"anyOf": [
                        {"type": "array", "items": [
                            {"type": "number", "const": 1},
                            {"type": "boolean"},
                        ]},
                        {"type": "null"},
                    ]},
                    "note": {"type": "string"},
                },
                "required": ["id", "score", "aliases", "payload"],
            })
        );
    }
}
