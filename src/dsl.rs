//! Descriptor constructors.
//!
//! Builds the wire-format values the walker consumes, mirroring the surface
//! a schema-definition library would expose. Everything here is a pure
//! value constructor; validation happens at classification time, not here.

use indexmap::IndexMap;
use serde_json::{Value, json};

use crate::checks::IpVersion;

/// A built descriptor. Convert into the wire `Value` with `Into`.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema(Value);

impl From<Schema> for Value {
    fn from(schema: Schema) -> Value {
        schema.0
    }
}

impl Schema {
    /// Wrap in `optional`.
    pub fn optional(self) -> Schema {
        optional(self)
    }

    /// Wrap in `readonly`.
    pub fn readonly(self) -> Schema {
        readonly(self)
    }

    /// Intersection combinator.
    pub fn and(self, other: impl Into<Value>) -> Schema {
        intersection(self, other)
    }

    /// Two-member union combinator.
    pub fn or(self, other: impl Into<Value>) -> Schema {
        Schema(json!({"kind": "union", "members": [self.0, other.into()]}))
    }

    /// The wire value, without consuming the builder.
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

// ------------------------------- leaves ----------------------------------- //

pub fn null() -> Schema {
    Schema(json!({"kind": "null"}))
}

pub fn undefined() -> Schema {
    Schema(json!({"kind": "undefined"}))
}

pub fn boolean() -> Schema {
    Schema(json!({"kind": "boolean"}))
}

pub fn unknown() -> Schema {
    Schema(json!({"kind": "unknown"}))
}

/// A literal scalar. Non-scalar values are representable here but rejected
/// at classification time.
pub fn literal(value: impl Into<Value>) -> Schema {
    Schema(json!({"kind": "literal", "value": value.into()}))
}

// ----------------------------- composites --------------------------------- //

pub fn optional(inner: impl Into<Value>) -> Schema {
    Schema(json!({"kind": "optional", "inner": inner.into()}))
}

pub fn readonly(inner: impl Into<Value>) -> Schema {
    Schema(json!({"kind": "readonly", "inner": inner.into()}))
}

pub fn array(element: impl Into<Value>) -> Schema {
    Schema(json!({"kind": "array", "element": element.into()}))
}

pub fn tuple(items: impl IntoIterator<Item = Value>) -> Schema {
    let items: Vec<Value> = items.into_iter().collect();
    Schema(json!({"kind": "tuple", "items": items}))
}

pub fn record(key: impl Into<Value>, value: impl Into<Value>) -> Schema {
    Schema(json!({"kind": "record", "key": key.into(), "value": value.into()}))
}

/// Property order is kept as given.
pub fn object<K: Into<String>>(props: impl IntoIterator<Item = (K, Value)>) -> Schema {
    let shape: IndexMap<String, Value> =
        props.into_iter().map(|(k, v)| (k.into(), v)).collect();
    Schema(json!({"kind": "object", "shape": shape}))
}

pub fn union(members: impl IntoIterator<Item = Value>) -> Schema {
    let members: Vec<Value> = members.into_iter().collect();
    Schema(json!({"kind": "union", "members": members}))
}

pub fn intersection(left: impl Into<Value>, right: impl Into<Value>) -> Schema {
    Schema(json!({"kind": "intersection", "left": left.into(), "right": right.into()}))
}

pub fn disjoint(
    discriminator: impl Into<String>,
    members: impl IntoIterator<Item = Value>,
) -> Schema {
    let members: Vec<Value> = members.into_iter().collect();
    Schema(json!({
        "kind": "disjoint",
        "discriminator": discriminator.into(),
        "members": members,
    }))
}

// ------------------------- refined scalar builders ------------------------ //

pub fn string() -> StringSchema {
    StringSchema { checks: Vec::new() }
}

pub fn number() -> NumberSchema {
    NumberSchema { checks: Vec::new() }
}

pub fn bigint() -> BigintSchema {
    BigintSchema { checks: Vec::new() }
}

fn refined(kind: &str, checks: Vec<Value>) -> Value {
    if checks.is_empty() {
        json!({"kind": kind})
    } else {
        json!({"kind": kind, "checks": checks})
    }
}

/// `string` with accumulated refinement checks, in call order.
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    checks: Vec<Value>,
}

impl StringSchema {
    fn check(mut self, check: Value) -> Self {
        self.checks.push(check);
        self
    }

    pub fn email(self) -> Self {
        self.check(json!({"check": "email"}))
    }

    pub fn url(self) -> Self {
        self.check(json!({"check": "url"}))
    }

    pub fn uuid(self) -> Self {
        self.check(json!({"check": "uuid"}))
    }

    pub fn datetime(self) -> Self {
        self.check(json!({"check": "datetime"}))
    }

    pub fn date(self) -> Self {
        self.check(json!({"check": "date"}))
    }

    pub fn time(self) -> Self {
        self.check(json!({"check": "time"}))
    }

    pub fn duration(self) -> Self {
        self.check(json!({"check": "duration"}))
    }

    pub fn ip(self, version: Option<IpVersion>) -> Self {
        match version {
            None => self.check(json!({"check": "ip"})),
            Some(IpVersion::V4) => self.check(json!({"check": "ip", "version": "v4"})),
            Some(IpVersion::V6) => self.check(json!({"check": "ip", "version": "v6"})),
        }
    }

    pub fn min(self, value: u64) -> Self {
        self.check(json!({"check": "min", "value": value}))
    }

    pub fn max(self, value: u64) -> Self {
        self.check(json!({"check": "max", "value": value}))
    }

    pub fn pattern(self, pattern: impl Into<String>) -> Self {
        self.check(json!({"check": "pattern", "pattern": pattern.into()}))
    }

    pub fn schema(self) -> Schema {
        Schema(self.into())
    }

    pub fn optional(self) -> Schema {
        self.schema().optional()
    }

    pub fn readonly(self) -> Schema {
        self.schema().readonly()
    }

    pub fn and(self, other: impl Into<Value>) -> Schema {
        self.schema().and(other)
    }

    pub fn or(self, other: impl Into<Value>) -> Schema {
        self.schema().or(other)
    }
}

impl From<StringSchema> for Value {
    fn from(s: StringSchema) -> Value {
        refined("string", s.checks)
    }
}

/// `number` with accumulated refinement checks, in call order.
#[derive(Debug, Clone, Default)]
pub struct NumberSchema {
    checks: Vec<Value>,
}

impl NumberSchema {
    fn check(mut self, check: Value) -> Self {
        self.checks.push(check);
        self
    }

    pub fn int(self) -> Self {
        self.check(json!({"check": "int"}))
    }

    /// Inclusive lower bound.
    pub fn min(self, value: f64) -> Self {
        self.check(json!({"check": "min", "value": value, "inclusive": true}))
    }

    /// Inclusive upper bound.
    pub fn max(self, value: f64) -> Self {
        self.check(json!({"check": "max", "value": value, "inclusive": true}))
    }

    /// Exclusive lower bound.
    pub fn gt(self, value: f64) -> Self {
        self.check(json!({"check": "min", "value": value, "inclusive": false}))
    }

    /// Exclusive upper bound.
    pub fn lt(self, value: f64) -> Self {
        self.check(json!({"check": "max", "value": value, "inclusive": false}))
    }

    pub fn multiple_of(self, value: f64) -> Self {
        self.check(json!({"check": "multiple_of", "value": value}))
    }

    pub fn schema(self) -> Schema {
        Schema(self.into())
    }

    pub fn optional(self) -> Schema {
        self.schema().optional()
    }

    pub fn readonly(self) -> Schema {
        self.schema().readonly()
    }

    pub fn and(self, other: impl Into<Value>) -> Schema {
        self.schema().and(other)
    }

    pub fn or(self, other: impl Into<Value>) -> Schema {
        self.schema().or(other)
    }
}

impl From<NumberSchema> for Value {
    fn from(s: NumberSchema) -> Value {
        refined("number", s.checks)
    }
}

/// `bigint` with accumulated refinement checks, in call order.
#[derive(Debug, Clone, Default)]
pub struct BigintSchema {
    checks: Vec<Value>,
}

impl BigintSchema {
    fn check(mut self, check: Value) -> Self {
        self.checks.push(check);
        self
    }

    /// Inclusive lower bound.
    pub fn min(self, value: i64) -> Self {
        self.check(json!({"check": "min", "value": value, "inclusive": true}))
    }

    /// Inclusive upper bound.
    pub fn max(self, value: i64) -> Self {
        self.check(json!({"check": "max", "value": value, "inclusive": true}))
    }

    /// Exclusive lower bound.
    pub fn gt(self, value: i64) -> Self {
        self.check(json!({"check": "min", "value": value, "inclusive": false}))
    }

    /// Exclusive upper bound.
    pub fn lt(self, value: i64) -> Self {
        self.check(json!({"check": "max", "value": value, "inclusive": false}))
    }

    pub fn multiple_of(self, value: i64) -> Self {
        self.check(json!({"check": "multiple_of", "value": value}))
    }

    pub fn schema(self) -> Schema {
        Schema(self.into())
    }

    pub fn optional(self) -> Schema {
        self.schema().optional()
    }

    pub fn readonly(self) -> Schema {
        self.schema().readonly()
    }

    pub fn and(self, other: impl Into<Value>) -> Schema {
        self.schema().and(other)
    }

    pub fn or(self, other: impl Into<Value>) -> Schema {
        self.schema().or(other)
    }
}

impl From<BigintSchema> for Value {
    fn from(s: BigintSchema) -> Value {
        refined("bigint", s.checks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn leaves_build_bare_descriptors() {
        assert_eq!(Value::from(null()), json!({"kind": "null"}));
        assert_eq!(Value::from(string()), json!({"kind": "string"}));
        assert_eq!(Value::from(bigint()), json!({"kind": "bigint"}));
    }

    #[test]
    fn checks_accumulate_in_call_order() {
        assert_eq!(
            Value::from(string().email().min(1).max(5)),
            json!({"kind": "string", "checks": [
                {"check": "email"},
                {"check": "min", "value": 1},
                {"check": "max", "value": 5},
            ]})
        );
        assert_eq!(
            Value::from(number().int().gt(0.0)),
            json!({"kind": "number", "checks": [
                {"check": "int"},
                {"check": "min", "value": 0.0, "inclusive": false},
            ]})
        );
    }

    #[test]
    fn combinators_match_their_constructors() {
        let a = || object([("a", Value::from(string()))]);
        let b = || object([("b", Value::from(number()))]);
        assert_eq!(
            Value::from(a().and(b())),
            Value::from(intersection(a(), b()))
        );
        assert_eq!(
            Value::from(string().or(number())),
            Value::from(union([Value::from(string()), Value::from(number())]))
        );
    }

    #[test]
    fn object_shape_keeps_caller_order() {
        let schema = Value::from(object([
            ("zz", Value::from(string())),
            ("aa", Value::from(number())),
        ]));
        let names: Vec<&String> = schema["shape"].as_object().unwrap().keys().collect();
        assert_eq!(names, ["zz", "aa"]);
    }

    #[test]
    fn wrappers_nest() {
        assert_eq!(
            Value::from(string().optional()),
            json!({"kind": "optional", "inner": {"kind": "string"}})
        );
        assert_eq!(
            Value::from(readonly(optional(boolean()))),
            json!({"kind": "readonly", "inner": {"kind": "optional", "inner": {"kind": "boolean"}}})
        );
    }
}
