//! Canonicalizer: reduce any descriptor to a compact tagged-tuple value.
//!
//! The canonical form is a plain JSON structure `[TAG, ...payload]`, ordered
//! and directly serializable. Deep equality of two canonical values means
//! the source schemas are structurally equivalent for every tag the walker
//! understands. The mapping is one way: canonical values do not convert back
//! into descriptors.

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::error::Result;
use crate::interp::{Interp, Next, Overrides};
use crate::node::{Node, classify};
use crate::tag::Tag;

/// How `optional` and `readonly` render in canonical output.
///
/// Two historical renderings exist and downstream consumers disagree on
/// which one they compare against, so both are kept selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapperForm {
    /// Wrappers vanish: the canonical form of a wrapped node is the
    /// canonical form of its inner node. Only structural content survives.
    #[default]
    Transparent,
    /// Wrappers keep their own tag: `[TAG, inner]`.
    Tagged,
}

/// Canonicalize with the default wrapper form.
pub fn reify(schema: &Value) -> Result<Value> {
    reify_with(WrapperForm::default(), schema)
}

/// Canonicalize, choosing how wrappers are rendered.
pub fn reify_with(form: WrapperForm, schema: &Value) -> Result<Value> {
    debug!(?form, "reify");
    interp(form).run(schema)
}

fn leaf(_: Next<'_>, node: &Node<'_>) -> Result<Value> {
    Ok(json!([node.tag().kind()]))
}

fn wrapper(form: WrapperForm, next: Next<'_>, node: &Node<'_>) -> Result<Value> {
    let inner = next(node.inner()?)?;
    Ok(match form {
        WrapperForm::Transparent => inner,
        WrapperForm::Tagged => json!([node.tag().kind(), inner]),
    })
}

/// Every tag is overridden: canonicalization has no use for the identity
/// fallbacks.
fn interp(form: WrapperForm) -> Interp {
    let mut ov = Overrides::new();
    for tag in Tag::ALL.into_iter().filter(|t| t.is_leaf()) {
        ov = ov.on(tag, leaf);
    }
    ov = ov
        .on(Tag::Literal, |_, node| {
            Ok(json!([node.tag().kind(), node.literal_value()?]))
        })
        .on(Tag::Optional, move |next, node| wrapper(form, next, node))
        .on(Tag::Readonly, move |next, node| wrapper(form, next, node))
        .on(Tag::Array, |next, node| {
            Ok(json!([node.tag().kind(), next(node.element()?)?]))
        })
        .on(Tag::Tuple, |next, node| {
            let items: Vec<Value> = node.items()?.iter().map(next).collect::<Result<_>>()?;
            Ok(json!([node.tag().kind(), items]))
        })
        .on(Tag::Object, |next, node| {
            let mut props = Map::new();
            for (name, prop) in node.shape()? {
                props.insert(name.clone(), next(prop)?);
            }
            Ok(json!([node.tag().kind(), props]))
        })
        .on(Tag::Union, |next, node| {
            let members: Vec<Value> = node.members()?.iter().map(next).collect::<Result<_>>()?;
            Ok(json!([node.tag().kind(), members]))
        })
        .on(Tag::Intersection, |next, node| {
            let (left, right) = node.sides()?;
            Ok(json!([node.tag().kind(), [next(left)?, next(right)?]]))
        })
        .on(Tag::Record, |next, node| {
            let (key, value) = node.entry()?;
            // The key contributes only its tag, not a full canonical form.
            Ok(json!([node.tag().kind(), classify(key)?.kind(), next(value)?]))
        })
        .on(Tag::Disjoint, |next, node| {
            let members: Vec<Value> = node.members()?.iter().map(next).collect::<Result<_>>()?;
            Ok(json!([node.tag().kind(), node.discriminator()?, members]))
        });
    Interp::new(ov)
}
