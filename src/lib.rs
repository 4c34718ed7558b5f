//! Walker/transformer for tree-shaped schema descriptors.
//!
//! A descriptor is a JSON value with a `kind` discriminator drawn from a
//! closed tag set (primitives, literals, wrappers, arrays, tuples, records,
//! objects, unions, intersections, discriminated unions). The core is a
//! generic interpreter: supply handlers for any subset of tags, the rest
//! fall back to identity/passthrough defaults, and composite handlers drive
//! recursion through a continuation bound to the interpreter itself.
//!
//! Two consumers ship on top of the core:
//! - [`reify`]: reduce any descriptor to a compact tagged-tuple value for
//!   structural comparison and snapshotting.
//! - [`to_interchange`]: project a descriptor into an open interchange
//!   schema document (`type` / `properties` / `required` / `anyOf` / ...).
//!
//! ```
//! use schema_osi::{dsl, reify, to_interchange};
//! use serde_json::{Value, json};
//!
//! let schema = Value::from(dsl::object([
//!     ("id", Value::from(dsl::string())),
//!     ("score", Value::from(dsl::number().int())),
//!     ("note", Value::from(dsl::string().optional())),
//! ]));
//!
//! assert_eq!(
//!     reify(&schema)?,
//!     json!(["object", {"id": ["string"], "score": ["number"], "note": ["string"]}]),
//! );
//! assert_eq!(
//!     to_interchange(&schema)?,
//!     json!({
//!         "type": "object",
//!         "properties": {
//!             "id": {"type": "string"},
//!             "score": {"type": "integer"},
//!             "note": {"type": "string"},
//!         },
//!         "required": ["id", "score"],
//!     }),
//! );
//! # Ok::<(), schema_osi::Error>(())
//! ```

pub mod checks;
pub mod dsl;
pub mod error;
pub mod interp;
pub mod node;
pub mod project;
pub mod reify;
pub mod tag;

pub use checks::{BigintCheck, IpVersion, NumberCheck, StringCheck};
pub use error::{Error, Result};
pub use interp::{Handler, Interp, Next, Overrides};
pub use node::{Node, classify};
pub use project::to_interchange;
pub use reify::{WrapperForm, reify, reify_with};
pub use tag::Tag;
