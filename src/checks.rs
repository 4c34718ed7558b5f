//! Refinement-check payloads carried by `string`, `number`, and `bigint`
//! descriptors under their `checks` key.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Version selector on the `ip` check. Absent means v4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpVersion {
    V4,
    V6,
}

/// String refinements.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum StringCheck {
    Email,
    Url,
    Uuid,
    Datetime,
    Date,
    Time,
    Duration,
    Ip {
        #[serde(default)]
        version: Option<IpVersion>,
    },
    Min {
        value: u64,
    },
    Max {
        value: u64,
    },
    Pattern {
        pattern: String,
    },
}

/// Number refinements. Exclusive bounds arrive as `inclusive: false`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum NumberCheck {
    Int,
    Min { value: f64, inclusive: bool },
    Max { value: f64, inclusive: bool },
    MultipleOf { value: f64 },
}

/// Bigint refinements. Values stay integers end to end.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum BigintCheck {
    Min { value: i64, inclusive: bool },
    Max { value: i64, inclusive: bool },
    MultipleOf { value: i64 },
}

/// Deserialize one check list. A check that fails to deserialize is a shape
/// mismatch on the owning descriptor, reported with the path to the bad
/// element.
pub fn parse_checks<T: serde::de::DeserializeOwned>(owner: &Value, checks: &[Value]) -> Result<Vec<T>> {
    checks
        .iter()
        .map(|check| {
            serde_path_to_error::deserialize(check).map_err(|err| {
                let path = err.path().to_string();
                Error::shape(
                    format!("a recognized refinement check ({} at `{path}`)", err.into_inner()),
                    owner,
                )
            })
        })
        .collect()
}
