//! Resource change records.
//!
//! The plan engine produces one change record per resource instance. Records
//! travel as raw JSON envelopes and are decoded one at a time, so a single
//! malformed record can be reported and skipped without rejecting the rest.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::value::AttrMap;

/// Instance key used for resources declared without `count` or `for_each`.
pub const SINGLETON_KEY: &str = "0";

/// Planned action for a resource instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Nothing to do.
    NoOp,
    /// Create a new object.
    Create,
    /// Read a data source.
    Read,
    /// Update an object in place.
    Update,
    /// Replace, destroying the old object first.
    DeleteThenCreate,
    /// Replace, creating the new object first.
    CreateThenDelete,
    /// Destroy an object.
    Delete,
}

impl Action {
    /// Returns the label used in output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoOp => "no-op",
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::DeleteThenCreate => "delete-then-create",
            Self::CreateThenDelete => "create-then-delete",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Key distinguishing instances of a repeated resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InstanceKey {
    /// Index from `count`.
    Int(i64),
    /// Key from `for_each`.
    Str(String),
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "[{i}]"),
            Self::Str(s) => write!(f, "[{s:?}]"),
        }
    }
}

/// A decoded change record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResourceChange {
    /// Address of the resource the record belongs to.
    pub address: String,
    /// Instance key, if the resource is repeated.
    #[serde(default)]
    pub index: Option<InstanceKey>,
    /// Planned action.
    pub action: Action,
    /// Attributes before the change; `None` when the object does not exist yet.
    #[serde(default)]
    pub before: Option<AttrMap>,
    /// Attributes after the change; `None` when the object is going away.
    #[serde(default)]
    pub after: Option<AttrMap>,
}

impl ResourceChange {
    /// Resolves the instance key to its output form.
    #[must_use]
    pub fn instance_key(&self) -> String {
        self.index
            .as_ref()
            .map_or_else(|| SINGLETON_KEY.to_string(), ToString::to_string)
    }
}

/// A change record that has not been decoded yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeEnvelope(serde_json::Value);

/// Why an envelope could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    /// Address found in the envelope, if any.
    pub address: Option<String>,
    /// Decoder message.
    pub message: String,
}

impl ChangeEnvelope {
    /// Wraps a raw JSON record.
    #[must_use]
    pub const fn new(raw: serde_json::Value) -> Self {
        Self(raw)
    }

    /// Decodes the record.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the record does not have the expected shape.
    pub fn decode(&self) -> std::result::Result<ResourceChange, DecodeError> {
        ResourceChange::deserialize(&self.0).map_err(|e| DecodeError {
            address: self
                .0
                .get("address")
                .and_then(serde_json::Value::as_str)
                .map(String::from),
            message: e.to_string(),
        })
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.address {
            Some(address) => write!(f, "{address}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}
