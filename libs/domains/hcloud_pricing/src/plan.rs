//! Terraform plan model.
//!
//! Only the subset of `terraform show -json` output needed for pricing is
//! modelled. Unknown fields are ignored and a missing `resource_changes`
//! array yields an empty plan.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use strum::{Display, EnumString};

use crate::error::{PlanError, PricingError, PricingResult};

/// Resource attributes after (or before) a change
pub type Attributes = Map<String, Value>;

/// Planned operation on a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(from = "String", into = "String")]
#[strum(serialize_all = "kebab-case")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    NoOp,
    #[strum(default)]
    Other(String),
}

impl From<String> for Action {
    fn from(raw: String) -> Self {
        Action::from_str(&raw).unwrap_or(Action::Other(raw))
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        match action {
            Action::Other(raw) => raw,
            known => known.to_string(),
        }
    }
}

impl Action {
    /// Whether the action produces state that costs money
    pub fn is_priced(&self) -> bool {
        matches!(self, Action::Create | Action::Update)
    }
}

/// A parsed plan document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource_changes: Vec<ResourceChange>,
}

/// One entry of the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceChange {
    pub address: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(default)]
    pub change: Change,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Change {
    #[serde(default, deserialize_with = "null_as_default")]
    pub actions: Vec<Action>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub before: Attributes,
    #[serde(default, deserialize_with = "null_as_default")]
    pub after: Attributes,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Plan {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PlanError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PlanError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read and parse a plan file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PlanError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| PlanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(&bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.resource_changes.is_empty()
    }
}

impl ResourceChange {
    /// True when at least one action is a create or an update.
    ///
    /// No-op, read and delete-only changes cost nothing new.
    pub fn is_priceable_change(&self) -> bool {
        self.change.actions.iter().any(Action::is_priced)
    }

    pub fn after(&self) -> &Attributes {
        &self.change.after
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Look up a string attribute that must be present and non-empty
pub fn required_str<'a>(attributes: &'a Attributes, key: &'static str) -> PricingResult<&'a str> {
    match optional_str(attributes, key)? {
        Some(value) => Ok(value),
        None => Err(PricingError::MissingAttribute(key)),
    }
}

/// Look up a string attribute; absent, null and empty values are `None`
pub fn optional_str<'a>(
    attributes: &'a Attributes,
    key: &'static str,
) -> PricingResult<Option<&'a str>> {
    match attributes.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(PricingError::InvalidAttribute {
            name: key,
            expected: "string",
            found: json_type_name(other),
        }),
    }
}
