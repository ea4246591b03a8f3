//! Schema types and the schema JSON codec

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::attribute::Attribute;
use crate::checksum::Checksum;
use crate::config::DecodeConfig;
use crate::error::{Result, SchemaError};

/// Top-level field names of the wire format
pub const SCHEMA_FIELDS: [&str; 4] = ["id", "name", "description", "attributes"];

/// A named, identified, ordered collection of attributes
///
/// Fields are fixed at construction or decode time; there are no mutators.
/// The JSON form is an object with exactly the fields listed in
/// [`SCHEMA_FIELDS`], with `attributes` kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    attributes: Vec<Attribute>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Attribute>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Attribute>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Schema {
    /// Create a new schema
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        attributes: Vec<Attribute>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            attributes,
        }
    }

    /// Start building a schema with the given id
    pub fn builder(id: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable text that describes the schema
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Invoke `visit` once per attribute, in insertion order
    pub fn for_each_attribute<F>(&self, mut visit: F)
    where
        F: FnMut(&Attribute),
    {
        for attr in &self.attributes {
            visit(attr);
        }
    }

    /// Attributes in insertion order
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Find a top-level attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Encode to compact JSON bytes
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(SchemaError::Encode)
    }

    /// Encode to indented JSON text
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(SchemaError::Encode)
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(SchemaError::Encode)
    }

    /// Decode from JSON bytes, ignoring unknown fields
    pub fn from_json(raw: &[u8]) -> Result<Self> {
        serde_json::from_slice(raw).map_err(SchemaError::Decode)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(SchemaError::Decode)
    }

    /// Decode from JSON bytes under the given decode settings
    pub fn decode_with(raw: &[u8], config: &DecodeConfig) -> Result<Self> {
        if !config.deny_unknown_fields {
            return Self::from_json(raw);
        }

        let value: serde_json::Value = serde_json::from_slice(raw).map_err(SchemaError::Decode)?;
        if let Some(object) = value.as_object() {
            if let Some(field) = object.keys().find(|k| !SCHEMA_FIELDS.contains(&k.as_str())) {
                return Err(SchemaError::UnknownField { field: field.clone() });
            }
        }
        Self::from_value(value)
    }

    /// Compute the checksum of the compact encoding
    pub fn checksum(&self) -> Result<Checksum> {
        Ok(Checksum::from_bytes(&self.to_json()?))
    }
}

impl FromStr for Schema {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_json(s.as_bytes())
    }
}

/// Builder for [`Schema`]
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    id: String,
    name: String,
    description: String,
    attributes: Vec<Attribute>,
}

impl SchemaBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append an attribute after those already added
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attributes(mut self, attributes: impl IntoIterator<Item = Attribute>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    pub fn build(self) -> Schema {
        Schema::new(self.id, self.name, self.description, self.attributes)
    }
}
