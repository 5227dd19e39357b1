/// Typed JSON Schema document produced by the reflector and edited by the
/// patcher. Only the keywords this tool emits are modeled; field order on
/// the structs is the key order of the serialized output.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Dialect URI written to `$schema`.
pub const DRAFT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";

/// Prefix of every reference into the definitions dictionary.
pub const DEFS_PREFIX: &str = "#/$defs/";

/// Builds the `$ref` string pointing at a named definition.
pub fn definition_ref(name: &str) -> String {
    format!("{DEFS_PREFIX}{name}")
}

/// Extracts the definition name from a `$ref` string, if it points into
/// the definitions dictionary.
pub fn ref_target(reference: &str) -> Option<&str> {
    reference.strip_prefix(DEFS_PREFIX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceType {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
}

impl InstanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceType::Object => "object",
            InstanceType::Array => "array",
            InstanceType::String => "string",
            InstanceType::Integer => "integer",
            InstanceType::Number => "number",
            InstanceType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of `additionalProperties`: a flag for structs, a value schema for
/// maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Additional {
    Allowed(bool),
    Schema(Box<Schema>),
}

/// One schema node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(
        rename = "additionalProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<Additional>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Schema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<InstanceType>,
}

impl Schema {
    /// `{"$ref": "#/$defs/<name>"}`
    pub fn reference(name: &str) -> Self {
        Self {
            reference: Some(definition_ref(name)),
            ..Self::default()
        }
    }

    pub fn scalar(instance_type: InstanceType) -> Self {
        Self {
            instance_type: Some(instance_type),
            ..Self::default()
        }
    }

    pub fn array(items: Schema) -> Self {
        Self {
            instance_type: Some(InstanceType::Array),
            items: Some(Box::new(items)),
            ..Self::default()
        }
    }

    /// Object with free-form keys and a uniform value schema.
    pub fn map(values: Schema) -> Self {
        Self {
            instance_type: Some(InstanceType::Object),
            additional_properties: Some(Additional::Schema(Box::new(values))),
            ..Self::default()
        }
    }

    /// Closed object. Empty `properties` and `required` are left out.
    pub fn object(properties: BTreeMap<String, Schema>, required: Vec<String>) -> Self {
        Self {
            instance_type: Some(InstanceType::Object),
            additional_properties: Some(Additional::Allowed(false)),
            properties: (!properties.is_empty()).then_some(properties),
            required: (!required.is_empty()).then_some(required),
            ..Self::default()
        }
    }

    pub fn is_object(&self) -> bool {
        self.instance_type == Some(InstanceType::Object)
    }

    pub fn property(&self, name: &str) -> Option<&Schema> {
        self.properties.as_ref().and_then(|p| p.get(name))
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    pub fn required(&self) -> &[String] {
        self.required.as_deref().unwrap_or_default()
    }

    /// `Some(flag)` when `additionalProperties` is a plain boolean.
    pub fn allows_additional(&self) -> Option<bool> {
        match self.additional_properties {
            Some(Additional::Allowed(flag)) => Some(flag),
            _ => None,
        }
    }

    /// Every `$ref` inside this schema, in keyword order.
    pub fn refs(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_refs(&mut out);
        out
    }

    fn collect_refs<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(reference) = &self.reference {
            out.push(reference);
        }
        if let Some(Additional::Schema(values)) = &self.additional_properties {
            values.collect_refs(out);
        }
        if let Some(items) = &self.items {
            items.collect_refs(out);
        }
        if let Some(properties) = &self.properties {
            for schema in properties.values() {
                schema.collect_refs(out);
            }
        }
    }
}

/// A complete document: definitions plus a root reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    #[serde(rename = "$defs")]
    pub definitions: BTreeMap<String, Schema>,
    #[serde(rename = "$ref")]
    pub root: String,
    #[serde(rename = "$schema")]
    pub dialect: String,
}

impl Document {
    pub fn new(root: &str, definitions: BTreeMap<String, Schema>) -> Self {
        Self {
            definitions,
            root: definition_ref(root),
            dialect: DRAFT_2020_12.to_string(),
        }
    }

    pub fn definition(&self, name: &str) -> Option<&Schema> {
        self.definitions.get(name)
    }

    pub fn definition_mut(&mut self, name: &str) -> Option<&mut Schema> {
        self.definitions.get_mut(name)
    }

    /// Name of the definition the root refers to.
    pub fn root_name(&self) -> Option<&str> {
        ref_target(&self.root)
    }

    /// Every `$ref` in the document, the root reference first.
    pub fn refs(&self) -> Vec<&str> {
        let mut out = vec![self.root.as_str()];
        for schema in self.definitions.values() {
            schema.collect_refs(&mut out);
        }
        out
    }

    /// References that do not resolve to a key in `definitions`, sorted
    /// and deduplicated.
    pub fn dangling_refs(&self) -> Vec<String> {
        let mut dangling: Vec<String> = self
            .refs()
            .into_iter()
            .filter(|r| {
                ref_target(r)
                    .map(|name| !self.definitions.contains_key(name))
                    .unwrap_or(true)
            })
            .map(str::to_string)
            .collect();
        dangling.sort();
        dangling.dedup();
        dangling
    }
}
