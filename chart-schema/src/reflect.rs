/// Schema reflector: derives the draft document of a root type from its
/// `JsonSchema` implementation. schemars produces the draft 2020-12 shape;
/// this module narrows it to the typed [`Document`], keeping only the
/// structural keywords and failing on anything the patcher cannot model.
use crate::schema::{definition_ref, Additional, Document, InstanceType, Schema, DEFS_PREFIX};
use schemars::generate::SchemaSettings;
use schemars::JsonSchema;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, trace};

#[derive(Debug, thiserror::Error)]
pub enum ReflectError {
    #[error("root type '{type_name}' is not reflected into a named definition")]
    RootNotReference { type_name: String },
    #[error("schema at '{path}' is not an object")]
    NotAnObject { path: String },
    #[error("schema at '{path}' has an invalid '{keyword}' keyword")]
    InvalidKeyword { path: String, keyword: String },
    #[error("schema at '{path}' uses unsupported keyword '{keyword}'")]
    Unsupported { path: String, keyword: String },
    #[error("two different types are named '{name}' (second one reached from '{path}')")]
    DuplicateDefinition { name: String, path: String },
}

/// Keywords that carry no structure and are dropped from the draft.
const ANNOTATIONS: &[&str] = &[
    "$comment",
    "$schema",
    "default",
    "deprecated",
    "description",
    "examples",
    "exclusiveMaximum",
    "exclusiveMinimum",
    "format",
    "maxItems",
    "maxLength",
    "maximum",
    "minItems",
    "minLength",
    "minimum",
    "readOnly",
    "title",
    "uniqueItems",
    "writeOnly",
];

/// Reflect `T` into a draft document whose `$ref` points at the root's
/// definition.
pub fn reflect<T: JsonSchema>() -> Result<Document, ReflectError> {
    let mut generator = SchemaSettings::draft2020_12()
        .with(|s| {
            s.option_add_null_type = false;
            s.option_nullable = false;
            s.meta_schema = None;
        })
        .into_generator();
    let root = generator.subschema_for::<T>();

    let root_name = root
        .get("$ref")
        .and_then(Value::as_str)
        .and_then(|reference| reference.strip_prefix(DEFS_PREFIX))
        .map(str::to_string)
        .ok_or_else(|| ReflectError::RootNotReference {
            type_name: T::schema_name().into_owned(),
        })?;

    let definitions = convert_definitions(generator.definitions())?;
    check_duplicate_names(&definitions)?;
    debug!(
        root = %root_name,
        definitions = definitions.len(),
        "reflected draft document"
    );
    Ok(Document::new(&root_name, definitions))
}

fn convert_definitions(
    definitions: &Map<String, Value>,
) -> Result<BTreeMap<String, Schema>, ReflectError> {
    definitions
        .iter()
        .map(|(name, value)| {
            let schema = convert(value, name)?;
            trace!(
                definition = %name,
                properties = schema.properties.as_ref().map_or(0, BTreeMap::len),
                required = schema.required().len(),
                "reflected definition"
            );
            Ok((name.clone(), schema))
        })
        .collect()
}

/// Convert one schemars node. `path` names the node for error messages:
/// `definition.property`, with `[]` for items and `{}` for map values.
fn convert(value: &Value, path: &str) -> Result<Schema, ReflectError> {
    let object = value.as_object().ok_or_else(|| ReflectError::NotAnObject {
        path: path.to_string(),
    })?;

    let mut schema = Schema::default();
    for (keyword, value) in object {
        let invalid = || ReflectError::InvalidKeyword {
            path: path.to_string(),
            keyword: keyword.clone(),
        };
        match keyword.as_str() {
            "$ref" => {
                let reference = value
                    .as_str()
                    .filter(|r| r.starts_with(DEFS_PREFIX))
                    .ok_or_else(invalid)?;
                schema.reference = Some(reference.to_string());
            }
            "type" => schema.instance_type = Some(instance_type(value).ok_or_else(invalid)?),
            "properties" => {
                let properties = value
                    .as_object()
                    .ok_or_else(invalid)?
                    .iter()
                    .map(|(name, value)| {
                        let schema = convert(value, &format!("{path}.{name}"))?;
                        Ok((name.clone(), schema))
                    })
                    .collect::<Result<BTreeMap<_, _>, ReflectError>>()?;
                schema.properties = Some(properties);
            }
            "required" => {
                let required = value
                    .as_array()
                    .ok_or_else(invalid)?
                    .iter()
                    .map(|name| name.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(invalid)?;
                schema.required = Some(required);
            }
            "items" => {
                schema.items = Some(Box::new(convert(value, &format!("{path}[]"))?));
            }
            "additionalProperties" => {
                schema.additional_properties = Some(match value {
                    Value::Bool(flag) => Additional::Allowed(*flag),
                    _ => Additional::Schema(Box::new(convert(value, &format!("{path}{{}}"))?)),
                });
            }
            k if ANNOTATIONS.contains(&k) => {}
            _ => {
                return Err(ReflectError::Unsupported {
                    path: path.to_string(),
                    keyword: keyword.clone(),
                })
            }
        }
    }

    if schema.is_object() && schema.additional_properties.is_none() {
        // Structs without deny_unknown_fields are closed all the same
        schema.additional_properties = Some(Additional::Allowed(false));
    }
    if schema.properties.as_ref().is_some_and(BTreeMap::is_empty) {
        schema.properties = None;
    }
    if schema.required.as_ref().is_some_and(Vec::is_empty) {
        schema.required = None;
    }
    Ok(schema)
}

/// `"string"`, or a list holding one type besides `"null"`.
fn instance_type(value: &Value) -> Option<InstanceType> {
    match value {
        Value::String(_) => serde_json::from_value(value.clone()).ok(),
        Value::Array(types) => {
            let mut rest = types.iter().filter(|t| t.as_str() != Some("null"));
            match (rest.next(), rest.next()) {
                (Some(only), None) => instance_type(only),
                _ => None,
            }
        }
        _ => None,
    }
}

/// schemars keeps a name clash apart by numbering the later type
/// (`Status`, `Status2`). Definition names are the patch rule targets, so a
/// numbered twin is an error rather than a new definition.
fn check_duplicate_names(definitions: &BTreeMap<String, Schema>) -> Result<(), ReflectError> {
    for name in definitions.keys() {
        let base = name.trim_end_matches(|c: char| c.is_ascii_digit());
        let numbered = name[base.len()..].parse::<u32>().is_ok_and(|n| n >= 2);
        if base.is_empty() || !numbered || !definitions.contains_key(base) {
            continue;
        }
        return Err(ReflectError::DuplicateDefinition {
            name: base.to_string(),
            path: referrer(definitions, name).unwrap_or_else(|| name.clone()),
        });
    }
    Ok(())
}

/// First `definition.property` whose schema refers to `name`.
fn referrer(definitions: &BTreeMap<String, Schema>, name: &str) -> Option<String> {
    let target = definition_ref(name);
    definitions.iter().find_map(|(owner, schema)| {
        schema
            .properties
            .iter()
            .flatten()
            .find(|(_, property)| property.refs().contains(&target.as_str()))
            .map(|(property, _)| format!("{owner}.{property}"))
    })
}
