/// Schema patcher: applies declarative edits to named definitions of a
/// draft document. Every edit overwrites, so applying a rule list twice
/// yields the same document as applying it once.
use crate::schema::{Additional, Document, InstanceType, Schema};
use std::fmt;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("rule '{rule}' targets missing definition '{target}'")]
    MissingDefinition { rule: String, target: String },
    #[error("definition '{target}' should be of type {expected}, found {found}")]
    UnexpectedShape {
        target: String,
        expected: InstanceType,
        found: String,
    },
    #[error("definition '{target}' has no property '{property}'")]
    MissingProperty { target: String, property: String },
    #[error("reference '{reference}' does not resolve to a definition")]
    DanglingRef { reference: String },
}

/// Schema keywords a rule may remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Properties,
    Required,
    Items,
}

impl Keyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Properties => "properties",
            Keyword::Required => "required",
            Keyword::Items => "items",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// Overwrite `type`.
    SetType(InstanceType),
    /// Remove a keyword; a no-op when it is already absent.
    Drop(Keyword),
    /// Overwrite `additionalProperties` with a flag. Object definitions only.
    SetAdditionalProperties(bool),
    /// Replace `required` verbatim, discarding whatever was reflected.
    /// Every name must be a property of the definition.
    SetRequired(&'static [&'static str]),
}

/// One edit against one named definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub target: &'static str,
    pub edit: Edit,
}

impl Rule {
    pub const fn new(target: &'static str, edit: Edit) -> Self {
        Self { target, edit }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.edit {
            Edit::SetType(t) => write!(f, "{}.type = {t}", self.target),
            Edit::Drop(kw) => write!(f, "{}.{} dropped", self.target, kw.as_str()),
            Edit::SetAdditionalProperties(flag) => {
                write!(f, "{}.additionalProperties = {flag}", self.target)
            }
            Edit::SetRequired(names) => {
                write!(f, "{}.required = [{}]", self.target, names.join(", "))
            }
        }
    }
}

/// Apply `rules` in order, then check that every `$ref` still resolves.
pub fn patch(mut document: Document, rules: &[Rule]) -> Result<Document, PatchError> {
    for rule in rules {
        apply(&mut document, rule)?;
    }
    if let Some(reference) = document.dangling_refs().into_iter().next() {
        return Err(PatchError::DanglingRef { reference });
    }
    Ok(document)
}

/// Apply a single rule to its target definition.
pub fn apply(document: &mut Document, rule: &Rule) -> Result<(), PatchError> {
    let schema = document
        .definition_mut(rule.target)
        .ok_or_else(|| PatchError::MissingDefinition {
            rule: rule.to_string(),
            target: rule.target.to_string(),
        })?;

    match &rule.edit {
        Edit::SetType(instance_type) => {
            schema.instance_type = Some(*instance_type);
        }
        Edit::Drop(keyword) => match keyword {
            Keyword::Properties => schema.properties = None,
            Keyword::Required => schema.required = None,
            Keyword::Items => schema.items = None,
        },
        Edit::SetAdditionalProperties(flag) => {
            expect_object(rule.target, schema)?;
            schema.additional_properties = Some(Additional::Allowed(*flag));
        }
        Edit::SetRequired(names) => {
            expect_object(rule.target, schema)?;
            if let Some(missing) = names.iter().find(|name| !schema.has_property(name)) {
                return Err(PatchError::MissingProperty {
                    target: rule.target.to_string(),
                    property: (*missing).to_string(),
                });
            }
            schema.required = (!names.is_empty())
                .then(|| names.iter().map(|name| (*name).to_string()).collect());
        }
    }

    debug!(rule = %rule, "applied patch rule");
    Ok(())
}

fn expect_object(target: &str, schema: &Schema) -> Result<(), PatchError> {
    if schema.is_object() {
        return Ok(());
    }
    Err(PatchError::UnexpectedShape {
        target: target.to_string(),
        expected: InstanceType::Object,
        found: schema
            .instance_type
            .map(|t| t.as_str().to_string())
            .unwrap_or_else(|| "no type".to_string()),
    })
}
