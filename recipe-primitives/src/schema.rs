//! Declarative shape descriptions for flow inputs and model outputs.
//!
//! A [`Schema`] is both the contract handed to a generative backend (via
//! [`Schema::to_json_schema`]) and the routine that checks a returned value
//! (via [`Schema::check`]) before it is decoded into a typed record.

use serde_json::{Map, Value, json};

use crate::error::SchemaViolation;

/// The shape of a single value.
#[derive(Clone, Debug, PartialEq)]
pub enum SchemaKind {
    /// UTF-8 string.
    String,
    /// Whole number with an optional inclusive lower bound.
    Integer {
        /// Smallest accepted value.
        minimum: Option<i64>,
    },
    /// Any JSON number.
    Number,
    /// `true` or `false`.
    Boolean,
    /// String restricted to the listed values.
    Enum(Vec<String>),
    /// Homogeneous list.
    Array(Box<Schema>),
    /// Record with named fields.
    Object(Vec<Field>),
    /// Value matching at least one of the alternatives.
    AnyOf(Vec<Schema>),
}

/// Immutable description of an expected JSON value.
#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    kind: SchemaKind,
    description: Option<String>,
    non_empty: bool,
}

/// Named member of an object schema.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    name: String,
    schema: Schema,
    required: bool,
}

impl Field {
    /// Declares a field that must be present (and not `null`).
    #[must_use]
    pub fn required(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            required: true,
        }
    }

    /// Declares a field that may be absent or `null`.
    #[must_use]
    pub fn optional(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            required: false,
        }
    }

    /// Returns the wire name of the field.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field's value schema.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Whether the field must be present.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }
}

impl Schema {
    const fn of(kind: SchemaKind) -> Self {
        Self {
            kind,
            description: None,
            non_empty: false,
        }
    }

    /// String schema.
    #[must_use]
    pub const fn string() -> Self {
        Self::of(SchemaKind::String)
    }

    /// Integer schema without bounds.
    #[must_use]
    pub const fn integer() -> Self {
        Self::of(SchemaKind::Integer { minimum: None })
    }

    /// Number schema.
    #[must_use]
    pub const fn number() -> Self {
        Self::of(SchemaKind::Number)
    }

    /// Boolean schema.
    #[must_use]
    pub const fn boolean() -> Self {
        Self::of(SchemaKind::Boolean)
    }

    /// String enumeration schema.
    #[must_use]
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::of(SchemaKind::Enum(values.into_iter().map(Into::into).collect()))
    }

    /// Array schema with the supplied item shape.
    #[must_use]
    pub fn array(items: Self) -> Self {
        Self::of(SchemaKind::Array(Box::new(items)))
    }

    /// Object schema with the supplied fields.
    #[must_use]
    pub fn object(fields: impl IntoIterator<Item = Field>) -> Self {
        Self::of(SchemaKind::Object(fields.into_iter().collect()))
    }

    /// Union schema.
    #[must_use]
    pub fn any_of(alternatives: impl IntoIterator<Item = Self>) -> Self {
        Self::of(SchemaKind::AnyOf(alternatives.into_iter().collect()))
    }

    /// Attaches a description that backends see alongside the shape.
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Rejects blank strings and empty arrays.
    #[must_use]
    pub fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }

    /// Sets an inclusive lower bound on an integer schema.
    ///
    /// Has no effect on other kinds.
    #[must_use]
    pub fn minimum(mut self, value: i64) -> Self {
        if let SchemaKind::Integer { minimum } = &mut self.kind {
            *minimum = Some(value);
        }
        self
    }

    /// Returns the value shape.
    #[must_use]
    pub const fn kind(&self) -> &SchemaKind {
        &self.kind
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether blank strings and empty arrays are rejected.
    #[must_use]
    pub const fn is_non_empty(&self) -> bool {
        self.non_empty
    }

    /// Checks `value` against this schema.
    ///
    /// Unknown object members are accepted; missing required members are not.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaViolation`] found, depth first.
    pub fn check(&self, value: &Value) -> Result<(), SchemaViolation> {
        self.check_at("$", value)
    }

    fn check_at(&self, path: &str, value: &Value) -> Result<(), SchemaViolation> {
        match (&self.kind, value) {
            (SchemaKind::String, Value::String(text)) => {
                if self.non_empty && text.trim().is_empty() {
                    return Err(SchemaViolation::new(path, "must not be blank"));
                }
                Ok(())
            }
            (SchemaKind::Integer { minimum }, Value::Number(number)) => {
                let Some(int) = number.as_i64() else {
                    return Err(SchemaViolation::new(
                        path,
                        format!("expected integer, found {number}"),
                    ));
                };
                match minimum {
                    Some(min) if int < *min => Err(SchemaViolation::new(
                        path,
                        format!("must be at least {min}, found {int}"),
                    )),
                    _ => Ok(()),
                }
            }
            (SchemaKind::Number, Value::Number(_)) | (SchemaKind::Boolean, Value::Bool(_)) => {
                Ok(())
            }
            (SchemaKind::Enum(allowed), Value::String(text)) => {
                if allowed.iter().any(|candidate| candidate == text) {
                    Ok(())
                } else {
                    Err(SchemaViolation::new(
                        path,
                        format!("`{text}` is not one of [{}]", allowed.join(", ")),
                    ))
                }
            }
            (SchemaKind::Array(items), Value::Array(values)) => {
                if self.non_empty && values.is_empty() {
                    return Err(SchemaViolation::new(path, "must contain at least one item"));
                }
                for (index, item) in values.iter().enumerate() {
                    items.check_at(&format!("{path}[{index}]"), item)?;
                }
                Ok(())
            }
            (SchemaKind::Object(fields), Value::Object(members)) => {
                for field in fields {
                    let field_path = format!("{path}.{}", field.name);
                    match members.get(&field.name) {
                        None | Some(Value::Null) if field.required => {
                            return Err(SchemaViolation::new(field_path, "required field missing"));
                        }
                        None | Some(Value::Null) => {}
                        Some(member) => field.schema.check_at(&field_path, member)?,
                    }
                }
                Ok(())
            }
            (SchemaKind::AnyOf(alternatives), _) => {
                if alternatives
                    .iter()
                    .any(|alternative| alternative.check_at(path, value).is_ok())
                {
                    Ok(())
                } else {
                    Err(SchemaViolation::new(
                        path,
                        format!("{} matches none of the allowed shapes", type_name(value)),
                    ))
                }
            }
            (kind, other) => Err(SchemaViolation::new(
                path,
                format!("expected {}, found {}", kind_name(kind), type_name(other)),
            )),
        }
    }

    /// Renders the schema as a standard JSON Schema document.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let mut out = Map::new();
        match &self.kind {
            SchemaKind::String => {
                out.insert("type".into(), json!("string"));
                if self.non_empty {
                    out.insert("minLength".into(), json!(1));
                }
            }
            SchemaKind::Integer { minimum } => {
                out.insert("type".into(), json!("integer"));
                if let Some(min) = minimum {
                    out.insert("minimum".into(), json!(min));
                }
            }
            SchemaKind::Number => {
                out.insert("type".into(), json!("number"));
            }
            SchemaKind::Boolean => {
                out.insert("type".into(), json!("boolean"));
            }
            SchemaKind::Enum(values) => {
                out.insert("type".into(), json!("string"));
                out.insert("enum".into(), json!(values));
            }
            SchemaKind::Array(items) => {
                out.insert("type".into(), json!("array"));
                out.insert("items".into(), items.to_json_schema());
                if self.non_empty {
                    out.insert("minItems".into(), json!(1));
                }
            }
            SchemaKind::Object(fields) => {
                let properties: Map<String, Value> = fields
                    .iter()
                    .map(|field| (field.name.clone(), field.schema.to_json_schema()))
                    .collect();
                let required: Vec<&str> = fields
                    .iter()
                    .filter(|field| field.required)
                    .map(|field| field.name.as_str())
                    .collect();
                out.insert("type".into(), json!("object"));
                out.insert("properties".into(), Value::Object(properties));
                out.insert("required".into(), json!(required));
            }
            SchemaKind::AnyOf(alternatives) => {
                let rendered: Vec<Value> =
                    alternatives.iter().map(Self::to_json_schema).collect();
                out.insert("anyOf".into(), Value::Array(rendered));
            }
        }
        if let Some(description) = &self.description {
            out.insert("description".into(), json!(description));
        }
        Value::Object(out)
    }
}

const fn kind_name(kind: &SchemaKind) -> &'static str {
    match kind {
        SchemaKind::String => "string",
        SchemaKind::Integer { .. } => "integer",
        SchemaKind::Number => "number",
        SchemaKind::Boolean => "boolean",
        SchemaKind::Enum(_) => "enumerated string",
        SchemaKind::Array(_) => "array",
        SchemaKind::Object(_) => "object",
        SchemaKind::AnyOf(_) => "union",
    }
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
