//! Response schemas shared by the request compiler and the response parser.
//!
//! The compiler renders a schema into the completion request so the service
//! knows which shape to produce, and the parser validates the reply against
//! the same tree before deserializing it.

use serde_json::{json, Map, Value};

use super::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    String,
    Integer,
    Array(Box<SchemaNode>),
    Object(Vec<Field>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub node: SchemaNode,
    pub required: bool,
}

impl Field {
    pub fn required(name: &'static str, node: SchemaNode) -> Self {
        Self { name, node, required: true }
    }

    pub fn optional(name: &'static str, node: SchemaNode) -> Self {
        Self { name, node, required: false }
    }
}

impl SchemaNode {
    fn type_name(&self) -> &'static str {
        match self {
            SchemaNode::String => "string",
            SchemaNode::Integer => "integer",
            SchemaNode::Array(_) => "array",
            SchemaNode::Object(_) => "object",
        }
    }

    /// OpenAPI-style schema with upper-case type names, as the Gemini API expects.
    pub fn to_gemini(&self) -> Value {
        self.render(true)
    }

    /// Plain JSON Schema, as OpenAI structured outputs and Ollama expect.
    pub fn to_json_schema(&self) -> Value {
        self.render(false)
    }

    fn render(&self, upper: bool) -> Value {
        let type_name = if upper {
            self.type_name().to_uppercase()
        } else {
            self.type_name().to_string()
        };
        match self {
            SchemaNode::String | SchemaNode::Integer => json!({ "type": type_name }),
            SchemaNode::Array(items) => json!({ "type": type_name, "items": items.render(upper) }),
            SchemaNode::Object(fields) => {
                let mut properties = Map::new();
                for field in fields {
                    properties.insert(field.name.to_string(), field.node.render(upper));
                }
                let required: Vec<&str> = fields
                    .iter()
                    .filter(|f| f.required)
                    .map(|f| f.name)
                    .collect();
                json!({ "type": type_name, "properties": properties, "required": required })
            }
        }
    }

    /// Check `value` against this schema. Errors carry the JSON path of the
    /// first violation.
    pub fn validate(&self, value: &Value) -> Result<()> {
        self.validate_at(value, "$")
    }

    fn validate_at(&self, value: &Value, path: &str) -> Result<()> {
        let mismatch = || {
            EngineError::ResponseSchemaMismatch(format!("{} is not {}", path, self.type_name()))
        };
        match self {
            SchemaNode::String => value.as_str().map(|_| ()).ok_or_else(mismatch),
            SchemaNode::Integer => {
                if value.is_i64() || value.is_u64() {
                    Ok(())
                } else {
                    Err(mismatch())
                }
            }
            SchemaNode::Array(items) => {
                let array = value.as_array().ok_or_else(mismatch)?;
                for (i, item) in array.iter().enumerate() {
                    items.validate_at(item, &format!("{}[{}]", path, i))?;
                }
                Ok(())
            }
            SchemaNode::Object(fields) => {
                let object = value.as_object().ok_or_else(mismatch)?;
                for field in fields {
                    let child = format!("{}.{}", path, field.name);
                    match object.get(field.name) {
                        Some(Value::Null) | None if field.required => {
                            return Err(EngineError::ResponseSchemaMismatch(format!(
                                "missing required field {}",
                                child
                            )));
                        }
                        Some(Value::Null) | None => {}
                        Some(v) => field.node.validate_at(v, &child)?,
                    }
                }
                Ok(())
            }
        }
    }
}

fn string_array_item(names: &[&'static str]) -> SchemaNode {
    SchemaNode::Array(Box::new(SchemaNode::Object(
        names
            .iter()
            .map(|n| Field::required(n, SchemaNode::String))
            .collect(),
    )))
}

/// Shape of a content generation reply (`GenerationResult`).
pub fn generation_result_schema() -> SchemaNode {
    let post = SchemaNode::Object(vec![
        Field::required("id", SchemaNode::String),
        Field::optional("title", SchemaNode::String),
        Field::required("hook", SchemaNode::String),
        Field::required("body", SchemaNode::String),
        Field::required("cta", SchemaNode::String),
        Field::required("emojis", SchemaNode::String),
        Field::required("hashtags", SchemaNode::String),
    ]);
    SchemaNode::Object(vec![
        Field::required("patterns", string_array_item(&["name", "description", "example"])),
        Field::required("originalPosts", SchemaNode::Array(Box::new(post))),
        Field::required("toneVariants", string_array_item(&["tone", "content"])),
        Field::required("styleVariants", string_array_item(&["style", "content"])),
    ])
}

/// Shape of a calendar planning reply (`CalendarResult`).
pub fn calendar_schema() -> SchemaNode {
    let entry = SchemaNode::Object(vec![
        Field::required("day", SchemaNode::Integer),
        Field::required("topic", SchemaNode::String),
        Field::required("format", SchemaNode::String),
        Field::required("hook", SchemaNode::String),
        Field::required("goal", SchemaNode::String),
    ]);
    SchemaNode::Object(vec![
        Field::required("monthName", SchemaNode::String),
        Field::required("entries", SchemaNode::Array(Box::new(entry))),
    ])
}
