//! Response schemas sent to the completion service and checked on the way back.

use std::fmt;

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

use super::TaskError;

/// A named JSON Schema describing one task's reply.
///
/// Construction rejects schemas that are not closed objects with a
/// `required` list, since strict structured output needs both.
pub struct TaskSchema {
    name: String,
    schema: Value,
    validator: JSONSchema,
}

impl TaskSchema {
    pub fn new(name: impl Into<String>, schema: Value) -> Result<Self, TaskError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TaskError::InvalidRequest(
                "Schema name is required".to_string(),
            ));
        }
        if schema.get("type").and_then(Value::as_str) != Some("object") {
            return Err(TaskError::InvalidRequest(format!(
                "Schema '{}' must describe an object",
                name
            )));
        }
        let has_required = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| !fields.is_empty())
            .unwrap_or(false);
        if !has_required {
            return Err(TaskError::InvalidRequest(format!(
                "Schema '{}' must list required properties",
                name
            )));
        }
        if schema.get("additionalProperties") != Some(&Value::Bool(false)) {
            return Err(TaskError::InvalidRequest(format!(
                "Schema '{}' must disallow additional properties",
                name
            )));
        }

        let validator = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema)
            .map_err(|e| {
                TaskError::InvalidRequest(format!("Schema '{}' is invalid: {}", name, e))
            })?;

        Ok(Self {
            name,
            schema,
            validator,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Check a reply against the schema, reporting the first few violations.
    pub fn validate(&self, instance: &Value) -> Result<(), TaskError> {
        if let Err(errors) = self.validator.validate(instance) {
            let problems: Vec<String> = errors
                .take(5)
                .map(|e| {
                    let path = e.instance_path.to_string();
                    if path.is_empty() {
                        e.to_string()
                    } else {
                        format!("{} at {}", e, path)
                    }
                })
                .collect();
            return Err(TaskError::MalformedResponse(format!(
                "reply does not match schema '{}': {}",
                self.name,
                problems.join("; ")
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for TaskSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSchema")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}
