use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::AgentError;

/// The flat key/value set shared by every component of a flow.
///
/// Parsed once per flow from a JSON object string. Agents either read
/// individual keys or bind the whole set into a typed argument struct with
/// [`Params::bind`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

#[derive(Debug, thiserror::Error)]
pub enum ParamsError {
    #[error("Parameters are not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("Parameters must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object string. Blank input means "no parameters".
    pub fn parse(raw: &str) -> Result<Self, ParamsError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        match serde_json::from_str::<Value>(raw).map_err(ParamsError::Malformed)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ParamsError::NotAnObject(json_kind(&other))),
        }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn require_str(&self, key: &str) -> Result<&str, AgentError> {
        match self.0.get(key) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(AgentError::InvalidParameter {
                name: key.to_string(),
                reason: format!("expected a string, got {}", json_kind(other)),
            }),
            None => Err(AgentError::MissingParameter(key.to_string())),
        }
    }

    /// Deserialize the whole parameter set into `T`. Unknown keys are
    /// ignored unless `T` denies them.
    pub fn bind<T: DeserializeOwned>(&self) -> Result<T, AgentError> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|e| AgentError::InvalidParameters(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
