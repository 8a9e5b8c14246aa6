use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

use super::DiscoveryError;

/// Raw on-disk form. Every field is optional so that missing keys surface
/// as a validation warning rather than a parse error. Optional fields take
/// any JSON type; values the harness cannot use are dropped with a warning.
#[derive(Debug, Deserialize)]
struct RawManifest {
    name: Option<String>,
    #[serde(alias = "entry_point")]
    module_path: Option<String>,
    class_name: Option<String>,
    #[serde(default)]
    description: Option<Value>,
    #[serde(default)]
    version: Option<Value>,
    #[serde(default)]
    config: Option<Value>,
}

/// A validated component manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub name: String,
    pub module_path: String,
    pub class_name: String,
    pub description: Option<String>,
    pub version: Option<String>,
    pub config: HashMap<String, String>,
}

impl Manifest {
    /// Read and validate the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self, DiscoveryError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DiscoveryError::ManifestMissing(path.to_path_buf()));
            }
            Err(e) => {
                return Err(DiscoveryError::ManifestUnreadable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, DiscoveryError> {
        let raw: RawManifest = serde_json::from_str(content)
            .map_err(|e| DiscoveryError::MalformedManifest(e.to_string()))?;

        let mut missing = Vec::new();
        let name = required(raw.name, "name", &mut missing);
        let module_path = required(raw.module_path, "module_path", &mut missing);
        let class_name = required(raw.class_name, "class_name", &mut missing);
        if !missing.is_empty() {
            return Err(DiscoveryError::MissingFields(missing));
        }

        let description = optional_text(raw.description, &name, "description");
        let version = optional_text(raw.version, &name, "version");
        let config = config_values(raw.config, &name);

        Ok(Self {
            name,
            module_path,
            class_name,
            description,
            version,
            config,
        })
    }
}

/// Strings, numbers and booleans as text. `null`, arrays and objects have no
/// text form.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn optional_text(value: Option<Value>, component: &str, field: &str) -> Option<String> {
    let value = value.filter(|v| !v.is_null())?;
    let text = scalar_text(&value);
    if text.is_none() {
        warn!(component = %component, field, "Ignoring manifest field that is not a string");
    }
    text
}

fn config_values(value: Option<Value>, component: &str) -> HashMap<String, String> {
    let map = match value {
        None | Some(Value::Null) => return HashMap::new(),
        Some(Value::Object(map)) => map,
        Some(_) => {
            warn!(component = %component, "Ignoring manifest 'config' that is not an object");
            return HashMap::new();
        }
    };

    let mut config = HashMap::with_capacity(map.len());
    for (key, value) in map {
        match scalar_text(&value) {
            Some(text) => {
                config.insert(key, text);
            }
            None => {
                warn!(component = %component, key = %key, "Ignoring config value that is not a scalar");
            }
        }
    }
    config
}

fn required(value: Option<String>, field: &'static str, missing: &mut Vec<&'static str>) -> String {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => v,
        _ => {
            missing.push(field);
            String::new()
        }
    }
}
