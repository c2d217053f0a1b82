use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::path::Path;

pub const CONFIGURATION_FILE: &str = "configuration.json";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    root: Map<String, Value>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(Error::Config(format!(
                "configuration document must be a JSON object, got {}",
                type_label(&other)
            ))),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let value: Value = serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        Self::from_value(value)
    }

    pub fn read_dir(dir: &Path) -> Result<Self> {
        Self::from_file(&dir.join(CONFIGURATION_FILE))
    }

    pub fn write_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(&Value::Object(self.root.clone()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn write_dir(&self, dir: &Path) -> Result<()> {
        self.write_file(&dir.join(CONFIGURATION_FILE))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.root.get_mut(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.root.insert(key.into(), value);
    }

    pub fn task(&self) -> Option<&str> {
        self.root.get("task").and_then(|v| v.as_str())
    }

    pub fn object(&self, key: &str) -> Result<Option<Map<String, Value>>> {
        match self.root.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map.clone())),
            Some(Value::Array(_)) => Err(Error::SequenceConfig),
            Some(other) => Err(Error::Config(format!(
                "'{}' must be an object, got {}",
                key,
                type_label(other)
            ))),
        }
    }

    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }
}

fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
