use crate::configuration::Configuration;
use crate::error::{Error, Result};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    Train,
    Eval,
    #[default]
    Inference,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Train => "train",
            Mode::Eval => "eval",
            Mode::Inference => "inference",
        }
    }

    pub fn sub_key(&self) -> &'static str {
        match self {
            Mode::Train => "train",
            Mode::Eval | Mode::Inference => "val",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "train" => Ok(Mode::Train),
            "eval" => Ok(Mode::Eval),
            "inference" => Ok(Mode::Inference),
            other => Err(Error::Config(format!("Unknown mode: {}", other))),
        }
    }
}

pub trait Model: Send {
    fn forward(&self, inputs: Value) -> Result<Value>;

    fn postprocess(&self, outputs: Value) -> Result<Value> {
        Ok(outputs)
    }

    fn call(&self, inputs: Value) -> Result<Value> {
        self.postprocess(self.forward(inputs)?)
    }
}

pub trait Preprocessor: Send {
    fn process(&self, data: Value) -> Result<Value>;
}

#[derive(Debug, Clone)]
pub struct InstanceMetadata {
    pub name: String,
    // None only for hand-assembled handles; the loader always fills it
    pub config: Option<Configuration>,
    pub pipeline: Option<Value>,
    pub model_dir: PathBuf,
}

pub struct ModelHandle {
    pub model: Box<dyn Model>,
    pub metadata: InstanceMetadata,
}

pub struct PreprocessorHandle {
    pub preprocessor: Box<dyn Preprocessor>,
    pub mode: Mode,
    pub metadata: InstanceMetadata,
}

// NotApplicable is a valid, non-exceptional outcome; genuine failures stay in Err.
#[derive(Debug)]
pub enum Resolution<T> {
    Resolved(T),
    NotApplicable(NotApplicable),
}

impl<T> Resolution<T> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    pub fn resolved(self) -> Option<T> {
        match self {
            Resolution::Resolved(value) => Some(value),
            Resolution::NotApplicable(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Resolution::Resolved(value) => Resolution::Resolved(f(value)),
            Resolution::NotApplicable(reason) => Resolution::NotApplicable(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotApplicable {
    MissingComponentInfo {
        model_type: Option<String>,
        task: Option<String>,
    },
    NoDefaultType { model_type: String, task: String },
}

impl fmt::Display for NotApplicable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotApplicable::MissingComponentInfo { model_type, task } => write!(
                f,
                "insufficient information: model type {:?}, task {:?}",
                model_type, task
            ),
            NotApplicable::NoDefaultType { model_type, task } => {
                write!(f, "no default type for ({}, {})", model_type, task)
            }
        }
    }
}
