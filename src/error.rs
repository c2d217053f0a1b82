use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Snapshot for '{0}' must be pre-fetched, but no local copy exists")]
    PrefetchRequired(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cannot resolve a model type for '{0}': no 'type' or 'model_type' in the model configuration")]
    UnresolvedType(String),

    #[error("No builder registered for type '{0}'")]
    UnknownType(String),

    #[error("Sequence-typed component configurations are not supported")]
    SequenceConfig,

    #[error("Cannot save: neither an explicit config nor a handle config is available")]
    MissingSaveConfig,

    #[error("Builder failed for type '{type_name}': {message}")]
    Build { type_name: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Serialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
