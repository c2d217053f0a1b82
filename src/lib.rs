pub mod component;
pub mod config;
pub mod configuration;
pub mod error;
pub mod hub;
pub mod loader;
pub mod persister;
pub mod registry;

pub use component::{
    InstanceMetadata, Mode, Model, ModelHandle, NotApplicable, Preprocessor, PreprocessorHandle,
    Resolution,
};
pub use config::Config;
pub use configuration::{Configuration, CONFIGURATION_FILE};
pub use error::{Error, Result};
pub use loader::{LoadOptions, Loader};
pub use persister::{save_pretrained, DEFAULT_CHECKPOINT_NAME};
pub use registry::{BuildContext, ModelRegistry, PreprocessorRegistry};
