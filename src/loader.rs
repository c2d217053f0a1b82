use crate::component::{
    InstanceMetadata, Mode, ModelHandle, NotApplicable, PreprocessorHandle, Resolution,
};
use crate::config::Config;
use crate::configuration::Configuration;
use crate::error::{Error, Result};
use crate::hub::{SnapshotDownloader, DEFAULT_REVISION};
use crate::registry::{
    default_preprocessor_type, BuildContext, ModelRegistry, PreprocessorRegistry,
};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

#[derive(Default)]
pub struct LoadOptions {
    pub revision: Option<String>,
    pub config: Option<Configuration>,
    pub task: Option<String>,
    pub mode: Mode,
    pub device: Option<String>,
    pub prefetched_only: bool,
    // merged into the chosen sub-configuration last, so they win
    pub overrides: Map<String, Value>,
}

pub struct Loader {
    downloader: SnapshotDownloader,
    models: ModelRegistry,
    preprocessors: PreprocessorRegistry,
}

impl Loader {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            downloader: SnapshotDownloader::new(config)?,
            models: ModelRegistry::new(),
            preprocessors: PreprocessorRegistry::new(),
        })
    }

    pub fn models_mut(&mut self) -> &mut ModelRegistry {
        &mut self.models
    }

    pub fn preprocessors_mut(&mut self) -> &mut PreprocessorRegistry {
        &mut self.preprocessors
    }

    pub fn resolve_snapshot(&mut self, identifier: &str, options: &LoadOptions) -> Result<PathBuf> {
        // An existing local path is used as-is and never touches the network
        let path = Path::new(identifier);
        if path.exists() {
            return Ok(path.to_path_buf());
        }

        let revision = options.revision.as_deref().unwrap_or(DEFAULT_REVISION);
        if options.prefetched_only {
            return match self.downloader.index().find(identifier, revision) {
                Some(entry) => Ok(entry.path.clone()),
                None => Err(Error::PrefetchRequired(identifier.to_string())),
            };
        }
        self.downloader.fetch(identifier, revision)
    }

    pub fn load_model(&mut self, identifier: &str, options: &LoadOptions) -> Result<ModelHandle> {
        let model_dir = self.resolve_snapshot(identifier, options)?;
        let cfg = match &options.config {
            Some(cfg) => cfg.clone(),
            None => Configuration::read_dir(&model_dir)?,
        };
        tracing::info!("Initializing model from {:?}", model_dir);

        let task = effective_task(&cfg, options);
        let (type_name, model_cfg) = resolve_model_config(identifier, &cfg, &model_dir, options)?;
        let ctx = BuildContext {
            type_name,
            config: model_cfg,
            task,
        };
        let model = self.models.build(&ctx)?;

        Ok(ModelHandle {
            model,
            metadata: metadata_for(identifier, cfg, model_dir),
        })
    }

    pub fn load_preprocessor(
        &mut self,
        identifier: &str,
        options: &LoadOptions,
    ) -> Result<Resolution<PreprocessorHandle>> {
        let model_dir = self.resolve_snapshot(identifier, options)?;
        let cfg = match &options.config {
            Some(cfg) => cfg.clone(),
            None => Configuration::read_dir(&model_dir)?,
        };

        let task = effective_task(&cfg, options);
        let (type_name, sub_cfg) = match resolve_preprocessor_config(&cfg, &model_dir, options)? {
            Resolution::Resolved(hit) => hit,
            Resolution::NotApplicable(reason) => return Ok(Resolution::NotApplicable(reason)),
        };

        let ctx = BuildContext {
            type_name,
            config: sub_cfg,
            task,
        };
        let preprocessor = self.preprocessors.build(&ctx)?;

        Ok(Resolution::Resolved(PreprocessorHandle {
            preprocessor,
            mode: options.mode,
            metadata: metadata_for(identifier, cfg, model_dir),
        }))
    }
}

pub fn effective_task(cfg: &Configuration, options: &LoadOptions) -> Option<String> {
    options
        .task
        .clone()
        .or_else(|| cfg.task().map(str::to_string))
}

pub fn resolve_model_config(
    identifier: &str,
    cfg: &Configuration,
    model_dir: &Path,
    options: &LoadOptions,
) -> Result<(String, Map<String, Value>)> {
    let mut model_cfg = cfg.object("model")?.unwrap_or_default();

    if !model_cfg.contains_key("type") {
        if let Some(model_type) = model_cfg.get("model_type").cloned() {
            model_cfg.insert("type".to_string(), model_type);
        }
    }

    merge_into(&mut model_cfg, model_dir, &options.overrides);
    if let Some(device) = &options.device {
        model_cfg.insert("device".to_string(), Value::String(device.clone()));
    }

    match block_type(&model_cfg) {
        Some(type_name) => Ok((type_name, model_cfg)),
        None => Err(Error::UnresolvedType(identifier.to_string())),
    }
}

// Selection order: the block's own type, then the mode's train/val sub-block,
// then the whole block; the (model type, task) table is the last resort.
pub fn resolve_preprocessor_config(
    cfg: &Configuration,
    model_dir: &Path,
    options: &LoadOptions,
) -> Result<Resolution<(String, Map<String, Value>)>> {
    let task = effective_task(cfg, options);

    let block = match cfg.object("preprocessor")? {
        Some(block) if !block.is_empty() => block,
        _ => {
            tracing::warn!("No preprocessor field found in configuration");
            Map::new()
        }
    };

    let mut sub_cfg = if block.contains_key("type") {
        block
    } else {
        let sub_key = options.mode.sub_key();
        match block.get(sub_key) {
            Some(Value::Object(sub)) => sub.clone(),
            Some(Value::Array(_)) => return Err(Error::SequenceConfig),
            Some(_) => {
                return Err(Error::Config(format!(
                    "'preprocessor.{}' must be an object",
                    sub_key
                )))
            }
            None => {
                tracing::warn!(
                    "No '{}' key and no 'type' key in the preprocessor configuration",
                    sub_key
                );
                block
            }
        }
    };

    merge_into(&mut sub_cfg, model_dir, &options.overrides);

    if let Some(type_name) = block_type(&sub_cfg) {
        return Ok(Resolution::Resolved((type_name, sub_cfg)));
    }

    tracing::warn!(
        "No usable preprocessor config at mode '{}', trying model type and task",
        options.mode
    );
    let model_block = cfg.object("model")?.unwrap_or_default();
    let (model_type, task) = match (model_type_of(&model_block), task) {
        (Some(model_type), Some(task)) => (model_type, task),
        (model_type, task) => {
            tracing::warn!(
                "Found task {:?}, model type {:?}: insufficient information to build a preprocessor, skipping",
                task,
                model_type
            );
            return Ok(Resolution::NotApplicable(
                NotApplicable::MissingComponentInfo { model_type, task },
            ));
        }
    };

    match default_preprocessor_type(&model_type, &task) {
        Some(type_name) => {
            sub_cfg.insert("type".to_string(), Value::String(type_name.to_string()));
            Ok(Resolution::Resolved((type_name.to_string(), sub_cfg)))
        }
        None => {
            tracing::warn!(
                "No default preprocessor for ({}, {}), skipping",
                model_type,
                task
            );
            Ok(Resolution::NotApplicable(NotApplicable::NoDefaultType {
                model_type,
                task,
            }))
        }
    }
}

fn block_type(block: &Map<String, Value>) -> Option<String> {
    block
        .get("type")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn model_type_of(block: &Map<String, Value>) -> Option<String> {
    block
        .get("type")
        .or_else(|| block.get("model_type"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn merge_into(block: &mut Map<String, Value>, model_dir: &Path, overrides: &Map<String, Value>) {
    block.insert(
        "model_dir".to_string(),
        Value::String(model_dir.display().to_string()),
    );
    for (key, value) in overrides {
        block.insert(key.clone(), value.clone());
    }
}

fn metadata_for(identifier: &str, cfg: Configuration, model_dir: PathBuf) -> InstanceMetadata {
    InstanceMetadata {
        name: identifier.to_string(),
        pipeline: cfg.get("pipeline").cloned(),
        config: Some(cfg),
        model_dir,
    }
}
