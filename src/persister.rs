use crate::component::{Mode, Model, ModelHandle};
use crate::configuration::Configuration;
use crate::error::{Error, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

pub const DEFAULT_CHECKPOINT_NAME: &str = "model.safetensors";

// Checkpoint bytes are written by save_fn; this layer only normalizes and
// writes the configuration document.
pub fn save_pretrained<F>(
    handle: &ModelHandle,
    target_dir: &Path,
    checkpoint_names: Option<&[String]>,
    save_fn: F,
    config: Option<&Configuration>,
) -> Result<()>
where
    F: Fn(&dyn Model, &Path, &[String]) -> Result<()>,
{
    let config = config
        .or(handle.metadata.config.as_ref())
        .ok_or(Error::MissingSaveConfig)?;

    let mut config = config.clone();
    mark_for_inference(&mut config);

    fs::create_dir_all(target_dir)?;

    let default_names = [DEFAULT_CHECKPOINT_NAME.to_string()];
    let names = checkpoint_names.unwrap_or(&default_names);
    save_fn(handle.model.as_ref(), target_dir, names)?;

    config.write_dir(target_dir)?;
    Ok(())
}

// Persisted artifacts are always marked for inference use, regardless of the
// mode they were built under. Only an existing mode key is rewritten.
fn mark_for_inference(config: &mut Configuration) {
    if let Some(Value::Object(preprocessor)) = config.get_mut("preprocessor") {
        if preprocessor.contains_key("mode") {
            preprocessor.insert(
                "mode".to_string(),
                Value::String(Mode::Inference.as_str().to_string()),
            );
        } else if let Some(Value::Object(val)) = preprocessor.get_mut("val") {
            if val.contains_key("mode") {
                val.insert(
                    "mode".to_string(),
                    Value::String(Mode::Inference.as_str().to_string()),
                );
            }
        }
    }
}
