use crate::component::{Model, Preprocessor};
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::collections::HashMap;

pub struct BuildContext {
    pub type_name: String,
    pub config: Map<String, Value>,
    pub task: Option<String>,
}

type ModelBuilder = Box<dyn Fn(&BuildContext) -> Result<Box<dyn Model>> + Send + Sync>;
type PreprocessorBuilder = Box<dyn Fn(&BuildContext) -> Result<Box<dyn Preprocessor>> + Send + Sync>;

#[derive(Default)]
pub struct ModelRegistry {
    builders: HashMap<String, ModelBuilder>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, type_name: impl Into<String>, builder: F)
    where
        F: Fn(&BuildContext) -> Result<Box<dyn Model>> + Send + Sync + 'static,
    {
        self.builders.insert(type_name.into(), Box::new(builder));
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.builders.contains_key(type_name)
    }

    pub fn build(&self, ctx: &BuildContext) -> Result<Box<dyn Model>> {
        let builder = self
            .builders
            .get(&ctx.type_name)
            .ok_or_else(|| Error::UnknownType(ctx.type_name.clone()))?;
        builder(ctx)
    }
}

#[derive(Default)]
pub struct PreprocessorRegistry {
    builders: HashMap<String, PreprocessorBuilder>,
}

impl PreprocessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, type_name: impl Into<String>, builder: F)
    where
        F: Fn(&BuildContext) -> Result<Box<dyn Preprocessor>> + Send + Sync + 'static,
    {
        self.builders.insert(type_name.into(), Box::new(builder));
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.builders.contains_key(type_name)
    }

    pub fn build(&self, ctx: &BuildContext) -> Result<Box<dyn Preprocessor>> {
        let builder = self
            .builders
            .get(&ctx.type_name)
            .ok_or_else(|| Error::UnknownType(ctx.type_name.clone()))?;
        builder(ctx)
    }
}

// Default preprocessor types for (model type, task) pairs whose configuration
// omits an explicit one. Read-only after first use; pairs not listed here
// require the configuration to name a type itself.
static DEFAULT_PREPROCESSORS: Lazy<HashMap<(&'static str, &'static str), &'static str>> =
    Lazy::new(|| {
        HashMap::from([
            // bert
            (("bert", "backbone"), "sequence-classification-tokenizer"),
            (("bert", "text-classification"), "sequence-classification-tokenizer"),
            (("bert", "sentence-similarity"), "sequence-classification-tokenizer"),
            (("bert", "sentence-embedding"), "sentence-embedding-tokenizer"),
            (("bert", "fill-mask"), "fill-mask-tokenizer"),
            (("bert", "token-classification"), "token-classification-tokenizer"),
            (("bert", "word-segmentation"), "token-classification-tokenizer"),
            // roberta
            (("roberta", "backbone"), "sequence-classification-tokenizer"),
            (("roberta", "text-classification"), "sequence-classification-tokenizer"),
            (("roberta", "fill-mask"), "fill-mask-tokenizer"),
            // deberta
            (("deberta", "backbone"), "sequence-classification-tokenizer"),
            (("deberta", "fill-mask"), "fill-mask-tokenizer"),
            // t5
            (("t5", "backbone"), "text2text-generation-tokenizer"),
            (("t5", "text2text-generation"), "text2text-generation-tokenizer"),
            // bart
            (("bart", "text-error-correction"), "text-error-correction-tokenizer"),
            // gpt2
            (("gpt2", "backbone"), "text-generation-tokenizer"),
            (("gpt2", "text-generation"), "text-generation-tokenizer"),
        ])
    });

pub fn default_preprocessor_type(model_type: &str, task: &str) -> Option<&'static str> {
    DEFAULT_PREPROCESSORS.get(&(model_type, task)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct NullModel;

    impl Model for NullModel {
        fn forward(&self, inputs: Value) -> Result<Value> {
            Ok(inputs)
        }
    }

    fn ctx(type_name: &str) -> BuildContext {
        BuildContext {
            type_name: type_name.to_string(),
            config: Map::new(),
            task: None,
        }
    }

    #[test]
    fn builds_registered_types() {
        let mut registry = ModelRegistry::new();
        registry.register("null", |_ctx| Ok(Box::new(NullModel) as Box<dyn Model>));

        assert!(registry.contains("null"));
        let model = registry.build(&ctx("null")).unwrap();
        assert_eq!(model.forward(json!({"x": 1})).unwrap(), json!({"x": 1}));
    }

    #[test]
    fn unknown_type_is_a_hard_error() {
        let registry = ModelRegistry::new();
        assert!(matches!(
            registry.build(&ctx("ghost")),
            Err(Error::UnknownType(name)) if name == "ghost"
        ));
    }

    #[test]
    fn default_table_lookup() {
        assert_eq!(
            default_preprocessor_type("bert", "text-classification"),
            Some("sequence-classification-tokenizer")
        );
        assert_eq!(default_preprocessor_type("bert", "text-ranking"), None);
        assert_eq!(default_preprocessor_type("unknown", "backbone"), None);
    }
}
