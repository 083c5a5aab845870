use crate::error::TemplateError;
use crate::source::{BundleSource, TemplateSource};
use async_trait::async_trait;
use std::collections::HashMap;

/// In-memory bundle store, for inline bundles and tests.
#[derive(Default)]
pub struct StaticSource {
    bundles: HashMap<String, BundleSource>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, name: impl Into<String>, bundle: BundleSource) -> Self {
        self.bundles.insert(name.into(), bundle);
        self
    }
}

#[async_trait]
impl TemplateSource for StaticSource {
    async fn bundle(&self, name: &str) -> Result<BundleSource, TemplateError> {
        self.bundles
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound(name.to_owned()))
    }
}
