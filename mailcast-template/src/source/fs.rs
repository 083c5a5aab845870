use crate::error::TemplateError;
use crate::source::{parse_bundle, BundleSource, TemplateSource};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::info;

/// Bundle store reading `{base_path}/{name}.toml` on every lookup.
pub struct FilesystemSource {
    base_path: PathBuf,
}

impl FilesystemSource {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        info!("Template path: {base_path:?}");
        Self { base_path }
    }
}

#[async_trait]
impl TemplateSource for FilesystemSource {
    async fn bundle(&self, name: &str) -> Result<BundleSource, TemplateError> {
        // TODO: reject path separators in `name` so a lookup cannot escape
        // the template directory.
        let path = self.base_path.join(format!("{name}.toml"));

        let document = match tokio::fs::read_to_string(&path).await {
            Ok(document) => document,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(TemplateError::NotFound(name.to_owned()));
            }
            Err(err) => return Err(err.into()),
        };

        parse_bundle(name, &document)
    }
}
