use crate::error::TemplateError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod embedded;
pub mod fs;
pub mod memory;

pub use embedded::EmbeddedSource;
pub use fs::FilesystemSource;
pub use memory::StaticSource;

/// Names of the three sections every bundle carries, in render order.
pub const SECTION_SUBJECT: &str = "subject";
pub const SECTION_PLAIN_BODY: &str = "plainBody";
pub const SECTION_HTML_BODY: &str = "htmlBody";

/// An immutable, named unit of template source.
///
/// Each section is an independent template executed against the same render
/// context. On disk a bundle is a TOML document with the three section names
/// as keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleSource {
    pub subject: String,
    #[serde(rename = "plainBody")]
    pub plain_body: String,
    #[serde(rename = "htmlBody")]
    pub html_body: String,
}

/// Read-only, named-bundle lookup. Bundles never change once resolved.
#[async_trait]
pub trait TemplateSource: Send + Sync + 'static {
    async fn bundle(&self, name: &str) -> Result<BundleSource, TemplateError>;
}

pub(crate) fn parse_bundle(name: &str, document: &str) -> Result<BundleSource, TemplateError> {
    toml::from_str(document).map_err(|err| TemplateError::InvalidBundle {
        name: name.to_owned(),
        reason: err.to_string(),
    })
}
