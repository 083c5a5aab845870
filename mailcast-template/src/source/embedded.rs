use crate::error::TemplateError;
use crate::source::{parse_bundle, BundleSource, TemplateSource};
use async_trait::async_trait;
use rust_embed::RustEmbed;
use std::marker::PhantomData;

/// Bundle store compiled into the binary from a `RustEmbed` folder of TOML
/// bundle documents. Bundle `name` resolves to the embedded file
/// `{name}.toml`.
///
/// ```ignore
/// #[derive(RustEmbed)]
/// #[folder = "templates"]
/// struct Bundles;
///
/// let source = EmbeddedSource::<Bundles>::new();
/// ```
pub struct EmbeddedSource<E> {
    _assets: PhantomData<E>,
}

impl<E> EmbeddedSource<E> {
    pub fn new() -> Self {
        Self {
            _assets: PhantomData,
        }
    }
}

impl<E> Default for EmbeddedSource<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E> TemplateSource for EmbeddedSource<E>
where
    E: RustEmbed + Send + Sync + 'static,
{
    async fn bundle(&self, name: &str) -> Result<BundleSource, TemplateError> {
        let file = E::get(&format!("{name}.toml"))
            .ok_or_else(|| TemplateError::NotFound(name.to_owned()))?;

        let document =
            std::str::from_utf8(&file.data).map_err(|err| TemplateError::InvalidBundle {
                name: name.to_owned(),
                reason: err.to_string(),
            })?;

        parse_bundle(name, document)
    }
}
