pub mod error;
pub mod source;

use crate::error::TemplateError;
use crate::source::{TemplateSource, SECTION_HTML_BODY, SECTION_PLAIN_BODY, SECTION_SUBJECT};
use mailcast_core::message::RenderedEmail;
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Renders named template bundles into three-part email messages.
pub struct Templater {
    source: Arc<dyn TemplateSource>,
    env: Environment<'static>,
}

impl Templater {
    pub fn new(source: Arc<dyn TemplateSource>) -> Self {
        let mut env = Environment::new();
        // A context field missing from a section is a render error, not an
        // empty substitution.
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { source, env }
    }

    /// Renders the `subject`, `plainBody` and `htmlBody` sections of the
    /// named bundle against one render context.
    ///
    /// Sections run in that order and the first failure aborts the render;
    /// no partially populated message is ever produced. All three outputs
    /// derive from a single lookup of the bundle, so they stay mutually
    /// consistent.
    pub async fn render<C>(
        &self,
        bundle_name: &str,
        context: &C,
    ) -> Result<RenderedEmail, TemplateError>
    where
        C: Serialize + ?Sized,
    {
        let bundle = self.source.bundle(bundle_name).await?;
        debug!(bundle = bundle_name, "rendering template bundle");

        let subject = self.render_section(SECTION_SUBJECT, &bundle.subject, context)?;
        let plain_body = self.render_section(SECTION_PLAIN_BODY, &bundle.plain_body, context)?;
        let html_body = self.render_section(SECTION_HTML_BODY, &bundle.html_body, context)?;

        Ok(RenderedEmail {
            subject,
            plain_body,
            html_body,
        })
    }

    fn render_section<C>(
        &self,
        section: &'static str,
        template: &str,
        context: &C,
    ) -> Result<String, TemplateError>
    where
        C: Serialize + ?Sized,
    {
        self.env
            .render_str(template, context)
            .map_err(|source| TemplateError::Render { section, source })
    }
}
