use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    /// The bundle name did not resolve in the template source.
    #[error("template bundle {0:?} not found")]
    NotFound(String),

    /// The bundle document exists but is not a valid three-section bundle.
    #[error("invalid template bundle {name:?}: {reason}")]
    InvalidBundle { name: String, reason: String },

    /// One of the bundle sections failed to execute, either from malformed
    /// template syntax or from a context field the section references but
    /// the caller did not supply.
    #[error("failed to render template section {section:?}")]
    Render {
        section: &'static str,
        #[source]
        source: minijinja::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}
