//! Template error types

use thiserror::Error;

/// Digest rendering errors
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template syntax error
    #[error("syntax error in {template} at line {line}: {message}")]
    SyntaxError {
        template: String,
        line: usize,
        message: String,
    },

    /// Rendering failed (bad filter input, undefined value, ...)
    #[error("failed to render {template}: {message}")]
    RenderError { template: String, message: String },

    /// Wrapped minijinja error
    #[error("template error: {0}")]
    Internal(#[from] minijinja::Error),
}

impl TemplateError {
    /// Classify a minijinja error raised while rendering `template`
    pub fn from_render(template: &str, err: minijinja::Error) -> Self {
        match err.kind() {
            minijinja::ErrorKind::SyntaxError => Self::SyntaxError {
                template: template.to_string(),
                line: err.line().unwrap_or(0),
                message: err.to_string(),
            },
            minijinja::ErrorKind::TemplateNotFound => Self::Internal(err),
            _ => Self::RenderError {
                template: template.to_string(),
                message: err.to_string(),
            },
        }
    }
}
