use thiserror::Error;

use crate::{
    application::{content::ContentError, render::RenderError},
    config::LoadError,
    infra::error::InfraError,
};

/// Top-level failure of a command run by the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
    #[error("validation failed: {0}")]
    Validation(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<ContentError> for AppError {
    fn from(error: ContentError) -> Self {
        Self::Render(RenderError::Content(error))
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Infra(InfraError::Io(error))
    }
}
