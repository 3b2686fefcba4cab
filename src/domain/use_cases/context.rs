use crate::{
    entities::{developer::Developer, project::Project, technology::Technology},
    errors::AppError,
};

/// Rows resolved by the validators of one request, handed on to the handler
/// that runs after them.
#[derive(Debug, Default)]
pub struct RequestContext {
    pub developer: Option<Developer>,
    pub project: Option<Project>,
    pub technology: Option<Technology>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn developer(&self) -> Result<&Developer, AppError> {
        self.developer
            .as_ref()
            .ok_or_else(|| unresolved("developer"))
    }

    pub fn project(&self) -> Result<&Project, AppError> {
        self.project
            .as_ref()
            .ok_or_else(|| unresolved("project"))
    }

    pub fn technology(&self) -> Result<&Technology, AppError> {
        self.technology
            .as_ref()
            .ok_or_else(|| unresolved("technology"))
    }
}

fn unresolved(what: &str) -> AppError {
    AppError::InternalError(format!("{what} was not resolved before the handler ran"))
}
