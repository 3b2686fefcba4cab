use std::sync::Arc;

use crate::{
    entities::{
        developer::{Developer, DeveloperProfile, NewDeveloper, UpdateDeveloper},
        developer_info::{DeveloperInfo, NewDeveloperInfo, OperatingSystem},
    },
    errors::AppError,
    repositories::developer::DeveloperRepository,
    use_cases::context::RequestContext,
};

pub struct DeveloperHandler {
    pub developer_repo: Arc<dyn DeveloperRepository>,
}

impl DeveloperHandler {
    pub fn new(developer_repo: Arc<dyn DeveloperRepository>) -> Self {
        DeveloperHandler { developer_repo }
    }

    /// Fails with 409 when another developer already uses `email`.
    /// `exclude_id` lets a developer keep its own address on update.
    pub async fn ensure_email_available(
        &self,
        email: Option<&str>,
        exclude_id: Option<i32>,
    ) -> Result<(), AppError> {
        let Some(email) = email else {
            return Ok(());
        };

        match self.developer_repo.get_developer_by_email(email).await? {
            Some(existing) if Some(existing.id) != exclude_id => {
                tracing::debug!(developer_id = existing.id, "email already in use");
                Err(AppError::Conflict("Email already exists.".to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Resolves the developer into `ctx`, or 404.
    pub async fn ensure_developer_exists(
        &self,
        id: i32,
        ctx: &mut RequestContext,
    ) -> Result<(), AppError> {
        let developer = self.developer_repo.get_developer_by_id(id).await?
            .ok_or_else(|| {
                tracing::debug!(developer_id = id, "developer not found");
                AppError::NotFound("Developer not found.".to_string())
            })?;

        ctx.developer = Some(developer);
        Ok(())
    }

    /// A developer has at most one info row. Runs before the body is read,
    /// so a second create is a 409 whatever it carries.
    pub async fn ensure_developer_info_absent(&self, developer_id: i32) -> Result<(), AppError> {
        if self.developer_repo.get_developer_info(developer_id).await?.is_some() {
            tracing::debug!(developer_id, "developer info already present");
            return Err(AppError::Conflict("Developer infos already exists.".to_string()));
        }

        Ok(())
    }

    pub fn ensure_preferred_os_supported(&self, request: &NewDeveloperInfo) -> Result<(), AppError> {
        if request.preferred_os().is_none() {
            tracing::debug!(preferred_os = %request.preferred_os, "unsupported operating system");
            return Err(AppError::bad_request_with_options(
                "Invalid OS option.",
                OperatingSystem::options(),
            ));
        }

        Ok(())
    }

    pub async fn create_developer(&self, request: NewDeveloper) -> Result<Developer, AppError> {
        let developer = self.developer_repo.create_developer(&request).await?;

        tracing::info!(developer_id = developer.id, "Developer created");
        Ok(developer)
    }

    /// Reads the developer merged with its info. Relies on
    /// `ensure_developer_exists` having run; a row deleted in between is a 404.
    pub async fn get_developer_profile(&self, ctx: &RequestContext) -> Result<DeveloperProfile, AppError> {
        let developer = ctx.developer()?;

        self.developer_repo.get_developer_profile(developer.id).await?
            .ok_or_else(|| AppError::NotFound("Developer not found.".to_string()))
    }

    pub async fn update_developer(
        &self,
        ctx: &RequestContext,
        changes: UpdateDeveloper,
    ) -> Result<Developer, AppError> {
        let developer = ctx.developer()?;

        if changes.is_empty() {
            return Err(AppError::bad_request("No fields provided for update."));
        }

        let updated = self.developer_repo.update_developer(developer.id, &changes).await?
            .ok_or_else(|| AppError::NotFound("Developer not found.".to_string()))?;

        tracing::info!(developer_id = updated.id, "Developer updated");
        Ok(updated)
    }

    /// Deletes without checking the affected row count.
    pub async fn delete_developer(&self, ctx: &RequestContext) -> Result<(), AppError> {
        let developer = ctx.developer()?;

        let deleted = self.developer_repo.delete_developer(developer.id).await?;

        tracing::info!(developer_id = developer.id, deleted, "Developer deleted");
        Ok(())
    }

    pub async fn create_developer_info(
        &self,
        ctx: &RequestContext,
        request: NewDeveloperInfo,
    ) -> Result<DeveloperInfo, AppError> {
        let developer = ctx.developer()?;

        let preferred_os = request.preferred_os().ok_or_else(|| {
            AppError::bad_request_with_options("Invalid OS option.", OperatingSystem::options())
        })?;

        let insert = request.prepare_for_insert(developer.id, preferred_os);
        let info = self.developer_repo.create_developer_info(&insert).await?;

        tracing::info!(developer_id = developer.id, info_id = info.id, "Developer info created");
        Ok(info)
    }
}
