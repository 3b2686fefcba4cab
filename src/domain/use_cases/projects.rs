use std::sync::Arc;

use crate::{
    entities::{
        project::{NewProject, Project, ProjectTechnologyRow, UpdateProject},
        technology::{ProjectTechnologyInsert, Technology, TechnologyAssociation, TechnologyName},
    },
    errors::AppError,
    repositories::{developer::DeveloperRepository, project::ProjectRepository},
    use_cases::context::RequestContext,
};

const TECHNOLOGY_NOT_SUPPORTED: &str = "Technology not supported.";
const TECHNOLOGY_NOT_RELATED: &str = "Technology not related to the project.";
const TECHNOLOGY_ALREADY_ATTACHED: &str = "This technology is already associated with the project.";

pub struct ProjectHandler {
    pub project_repo: Arc<dyn ProjectRepository>,
    pub developer_repo: Arc<dyn DeveloperRepository>,
}

impl ProjectHandler {
    pub fn new(
        project_repo: Arc<dyn ProjectRepository>,
        developer_repo: Arc<dyn DeveloperRepository>,
    ) -> Self {
        ProjectHandler {
            project_repo,
            developer_repo,
        }
    }

    /// The developer a project points at must exist. `None` means the request
    /// does not change the owner and there is nothing to check.
    pub async fn ensure_project_developer_exists(&self, developer_id: Option<i32>) -> Result<(), AppError> {
        let Some(developer_id) = developer_id else {
            return Ok(());
        };

        if self.developer_repo.get_developer_by_id(developer_id).await?.is_none() {
            tracing::debug!(developer_id, "project owner not found");
            return Err(AppError::NotFound("Developer not found.".to_string()));
        }

        Ok(())
    }

    /// Resolves the project into `ctx`, or 404.
    pub async fn ensure_project_exists(&self, id: i32, ctx: &mut RequestContext) -> Result<(), AppError> {
        let project = self.project_repo.get_project_by_id(id).await?
            .ok_or_else(|| {
                tracing::debug!(project_id = id, "project not found");
                AppError::NotFound("Project not found.".to_string())
            })?;

        ctx.project = Some(project);
        Ok(())
    }

    /// Resolves `name` against the catalog and rejects technologies the
    /// project already has.
    pub async fn ensure_technology_attachable(&self, name: &str, ctx: &mut RequestContext) -> Result<(), AppError> {
        let project_id = ctx.project()?.id;
        let technology = self.resolve_technology(name).await?;

        if self.project_repo.technology_attached(technology.id, project_id).await? {
            return Err(AppError::Conflict(TECHNOLOGY_ALREADY_ATTACHED.to_string()));
        }

        ctx.technology = Some(technology);
        Ok(())
    }

    /// Resolves `name` against the catalog and requires it to be attached.
    pub async fn ensure_technology_detachable(&self, name: &str, ctx: &mut RequestContext) -> Result<(), AppError> {
        let project_id = ctx.project()?.id;
        let technology = self.resolve_technology(name).await?;

        if !self.project_repo.technology_attached(technology.id, project_id).await? {
            return Err(AppError::bad_request(TECHNOLOGY_NOT_RELATED));
        }

        ctx.technology = Some(technology);
        Ok(())
    }

    async fn resolve_technology(&self, name: &str) -> Result<Technology, AppError> {
        let not_supported = || {
            tracing::debug!(technology = name, "technology outside the catalog");
            AppError::bad_request_with_options(TECHNOLOGY_NOT_SUPPORTED, TechnologyName::options())
        };

        if name.parse::<TechnologyName>().is_err() {
            return Err(not_supported());
        }

        self.project_repo.get_technology_by_name(name).await?
            .ok_or_else(not_supported)
    }

    pub async fn create_project(&self, request: NewProject) -> Result<Project, AppError> {
        let project = self.project_repo.create_project(&request).await
            .map_err(|e| match e {
                // the owner was deleted after the check ran
                AppError::NotFound(_) => AppError::NotFound("Developer not found.".to_string()),
                _ => e,
            })?;

        tracing::info!(project_id = project.id, developer_id = project.developer_id, "Project created");
        Ok(project)
    }

    pub async fn get_project_with_technologies(&self, ctx: &RequestContext) -> Result<Vec<ProjectTechnologyRow>, AppError> {
        let project = ctx.project()?;

        let rows = self.project_repo.get_project_with_technologies(project.id).await?;
        if rows.is_empty() {
            return Err(AppError::NotFound("Project not found.".to_string()));
        }

        Ok(rows)
    }

    pub async fn update_project(&self, ctx: &RequestContext, changes: UpdateProject) -> Result<Project, AppError> {
        let project = ctx.project()?;

        if changes.is_empty() {
            return Err(AppError::bad_request("No fields provided for update."));
        }

        let updated = self.project_repo.update_project(project.id, &changes).await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::NotFound("Developer not found.".to_string()),
                _ => e,
            })?
            .ok_or_else(|| AppError::NotFound("Project not found.".to_string()))?;

        tracing::info!(project_id = updated.id, "Project updated");
        Ok(updated)
    }

    pub async fn delete_project(&self, ctx: &RequestContext) -> Result<(), AppError> {
        let project = ctx.project()?;

        let deleted = self.project_repo.delete_project(project.id).await?;

        tracing::info!(project_id = project.id, deleted, "Project deleted");
        Ok(())
    }

    pub async fn attach_technology(&self, ctx: &RequestContext) -> Result<TechnologyAssociation, AppError> {
        let project = ctx.project()?;
        let technology = ctx.technology()?;

        let link = ProjectTechnologyInsert::today(technology.id, project.id);

        let association = self.project_repo.attach_technology(&link).await?
            .ok_or_else(|| AppError::Conflict(TECHNOLOGY_ALREADY_ATTACHED.to_string()))?;

        tracing::info!(project_id = project.id, technology = %technology.name, "Technology attached");
        Ok(association)
    }

    pub async fn detach_technology(&self, ctx: &RequestContext) -> Result<(), AppError> {
        let project = ctx.project()?;
        let technology = ctx.technology()?;

        let removed = self.project_repo.detach_technology(technology.id, project.id).await?;
        if removed == 0 {
            return Err(AppError::bad_request(TECHNOLOGY_NOT_RELATED));
        }

        tracing::info!(project_id = project.id, technology = %technology.name, "Technology detached");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mockall::predicate::eq;

    use super::*;
    use crate::{
        entities::developer::Developer,
        repositories::{developer::MockDeveloperRepository, project::MockProjectRepository},
    };

    fn project() -> Project {
        Project {
            id: 10,
            name: "Kanban".into(),
            description: None,
            estimated_time: Some("2 weeks".into()),
            repository: None,
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            end_date: None,
            developer_id: 1,
        }
    }

    fn react() -> Technology {
        Technology {
            id: 3,
            name: "React".into(),
        }
    }

    fn handler(projects: MockProjectRepository, developers: MockDeveloperRepository) -> ProjectHandler {
        ProjectHandler::new(Arc::new(projects), Arc::new(developers))
    }

    fn with_project() -> RequestContext {
        RequestContext {
            project: Some(project()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn project_for_unknown_developer_is_not_found() {
        let mut developers = MockDeveloperRepository::new();
        developers.expect_get_developer_by_id()
            .with(eq(99))
            .returning(|_| Ok(None));

        let result = handler(MockProjectRepository::new(), developers)
            .ensure_project_developer_exists(Some(99))
            .await;

        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Developer not found."));
    }

    #[tokio::test]
    async fn owner_check_is_skipped_when_owner_is_unchanged() {
        let mut developers = MockDeveloperRepository::new();
        developers.expect_get_developer_by_id().never();

        let result = handler(MockProjectRepository::new(), developers)
            .ensure_project_developer_exists(None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn owner_check_passes_for_existing_developer() {
        let mut developers = MockDeveloperRepository::new();
        developers.expect_get_developer_by_id()
            .returning(|id| Ok(Some(Developer {
                id,
                name: "Ana".into(),
                email: "ana@mail.com".into(),
            })));

        let result = handler(MockProjectRepository::new(), developers)
            .ensure_project_developer_exists(Some(1))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn missing_project_is_not_found() {
        let mut projects = MockProjectRepository::new();
        projects.expect_get_project_by_id().returning(|_| Ok(None));

        let mut ctx = RequestContext::new();
        let result = handler(projects, MockDeveloperRepository::new())
            .ensure_project_exists(10, &mut ctx)
            .await;

        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Project not found."));
        assert!(ctx.project.is_none());
    }

    #[tokio::test]
    async fn technology_outside_catalog_lists_options_without_querying() {
        let mut projects = MockProjectRepository::new();
        projects.expect_get_technology_by_name().never();

        let mut ctx = with_project();
        let result = handler(projects, MockDeveloperRepository::new())
            .ensure_technology_attachable("Rust", &mut ctx)
            .await;

        match result {
            Err(AppError::BadRequest { message, options }) => {
                assert_eq!(message, "Technology not supported.");
                assert_eq!(options.map(|o| o.len()), Some(9));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn catalog_name_missing_from_table_is_not_supported() {
        let mut projects = MockProjectRepository::new();
        projects.expect_get_technology_by_name().returning(|_| Ok(None));

        let mut ctx = with_project();
        let result = handler(projects, MockDeveloperRepository::new())
            .ensure_technology_attachable("Django", &mut ctx)
            .await;

        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn already_attached_technology_is_a_conflict() {
        let mut projects = MockProjectRepository::new();
        projects.expect_get_technology_by_name().returning(|_| Ok(Some(react())));
        projects.expect_technology_attached()
            .with(eq(3), eq(10))
            .returning(|_, _| Ok(true));

        let mut ctx = with_project();
        let result = handler(projects, MockDeveloperRepository::new())
            .ensure_technology_attachable("React", &mut ctx)
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert!(ctx.technology.is_none());
    }

    #[tokio::test]
    async fn attachable_technology_is_stored_in_context() {
        let mut projects = MockProjectRepository::new();
        projects.expect_get_technology_by_name().returning(|_| Ok(Some(react())));
        projects.expect_technology_attached().returning(|_, _| Ok(false));

        let mut ctx = with_project();
        handler(projects, MockDeveloperRepository::new())
            .ensure_technology_attachable("React", &mut ctx)
            .await
            .unwrap();

        assert_eq!(ctx.technology, Some(react()));
    }

    #[tokio::test]
    async fn detaching_an_unrelated_technology_is_a_bad_request() {
        let mut projects = MockProjectRepository::new();
        projects.expect_get_technology_by_name().returning(|_| Ok(Some(react())));
        projects.expect_technology_attached().returning(|_, _| Ok(false));

        let mut ctx = with_project();
        let result = handler(projects, MockDeveloperRepository::new())
            .ensure_technology_detachable("React", &mut ctx)
            .await;

        assert!(matches!(
            result,
            Err(AppError::BadRequest { message, options: None }) if message == "Technology not related to the project."
        ));
    }

    #[tokio::test]
    async fn attach_race_surfaces_as_conflict() {
        let mut projects = MockProjectRepository::new();
        projects.expect_attach_technology()
            .withf(|link| link.project_id == 10 && link.technology_id == 3)
            .returning(|_| Ok(None));

        let ctx = RequestContext {
            project: Some(project()),
            technology: Some(react()),
            ..Default::default()
        };
        let result = handler(projects, MockDeveloperRepository::new())
            .attach_technology(&ctx)
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn detach_race_surfaces_as_bad_request() {
        let mut projects = MockProjectRepository::new();
        projects.expect_detach_technology().returning(|_, _| Ok(0));

        let ctx = RequestContext {
            project: Some(project()),
            technology: Some(react()),
            ..Default::default()
        };
        let result = handler(projects, MockDeveloperRepository::new())
            .detach_technology(&ctx)
            .await;

        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn attach_requires_a_resolved_technology() {
        let mut projects = MockProjectRepository::new();
        projects.expect_attach_technology().never();

        let result = handler(projects, MockDeveloperRepository::new())
            .attach_technology(&with_project())
            .await;

        assert!(matches!(result, Err(AppError::InternalError(_))));
    }

    #[tokio::test]
    async fn project_read_returns_every_technology_row() {
        let mut projects = MockProjectRepository::new();
        projects.expect_get_project_with_technologies()
            .with(eq(10))
            .returning(|id| {
                Ok(["React", "CSS"].iter().enumerate().map(|(i, name)| ProjectTechnologyRow {
                    project_id: id,
                    project_name: "Kanban".into(),
                    project_description: None,
                    project_estimated_time: None,
                    project_repository: None,
                    project_start_date: None,
                    project_end_date: None,
                    project_developer_id: 1,
                    technology_id: Some(i as i32 + 1),
                    technology_name: Some(name.to_string()),
                }).collect())
            });

        let rows = handler(projects, MockDeveloperRepository::new())
            .get_project_with_technologies(&with_project())
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].technology_name.as_deref(), Some("CSS"));
    }
}
