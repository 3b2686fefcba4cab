use std::sync::Arc;

use crate::repositories::{
    developer::DeveloperRepository,
    project::ProjectRepository,
    sqlx_repo::{SqlxDeveloperRepo, SqlxProjectRepo},
};

/// Repositories shared by every worker, all on one pool.
#[derive(Clone)]
pub struct SharedRepositories {
    pub developer_repo: Arc<dyn DeveloperRepository>,
    pub project_repo: Arc<dyn ProjectRepository>,
}

impl SharedRepositories {
    pub fn new(pool: sqlx::PgPool) -> Self {
        let developer_repo = Arc::new(SqlxDeveloperRepo::new(pool.clone()));
        let project_repo = Arc::new(SqlxProjectRepo::new(pool));

        SharedRepositories {
            developer_repo,
            project_repo,
        }
    }
}
