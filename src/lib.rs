mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod shared_repos;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{db, web};

use shared_repos::SharedRepositories;
use use_cases::{developers::DeveloperHandler, projects::ProjectHandler};

pub struct AppState {
    pub developer_handler: DeveloperHandler,
    pub project_handler: ProjectHandler,
}

impl AppState {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self::from_repositories(SharedRepositories::new(pool))
    }

    /// Builds the state on any repository implementation.
    pub fn from_repositories(repos: SharedRepositories) -> Self {
        AppState {
            developer_handler: DeveloperHandler::new(repos.developer_repo.clone()),
            project_handler: ProjectHandler::new(repos.project_repo, repos.developer_repo),
        }
    }
}
