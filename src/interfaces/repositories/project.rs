use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    entities::{
        project::{NewProject, Project, ProjectTechnologyRow, UpdateProject},
        technology::{ProjectTechnologyInsert, Technology, TechnologyAssociation},
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxProjectRepo,
};

const PROJECT_COLUMNS: &str =
    "id, name, description, estimated_time, repository, start_date, end_date, developer_id";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn get_project_by_id(&self, id: i32) -> Result<Option<Project>, AppError>;
    async fn create_project(&self, project: &NewProject) -> Result<Project, AppError>;

    /// One row per attached technology, or a single row with null technology
    /// columns when there is none. Empty when the project does not exist.
    async fn get_project_with_technologies(&self, id: i32) -> Result<Vec<ProjectTechnologyRow>, AppError>;
    async fn update_project(&self, id: i32, changes: &UpdateProject) -> Result<Option<Project>, AppError>;
    async fn delete_project(&self, id: i32) -> Result<u64, AppError>;
    async fn get_technology_by_name(&self, name: &str) -> Result<Option<Technology>, AppError>;
    async fn technology_attached(&self, technology_id: i32, project_id: i32) -> Result<bool, AppError>;

    /// Inserts the join row and reads it back joined with the project.
    /// `None` when the pair was already attached.
    async fn attach_technology(&self, link: &ProjectTechnologyInsert) -> Result<Option<TechnologyAssociation>, AppError>;
    async fn detach_technology(&self, technology_id: i32, project_id: i32) -> Result<u64, AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn get_project_by_id(&self, id: i32) -> Result<Option<Project>, AppError> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1");

        sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn create_project(&self, project: &NewProject) -> Result<Project, AppError> {
        let sql = format!(
            r#"
            INSERT INTO projects (name, description, estimated_time, repository, start_date, end_date, developer_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PROJECT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Project>(&sql)
            .bind(&project.name)
            .bind(&project.description)
            .bind(&project.estimated_time)
            .bind(&project.repository)
            .bind(project.start_date)
            .bind(project.end_date)
            .bind(project.developer_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_project_with_technologies(&self, id: i32) -> Result<Vec<ProjectTechnologyRow>, AppError> {
        let rows = sqlx::query_as::<_, ProjectTechnologyRow>(
            r#"
            SELECT
                pj.id               AS project_id,
                pj.name             AS project_name,
                pj.description      AS project_description,
                pj.estimated_time   AS project_estimated_time,
                pj.repository       AS project_repository,
                pj.start_date       AS project_start_date,
                pj.end_date         AS project_end_date,
                pj.developer_id     AS project_developer_id,
                pt.technology_id    AS technology_id,
                th.name             AS technology_name
            FROM projects AS pj
            LEFT JOIN projects_technologies AS pt
                ON pt.project_id = pj.id
            LEFT JOIN technologies AS th
                ON th.id = pt.technology_id
            WHERE pj.id = $1
            ORDER BY pt.added_in NULLS FIRST, th.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn update_project(&self, id: i32, changes: &UpdateProject) -> Result<Option<Project>, AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE projects SET ");

        {
            let mut fields = builder.separated(", ");
            if let Some(name) = &changes.name {
                fields.push("name = ").push_bind_unseparated(name.clone());
            }
            if let Some(description) = &changes.description {
                fields.push("description = ").push_bind_unseparated(description.clone());
            }
            if let Some(estimated_time) = &changes.estimated_time {
                fields.push("estimated_time = ").push_bind_unseparated(estimated_time.clone());
            }
            if let Some(repository) = &changes.repository {
                fields.push("repository = ").push_bind_unseparated(repository.clone());
            }
            if let Some(start_date) = changes.start_date {
                fields.push("start_date = ").push_bind_unseparated(start_date);
            }
            if let Some(end_date) = changes.end_date {
                fields.push("end_date = ").push_bind_unseparated(end_date);
            }
            if let Some(developer_id) = changes.developer_id {
                fields.push("developer_id = ").push_bind_unseparated(developer_id);
            }
        }

        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING ").push(PROJECT_COLUMNS);

        builder
            .build_query_as::<Project>()
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn delete_project(&self, id: i32) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn get_technology_by_name(&self, name: &str) -> Result<Option<Technology>, AppError> {
        sqlx::query_as::<_, Technology>("SELECT id, name FROM technologies WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn technology_attached(&self, technology_id: i32, project_id: i32) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM projects_technologies
                WHERE technology_id = $1 AND project_id = $2
            )
            "#,
        )
        .bind(technology_id)
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn attach_technology(&self, link: &ProjectTechnologyInsert) -> Result<Option<TechnologyAssociation>, AppError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO projects_technologies (added_in, technology_id, project_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (technology_id, project_id) DO NOTHING
            "#,
        )
        .bind(link.added_in)
        .bind(link.technology_id)
        .bind(link.project_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let association = sqlx::query_as::<_, TechnologyAssociation>(
            r#"
            SELECT
                th.id               AS technology_id,
                th.name             AS technology_name,
                pt.added_in         AS added_in,
                pj.id               AS project_id,
                pj.name             AS project_name,
                pj.description      AS project_description,
                pj.estimated_time   AS project_estimated_time,
                pj.repository       AS project_repository,
                pj.start_date       AS project_start_date,
                pj.end_date         AS project_end_date
            FROM projects_technologies AS pt
            JOIN projects AS pj ON pj.id = pt.project_id
            JOIN technologies AS th ON th.id = pt.technology_id
            WHERE pt.project_id = $1 AND pt.technology_id = $2
            "#,
        )
        .bind(link.project_id)
        .bind(link.technology_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(association))
    }

    async fn detach_technology(&self, technology_id: i32, project_id: i32) -> Result<u64, AppError> {
        let result = sqlx::query(
            "DELETE FROM projects_technologies WHERE technology_id = $1 AND project_id = $2",
        )
        .bind(technology_id)
        .bind(project_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
