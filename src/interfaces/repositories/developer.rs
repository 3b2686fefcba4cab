use std::borrow::Cow;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    entities::{
        developer::{Developer, DeveloperProfile, NewDeveloper, UpdateDeveloper},
        developer_info::{DeveloperInfo, DeveloperInfoInsert},
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxDeveloperRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeveloperRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn get_developer_by_id(&self, id: i32) -> Result<Option<Developer>, AppError>;
    async fn get_developer_by_email(&self, email: &str) -> Result<Option<Developer>, AppError>;
    async fn create_developer(&self, developer: &NewDeveloper) -> Result<Developer, AppError>;

    /// Developer left-joined with its info row.
    async fn get_developer_profile(&self, id: i32) -> Result<Option<DeveloperProfile>, AppError>;

    /// Writes only the fields set in `changes`. `None` when no row has `id`.
    async fn update_developer(&self, id: i32, changes: &UpdateDeveloper) -> Result<Option<Developer>, AppError>;
    async fn delete_developer(&self, id: i32) -> Result<u64, AppError>;
    async fn get_developer_info(&self, developer_id: i32) -> Result<Option<DeveloperInfo>, AppError>;
    async fn create_developer_info(&self, info: &DeveloperInfoInsert) -> Result<DeveloperInfo, AppError>;
}

impl SqlxDeveloperRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxDeveloperRepo { pool }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23505")))
}

#[async_trait]
impl DeveloperRepository for SqlxDeveloperRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn get_developer_by_id(&self, id: i32) -> Result<Option<Developer>, AppError> {
        sqlx::query_as::<_, Developer>("SELECT id, name, email FROM developers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_developer_by_email(&self, email: &str) -> Result<Option<Developer>, AppError> {
        sqlx::query_as::<_, Developer>("SELECT id, name, email FROM developers WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn create_developer(&self, developer: &NewDeveloper) -> Result<Developer, AppError> {
        sqlx::query_as::<_, Developer>(
            r#"
            INSERT INTO developers (name, email)
            VALUES ($1, $2)
            RETURNING id, name, email
            "#,
        )
        .bind(&developer.name)
        .bind(&developer.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Email already exists.".to_string())
            } else {
                AppError::from(e)
            }
        })
    }

    async fn get_developer_profile(&self, id: i32) -> Result<Option<DeveloperProfile>, AppError> {
        sqlx::query_as::<_, DeveloperProfile>(
            r#"
            SELECT
                dv.id                AS developer_id,
                dv.name              AS developer_name,
                dv.email             AS developer_email,
                di.developer_since   AS developer_info_developer_since,
                di.preferred_os      AS developer_info_preferred_os
            FROM developers AS dv
            LEFT JOIN developer_infos AS di
                ON di.developer_id = dv.id
            WHERE dv.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn update_developer(&self, id: i32, changes: &UpdateDeveloper) -> Result<Option<Developer>, AppError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE developers SET ");

        {
            let mut fields = builder.separated(", ");
            if let Some(name) = &changes.name {
                fields.push("name = ").push_bind_unseparated(name.clone());
            }
            if let Some(email) = &changes.email {
                fields.push("email = ").push_bind_unseparated(email.clone());
            }
        }

        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING id, name, email");

        builder
            .build_query_as::<Developer>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict("Email already exists.".to_string())
                } else {
                    AppError::from(e)
                }
            })
    }

    async fn delete_developer(&self, id: i32) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM developers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn get_developer_info(&self, developer_id: i32) -> Result<Option<DeveloperInfo>, AppError> {
        sqlx::query_as::<_, DeveloperInfo>(
            r#"
            SELECT id, developer_since, preferred_os, developer_id
            FROM developer_infos
            WHERE developer_id = $1
            "#,
        )
        .bind(developer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn create_developer_info(&self, info: &DeveloperInfoInsert) -> Result<DeveloperInfo, AppError> {
        sqlx::query_as::<_, DeveloperInfo>(
            r#"
            INSERT INTO developer_infos (developer_since, preferred_os, developer_id)
            VALUES ($1, $2, $3)
            RETURNING id, developer_since, preferred_os, developer_id
            "#,
        )
        .bind(info.developer_since)
        .bind(info.preferred_os.to_string())
        .bind(info.developer_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Developer infos already exists.".to_string())
            } else {
                AppError::from(e)
            }
        })
    }
}
