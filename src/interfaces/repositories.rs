pub mod developer;
pub mod project;
pub mod sqlx_repo;
