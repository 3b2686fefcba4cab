use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxDeveloperRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxProjectRepo {
    pub pool: PgPool,
}
