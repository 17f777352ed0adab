use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::GroupsConfig;
use crate::error::Result;

pub async fn create_pool(config: &GroupsConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
