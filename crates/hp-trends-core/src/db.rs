use std::time::Duration;

use sqlx::{mysql::MySqlPoolOptions, MySql, Pool};
use tracing::info;

use crate::error::Result;

pub type DbPool = Pool<MySql>;

/// Open the single connection a report run needs.
///
/// There is no retry: a report is a batch job and a connection failure ends it.
pub async fn connect(database_url: &str) -> Result<DbPool> {
    let pool = MySqlPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await?;

    info!("Database connection established");
    Ok(pool)
}

/// Resolve the connection URL from `DATABASE_URL`, falling back to
/// `HP_TRENDS_DATABASE_URL`.
pub fn database_url_from_env() -> Result<String> {
    std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("HP_TRENDS_DATABASE_URL"))
        .map_err(Into::into)
}
