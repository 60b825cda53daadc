use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

/// Creates a PostgreSQL connection pool and applies pending migrations.
pub async fn create_pool(database: &DatabaseConfig, max_connections: u32) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let options = connect_options(database)?;
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .context("Could not connect to database")?;

    info!("PostgreSQL connection pool established");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Database migration failed")?;

    info!("Database schema is up to date");
    Ok(pool)
}

fn connect_options(database: &DatabaseConfig) -> Result<PgConnectOptions> {
    match database {
        DatabaseConfig::Url(url) => {
            PgConnectOptions::from_str(url).context("DATABASE_URL is not a valid Postgres URL")
        }
        DatabaseConfig::Parts {
            host,
            name,
            user,
            password,
        } => Ok(PgConnectOptions::new()
            .host(host)
            .database(name)
            .username(user)
            .password(password)),
    }
}
