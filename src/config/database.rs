use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, Connection, PgPool};

use super::DatabaseSettings;

/// Runs `op` up to `attempts` times, sleeping `delay` between failures.
/// Returns the last error once attempts are exhausted.
pub async fn retry_fixed<T, E, F, Fut>(attempts: u32, delay: Duration, mut op: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;

    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts => {
                tracing::warn!(attempt, max_attempts = attempts, error = %e, "Attempt failed, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::error!(attempt, max_attempts = attempts, error = %e, "All attempts failed");
                return Err(e);
            }
        }
    }
}

async fn open_and_verify(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect(&settings.url)
        .await?;

    pool.acquire().await?.ping().await?;
    Ok(pool)
}

/// Opens the pool with bounded retries and a fixed backoff.
pub async fn connect_with_retry(settings: &DatabaseSettings) -> Result<PgPool> {
    let attempts = settings.connect_attempts;

    let pool = retry_fixed(attempts, settings.connect_delay, |attempt| {
        tracing::info!(attempt, max_attempts = attempts, "Connecting to postgres");
        open_and_verify(settings)
    })
    .await
    .with_context(|| format!("Could not connect to postgres after {} attempts", attempts))?;

    tracing::info!("Connected to postgres");
    Ok(pool)
}
