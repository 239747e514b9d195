use sqlx::PgPool;

/// Create the game tables and indexes if they do not exist yet. Safe to rerun.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(include_str!("../../sql/schema.sql"))
        .execute(pool)
        .await?;
    tracing::debug!("schema applied");
    Ok(())
}
