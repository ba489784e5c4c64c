use anyhow::Result;
use sqlx::SqlitePool;

use crate::domain::Measurement;

/// Fetch all measurements with `value >= threshold`, in insertion order.
///
/// Ordering by the auto-assigned `id` reproduces the order rows were
/// inserted, which is the only ordering the dashboard guarantees.
pub async fn at_least(pool: &SqlitePool, threshold: f64) -> Result<Vec<Measurement>> {
    let rows = sqlx::query_as::<_, Measurement>(
        r#"
        SELECT
            datetime,
            value
        FROM measurements
        WHERE value >= ?1
        ORDER BY id
        "#,
    )
    .bind(threshold)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
