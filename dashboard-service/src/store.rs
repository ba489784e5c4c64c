use aq_client::domain::Measurement;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    QueryBuilder, Sqlite,
};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS measurements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    datetime TEXT NOT NULL,
    value REAL NOT NULL
)
"#;

// SQLite caps bound parameters per statement; two binds per row keeps each
// chunk well under the limit.
const INSERT_CHUNK: usize = 500;

pub struct MeasurementStore {
    pool: SqlitePool,
}

impl MeasurementStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the SQLite file backing the dashboard.
    pub async fn connect(path: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the measurements table if it does not exist yet.
    ///
    /// Called once at startup so a listing before the first refresh sees an
    /// empty table rather than a missing one.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await.map(|_| ())
    }

    /// Drop and recreate the measurements table. All prior records are lost.
    pub async fn reset(&self) -> Result<(), sqlx::Error> {
        sqlx::query("DROP TABLE IF EXISTS measurements")
            .execute(&self.pool)
            .await?;
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await.map(|_| ())
    }

    /// Insert records in bulk, in order, inside a single transaction.
    ///
    /// Ids are assigned by the engine. Returns the number of rows written.
    pub async fn insert_many(&self, records: &[Measurement]) -> Result<u64, sqlx::Error> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        for chunk in records.chunks(INSERT_CHUNK) {
            let mut builder =
                QueryBuilder::<Sqlite>::new("INSERT INTO measurements (datetime, value) ");
            builder.push_values(chunk, |mut b, m| {
                b.push_bind(&m.datetime).push_bind(m.value);
            });
            builder.build().execute(&mut *tx).await?;
        }
        tx.commit().await?;

        metrics::counter!("measurements_inserted_total").increment(records.len() as u64);

        Ok(records.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aq_client::db::measurement_queries;

    async fn memory_store() -> MeasurementStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite pool");
        let store = MeasurementStore::new(pool);
        store.ensure_schema().await.expect("schema");
        store
    }

    fn reading(datetime: &str, value: f64) -> Measurement {
        Measurement {
            datetime: datetime.to_string(),
            value,
        }
    }

    #[tokio::test]
    async fn insert_many_preserves_insertion_order() {
        let store = memory_store().await;
        let records = vec![
            reading("2023-01-01T02:00:00Z", 30.0),
            reading("2023-01-01T00:00:00Z", 10.0),
            reading("2023-01-01T01:00:00Z", 20.0),
        ];

        let inserted = store.insert_many(&records).await.expect("insert");
        assert_eq!(inserted, 3);

        let stored = measurement_queries::at_least(store.pool(), 0.0)
            .await
            .expect("query");
        assert_eq!(stored, records);
    }

    #[tokio::test]
    async fn insert_many_with_no_records_is_a_noop() {
        let store = memory_store().await;

        let inserted = store.insert_many(&[]).await.expect("insert");
        assert_eq!(inserted, 0);

        let stored = measurement_queries::at_least(store.pool(), 0.0)
            .await
            .expect("query");
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn reset_discards_all_prior_records() {
        let store = memory_store().await;
        store
            .insert_many(&[reading("2023-01-01T00:00:00Z", 42.0)])
            .await
            .expect("insert");

        store.reset().await.expect("reset");

        let stored = measurement_queries::at_least(store.pool(), 0.0)
            .await
            .expect("query");
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn at_least_filters_below_threshold_and_keeps_boundary() {
        let store = memory_store().await;
        store
            .insert_many(&[
                reading("2023-01-01T00:00:00Z", 5.0),
                reading("2023-01-01T01:00:00Z", 12.3),
                reading("2023-01-01T02:00:00Z", 10.0),
            ])
            .await
            .expect("insert");

        let risky = measurement_queries::at_least(store.pool(), 10.0)
            .await
            .expect("query");
        assert_eq!(
            risky,
            vec![
                reading("2023-01-01T01:00:00Z", 12.3),
                reading("2023-01-01T02:00:00Z", 10.0),
            ]
        );
    }
}
