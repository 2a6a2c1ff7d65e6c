use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Pool, Postgres, QueryBuilder};

use crate::database::Result;
use crate::database::capabilities::{Capability, SchemaCapabilities};
use crate::database::query::{Filter, OrderBy, PageRange, RowStore, ScanQuery, Value};
use crate::database::retry::RetryPolicy;

/// COUNT and the page SELECT must see the same snapshot. READ COMMITTED,
/// the default, takes a new snapshot per statement.
const SNAPSHOT_TRANSACTION: &str = "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY";

/// The Postgres-backed row store. Cheap to clone; clones share the pool and
/// the capability cache.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
    retry: RetryPolicy,
    capabilities: Arc<SchemaCapabilities>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>, retry: RetryPolicy) -> Self {
        Self {
            pool,
            retry,
            capabilities: Arc::new(SchemaCapabilities::default()),
        }
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Whether the connected schema supports `capability`. Detected once.
    pub async fn supports(&self, capability: Capability) -> bool {
        self.capabilities.detect(&self.pool, capability).await
    }
}

#[async_trait]
impl<T> RowStore<T> for PgStore
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static,
{
    fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    async fn scan(&self, query: &ScanQuery, range: PageRange) -> Result<(Vec<T>, i64)> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(SNAPSHOT_TRANSACTION).execute(&mut *tx).await?;

        let total: i64 = count_query(query)
            .build_query_scalar()
            .fetch_one(&mut *tx)
            .await?;
        let rows: Vec<T> = select_query(query, range)
            .build_query_as()
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok((rows, total))
    }
}

fn count_query(query: &ScanQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM ");
    builder.push(query.table);
    push_where(&mut builder, &query.filters);

    builder
}

fn select_query(query: &ScanQuery, range: PageRange) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT * FROM ");
    builder.push(query.table);
    push_where(&mut builder, &query.filters);
    push_order(&mut builder, &query.order_by);

    builder.push(" LIMIT ");
    builder.push_bind(range.limit);
    builder.push(" OFFSET ");
    builder.push_bind(range.offset);

    builder
}

fn push_where(builder: &mut QueryBuilder<'static, Postgres>, filters: &[Filter]) {
    for (i, filter) in filters.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        push_filter(builder, filter);
    }
}

fn push_filter(builder: &mut QueryBuilder<'static, Postgres>, filter: &Filter) {
    match filter {
        Filter::Eq { column, value } => {
            builder.push(column);
            builder.push(" = ");
            push_value(builder, value);
        }
        Filter::Related {
            column,
            table,
            key,
            filter,
        } => {
            builder.push(format!("{column} IN (SELECT {key} FROM {table} WHERE "));
            push_filter(builder, filter);
            builder.push(")");
        }
    }
}

fn push_value(builder: &mut QueryBuilder<'static, Postgres>, value: &Value) {
    match value {
        Value::Bool(value) => builder.push_bind(*value),
        Value::Int(value) => builder.push_bind(*value),
        Value::Text(value) => builder.push_bind(value.clone()),
    };
}

fn push_order(builder: &mut QueryBuilder<'static, Postgres>, order_by: &[OrderBy]) {
    for (i, order) in order_by.iter().enumerate() {
        builder.push(if i == 0 { " ORDER BY " } else { ", " });
        builder.push(order.column);
        builder.push(" ");
        builder.push(order.direction.as_sql());
    }
}
