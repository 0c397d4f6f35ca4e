use serde_json::Value;
use sqlx::{postgres::PgArguments, FromRow, PgPool, Row};

use super::types::SqlResult;

/// Run a generated SELECT, binding accumulated values positionally.
pub async fn fetch_all<T>(pool: &PgPool, sql: &SqlResult) -> Result<Vec<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    let mut q = sqlx::query_as::<_, T>(&sql.query);
    for p in sql.params.iter() {
        q = bind_value_as(q, p);
    }
    q.fetch_all(pool).await
}

/// Run the matching COUNT query.
pub async fn fetch_count(pool: &PgPool, sql: &SqlResult) -> Result<i64, sqlx::Error> {
    let mut q = sqlx::query(&sql.query);
    for p in sql.params.iter() {
        q = bind_value(q, p);
    }
    let row = q.fetch_one(pool).await?;
    row.try_get("count")
}

fn bind_value<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        other => q.bind(other.to_string()),
    }
}

fn bind_value_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        other => q.bind(other.to_string()),
    }
}
