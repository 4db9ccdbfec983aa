use super::{ColumnKind, date_text, datetime_text, decimal_text, nullable, timestamp_text};
use crate::{Database, QueryError, Row};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::mysql::{MySql, MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::types::chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{Column, ConnectOptions, Decode, Row as _, Type, TypeInfo};
use tokio::sync::Mutex;

/// A single long-lived MySQL session.
///
/// Statements queue on the session lock, so the connection sees one
/// statement at a time. A session lost after startup is not reopened.
pub struct MySqlDatabase {
    conn: Mutex<MySqlConnection>,
}

impl MySqlDatabase {
    /// Makes exactly one connection attempt. Fails with the driver's own
    /// error if the server can't be reached or rejects the credentials.
    pub async fn connect(options: MySqlConnectOptions) -> Result<Self, sqlx::Error> {
        let conn = options.connect().await?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl Database for MySqlDatabase {
    async fn fetch_all(&self, sql: &str) -> Result<Vec<Row>, QueryError> {
        let mut conn = self.conn.lock().await;
        let rows = sqlx::query(sql).fetch_all(&mut *conn).await?;
        log::trace!("mysql returned {} rows", rows.len());
        Ok(rows.iter().map(row_to_json).collect())
    }
}

fn row_to_json(row: &MySqlRow) -> Row {
    let mut out = Row::with_capacity(row.len());
    for (i, column) in row.columns().iter().enumerate() {
        let kind = ColumnKind::from_type_name(column.type_info().name());
        out.insert(column.name().to_string(), decode(row, i, kind));
    }
    out
}

fn get<'r, T>(row: &'r MySqlRow, i: usize) -> Option<Option<T>>
where
    T: Decode<'r, MySql> + Type<MySql>,
{
    row.try_get::<Option<T>, _>(i).ok()
}

fn decode(row: &MySqlRow, i: usize, kind: ColumnKind) -> Value {
    let typed = match kind {
        ColumnKind::Bool => get::<bool>(row, i).map(nullable),
        ColumnKind::Signed => get::<i64>(row, i).map(nullable),
        ColumnKind::Unsigned => get::<u64>(row, i).map(nullable),
        ColumnKind::Float => get::<f64>(row, i)
            .or_else(|| get::<f32>(row, i).map(|v| v.map(f64::from)))
            .map(nullable),
        ColumnKind::Decimal => row
            .try_get_unchecked::<Option<String>, _>(i)
            .ok()
            .map(decimal_text),
        ColumnKind::DateTime => {
            get::<NaiveDateTime>(row, i).map(|v| nullable(v.as_ref().map(datetime_text)))
        }
        ColumnKind::Timestamp => {
            get::<DateTime<Utc>>(row, i).map(|v| nullable(v.as_ref().map(timestamp_text)))
        }
        ColumnKind::Date => get::<NaiveDate>(row, i).map(|v| nullable(v.as_ref().map(date_text))),
        ColumnKind::Json => get::<Value>(row, i).map(|v| v.unwrap_or(Value::Null)),
        ColumnKind::Other => None,
    };
    typed.unwrap_or_else(|| fallback(row, i))
}

/// Best effort for column types without a dedicated mapping.
fn fallback(row: &MySqlRow, i: usize) -> Value {
    get::<String>(row, i)
        .map(nullable)
        .or_else(|| get::<i64>(row, i).map(nullable))
        .or_else(|| get::<f64>(row, i).map(nullable))
        .or_else(|| row.try_get_unchecked::<Option<String>, _>(i).ok().map(nullable))
        .unwrap_or(Value::Null)
}
