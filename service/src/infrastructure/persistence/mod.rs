use quire_common::data::{DataError, DataService, Record, SelectQuery};
use quire_common::database::Database;
use serde_json::Value;
use sqlx::error::ErrorKind;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::Row;

use crate::infrastructure::persistence::query::{
    QueryBuilder, SqlParameter, delete_statement, insert_statement, record_columns,
    update_statement,
};
use crate::infrastructure::persistence::schema::Table;

mod query;
mod schema;

/// Data service backed by PostgreSQL; each table holds one entity kind and
/// rows travel as jsonb.
#[derive(Clone, Debug)]
pub struct PostgresDataService {
    database: &'static Database,
}

impl PostgresDataService {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }
}

impl DataService for PostgresDataService {
    async fn select(&self, table: &str, query: SelectQuery) -> Result<Vec<Record>, DataError> {
        let table = Table::try_new(table)?;
        let (sql, params) = QueryBuilder::from_select(table, &query)?.build();
        tracing::debug!(schema = self.database.database_schema(), %sql, "select");

        let rows = params
            .into_iter()
            .fold(sqlx::query(&sql), |query, param| param.bind_to_query(query))
            .fetch_all(self.database.database_pool())
            .await
            .map_err(|e| map_error(table.name, e))?;

        rows.into_iter().map(|row| into_record(table.name, row)).collect()
    }

    async fn insert(&self, table: &str, record: Record) -> Result<Record, DataError> {
        let table = Table::try_new(table)?;
        let columns = record_columns(&table, &record)?;
        let sql = insert_statement(&table, &columns);
        tracing::debug!(%sql, "insert");

        let row = SqlParameter::Json(Value::Object(record))
            .bind_to_query(sqlx::query(&sql))
            .fetch_one(self.database.database_pool())
            .await
            .map_err(|e| map_error(table.name, e))?;

        into_record(table.name, row)
    }

    async fn update(&self, table: &str, id: &str, changes: Record) -> Result<Record, DataError> {
        let table = Table::try_new(table)?;
        let columns = record_columns(&table, &changes)?;
        let sql = update_statement(&table, &columns);
        tracing::debug!(%sql, id, "update");

        let row = SqlParameter::Json(Value::Object(changes))
            .bind_to_query(sqlx::query(&sql))
            .bind(id)
            .fetch_optional(self.database.database_pool())
            .await
            .map_err(|e| map_error(table.name, e))?
            .ok_or_else(|| DataError::not_found(table.name))?;

        into_record(table.name, row)
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), DataError> {
        let table = Table::try_new(table)?;
        let sql = delete_statement(&table);
        tracing::debug!(%sql, id, "delete");

        let result = sqlx::query(&sql)
            .bind(id)
            .execute(self.database.database_pool())
            .await
            .map_err(|e| map_error(table.name, e))?;

        if result.rows_affected() == 0 {
            tracing::debug!(table = table.name, id, "nothing to delete");
        }
        Ok(())
    }
}

fn into_record(table: &str, row: PgRow) -> Result<Record, DataError> {
    let Json(record): Json<Record> = row
        .try_get("record")
        .map_err(|e| DataError::Backend(format!("unreadable row from {}: {}", table, e)))?;
    Ok(record)
}

/// Constraint violations are the caller's problem; anything else is the store's
fn map_error(table: &str, error: sqlx::Error) -> DataError {
    match &error {
        sqlx::Error::RowNotFound => DataError::not_found(table),
        sqlx::Error::Database(db_error) => match db_error.kind() {
            ErrorKind::UniqueViolation | ErrorKind::ForeignKeyViolation => {
                DataError::Conflict(db_error.message().to_string())
            }
            ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
                DataError::Rejected(db_error.message().to_string())
            }
            _ => {
                tracing::error!(table, "database error: {}", error);
                DataError::Backend(error.to_string())
            }
        },
        _ => {
            tracing::error!(table, "database error: {}", error);
            DataError::Backend(error.to_string())
        }
    }
}
