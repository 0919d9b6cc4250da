use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::data::{DataError, DataService, Filter, Record, SelectQuery, SortDirection};
use crate::{CATEGORIES_TABLE, CREATED_FIELD_NAME, ID_FIELD_NAME, POSTS_TABLE, SLUG_FIELD_NAME, TAGS_TABLE};

/// In-process data service holding every table as a vector of JSON records.
///
/// Used for local runs without a database and as the store behind the async
/// tests. Besides plain storage it can enforce unique fields, fail a table on
/// demand and delay the next select of a table.
#[derive(Clone, Default)]
pub struct MemoryDataService {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    tables: RwLock<HashMap<String, Vec<Record>>>,
    unique_fields: RwLock<HashMap<String, Vec<String>>>,
    failing: RwLock<HashSet<String>>,
    delays: RwLock<HashMap<String, Duration>>,
    selects: RwLock<HashMap<String, usize>>,
}

impl MemoryDataService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the uniqueness rules of the blog schema.
    pub fn blog() -> Self {
        Self::new()
            .with_unique(POSTS_TABLE, SLUG_FIELD_NAME)
            .with_unique(CATEGORIES_TABLE, SLUG_FIELD_NAME)
            .with_unique(TAGS_TABLE, SLUG_FIELD_NAME)
    }

    pub fn with_unique(self, table: &str, field: &str) -> Self {
        write(&self.inner.unique_fields)
            .entry(table.to_string())
            .or_default()
            .push(field.to_string());
        self
    }

    /// Put records into a table as they are; only a missing id is generated.
    pub fn seed(&self, table: &str, records: impl IntoIterator<Item = Record>) {
        let mut tables = write(&self.inner.tables);
        let rows = tables.entry(table.to_string()).or_default();
        for mut record in records {
            record
                .entry(ID_FIELD_NAME)
                .or_insert_with(|| Value::String(uuid::Uuid::new_v4().to_string()));
            rows.push(record);
        }
    }

    /// Current content of a table
    pub fn rows(&self, table: &str) -> Vec<Record> {
        read(&self.inner.tables).get(table).cloned().unwrap_or_default()
    }

    /// Make every operation on `table` fail until `recover` is called.
    pub fn fail(&self, table: &str) {
        write(&self.inner.failing).insert(table.to_string());
    }

    pub fn recover(&self, table: &str) {
        write(&self.inner.failing).remove(table);
    }

    /// Delay the next select on `table`.
    pub fn delay_next(&self, table: &str, delay: Duration) {
        write(&self.inner.delays).insert(table.to_string(), delay);
    }

    /// Number of selects issued against `table` so far
    pub fn select_count(&self, table: &str) -> usize {
        read(&self.inner.selects).get(table).copied().unwrap_or(0)
    }

    fn check_available(&self, table: &str) -> Result<(), DataError> {
        if read(&self.inner.failing).contains(table) {
            return Err(DataError::Backend(format!("{} is unavailable", table)));
        }
        Ok(())
    }

    fn check_unique(&self, table: &str, rows: &[Record], candidate: &Record) -> Result<(), DataError> {
        let unique_fields = read(&self.inner.unique_fields);
        let Some(fields) = unique_fields.get(table) else {
            return Ok(());
        };
        let candidate_id = candidate.get(ID_FIELD_NAME);

        for field in fields {
            let Some(value) = candidate.get(field).filter(|v| !v.is_null()) else {
                continue;
            };
            let duplicate = rows
                .iter()
                .filter(|row| row.get(ID_FIELD_NAME) != candidate_id)
                .any(|row| row.get(field) == Some(value));
            if duplicate {
                return Err(DataError::Conflict(format!(
                    "duplicate value {} for {}.{}",
                    value, table, field
                )));
            }
        }
        Ok(())
    }
}

impl DataService for MemoryDataService {
    async fn select(&self, table: &str, query: SelectQuery) -> Result<Vec<Record>, DataError> {
        *write(&self.inner.selects).entry(table.to_string()).or_default() += 1;
        let delay = write(&self.inner.delays).remove(table);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check_available(table)?;

        let mut rows: Vec<Record> = read(&self.inner.tables)
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|filter| matches(row, filter)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        rows.sort_by(|a, b| {
            query.order.iter().fold(Ordering::Equal, |ordering, order| {
                ordering.then_with(|| {
                    let ordering = compare_values(a.get(&order.field), b.get(&order.field));
                    match order.direction {
                        SortDirection::Ascending => ordering,
                        SortDirection::Descending => ordering.reverse(),
                    }
                })
            })
        });

        if let Some(range) = query.range {
            rows = rows
                .into_iter()
                .skip(range.offset as usize)
                .take(range.limit as usize)
                .collect();
        }

        Ok(rows)
    }

    async fn insert(&self, table: &str, record: Record) -> Result<Record, DataError> {
        self.check_available(table)?;

        let mut record = record;
        record
            .entry(ID_FIELD_NAME)
            .or_insert_with(|| Value::String(uuid::Uuid::new_v4().to_string()));
        record
            .entry(CREATED_FIELD_NAME)
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));

        let mut tables = write(&self.inner.tables);
        let rows = tables.entry(table.to_string()).or_default();
        self.check_unique(table, rows, &record)?;
        rows.push(record.clone());

        Ok(record)
    }

    async fn update(&self, table: &str, id: &str, changes: Record) -> Result<Record, DataError> {
        self.check_available(table)?;

        let mut tables = write(&self.inner.tables);
        let rows = tables.entry(table.to_string()).or_default();
        let position = rows
            .iter()
            .position(|row| value_text(row.get(ID_FIELD_NAME)).as_deref() == Some(id))
            .ok_or_else(|| DataError::not_found(table))?;

        let mut updated = rows[position].clone();
        for (field, value) in changes {
            if field != ID_FIELD_NAME {
                updated.insert(field, value);
            }
        }
        self.check_unique(table, rows, &updated)?;
        rows[position] = updated.clone();

        Ok(updated)
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), DataError> {
        self.check_available(table)?;

        if let Some(rows) = write(&self.inner.tables).get_mut(table) {
            rows.retain(|row| value_text(row.get(ID_FIELD_NAME)).as_deref() != Some(id));
        }
        Ok(())
    }
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn matches(row: &Record, filter: &Filter) -> bool {
    match filter {
        Filter::Equals { field, value } => {
            let actual = value_text(row.get(field));
            actual.is_some() && actual == value_text(Some(value))
        }
        Filter::In { field, values } => {
            let actual = value_text(row.get(field));
            actual.is_some() && values.iter().any(|v| value_text(Some(v)) == actual)
        }
        Filter::IsNull { field } => row.get(field).is_none_or(Value::is_null),
        Filter::IsNotNull { field } => row.get(field).is_some_and(|v| !v.is_null()),
    }
}

/// Text form used for comparisons, the same way the SQL adapter casts columns to text.
fn value_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Nulls sort after every value, as in PostgreSQL.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => {
            match (parse_timestamp(a), parse_timestamp(b)) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => a.cmp(b),
            }
        }
        (Some(a), Some(b)) => value_text(Some(a)).cmp(&value_text(Some(b))),
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("record must be an object"),
        }
    }

    fn store_with_posts() -> MemoryDataService {
        let store = MemoryDataService::blog();
        store.seed(
            "posts",
            [
                record(json!({"id": "1", "slug": "a", "status": "published", "published_at": "2025-01-01T00:00:00Z"})),
                record(json!({"id": "2", "slug": "b", "status": "draft", "published_at": null})),
                record(json!({"id": "3", "slug": "c", "status": "published", "published_at": "2025-01-01T00:00:00.500Z"})),
                record(json!({"id": "4", "slug": "d", "status": "published", "published_at": "2024-12-31T23:59:59Z"})),
            ],
        );
        store
    }

    fn ids(rows: &[Record]) -> Vec<&str> {
        rows.iter().map(|r| r["id"].as_str().unwrap()).collect()
    }

    #[tokio::test]
    async fn select_filters_orders_and_ranges() {
        let store = store_with_posts();

        let rows = store
            .select(
                "posts",
                SelectQuery::new().eq("status", "published").order_desc("published_at"),
            )
            .await
            .unwrap();
        assert_eq!(ids(&rows), vec!["3", "1", "4"]);

        let page = store
            .select(
                "posts",
                SelectQuery::new().eq("status", "published").order_desc("published_at").range(1, 1),
            )
            .await
            .unwrap();
        assert_eq!(ids(&page), vec!["1"]);
    }

    #[tokio::test]
    async fn nulls_sort_last_ascending_and_first_descending() {
        let store = store_with_posts();

        let ascending = store.select("posts", SelectQuery::new().order_asc("published_at")).await.unwrap();
        assert_eq!(ids(&ascending).last(), Some(&"2"));

        let descending = store.select("posts", SelectQuery::new().order_desc("published_at")).await.unwrap();
        assert_eq!(ids(&descending).first(), Some(&"2"));
    }

    #[tokio::test]
    async fn null_filters_and_membership() {
        let store = store_with_posts();

        let unpublished = store.select("posts", SelectQuery::new().is_null("published_at")).await.unwrap();
        assert_eq!(ids(&unpublished), vec!["2"]);

        let some = store
            .select("posts", SelectQuery::new().any_of("slug", ["a", "d"]).order_asc("slug"))
            .await
            .unwrap();
        assert_eq!(ids(&some), vec!["1", "4"]);
    }

    #[tokio::test]
    async fn numbers_match_text_filters() {
        let store = MemoryDataService::new();
        store.seed("authors", [record(json!({"id": 7, "first_name": "Ada"}))]);

        let rows = store.select("authors", SelectQuery::new().eq("id", "7")).await.unwrap();

        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn insert_generates_id_and_enforces_unique_slug() {
        let store = store_with_posts();

        let inserted = store
            .insert("posts", record(json!({"slug": "fresh", "status": "draft"})))
            .await
            .unwrap();
        assert!(inserted.get("id").is_some());
        assert!(inserted.get("created_at").is_some());

        let duplicate = store
            .insert("posts", record(json!({"slug": "a", "status": "draft"})))
            .await;
        assert!(matches!(duplicate, Err(DataError::Conflict(_))));
    }

    #[tokio::test]
    async fn update_merges_changes_and_reports_missing_rows() {
        let store = store_with_posts();

        let updated = store
            .update("posts", "2", record(json!({"status": "published"})))
            .await
            .unwrap();
        assert_eq!(updated["status"], json!("published"));
        assert_eq!(updated["slug"], json!("b"));

        let missing = store.update("posts", "404", Record::new()).await;
        assert_eq!(missing, Err(DataError::not_found("posts")));

        let clash = store.update("posts", "2", record(json!({"slug": "a"}))).await;
        assert!(matches!(clash, Err(DataError::Conflict(_))));
    }

    #[tokio::test]
    async fn delete_removes_row_and_tolerates_missing() {
        let store = store_with_posts();

        store.delete("posts", "1").await.unwrap();
        store.delete("posts", "1").await.unwrap();

        assert_eq!(store.rows("posts").len(), 3);
    }

    #[tokio::test]
    async fn failing_table_rejects_every_operation() {
        let store = store_with_posts();
        store.fail("posts");

        assert!(matches!(
            store.select("posts", SelectQuery::new()).await,
            Err(DataError::Backend(_))
        ));
        assert!(store.delete("posts", "1").await.is_err());

        store.recover("posts");
        assert!(store.select("posts", SelectQuery::new()).await.is_ok());
    }

    #[tokio::test]
    async fn selects_are_counted_per_table() {
        let store = store_with_posts();

        store.select("posts", SelectQuery::new()).await.unwrap();
        store.select("posts", SelectQuery::new()).await.unwrap();

        assert_eq!(store.select_count("posts"), 2);
        assert_eq!(store.select_count("comments"), 0);
    }
}
