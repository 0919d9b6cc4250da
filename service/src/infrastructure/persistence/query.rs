use quire_common::data::{DataError, Filter, Record, SelectQuery, SortDirection};
use quire_common::ID_FIELD_NAME;
use serde_json::Value;

use crate::infrastructure::persistence::schema::{Column, Table};

/// Composable SELECT over one table; every row comes back as a single jsonb `record` column
#[derive(Debug, Clone)]
pub struct QueryBuilder<'a> {
    from_table: Table<'a>,
    where_conditions: Vec<Condition<'a>>,
    order_by: Vec<OrderBy<'a>>,
    limit: Option<u64>,
    offset: Option<u64>,
}

/// A where condition that will be AND'ed together
#[derive(Debug, Clone)]
pub enum Condition<'a> {
    /// field = value
    Equals {
        column: Column<'a>,
        value: Option<String>,
    },

    /// field IN (values)
    In {
        column: Column<'a>,
        values: Vec<Option<String>>,
    },

    /// field IS NULL
    IsNull { column: Column<'a> },

    /// field IS NOT NULL
    IsNotNull { column: Column<'a> },
}

#[derive(Debug, Clone)]
pub struct OrderBy<'a> {
    pub column: Column<'a>,
    pub direction: SortDirection,
}

impl<'a> QueryBuilder<'a> {
    pub fn from_table(table: Table<'a>) -> Self {
        QueryBuilder {
            from_table: table,
            where_conditions: vec![],
            order_by: vec![],
            limit: None,
            offset: None,
        }
    }

    /// Translate a select request, validating every field it names
    pub fn from_select(table: Table<'a>, query: &'a SelectQuery) -> Result<Self, DataError> {
        let mut builder = Self::from_table(table);

        for filter in &query.filters {
            let column = table.column(filter.field())?;
            let condition = match filter {
                Filter::Equals { value, .. } => Condition::Equals {
                    column,
                    value: value_text(value),
                },
                Filter::In { values, .. } => Condition::In {
                    column,
                    values: values.iter().map(value_text).collect(),
                },
                Filter::IsNull { .. } => Condition::IsNull { column },
                Filter::IsNotNull { .. } => Condition::IsNotNull { column },
            };
            builder = builder.where_condition(condition);
        }

        for order in &query.order {
            builder = builder.order_by(table.column(&order.field)?, order.direction);
        }

        if let Some(range) = query.range {
            builder = builder.limit(range.limit).offset(range.offset);
        }

        Ok(builder)
    }

    /// Add where condition
    pub fn where_condition(mut self, condition: Condition<'a>) -> Self {
        self.where_conditions.push(condition);
        self
    }

    pub fn order_by(mut self, column: Column<'a>, direction: SortDirection) -> Self {
        self.order_by.push(OrderBy { column, direction });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Build the SQL query string
    pub fn build(self) -> (String, Vec<SqlParameter>) {
        let mut sql = String::new();
        let mut params = Vec::new();
        let mut param_counter = 1;

        // SELECT clause
        sql.push_str(&format!("SELECT to_jsonb(\"{}\") AS record", self.from_table.alias));

        // FROM clause
        sql.push_str(&format!("\nFROM {}", self.from_table.qualified()));

        // WHERE clause
        if !self.where_conditions.is_empty() {
            let clauses: Vec<String> = self
                .where_conditions
                .iter()
                .map(|condition| {
                    let (condition_sql, condition_params) = condition.to_sql(&mut param_counter);
                    params.extend(condition_params);
                    condition_sql
                })
                .collect();
            sql.push_str("\nWHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        // ORDER BY clause, nulls last in both directions
        if !self.order_by.is_empty() {
            sql.push_str("\nORDER BY ");
            let order_clauses: Vec<String> = self
                .order_by
                .iter()
                .map(|ob| {
                    let direction = match ob.direction {
                        SortDirection::Ascending => "ASC",
                        SortDirection::Descending => "DESC",
                    };
                    format!("{} {} NULLS LAST", ob.column.qualified(), direction)
                })
                .collect();
            sql.push_str(&order_clauses.join(", "));
        }

        // LIMIT clause
        if let Some(limit) = self.limit {
            sql.push_str(&format!("\nLIMIT {}", limit));
        }
        // OFFSET clause
        if let Some(offset) = self.offset.filter(|offset| *offset > 0) {
            sql.push_str(&format!("\nOFFSET {}", offset));
        }

        (sql, params)
    }
}

impl Condition<'_> {
    pub fn to_sql(&self, param_counter: &mut usize) -> (String, Vec<SqlParameter>) {
        match self {
            Condition::Equals { column, value } => {
                let sql = format!("{} = ${}", column.as_text(), param_counter);
                *param_counter += 1;
                (sql, vec![SqlParameter::Text(value.clone())])
            }

            // an empty list matches nothing
            Condition::In { values, .. } if values.is_empty() => ("FALSE".to_string(), vec![]),

            Condition::In { column, values } => {
                let placeholders: Vec<String> = values
                    .iter()
                    .map(|_| {
                        let placeholder = format!("${}", param_counter);
                        *param_counter += 1;
                        placeholder
                    })
                    .collect();

                let sql = format!("{} IN ({})", column.as_text(), placeholders.join(", "));
                let params = values.iter().cloned().map(SqlParameter::Text).collect();
                (sql, params)
            }

            Condition::IsNull { column } => (format!("{} IS NULL", column.qualified()), vec![]),

            Condition::IsNotNull { column } => {
                (format!("{} IS NOT NULL", column.qualified()), vec![])
            }
        }
    }
}

/// `INSERT` taking the row as one jsonb parameter; columns missing from it keep their defaults
pub fn insert_statement(table: &Table, columns: &[Column]) -> String {
    let names = quoted_list(columns);
    format!(
        "INSERT INTO {}\n({names})\nSELECT {names} FROM jsonb_populate_record(NULL::{}, $1::jsonb)\nRETURNING to_jsonb(\"{}\") AS record",
        table.qualified(),
        table.quoted(),
        table.alias,
    )
}

/// `UPDATE` of one row by id: `$1` carries the changes as jsonb, `$2` the id
pub fn update_statement(table: &Table, columns: &[Column]) -> String {
    let names = quoted_list(columns);
    // a single column must not be parenthesised on the left-hand side
    let target = if columns.len() == 1 {
        names.clone()
    } else {
        format!("({})", names)
    };
    let id = Column {
        qualifier: table.alias,
        name: ID_FIELD_NAME,
    };
    format!(
        "UPDATE {}\nSET {target} = (SELECT {names} FROM jsonb_populate_record(NULL::{}, $1::jsonb))\nWHERE {} = $2\nRETURNING to_jsonb(\"{}\") AS record",
        table.qualified(),
        table.quoted(),
        id.as_text(),
        table.alias,
    )
}

pub fn delete_statement(table: &Table) -> String {
    let id = Column {
        qualifier: table.alias,
        name: ID_FIELD_NAME,
    };
    format!("DELETE FROM {}\nWHERE {} = $1", table.qualified(), id.as_text())
}

/// Columns named by a write payload, in payload order
pub fn record_columns<'a>(table: &Table<'a>, record: &'a Record) -> Result<Vec<Column<'a>>, DataError> {
    if record.is_empty() {
        return Err(DataError::Rejected(format!(
            "nothing to write to {}",
            table.name
        )));
    }
    record.keys().map(|key| table.column(key)).collect()
}

fn quoted_list(columns: &[Column]) -> String {
    columns
        .iter()
        .map(Column::quoted)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Filter values compare as text so one code path covers ids, enums and numbers
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// SQL parameter that will be bound to query
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParameter {
    Text(Option<String>),
    Json(Value),
}

impl SqlParameter {
    /// Bind to sqlx query
    pub fn bind_to_query<'q>(
        self,
        query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    ) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
        match self {
            SqlParameter::Text(s) => query.bind(s),
            SqlParameter::Json(value) => query.bind(sqlx::types::Json(value)),
        }
    }
}
