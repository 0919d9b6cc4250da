use serde_json::Value;

/// Select request sent to the upstream service: filters are AND'ed together,
/// then ordering and range apply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectQuery {
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub range: Option<Range>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// field = value
    Equals { field: String, value: Value },

    /// field IN (values)
    In { field: String, values: Vec<Value> },

    /// field IS NULL
    IsNull { field: String },

    /// field IS NOT NULL
    IsNotNull { field: String },
}

impl Filter {
    pub fn field(&self) -> &str {
        match self {
            Filter::Equals { field, .. }
            | Filter::In { field, .. }
            | Filter::IsNull { field }
            | Filter::IsNotNull { field } => field,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub field: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Rows `[offset, offset + limit)` of the ordered result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub offset: u64,
    pub limit: u64,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add equality filter: field = value
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Equals {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    /// Add membership filter: field IN (values)
    pub fn any_of<V: Into<Value>>(mut self, field: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.filters.push(Filter::In {
            field: field.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn is_null(mut self, field: &str) -> Self {
        self.filters.push(Filter::IsNull {
            field: field.to_string(),
        });
        self
    }

    pub fn not_null(mut self, field: &str) -> Self {
        self.filters.push(Filter::IsNotNull {
            field: field.to_string(),
        });
        self
    }

    pub fn order_asc(mut self, field: &str) -> Self {
        self.order.push(Order {
            field: field.to_string(),
            direction: SortDirection::Ascending,
        });
        self
    }

    pub fn order_desc(mut self, field: &str) -> Self {
        self.order.push(Order {
            field: field.to_string(),
            direction: SortDirection::Descending,
        });
        self
    }

    /// Set offset and limit
    pub fn range(mut self, offset: u64, limit: u64) -> Self {
        self.range = Some(Range { offset, limit });
        self
    }

    /// Shorthand for the first `limit` rows
    pub fn limit(self, limit: u64) -> Self {
        self.range(0, limit)
    }

    /// Every field name the query refers to
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.filters
            .iter()
            .map(Filter::field)
            .chain(self.order.iter().map(|o| o.field.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn builder_accumulates_filters_in_order() {
        let query = SelectQuery::new()
            .eq("status", "published")
            .not_null("featured_image")
            .order_desc("published_at")
            .limit(3);

        assert_eq!(
            query.filters,
            vec![
                Filter::Equals { field: "status".into(), value: json!("published") },
                Filter::IsNotNull { field: "featured_image".into() },
            ]
        );
        assert_eq!(query.order[0].direction, SortDirection::Descending);
        assert_eq!(query.range, Some(Range { offset: 0, limit: 3 }));
    }

    #[test]
    fn fields_lists_filters_then_order() {
        let query = SelectQuery::new()
            .any_of("id", ["a", "b"])
            .order_asc("name");

        assert_eq!(query.fields().collect::<Vec<_>>(), vec!["id", "name"]);
    }
}
