use quire_common::data::DataError;
use quire_common::is_eligible_identifier;

/// Alias every statement gives its table.
pub const TABLE_ALIAS: &str = "m";

// Represents a table in database
#[derive(Debug, Clone, Copy)]
pub struct Table<'a> {
    pub name: &'a str,
    pub alias: &'static str,
}

impl<'a> Table<'a> {
    /// Table names end up inside the SQL text, so only eligible identifiers are accepted
    pub fn try_new(name: &'a str) -> Result<Self, DataError> {
        ensure_identifier(name)?;
        Ok(Table {
            name,
            alias: TABLE_ALIAS,
        })
    }

    /// Get qualified table name with alias
    pub fn qualified(&self) -> String {
        format!("\"{}\" AS \"{}\"", self.name, self.alias)
    }

    /// Quoted table name without alias
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.name)
    }

    pub fn column(&self, name: &'a str) -> Result<Column<'a>, DataError> {
        ensure_identifier(name)?;
        Ok(Column {
            qualifier: self.alias,
            name,
        })
    }
}

/// Represents one column in the database table
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub qualifier: &'static str,
    pub name: &'a str,
}

impl<'a> Column<'a> {
    /// Get qualified column name
    pub fn qualified(&self) -> String {
        format!("\"{}\".\"{}\"", self.qualifier, self.name)
    }

    /// Column name without qualifier, as used in INSERT and SET lists
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.name)
    }

    /// Column rendered as text so any value type compares against a text parameter
    pub fn as_text(&self) -> String {
        format!("CAST({} AS TEXT)", self.qualified())
    }
}

fn ensure_identifier(name: &str) -> Result<(), DataError> {
    if is_eligible_identifier(name) {
        Ok(())
    } else {
        Err(DataError::Rejected(format!("'{}' is not a valid identifier", name)))
    }
}
