//! Query-string builders for PostgREST-style reads.
//!
//! A read is `GET /rest/v1/<table>?select=<cols>&<column>=<op>.<value>`.
//! [`Query`] collects the projection and filters as ordered key/value pairs
//! that the client appends to the table URL.

use std::fmt::Display;

/// Projection and row filters for a single table read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    /// Starts a query projecting the given columns.
    #[must_use]
    pub fn select(columns: &[&str]) -> Self {
        Self {
            pairs: vec![("select".to_string(), columns.join(","))],
        }
    }

    /// Keeps rows where `column` equals `value`.
    #[must_use]
    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "eq", value)
    }

    /// Keeps rows where `column` is strictly greater than `value`.
    #[must_use]
    pub fn gt(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "gt", value)
    }

    /// Caps the number of returned rows.
    #[must_use]
    pub fn limit(mut self, rows: u32) -> Self {
        self.pairs.push(("limit".to_string(), rows.to_string()));
        self
    }

    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    fn filter(mut self, column: &str, op: &str, value: impl Display) -> Self {
        self.pairs
            .push((column.to_string(), format!("{op}.{value}")));
        self
    }
}
