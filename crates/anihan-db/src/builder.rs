//! Small SQL builders for filtered listings and partial updates.

use crate::Value;

/// Builds `SELECT ... WHERE 1=1 AND ...` listings.
///
/// # Example
///
/// ```rust,ignore
/// let (sql, params) = Select::from("SELECT * FROM products")
///     .filter("category", Some("compost"))
///     .filter("is_available", None::<bool>)
///     .order_by("created_at DESC, id DESC")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct Select {
    base: String,
    clauses: Vec<String>,
    params: Vec<Value>,
    order_by: Option<String>,
}

impl Select {
    /// Start from a base `SELECT ... FROM ...` statement without a WHERE clause.
    pub fn from(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            clauses: Vec::new(),
            params: Vec::new(),
            order_by: None,
        }
    }

    /// Add `column = ?` when `value` is present.
    pub fn filter<T: Into<Value>>(mut self, column: &str, value: Option<T>) -> Self {
        if let Some(value) = value {
            self.clauses.push(format!("{column} = ?"));
            self.params.push(value.into());
        }
        self
    }

    /// Add a raw condition with its parameters.
    pub fn condition(mut self, clause: impl Into<String>, params: Vec<Value>) -> Self {
        self.clauses.push(clause.into());
        self.params.extend(params);
        self
    }

    /// Set the ORDER BY expression.
    pub fn order_by(mut self, order: impl Into<String>) -> Self {
        self.order_by = Some(order.into());
        self
    }

    /// Render the statement and its positional parameters.
    pub fn build(self) -> (String, Vec<Value>) {
        let mut sql = format!("{} WHERE 1=1", self.base);
        for clause in &self.clauses {
            sql.push_str(" AND ");
            sql.push_str(clause);
        }
        if let Some(order) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }
        (sql, self.params)
    }
}

/// Builds `UPDATE table SET ... WHERE id = ?` from the fields that were supplied.
///
/// Every non-empty update also refreshes `updated_at`.
#[derive(Debug, Clone)]
pub struct Update {
    table: &'static str,
    columns: Vec<&'static str>,
    params: Vec<Value>,
}

impl Update {
    /// Start an update of `table`.
    pub fn table(table: &'static str) -> Self {
        Self {
            table,
            columns: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Set `column` unconditionally.
    pub fn set<T: Into<Value>>(mut self, column: &'static str, value: T) -> Self {
        self.columns.push(column);
        self.params.push(value.into());
        self
    }

    /// Set `column` only when `value` is present.
    pub fn set_opt<T: Into<Value>>(self, column: &'static str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.set(column, value),
            None => self,
        }
    }

    /// Whether any column was set.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Whether `column` was set.
    pub fn touches(&self, column: &str) -> bool {
        self.columns.iter().any(|c| *c == column)
    }

    /// Render the statement for row `id`, or `None` when nothing was set.
    pub fn build(self, id: impl Into<Value>) -> Option<(String, Vec<Value>)> {
        if self.columns.is_empty() {
            return None;
        }
        let assignments = self
            .columns
            .iter()
            .map(|c| format!("{c} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {}, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            self.table, assignments
        );
        let mut params = self.params;
        params.push(id.into());
        Some((sql, params))
    }
}
