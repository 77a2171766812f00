//! SQL INSERT rendering.
//!
//! Two layers, usable independently:
//!
//! - **Escaping**: [`quote_literal`] turns a string into a single-quoted SQL
//!   literal with embedded quotes doubled. [`InsertStatement::to_sql`] renders
//!   every value through it.
//! - **Parameterized**: [`InsertStatement::to_parameterized`] returns the
//!   statement with `$1..$n` placeholders and the values to bind, for callers
//!   that execute against a database driver.
//!
//! The literal form looks like:
//!
//! ```text
//! INSERT INTO domains (partnerPurchasePlanID, domain)
//! VALUES
//! ( 'ABC123', 'x.com' ),
//! ( 'DEF456', 'y.com' );
//! ```

use std::fmt;

use serde::Serialize;

use crate::error::{RenderError, RenderResult};
use crate::models::{ChargeableRecord, DomainRecord};

/// Name and columns of the chargeable table.
pub const CHARGEABLE_TABLE: TableSpec = TableSpec {
    name: "chargeable",
    columns: &["partnerID", "product", "partnerPurchasePlanID", "plan", "usage"],
};

/// Name and columns of the domains table.
pub const DOMAINS_TABLE: TableSpec = TableSpec {
    name: "domains",
    columns: &["partnerPurchasePlanID", "domain"],
};

/// A target table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

/// A value in a rendered statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Integer(i64),
    Text(String),
}

impl SqlValue {
    /// Render as a SQL literal.
    pub fn to_literal(&self) -> String {
        match self {
            SqlValue::Integer(n) => n.to_string(),
            SqlValue::Text(s) => quote_literal(s),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

/// Quote a string as a SQL literal, doubling embedded single quotes.
pub fn quote_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push('\'');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Rows that map onto a table.
pub trait TableRow {
    const TABLE: TableSpec;

    /// Values in [`TableSpec::columns`] order.
    fn values(&self) -> Vec<SqlValue>;
}

impl TableRow for ChargeableRecord {
    const TABLE: TableSpec = CHARGEABLE_TABLE;

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.partner_id.into(),
            self.product.as_str().into(),
            self.partner_purchase_plan_id.as_str().into(),
            self.plan.as_str().into(),
            self.usage.into(),
        ]
    }
}

impl TableRow for DomainRecord {
    const TABLE: TableSpec = DOMAINS_TABLE;

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.partner_purchase_plan_id.as_str().into(),
            self.domain.as_str().into(),
        ]
    }
}

/// A multi-row INSERT with at least one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    table: TableSpec,
    rows: Vec<Vec<SqlValue>>,
}

/// Statement text with placeholders, and the values to bind in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterizedStatement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl InsertStatement {
    /// Build a statement from raw value rows.
    ///
    /// Fails on an empty batch or on a row whose arity does not match the table.
    pub fn new(table: TableSpec, rows: Vec<Vec<SqlValue>>) -> RenderResult<Self> {
        if rows.is_empty() {
            return Err(RenderError::EmptyBatch { table: table.name });
        }
        if let Some((row, values)) = rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != table.columns.len())
        {
            return Err(RenderError::ArityMismatch {
                table: table.name,
                row,
                expected: table.columns.len(),
                found: values.len(),
            });
        }
        Ok(Self { table, rows })
    }

    /// Build a statement from typed rows.
    pub fn from_rows<R: TableRow>(rows: &[R]) -> RenderResult<Self> {
        Self::new(R::TABLE, rows.iter().map(R::values).collect())
    }

    pub fn table(&self) -> TableSpec {
        self.table
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn header(&self) -> String {
        format!(
            "INSERT INTO {} ({})\nVALUES\n",
            self.table.name,
            self.table.columns.join(", ")
        )
    }

    /// Render with every value inlined as a literal.
    pub fn to_sql(&self) -> String {
        let tuples: Vec<String> = self
            .rows
            .iter()
            .map(|row| {
                let values: Vec<String> = row.iter().map(SqlValue::to_literal).collect();
                format!("( {} )", values.join(", "))
            })
            .collect();
        format!("{}{};", self.header(), tuples.join(",\n"))
    }

    /// Render with `$n` placeholders, numbered row-major from 1.
    pub fn to_parameterized(&self) -> ParameterizedStatement {
        let mut params = Vec::with_capacity(self.rows.len() * self.table.columns.len());
        let tuples: Vec<String> = self
            .rows
            .iter()
            .map(|row| {
                let placeholders: Vec<String> = row
                    .iter()
                    .map(|value| {
                        params.push(value.clone());
                        format!("${}", params.len())
                    })
                    .collect();
                format!("( {} )", placeholders.join(", "))
            })
            .collect();
        ParameterizedStatement {
            sql: format!("{}{};", self.header(), tuples.join(",\n")),
            params,
        }
    }
}

impl fmt::Display for InsertStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// Render typed rows as a literal INSERT statement.
pub fn render_insert<R: TableRow>(rows: &[R]) -> RenderResult<String> {
    InsertStatement::from_rows(rows).map(|statement| statement.to_sql())
}
