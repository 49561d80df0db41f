//! Builds the parameterized statements for listing, counting and summing transactions.
//!
//! Filter values are never interpolated into the SQL text. Each [Predicate]
//! renders a fragment with a numbered placeholder and pushes its value onto
//! the parameter list, so the same filter set always yields the same SQL.

use rusqlite::types::Value;

use crate::{
    pagination::PageRequest,
    transaction::{
        core::TRANSACTION_COLUMNS,
        filter::{FilterSet, Predicate},
    },
};

/// A SQL statement and the values bound to its placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    /// The SQL text with `?N` placeholders.
    pub sql: String,
    /// The value for placeholder `?N` is at index `N - 1`.
    pub params: Vec<Value>,
}

/// Fetch the transactions matching `filters`, ordered by ID ascending.
///
/// When `page` is `None` every matching row is returned.
#[derive(Debug, Clone, PartialEq)]
pub struct RowQuery {
    /// The filters a row must match.
    pub filters: FilterSet,
    /// The window of rows to return.
    pub page: Option<PageRequest>,
}

/// Count the transactions matching `filters`.
#[derive(Debug, Clone, PartialEq)]
pub struct CountQuery {
    /// The filters a row must match.
    pub filters: FilterSet,
}

/// Sum the income and expense amounts of the transactions matching `filters`.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalsQuery {
    /// The filters a row must match.
    pub filters: FilterSet,
}

/// The statements needed to serve one page of a filtered listing.
///
/// Both queries share the same filter set so that the page and the page
/// count describe the same rows.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    /// The rows on the requested page.
    pub rows: RowQuery,
    /// The number of rows across all pages.
    pub count: CountQuery,
    /// The requested page.
    pub page: PageRequest,
}

impl QueryPlan {
    /// Plan the listing of `page` for the rows matching `filters`.
    pub fn new(filters: FilterSet, page: PageRequest) -> Self {
        Self {
            rows: RowQuery {
                filters: filters.clone(),
                page: Some(page),
            },
            count: CountQuery { filters },
            page,
        }
    }
}

/// Accumulates the WHERE clause and its bound values.
struct WhereClause {
    conditions: Vec<String>,
    params: Vec<Value>,
}

impl WhereClause {
    fn from_filters(filters: &FilterSet) -> Self {
        let mut clause = Self {
            conditions: Vec::new(),
            params: Vec::new(),
        };

        for predicate in filters.predicates() {
            let (column, value) = match predicate {
                Predicate::Date(date) => ("date", Value::Text(date.clone())),
                Predicate::Amount(amount) => ("amount", Value::Real(*amount)),
                Predicate::Category(category) => ("category", Value::Text(category.clone())),
                Predicate::TransactionType(transaction_type) => {
                    ("transaction_type", Value::Text(transaction_type.clone()))
                }
                Predicate::Spender(spender_id) => ("spender_id", Value::Integer(*spender_id)),
            };

            clause.push(column, value);
        }

        clause
    }

    fn push(&mut self, column: &str, value: Value) {
        self.params.push(value);
        self.conditions
            .push(format!("{column} = ?{}", self.params.len()));
    }

    /// The clause always has at least the `TRUE` base condition.
    fn sql(&self) -> String {
        std::iter::once("TRUE")
            .chain(self.conditions.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

/// SQLite binds integers as signed 64-bit values.
fn to_sql_integer(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl RowQuery {
    /// Render the statement selecting all transaction columns.
    pub fn to_sql(&self) -> SqlStatement {
        let mut clause = WhereClause::from_filters(&self.filters);

        let mut sql = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE {} ORDER BY id ASC",
            clause.sql()
        );

        if let Some(page) = self.page {
            clause.params.push(Value::Integer(to_sql_integer(page.size())));
            clause
                .params
                .push(Value::Integer(to_sql_integer(page.offset())));
            sql.push_str(&format!(
                " LIMIT ?{} OFFSET ?{}",
                clause.params.len() - 1,
                clause.params.len()
            ));
        }

        SqlStatement {
            sql,
            params: clause.params,
        }
    }
}

impl CountQuery {
    /// Render the statement counting matching rows.
    pub fn to_sql(&self) -> SqlStatement {
        let clause = WhereClause::from_filters(&self.filters);

        SqlStatement {
            sql: format!(
                "SELECT COUNT(*) FROM \"transaction\" WHERE {}",
                clause.sql()
            ),
            params: clause.params,
        }
    }
}

impl TotalsQuery {
    /// Render the statement summing amounts by type, case-insensitively.
    ///
    /// Rows with any other type label fall into neither sum.
    pub fn to_sql(&self) -> SqlStatement {
        let clause = WhereClause::from_filters(&self.filters);

        SqlStatement {
            sql: format!(
                "SELECT \
                    COALESCE(SUM(CASE WHEN LOWER(transaction_type) = 'income' THEN amount ELSE 0 END), 0), \
                    COALESCE(SUM(CASE WHEN LOWER(transaction_type) = 'expense' THEN amount ELSE 0 END), 0) \
                FROM \"transaction\" WHERE {}",
                clause.sql()
            ),
            params: clause.params,
        }
    }
}
