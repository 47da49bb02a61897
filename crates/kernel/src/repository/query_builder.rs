//! Item query builder using SeaQuery.
//!
//! Generates the page and count SQL for an [`ItemQuery`]:
//! - type whitelist and published status
//! - term facets as `item.id IN (SELECT item_id FROM item_term ...)` subqueries
//! - inclusive publish-date bounds, author and ILIKE search
//! - offset pagination with an id tie-breaker

use sea_query::{
    Alias, Asterisk, Expr, ExprTrait, Order, PostgresQueryBuilder, Query, SelectStatement,
};
use vitrine_sdk::types::{SortKey, SortOrder};

use super::ItemQuery;
use crate::models::STATUS_PUBLISH;

/// Columns selected for each item row.
const ITEM_COLUMNS: [&str; 12] = [
    "id",
    "type",
    "title",
    "slug",
    "excerpt",
    "content",
    "status",
    "author_id",
    "created",
    "changed",
    "menu_order",
    "fields",
];

/// Query builder for item pages.
pub struct ItemQueryBuilder<'a> {
    query: &'a ItemQuery,
}

impl<'a> ItemQueryBuilder<'a> {
    pub fn new(query: &'a ItemQuery) -> Self {
        Self { query }
    }

    /// Build the main SELECT query with pagination.
    pub fn build(&self) -> String {
        let mut select = Query::select();

        for column in ITEM_COLUMNS {
            select.column((Alias::new("item"), Alias::new(column)));
        }
        select.from(Alias::new("item"));

        self.add_conditions(&mut select);
        self.add_sorts(&mut select);

        select.limit(u64::from(self.query.per_page));
        select.offset(self.query.offset());

        select.to_string(PostgresQueryBuilder)
    }

    /// Build a COUNT query for total results.
    pub fn build_count(&self) -> String {
        let mut select = Query::select();
        select.expr(Expr::col(Asterisk).count());
        select.from(Alias::new("item"));

        self.add_conditions(&mut select);

        select.to_string(PostgresQueryBuilder)
    }

    fn add_conditions(&self, select: &mut SelectStatement) {
        let q = self.query;

        select.and_where(item_col("status").eq(STATUS_PUBLISH));
        select.and_where(item_col("type").is_in(q.types.iter().map(String::as_str)));

        if !q.exclude_ids.is_empty() {
            select.and_where(item_col("id").is_not_in(q.exclude_ids.iter().copied()));
        }

        for facet in q.facets.iter().filter(|f| !f.is_empty()) {
            let terms = Query::select()
                .column(Alias::new("item_id"))
                .from(Alias::new("item_term"))
                .and_where(Expr::col(Alias::new("term_id")).is_in(facet.iter().copied()))
                .to_owned();
            select.and_where(item_col("id").in_subquery(terms));
        }

        if let Some(from) = q.created_from {
            select.and_where(item_col("created").gte(from));
        }
        if let Some(to) = q.created_to {
            select.and_where(item_col("created").lte(to));
        }

        if let Some(author) = q.author_id {
            select.and_where(item_col("author_id").eq(author));
        }

        if let Some(search) = q.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", escape_like_wildcards(search));
            select.and_where(Expr::cust_with_values(
                "(item.title ILIKE $1 OR item.content ILIKE $2)",
                [pattern.clone(), pattern],
            ));
        }
    }

    fn add_sorts(&self, select: &mut SelectStatement) {
        let order = match self.query.order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };

        let column = match self.query.sort {
            SortKey::Date => "created",
            SortKey::Modified => "changed",
            SortKey::MenuOrder => "menu_order",
            SortKey::Title => {
                select.order_by_expr(Expr::cust("LOWER(item.title)"), order.clone());
                select.order_by((Alias::new("item"), Alias::new("id")), order);
                return;
            }
            SortKey::Rand => {
                select.order_by_expr(Expr::cust("RANDOM()"), Order::Asc);
                return;
            }
        };

        select.order_by((Alias::new("item"), Alias::new(column)), order.clone());
        select.order_by((Alias::new("item"), Alias::new("id")), order);
    }
}

fn item_col(column: &str) -> Expr {
    Expr::col((Alias::new("item"), Alias::new(column)))
}

/// Escape SQL LIKE wildcard characters (`%`, `_`, `\`) in a value.
fn escape_like_wildcards(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
