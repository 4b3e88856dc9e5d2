//! Composable filter/sort/page queries.
//!
//! [`PetitionsQuery`] and [`SignaturesQuery`] are plain values: every
//! `filter_*` / `order_by_*` / `page` call consumes the query and returns a
//! refined one, so a base query can be cloned and executed several ways (a
//! page of rows and the unpaged total, for instance) without shared state.
//! SQL is assembled with [`sqlx::QueryBuilder`] and every user value is bound,
//! never interpolated.

mod petitions;
mod signatures;

pub use petitions::{PetitionsQuery, PETITION_COLUMNS};
pub use signatures::{SignaturesQuery, SIGNATURE_COLUMNS};

use sqlx::{Postgres, QueryBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub(crate) fn ascending(ascending: bool) -> Self {
        if ascending {
            Direction::Asc
        } else {
            Direction::Desc
        }
    }

    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// Escape `LIKE` wildcards so user input matches literally.
pub(crate) fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Push ` WHERE a AND b ...` using `push_one` for each condition.
pub(crate) fn push_where<C>(
    qb: &mut QueryBuilder<'static, Postgres>,
    conditions: &[C],
    mut push_one: impl FnMut(&C, &mut QueryBuilder<'static, Postgres>),
) {
    for (i, condition) in conditions.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        push_one(condition, qb);
    }
}

/// Push ` ORDER BY col DIR, ..., id DIR`. `id` breaks ties in the direction
/// of the first key; ids are UUIDv7, so equal timestamps still order by
/// insertion.
pub(crate) fn push_order(qb: &mut QueryBuilder<'static, Postgres>, order: &[(&'static str, Direction)]) {
    let Some((_, primary)) = order.first() else {
        return;
    };
    qb.push(" ORDER BY ");
    for (column, direction) in order {
        qb.push(*column).push(" ").push(direction.as_sql()).push(", ");
    }
    qb.push("id ").push(primary.as_sql());
}

/// Push ` LIMIT $n OFFSET $m` when a page is set.
pub(crate) fn push_page(qb: &mut QueryBuilder<'static, Postgres>, page: Option<(i64, i64)>) {
    if let Some((limit, offset)) = page {
        qb.push(" LIMIT ").push_bind(limit).push(" OFFSET ").push_bind(offset);
    }
}
