use petitions_core::listing::{SignatureFilter, SignatureSort};
use petitions_core::types::DbId;
use sqlx::{PgExecutor, Postgres, QueryBuilder};

use super::{push_order, push_page, push_where, Direction};
use crate::models::signature::PetitionSignature;

/// Column list for `petition_signatures` queries.
pub const SIGNATURE_COLUMNS: &str = "id, petition_id, user_id, created_at";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    Id(DbId),
    PetitionId(DbId),
    UserId(DbId),
}

impl Condition {
    fn push(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        let (column, value) = match self {
            Condition::Id(id) => ("id = ", *id),
            Condition::PetitionId(id) => ("petition_id = ", *id),
            Condition::UserId(id) => ("user_id = ", *id),
        };
        qb.push(column).push_bind(value);
    }
}

/// A filtered, ordered, optionally paged view of `petition_signatures`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignaturesQuery {
    conditions: Vec<Condition>,
    order: Vec<(&'static str, Direction)>,
    page: Option<(i64, i64)>,
}

impl SignaturesQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_filter(filter: &SignatureFilter) -> Self {
        let mut query = Self::new();
        if let Some(petition_id) = filter.petition_id {
            query = query.filter_petition_id(petition_id);
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter_user_id(user_id);
        }
        query
    }

    fn with(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn filter_id(self, id: DbId) -> Self {
        self.with(Condition::Id(id))
    }

    pub fn filter_petition_id(self, petition_id: DbId) -> Self {
        self.with(Condition::PetitionId(petition_id))
    }

    pub fn filter_user_id(self, user_id: DbId) -> Self {
        self.with(Condition::UserId(user_id))
    }

    pub fn order_by_created(mut self, ascending: bool) -> Self {
        self.order
            .push(("created_at", Direction::ascending(ascending)));
        self
    }

    pub fn sorted(self, sort: SignatureSort) -> Self {
        match sort {
            SignatureSort::Oldest => self.order_by_created(true),
            SignatureSort::Newest => self.order_by_created(false),
        }
    }

    pub fn page(mut self, limit: i64, offset: i64) -> Self {
        self.page = Some((limit, offset));
        self
    }

    fn push_where(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        push_where(qb, &self.conditions, Condition::push);
    }

    pub fn select_sql(&self) -> QueryBuilder<'static, Postgres> {
        self.select_with_page(self.page)
    }

    fn select_with_page(&self, page: Option<(i64, i64)>) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {SIGNATURE_COLUMNS} FROM petition_signatures"
        ));
        self.push_where(&mut qb);
        push_order(&mut qb, &self.order);
        push_page(&mut qb, page);
        qb
    }

    pub fn count_sql(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM petition_signatures");
        self.push_where(&mut qb);
        qb
    }

    pub fn delete_sql(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("DELETE FROM petition_signatures");
        self.push_where(&mut qb);
        qb
    }

    pub async fn fetch_all<'e, E>(&self, executor: E) -> Result<Vec<PetitionSignature>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut qb = self.select_sql();
        tracing::trace!(sql = qb.sql(), "select signatures");
        qb.build_query_as::<PetitionSignature>()
            .fetch_all(executor)
            .await
    }

    pub async fn fetch_optional<'e, E>(
        &self,
        executor: E,
    ) -> Result<Option<PetitionSignature>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut qb = self.select_with_page(Some((1, 0)));
        qb.build_query_as::<PetitionSignature>()
            .fetch_optional(executor)
            .await
    }

    pub async fn count<'e, E>(&self, executor: E) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut qb = self.count_sql();
        let total: i64 = qb.build_query_scalar::<i64>().fetch_one(executor).await?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    pub async fn delete<'e, E>(&self, executor: E) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut qb = self.delete_sql();
        let result = qb.build().execute(executor).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const SELECT: &str = "SELECT id, petition_id, user_id, created_at FROM petition_signatures";

    #[test]
    fn filters_are_independent() {
        let by_petition = SignaturesQuery::from_filter(&SignatureFilter {
            petition_id: Some(Uuid::new_v4()),
            user_id: None,
        });
        assert_eq!(
            by_petition.select_sql().sql(),
            format!("{SELECT} WHERE petition_id = $1")
        );

        let by_both = SignaturesQuery::from_filter(&SignatureFilter {
            petition_id: Some(Uuid::new_v4()),
            user_id: Some(Uuid::new_v4()),
        });
        assert_eq!(
            by_both.count_sql().sql(),
            "SELECT COUNT(*) FROM petition_signatures WHERE petition_id = $1 AND user_id = $2"
        );
    }

    #[test]
    fn default_sort_is_newest_first() {
        let query = SignaturesQuery::new()
            .sorted(SignatureSort::default())
            .page(20, 0);
        assert_eq!(
            query.select_sql().sql(),
            format!("{SELECT} ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2")
        );
    }

    #[test]
    fn delete_by_id() {
        let sql = SignaturesQuery::new().filter_id(Uuid::new_v4()).delete_sql();
        assert_eq!(sql.sql(), "DELETE FROM petition_signatures WHERE id = $1");
    }
}
