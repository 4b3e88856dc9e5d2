use petitions_core::listing::{EndDateBound, PetitionFilter, PetitionSort};
use petitions_core::petition::PetitionStatus;
use petitions_core::types::{DbId, Timestamp};
use sqlx::{PgExecutor, Postgres, QueryBuilder};

use super::{escape_like, push_order, push_page, push_where, Direction};
use crate::models::petition::{Petition, UpdatePetition};

/// Column list for `petitions` queries.
pub const PETITION_COLUMNS: &str = "id, city_id, creator_id, title, description, status, \
    signatures, goal, reply, end_date, created_at, updated_at";

#[derive(Debug, Clone, PartialEq)]
enum Condition {
    Id(DbId),
    CityId(DbId),
    CreatorId(DbId),
    StatusIn(Vec<PetitionStatus>),
    TitleLike(String),
    EndDate { at: Timestamp, after: bool },
    CreatedAt { at: Timestamp, after: bool },
}

impl Condition {
    fn push(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        match self {
            Condition::Id(id) => {
                qb.push("id = ").push_bind(*id);
            }
            Condition::CityId(id) => {
                qb.push("city_id = ").push_bind(*id);
            }
            Condition::CreatorId(id) => {
                qb.push("creator_id = ").push_bind(*id);
            }
            Condition::StatusIn(statuses) => {
                let names: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();
                qb.push("status = ANY(").push_bind(names).push(")");
            }
            Condition::TitleLike(fragment) => {
                qb.push("title ILIKE ")
                    .push_bind(format!("%{}%", escape_like(fragment)));
            }
            Condition::EndDate { at, after } => {
                qb.push(if *after { "end_date > " } else { "end_date < " })
                    .push_bind(*at);
            }
            Condition::CreatedAt { at, after } => {
                qb.push(if *after { "created_at > " } else { "created_at < " })
                    .push_bind(*at);
            }
        }
    }
}

/// A filtered, ordered, optionally paged view of the `petitions` table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetitionsQuery {
    conditions: Vec<Condition>,
    order: Vec<(&'static str, Direction)>,
    page: Option<(i64, i64)>,
    lock: bool,
}

impl PetitionsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate a listing filter into predicates, evaluating availability
    /// against `now`.
    pub fn from_filter(filter: &PetitionFilter, now: Timestamp) -> Self {
        let mut query = Self::new();
        if let Some(city_id) = filter.city_id {
            query = query.filter_city_id(city_id);
        }
        if let Some(creator_id) = filter.creator_id {
            query = query.filter_creator_id(creator_id);
        }
        if let Some(title) = &filter.title_like {
            query = query.title_like(title);
        }
        query = query.filter_status_in(&filter.status_set());
        match filter.end_date_bound(now) {
            Some(EndDateBound::After(t)) => query.filter_end_date(t, true),
            Some(EndDateBound::Before(t)) => query.filter_end_date(t, false),
            None => query,
        }
    }

    fn with(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn filter_id(self, id: DbId) -> Self {
        self.with(Condition::Id(id))
    }

    pub fn filter_city_id(self, city_id: DbId) -> Self {
        self.with(Condition::CityId(city_id))
    }

    pub fn filter_creator_id(self, creator_id: DbId) -> Self {
        self.with(Condition::CreatorId(creator_id))
    }

    pub fn filter_status(self, status: PetitionStatus) -> Self {
        self.with(Condition::StatusIn(vec![status]))
    }

    /// Restrict to any of `statuses`. An empty slice leaves the query unchanged.
    pub fn filter_status_in(self, statuses: &[PetitionStatus]) -> Self {
        if statuses.is_empty() {
            return self;
        }
        self.with(Condition::StatusIn(statuses.to_vec()))
    }

    /// Case-insensitive "title contains `fragment`".
    pub fn title_like(self, fragment: &str) -> Self {
        self.with(Condition::TitleLike(fragment.to_string()))
    }

    /// `end_date > at` when `after`, otherwise `end_date < at`.
    pub fn filter_end_date(self, at: Timestamp, after: bool) -> Self {
        self.with(Condition::EndDate { at, after })
    }

    /// `created_at > at` when `after`, otherwise `created_at < at`.
    pub fn filter_created_at(self, at: Timestamp, after: bool) -> Self {
        self.with(Condition::CreatedAt { at, after })
    }

    pub fn order_by_created(mut self, ascending: bool) -> Self {
        self.order
            .push(("created_at", Direction::ascending(ascending)));
        self
    }

    pub fn order_by_signatures(mut self, ascending: bool) -> Self {
        self.order
            .push(("signatures", Direction::ascending(ascending)));
        self
    }

    pub fn sorted(self, sort: PetitionSort) -> Self {
        match sort {
            PetitionSort::MostSignatures => self.order_by_signatures(false),
            PetitionSort::LeastSignatures => self.order_by_signatures(true),
            PetitionSort::Oldest => self.order_by_created(true),
            PetitionSort::Newest => self.order_by_created(false),
        }
    }

    /// Limit the select to one page. Counts ignore the page.
    pub fn page(mut self, limit: i64, offset: i64) -> Self {
        self.page = Some((limit, offset));
        self
    }

    /// Lock selected rows until the surrounding transaction ends.
    pub fn for_update(mut self) -> Self {
        self.lock = true;
        self
    }

    fn push_where(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        push_where(qb, &self.conditions, Condition::push);
    }

    pub fn select_sql(&self) -> QueryBuilder<'static, Postgres> {
        self.select_with_page(self.page)
    }

    fn select_with_page(&self, page: Option<(i64, i64)>) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!("SELECT {PETITION_COLUMNS} FROM petitions"));
        self.push_where(&mut qb);
        push_order(&mut qb, &self.order);
        push_page(&mut qb, page);
        if self.lock {
            qb.push(" FOR UPDATE");
        }
        qb
    }

    pub fn count_sql(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM petitions");
        self.push_where(&mut qb);
        qb
    }

    pub fn update_sql(&self, changes: &UpdatePetition) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("UPDATE petitions SET updated_at = NOW()");
        if let Some(status) = changes.status {
            qb.push(", status = ").push_bind(status.as_str());
        }
        if let Some(reply) = &changes.reply {
            qb.push(", reply = ").push_bind(reply.clone());
        }
        if let Some(end_date) = changes.end_date {
            qb.push(", end_date = ").push_bind(end_date);
        }
        self.push_where(&mut qb);
        qb.push(format!(" RETURNING {PETITION_COLUMNS}"));
        qb
    }

    pub fn delete_sql(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("DELETE FROM petitions");
        self.push_where(&mut qb);
        qb
    }

    pub async fn fetch_all<'e, E>(&self, executor: E) -> Result<Vec<Petition>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut qb = self.select_sql();
        tracing::trace!(sql = qb.sql(), "select petitions");
        qb.build_query_as::<Petition>().fetch_all(executor).await
    }

    /// First matching row, if any.
    pub async fn fetch_optional<'e, E>(&self, executor: E) -> Result<Option<Petition>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut qb = self.select_with_page(Some((1, 0)));
        tracing::trace!(sql = qb.sql(), "select petition");
        qb.build_query_as::<Petition>().fetch_optional(executor).await
    }

    /// Number of rows matching the filters, ignoring order and page.
    pub async fn count<'e, E>(&self, executor: E) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut qb = self.count_sql();
        let total: i64 = qb.build_query_scalar::<i64>().fetch_one(executor).await?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    /// Apply `changes` to every matching row and return the updated rows.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        changes: &UpdatePetition,
    ) -> Result<Vec<Petition>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut qb = self.update_sql(changes);
        qb.build_query_as::<Petition>().fetch_all(executor).await
    }

    /// Delete every matching row. Returns the number of rows removed.
    pub async fn delete<'e, E>(&self, executor: E) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut qb = self.delete_sql();
        let result = qb.build().execute(executor).await?;
        Ok(result.rows_affected())
    }
}
