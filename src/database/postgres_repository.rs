use sqlx::PgPool;

/// The production store. Each `database::*` module adds the queries for one collection,
/// either as inherent methods or as an implementation of that collection's repository
/// trait.
#[derive(Clone)]
pub struct PostgresRepository {
    pub pool: PgPool,
}
