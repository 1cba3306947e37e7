use sqlx::PgPool;

/// Executes database messages against the shared connection pool.
///
/// Queries are expressed as message structs; see the `entities` module
/// for the `kanau::processor::Processor` implementations.
pub struct DatabaseProcessor {
    pub pool: PgPool,
}
