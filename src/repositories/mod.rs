use sqlx::PgPool;

pub mod memory;
pub mod posts_repo;
pub mod user_repo;

pub use memory::MemoryRepo;

#[derive(Clone)]
pub struct PostgresRepo {
    pool: PgPool,
}

impl PostgresRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
