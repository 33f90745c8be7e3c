use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxSareeRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxReviewRepo {
    pub pool: PgPool,
}
