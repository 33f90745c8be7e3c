pub mod review;
pub mod saree;
pub mod sqlx_repo;
