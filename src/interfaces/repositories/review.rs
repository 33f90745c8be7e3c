use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    entities::review::{Review, ReviewInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxReviewRepo,
};

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create_review(&self, review: &ReviewInsert) -> Result<Review, AppError>;
    async fn list_reviews(&self) -> Result<Vec<Review>, AppError>;
}

#[async_trait]
impl<T: ReviewRepository + ?Sized> ReviewRepository for Arc<T> {
    async fn create_review(&self, review: &ReviewInsert) -> Result<Review, AppError> {
        (**self).create_review(review).await
    }

    async fn list_reviews(&self) -> Result<Vec<Review>, AppError> {
        (**self).list_reviews().await
    }
}

impl SqlxReviewRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxReviewRepo { pool }
    }
}

#[async_trait]
impl ReviewRepository for SqlxReviewRepo {
    async fn create_review(&self, review: &ReviewInsert) -> Result<Review, AppError> {
        let created = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (name, initial, review, rating, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, initial, review, rating, created_at
            "#,
        )
        .bind(&review.name)
        .bind(&review.initial)
        .bind(&review.review)
        .bind(review.rating)
        .bind(review.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_reviews(&self) -> Result<Vec<Review>, AppError> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, name, initial, review, rating, created_at
            FROM reviews
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }
}
