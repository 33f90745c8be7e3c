use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    entities::saree::{Category, Saree, SareeInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxSareeRepo,
};

#[async_trait]
pub trait SareeRepository: Send + Sync {
    async fn create_saree(&self, saree: &SareeInsert) -> Result<Saree, AppError>;
    /// Newest `upload_date` first, then `offset`/`limit` applied to that order.
    async fn list_by_category(&self, category: Category, offset: i64, limit: i64) -> Result<Vec<Saree>, AppError>;
    async fn check_connection(&self) -> Result<(), AppError>;
}

#[async_trait]
impl<T: SareeRepository + ?Sized> SareeRepository for Arc<T> {
    async fn create_saree(&self, saree: &SareeInsert) -> Result<Saree, AppError> {
        (**self).create_saree(saree).await
    }

    async fn list_by_category(&self, category: Category, offset: i64, limit: i64) -> Result<Vec<Saree>, AppError> {
        (**self).list_by_category(category, offset, limit).await
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        (**self).check_connection().await
    }
}

impl SqlxSareeRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxSareeRepo { pool }
    }
}

#[async_trait]
impl SareeRepository for SqlxSareeRepo {
    async fn create_saree(&self, saree: &SareeInsert) -> Result<Saree, AppError> {
        let created = sqlx::query_as::<_, Saree>(
            r#"
            INSERT INTO sarees (name, description, image_url, thumbnail_images, category, upload_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, image_url, thumbnail_images, category, upload_date
            "#,
        )
        .bind(&saree.name)
        .bind(&saree.description)
        .bind(&saree.image_url)
        .bind(&saree.thumbnail_images)
        .bind(saree.category)
        .bind(saree.upload_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_by_category(&self, category: Category, offset: i64, limit: i64) -> Result<Vec<Saree>, AppError> {
        // id breaks ties so pages never overlap when two uploads share a timestamp
        let sarees = sqlx::query_as::<_, Saree>(
            r#"
            SELECT id, name, description, image_url, thumbnail_images, category, upload_date
            FROM sarees
            WHERE category = $1
            ORDER BY upload_date DESC, id DESC
            OFFSET $2
            LIMIT $3
            "#,
        )
        .bind(category)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sarees)
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
