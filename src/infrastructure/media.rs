use std::sync::Arc;

use async_trait::async_trait;

use crate::{entities::image::{ImageUpload, StoredImage}, errors::AppError};

pub mod cloudinary;

/// Remote image host. Every call is a single attempt; callers decide what a failure means.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, image: &ImageUpload) -> Result<StoredImage, AppError>;
    async fn delete(&self, public_id: &str) -> Result<(), AppError>;
}

#[async_trait]
impl<T: MediaStore + ?Sized> MediaStore for Arc<T> {
    async fn upload(&self, image: &ImageUpload) -> Result<StoredImage, AppError> {
        (**self).upload(image).await
    }

    async fn delete(&self, public_id: &str) -> Result<(), AppError> {
        (**self).delete(public_id).await
    }
}
