use tracing::info;
use validator::Validate;

use crate::{
    entities::review::{NewReviewRequest, ReviewCreatedResponse, ReviewListResponse},
    errors::AppError,
    repositories::review::ReviewRepository,
};

pub struct ReviewHandler<R>
where
    R: ReviewRepository,
{
    pub review_repo: R,
}

impl<R> ReviewHandler<R>
where
    R: ReviewRepository,
{
    pub fn new(review_repo: R) -> Self {
        ReviewHandler { review_repo }
    }

    /// Validates, derives the initial and stores a new review
    pub async fn add_review(&self, request: NewReviewRequest) -> Result<ReviewCreatedResponse, AppError> {
        request.validate()?;

        let insert = request
            .prepare_for_insert()
            .ok_or_else(|| AppError::BadRequest("Name is required".to_string()))?;

        let review = self.review_repo.create_review(&insert).await?;
        info!(review_id = %review.id, rating = review.rating, "review added");

        Ok(ReviewCreatedResponse {
            success: true,
            message: "Review added successfully".to_string(),
            review,
        })
    }

    /// Lists every review, newest first
    pub async fn list_reviews(&self) -> Result<ReviewListResponse, AppError> {
        let reviews = self.review_repo.list_reviews().await?;

        Ok(ReviewListResponse {
            success: true,
            reviews,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use uuid::Uuid;

    use crate::entities::review::{Review, ReviewInsert};

    mock! {
        pub ReviewRepo {}

        #[async_trait]
        impl ReviewRepository for ReviewRepo {
            async fn create_review(&self, review: &ReviewInsert) -> Result<Review, AppError>;
            async fn list_reviews(&self) -> Result<Vec<Review>, AppError>;
        }
    }

    fn stored(insert: &ReviewInsert) -> Review {
        Review {
            id: Uuid::new_v4(),
            name: insert.name.clone(),
            initial: insert.initial.clone(),
            review: insert.review.clone(),
            rating: insert.rating,
            created_at: insert.created_at,
        }
    }

    fn request(name: &str, rating: i32) -> NewReviewRequest {
        NewReviewRequest {
            name: name.into(),
            review: "Colours exactly as pictured".into(),
            rating,
        }
    }

    #[actix_web::test]
    async fn review_is_stored_with_derived_initial() {
        let mut repo = MockReviewRepo::new();
        repo.expect_create_review()
            .withf(|insert| insert.initial == "A" && insert.rating == 4)
            .times(1)
            .returning(|insert| Ok(stored(insert)));

        let handler = ReviewHandler::new(repo);
        let response = handler.add_review(request("alice", 4)).await.unwrap();

        assert!(response.success);
        assert_eq!(response.message, "Review added successfully");
        assert_eq!(response.review.initial, "A");
    }

    #[actix_web::test]
    async fn out_of_range_rating_persists_nothing() {
        for rating in [0, 6, -3] {
            let mut repo = MockReviewRepo::new();
            repo.expect_create_review().times(0);

            let handler = ReviewHandler::new(repo);
            let err = handler.add_review(request("bob", rating)).await.unwrap_err();
            assert!(matches!(err, AppError::ValidationError(_)));
        }
    }

    #[actix_web::test]
    async fn blank_name_persists_nothing() {
        let mut repo = MockReviewRepo::new();
        repo.expect_create_review().times(0);

        let handler = ReviewHandler::new(repo);
        assert!(handler.add_review(request("  ", 3)).await.is_err());
    }

    #[actix_web::test]
    async fn listing_wraps_reviews_in_success_envelope() {
        let mut repo = MockReviewRepo::new();
        repo.expect_list_reviews().times(1).returning(|| Ok(vec![]));

        let handler = ReviewHandler::new(repo);
        let response = handler.list_reviews().await.unwrap();
        assert!(response.success);
        assert!(response.reviews.is_empty());
    }
}
