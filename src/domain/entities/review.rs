use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

const MIN_RATING: i32 = 1;
const MAX_RATING: i32 = 5;
const MAX_NAME_LENGTH: u64 = 100;
const MAX_REVIEW_LENGTH: u64 = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub initial: String,
    pub review: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ReviewInsert {
    pub name: String,
    pub initial: String,
    pub review: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewReviewRequest {
    #[validate(
        length(max = MAX_NAME_LENGTH, message = "Name is too long"),
        custom(function = "validate_not_blank", message = "Name is required")
    )]
    pub name: String,

    #[validate(
        length(max = MAX_REVIEW_LENGTH, message = "Review is too long"),
        custom(function = "validate_not_blank", message = "Review text is required")
    )]
    pub review: String,

    #[validate(range(min = MIN_RATING, max = MAX_RATING, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewCreatedResponse {
    pub success: bool,
    pub message: String,
    pub review: Review,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewListResponse {
    pub success: bool,
    pub reviews: Vec<Review>,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Uppercase form of the first visible character of `name`.
pub fn initial_of(name: &str) -> Option<String> {
    name.trim_start()
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .map(String::from)
}

impl NewReviewRequest {
    pub fn prepare_for_insert(&self) -> Option<ReviewInsert> {
        Some(ReviewInsert {
            name: self.name.trim().to_string(),
            initial: initial_of(&self.name)?,
            review: self.review.trim().to_string(),
            rating: self.rating,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(rating: i32) -> NewReviewRequest {
        NewReviewRequest {
            name: "alice".into(),
            review: "Lovely drape and colour".into(),
            rating,
        }
    }

    #[test]
    fn initial_is_uppercased_first_letter() {
        assert_eq!(initial_of("alice").as_deref(), Some("A"));
        assert_eq!(initial_of("  ritika").as_deref(), Some("R"));
        assert_eq!(initial_of("éva").as_deref(), Some("É"));
        assert_eq!(initial_of("   "), None);
    }

    #[test]
    fn ratings_outside_range_are_rejected() {
        for rating in [-1, 0, 6, 100] {
            assert!(request(rating).validate().is_err(), "rating {rating} accepted");
        }
        for rating in 1..=5 {
            assert!(request(rating).validate().is_ok(), "rating {rating} rejected");
        }
    }

    #[test]
    fn blank_review_text_is_rejected() {
        let mut r = request(4);
        r.review = "\n\t ".into();
        let err = r.validate().unwrap_err();
        assert!(err.field_errors().contains_key("review"));
    }

    #[test]
    fn prepared_insert_carries_initial() {
        let insert = request(5).prepare_for_insert().unwrap();
        assert_eq!(insert.initial, "A");
        assert_eq!(insert.name, "alice");
    }

    #[test]
    fn fractional_rating_does_not_deserialize() {
        let parsed: Result<NewReviewRequest, _> =
            serde_json::from_str(r#"{"name":"a","review":"b","rating":3.5}"#);
        assert!(parsed.is_err());
    }
}
