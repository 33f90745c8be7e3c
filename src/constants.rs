use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Upper bound on additional images per listing, mirrored by the `sarees` table CHECK.
pub const MAX_SECONDARY_IMAGES: usize = 5;

// Paths shared by the server routes and the HTTP client.
pub const SAREES_SCOPE: &str = "/api/sarees";
pub const REVIEWS_SCOPE: &str = "/api/reviews";
pub const UPLOAD_PATH: &str = "/upload";
pub const CATEGORY_PATH: &str = "/category";
pub const ADD_REVIEW_PATH: &str = "/add";

// Multipart field names of the upload form.
pub const FIELD_IMAGE: &str = "image";
pub const FIELD_THUMBNAILS: &str = "thumbnailImages";
pub const FIELD_NAME: &str = "name";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_DATE_TIME: &str = "dateTime";
