use std::{fmt, str::FromStr};

use actix_multipart::form::{bytes::Bytes as MpBytes, text::Text, MultipartForm};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::entities::image::ImageUpload;

// ───── Constants ──────────────────────────────────────────────────────
const MAX_NAME_LENGTH: u64 = 200;
const MAX_DESCRIPTION_LENGTH: u64 = 5000;

// ───── Category ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "saree_category")]
pub enum Category {
    Synthetic,
    Cotton,
    Shalu,
    Zari,
    Fancy,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Synthetic,
        Category::Cotton,
        Category::Shalu,
        Category::Zari,
        Category::Fancy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Synthetic => "Synthetic",
            Category::Cotton => "Cotton",
            Category::Shalu => "Shalu",
            Category::Zari => "Zari",
            Category::Fancy => "Fancy",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matching is exact: `cotton` is not `Cotton`.
impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Saree {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image_url: String,
    #[serde(default)]
    pub thumbnail_images: Vec<String>,
    pub category: Category,
    pub upload_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SareeInsert {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub thumbnail_images: Vec<String>,
    pub category: Category,
    pub upload_date: DateTime<Utc>,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct SareeCreatedResponse {
    pub message: String,
    pub saree: Saree,
}

// ───── Input & Validation ───────────────────────────────────────────

/// Text fields of an upload submission, validated before any image leaves the server.
#[derive(Debug, Clone, Validate)]
pub struct NewSareeDetails {
    #[validate(
        length(max = MAX_NAME_LENGTH, message = "Name is too long"),
        custom(function = "validate_not_blank", message = "Name is required")
    )]
    pub name: String,

    #[validate(
        length(max = MAX_DESCRIPTION_LENGTH, message = "Description is too long"),
        custom(function = "validate_not_blank", message = "Description is required")
    )]
    pub description: String,

    #[validate(custom(function = "validate_category"))]
    pub category: String,

    /// Client clock reading. Accepted for compatibility, never stored.
    pub date_time: Option<String>,
}

/// Wire shape of `POST /api/sarees/upload`.
#[derive(Debug, MultipartForm)]
pub struct SareeUploadForm {
    #[multipart(rename = "image")]
    pub image: Option<MpBytes>,

    #[multipart(rename = "thumbnailImages")]
    pub thumbnail_images: Vec<MpBytes>,

    pub name: Option<Text<String>>,
    pub description: Option<Text<String>>,
    pub category: Option<Text<String>>,

    #[multipart(rename = "dateTime")]
    pub date_time: Option<Text<String>>,
}

/// Everything the create-listing operation needs, decoupled from the transport.
#[derive(Debug, Clone)]
pub struct NewSareeSubmission {
    pub details: NewSareeDetails,
    pub image: Option<ImageUpload>,
    pub thumbnail_images: Vec<ImageUpload>,
}

impl TryFrom<SareeUploadForm> for NewSareeSubmission {
    type Error = String;

    fn try_from(form: SareeUploadForm) -> Result<Self, Self::Error> {
        let text = |field: Option<Text<String>>| field.map(|t| t.into_inner()).unwrap_or_default();

        let image = form.image
            .map(|file| ImageUpload::from_bytes(file.file_name, file.data))
            .transpose()?;

        let thumbnail_images = form.thumbnail_images
            .into_iter()
            .map(|file| ImageUpload::from_bytes(file.file_name, file.data))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NewSareeSubmission {
            details: NewSareeDetails {
                name: text(form.name),
                description: text(form.description),
                category: text(form.category),
                date_time: form.date_time.map(|t| t.into_inner()),
            },
            image,
            thumbnail_images,
        })
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn validate_category(value: &str) -> Result<(), ValidationError> {
    value.parse::<Category>().map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("invalid_category");
        err.message = Some(
            format!(
                "Category must be one of: {}",
                Category::ALL.map(|c| c.as_str()).join(", ")
            )
            .into(),
        );
        err
    })
}

impl NewSareeDetails {
    /// Builds the row to persist. `uploadDate` is always server time.
    pub fn prepare_for_insert(
        &self,
        image_url: String,
        thumbnail_images: Vec<String>,
    ) -> Result<SareeInsert, String> {
        Ok(SareeInsert {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            image_url,
            thumbnail_images,
            category: self.category.parse()?,
            upload_date: Utc::now(),
        })
    }
}
