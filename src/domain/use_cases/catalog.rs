use futures::future::join_all;
use tracing::{info, warn};
use validator::Validate;

use crate::{
    constants::MAX_SECONDARY_IMAGES,
    entities::{
        image::StoredImage,
        saree::{Category, NewSareeSubmission, Saree, SareeCreatedResponse},
    },
    errors::AppError,
    media::MediaStore,
    repositories::saree::SareeRepository,
};

/// Tunables shared by the upload endpoint and the listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogSettings {
    pub max_secondary_images: usize,
    pub default_page_limit: u32,
    pub max_image_bytes: usize,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            max_secondary_images: MAX_SECONDARY_IMAGES,
            default_page_limit: 20,
            max_image_bytes: 10 * 1024 * 1024,
        }
    }
}

/// 1-indexed page window over a newest-first listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    pub page: u32,
}

impl PageRequest {
    /// Leading digits are read (`2abc` is 2). Missing, non-numeric, zero and
    /// negative values fall back to the defaults.
    pub fn from_query(limit: Option<&str>, page: Option<&str>, default_limit: u32) -> Self {
        PageRequest {
            limit: parse_positive(limit).unwrap_or(default_limit),
            page: parse_positive(page).unwrap_or(1),
        }
    }

    /// `None` when the window starts past anything a query can address.
    pub fn offset(&self) -> Option<i64> {
        i64::from(self.page.saturating_sub(1)).checked_mul(i64::from(self.limit))
    }
}

/// Digits too large for `u32` saturate, which always lands past the last page.
fn parse_positive(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim();
    let unsigned = raw.strip_prefix('+').unwrap_or(raw);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];

    if digits.is_empty() {
        return None;
    }
    Some(digits.parse::<u32>().unwrap_or(u32::MAX)).filter(|v| *v > 0)
}

pub struct CatalogHandler<R, M>
where
    R: SareeRepository,
    M: MediaStore,
{
    pub saree_repo: R,
    pub media_store: M,
    pub settings: CatalogSettings,
}

impl<R, M> CatalogHandler<R, M>
where
    R: SareeRepository,
    M: MediaStore,
{
    pub fn new(saree_repo: R, media_store: M, settings: CatalogSettings) -> Self {
        CatalogHandler { saree_repo, media_store, settings }
    }

    /// Uploads the primary image, then every secondary concurrently, then persists the listing.
    ///
    /// Nothing is persisted unless every upload succeeded. Assets already stored for a
    /// failed request are deleted again on a best-effort basis.
    pub async fn create_saree(&self, submission: NewSareeSubmission) -> Result<SareeCreatedResponse, AppError> {
        let NewSareeSubmission { details, image, thumbnail_images } = submission;

        let primary = image.ok_or_else(|| AppError::BadRequest("Main image is required.".to_string()))?;

        let max_secondary = self.settings.max_secondary_images.min(MAX_SECONDARY_IMAGES);
        if thumbnail_images.len() > max_secondary {
            return Err(AppError::BadRequest(format!(
                "At most {} thumbnail images are allowed.",
                max_secondary
            )));
        }

        if let Some(oversized) = std::iter::once(&primary)
            .chain(thumbnail_images.iter())
            .find(|img| img.len() > self.settings.max_image_bytes)
        {
            return Err(AppError::BadRequest(format!(
                "{} exceeds the {} byte image limit.",
                oversized.file_name, self.settings.max_image_bytes
            )));
        }

        details.validate()?;

        let main = self.media_store.upload(&primary).await?;

        let outcomes = join_all(
            thumbnail_images.iter().map(|thumb| self.media_store.upload(thumb))
        ).await;

        let mut stored = vec![main];
        let mut first_failure = None;
        for outcome in outcomes {
            match outcome {
                Ok(image) => stored.push(image),
                Err(e) if first_failure.is_none() => first_failure = Some(e),
                Err(e) => warn!(error = %e, "additional thumbnail upload failed"),
            }
        }

        if let Some(err) = first_failure {
            self.discard_uploads(&stored).await;
            return Err(err);
        }

        let image_url = stored[0].url.clone();
        let thumbnail_urls = stored[1..].iter().map(|s| s.url.clone()).collect();

        let insert = match details.prepare_for_insert(image_url, thumbnail_urls) {
            Ok(insert) => insert,
            Err(msg) => {
                self.discard_uploads(&stored).await;
                return Err(AppError::BadRequest(msg));
            }
        };

        let saree = match self.saree_repo.create_saree(&insert).await {
            Ok(saree) => saree,
            Err(e) => {
                self.discard_uploads(&stored).await;
                return Err(e);
            }
        };

        info!(
            saree_id = %saree.id,
            category = %saree.category,
            thumbnails = saree.thumbnail_images.len(),
            "saree listing created"
        );

        Ok(SareeCreatedResponse {
            message: "Saree uploaded successfully".to_string(),
            saree,
        })
    }

    /// Lists one page of a category, newest upload first.
    ///
    /// An empty page is reported as not found, whether the category is unknown,
    /// has no listings, or the page lies past the end.
    pub async fn list_by_category(&self, category: &str, page: PageRequest) -> Result<Vec<Saree>, AppError> {
        let not_found = || AppError::NotFound(format!("No sarees found for category: {}", category));

        let parsed = category.parse::<Category>().map_err(|_| not_found())?;
        let offset = page.offset().ok_or_else(not_found)?;

        let sarees = self.saree_repo
            .list_by_category(parsed, offset, i64::from(page.limit))
            .await?;

        if sarees.is_empty() {
            return Err(not_found());
        }

        Ok(sarees)
    }

    async fn discard_uploads(&self, stored: &[StoredImage]) {
        let results = join_all(
            stored.iter().map(|image| self.media_store.delete(&image.public_id))
        ).await;

        for (image, result) in stored.iter().zip(results) {
            if let Err(e) = result {
                warn!(public_id = %image.public_id, error = %e, "orphaned media asset left behind");
            }
        }
    }
}
