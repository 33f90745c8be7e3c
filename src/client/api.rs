use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, AtomicU8, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::Utc;
use futures::stream;
use reqwest::{
    multipart::{Form, Part},
    Body, Client, Response, StatusCode,
};
use serde::{de::DeserializeOwned, Deserialize};
use url::Url;

use crate::{
    client::{image_prep::ConvertedImage, upload_form::UploadSubmission, ClientError},
    constants::{
        ADD_REVIEW_PATH, CATEGORY_PATH, FIELD_CATEGORY, FIELD_DATE_TIME, FIELD_DESCRIPTION,
        FIELD_IMAGE, FIELD_NAME, FIELD_THUMBNAILS, REVIEWS_SCOPE, SAREES_SCOPE, UPLOAD_PATH,
    },
    entities::{
        review::{NewReviewRequest, Review, ReviewCreatedResponse, ReviewListResponse},
        saree::{Category, Saree, SareeCreatedResponse},
    },
    use_cases::extractors::ADMIN_KEY_HEADER,
};

const CHUNK_SIZE: usize = 16 * 1024;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// Result of a category query. The server answers 404 for an empty page.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryPage {
    Items(Vec<Saree>),
    Empty { message: String },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Turns bytes-on-the-wire into a 0..=100 percentage, reporting each step once.
struct ProgressTracker {
    sent: AtomicU64,
    last: AtomicU8,
    total: u64,
    callback: ProgressCallback,
}

impl ProgressTracker {
    fn new(total: u64, callback: ProgressCallback) -> Self {
        ProgressTracker {
            sent: AtomicU64::new(0),
            last: AtomicU8::new(0),
            total: total.max(1),
            callback,
        }
    }

    fn advance(&self, bytes: u64) {
        let sent = self.sent.fetch_add(bytes, Ordering::Relaxed) + bytes;
        // 100 is only reported once the server has accepted the upload.
        let percent = ((sent.saturating_mul(100)) / self.total).min(99) as u8;
        self.report(percent);
    }

    fn report(&self, percent: u8) {
        if percent > self.last.fetch_max(percent, Ordering::Relaxed) {
            (self.callback)(percent);
        }
    }
}

#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
    admin_key: Option<String>,
}

impl fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.base_url)
            .field("has_admin_key", &self.admin_key.is_some())
            .finish()
    }
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        Ok(CatalogClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            admin_key: None,
        })
    }

    pub fn with_admin_key(mut self, key: Option<String>) -> Self {
        self.admin_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a new listing. `on_progress` sees percentages climb to 100 on success.
    pub async fn upload_saree(
        &self,
        submission: &UploadSubmission,
        on_progress: ProgressCallback,
    ) -> Result<SareeCreatedResponse, ClientError> {
        let total = std::iter::once(&submission.image)
            .chain(&submission.thumbnail_images)
            .map(|img| img.data.len() as u64)
            .sum();
        let tracker = Arc::new(ProgressTracker::new(total, on_progress));

        let mut form = Form::new()
            .text(FIELD_NAME, submission.name.clone())
            .text(FIELD_DESCRIPTION, submission.description.clone())
            .text(FIELD_CATEGORY, submission.category.as_str())
            .text(FIELD_DATE_TIME, Utc::now().to_rfc3339())
            .part(FIELD_IMAGE, tracked_part(&submission.image, &tracker)?);

        for thumb in &submission.thumbnail_images {
            form = form.part(FIELD_THUMBNAILS, tracked_part(thumb, &tracker)?);
        }

        let mut request = self.client
            .post(self.url(&format!("{}{}", SAREES_SCOPE, UPLOAD_PATH)))
            .multipart(form);
        if let Some(key) = &self.admin_key {
            request = request.header(ADMIN_KEY_HEADER, key);
        }

        tracing::info!(
            name = %submission.name,
            category = %submission.category,
            thumbnails = submission.thumbnail_images.len(),
            "uploading saree"
        );

        let created: SareeCreatedResponse = read_json(request.send().await?).await?;
        tracker.report(100);
        Ok(created)
    }

    pub async fn sarees_by_category(
        &self,
        category: Category,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<CategoryPage, ClientError> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(page) = page {
            query.push(("page", page.to_string()));
        }

        let response = self.client
            .get(self.url(&format!("{}{}/{}", SAREES_SCOPE, CATEGORY_PATH, category)))
            .query(&query)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            let body = response.json::<ErrorBody>().await.ok();
            let message = body
                .and_then(|b| b.message)
                .unwrap_or_else(|| format!("No sarees found for category: {}", category));
            return Ok(CategoryPage::Empty { message });
        }

        Ok(CategoryPage::Items(read_json(response).await?))
    }

    /// Returns the server's confirmation message.
    pub async fn submit_review(&self, request: &NewReviewRequest) -> Result<String, ClientError> {
        let response = self.client
            .post(self.url(&format!("{}{}", REVIEWS_SCOPE, ADD_REVIEW_PATH)))
            .json(request)
            .send()
            .await?;

        let created: ReviewCreatedResponse = read_json(response).await?;
        Ok(created.message)
    }

    pub async fn list_reviews(&self) -> Result<Vec<Review>, ClientError> {
        let response = self.client.get(self.url(REVIEWS_SCOPE)).send().await?;
        let list: ReviewListResponse = read_json(response).await?;
        Ok(list.reviews)
    }
}

fn tracked_part(image: &ConvertedImage, tracker: &Arc<ProgressTracker>) -> Result<Part, ClientError> {
    let chunks: Vec<Vec<u8>> = image.data.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect();
    let tracker = Arc::clone(tracker);

    let body = Body::wrap_stream(stream::iter(chunks.into_iter().map(move |chunk| {
        tracker.advance(chunk.len() as u64);
        Ok::<_, std::io::Error>(chunk)
    })));

    Part::stream_with_length(body, image.data.len() as u64)
        .file_name(image.file_name.clone())
        .mime_str(image.content_type)
        .map_err(ClientError::from)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let message = response.json::<ErrorBody>().await.ok().and_then(|b| b.message);
    tracing::debug!(status = status.as_u16(), ?message, "request rejected");

    Err(ClientError::Server {
        status: status.as_u16(),
        message,
    })
}
