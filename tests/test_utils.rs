use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use reqwest::Client;
use saree_catalog::{
    entities::{
        image::{ImageUpload, StoredImage},
        review::{Review, ReviewInsert},
        saree::{Category, Saree, SareeInsert},
    },
    errors::AppError,
    media::MediaStore,
    repositories::{review::ReviewRepository, saree::SareeRepository},
    routes::{config_extractors, configure_routes},
    settings::{AppConfig, AppEnvironment},
    use_cases::catalog::CatalogSettings,
    AppState,
};
use std::{
    io::Cursor,
    net::TcpListener,
    sync::{Arc, Mutex},
    time::Duration,
};
use uuid::Uuid;

// ───── In-memory repositories ────────────────────────────────────────

#[derive(Default)]
pub struct InMemorySareeRepo {
    pub rows: Mutex<Vec<Saree>>,
}

#[async_trait]
impl SareeRepository for InMemorySareeRepo {
    async fn create_saree(&self, saree: &SareeInsert) -> Result<Saree, AppError> {
        let row = Saree {
            id: Uuid::new_v4(),
            name: saree.name.clone(),
            description: saree.description.clone(),
            image_url: saree.image_url.clone(),
            thumbnail_images: saree.thumbnail_images.clone(),
            category: saree.category,
            upload_date: saree.upload_date,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn list_by_category(&self, category: Category, offset: i64, limit: i64) -> Result<Vec<Saree>, AppError> {
        let mut matching: Vec<Saree> = self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.category == category)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.upload_date.cmp(&a.upload_date).then(b.id.cmp(&a.id)));

        Ok(matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryReviewRepo {
    pub rows: Mutex<Vec<Review>>,
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepo {
    async fn create_review(&self, review: &ReviewInsert) -> Result<Review, AppError> {
        let row = Review {
            id: Uuid::new_v4(),
            name: review.name.clone(),
            initial: review.initial.clone(),
            review: review.review.clone(),
            rating: review.rating,
            created_at: review.created_at,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn list_reviews(&self) -> Result<Vec<Review>, AppError> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

// ───── Scripted media store ──────────────────────────────────────────

/// Records every call; the upload numbered `fail_on_upload` (1-based) fails.
#[derive(Default)]
pub struct FakeMediaStore {
    pub fail_on_upload: Mutex<Option<usize>>,
    pub uploads: Mutex<Vec<(String, String)>>,
    pub deleted: Mutex<Vec<String>>,
}

impl FakeMediaStore {
    pub fn failing_on(upload_number: usize) -> Self {
        FakeMediaStore {
            fail_on_upload: Mutex::new(Some(upload_number)),
            ..Default::default()
        }
    }

    pub fn uploaded_ids(&self) -> Vec<String> {
        self.uploads.lock().unwrap().iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn deleted_ids(&self) -> Vec<String> {
        let mut ids = self.deleted.lock().unwrap().clone();
        ids.sort();
        ids
    }
}

#[async_trait]
impl MediaStore for FakeMediaStore {
    async fn upload(&self, image: &ImageUpload) -> Result<StoredImage, AppError> {
        let number = {
            let uploads = self.uploads.lock().unwrap();
            uploads.len() + 1
        };

        if *self.fail_on_upload.lock().unwrap() == Some(number) {
            self.uploads.lock().unwrap().push((format!("failed-{}", number), image.content_type.clone()));
            return Err(AppError::MediaStore(format!("upload {} rejected", number)));
        }

        let public_id = format!("sarees/asset-{}", number);
        self.uploads.lock().unwrap().push((public_id.clone(), image.content_type.clone()));

        Ok(StoredImage {
            url: format!("https://media.test/{}.jpg", public_id),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), AppError> {
        self.deleted.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}

// ───── Test application ──────────────────────────────────────────────

pub struct TestOptions {
    pub media: FakeMediaStore,
    pub settings: CatalogSettings,
    pub admin_api_key: Option<String>,
}

impl Default for TestOptions {
    fn default() -> Self {
        TestOptions {
            media: FakeMediaStore::default(),
            settings: CatalogSettings::default(),
            admin_api_key: None,
        }
    }
}

pub struct TestApp {
    pub state: Arc<AppState>,
    pub address: String,
    pub client: Client,
    pub sarees: Arc<InMemorySareeRepo>,
    pub reviews: Arc<InMemoryReviewRepo>,
    pub media: Arc<FakeMediaStore>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(TestOptions::default()).await
    }

    pub async fn spawn_with(options: TestOptions) -> Self {
        let sarees = Arc::new(InMemorySareeRepo::default());
        let reviews = Arc::new(InMemoryReviewRepo::default());
        let media = Arc::new(options.media);
        let settings = options.settings;

        let state = Arc::new(AppState::from_parts(
            sarees.clone(),
            reviews.clone(),
            media.clone(),
            settings,
            options.admin_api_key,
        ));

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let state_clone = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::from(state_clone.clone()))
                .wrap(NormalizePath::trim())
                .configure(config_extractors(settings.max_image_bytes, settings.max_secondary_images))
                .configure(configure_routes)
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(1)
        .run();

        tokio::spawn(server);

        let client = Client::new();
        while client.get(&format!("{}/api/health", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self {
            state,
            address,
            client,
            sarees,
            reviews,
            media,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub fn seed_saree(&self, name: &str, category: Category, upload_date: DateTime<Utc>) -> Saree {
        let row = Saree {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: format!("{} description", name),
            image_url: format!("https://media.test/{}.jpg", name),
            thumbnail_images: vec![],
            category,
            upload_date,
        };
        self.sarees.rows.lock().unwrap().push(row.clone());
        row
    }

    pub fn saree_count(&self) -> usize {
        self.sarees.rows.lock().unwrap().len()
    }

    pub fn review_count(&self) -> usize {
        self.reviews.rows.lock().unwrap().len()
    }
}

#[allow(dead_code)]
pub fn test_config(media_api_base: &str) -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Saree Catalog Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        database_url: "postgres://localhost/saree_catalog_test".to_string(),
        cors_allowed_origins: vec!["*".to_string()],
        public_base_url: "http://127.0.0.1:0".to_string(),
        cloudinary_cloud_name: "demo-cloud".to_string(),
        cloudinary_api_key: "test-key".to_string(),
        cloudinary_api_secret: "test-secret".to_string(),
        cloudinary_folder: "sarees".to_string(),
        media_api_base: media_api_base.to_string(),
        max_secondary_images: 5,
        default_page_limit: 20,
        max_image_bytes: 10 * 1024 * 1024,
        admin_api_key: None,
    }
}

/// A small PNG with a deterministic pattern.
#[allow(dead_code)]
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x * 13 % 256) as u8, (y * 29 % 256) as u8, 120]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}
