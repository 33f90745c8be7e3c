use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod client;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{cors, db, media};

use errors::AppError;
use media::{cloudinary::CloudinaryStore, MediaStore};
use repositories::{
    review::ReviewRepository,
    saree::SareeRepository,
    sqlx_repo::{SqlxReviewRepo, SqlxSareeRepo},
};
use use_cases::{
    catalog::{CatalogHandler, CatalogSettings},
    reviews::ReviewHandler,
};

pub type DynSareeRepo = Arc<dyn SareeRepository>;
pub type DynReviewRepo = Arc<dyn ReviewRepository>;
pub type DynMediaStore = Arc<dyn MediaStore>;

pub type AppCatalogHandler = CatalogHandler<DynSareeRepo, DynMediaStore>;
pub type AppReviewHandler = ReviewHandler<DynReviewRepo>;

pub struct AppState {
    pub catalog_handler: AppCatalogHandler,
    pub review_handler: AppReviewHandler,
    pub admin_api_key: Option<String>,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Result<Self, AppError> {
        let media_store = CloudinaryStore::new(config)?;

        Ok(AppState::from_parts(
            Arc::new(SqlxSareeRepo::new(pool.clone())),
            Arc::new(SqlxReviewRepo::new(pool)),
            Arc::new(media_store),
            config.catalog_settings(),
            config.admin_api_key.clone(),
        ))
    }

    pub fn from_parts(
        saree_repo: DynSareeRepo,
        review_repo: DynReviewRepo,
        media_store: DynMediaStore,
        catalog_settings: CatalogSettings,
        admin_api_key: Option<String>,
    ) -> Self {
        AppState {
            catalog_handler: CatalogHandler::new(saree_repo, media_store, catalog_settings),
            review_handler: ReviewHandler::new(review_repo),
            admin_api_key: admin_api_key.filter(|k| !k.trim().is_empty()),
        }
    }
}
