use actix_multipart::form::MultipartFormConfig;
use actix_web::web;

use crate::errors::AppError;

/// Slack on top of the image bytes for text fields and multipart framing.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Extractor limits and error shapes for JSON, query and multipart input.
pub fn config_extractors(max_image_bytes: usize, max_secondary_images: usize) -> impl FnOnce(&mut web::ServiceConfig) {
    let form_limit = max_image_bytes
        .saturating_mul(max_secondary_images + 1)
        .saturating_add(FORM_OVERHEAD_BYTES);

    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
            AppError::BadRequest(format!("Invalid request body: {}", err)).into()
        }));

        cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
            AppError::BadRequest(format!("Invalid query string: {}", err)).into()
        }));

        cfg.app_data(
            MultipartFormConfig::default()
                .total_limit(form_limit)
                .memory_limit(form_limit)
                .error_handler(|err, _req| AppError::from(err).into()),
        );
    }
}
