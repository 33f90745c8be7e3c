use std::collections::HashMap;

use actix_multipart::form::MultipartForm;
use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::saree::{NewSareeSubmission, SareeUploadForm},
    errors::AppError,
    use_cases::{catalog::PageRequest, extractors::AdminAccess},
    AppState,
};

#[instrument(skip(_admin, state, form))]
pub async fn upload_saree(
    _admin: AdminAccess,
    state: web::Data<AppState>,
    form: MultipartForm<SareeUploadForm>,
) -> Result<impl Responder, AppError> {
    let submission = NewSareeSubmission::try_from(form.into_inner())
        .map_err(AppError::BadRequest)?;

    if let Some(client_time) = submission.details.date_time.as_deref() {
        tracing::debug!(client_time, "ignoring client-supplied dateTime");
    }

    let response = state.catalog_handler
        .create_saree(submission)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(state, query))]
pub async fn get_sarees_by_category(
    category: web::Path<String>,
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let catalog_handler = &state.catalog_handler;

    let page = PageRequest::from_query(
        query.get("limit").map(String::as_str),
        query.get("page").map(String::as_str),
        catalog_handler.settings.default_page_limit,
    );

    let sarees = catalog_handler
        .list_by_category(&category, page)
        .await?;

    Ok(HttpResponse::Ok().json(sarees))
}
