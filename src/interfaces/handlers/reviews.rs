use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{entities::review::NewReviewRequest, errors::AppError, AppState};

#[instrument(skip(state, data), fields(rating = data.rating))]
pub async fn add_review(
    state: web::Data<AppState>,
    data: web::Json<NewReviewRequest>,
) -> Result<impl Responder, AppError> {
    let response = state.review_handler
        .add_review(data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(state))]
pub async fn get_reviews(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let response = state.review_handler.list_reviews().await?;
    Ok(HttpResponse::Ok().json(response))
}
