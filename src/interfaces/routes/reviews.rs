use actix_web::web;

use crate::{constants::{ADD_REVIEW_PATH, REVIEWS_SCOPE}, handlers::reviews};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(REVIEWS_SCOPE)
            .service(
                web::resource("")
                    .route(web::get().to(reviews::get_reviews))
            )
            .service(
                web::resource(ADD_REVIEW_PATH)
                    .route(web::post().to(reviews::add_review))
            )
    );
}
