use actix_web::web;

use crate::{constants::{CATEGORY_PATH, SAREES_SCOPE, UPLOAD_PATH}, handlers::sarees};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(SAREES_SCOPE)
            .service(
                web::resource(UPLOAD_PATH)
                    .route(web::post().to(sarees::upload_saree))
            )
            .service(
                web::resource(format!("{}/{{category}}", CATEGORY_PATH))
                    .route(web::get().to(sarees::get_sarees_by_category))
            )
    );
}
