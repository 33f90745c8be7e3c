use actix_web::web;

use crate::handlers::{home::home, system::health_check};

mod payload_errors;
mod reviews;
mod sarees;

pub use payload_errors::config_extractors;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.configure(sarees::config_routes);
    cfg.configure(reviews::config_routes);

    cfg.service(
        web::scope("/api")
            .service(health_check)
    );
}
