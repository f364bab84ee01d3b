// Route exports
pub mod matching;

use actix_web::web;

use crate::error::{handle_json_payload_error, handle_path_error, handle_query_payload_error};

pub use matching::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
        .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
        .app_data(web::PathConfig::default().error_handler(handle_path_error))
        .service(
            web::scope("/api/v1")
                .configure(matching::configure),
        );
}
