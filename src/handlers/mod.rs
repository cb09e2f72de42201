pub mod employee;

use actix_web::{error, web};

use crate::errors::AppError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/employees")
            .route(web::post().to(employee::create_employee))
            .route(web::get().to(employee::get_employees)),
    )
    .service(
        web::resource("/employees/{employee_id}")
            .route(web::put().to(employee::update_employee))
            .route(web::delete().to(employee::delete_employee)),
    );
}

/// JSON extractor settings: body size limit and `{"message": ...}` errors for
/// malformed or oversized bodies.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            let message = match &err {
                error::JsonPayloadError::Overflow { .. } | error::JsonPayloadError::OverflowKnownLength { .. } => {
                    "Request body is too large".to_string()
                }
                other => other.to_string(),
            };
            AppError::BadRequest(message).into()
        })
}
