pub mod health;
pub mod kelly;
pub mod odds;
pub mod players;
pub mod teams;

use actix_web::web;

use courtside::error::AppError;

/// Query-string extractor that reports failures as JSON validation errors
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}

/// JSON body extractor that reports failures as JSON validation errors
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(1 << 20)
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}
