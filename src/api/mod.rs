use actix_web::http::StatusCode;
use actix_web::web;

use super::error::Error;

mod beers;
mod manufacturers;


/// JSend-style status of an API response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The request was rejected because of something the client sent.
    Fail,
    /// The server failed to process an otherwise acceptable request.
    Error,
}

/// Body returned with every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: ResponseStatus,
    pub messages: Vec<String>,
}

impl ErrorBody {
    pub fn new(code: StatusCode, messages: Vec<String>) -> ErrorBody {
        let status = if code.is_server_error() {
            ResponseStatus::Error
        } else {
            ResponseStatus::Fail
        };
        ErrorBody { status, messages }
    }
}

/// Register the `/api` routes along with extractor configuration that reports
/// malformed bodies, query strings and paths as validation failures.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| Error::Validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| Error::Validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _| Error::Validation(err.to_string()).into()),
    )
    .service(
        web::scope("/api/beers")
            .route("", web::get().to(beers::list))
            .route("", web::post().to(beers::create))
            .route("/{id}", web::get().to(beers::get))
            .route("/{id}", web::put().to(beers::update))
            .route("/{id}", web::delete().to(beers::delete)),
    )
    .service(
        web::scope("/api/manufacturers")
            .route("", web::get().to(manufacturers::list))
            .route("", web::post().to(manufacturers::create))
            .route("/{id}", web::get().to(manufacturers::get))
            .route("/{id}", web::put().to(manufacturers::update))
            .route("/{id}", web::delete().to(manufacturers::delete)),
    );
}
