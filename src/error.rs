use actix_web::error::{BlockingError, ResponseError};
use actix_web::http::{header, StatusCode};
use actix_web::HttpResponse;
use derive_more::Display;
use diesel::r2d2;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::convert::From;
use validator::ValidationErrors;

use super::api::ErrorBody;

pub type Result<T> = ::std::result::Result<T, Error>;

/// Realm advertised to clients that must retry with HTTP Basic credentials.
const BASIC_REALM: &str = "Basic realm=\"beer-catalogue\"";

#[derive(Debug, Display)]
pub enum Error {
    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "{}", _0)]
    Validations(ValidationErrors),

    #[display(fmt = "Invalid sort field: {}", _0)]
    InvalidSortField(String),

    #[display(fmt = "Invalid sort direction: {}", _0)]
    InvalidSortDirection(String),

    #[display(fmt = "{}", _0)]
    NotFound(String),

    #[display(fmt = "{}", _0)]
    AccessDenied(String),

    #[display(fmt = "Authentication is required")]
    Unauthenticated,

    #[display(fmt = "{}", _0)]
    Conflict(String),

    #[display(fmt = "Database error: {}", _0)]
    DieselError(DieselError),

    #[display(fmt = "Connection pool error: {}", _0)]
    PoolError(r2d2::PoolError),

    #[display(fmt = "Blocking task failed")]
    Blocking,

    #[display(fmt = "Migration failed: {}", _0)]
    Migration(String),

    #[display(fmt = "Internal error: {}", _0)]
    Internal(&'static str),

    #[display(fmt = "Password hashing failed: {}", _0)]
    PasswordHash(String),
}

impl Error {
    pub fn beer_not_found(id: i64) -> Error {
        Error::NotFound(format!("Beer with id {} not found", id))
    }

    pub fn manufacturer_not_found(id: i64) -> Error {
        Error::NotFound(format!("Manufacturer with id {} not found", id))
    }

    /// Human readable messages returned in the response body.
    ///
    /// Internal failures are not described to the caller.
    fn messages(&self) -> Vec<String> {
        match self {
            Self::Validations(errors) => {
                let mut messages: Vec<String> = errors
                    .field_errors()
                    .into_iter()
                    .flat_map(|(field, errs)| {
                        errs.iter().map(move |e| match &e.message {
                            Some(message) => format!("{}: {}", field, message),
                            None => format!("{}: {}", field, e.code),
                        })
                    })
                    .collect();
                messages.sort();
                messages
            }
            Self::DieselError(_)
            | Self::PoolError(_)
            | Self::Blocking
            | Self::Migration(_)
            | Self::Internal(_)
            | Self::PasswordHash(_) => {
                vec!["Internal server error".to_owned()]
            }
            other => vec![other.to_string()],
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validations(e) => Some(e),
            Self::DieselError(e) => Some(e),
            Self::PoolError(e) => Some(e),
            _ => None,
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::Validations(_)
            | Self::InvalidSortField(_)
            | Self::InvalidSortDirection(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AccessDenied(_) => StatusCode::FORBIDDEN,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::DieselError(_)
            | Self::PoolError(_)
            | Self::Blocking
            | Self::Migration(_)
            | Self::Internal(_)
            | Self::PasswordHash(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        }

        let mut response = HttpResponse::build(status);
        if let Self::Unauthenticated = self {
            response.insert_header((header::WWW_AUTHENTICATE, BASIC_REALM));
        }
        response.json(ErrorBody::new(status, self.messages()))
    }
}

impl From<DieselError> for Error {
    fn from(e: DieselError) -> Error {
        match e {
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Error::Conflict(format!(
                    "The record is still referenced elsewhere: {}",
                    info.message()
                ))
            }
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Error::Conflict(info.message().to_owned())
            }
            e => Error::DieselError(e),
        }
    }
}

impl From<r2d2::PoolError> for Error {
    fn from(e: r2d2::PoolError) -> Error {
        Error::PoolError(e)
    }
}

impl From<BlockingError> for Error {
    fn from(_: BlockingError) -> Error {
        Error::Blocking
    }
}

impl From<ValidationErrors> for Error {
    fn from(e: ValidationErrors) -> Error {
        Error::Validations(e)
    }
}
