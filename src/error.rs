use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use log::{debug, error};
use serde_json::json;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Environment error: {0}")]
    Environment(#[from] envy::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not logged in")]
    Unauthorized,
}

pub type Result<T> = std::result::Result<T, Error>;

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("{}", self);
            "Unexpected error".to_owned()
        } else {
            debug!("{}", self);
            self.to_string()
        };
        HttpResponse::build(status).json(json!({ "error": message }))
    }
}

/// Rejected path segments answer with the same JSON body as every other error.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| Error::InvalidInput(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| Error::InvalidInput(err.to_string()).into())
}
