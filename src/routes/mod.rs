//! HTTP handlers and the shared helpers that turn failures into responses.

use actix_web::error::{InternalError, JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, web};
use chrono::{Local, NaiveDate};

use crate::dto::api::MessageResponse;
use crate::services::ServiceError;

pub mod api;

/// Calendar date handlers treat as "today" when ordering by birthday.
///
/// Handlers fall back to [`Today::Local`] when no value is registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Today {
    #[default]
    Local,
    Fixed(NaiveDate),
}

impl Today {
    pub fn date(self) -> NaiveDate {
        match self {
            Self::Local => Local::now().date_naive(),
            Self::Fixed(date) => date,
        }
    }
}

/// Maps a service failure onto its HTTP status with a JSON `message` body.
pub fn error_response(err: &ServiceError) -> HttpResponse {
    match err {
        ServiceError::Validation(message) => {
            HttpResponse::BadRequest().json(MessageResponse::new(message.as_str()))
        }
        ServiceError::NotFound(message) => {
            HttpResponse::NotFound().json(MessageResponse::new(message.as_str()))
        }
        ServiceError::DuplicateKey(message) => {
            HttpResponse::Conflict().json(MessageResponse::new(message.as_str()))
        }
        ServiceError::Store(store_err) => {
            log::error!("Store failure: {store_err}");
            HttpResponse::InternalServerError().json(MessageResponse::new("Internal server error"))
        }
    }
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(MessageResponse::new(message))
}

/// JSON extractor config answering malformed bodies with `400 {"message"}`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        let response = bad_request(err.to_string());
        InternalError::from_response(err, response).into()
    })
}

/// Query extractor config answering malformed query strings with `400 {"message"}`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
        let response = bad_request(err.to_string());
        InternalError::from_response(err, response).into()
    })
}

/// Path extractor config; ids that are not integers end up here.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, _req: &HttpRequest| {
        let response = bad_request(err.to_string());
        InternalError::from_response(err, response).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_today_is_returned_verbatim() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert_eq!(Today::Fixed(date).date(), date);
        assert_eq!(Today::default(), Today::Local);
    }
}
