use actix_web::{http::header::ContentType, http::StatusCode, HttpResponse};
use scour_common::error::ErrorInformation;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid page number: {0:?}")]
    InvalidPage(String),
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl actix_web::error::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidPage(_) => StatusCode::BAD_REQUEST,
            Self::Request(_) | Self::Serde(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{self}");
        }

        let mut res = HttpResponse::build(status);
        res.insert_header(ContentType::json());
        match self {
            Self::InvalidPage(page) => res.json(ErrorInformation::new(
                "InvalidPage",
                "The page number must be a non-negative integer",
                format!("{page:?}"),
            )),
            Self::Request(error) => res.json(ErrorInformation::new(
                status.to_string(),
                "Error sending request to search service",
                error,
            )),
            Self::Serde(error) => res.json(ErrorInformation::new(
                "Serialization",
                "Invalid response from search service",
                error,
            )),
        }
    }
}
