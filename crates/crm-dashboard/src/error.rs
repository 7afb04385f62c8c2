use crate::config::ConfigError;
use crate::leads::LeadError;
use crate::presentation::SelectionError;
use crate::store::StoreError;
use crate::telemetry::TelemetryError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Store(StoreError),
    Lead(LeadError),
    Selection(SelectionError),
    /// A request the extractors could not read: bad path segment, query
    /// string or JSON body. Keeps the status the extractor chose.
    Request {
        status: StatusCode,
        message: String,
    },
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Request { status, .. } => *status,
            AppError::Selection(_) => StatusCode::BAD_REQUEST,
            AppError::Lead(LeadError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Lead(LeadError::ReferentialIntegrity { .. }) => StatusCode::CONFLICT,
            AppError::Lead(
                LeadError::MissingField(_)
                | LeadError::UnknownReference { .. }
                | LeadError::Selection(_),
            ) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Store(StoreError::Connection(_))
            | AppError::Lead(LeadError::Store(StoreError::Connection(_))) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Store(_)
            | AppError::Lead(LeadError::Store(_))
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Store(err) => write!(f, "store error: {}", err),
            AppError::Lead(err) => write!(f, "{}", err),
            AppError::Selection(err) => write!(f, "{}", err),
            AppError::Request { message, .. } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Store(err) => Some(err),
            AppError::Lead(err) => Some(err),
            AppError::Selection(err) => Some(err),
            AppError::Request { .. } => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<LeadError> for AppError {
    fn from(value: LeadError) -> Self {
        Self::Lead(value)
    }
}

impl From<SelectionError> for AppError {
    fn from(value: SelectionError) -> Self {
        Self::Selection(value)
    }
}

impl From<PathRejection> for AppError {
    fn from(value: PathRejection) -> Self {
        Self::Request {
            status: value.status(),
            message: value.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(value: QueryRejection) -> Self {
        Self::Request {
            status: value.status(),
            message: value.body_text(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self::Request {
            status: value.status(),
            message: value.body_text(),
        }
    }
}
