use crate::config::ConfigError;
use crate::pipeline::{DraftError, LexiconError, RuleDefinitionError};
use crate::telemetry::TelemetryError;
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
    Lexicon(LexiconError),
    Rules(RuleDefinitionError),
    SeedData(serde_json::Error),
    Draft(DraftError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Lexicon(err) => write!(f, "lexicon error: {}", err),
            AppError::Rules(err) => write!(f, "rule definition error: {}", err),
            AppError::SeedData(err) => write!(f, "seed data error: {}", err),
            AppError::Draft(err) => write!(f, "draft error: {}", err),
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
            AppError::Lexicon(err) => Some(err),
            AppError::Rules(err) => Some(err),
            AppError::SeedData(err) => Some(err),
            AppError::Draft(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Lexicon(_)
            | AppError::Rules(_)
            | AppError::SeedData(_)
            | AppError::Draft(DraftError::InvalidMaxQuestions) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Draft(DraftError::Context(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        };

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

impl From<LexiconError> for AppError {
    fn from(value: LexiconError) -> Self {
        Self::Lexicon(value)
    }
}

impl From<RuleDefinitionError> for AppError {
    fn from(value: RuleDefinitionError) -> Self {
        Self::Rules(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::SeedData(value)
    }
}

impl From<DraftError> for AppError {
    fn from(value: DraftError) -> Self {
        Self::Draft(value)
    }
}
