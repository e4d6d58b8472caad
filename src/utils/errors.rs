//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate role name: {0}")]
    DuplicateName(String),

    #[error("Duplicate email: {0}")]
    DuplicateEmail(String),

    #[error("Invalid role reference: {0}")]
    InvalidRole(String),

    #[error("Protected role: {0}")]
    ProtectedRole(String),

    // El rol por defecto no existe cuando se necesita como destino de
    // reasignación. Indica una base de datos mal inicializada.
    #[error("Fallback role missing: {0}")]
    FallbackRoleMissing(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database Error".to_string(),
                        message: "An error occurred while accessing the database".to_string(),
                        details: Some(json!({ "sql_error": e.to_string() })),
                        code: "DB_ERROR".to_string(),
                    },
                )
            }

            AppError::Validation(e) => {
                warn!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: "The provided data is invalid".to_string(),
                        details: Some(json!(e)),
                        code: "VALIDATION_ERROR".to_string(),
                    },
                )
            }

            AppError::NotFound(msg) => {
                warn!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: "NOT_FOUND".to_string(),
                    },
                )
            }

            AppError::DuplicateName(msg) => {
                warn!("Duplicate role name: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Conflict".to_string(),
                        message: msg,
                        details: None,
                        code: "DUPLICATE_NAME".to_string(),
                    },
                )
            }

            AppError::DuplicateEmail(msg) => {
                warn!("Duplicate email: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Conflict".to_string(),
                        message: msg,
                        details: None,
                        code: "DUPLICATE_EMAIL".to_string(),
                    },
                )
            }

            AppError::InvalidRole(msg) => {
                warn!("Invalid role reference: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Invalid Role".to_string(),
                        message: msg,
                        details: None,
                        code: "INVALID_ROLE".to_string(),
                    },
                )
            }

            AppError::ProtectedRole(msg) => {
                warn!("Protected role: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Protected Role".to_string(),
                        message: msg,
                        details: None,
                        code: "PROTECTED_ROLE".to_string(),
                    },
                )
            }

            AppError::FallbackRoleMissing(msg) => {
                error!("Fallback role missing: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Fallback Role Missing".to_string(),
                        message: msg,
                        details: None,
                        code: "FALLBACK_ROLE_MISSING".to_string(),
                    },
                )
            }

            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: Some(json!({ "internal_error": msg })),
                        code: "INTERNAL_ERROR".to_string(),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;
