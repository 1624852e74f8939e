//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del servicio de liquidaciones
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    /// Fallo del almacenamiento (conexión, constraint, etc.)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Un viaje fue liquidado por otra operación entre la lectura y la escritura
    #[error("Eligibility conflict: {0}")]
    EligibilityConflict(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                error!("❌ Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database Error".to_string(),
                        message: e.to_string(),
                        details: None,
                        code: Some("DB_ERROR".to_string()),
                    },
                )
            }

            AppError::Validation(e) => {
                warn!("⚠️ Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: "The provided data is invalid".to_string(),
                        details: Some(json!(e)),
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::EligibilityConflict(msg) => {
                warn!("⚠️ Eligibility conflict: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Eligibility Conflict".to_string(),
                        message: "Some trips were already settled by another operation. Please retry".to_string(),
                        details: Some(json!({ "conflict": msg })),
                        code: Some("ELIGIBILITY_CONFLICT".to_string()),
                    },
                )
            }

            AppError::NotFound(msg) => {
                warn!("⚠️ Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: Some("NOT_FOUND".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    field_error(field, "custom", message.to_string())
}

fn field_error(field: &'static str, code: &'static str, message: String) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error.add_param("field".into(), &field);

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Body JSON ilegible o con tipos incorrectos
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        field_error("body", "invalid_json", rejection.body_text())
    }
}

/// Query string con parámetros mal formados
impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        field_error("query", "invalid_query", rejection.body_text())
    }
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de conflicto de elegibilidad
pub fn eligibility_conflict_error(trip_ids: &[Uuid]) -> AppError {
    let ids = trip_ids
        .iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    AppError::EligibilityConflict(format!("trips no longer eligible for settlement: [{}]", ids))
}
