//! DTOs de la API
//!
//! Requests y responses JSON. Los montos se redondean a dos decimales solo
//! aquí, al serializar.

pub mod api_response;
pub mod dashboard_dto;
pub mod settlement_dto;

pub use api_response::ApiResponse;
