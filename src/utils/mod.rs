//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y formateo de montos.

pub mod errors;
pub mod money;
pub mod validation;

pub use errors::{AppError, AppResult};
