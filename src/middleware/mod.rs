//! Middleware de la API

pub mod cors;
