//! Driver Settlement Service
//!
//! Cálculo y registro de liquidaciones de conductores: batta semanal y
//! salario mensual a partir de los viajes completados.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
