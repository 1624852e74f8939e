pub mod dashboard_controller;
pub mod settlement_controller;
