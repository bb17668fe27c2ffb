pub mod auth;
pub mod branch_service;
pub mod dashboard_service;
pub mod hospital_service;
pub mod patient_service;
pub mod shift_service;
