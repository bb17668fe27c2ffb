pub mod auth;
pub mod dashboard;
pub mod directory;
pub mod scheduling;
pub mod tenancy;
