pub mod auth;
pub mod branches;
pub mod dashboard;
pub mod hospitals;
pub mod patients;
pub mod shifts;
