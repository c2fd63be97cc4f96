pub mod assets;
pub mod dashboard;
pub mod health;
pub mod maintenance;
pub mod reports;
pub mod schedule;
