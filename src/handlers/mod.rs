// src/handlers/mod.rs

pub mod analytics;
pub mod backup;
pub mod goals;
pub mod health;
pub mod subjects;
pub mod test_records;
