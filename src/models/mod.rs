// src/models/mod.rs

pub mod backup;
pub mod goal;
pub mod test_record;
