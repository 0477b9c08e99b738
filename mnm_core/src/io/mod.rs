//! Module for reading and writing networks, models and results
pub mod json;
