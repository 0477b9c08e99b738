//! Experiments, their weights and their recorded outcomes

pub mod experiment_type;
pub mod result;
